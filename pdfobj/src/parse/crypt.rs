use std::{fmt::Debug, sync::Arc};

use log::trace;

use crate::pdf::ObjectPointer;

/// Which cipher the decryptor should apply. Only passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherMode {
    Rc4,
    Aes,
}

/// Decrypts the bytes of strings that belong to an encrypted indirect object.
///
/// Implemented for closures with the same signature.
pub trait StringDecryptor {
    fn decrypt(
        &self,
        key: &[u8],
        mode: CipherMode,
        object: ObjectPointer,
        data: Vec<u8>,
    ) -> Vec<u8>;
}

impl<F> StringDecryptor for F
where
    F: Fn(&[u8], CipherMode, ObjectPointer, Vec<u8>) -> Vec<u8>,
{
    fn decrypt(
        &self,
        key: &[u8],
        mode: CipherMode,
        object: ObjectPointer,
        data: Vec<u8>,
    ) -> Vec<u8> {
        self(key, mode, object, data)
    }
}

/// Document key, cipher mode and the function applying them.
pub struct Crypt {
    key: Vec<u8>,
    mode: CipherMode,
    decryptor: Box<dyn StringDecryptor + Send + Sync>,
}

impl Crypt {
    pub fn new(
        key: Vec<u8>,
        mode: CipherMode,
        decryptor: impl StringDecryptor + Send + Sync + 'static,
    ) -> Self {
        Self {
            key,
            mode,
            decryptor: Box::new(decryptor),
        }
    }

    pub fn mode(&self) -> CipherMode {
        self.mode
    }
}

impl Debug for Crypt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crypt")
            .field("key_len", &self.key.len())
            .field("mode", &self.mode)
            .finish()
    }
}

/// State a parse depends on besides the input: the indirect object being read
/// and how its strings are decrypted.
///
/// Nested definitions get their own context from [`ParseContext::with_object`]
/// so nothing has to be restored afterwards.
#[derive(Debug, Clone, Default)]
pub struct ParseContext {
    /// `0 0` outside of any indirect object definition.
    pub object: ObjectPointer,
    pub crypt: Option<Arc<Crypt>>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(&self, object: ObjectPointer) -> Self {
        Self {
            object,
            crypt: self.crypt.clone(),
        }
    }

    pub fn with_crypt(self, crypt: Crypt) -> Self {
        Self {
            crypt: Some(Arc::new(crypt)),
            ..self
        }
    }

    /// Strings of object 0 and strings read without a key stay untouched.
    pub(crate) fn decrypt(&self, data: Vec<u8>) -> Vec<u8> {
        match &self.crypt {
            Some(crypt) if self.object.id != 0 && !crypt.key.is_empty() => {
                trace!("decrypting {} bytes of object {}", data.len(), self.object);
                crypt
                    .decryptor
                    .decrypt(&crypt.key, crypt.mode, self.object, data)
            }
            _ => data,
        }
    }
}
