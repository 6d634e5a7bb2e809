use std::ops::Deref;

/// Bytes of a literal or hexadecimal string after escapes have been resolved
/// (and after decryption, if it was active).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PdfString(Vec<u8>);

impl PdfString {
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for PdfString {
    fn from(v: Vec<u8>) -> Self {
        PdfString(v)
    }
}

impl From<&[u8]> for PdfString {
    fn from(v: &[u8]) -> Self {
        PdfString(v.to_vec())
    }
}

impl From<&str> for PdfString {
    fn from(s: &str) -> Self {
        PdfString(s.as_bytes().to_vec())
    }
}

impl Deref for PdfString {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Debug for PdfString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PdfString")
            .field(&String::from_utf8_lossy(&self.0[..]))
            .finish()
    }
}

impl std::fmt::Display for PdfString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", &String::from_utf8_lossy(&self.0[..]))
    }
}
