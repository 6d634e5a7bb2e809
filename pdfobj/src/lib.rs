//! Reading the object syntax of PDF files.
//!
//! The crate turns raw bytes into [`pdf::Object`] values: scalars, strings,
//! names, arrays, dictionaries, references, indirect object definitions and
//! streams. Resolving references, decoding stream payloads and walking the
//! document structure are left to the caller, which positions an
//! [`ObjectReader`] with [`ObjectReader::seek`] and reads one object at a
//! time.
//!
//! ```
//! use pdfobj::{pdf::{Object, ObjectPointer}, ObjectReader};
//!
//! let mut reader = ObjectReader::from_bytes(b"[1 0 R 2]");
//! let parsed = reader.parse_object().unwrap();
//! assert_eq!(
//!     parsed.object,
//!     Object::from(vec![Object::from(ObjectPointer::new(1, 0)), Object::Integer(2)])
//! );
//! assert!(parsed.diagnostics.is_empty());
//! ```

mod error;
pub mod parse;
pub mod pdf;

pub use error::{Error, Result};
pub use parse::{
    CipherMode, Crypt, Diagnostic, DiagnosticKind, ObjectReader, ParseContext, ParseOptions, Parsed,
    StringDecryptor,
};

/// Parse the first object in `data`.
pub fn parse_bytes(data: &[u8]) -> Result<Parsed> {
    ObjectReader::from_bytes(data).parse_object()
}

/// Parse every top-level object in `data`, stopping at the first fatal error.
pub fn parse_all(data: &[u8]) -> Result<Vec<Parsed>> {
    ObjectReader::from_bytes(data).objects().collect()
}
