use thiserror::Error;

/// Conditions that abort the current `parse_object` call.
///
/// The byte source stays usable after any of these; callers resynchronize by
/// seeking to a known offset.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unexpected end of input")]
    EndOfInput,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected delimiter {byte:#04x} at offset {offset}")]
    UnexpectedDelimiter { byte: u8, offset: u64 },

    #[error("unexpected keyword `{keyword}` parsing object at offset {offset}")]
    UnexpectedKeyword { keyword: String, offset: u64 },

    #[error("stream keyword not followed by newline at offset {offset}")]
    MalformedStreamStart { offset: u64 },

    #[error("objects nested deeper than {limit} levels at offset {offset}")]
    NestingTooDeep { limit: usize, offset: u64 },
}

impl Error {
    /// `true` for errors raised because the input ran out.
    pub fn is_end_of_input(&self) -> bool {
        match self {
            Error::EndOfInput => true,
            Error::Io(err) => err.kind() == std::io::ErrorKind::UnexpectedEof,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
