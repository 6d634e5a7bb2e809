use std::fmt::Display;

use super::{Dictionary, DisplayDictionary, ObjectPointer};

pub const K_LENGTH: &[u8] = b"Length";

/// A stream dictionary together with the location of its payload.
///
/// The payload itself is not read. `payload_offset` is the absolute position
/// of the first byte after the end-of-line that follows the `stream` keyword.
#[derive(Clone, Debug, PartialEq)]
pub struct Stream {
    pub dictionary: Dictionary,
    /// Identity of the indirect object the stream was defined in.
    pub pointer: ObjectPointer,
    pub payload_offset: u64,
}

impl Stream {
    /// The `/Length` entry if it is a direct, non-negative integer.
    ///
    /// An indirect length has to be resolved by whoever owns the cross
    /// reference table.
    pub fn length(&self) -> Option<u64> {
        self.dictionary
            .get(K_LENGTH)
            .and_then(|obj| obj.integer())
            .and_then(|len| len.try_into().ok())
    }
}

impl Display for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} stream @{}",
            DisplayDictionary(&self.dictionary),
            self.payload_offset
        )
    }
}
