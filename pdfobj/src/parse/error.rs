use std::fmt::Display;

/// Anomalies the parser recovered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A hex string contained a non-hex digit. The string was truncated there.
    MalformedHexString,
    /// A backslash in a literal string was followed by this byte. Both bytes
    /// were kept.
    InvalidEscapeSequence(u8),
    /// An octal escape above `\377`. The low eight bits were kept.
    InvalidOctalEscape(u16),
    /// `#` in a name wasn't followed by two hex digits. The bytes were kept
    /// verbatim.
    MalformedNameEscape,
    /// A dictionary key that isn't a name. The token was skipped.
    NonNameDictKey,
    /// An indirect object definition wasn't closed by `endobj`.
    MissingEndobj,
    /// A numeric keyword that doesn't fit the number type. The value was
    /// saturated (integers) or zeroed (reals).
    InvalidNumber(String),
    /// The input ended inside a string.
    UnterminatedString,
}

impl Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::MalformedHexString => write!(f, "malformed hex string"),
            DiagnosticKind::InvalidEscapeSequence(c) => {
                write!(f, "invalid escape sequence \\{}", char::from(*c))
            }
            DiagnosticKind::InvalidOctalEscape(x) => write!(f, "invalid octal escape \\{:03o}", x),
            DiagnosticKind::MalformedNameEscape => write!(f, "malformed name escape"),
            DiagnosticKind::NonNameDictKey => {
                write!(f, "unexpected non-name key parsing dictionary")
            }
            DiagnosticKind::MissingEndobj => {
                write!(f, "missing endobj after indirect object definition")
            }
            DiagnosticKind::InvalidNumber(s) => write!(f, "invalid number {}", s),
            DiagnosticKind::UnterminatedString => write!(f, "unterminated string"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Byte offset at which the anomaly was noticed.
    pub offset: u64,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(offset: u64, kind: DiagnosticKind) -> Self {
        Self { offset, kind }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at offset {}", self.kind, self.offset)
    }
}
