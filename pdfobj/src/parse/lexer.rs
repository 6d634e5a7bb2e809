use std::{
    io::{Read, Seek},
    ops::Deref,
};

use log::{debug, trace, warn};
use nom::{character, combinator, sequence, IResult};

use crate::{
    error::{Error, Result},
    parse::{
        error::{Diagnostic, DiagnosticKind},
        source::ByteSource,
    },
    pdf::Name,
};

pub(crate) fn is_whitespace(chr: u8) -> bool {
    matches!(chr, b'\0' | b'\t' | b'\n' | b'\x0c' | b'\r' | b' ')
}

pub(crate) fn is_delimiter(chr: u8) -> bool {
    matches!(
        chr,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn integer_literal(input: &[u8]) -> IResult<&[u8], &[u8]> {
    combinator::recognize(sequence::pair(
        combinator::opt(character::complete::one_of("+-")),
        character::complete::digit1,
    ))(input)
}

/// Digits with exactly one dot. Neither side of the dot is required.
fn real_literal(input: &[u8]) -> IResult<&[u8], &[u8]> {
    combinator::recognize(sequence::tuple((
        combinator::opt(character::complete::one_of("+-")),
        character::complete::digit0,
        character::complete::char('.'),
        character::complete::digit0,
    )))(input)
}

fn is_integer(run: &[u8]) -> bool {
    combinator::all_consuming(integer_literal)(run).is_ok()
}

fn is_real(run: &[u8]) -> bool {
    combinator::all_consuming(real_literal)(run).is_ok()
}

fn hex_pair(hi: u8, lo: u8) -> Option<u8> {
    let mut out = [0u8; 1];
    hex::decode_to_slice([hi, lo], &mut out).ok()?;
    Some(out[0])
}

/// A bare word such as `obj` or `R`. The structural markers `<<`, `>>`, `[`,
/// `]`, `{` and `}` are keywords as well.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Keyword(Vec<u8>);

impl From<Vec<u8>> for Keyword {
    fn from(v: Vec<u8>) -> Self {
        Keyword(v)
    }
}

impl From<&str> for Keyword {
    fn from(s: &str) -> Self {
        Keyword(s.as_bytes().to_vec())
    }
}

impl Deref for Keyword {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Debug for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Keyword")
            .field(&String::from_utf8_lossy(&self.0[..]))
            .finish()
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", &String::from_utf8_lossy(&self.0[..]))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Bool(bool),
    Integer(i64),
    Real(f64),
    /// Literal or hex string, escapes resolved.
    String(Vec<u8>),
    Name(Name),
    Keyword(Keyword),
}

impl Token {
    pub fn is_keyword(&self, keyword: &[u8]) -> bool {
        matches!(self, Token::Keyword(kw) if &kw[..] == keyword)
    }
}

/// A token with the offset of its first byte and the anomalies found while
/// reading it. The diagnostics travel with the token when it is pushed back.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub token: Token,
    pub offset: u64,
    pub diagnostics: Vec<Diagnostic>,
}

/// Splits the bytes of a [`ByteSource`] into tokens.
///
/// Whitespace and comments are skipped. Tokens handed to `unread_token` are
/// returned again, last in first out, before any new input is consumed.
pub struct Lexer<R> {
    source: ByteSource<R>,
    unread: Vec<Lexeme>,
    /// Start of the token `read_token` returned last.
    token_offset: u64,
    /// Failure hit while looking ahead, reported once the tokens read before
    /// it have been consumed again.
    deferred: Option<Error>,
    diagnostics: Vec<Diagnostic>,
}

impl<R: Read> Lexer<R> {
    pub fn new(source: ByteSource<R>) -> Self {
        Self {
            source,
            unread: Vec::with_capacity(3),
            token_offset: 0,
            deferred: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn source(&self) -> &ByteSource<R> {
        &self.source
    }

    pub fn into_source(self) -> ByteSource<R> {
        self.source
    }

    pub(crate) fn source_mut(&mut self) -> &mut ByteSource<R> {
        &mut self.source
    }

    pub fn set_allow_eof(&mut self, allow_eof: bool) {
        self.source.set_allow_eof(allow_eof);
    }

    /// Offset of the next unread byte. Pushed back tokens are not taken into
    /// account.
    pub fn offset(&self) -> u64 {
        self.source.current_offset()
    }

    /// Recoverable anomalies collected since the last `take_diagnostics`.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics[..]
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Offset of the first byte of the token `read_token` returned last.
    pub fn token_offset(&self) -> u64 {
        self.token_offset
    }

    /// Push back a token. It is taken to start where the last token read
    /// started.
    pub fn unread_token(&mut self, token: Token) {
        self.push_back(Lexeme {
            token,
            offset: self.token_offset,
            diagnostics: Vec::new(),
        });
    }

    pub fn push_back(&mut self, lexeme: Lexeme) {
        trace!("unread {:?}", lexeme.token);
        self.unread.push(lexeme);
    }

    /// Read the next token. `None` means the input ended while end of input
    /// was allowed.
    pub fn read_token(&mut self) -> Result<Option<Token>> {
        match self.next_lexeme()? {
            Some(lexeme) => Ok(Some(self.accept(lexeme))),
            None if self.source.allow_eof() => Ok(None),
            None => Err(Error::EndOfInput),
        }
    }

    /// Make `lexeme` the current token, recording its diagnostics.
    pub fn accept(&mut self, lexeme: Lexeme) -> Token {
        self.token_offset = lexeme.offset;
        self.diagnostics.extend(lexeme.diagnostics);
        lexeme.token
    }

    /// Read the next token without accepting it. `None` means the input ended
    /// before another token started, whether or not end of input is allowed.
    /// Running out of input inside a token is an error unless it is allowed.
    pub fn next_lexeme(&mut self) -> Result<Option<Lexeme>> {
        if let Some(lexeme) = self.unread.pop() {
            return Ok(Some(lexeme));
        }
        if let Some(err) = self.deferred.take() {
            return Err(err);
        }

        let c = match self.skip_whitespace()? {
            Some(c) => c,
            None => return Ok(None),
        };
        let start = self.source.current_offset() - 1;
        let mark = self.diagnostics.len();
        let token = self.lex(c, start)?;

        Ok(Some(Lexeme {
            token,
            offset: start,
            diagnostics: self.diagnostics.split_off(mark),
        }))
    }

    fn lex(&mut self, c: u8, start: u64) -> Result<Token> {

        let token = match c {
            b'<' => match self.source.read_byte()? {
                Some(b'<') => Token::Keyword("<<".into()),
                Some(_) => {
                    self.source.unread_byte();
                    self.read_hex_string()?
                }
                None => self.read_hex_string()?,
            },
            b'(' => self.read_literal_string()?,
            b'[' | b']' | b'{' | b'}' => Token::Keyword(vec![c].into()),
            b'/' => self.read_name()?,
            b'>' => match self.source.read_byte()? {
                Some(b'>') => Token::Keyword(">>".into()),
                Some(_) => {
                    self.source.unread_byte();
                    return Err(Error::UnexpectedDelimiter {
                        byte: c,
                        offset: start,
                    });
                }
                None => {
                    return Err(Error::UnexpectedDelimiter {
                        byte: c,
                        offset: start,
                    })
                }
            },
            c if is_delimiter(c) => {
                return Err(Error::UnexpectedDelimiter {
                    byte: c,
                    offset: start,
                })
            }
            _ => {
                self.source.unread_byte();
                self.read_keyword()?
            }
        };

        Ok(token)
    }

    /// Hold back `err` until the pushed back tokens have been read again.
    pub fn defer_error(&mut self, err: Error) {
        trace!("deferring {}", err);
        self.deferred = Some(err);
    }

    /// Drop pushed back tokens and skip ahead to `offset` without seeking the
    /// underlying reader.
    pub fn seek_forward(&mut self, offset: u64) -> Result<()> {
        debug!("skipping forward to offset {}", offset);
        self.unread.clear();
        self.deferred = None;
        self.source.seek_forward(offset)
    }

    pub(crate) fn diagnose(&mut self, kind: DiagnosticKind) {
        let offset = self.source.current_offset();
        self.diagnose_at(offset, kind);
    }

    fn diagnose_at(&mut self, offset: u64, kind: DiagnosticKind) {
        let diagnostic = Diagnostic::new(offset, kind);
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// Returns the first byte that is neither whitespace nor part of a
    /// comment, or `None` if the input ends first.
    fn skip_whitespace(&mut self) -> Result<Option<u8>> {
        loop {
            let c = match self.read_run_byte()? {
                Some(c) => c,
                None => return Ok(None),
            };
            if is_whitespace(c) {
                continue;
            }
            if c != b'%' {
                return Ok(Some(c));
            }
            // comments run up to the next CR or LF
            loop {
                match self.read_run_byte()? {
                    Some(b'\r' | b'\n') => break,
                    Some(_) => {}
                    None => return Ok(None),
                }
            }
        }
    }

    /// Like `read_byte` but a missing byte ends a name, keyword or the space
    /// between tokens instead of failing.
    fn read_run_byte(&mut self) -> Result<Option<u8>> {
        match self.source.read_byte() {
            Err(Error::EndOfInput) => Ok(None),
            res => res,
        }
    }

    fn read_non_whitespace(&mut self) -> Result<Option<u8>> {
        while let Some(c) = self.source.read_byte()? {
            if !is_whitespace(c) {
                return Ok(Some(c));
            }
        }
        Ok(None)
    }

    fn read_hex_string(&mut self) -> Result<Token> {
        let mut out = Vec::new();
        loop {
            let hi = match self.read_non_whitespace()? {
                Some(b'>') => break,
                Some(hi) => hi,
                None => {
                    self.diagnose(DiagnosticKind::UnterminatedString);
                    break;
                }
            };
            let lo = match self.read_non_whitespace()? {
                Some(lo) => lo,
                None => {
                    self.diagnose(DiagnosticKind::UnterminatedString);
                    break;
                }
            };

            match hex_pair(hi, lo) {
                Some(b) => out.push(b),
                None => {
                    self.diagnose(DiagnosticKind::MalformedHexString);
                    // drop the rest so the next token starts after the string
                    if lo != b'>' {
                        while let Some(c) = self.source.read_byte()? {
                            if c == b'>' {
                                break;
                            }
                        }
                    }
                    break;
                }
            }
        }

        Ok(Token::String(out))
    }

    fn read_literal_string(&mut self) -> Result<Token> {
        let mut out = Vec::new();
        let mut depth = 1;
        loop {
            let c = match self.source.read_byte()? {
                Some(c) => c,
                None => {
                    self.diagnose(DiagnosticKind::UnterminatedString);
                    break;
                }
            };
            match c {
                b'(' => {
                    depth += 1;
                    out.push(c);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    out.push(c);
                }
                b'\\' => self.read_escape(&mut out)?,
                _ => out.push(c),
            }
        }

        Ok(Token::String(out))
    }

    fn read_escape(&mut self, out: &mut Vec<u8>) -> Result<()> {
        // the caller notices the end of input on its next read
        let c = match self.source.read_byte()? {
            Some(c) => c,
            None => return Ok(()),
        };

        match c {
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b'b' => out.push(b'\x08'),
            b't' => out.push(b'\t'),
            b'f' => out.push(b'\x0c'),
            b'(' | b')' | b'\\' => out.push(c),
            // line continuations
            b'\r' => {
                if self.source.read_byte()? != Some(b'\n') {
                    self.source.unread_byte();
                }
            }
            b'\n' => {}
            b'0'..=b'7' => {
                let mut x = u16::from(c - b'0');
                for _ in 0..2 {
                    match self.source.read_byte()? {
                        Some(d @ b'0'..=b'7') => x = x * 8 + u16::from(d - b'0'),
                        Some(_) => {
                            self.source.unread_byte();
                            break;
                        }
                        None => break,
                    }
                }
                if x > 0xff {
                    self.diagnose(DiagnosticKind::InvalidOctalEscape(x));
                }
                out.push(x as u8);
            }
            _ => {
                self.diagnose(DiagnosticKind::InvalidEscapeSequence(c));
                out.extend_from_slice(&[b'\\', c]);
            }
        }

        Ok(())
    }

    fn read_name(&mut self) -> Result<Token> {
        let mut out = Vec::new();
        while let Some(c) = self.read_run_byte()? {
            if is_delimiter(c) || is_whitespace(c) {
                self.source.unread_byte();
                break;
            }
            if c == b'#' {
                self.read_name_escape(&mut out)?;
            } else {
                out.push(c);
            }
        }

        Ok(Token::Name(Name::new(out)))
    }

    /// Decode the two hex digits following `#`. Malformed escapes are kept
    /// verbatim and the offending byte is left for the name loop.
    fn read_name_escape(&mut self, out: &mut Vec<u8>) -> Result<()> {
        let hi = match self.read_run_byte()? {
            Some(hi) if hi.is_ascii_hexdigit() => hi,
            other => {
                self.diagnose(DiagnosticKind::MalformedNameEscape);
                out.push(b'#');
                if other.is_some() {
                    self.source.unread_byte();
                }
                return Ok(());
            }
        };
        let lo = match self.read_run_byte()? {
            Some(lo) => lo,
            None => {
                self.diagnose(DiagnosticKind::MalformedNameEscape);
                out.extend_from_slice(&[b'#', hi]);
                return Ok(());
            }
        };

        match hex_pair(hi, lo) {
            Some(b) => out.push(b),
            None => {
                self.source.unread_byte();
                self.diagnose(DiagnosticKind::MalformedNameEscape);
                out.extend_from_slice(&[b'#', hi]);
            }
        }

        Ok(())
    }

    fn read_keyword(&mut self) -> Result<Token> {
        let start = self.source.current_offset();
        let mut run = Vec::new();
        while let Some(c) = self.read_run_byte()? {
            if is_delimiter(c) || is_whitespace(c) {
                self.source.unread_byte();
                break;
            }
            run.push(c);
        }

        Ok(self.classify(run, start))
    }

    fn classify(&mut self, run: Vec<u8>, start: u64) -> Token {
        match &run[..] {
            b"true" => return Token::Bool(true),
            b"false" => return Token::Bool(false),
            _ => {}
        }

        if is_integer(&run) {
            let text = String::from_utf8_lossy(&run);
            return match text.parse::<i64>() {
                Ok(x) => Token::Integer(x),
                Err(_) => {
                    let saturated = if run[0] == b'-' { i64::MIN } else { i64::MAX };
                    self.diagnose_at(start, DiagnosticKind::InvalidNumber(text.into_owned()));
                    Token::Integer(saturated)
                }
            };
        }

        if is_real(&run) {
            let text = String::from_utf8_lossy(&run);
            return match text.parse::<f64>() {
                Ok(x) => Token::Real(x),
                Err(_) => {
                    self.diagnose_at(start, DiagnosticKind::InvalidNumber(text.into_owned()));
                    Token::Real(0.0)
                }
            };
        }

        Token::Keyword(run.into())
    }
}

impl<R: Read + Seek> Lexer<R> {
    /// Drop pushed back tokens and buffered bytes and continue reading at the
    /// absolute offset `offset`.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        debug!("seeking to offset {}", offset);
        self.unread.clear();
        self.deferred = None;
        self.source.seek(offset)
    }
}
