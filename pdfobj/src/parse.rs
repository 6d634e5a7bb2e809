//! Reading PDF objects from a byte stream.
//!
//! [`ObjectReader`] drives the [`Lexer`], which in turn pulls bytes from a
//! [`ByteSource`]. Every call of [`ObjectReader::parse_object`] reads one
//! object and returns it together with the anomalies that were recovered from
//! while reading it.

use std::io::{Cursor, Read, Seek};

use crate::{
    error::Result,
    pdf::{Object, ObjectPointer},
};

pub use self::{
    crypt::{CipherMode, Crypt, ParseContext, StringDecryptor},
    error::{Diagnostic, DiagnosticKind},
    lexer::{Keyword, Lexeme, Lexer, Token},
    source::ByteSource,
};

mod crypt;
mod error;
mod lexer;
mod object;
mod source;

pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Switches that depend on where in a document the parse happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Look ahead for `id gen R` and `id gen obj` after integers.
    pub allow_objptr: bool,
    /// Turn a dictionary followed by `stream` into a [`Stream`](crate::pdf::Stream).
    pub allow_stream: bool,
    /// Treat running out of input as the end of the current object instead of
    /// an error.
    pub allow_eof: bool,
    /// Deepest nesting of arrays, dictionaries and definitions accepted.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            allow_objptr: true,
            allow_stream: true,
            allow_eof: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A parsed object and the anomalies noticed while reading it.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub object: Object,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ObjectReader<R> {
    lexer: Lexer<R>,
    options: ParseOptions,
    context: ParseContext,
}

impl<'a> ObjectReader<Cursor<&'a [u8]>> {
    pub fn from_bytes(data: &'a [u8]) -> Self {
        Self::new(Cursor::new(data))
    }
}

impl<R: Read> ObjectReader<R> {
    pub fn new(reader: R) -> Self {
        Self::at_offset(reader, 0)
    }

    /// `offset` is the absolute position `reader` currently reads from. It is
    /// used for stream payload offsets and diagnostics.
    pub fn at_offset(reader: R, offset: u64) -> Self {
        Self::with_options(reader, offset, ParseOptions::default())
    }

    pub fn with_options(reader: R, offset: u64, options: ParseOptions) -> Self {
        let mut source = ByteSource::at_offset(reader, offset);
        source.set_allow_eof(options.allow_eof);
        Self {
            lexer: Lexer::new(source),
            options,
            context: ParseContext::default(),
        }
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    pub fn set_options(&mut self, options: ParseOptions) {
        self.lexer.set_allow_eof(options.allow_eof);
        self.options = options;
    }

    pub fn set_allow_objptr(&mut self, allow_objptr: bool) {
        self.options.allow_objptr = allow_objptr;
    }

    pub fn set_allow_stream(&mut self, allow_stream: bool) {
        self.options.allow_stream = allow_stream;
    }

    pub fn set_allow_eof(&mut self, allow_eof: bool) {
        self.options.allow_eof = allow_eof;
        self.lexer.set_allow_eof(allow_eof);
    }

    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.options.max_depth = max_depth;
    }

    /// Context used by [`ObjectReader::parse_object`].
    pub fn context(&self) -> &ParseContext {
        &self.context
    }

    pub fn set_context(&mut self, context: ParseContext) {
        self.context = context;
    }

    /// Identity of the indirect object whose body is parsed next, for
    /// collaborators that position the reader behind `id gen obj` themselves.
    pub fn set_object(&mut self, object: ObjectPointer) {
        self.context.object = object;
    }

    pub fn set_decryption(&mut self, crypt: Crypt) {
        self.context = self.context.clone().with_crypt(crypt);
    }

    pub fn clear_decryption(&mut self) {
        self.context.crypt = None;
    }

    /// Read the next object using the reader's own context.
    pub fn parse_object(&mut self) -> Result<Parsed> {
        let ctx = self.context.clone();
        self.parse_object_with(&ctx)
    }

    /// Read the next object using `ctx`.
    ///
    /// Diagnostics noticed before a failing call are kept and handed out with
    /// the next successful one, unless taken with `take_diagnostics`.
    pub fn parse_object_with(&mut self, ctx: &ParseContext) -> Result<Parsed> {
        let object = self.read_object(ctx, 0)?;
        Ok(Parsed {
            object,
            diagnostics: self.lexer.take_diagnostics(),
        })
    }

    /// Like [`ObjectReader::parse_object`], but returns `None` if the input
    /// ends before the next object starts. Input ending inside a token is
    /// still an error unless end of input is allowed.
    pub fn parse_next(&mut self) -> Result<Option<Parsed>> {
        match self.lexer.next_lexeme()? {
            Some(lexeme) => self.lexer.push_back(lexeme),
            None => return Ok(None),
        }
        self.parse_object().map(Some)
    }

    /// Iterate over the remaining top-level objects. Iteration ends at the
    /// end of input or after the first error.
    pub fn objects(&mut self) -> Objects<'_, R> {
        Objects {
            reader: self,
            done: false,
        }
    }

    pub fn read_token(&mut self) -> Result<Option<Token>> {
        self.lexer.read_token()
    }

    pub fn unread_token(&mut self, token: Token) {
        self.lexer.unread_token(token)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.lexer.diagnostics()
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.lexer.take_diagnostics()
    }

    /// Offset of the next byte the lexer reads.
    pub fn offset(&self) -> u64 {
        self.lexer.offset()
    }

    /// Skip ahead to `offset`, e.g. past a stream payload, by reading and
    /// discarding bytes. Pushed back tokens are dropped.
    pub fn seek_forward(&mut self, offset: u64) -> Result<()> {
        self.lexer.seek_forward(offset)
    }

    pub fn into_inner(self) -> R {
        self.lexer.into_source().into_inner()
    }
}

impl<R: Read + Seek> ObjectReader<R> {
    /// Continue at the absolute offset `offset`. Buffered bytes and pushed
    /// back tokens are dropped. Must not be called in the middle of an object.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        self.lexer.seek(offset)
    }
}

pub struct Objects<'r, R> {
    reader: &'r mut ObjectReader<R>,
    done: bool,
}

impl<R: Read> Iterator for Objects<'_, R> {
    type Item = Result<Parsed>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.parse_next().transpose() {
            Some(Ok(parsed)) => Some(Ok(parsed)),
            other => {
                self.done = true;
                other
            }
        }
    }
}
