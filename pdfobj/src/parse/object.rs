use std::io::Read;

use log::{debug, trace};

use crate::{
    error::{Error, Result},
    parse::{
        crypt::ParseContext,
        error::DiagnosticKind,
        lexer::{Lexeme, Token},
        ObjectReader,
    },
    pdf::{Array, Dictionary, IndirectObject, Object, ObjectPointer, Stream},
};

const NULL: &[u8] = b"null";
const ARRAY_START: &[u8] = b"[";
const ARRAY_END: &[u8] = b"]";
const DICT_START: &[u8] = b"<<";
const DICT_END: &[u8] = b">>";
const REFERENCE: &[u8] = b"R";
const OBJ: &[u8] = b"obj";
const ENDOBJ: &[u8] = b"endobj";
const STREAM: &[u8] = b"stream";

impl<R: Read> ObjectReader<R> {
    pub(crate) fn read_object(&mut self, ctx: &ParseContext, depth: usize) -> Result<Object> {
        if depth > self.options.max_depth {
            return Err(Error::NestingTooDeep {
                limit: self.options.max_depth,
                offset: self.lexer.offset(),
            });
        }

        let object = match self.lexer.read_token()?.ok_or(Error::EndOfInput)? {
            Token::Keyword(kw) => {
                return match &kw[..] {
                    NULL => Ok(Object::Null),
                    DICT_START => self.read_dictionary(ctx, depth),
                    ARRAY_START => self.read_array(ctx, depth),
                    _ => Err(Error::UnexpectedKeyword {
                        keyword: kw.to_string(),
                        offset: self.lexer.token_offset(),
                    }),
                }
            }
            Token::String(data) => Object::String(ctx.decrypt(data).into()),
            Token::Bool(b) => Object::Bool(b),
            Token::Integer(i) => Object::Integer(i),
            Token::Real(r) => Object::Real(r),
            Token::Name(n) => Object::Name(n),
        };

        if !self.options.allow_objptr {
            return Ok(object);
        }

        match object {
            Object::Integer(id) => match u32::try_from(id) {
                Ok(id) => self.read_indirect(ctx, id, depth),
                Err(_) => Ok(object),
            },
            _ => Ok(object),
        }
    }

    /// Decide whether the integer `id` starts `id gen R` or `id gen obj`.
    /// Tokens that don't fit are pushed back in reverse order.
    fn read_indirect(&mut self, ctx: &ParseContext, id: u32, depth: usize) -> Result<Object> {
        let fallback = Object::Integer(i64::from(id));

        let second = match self.lookahead()? {
            Some(lexeme) => lexeme,
            None => return Ok(fallback),
        };
        let generation = match &second.token {
            Token::Integer(gen) => u16::try_from(*gen).ok(),
            _ => None,
        };
        let generation = match generation {
            Some(generation) => generation,
            None => {
                self.lexer.push_back(second);
                return Ok(fallback);
            }
        };

        let third = match self.lookahead()? {
            Some(lexeme) => lexeme,
            None => {
                self.lexer.push_back(second);
                return Ok(fallback);
            }
        };
        let pointer = ObjectPointer::new(id, generation);

        // definitions only start at the top level
        let is_definition = third.token.is_keyword(OBJ) && depth == 0;
        if third.token.is_keyword(REFERENCE) || is_definition {
            self.lexer.accept(second);
            self.lexer.accept(third);
            return if is_definition {
                self.read_definition(ctx, pointer, depth)
            } else {
                Ok(Object::Reference(pointer))
            };
        }

        trace!("{} {} is not followed by R or obj", id, generation);
        self.lexer.push_back(third);
        self.lexer.push_back(second);
        Ok(fallback)
    }

    fn read_definition(
        &mut self,
        ctx: &ParseContext,
        pointer: ObjectPointer,
        depth: usize,
    ) -> Result<Object> {
        let inner = ctx.with_object(pointer);
        let object = self.read_object(&inner, depth + 1)?;

        // streams end with `endstream`, which only whoever reads the payload
        // gets to see
        if !matches!(object, Object::Stream(_)) {
            match self.lookahead()? {
                Some(lexeme) if lexeme.token.is_keyword(ENDOBJ) => {
                    self.lexer.accept(lexeme);
                }
                other => {
                    self.lexer.diagnose(DiagnosticKind::MissingEndobj);
                    if let Some(lexeme) = other {
                        self.lexer.push_back(lexeme);
                    }
                }
            }
        }

        Ok(Object::Indirect(IndirectObject::new(pointer, object)))
    }

    fn read_array(&mut self, ctx: &ParseContext, depth: usize) -> Result<Object> {
        let mut array = Array::new();
        loop {
            match self.lexer.read_token()? {
                None => break,
                Some(token) if token.is_keyword(ARRAY_END) => break,
                Some(token) => {
                    self.lexer.unread_token(token);
                    array.push(self.read_object(ctx, depth + 1)?);
                }
            }
        }

        Ok(Object::Array(array))
    }

    fn read_dictionary(&mut self, ctx: &ParseContext, depth: usize) -> Result<Object> {
        let mut dict = Dictionary::default();
        loop {
            let key = match self.lexer.read_token()? {
                None => break,
                Some(token) if token.is_keyword(DICT_END) => break,
                Some(Token::Name(key)) => key,
                Some(token) => {
                    trace!("skipping dictionary key {:?}", token);
                    self.lexer.diagnose(DiagnosticKind::NonNameDictKey);
                    continue;
                }
            };
            let value = self.read_object(ctx, depth + 1)?;
            dict.insert(key, value);
        }

        if !self.options.allow_stream {
            return Ok(Object::Dictionary(dict));
        }

        match self.lookahead()? {
            Some(lexeme) if lexeme.token.is_keyword(STREAM) => {
                self.lexer.accept(lexeme);
            }
            Some(lexeme) => {
                self.lexer.push_back(lexeme);
                return Ok(Object::Dictionary(dict));
            }
            None => return Ok(Object::Dictionary(dict)),
        }

        self.read_stream_start()?;
        let payload_offset = self.lexer.offset();
        debug!("stream of object {} starts at offset {}", ctx.object, payload_offset);

        Ok(Object::Stream(Stream {
            dictionary: dict,
            pointer: ctx.object,
            payload_offset,
        }))
    }

    /// Consume the end-of-line after `stream`: CR LF, a lone LF or a lone CR.
    fn read_stream_start(&mut self) -> Result<()> {
        let source = self.lexer.source_mut();
        let offset = source.current_offset();
        match source.read_byte()? {
            Some(b'\r') => {
                if source.read_byte()? != Some(b'\n') {
                    source.unread_byte();
                }
                Ok(())
            }
            Some(b'\n') => Ok(()),
            _ => Err(Error::MalformedStreamStart { offset }),
        }
    }

    /// Read a token that may or may not belong to the current object. Input
    /// ending between tokens yields `None`. Lexical failures, running out of
    /// input inside a token among them, are deferred to the next read, so the
    /// object read so far is still returned.
    fn lookahead(&mut self) -> Result<Option<Lexeme>> {
        match self.lexer.next_lexeme() {
            Ok(lexeme) => Ok(lexeme),
            Err(err @ Error::Io(_)) => Err(err),
            Err(err) => {
                self.lexer.defer_error(err);
                Ok(None)
            }
        }
    }
}
