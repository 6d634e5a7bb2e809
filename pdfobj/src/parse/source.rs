use std::io::{ErrorKind, Read, Seek, SeekFrom};

use crate::error::{Error, Result};

const BUFFER_SIZE: usize = 4096;

/// Buffered cursor over a byte reader that knows its absolute offset.
///
/// One byte of pushback is supported, also across refills of the internal
/// buffer.
pub struct ByteSource<R> {
    inner: R,
    buf: Vec<u8>,
    pos: usize,
    /// Absolute offset of the byte following the end of `buf`.
    offset: u64,
    can_unread: bool,
    allow_eof: bool,
}

impl<R: Read> ByteSource<R> {
    pub fn new(inner: R) -> Self {
        Self::at_offset(inner, 0)
    }

    /// `offset` is the absolute position `inner` currently reads from.
    pub fn at_offset(inner: R, offset: u64) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(BUFFER_SIZE + 1),
            pos: 0,
            offset,
            can_unread: false,
            allow_eof: false,
        }
    }

    /// When set, running out of input makes `read_byte` return `None`
    /// instead of failing with [`Error::EndOfInput`].
    pub fn set_allow_eof(&mut self, allow_eof: bool) {
        self.allow_eof = allow_eof;
    }

    pub fn allow_eof(&self) -> bool {
        self.allow_eof
    }

    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        if self.pos >= self.buf.len() && !self.fill()? {
            self.can_unread = false;
            return if self.allow_eof {
                Ok(None)
            } else {
                Err(Error::EndOfInput)
            };
        }

        let c = self.buf[self.pos];
        self.pos += 1;
        self.can_unread = true;
        Ok(Some(c))
    }

    /// Push back the byte returned by the last successful `read_byte`. Does
    /// nothing if there is no such byte or it was already pushed back.
    pub fn unread_byte(&mut self) {
        if self.can_unread && self.pos > 0 {
            self.pos -= 1;
            self.can_unread = false;
        }
    }

    /// Absolute offset of the next byte `read_byte` returns.
    pub fn current_offset(&self) -> u64 {
        self.offset - (self.buf.len() - self.pos) as u64
    }

    /// Skip ahead to `target` by reading and discarding bytes. Targets behind
    /// the current offset are ignored.
    pub fn seek_forward(&mut self, target: u64) -> Result<()> {
        if target <= self.current_offset() {
            return Ok(());
        }

        while self.offset < target {
            self.pos = self.buf.len();
            if !self.fill()? {
                self.can_unread = false;
                return if self.allow_eof {
                    Ok(())
                } else {
                    Err(Error::EndOfInput)
                };
            }
        }

        // target lies within the chunk that was read last
        self.pos = self.buf.len() - (self.offset - target) as usize;
        self.can_unread = false;
        Ok(())
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Read the next chunk. The previously last byte is kept in front of it so
    /// that `unread_byte` keeps working. Returns `false` at the end of input.
    fn fill(&mut self) -> Result<bool> {
        let mut chunk = [0u8; BUFFER_SIZE];
        let n = loop {
            match self.inner.read(&mut chunk) {
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        };
        if n == 0 {
            return Ok(false);
        }

        let lookbehind = self.buf.last().copied();
        self.buf.clear();
        self.buf.extend(lookbehind);
        self.pos = self.buf.len();
        self.buf.extend_from_slice(&chunk[..n]);
        self.offset += n as u64;

        Ok(true)
    }
}

impl<R: Read + Seek> ByteSource<R> {
    /// Reposition to the absolute offset `offset`, dropping buffered bytes.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        self.buf.clear();
        self.pos = 0;
        self.offset = offset;
        self.can_unread = false;
        Ok(())
    }
}
