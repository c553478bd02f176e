//! Bounded line-oriented reads over the byte stream
//!
//! The MIME structure of a BDF file is text, its attachments are not. The
//! scanner reads text a line at a time and binary payloads by exact byte
//! count, keeping track of the absolute stream offset either way.

use std::io::{BufRead, Read};

use super::mime::{closing_delimiter, delimiter, split_header_field};
use super::BdfError;

pub(crate) struct LineScanner<R: BufRead> {
    inner: R,
    current: String,
    offset: u64,
    eof: bool,
    buf: Vec<u8>,
}

impl<R: BufRead> LineScanner<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self {
            inner,
            current: String::new(),
            offset: 0,
            eof: false,
            buf: Vec::with_capacity(256),
        }
    }

    /// Byte offset of the next unread byte
    pub(crate) fn position(&self) -> u64 {
        self.offset
    }

    /// The line most recently read, without its line terminator
    pub(crate) fn current_line(&self) -> &str {
        &self.current
    }

    /// Read the next line into the current line buffer
    ///
    /// Past the end of the stream every line reads as empty.
    pub(crate) fn next_line(&mut self) -> Result<&str, BdfError> {
        self.buf.clear();
        let n = self.inner.read_until(b'\n', &mut self.buf)?;
        self.offset += n as u64;
        if n == 0 {
            self.eof = true;
        }

        while matches!(self.buf.last(), Some(b'\n' | b'\r')) {
            self.buf.pop();
        }
        self.current = String::from_utf8_lossy(&self.buf).into_owned();
        Ok(&self.current)
    }

    /// Read lines until an empty one
    ///
    /// At most `max_lines` other lines may come first, so up to
    /// `max_lines + 1` lines are read.
    pub(crate) fn skip_until_empty_line(&mut self, max_lines: usize) -> Result<(), BdfError> {
        for _ in 0..=max_lines {
            let empty = self.next_line()?.trim().is_empty();
            if empty && !self.eof {
                return Ok(());
            }
            log::trace!("skipping '{}'", self.current);
        }
        Err(self.bound_exceeded(format!(
            "could not find an empty line within {} lines",
            max_lines
        )))
    }

    /// Read lines until one opens with the boundary delimiter, skipping at
    /// most `max_lines` lines before it
    pub(crate) fn require_boundary(&mut self, boundary: &str, max_lines: usize) -> Result<(), BdfError> {
        let wanted = delimiter(boundary);
        for _ in 0..=max_lines {
            if self.next_line()?.starts_with(&wanted) {
                return Ok(());
            }
        }
        Err(self.bound_exceeded(format!(
            "could not find the boundary '{}' within {} lines",
            wanted, max_lines
        )))
    }

    /// Accumulate lines until one opens with the boundary delimiter
    ///
    /// Lines are trimmed and joined with `\n`. The body may hold at most
    /// `max_lines` lines; the delimiter line is read on top of those and
    /// left as the current line.
    pub(crate) fn accumulate_until_boundary(
        &mut self,
        boundary: &str,
        max_lines: usize,
    ) -> Result<String, BdfError> {
        let wanted = delimiter(boundary);
        let mut lines: Vec<String> = Vec::new();
        for _ in 0..=max_lines {
            let line = self.next_line()?;
            if line.starts_with(&wanted) {
                return Ok(lines.join("\n"));
            }
            lines.push(line.trim().to_string());
        }
        Err(self.bound_exceeded(format!(
            "could not find the boundary '{}' within {} lines",
            wanted, max_lines
        )))
    }

    /// Read the next line and require it to be the header field `name`
    ///
    /// `name` must be uppercase. Returns the trimmed field value.
    pub(crate) fn require_header_field(&mut self, name: &str) -> Result<String, BdfError> {
        let offset = self.offset;
        self.next_line()?;
        if self.eof {
            return Err(BdfError::format(
                format!("unexpected end of stream while looking for '{}'", name),
                offset,
            ));
        }
        match split_header_field(&self.current) {
            Some((field, value)) if field == name => Ok(value),
            _ => Err(BdfError::format(
                format!("expected header field '{}', found '{}'", name, self.current),
                offset,
            )),
        }
    }

    /// Whether the current line opens with the delimiter of `boundary`
    pub(crate) fn at_boundary(&self, boundary: &str) -> bool {
        self.current.starts_with(&delimiter(boundary))
    }

    /// Whether the current line is the closing delimiter of `boundary`
    pub(crate) fn at_closing_boundary(&self, boundary: &str) -> bool {
        self.current.trim_end() == closing_delimiter(boundary)
    }

    /// Read up to `len` bytes, fewer only if the stream ends
    pub(crate) fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, BdfError> {
        let mut data = Vec::with_capacity(len.min(1 << 20));
        let n = Read::take(&mut self.inner, len as u64).read_to_end(&mut data)?;
        self.offset += n as u64;
        if n < len {
            self.eof = true;
        }
        Ok(data)
    }

    fn bound_exceeded(&self, message: String) -> BdfError {
        BdfError::format(message, self.offset)
    }
}
