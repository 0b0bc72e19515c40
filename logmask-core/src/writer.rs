// logmask-core/src/writer.rs
//! `io::Write` adaptor that masks text line by line before forwarding it.

use std::io::{self, Write};

use crate::engine::Redactor;

/// Buffers written bytes and forwards each completed line, masked, to `inner`.
///
/// A trailing partial line is held back until more data completes it or
/// [`flush`](Write::flush) is called. Bytes that are not valid UTF-8 are
/// forwarded unchanged and split the line into separately masked runs.
pub struct MaskingWriter<W, R> {
    inner: W,
    redactor: R,
    buffer: Vec<u8>,
}

impl<W, R> MaskingWriter<W, R>
where
    W: Write,
    R: Redactor,
{
    pub fn new(inner: W, redactor: R) -> Self {
        Self {
            inner,
            redactor,
            buffer: Vec::new(),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Flushes any partial line and returns the wrapped writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.flush()?;
        Ok(self.inner)
    }

    fn write_masked(&mut self, line: &[u8]) -> io::Result<()> {
        if let Ok(text) = std::str::from_utf8(line) {
            let masked = self.redactor.redact(text);
            return self.inner.write_all(masked.as_bytes());
        }

        for chunk in line.utf8_chunks() {
            let masked = self.redactor.redact(chunk.valid());
            self.inner.write_all(masked.as_bytes())?;
            self.inner.write_all(chunk.invalid())?;
        }
        Ok(())
    }

    fn flush_lines(&mut self) -> io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.write_masked(&line[..pos])?;
            self.inner.write_all(b"\n")?;
        }
        Ok(())
    }
}

impl<W, R> Write for MaskingWriter<W, R>
where
    W: Write,
    R: Redactor,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_lines()?;
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            self.write_masked(&rest)?;
        }
        self.inner.flush()
    }
}
