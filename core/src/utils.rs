use std::io::{self, Write};

use crc32fast::Hasher;

/// CRC32 of a complete buffer.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Writer adapter that keeps a running CRC32 of every byte accepted by the
/// inner writer.
pub struct ChecksumWriter<W: Write> {
    inner: W,
    hasher: Option<Hasher>,
}

impl<W: Write> ChecksumWriter<W> {
    pub fn new(inner: W, enabled: bool) -> Self {
        Self {
            inner,
            hasher: enabled.then(Hasher::new),
        }
    }

    /// Checksum of the bytes written so far, `None` when disabled.
    pub fn checksum(&self) -> Option<u32> {
        self.hasher.as_ref().map(|h| h.clone().finalize())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for ChecksumWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        if let Some(hasher) = self.hasher.as_mut() {
            hasher.update(&buf[..n]);
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Lowercase hex preview of the first `max` bytes, for trace logs.
pub fn hex_preview(data: &[u8], max: usize) -> String {
    let shown = &data[..data.len().min(max)];
    if data.len() > max {
        format!("{}..", hex::encode(shown))
    } else {
        hex::encode(shown)
    }
}
