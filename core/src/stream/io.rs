//! Stream endpoints for the transform.
//!
//! Files and the standard streams are buffered here so the pipeline can
//! issue one small write per block without a syscall each time.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Cursor, ErrorKind, Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use crate::types::StreamError;

/// Shared handle to output captured from an in-memory sink.
pub type CapturedOutput = Arc<Mutex<Vec<u8>>>;

/// Where plaintext (or previously transformed) bytes come from.
pub enum InputSource {
    Reader(Box<dyn Read + Send>),
    File(PathBuf),
    Memory(Vec<u8>),
    Stdin,
}

/// Where transformed bytes go.
pub enum OutputSink {
    Writer(Box<dyn Write + Send>),
    /// Created or truncated on open.
    File(PathBuf),
    /// Discarded unless capture is requested.
    Memory,
    Stdout,
}

pub fn open_input(src: InputSource) -> Result<Box<dyn Read + Send>, StreamError> {
    Ok(match src {
        InputSource::Reader(reader) => reader,
        InputSource::File(path) => {
            log::debug!("[IO] reading {:?}", path);
            Box::new(BufReader::new(File::open(path)?))
        }
        InputSource::Memory(bytes) => Box::new(Cursor::new(bytes)),
        InputSource::Stdin => Box::new(BufReader::new(io::stdin())),
    })
}

/// Open `sink` for writing. With `capture` set, an in-memory sink also
/// returns the buffer its bytes land in; every other sink ignores it.
pub fn open_output(
    sink: OutputSink,
    capture: Option<bool>,
) -> Result<(Box<dyn Write + Send>, Option<CapturedOutput>), StreamError> {
    let writer: Box<dyn Write + Send> = match sink {
        OutputSink::Writer(writer) => writer,
        OutputSink::File(path) => {
            log::debug!("[IO] writing {:?}", path);
            Box::new(BufWriter::new(File::create(path)?))
        }
        OutputSink::Stdout => Box::new(BufWriter::new(io::stdout())),
        OutputSink::Memory if capture == Some(true) => {
            let buf = CapturedOutput::default();
            let writer = SharedBufferWriter { buf: Arc::clone(&buf) };
            return Ok((Box::new(writer), Some(buf)));
        }
        OutputSink::Memory => Box::new(io::sink()),
    };
    Ok((writer, None))
}

/// Appends everything written to a shared capture buffer.
pub struct SharedBufferWriter {
    buf: CapturedOutput,
}

impl Write for SharedBufferWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Read until `buf` is full or the reader reports end of stream.
///
/// Returns the number of bytes read; anything short of `buf.len()` means
/// the stream is exhausted. `Interrupted` reads are retried.
pub fn read_full_or_eof<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;

    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(filled)
}
