//! # Line sources
//!
//! A line source supplies the raw, newline delimited output of the GNSS receiver one line at a
//! time. Sources are read by exactly one [`super::FixReader`].

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    fs::File,
    io::{BufRead, BufReader, ErrorKind},
    path::Path,
    time::Duration,
};

use log::info;
use serialport::SerialPort;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Longest line kept by a [`BufLineSource`], including its terminator. NMEA sentences are at
/// most 82 characters.
pub const MAX_LINE_LEN: usize = 256;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A sequential supplier of raw text lines.
pub trait LineSource {
    /// Read the next line, blocking until one is available.
    ///
    /// Returns `Ok(None)` once the end of the stream is reached. A source whose read timed out
    /// without a complete line returns an empty line rather than an error. Line terminators are
    /// not stripped.
    fn read_line(&mut self) -> Result<Option<Vec<u8>>, LineSourceError>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A line source reading from any buffered reader, such as a serial port or a replay file.
///
/// Lines longer than [`MAX_LINE_LEN`] are discarded and reported as
/// [`LineSourceError::LineTooLong`], so a stream without terminators can't grow the buffer.
pub struct BufLineSource<R> {
    reader: R,

    /// Bytes of a line which were received before a read timed out.
    pending: Vec<u8>,
}

/// Line source reading from a serial port.
pub type SerialLineSource = BufLineSource<BufReader<Box<dyn SerialPort>>>;

/// Line source replaying a recorded file of sentences.
pub type ReplayLineSource = BufLineSource<BufReader<File>>;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LineSourceError {
    #[error("Could not open the serial port {0}: {1}")]
    SerialOpenError(String, serialport::Error),

    #[error("Could not open the replay file: {0}")]
    FileOpenError(std::io::Error),

    #[error("Could not read from the line source: {0}")]
    ReadError(std::io::Error),

    /// Recoverable, the rest of the line is returned as the start of the next one.
    #[error("Discarded a line longer than {0} bytes")]
    LineTooLong(usize),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<R: BufRead> BufLineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: Vec::new(),
        }
    }
}

impl<R: BufRead> LineSource for BufLineSource<R> {
    fn read_line(&mut self) -> Result<Option<Vec<u8>>, LineSourceError> {
        loop {
            let available = match self.reader.fill_buf() {
                Ok(a) => a,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                // Anything received so far stays in `pending` and is completed by the next read
                Err(e) if e.kind() == ErrorKind::TimedOut || e.kind() == ErrorKind::WouldBlock => {
                    return Ok(Some(Vec::new()))
                }
                Err(e) => return Err(LineSourceError::ReadError(e)),
            };

            // End of stream, flushing out any line left without a terminator
            if available.is_empty() {
                if self.pending.is_empty() {
                    return Ok(None);
                } else {
                    return Ok(Some(std::mem::take(&mut self.pending)));
                }
            }

            let room = MAX_LINE_LEN - self.pending.len();
            let end = available.iter().position(|&b| b == b'\n').map(|i| i + 1);

            match end {
                Some(n) if n <= room => {
                    self.pending.extend_from_slice(&available[..n]);
                    self.reader.consume(n);
                    return Ok(Some(std::mem::take(&mut self.pending)));
                }
                None if available.len() <= room => {
                    let n = available.len();
                    self.pending.extend_from_slice(available);
                    self.reader.consume(n);
                }
                _ => {
                    // Drop what fits, the remainder starts a new line
                    self.reader.consume(room);
                    self.pending.clear();
                    return Err(LineSourceError::LineTooLong(MAX_LINE_LEN));
                }
            }
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Open a serial port as a line source.
///
/// `read_timeout` bounds how long a single read may block, after which the source reports an
/// empty line.
pub fn open_serial(
    port: &str,
    baud_rate: u32,
    read_timeout: Duration,
) -> Result<SerialLineSource, LineSourceError> {
    let serial = serialport::new(port, baud_rate)
        .timeout(read_timeout)
        .open()
        .map_err(|e| LineSourceError::SerialOpenError(port.to_string(), e))?;

    info!("Opened serial port {} at {} baud", port, baud_rate);

    Ok(BufLineSource::new(BufReader::new(serial)))
}

/// Open a recorded sentence file as a line source.
pub fn open_replay<P: AsRef<Path>>(path: P) -> Result<ReplayLineSource, LineSourceError> {
    let file = File::open(path.as_ref()).map_err(LineSourceError::FileOpenError)?;

    info!("Replaying GNSS sentences from {:?}", path.as_ref());

    Ok(BufLineSource::new(BufReader::new(file)))
}
