//! # GNSS fix acquisition module
//!
//! The [`FixReader`] turns the noisy, possibly endless stream of lines from a GNSS receiver into
//! a single trustworthy position. Each call to [`FixReader::next_fix`] scans lines until one
//! of:
//!
//! - a position report with a usable fix is found, which is returned immediately,
//! - the line source fails or ends, or the parser faults, which is returned as an error,
//! - the scan limit is reached, which is returned as a timeout.
//!
//! Everything else is recovered locally: lines which are not position reports are skipped,
//! non-ASCII bytes are stripped from lines before they are checked, over-long lines and lines
//! which cannot be parsed are logged and skipped, and reports without a fix are logged as
//! "waiting for fix" and skipped. The count of each is kept in the
//! [`ScanStats`] of the call.
//!
//! A position is only accepted with a GPS or DGPS quality indicator and with both coordinates
//! non-zero. Receivers commonly report zero coordinates before their first fix, so a position
//! exactly on the equator or prime meridian will never be accepted.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod line_source;
mod params;
mod parser;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace, warn};
use serde::Serialize;
use std::time::{Duration, Instant};

// Internal
pub use line_source::*;
pub use params::*;
pub use parser::*;
use comms_if::eqpt::gnss::GeoPoint;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Reads validated fixes from a line source.
pub struct FixReader<S, P> {
    source: S,
    parser: P,

    /// Prefixes of the lines which will be parsed
    sentence_prefixes: Vec<String>,

    /// Bounds on each call to `next_fix`
    limit: ScanLimit,

    /// Statistics from the most recent call to `next_fix`
    last_scan: ScanStats,
}

/// Bounds applied to a single scan for a fix.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScanLimit {
    /// Maximum number of lines to read.
    pub max_lines: Option<u64>,

    /// Maximum time to spend scanning. Only checked between lines, so a blocked read is not
    /// interrupted.
    pub timeout: Option<Duration>,
}

/// Counts of what was seen during one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Total lines read from the source
    pub lines: u64,

    /// Lines which weren't position reports
    pub ignored: u64,

    /// Lines which had non-ASCII bytes stripped, or were too long to buffer
    pub decode_errors: u64,

    /// Position reports which couldn't be parsed
    pub parse_errors: u64,

    /// Position reports without a usable fix
    pub no_fix: u64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Terminal failures of a scan for a fix.
#[derive(Debug, thiserror::Error)]
pub enum FixReaderError {
    #[error("The GNSS line source failed: {0}")]
    SourceError(LineSourceError),

    #[error("The GNSS sentence parser failed: {0}")]
    ParserFault(String),

    #[error("The GNSS line source ended before a fix was acquired")]
    EndOfStream,

    #[error("No valid fix was found in {lines} lines")]
    LineLimitReached { lines: u64 },

    #[error("No valid fix was found within {0:?}")]
    Timeout(Duration),
}

/// What happened to a single line.
#[derive(Debug, PartialEq)]
enum LineOutcome {
    Ignored,
    DecodeError,
    ParseError,
    NoFix,
    Fix(GeoPoint),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<S, P> FixReader<S, P>
where
    S: LineSource,
    P: SentenceParser,
{
    /// Create a new reader which accepts `$GPGGA` sentences and has no scan limit.
    pub fn new(source: S, parser: P) -> Self {
        Self {
            source,
            parser,
            sentence_prefixes: vec![String::from("$GPGGA")],
            limit: ScanLimit::unbounded(),
            last_scan: ScanStats::default(),
        }
    }

    /// Create a new reader from the GNSS parameters.
    pub fn from_params(source: S, parser: P, params: &Params) -> Self {
        Self::new(source, parser)
            .with_sentence_prefixes(params.sentence_prefixes.clone())
            .with_limit(params.scan_limit())
    }

    /// Set the prefixes identifying position report lines.
    pub fn with_sentence_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.sentence_prefixes = prefixes;
        self
    }

    /// Set the limit applied to each scan.
    pub fn with_limit(mut self, limit: ScanLimit) -> Self {
        self.limit = limit;
        self
    }

    /// Statistics from the most recent scan.
    pub fn last_scan(&self) -> &ScanStats {
        &self.last_scan
    }

    /// Scan the line source until a valid fix is found.
    ///
    /// This blocks on the line source. Without a scan limit it will keep scanning for as long
    /// as the source keeps producing lines.
    pub fn next_fix(&mut self) -> Result<GeoPoint, FixReaderError> {
        let start = Instant::now();
        self.last_scan = ScanStats::default();

        loop {
            // Check limits before blocking on the next line
            if let Some(max_lines) = self.limit.max_lines {
                if self.last_scan.lines >= max_lines {
                    return Err(FixReaderError::LineLimitReached {
                        lines: self.last_scan.lines,
                    });
                }
            }
            if let Some(timeout) = self.limit.timeout {
                if start.elapsed() >= timeout {
                    return Err(FixReaderError::Timeout(timeout));
                }
            }

            let line = match self.source.read_line() {
                Ok(Some(l)) => l,
                Ok(None) => return Err(FixReaderError::EndOfStream),
                Err(LineSourceError::LineTooLong(max)) => {
                    warn!("Discarded a GNSS line longer than {} bytes", max);
                    self.last_scan.lines += 1;
                    self.last_scan.decode_errors += 1;
                    continue;
                }
                Err(e) => return Err(FixReaderError::SourceError(e)),
            };
            self.last_scan.lines += 1;

            match self.scan_line(&line)? {
                LineOutcome::Fix(point) => {
                    debug!("Fix acquired after {:?}: {:?}", start.elapsed(), self.last_scan);
                    return Ok(point);
                }
                LineOutcome::Ignored => self.last_scan.ignored += 1,
                LineOutcome::DecodeError => self.last_scan.decode_errors += 1,
                LineOutcome::ParseError => self.last_scan.parse_errors += 1,
                LineOutcome::NoFix => self.last_scan.no_fix += 1,
            }
        }
    }

    /// Classify a single line, returning an error only for fatal parser failures.
    fn scan_line(&mut self, line: &[u8]) -> Result<LineOutcome, FixReaderError> {
        // Decode, skipping any bytes which aren't ASCII
        let text: String = line
            .iter()
            .filter(|b| b.is_ascii())
            .map(|&b| char::from(b))
            .collect();
        let stripped = line.len() - text.len();
        let text = text.trim();

        if stripped > 0 {
            warn!("Skipped {} non-ASCII bytes in GNSS line", stripped);

            if text.is_empty() {
                return Ok(LineOutcome::DecodeError);
            }
            self.last_scan.decode_errors += 1;
        }

        // Only position reports are of interest
        if !self.sentence_prefixes.iter().any(|p| text.starts_with(p.as_str())) {
            trace!("Ignoring GNSS line {:?}", text);
            return Ok(LineOutcome::Ignored);
        }

        let sentence = match self.parser.parse(text) {
            Ok(s) => s,
            Err(ParseError::Malformed(e)) => {
                warn!("Could not parse NMEA sentence {:?}: {}", text, e);
                return Ok(LineOutcome::ParseError);
            }
            Err(ParseError::Fault(e)) => return Err(FixReaderError::ParserFault(e)),
        };

        if !sentence.has_valid_fix() {
            info!(
                "Waiting for GNSS fix (quality: {:?}, satellites: {})",
                sentence.quality,
                sentence
                    .satellites
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| String::from("unknown"))
            );
            return Ok(LineOutcome::NoFix);
        }

        match GeoPoint::new(sentence.latitude, sentence.longitude) {
            Ok(p) => Ok(LineOutcome::Fix(p)),
            Err(e) => {
                warn!("Discarding GNSS position: {}", e);
                Ok(LineOutcome::ParseError)
            }
        }
    }
}

impl ScanLimit {
    /// No limit, scan until a fix is found or the source fails.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Limit the number of lines read.
    pub fn lines(max_lines: u64) -> Self {
        Self {
            max_lines: Some(max_lines),
            timeout: None,
        }
    }

    /// Limit the time spent scanning.
    pub fn timeout(timeout: Duration) -> Self {
        Self {
            max_lines: None,
            timeout: Some(timeout),
        }
    }
}

impl FixReaderError {
    /// Returns true if the scan gave up because of its limit rather than a failure.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            FixReaderError::LineLimitReached { .. } | FixReaderError::Timeout(_)
        )
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
