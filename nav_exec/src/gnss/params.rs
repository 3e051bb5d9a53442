//! GNSS fix acquisition parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use super::ScanLimit;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Largest accepted timeout, anything longer should be left unbounded.
const MAX_TIMEOUT_S: f64 = 86_400.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for GNSS fix acquisition.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {

    /// Where the receiver's sentences are read from
    pub source: SourceParams,

    /// Prefixes identifying position report sentences. Lines starting with
    /// anything else are ignored.
    #[serde(default = "default_sentence_prefixes")]
    pub sentence_prefixes: Vec<String>,

    /// Maximum number of lines to scan for one fix. Unbounded if not set.
    #[serde(default)]
    pub max_lines_per_fix: Option<u64>,

    /// Maximum time to spend waiting for one fix. Unbounded if not set.
    ///
    /// Units: seconds
    #[serde(default)]
    pub fix_timeout_s: Option<f64>,
}

/// The line source to read sentences from.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum SourceParams {
    /// A serial port connected to the receiver
    Serial {
        /// Port name, e.g. `/dev/ttyUSB0` or `COM10`
        port: String,

        /// Units: bits/second
        baud_rate: u32,

        /// Time after which a blocking read gives up and returns an empty
        /// line.
        ///
        /// Units: seconds
        read_timeout_s: f64,
    },

    /// A recorded file of sentences
    Replay {
        path: PathBuf,
    },
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ParamsError {
    #[error("At least one sentence prefix must be given")]
    NoSentencePrefixes,

    #[error("The maximum number of lines per fix must be greater than zero")]
    ZeroLineLimit,

    #[error("Timeout of {0} s is invalid, expected a value in (0, {1}]")]
    InvalidTimeout(f64, f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Check that the parameters can be used.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.sentence_prefixes.is_empty() {
            return Err(ParamsError::NoSentencePrefixes);
        }

        if self.max_lines_per_fix == Some(0) {
            return Err(ParamsError::ZeroLineLimit);
        }

        if let Some(t) = self.fix_timeout_s {
            check_timeout(t)?;
        }

        if let SourceParams::Serial { read_timeout_s, .. } = self.source {
            check_timeout(read_timeout_s)?;
        }

        Ok(())
    }

    /// Get the scan limit applied to each fix.
    ///
    /// The parameters must have been validated first.
    pub fn scan_limit(&self) -> ScanLimit {
        ScanLimit {
            max_lines: self.max_lines_per_fix,
            timeout: self.fix_timeout_s.map(Duration::from_secs_f64),
        }
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

fn default_sentence_prefixes() -> Vec<String> {
    vec![String::from("$GPGGA")]
}

fn check_timeout(timeout_s: f64) -> Result<(), ParamsError> {
    if timeout_s.is_finite() && timeout_s > 0.0 && timeout_s <= MAX_TIMEOUT_S {
        Ok(())
    } else {
        Err(ParamsError::InvalidTimeout(timeout_s, MAX_TIMEOUT_S))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_serial_params() {
        let p: Params = util::params::from_str(
            r#"
            [source]
            type = "Serial"
            port = "/dev/ttyUSB0"
            baud_rate = 9600
            read_timeout_s = 1.0
            "#,
        )
        .unwrap();

        assert!(p.validate().is_ok());
        assert_eq!(p.sentence_prefixes, vec![String::from("$GPGGA")]);
        assert_eq!(p.scan_limit(), ScanLimit::unbounded());
        assert!(matches!(
            p.source,
            SourceParams::Serial { baud_rate: 9600, .. }
        ));
    }

    #[test]
    fn test_replay_params_with_limits() {
        let p: Params = util::params::from_str(
            r#"
            sentence_prefixes = ["$GPGGA", "$GNGGA"]
            max_lines_per_fix = 50
            fix_timeout_s = 2.5

            [source]
            type = "Replay"
            path = "logs/drive.nmea"
            "#,
        )
        .unwrap();

        assert!(p.validate().is_ok());
        assert_eq!(p.sentence_prefixes.len(), 2);
        assert_eq!(
            p.scan_limit(),
            ScanLimit {
                max_lines: Some(50),
                timeout: Some(Duration::from_millis(2500)),
            }
        );
    }

    #[test]
    fn test_invalid_params() {
        let mut p: Params = util::params::from_str(
            r#"
            [source]
            type = "Replay"
            path = "drive.nmea"
            "#,
        )
        .unwrap();

        p.fix_timeout_s = Some(-1.0);
        assert!(matches!(p.validate(), Err(ParamsError::InvalidTimeout(..))));

        p.fix_timeout_s = None;
        p.max_lines_per_fix = Some(0);
        assert!(matches!(p.validate(), Err(ParamsError::ZeroLineLimit)));

        p.max_lines_per_fix = None;
        p.sentence_prefixes.clear();
        assert!(matches!(p.validate(), Err(ParamsError::NoSentencePrefixes)));
    }
}
