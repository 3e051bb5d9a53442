//! Parameters for the navigation executable

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::PathBuf;

use serde::Deserialize;

use crate::gnss::{self, SourceParams};
use comms_if::eqpt::gnss::{GeoPoint, GeoPointError};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Baud rate used when a port is given on the command line without one.
const DEFAULT_BAUD_RATE: u32 = 9600;

/// Serial read timeout used when a port is given on the command line.
///
/// Units: seconds
const DEFAULT_READ_TIMEOUT_S: f64 = 1.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the navigation executable.
#[derive(Debug, Clone, Deserialize)]
pub struct NavExecParams {
    /// The position to navigate to
    pub target: GeoPoint,

    /// Stop once the target is within NavCtrl's arrival radius
    #[serde(default = "default_stop_on_arrival")]
    pub stop_on_arrival: bool,

    /// Keep scanning after a scan limit is reached instead of exiting
    #[serde(default)]
    pub retry_on_timeout: bool,
}

/// Values given on the command line which replace those in the parameter files.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub replay: Option<PathBuf>,
    pub port: Option<String>,
    pub baud: Option<u32>,
    pub max_lines: Option<u64>,
    pub timeout_s: Option<f64>,
    pub target_lat: Option<f64>,
    pub target_lon: Option<f64>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum OverrideError {
    #[error("A replay file and a serial port cannot both be given")]
    ReplayAndSerial,

    #[error("The target latitude and longitude must be given together")]
    IncompleteTarget,

    #[error("Invalid target: {0}")]
    InvalidTarget(GeoPointError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Overrides {
    /// Apply the overrides to the loaded parameters.
    ///
    /// The GNSS parameters should be validated afterwards.
    pub fn apply(
        &self,
        exec: &mut NavExecParams,
        gnss: &mut gnss::Params,
    ) -> Result<(), OverrideError> {
        match (self.target_lat, self.target_lon) {
            (Some(lat), Some(lon)) => {
                exec.target = GeoPoint::new(lat, lon).map_err(OverrideError::InvalidTarget)?
            }
            (None, None) => (),
            _ => return Err(OverrideError::IncompleteTarget),
        }

        if self.replay.is_some() && (self.port.is_some() || self.baud.is_some()) {
            return Err(OverrideError::ReplayAndSerial);
        }

        if let Some(ref path) = self.replay {
            gnss.source = SourceParams::Replay { path: path.clone() };
        }

        if self.port.is_some() || self.baud.is_some() {
            // Start from the file's serial settings if there are any
            let (mut port, mut baud_rate, read_timeout_s) = match gnss.source {
                SourceParams::Serial {
                    ref port,
                    baud_rate,
                    read_timeout_s,
                } => (port.clone(), baud_rate, read_timeout_s),
                SourceParams::Replay { .. } => {
                    (String::new(), DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT_S)
                }
            };

            if let Some(ref p) = self.port {
                port = p.clone();
            }
            if let Some(b) = self.baud {
                baud_rate = b;
            }

            gnss.source = SourceParams::Serial {
                port,
                baud_rate,
                read_timeout_s,
            };
        }

        if self.max_lines.is_some() {
            gnss.max_lines_per_fix = self.max_lines;
        }
        if self.timeout_s.is_some() {
            gnss.fix_timeout_s = self.timeout_s;
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

fn default_stop_on_arrival() -> bool {
    true
}

#[cfg(test)]
mod test {
    use super::*;

    fn load() -> (NavExecParams, gnss::Params) {
        let exec = util::params::from_str(
            r#"
            [target]
            latitude = 56.1005245
            longitude = 54.2337052
            "#,
        )
        .unwrap();

        let gnss = util::params::from_str(
            r#"
            [source]
            type = "Serial"
            port = "COM10"
            baud_rate = 4800
            read_timeout_s = 0.5
            "#,
        )
        .unwrap();

        (exec, gnss)
    }

    #[test]
    fn test_exec_params() {
        let (exec, _) = load();

        assert_eq!(exec.target, GeoPoint::new(56.1005245, 54.2337052).unwrap());
        assert!(exec.stop_on_arrival);
        assert!(!exec.retry_on_timeout);

        let bad: Result<NavExecParams, _> = util::params::from_str(
            r#"
            [target]
            latitude = 156.0
            longitude = 54.0
            "#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_no_overrides() {
        let (mut exec, mut gnss) = load();
        Overrides::default().apply(&mut exec, &mut gnss).unwrap();

        assert_eq!(exec.target.latitude(), 56.1005245);
        assert!(matches!(
            gnss.source,
            SourceParams::Serial { baud_rate: 4800, .. }
        ));
        assert_eq!(gnss.max_lines_per_fix, None);
    }

    #[test]
    fn test_overrides() {
        let (mut exec, mut gnss) = load();
        let overrides = Overrides {
            port: Some(String::from("/dev/ttyACM0")),
            max_lines: Some(100),
            timeout_s: Some(5.0),
            target_lat: Some(-33.9),
            target_lon: Some(151.2),
            ..Overrides::default()
        };
        overrides.apply(&mut exec, &mut gnss).unwrap();

        assert_eq!(exec.target, GeoPoint::new(-33.9, 151.2).unwrap());
        match gnss.source {
            SourceParams::Serial {
                ref port,
                baud_rate,
                read_timeout_s,
            } => {
                assert_eq!(port, "/dev/ttyACM0");
                assert_eq!(baud_rate, 4800);
                assert_eq!(read_timeout_s, 0.5);
            }
            _ => panic!("Expected a serial source"),
        }
        assert_eq!(gnss.max_lines_per_fix, Some(100));
        assert_eq!(gnss.fix_timeout_s, Some(5.0));
        assert!(gnss.validate().is_ok());
    }

    #[test]
    fn test_replay_override() {
        let (mut exec, mut gnss) = load();
        let overrides = Overrides {
            replay: Some(PathBuf::from("drive.nmea")),
            ..Overrides::default()
        };
        overrides.apply(&mut exec, &mut gnss).unwrap();

        assert!(matches!(gnss.source, SourceParams::Replay { .. }));
    }

    #[test]
    fn test_invalid_overrides() {
        let (mut exec, mut gnss) = load();

        let overrides = Overrides {
            target_lat: Some(10.0),
            ..Overrides::default()
        };
        assert!(matches!(
            overrides.apply(&mut exec, &mut gnss),
            Err(OverrideError::IncompleteTarget)
        ));

        let overrides = Overrides {
            replay: Some(PathBuf::from("drive.nmea")),
            port: Some(String::from("COM3")),
            ..Overrides::default()
        };
        assert!(matches!(
            overrides.apply(&mut exec, &mut gnss),
            Err(OverrideError::ReplayAndSerial)
        ));

        let overrides = Overrides {
            target_lat: Some(10.0),
            target_lon: Some(200.0),
            ..Overrides::default()
        };
        assert!(matches!(
            overrides.apply(&mut exec, &mut gnss),
            Err(OverrideError::InvalidTarget(_))
        ));
    }
}
