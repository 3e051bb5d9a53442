//! # GNSS Equipment Data
//!
//! Position data produced by the GNSS receiver driver.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::convert::TryFrom;
use std::fmt;

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A geographic position in signed decimal degrees.
///
/// Latitude is always within [-90, 90] and longitude within [-180, 180], which is enforced on
/// construction and deserialisation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LatLon")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

/// Unvalidated latitude/longitude pair, used when deserialising a [`GeoPoint`].
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLon {
    pub latitude: f64,
    pub longitude: f64,
}

/// A sentence read from the receiver, after parsing but before any validation.
///
/// Sentences without a position are represented by a quality of [`FixQuality::NoFix`] and zero
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawSentence {
    /// Fix quality indicator reported by the receiver
    pub quality: FixQuality,

    /// Latitude in signed decimal degrees (north positive)
    pub latitude: f64,

    /// Longitude in signed decimal degrees (east positive)
    pub longitude: f64,

    /// Number of satellites used in the solution, if reported
    pub satellites: Option<u8>,

    /// Altitude above mean sea level.
    ///
    /// Units: meters
    pub altitude_m: Option<f32>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Quality of a position reported by the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixQuality {
    /// No position available
    NoFix,

    /// Standalone GPS fix
    GpsFix,

    /// Differentially corrected fix
    DgpsFix,

    /// Any other indicator (PPS, RTK, dead reckoning, manual or simulated input)
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GeoPointError {
    #[error("Latitude must be finite and within [-90, 90], found {0}")]
    InvalidLatitude(f64),

    #[error("Longitude must be finite and within [-180, 180], found {0}")]
    InvalidLongitude(f64),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl GeoPoint {
    /// Create a new point from latitude and longitude in decimal degrees.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoPointError> {
        if !latitude.is_finite() || latitude.abs() > 90.0 {
            return Err(GeoPointError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || longitude.abs() > 180.0 {
            return Err(GeoPointError::InvalidLongitude(longitude));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in decimal degrees
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Latitude and longitude converted to radians.
    pub fn to_radians(&self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl TryFrom<LatLon> for GeoPoint {
    type Error = GeoPointError;

    fn try_from(value: LatLon) -> Result<Self, Self::Error> {
        GeoPoint::new(value.latitude, value.longitude)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

impl FixQuality {
    /// Returns true if a position with this quality may be used for navigation.
    pub fn is_usable(&self) -> bool {
        matches!(self, FixQuality::GpsFix | FixQuality::DgpsFix)
    }
}

impl RawSentence {
    /// Returns true if this sentence carries a fix which can be trusted.
    ///
    /// Zero latitude or longitude is treated as the receiver's "no position yet" output rather
    /// than a real position on the equator or prime meridian.
    pub fn has_valid_fix(&self) -> bool {
        self.quality.is_usable() && self.latitude != 0.0 && self.longitude != 0.0
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn sentence(quality: FixQuality, latitude: f64, longitude: f64) -> RawSentence {
        RawSentence {
            quality,
            latitude,
            longitude,
            satellites: None,
            altitude_m: None,
        }
    }

    #[test]
    fn test_geo_point_ranges() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
        assert_eq!(
            GeoPoint::new(90.5, 0.0),
            Err(GeoPointError::InvalidLatitude(90.5))
        );
        assert_eq!(
            GeoPoint::new(0.0, -180.1),
            Err(GeoPointError::InvalidLongitude(-180.1))
        );
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_geo_point_deserialise() {
        let p: GeoPoint = toml::from_str("latitude = 56.1005245\nlongitude = 54.2337052").unwrap();
        assert_eq!(p.latitude(), 56.1005245);
        assert_eq!(p.longitude(), 54.2337052);

        let bad: Result<GeoPoint, _> = toml::from_str("latitude = 91.0\nlongitude = 0.0");
        assert!(bad.is_err());
    }

    #[test]
    fn test_fix_quality() {
        assert!(!FixQuality::NoFix.is_usable());
        assert!(FixQuality::GpsFix.is_usable());
        assert!(FixQuality::DgpsFix.is_usable());
        assert!(!FixQuality::Other.is_usable());
    }

    #[test]
    fn test_zero_coordinate_is_not_a_fix() {
        assert!(sentence(FixQuality::GpsFix, 56.0, 54.0).has_valid_fix());
        assert!(sentence(FixQuality::DgpsFix, -33.9, 151.2).has_valid_fix());
        assert!(!sentence(FixQuality::GpsFix, 0.0, 54.0).has_valid_fix());
        assert!(!sentence(FixQuality::GpsFix, 56.0, 0.0).has_valid_fix());
        assert!(!sentence(FixQuality::NoFix, 56.0, 54.0).has_valid_fix());
        assert!(!sentence(FixQuality::Other, 56.0, 54.0).has_valid_fix());
    }
}
