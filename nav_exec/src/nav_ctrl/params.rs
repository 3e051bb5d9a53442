//! Parameters structure for NavCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use super::{DistanceModel, NavCtrlError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Navigation control.
///
/// Any parameter missing from the file takes its default value.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Params {

    // ---- LIMITS ----

    /// Maximum forward speed demand.
    ///
    /// Units: meters/second
    pub max_linear_speed_ms: f64,

    /// Maximum magnitude of the turn rate demand.
    ///
    /// Units: radians/second
    pub max_angular_rate_rads: f64,

    // ---- GAINS ----

    /// Forward speed demand per meter of distance to the target.
    ///
    /// Units: 1/second
    pub linear_gain: f64,

    /// Turn rate demand per radian of bearing.
    ///
    /// Units: 1/second
    pub angular_gain: f64,

    // ---- DIRECTION THRESHOLDS ----

    /// Bearings within this angle either side of north are reported as forward.
    ///
    /// Units: degrees
    pub forward_half_angle_deg: f64,

    /// Bearings beyond this angle either side of north are reported as turn around.
    ///
    /// Units: degrees
    pub turn_around_angle_deg: f64,

    // ---- ARRIVAL ----

    /// Distance at which the target is considered reached.
    ///
    /// Units: meters
    pub arrival_radius_m: f64,

    /// Model used to calculate the distance to the target.
    pub distance_model: DistanceModel,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            max_linear_speed_ms: 0.5,
            max_angular_rate_rads: 1.0,
            linear_gain: 0.3,
            angular_gain: 0.5,
            forward_half_angle_deg: 45.0,
            turn_around_angle_deg: 135.0,
            arrival_radius_m: 1.0,
            distance_model: DistanceModel::default(),
        }
    }
}

impl Params {
    /// Check that the parameters describe a usable control law.
    pub fn validate(&self) -> Result<(), NavCtrlError> {
        let non_negative = [
            ("max_linear_speed_ms", self.max_linear_speed_ms),
            ("max_angular_rate_rads", self.max_angular_rate_rads),
            ("linear_gain", self.linear_gain),
            ("angular_gain", self.angular_gain),
            ("arrival_radius_m", self.arrival_radius_m),
        ];

        for (name, value) in non_negative.iter() {
            if !value.is_finite() || *value < 0.0 {
                return Err(NavCtrlError::InvalidParams(format!(
                    "{} must be finite and non-negative, found {}",
                    name, value
                )));
            }
        }

        if !(self.forward_half_angle_deg > 0.0
            && self.forward_half_angle_deg < self.turn_around_angle_deg
            && self.turn_around_angle_deg <= 180.0)
        {
            return Err(NavCtrlError::InvalidParams(format!(
                "Direction thresholds must satisfy 0 < forward ({}) < turn around ({}) <= 180",
                self.forward_half_angle_deg, self.turn_around_angle_deg
            )));
        }

        Ok(())
    }
}
