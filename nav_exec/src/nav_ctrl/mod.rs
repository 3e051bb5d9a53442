//! # Navigation control module
//!
//! Navigation control converts the current position and the target position into a
//! [`SteeringCommand`]. The control law is purely proportional:
//!
//! - the forward speed is proportional to the distance to the target, saturated at the maximum
//!   speed,
//! - the turn rate is proportional to the bearing of the target, saturated at the maximum rate.
//!
//! The bearing is the absolute bearing of the target from true north, in the range (-pi, pi]
//! with positive values to the east. The vehicle's heading is not known, so the turn rate and
//! direction only describe where the target lies relative to north.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod geodesy;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;

// Internal
pub use geodesy::*;
pub use params::*;
pub use state::*;
use comms_if::{
    eqpt::gnss::GeoPoint,
    tc::steer::{Direction, SteeringCommand},
};
use util::maths::{clamp, wrap_pi};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during NavCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum NavCtrlError {
    #[error("Could not load the NavCtrl parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Invalid NavCtrl parameters: {0}")]
    InvalidParams(String),

    #[error("Could not archive NavCtrl data: {0}")]
    ArchiveError(util::archive::ArchiveError),
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Calculate the steering command which drives from `current` towards `target`.
///
/// This never fails, coincident points produce a zero speed forward command.
pub fn compute_command<D>(
    current: &GeoPoint,
    target: &GeoPoint,
    params: &Params,
    distance: &D,
) -> SteeringCommand
where
    D: GeodesicDistance + ?Sized,
{
    let distance_m = distance.distance_m(current, target);
    let angle_rad = bearing_rad(current, target);

    let linear_speed_ms = (distance_m * params.linear_gain)
        .min(params.max_linear_speed_ms)
        .max(0.0);
    let angular_rate_rads = clamp(
        angle_rad * params.angular_gain,
        -params.max_angular_rate_rads,
        params.max_angular_rate_rads,
    );

    let direction = direction_bucket(angle_rad, params);

    trace!(
        "NavCtrl: distance {} m, bearing {} rad, linear {} m/s, angular {} rad/s",
        distance_m,
        angle_rad,
        linear_speed_ms,
        angular_rate_rads
    );

    SteeringCommand {
        distance_m,
        linear_speed_ms,
        angular_rate_rads,
        direction,
    }
}

/// Initial great circle bearing from `from` to `to`, measured from true north with east
/// positive.
///
/// Units: radians, in (-pi, pi]
pub fn bearing_rad(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();
    let dlon = lon2 - lon1;

    let x = dlon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    wrap_pi(x.atan2(y))
}

/// Bucket a bearing into a qualitative direction.
///
/// Each bucket includes its lower bound, so a bearing of exactly the forward half angle is
/// reported as left.
pub fn direction_bucket(angle_rad: f64, params: &Params) -> Direction {
    let angle_deg = angle_rad.to_degrees();
    let fwd = params.forward_half_angle_deg;
    let turn = params.turn_around_angle_deg;

    if angle_deg >= -fwd && angle_deg < fwd {
        Direction::Forward
    } else if angle_deg >= fwd && angle_deg < turn {
        Direction::Left
    } else if angle_deg >= -turn && angle_deg < -fwd {
        Direction::Right
    } else {
        Direction::TurnAround
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    fn p(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() < tol, "{} != {}", a, b);
    }

    #[test]
    fn test_north_east_target() {
        let params = Params::default();
        let cmd = compute_command(&p(56.0, 54.0), &p(56.1005245, 54.2337052), &params, &Vincenty);

        assert_close(cmd.distance_m, 18366.932, 0.01);
        assert_close(cmd.linear_speed_ms, 0.5, 1e-12);
        assert_close(cmd.angular_rate_rads, 0.456398, 1e-6);
        assert_eq!(cmd.direction, Direction::Left);

        let r = cmd.rounded();
        assert_eq!(r.distance_m, 18366.93);
        assert_eq!(r.angular_rate_rads, 0.46);
        assert_eq!(r.linear_speed_ms, 0.5);

        assert_close(
            bearing_rad(&p(56.0, 54.0), &p(56.1005245, 54.2337052)),
            0.912797,
            1e-6,
        );
    }

    #[test]
    fn test_cardinal_targets() {
        let params = Params::default();
        let here = p(10.0, 10.0);

        // North
        let cmd = compute_command(&here, &p(11.0, 10.0), &params, &Vincenty);
        assert_eq!(cmd.direction, Direction::Forward);
        assert_close(cmd.angular_rate_rads, 0.0, 1e-12);
        assert_close(cmd.linear_speed_ms, 0.5, 1e-12);
        assert_close(cmd.distance_m, 110611.19, 0.01);

        // East, slightly short of pi/2 since the great circle curves north
        let cmd = compute_command(&here, &p(10.0, 11.0), &params, &Vincenty);
        assert_eq!(cmd.direction, Direction::Left);
        assert_close(bearing_rad(&here, &p(10.0, 11.0)), 1.569281, 1e-6);
        assert_close(cmd.angular_rate_rads, 0.784640, 1e-6);

        // West
        let cmd = compute_command(&here, &p(10.0, 9.0), &params, &Vincenty);
        assert_eq!(cmd.direction, Direction::Right);
        assert_close(cmd.angular_rate_rads, -0.784640, 1e-6);

        // South is reported as +pi, saturating the turn rate
        let cmd = compute_command(&here, &p(9.0, 10.0), &params, &Vincenty);
        assert_eq!(cmd.direction, Direction::TurnAround);
        assert_close(bearing_rad(&here, &p(9.0, 10.0)), PI, 1e-12);
        assert_close(cmd.angular_rate_rads, 1.0, 1e-12);
        assert_close(cmd.distance_m, 110604.56, 0.01);
    }

    #[test]
    fn test_coincident_points() {
        let params = Params::default();
        let here = p(56.0, 54.0);

        let cmd = compute_command(&here, &here, &params, &Vincenty);
        assert_eq!(cmd.distance_m, 0.0);
        assert_eq!(cmd.linear_speed_ms, 0.0);
        assert_eq!(cmd.angular_rate_rads, 0.0);
        assert_eq!(cmd.direction, Direction::Forward);
    }

    #[test]
    fn test_speed_proportional_when_close() {
        let params = Params::default();
        let here = p(56.0, 54.0);
        let target = p(56.00001, 54.0);

        let cmd = compute_command(&here, &target, &params, &Haversine);
        assert!(cmd.distance_m > 1.0 && cmd.distance_m < 1.2);
        assert_close(cmd.linear_speed_ms, cmd.distance_m * 0.3, 1e-12);
    }

    #[test]
    fn test_outputs_bounded() {
        let params = Params::default();
        let here = p(56.0, 54.0);

        let mut lat = -89.0;
        while lat <= 89.0 {
            let mut lon = -179.0;
            while lon <= 179.0 {
                let target = p(lat, lon);
                let cmd = compute_command(&here, &target, &params, &DistanceModel::Vincenty);
                let angle = bearing_rad(&here, &target);

                assert!(angle > -PI && angle <= PI);
                assert!(cmd.linear_speed_ms >= 0.0 && cmd.linear_speed_ms <= 0.5);
                assert!(cmd.angular_rate_rads.abs() <= 1.0);
                assert!(cmd.distance_m >= 0.0);

                lon += 7.0;
            }
            lat += 7.0;
        }
    }

    #[test]
    fn test_direction_uses_absolute_bearing() {
        let params = Params::default();
        let deg = |d: f64| d.to_radians();

        assert_eq!(direction_bucket(deg(0.0), &params), Direction::Forward);
        assert_eq!(direction_bucket(deg(44.9), &params), Direction::Forward);
        assert_eq!(direction_bucket(deg(-45.0), &params), Direction::Forward);
        assert_eq!(direction_bucket(deg(45.0), &params), Direction::Left);
        assert_eq!(direction_bucket(deg(134.9), &params), Direction::Left);
        assert_eq!(direction_bucket(deg(135.0), &params), Direction::TurnAround);
        assert_eq!(direction_bucket(deg(-45.1), &params), Direction::Right);
        assert_eq!(direction_bucket(deg(-135.0), &params), Direction::Right);
        assert_eq!(direction_bucket(deg(-135.1), &params), Direction::TurnAround);
        assert_eq!(direction_bucket(PI, &params), Direction::TurnAround);

        // A target to the north east is always "left", whichever way the vehicle faces
        let a = compute_command(&p(0.5, 0.5), &p(0.7, 1.0), &params, &Haversine);
        let b = compute_command(&p(-30.5, 100.5), &p(-30.3, 101.0), &params, &Haversine);
        assert_eq!(a.direction, Direction::Left);
        assert_eq!(b.direction, Direction::Left);
    }

    #[test]
    fn test_custom_params() {
        let params = Params {
            max_linear_speed_ms: 2.0,
            max_angular_rate_rads: 0.2,
            forward_half_angle_deg: 60.0,
            ..Params::default()
        };

        let cmd = compute_command(&p(56.0, 54.0), &p(56.1005245, 54.2337052), &params, &Vincenty);
        assert_close(cmd.linear_speed_ms, 2.0, 1e-12);
        assert_close(cmd.angular_rate_rads, 0.2, 1e-12);
        assert_eq!(cmd.direction, Direction::Forward);
    }
}
