//! Surface distance models

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;
use serde::Deserialize;

use comms_if::eqpt::gnss::GeoPoint;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// WGS-84 semi-major axis.
///
/// Units: meters
const WGS84_A_M: f64 = 6_378_137.0;

/// WGS-84 flattening.
const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// Mean earth radius used by the spherical model.
///
/// Units: meters
const MEAN_EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Maximum number of iterations of Vincenty's inverse formula.
const VINCENTY_MAX_ITERS: usize = 200;

/// Convergence threshold on the auxiliary sphere longitude.
///
/// Units: radians
const VINCENTY_TOL_RAD: f64 = 1e-12;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Computes the surface distance between two points.
pub trait GeodesicDistance {
    /// Units: meters
    fn distance_m(&self, a: &GeoPoint, b: &GeoPoint) -> f64;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Ellipsoidal distance on WGS-84 using Vincenty's inverse formula.
///
/// Nearly antipodal points, where the formula fails to converge, fall back to the spherical
/// distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vincenty;

/// Great circle distance on a spherical earth.
#[derive(Debug, Clone, Copy, Default)]
pub struct Haversine;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Selects the distance model from the parameter file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceModel {
    Vincenty,
    Haversine,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for DistanceModel {
    fn default() -> Self {
        DistanceModel::Vincenty
    }
}

impl GeodesicDistance for DistanceModel {
    fn distance_m(&self, a: &GeoPoint, b: &GeoPoint) -> f64 {
        match self {
            DistanceModel::Vincenty => Vincenty.distance_m(a, b),
            DistanceModel::Haversine => Haversine.distance_m(a, b),
        }
    }
}

impl GeodesicDistance for Haversine {
    fn distance_m(&self, a: &GeoPoint, b: &GeoPoint) -> f64 {
        let (lat1, lon1) = a.to_radians();
        let (lat2, lon2) = b.to_radians();

        let h = (0.5 * (lat2 - lat1)).sin().powi(2)
            + lat1.cos() * lat2.cos() * (0.5 * (lon2 - lon1)).sin().powi(2);

        // Clamp against round-off pushing h just above 1 for antipodal points
        2.0 * MEAN_EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
    }
}

impl GeodesicDistance for Vincenty {
    fn distance_m(&self, a: &GeoPoint, b: &GeoPoint) -> f64 {
        match vincenty_inverse(a, b) {
            Some(d) => d,
            None => {
                debug!(
                    "Vincenty did not converge between {} and {}, using haversine",
                    a, b
                );
                Haversine.distance_m(a, b)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Vincenty's inverse formula, returning `None` if the iteration doesn't converge.
fn vincenty_inverse(a: &GeoPoint, b: &GeoPoint) -> Option<f64> {
    let (lat1, lon1) = a.to_radians();
    let (lat2, lon2) = b.to_radians();

    let b_m = WGS84_A_M * (1.0 - WGS84_F);
    let l = lon2 - lon1;

    // Reduced latitudes
    let u1 = ((1.0 - WGS84_F) * lat1.tan()).atan();
    let u2 = ((1.0 - WGS84_F) * lat2.tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;

    for _ in 0..VINCENTY_MAX_ITERS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();

        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();

        // Coincident points
        if sin_sigma == 0.0 {
            return Some(0.0);
        }

        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;

        // Both points on the equator
        let cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };

        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));
        let lambda_prev = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        if (lambda - lambda_prev).abs() < VINCENTY_TOL_RAD {
            let u_sq = cos_sq_alpha * (WGS84_A_M * WGS84_A_M - b_m * b_m) / (b_m * b_m);
            let big_a =
                1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
            let delta_sigma = big_b
                * sin_sigma
                * (cos_2sigma_m
                    + big_b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                            - big_b / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                                * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));

            return Some(b_m * big_a * (sigma - delta_sigma));
        }
    }

    None
}
