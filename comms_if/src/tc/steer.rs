//! # Steering commands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt;

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A steering demand towards the navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteeringCommand {
    /// Surface distance to the target.
    ///
    /// Units: meters
    pub distance_m: f64,

    /// Forward speed demand, never negative.
    ///
    /// Units: meters/second
    pub linear_speed_ms: f64,

    /// Turn rate demand, positive is a turn to the left.
    ///
    /// Units: radians/second
    pub angular_rate_rads: f64,

    /// Qualitative direction of the target.
    pub direction: Direction,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Bucketed bearing of the target.
///
/// The bucket is taken from the absolute bearing of the target measured from true north, not
/// from the vehicle's heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Left,
    Right,
    TurnAround,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SteeringCommand {
    /// A command to hold position.
    pub fn stop() -> Self {
        Self {
            distance_m: 0.0,
            linear_speed_ms: 0.0,
            angular_rate_rads: 0.0,
            direction: Direction::Forward,
        }
    }

    /// Return a copy with every quantity rounded to 2 decimal places for display.
    pub fn rounded(&self) -> Self {
        Self {
            distance_m: round_2dp(self.distance_m),
            linear_speed_ms: round_2dp(self.linear_speed_ms),
            angular_rate_rads: round_2dp(self.angular_rate_rads),
            direction: self.direction,
        }
    }
}

impl fmt::Display for SteeringCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.rounded();
        write!(
            f,
            "distance {:.2} m, speed {:.2} m/s, turn {:.2} rad/s ({})",
            r.distance_m, r.linear_speed_ms, r.angular_rate_rads, r.direction
        )
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Forward => "forward",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::TurnAround => "turn around",
        };
        f.write_str(s)
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn round_2dp(value: f64) -> f64 {
    let r = (value * 100.0).round() / 100.0;

    // Keep -0.00 out of reports
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rounded() {
        let cmd = SteeringCommand {
            distance_m: 18366.932440815603,
            linear_speed_ms: 0.5,
            angular_rate_rads: 0.4563984185219314,
            direction: Direction::Left,
        };

        let r = cmd.rounded();
        assert_eq!(r.distance_m, 18366.93);
        assert_eq!(r.linear_speed_ms, 0.5);
        assert_eq!(r.angular_rate_rads, 0.46);
        assert_eq!(r.direction, Direction::Left);

        // Tiny negative rates don't display as -0.00
        let cmd = SteeringCommand {
            angular_rate_rads: -0.001,
            ..SteeringCommand::stop()
        };
        assert_eq!(cmd.rounded().angular_rate_rads.to_string(), "0");
    }

    #[test]
    fn test_display() {
        let cmd = SteeringCommand {
            distance_m: 12.346,
            linear_speed_ms: 0.5,
            angular_rate_rads: -1.0,
            direction: Direction::TurnAround,
        };

        assert_eq!(
            cmd.to_string(),
            "distance 12.35 m, speed 0.50 m/s, turn -1.00 rad/s (turn around)"
        );
    }
}
