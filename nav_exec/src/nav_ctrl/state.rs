//! Implementations for the NavCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use serde::Serialize;

// Internal
use super::{bearing_rad, compute_command, NavCtrlError, Params};
use comms_if::{eqpt::gnss::GeoPoint, tc::steer::SteeringCommand};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    module::State,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Navigation control module state
#[derive(Default)]
pub struct NavCtrl {
    pub(crate) params: Params,

    pub(crate) report: StatusReport,
    arch_report: Archiver,

    pub(crate) output: Option<SteeringCommand>,
    arch_output: Archiver,
}

/// Input data to Navigation Control.
#[derive(Debug, Clone, Copy)]
pub struct InputData {
    /// The latest valid position fix
    pub current: GeoPoint,

    /// The position to drive towards
    pub target: GeoPoint,
}

/// Status report for NavCtrl processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatusReport {
    /// Absolute bearing of the target from true north.
    ///
    /// Units: radians
    pub bearing_rad: f64,

    /// The forward speed demand was saturated at its maximum
    pub linear_speed_limited: bool,

    /// The turn rate demand was saturated at its maximum
    pub angular_rate_limited: bool,

    /// The target is within the arrival radius
    pub target_reached: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl NavCtrl {
    /// Create a module from already loaded parameters, without any archives.
    pub fn new(params: Params) -> Result<Self, NavCtrlError> {
        params.validate()?;

        Ok(Self {
            params,
            ..Default::default()
        })
    }
}

impl State for NavCtrl {
    type InitData = &'static str;
    type InitError = NavCtrlError;

    type InputData = InputData;
    type OutputData = SteeringCommand;
    type StatusReport = StatusReport;
    type ProcError = std::convert::Infallible;

    /// Initialise the NavCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        let params: Params = params::load(init_data)
            .map_err(NavCtrlError::ParamLoadError)?;
        params.validate()?;

        debug!("NavCtrl parameters: {:?}", params);
        self.params = params;

        self.arch_report = Archiver::from_path(session, "nav_ctrl/status_report.csv")
            .map_err(NavCtrlError::ArchiveError)?;
        self.arch_output = Archiver::from_path(session, "nav_ctrl/output.csv")
            .map_err(NavCtrlError::ArchiveError)?;

        Ok(())
    }

    /// Calculate the steering command for the current position.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let p = &self.params;
        let output = compute_command(
            &input_data.current,
            &input_data.target,
            p,
            &p.distance_model,
        );
        let bearing = bearing_rad(&input_data.current, &input_data.target);

        self.report = StatusReport {
            bearing_rad: bearing,
            linear_speed_limited: output.distance_m * p.linear_gain > p.max_linear_speed_ms,
            angular_rate_limited: (bearing * p.angular_gain).abs() > p.max_angular_rate_rads,
            target_reached: output.distance_m <= p.arrival_radius_m,
        };
        self.output = Some(output);

        Ok((output, self.report))
    }
}

impl Archived for NavCtrl {
    fn write(&mut self) -> Result<(), ArchiveError> {
        self.arch_report.serialise(self.report)?;

        if let Some(o) = self.output {
            self.arch_output.serialise(o)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::tc::steer::Direction;

    fn p(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn test_proc_far_target() {
        let mut nav_ctrl = NavCtrl::new(Params::default()).unwrap();

        let (cmd, report) = nav_ctrl
            .proc(&InputData {
                current: p(56.0, 54.0),
                target: p(56.1005245, 54.2337052),
            })
            .unwrap();

        assert_eq!(cmd.direction, Direction::Left);
        assert!((report.bearing_rad - 0.912797).abs() < 1e-6);
        assert!(report.linear_speed_limited);
        assert!(!report.angular_rate_limited);
        assert!(!report.target_reached);

        // Archiving without a session discards the records
        assert!(nav_ctrl.write().is_ok());
    }

    #[test]
    fn test_proc_arrival_and_saturation() {
        let mut nav_ctrl = NavCtrl::new(Params::default()).unwrap();

        // Due south, half a meter away
        let (cmd, report) = nav_ctrl
            .proc(&InputData {
                current: p(10.0, 10.0),
                target: p(9.9999955, 10.0),
            })
            .unwrap();

        assert!(cmd.distance_m < 1.0);
        assert!(report.target_reached);
        assert!(!report.linear_speed_limited);
        assert!(report.angular_rate_limited);
        assert_eq!(cmd.direction, Direction::TurnAround);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = Params {
            linear_gain: -1.0,
            ..Params::default()
        };
        assert!(matches!(
            NavCtrl::new(params),
            Err(NavCtrlError::InvalidParams(_))
        ));
    }
}
