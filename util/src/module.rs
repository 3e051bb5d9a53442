//! Module interfaces
//!
//! Processing modules in the navigation software (currently only `NavCtrl`) are driven through
//! the [`State`] trait: they are initialised once from a parameter file, then processed once per
//! accepted GNSS fix.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// MODULE STATE
// ---------------------------------------------------------------------------

/// A processing module's internal state.
pub trait State {
    /// Data required during initialisation, usually the parameter file path relative to the
    /// software root's `params` directory.
    type InitData;
    type InitError;

    /// Data consumed by each processing step.
    type InputData;
    /// Data produced by each processing step.
    type OutputData;
    /// Diagnostics produced alongside the output, archived by the module.
    type StatusReport;
    type ProcError;

    /// Load parameters and open the module's archives within `session`.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>;

    /// Run one processing step, returning the output and status report.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}
