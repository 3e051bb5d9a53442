//! # Navigation library.
//!
//! This library allows other crates in the workspace to access items defined inside the
//! navigation crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// GNSS fix acquisition - reads receiver sentences until a valid position is found
pub mod gnss;

/// Navigation control module - converts the current and target positions into steering commands
pub mod nav_ctrl;

/// Executable parameters and command line overrides
pub mod params;
