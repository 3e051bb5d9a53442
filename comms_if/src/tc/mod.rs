//! # Command module
//!
//! This module provides the commands produced by the navigation software for the locomotion
//! system to execute.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod steer;
