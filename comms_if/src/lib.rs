//! # Communications interface crate.
//!
//! Provides all common interface types shared between the navigation executable, its equipment
//! (the GNSS receiver) and anything consuming its steering commands.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Steering command definitions produced by navigation control
pub mod tc;

/// Data definitions for equipment (like the GNSS receiver)
pub mod eqpt;
