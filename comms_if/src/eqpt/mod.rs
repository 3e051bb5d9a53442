//! # Equipment Interface
//!
//! This module defines the interface structures which are produced by equipment drivers.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod gnss;
