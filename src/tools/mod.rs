//! FitSense Tools module
//!
//! MCP tool implementations for the FitSense recommendation engine.

pub mod plans;
pub mod profiles;
pub mod progress;
pub mod status;
