//! Library crate for the trek selection service.
//!
//! The interesting machinery lives in [`workflows::selection`]: aggregating
//! crew members' program interest scores, scoring candidate itineraries
//! against crew preferences, and ranking the results. The remaining modules
//! are the ambient service stack (configuration, telemetry, HTTP error
//! mapping) shared with the API binary.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
