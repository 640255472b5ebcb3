//! Runtime bootstrap: logging, metric descriptions and infrastructure errors.

pub mod error;
pub mod telemetry;
