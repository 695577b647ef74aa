//! Reliability Maturity Index audit service.
//!
//! The crate turns three evidence streams — structured interview responses,
//! field observations, and CMMS exports — into a defensible 1-5 maturity
//! score per pillar and overall.

pub mod assessment;
pub mod cmms;
pub mod config;
pub mod error;
pub mod telemetry;
