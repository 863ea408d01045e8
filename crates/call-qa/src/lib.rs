//! Quality-assurance scoring for recorded collection calls.
//!
//! [`scoring`] holds the fixed ten-parameter rubric and the validation and
//! aggregation rules applied to every score submission. [`analysis`] wires a
//! speech-to-text provider and an LLM to that rubric and exposes the HTTP
//! routes used by the API service.

pub mod analysis;
pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;
