//! Adapters between the outside world and the engine: CSV input and the
//! settlement report.

pub mod csv;
pub mod report;
