//! Application layer: the four custody stages and the engine that drives them.
//!
//! Every stage takes the store per call and runs inside a single
//! `LedgerTransaction`, so a stage either commits all of its writes or none.

pub mod batcher;
pub mod engine;
pub mod finalizer;
pub mod matcher;
pub mod numbering;
pub mod validator;
