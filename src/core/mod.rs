//! Scoring engine, shared types and the scan history.

pub mod engine;
pub mod error;
pub mod hash;
pub mod history;
pub mod recorder;
pub mod store;
pub mod time;
pub mod types;
pub mod url;
