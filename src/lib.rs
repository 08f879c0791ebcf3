//! Heuristic phishing risk scoring for URLs and document text.

pub mod cli;
pub mod config;
pub mod core;
pub mod detectors;
pub mod pipeline;
pub mod sources;
