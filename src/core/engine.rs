//! Scoring entry points.
//!
//! Everything reachable from here is pure: no I/O, no shared mutable state, so an `Engine`
//! can be shared freely across threads and tasks.

use crate::core::types::{DocumentReport, PerUrlResult, UrlCandidate, UrlScore};
use crate::core::url::ParsedUrl;
use crate::detectors::detect_signals;
use crate::pipeline::reducer::reduce_document;
use crate::pipeline::scorer::{score_signals, ScoringOptions};

#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    pub options: ScoringOptions,
}

impl Engine {
    pub fn new(options: ScoringOptions) -> Self {
        Self { options }
    }

    /// Never fails; blank input yields no signals and a zero score.
    pub fn score_url(&self, raw_url: &str) -> UrlScore {
        if raw_url.trim().is_empty() {
            return UrlScore::neutral();
        }
        let parsed = ParsedUrl::parse(raw_url);
        let signals = detect_signals(&parsed);
        let breakdown = score_signals(&signals, &self.options);
        UrlScore {
            signals,
            risk: breakdown.risk,
            combos: breakdown.combos.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Scores every candidate in order and folds them into one document figure.
    pub fn score_document(&self, urls: &[UrlCandidate]) -> DocumentReport {
        let results: Vec<PerUrlResult> = urls
            .iter()
            .map(|candidate| {
                let score = self.score_url(&candidate.url);
                PerUrlResult {
                    url: candidate.url.clone(),
                    page: candidate.page,
                    signals: score.signals,
                    risk: score.risk,
                    combos: score.combos,
                }
            })
            .collect();
        let document = reduce_document(&results);
        DocumentReport { results, document }
    }
}

pub fn score_url(raw_url: &str) -> UrlScore {
    Engine::default().score_url(raw_url)
}

pub fn score_document(urls: &[UrlCandidate]) -> DocumentReport {
    Engine::default().score_document(urls)
}
