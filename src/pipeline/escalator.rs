use serde::{Deserialize, Serialize};

use crate::core::hash::url_fingerprint;
use crate::core::time::now_utc;
use crate::core::types::{HistoryEntry, PerUrlResult, RiskScore, SignalMap};

/// When a scored URL gets written to history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordPolicy {
    /// Any fired signal.
    #[default]
    AnySignal,
    MinRisk,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordRule {
    pub policy: RecordPolicy,
    pub min_risk: u8,
}

impl Default for RecordRule {
    fn default() -> Self {
        Self {
            policy: RecordPolicy::AnySignal,
            min_risk: 0,
        }
    }
}

impl RecordRule {
    pub fn should_record(&self, signals: &SignalMap, risk: RiskScore) -> bool {
        match self.policy {
            RecordPolicy::AnySignal => signals.any(),
            RecordPolicy::MinRisk => signals.any() && risk.value() >= self.min_risk,
            RecordPolicy::Never => false,
        }
    }
}

pub fn history_entry(url: &str, signals: &SignalMap, risk: RiskScore) -> HistoryEntry {
    HistoryEntry {
        timestamp: now_utc(),
        url: url.to_string(),
        fingerprint: url_fingerprint(url),
        risk_percentage: risk.value(),
        features: *signals,
    }
}

/// Entries to record for a batch of results, in input order.
pub fn escalate_results(results: &[PerUrlResult], rule: &RecordRule) -> Vec<HistoryEntry> {
    results
        .iter()
        .filter(|r| rule.should_record(&r.signals, r.risk))
        .map(|r| history_entry(&r.url, &r.signals, r.risk))
        .collect()
}
