use std::collections::{BTreeMap, VecDeque};

use crate::core::time::date_key;
use crate::core::types::{HistoryEntry, HistoryStats, HistoryView, RiskBand, SignalName};

pub const DEFAULT_CAPACITY: usize = 1000;

/// Bounded FIFO of recorded scans: newest appended, oldest evicted.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl History {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity,
        }
    }

    /// Rebuild from chronologically ordered entries, keeping only the newest `capacity`.
    pub fn from_entries(entries: Vec<HistoryEntry>, capacity: usize) -> Self {
        let mut history = Self::with_capacity(capacity);
        for entry in entries {
            history.push(entry);
        }
        history
    }

    /// Returns the evicted entry, if any.
    pub fn push(&mut self, entry: HistoryEntry) -> Option<HistoryEntry> {
        self.entries.push_back(entry);
        if self.entries.len() > self.capacity {
            return self.entries.pop_front();
        }
        None
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Newest `limit` entries, oldest first.
    pub fn latest(&self, limit: usize) -> Vec<HistoryEntry> {
        let skip = self.entries.len().saturating_sub(limit);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn stats(&self) -> HistoryStats {
        let mut stats = HistoryStats::default();
        for entry in &self.entries {
            stats.total_scans += 1;
            match RiskBand::from_percentage(entry.risk_percentage) {
                RiskBand::High => stats.high_risk += 1,
                RiskBand::Medium => stats.medium_risk += 1,
                RiskBand::Low => stats.low_risk += 1,
            }
            *stats.by_date.entry(date_key(&entry.timestamp)).or_insert(0) += 1;
        }
        stats
    }

    pub fn feature_stats(&self) -> BTreeMap<SignalName, u64> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            for name in entry.features.fired() {
                *counts.entry(name).or_insert(0) += 1;
            }
        }
        counts
    }

    pub fn view(&self, limit: usize) -> HistoryView {
        HistoryView {
            history: self.latest(limit),
            statistics: self.stats(),
            feature_stats: self.feature_stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SignalMap;
    use chrono::{TimeZone, Utc};

    fn entry(url: &str, risk: u8, day: u32) -> HistoryEntry {
        let mut features = SignalMap::default();
        features.https = true;
        if risk >= 70 {
            features.brand_impersonation = true;
        }
        HistoryEntry {
            timestamp: Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap(),
            url: url.to_string(),
            fingerprint: format!("fp-{}", url),
            risk_percentage: risk,
            features,
        }
    }

    #[test]
    fn evicts_oldest_past_capacity() {
        let mut history = History::with_capacity(2);
        assert!(history.push(entry("a", 10, 1)).is_none());
        assert!(history.push(entry("b", 10, 1)).is_none());
        let evicted = history.push(entry("c", 10, 1)).unwrap();
        assert_eq!(evicted.url, "a");
        let urls: Vec<&str> = history.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["b", "c"]);
    }

    #[test]
    fn stats_bucket_by_band_and_date() {
        let history = History::from_entries(
            vec![
                entry("a", 85, 1),
                entry("b", 45, 1),
                entry("c", 12, 2),
                entry("d", 70, 2),
            ],
            10,
        );
        let stats = history.stats();
        assert_eq!(stats.total_scans, 4);
        assert_eq!(stats.high_risk, 2);
        assert_eq!(stats.medium_risk, 1);
        assert_eq!(stats.low_risk, 1);
        assert_eq!(stats.by_date.get("2025-03-01"), Some(&2));
        assert_eq!(stats.by_date.get("2025-03-02"), Some(&2));

        let features = history.feature_stats();
        assert_eq!(features.get(&SignalName::Https), Some(&4));
        assert_eq!(features.get(&SignalName::BrandImpersonation), Some(&2));
        assert_eq!(features.get(&SignalName::Port), None);
    }

    #[test]
    fn view_limits_to_newest() {
        let history = History::from_entries(
            (1..=5).map(|d| entry(&format!("u{}", d), 5, d)).collect(),
            10,
        );
        let view = history.view(2);
        let urls: Vec<&str> = view.history.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["u4", "u5"]);
        assert_eq!(view.statistics.total_scans, 5);
    }
}
