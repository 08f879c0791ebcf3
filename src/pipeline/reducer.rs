use crate::core::types::{DocumentRisk, PerUrlResult, RiskScore, SignalMap};

pub const HIGH_BUCKET_FLOOR: u8 = 40;
pub const MEDIUM_BUCKET_FLOOR: u8 = 25;

const HIGH_SCALE: f64 = 1.2;
const MEDIUM_SCALE: f64 = 0.8;
const LOW_SCALE: f64 = 0.4;

/// Severity buckets of per-URL percentages within one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buckets {
    pub high: Vec<u8>,
    pub medium: Vec<u8>,
    pub low: Vec<u8>,
}

impl Buckets {
    pub fn partition(percentages: &[u8]) -> Self {
        let mut buckets = Buckets::default();
        for pct in percentages {
            match *pct {
                p if p >= HIGH_BUCKET_FLOOR => buckets.high.push(p),
                p if p >= MEDIUM_BUCKET_FLOOR => buckets.medium.push(p),
                p => buckets.low.push(p),
            }
        }
        buckets
    }

    /// Sum of the scaled bucket means, before flooring.
    pub fn weighted_sum(&self) -> f64 {
        scaled_mean(&self.high, HIGH_SCALE)
            + scaled_mean(&self.medium, MEDIUM_SCALE)
            + scaled_mean(&self.low, LOW_SCALE)
    }
}

fn scaled_mean(values: &[u8], scale: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: u32 = values.iter().map(|v| u32::from(*v)).sum();
    (f64::from(sum) / values.len() as f64) * scale
}

/// One dominant high-risk URL outweighs many benign ones.
pub fn reduce_percentages(percentages: &[u8]) -> RiskScore {
    if percentages.is_empty() {
        return RiskScore::ZERO;
    }
    let weighted = Buckets::partition(percentages).weighted_sum().floor();
    RiskScore::new(weighted.clamp(0.0, 100.0) as u32)
}

pub fn reduce_document(results: &[PerUrlResult]) -> DocumentRisk {
    let percentages: Vec<u8> = results.iter().map(|r| r.risk.value()).collect();
    let signals = results
        .iter()
        .fold(SignalMap::default(), |acc, r| acc.union(&r.signals));
    DocumentRisk {
        risk: reduce_percentages(&percentages),
        signals,
    }
}
