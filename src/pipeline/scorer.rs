use crate::core::types::{RiskScore, SignalMap, SignalName};

/// Weight used for any signal missing from `WEIGHTS`.
pub const FALLBACK_WEIGHT: f64 = 0.75;

pub const WEIGHTS: &[(SignalName, f64)] = &[
    (SignalName::IpAddress, 3.5),
    (SignalName::UrlLength, 1.0),
    (SignalName::TinyUrl, 2.0),
    (SignalName::AtSymbol, 2.5),
    (SignalName::Redirecting, 2.0),
    (SignalName::PrefixSuffix, 2.0),
    (SignalName::SubDomains, 2.0),
    (SignalName::Https, 2.0),
    (SignalName::Favicon, 0.8),
    (SignalName::Port, 2.0),
    (SignalName::HttpsDomain, 2.0),
    (SignalName::RequestUrl, 3.0),
    (SignalName::Anchor, 1.5),
    (SignalName::Links, 1.2),
    (SignalName::Sfh, 2.2),
    (SignalName::Mailto, 1.8),
    (SignalName::Iframes, 2.0),
    (SignalName::SuspiciousTld, 3.5),
    (SignalName::SpecialChars, 2.2),
    (SignalName::EncodedChars, 2.5),
    (SignalName::BrandImpersonation, 4.0),
    (SignalName::NumericDomain, 2.0),
    (SignalName::SuspiciousKeywords, 2.5),
];

/// Bonus applied when every listed signal fired.
#[derive(Debug, Clone, Copy)]
pub struct ComboRule {
    pub name: &'static str,
    pub signals: &'static [SignalName],
    pub bonus: f64,
}

impl ComboRule {
    pub fn fires(&self, signals: &SignalMap) -> bool {
        self.signals.iter().all(|s| signals.get(*s))
    }
}

const fn rule(name: &'static str, signals: &'static [SignalName], bonus: f64) -> ComboRule {
    ComboRule {
        name,
        signals,
        bonus,
    }
}

pub const COMBO_RULES: &[ComboRule] = &[
    rule(
        "ip_login",
        &[SignalName::IpAddress, SignalName::RequestUrl],
        4.5,
    ),
    rule(
        "brand_on_suspicious_tld",
        &[SignalName::SuspiciousTld, SignalName::BrandImpersonation],
        6.0,
    ),
    rule(
        "encoded_obfuscation",
        &[SignalName::EncodedChars, SignalName::SpecialChars],
        3.75,
    ),
    rule(
        "brand_login",
        &[SignalName::BrandImpersonation, SignalName::RequestUrl],
        5.25,
    ),
    rule(
        "short_link_suspicious_tld",
        &[SignalName::TinyUrl, SignalName::SuspiciousTld],
        3.75,
    ),
    rule(
        "ip_keywords",
        &[SignalName::IpAddress, SignalName::SuspiciousKeywords],
        4.5,
    ),
    rule(
        "brand_obfuscation",
        &[SignalName::BrandImpersonation, SignalName::SpecialChars],
        4.5,
    ),
    rule(
        "suspicious_tld_login",
        &[SignalName::SuspiciousTld, SignalName::RequestUrl],
        3.75,
    ),
    rule(
        "encoded_brand",
        &[SignalName::EncodedChars, SignalName::BrandImpersonation],
        4.5,
    ),
    rule(
        "brand_keywords",
        &[SignalName::SuspiciousKeywords, SignalName::BrandImpersonation],
        5.25,
    ),
    rule(
        "suspicious_tld_keywords",
        &[SignalName::SuspiciousTld, SignalName::SuspiciousKeywords],
        4.5,
    ),
];

/// Opt-in rules, evaluated after `COMBO_RULES`.
pub const EXTENDED_COMBO_RULES: &[ComboRule] = &[
    rule(
        "ip_encoded",
        &[SignalName::IpAddress, SignalName::EncodedChars],
        4.5,
    ),
    rule(
        "short_link_login",
        &[SignalName::TinyUrl, SignalName::RequestUrl],
        4.0,
    ),
    rule(
        "obfuscated_keywords",
        &[SignalName::SpecialChars, SignalName::SuspiciousKeywords],
        3.75,
    ),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoringOptions {
    pub extended_combos: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub raw: f64,
    pub max: f64,
    pub combos: Vec<&'static str>,
    pub risk: RiskScore,
}

pub fn weight_of(name: SignalName) -> f64 {
    WEIGHTS
        .iter()
        .find(|(s, _)| *s == name)
        .map(|(_, w)| *w)
        .unwrap_or(FALLBACK_WEIGHT)
}

/// Denominator: every signal's weight, combos excluded.
pub fn max_possible_score() -> f64 {
    SignalName::ALL.iter().map(|s| weight_of(*s)).sum()
}

pub fn active_rules(options: &ScoringOptions) -> impl Iterator<Item = &'static ComboRule> {
    let extended: &'static [ComboRule] = if options.extended_combos {
        EXTENDED_COMBO_RULES
    } else {
        &[]
    };
    COMBO_RULES.iter().chain(extended.iter())
}

pub fn score_signals(signals: &SignalMap, options: &ScoringOptions) -> ScoreBreakdown {
    let mut raw: f64 = signals.fired().into_iter().map(weight_of).sum();
    let max = max_possible_score();

    let mut combos = Vec::new();
    for rule in active_rules(options) {
        if rule.fires(signals) {
            raw += rule.bonus;
            combos.push(rule.name);
        }
    }

    ScoreBreakdown {
        raw,
        max,
        combos,
        risk: to_percentage(raw, max),
    }
}

fn to_percentage(raw: f64, max: f64) -> RiskScore {
    if max <= 0.0 || raw <= 0.0 {
        return RiskScore::ZERO;
    }
    let pct = ((raw / max) * 100.0).floor();
    RiskScore::new(pct.min(100.0) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with(names: &[SignalName]) -> SignalMap {
        let mut map = SignalMap::default();
        for name in names {
            map.set(*name, true);
        }
        map
    }

    #[test]
    fn every_signal_has_a_table_weight() {
        for name in SignalName::ALL {
            assert!(WEIGHTS.iter().any(|(s, _)| *s == name), "no weight for {}", name);
        }
        assert!((max_possible_score() - 50.2).abs() < 1e-9);
    }

    #[test]
    fn all_false_scores_zero() {
        let breakdown = score_signals(&SignalMap::default(), &ScoringOptions::default());
        assert_eq!(breakdown.risk, RiskScore::ZERO);
        assert!(breakdown.combos.is_empty());
    }

    #[test]
    fn all_true_is_capped() {
        let all = with(&SignalName::ALL);
        let options = ScoringOptions {
            extended_combos: true,
        };
        let breakdown = score_signals(&all, &options);
        assert_eq!(breakdown.risk.value(), 100);
        assert_eq!(
            breakdown.combos.len(),
            COMBO_RULES.len() + EXTENDED_COMBO_RULES.len()
        );
    }

    #[test]
    fn overlapping_combos_all_count() {
        let signals = with(&[
            SignalName::BrandImpersonation,
            SignalName::SuspiciousTld,
            SignalName::RequestUrl,
        ]);
        let breakdown = score_signals(&signals, &ScoringOptions::default());
        assert_eq!(
            breakdown.combos,
            vec!["brand_on_suspicious_tld", "brand_login", "suspicious_tld_login"]
        );
        let expected = 4.0 + 3.5 + 3.0 + 6.0 + 5.25 + 3.75;
        assert!((breakdown.raw - expected).abs() < 1e-9);
        assert_eq!(breakdown.risk.value(), 50);
    }

    #[test]
    fn extended_rules_are_opt_in() {
        let signals = with(&[SignalName::IpAddress, SignalName::EncodedChars]);
        let core = score_signals(&signals, &ScoringOptions::default());
        let extended = score_signals(
            &signals,
            &ScoringOptions {
                extended_combos: true,
            },
        );
        assert!(core.combos.is_empty());
        assert_eq!(extended.combos, vec!["ip_encoded"]);
        assert!(extended.risk > core.risk);
    }

    #[test]
    fn adding_a_signal_never_lowers_the_score() {
        let options = ScoringOptions::default();
        let mut signals = SignalMap::default();
        let mut previous = score_signals(&signals, &options).risk;
        for name in SignalName::ALL {
            signals.set(name, true);
            let current = score_signals(&signals, &options).risk;
            assert!(current >= previous, "{} lowered the score", name);
            previous = current;
        }
    }

    #[test]
    fn single_signal_floor() {
        let signals = with(&[SignalName::RequestUrl]);
        // 3.0 / 50.2 = 5.97%
        assert_eq!(
            score_signals(&signals, &ScoringOptions::default()).risk.value(),
            5
        );
    }
}
