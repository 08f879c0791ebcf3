use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of lexical/structural URL signals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SignalName {
    IpAddress,
    UrlLength,
    TinyUrl,
    AtSymbol,
    Redirecting,
    PrefixSuffix,
    SubDomains,
    Https,
    Favicon,
    Port,
    HttpsDomain,
    RequestUrl,
    Anchor,
    Links,
    Sfh,
    Mailto,
    Iframes,
    SuspiciousTld,
    SpecialChars,
    EncodedChars,
    BrandImpersonation,
    NumericDomain,
    SuspiciousKeywords,
}

impl SignalName {
    /// Canonical order; weights and reports iterate in this order.
    pub const ALL: [SignalName; 23] = [
        SignalName::IpAddress,
        SignalName::UrlLength,
        SignalName::TinyUrl,
        SignalName::AtSymbol,
        SignalName::Redirecting,
        SignalName::PrefixSuffix,
        SignalName::SubDomains,
        SignalName::Https,
        SignalName::Favicon,
        SignalName::Port,
        SignalName::HttpsDomain,
        SignalName::RequestUrl,
        SignalName::Anchor,
        SignalName::Links,
        SignalName::Sfh,
        SignalName::Mailto,
        SignalName::Iframes,
        SignalName::SuspiciousTld,
        SignalName::SpecialChars,
        SignalName::EncodedChars,
        SignalName::BrandImpersonation,
        SignalName::NumericDomain,
        SignalName::SuspiciousKeywords,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalName::IpAddress => "ip_address",
            SignalName::UrlLength => "url_length",
            SignalName::TinyUrl => "tiny_url",
            SignalName::AtSymbol => "at_symbol",
            SignalName::Redirecting => "redirecting",
            SignalName::PrefixSuffix => "prefix_suffix",
            SignalName::SubDomains => "sub_domains",
            SignalName::Https => "https",
            SignalName::Favicon => "favicon",
            SignalName::Port => "port",
            SignalName::HttpsDomain => "https_domain",
            SignalName::RequestUrl => "request_url",
            SignalName::Anchor => "anchor",
            SignalName::Links => "links",
            SignalName::Sfh => "sfh",
            SignalName::Mailto => "mailto",
            SignalName::Iframes => "iframes",
            SignalName::SuspiciousTld => "suspicious_tld",
            SignalName::SpecialChars => "special_chars",
            SignalName::EncodedChars => "encoded_chars",
            SignalName::BrandImpersonation => "brand_impersonation",
            SignalName::NumericDomain => "numeric_domain",
            SignalName::SuspiciousKeywords => "suspicious_keywords",
        }
    }
}

impl fmt::Display for SignalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One boolean per signal; field names match `SignalName::as_str`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignalMap {
    pub ip_address: bool,
    pub url_length: bool,
    pub tiny_url: bool,
    pub at_symbol: bool,
    pub redirecting: bool,
    pub prefix_suffix: bool,
    pub sub_domains: bool,
    pub https: bool,
    pub favicon: bool,
    pub port: bool,
    pub https_domain: bool,
    pub request_url: bool,
    pub anchor: bool,
    pub links: bool,
    pub sfh: bool,
    pub mailto: bool,
    pub iframes: bool,
    pub suspicious_tld: bool,
    pub special_chars: bool,
    pub encoded_chars: bool,
    pub brand_impersonation: bool,
    pub numeric_domain: bool,
    pub suspicious_keywords: bool,
}

impl SignalMap {
    pub fn get(&self, name: SignalName) -> bool {
        match name {
            SignalName::IpAddress => self.ip_address,
            SignalName::UrlLength => self.url_length,
            SignalName::TinyUrl => self.tiny_url,
            SignalName::AtSymbol => self.at_symbol,
            SignalName::Redirecting => self.redirecting,
            SignalName::PrefixSuffix => self.prefix_suffix,
            SignalName::SubDomains => self.sub_domains,
            SignalName::Https => self.https,
            SignalName::Favicon => self.favicon,
            SignalName::Port => self.port,
            SignalName::HttpsDomain => self.https_domain,
            SignalName::RequestUrl => self.request_url,
            SignalName::Anchor => self.anchor,
            SignalName::Links => self.links,
            SignalName::Sfh => self.sfh,
            SignalName::Mailto => self.mailto,
            SignalName::Iframes => self.iframes,
            SignalName::SuspiciousTld => self.suspicious_tld,
            SignalName::SpecialChars => self.special_chars,
            SignalName::EncodedChars => self.encoded_chars,
            SignalName::BrandImpersonation => self.brand_impersonation,
            SignalName::NumericDomain => self.numeric_domain,
            SignalName::SuspiciousKeywords => self.suspicious_keywords,
        }
    }

    pub fn set(&mut self, name: SignalName, value: bool) {
        let slot = match name {
            SignalName::IpAddress => &mut self.ip_address,
            SignalName::UrlLength => &mut self.url_length,
            SignalName::TinyUrl => &mut self.tiny_url,
            SignalName::AtSymbol => &mut self.at_symbol,
            SignalName::Redirecting => &mut self.redirecting,
            SignalName::PrefixSuffix => &mut self.prefix_suffix,
            SignalName::SubDomains => &mut self.sub_domains,
            SignalName::Https => &mut self.https,
            SignalName::Favicon => &mut self.favicon,
            SignalName::Port => &mut self.port,
            SignalName::HttpsDomain => &mut self.https_domain,
            SignalName::RequestUrl => &mut self.request_url,
            SignalName::Anchor => &mut self.anchor,
            SignalName::Links => &mut self.links,
            SignalName::Sfh => &mut self.sfh,
            SignalName::Mailto => &mut self.mailto,
            SignalName::Iframes => &mut self.iframes,
            SignalName::SuspiciousTld => &mut self.suspicious_tld,
            SignalName::SpecialChars => &mut self.special_chars,
            SignalName::EncodedChars => &mut self.encoded_chars,
            SignalName::BrandImpersonation => &mut self.brand_impersonation,
            SignalName::NumericDomain => &mut self.numeric_domain,
            SignalName::SuspiciousKeywords => &mut self.suspicious_keywords,
        };
        *slot = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (SignalName, bool)> + '_ {
        SignalName::ALL.iter().map(move |name| (*name, self.get(*name)))
    }

    pub fn any(&self) -> bool {
        self.iter().any(|(_, fired)| fired)
    }

    pub fn fired(&self) -> Vec<SignalName> {
        self.iter()
            .filter(|(_, fired)| *fired)
            .map(|(name, _)| name)
            .collect()
    }

    /// Per-signal OR.
    pub fn union(&self, other: &SignalMap) -> SignalMap {
        let mut out = *self;
        for (name, fired) in other.iter() {
            if fired {
                out.set(name, true);
            }
        }
        out
    }
}

/// Percentage risk, always within 0..=100.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RiskScore(u8);

impl RiskScore {
    pub const ZERO: RiskScore = RiskScore(0);

    pub fn new(value: u32) -> Self {
        RiskScore(value.min(100) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn band(&self) -> RiskBand {
        RiskBand::from_percentage(self.0)
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Reporting band used by history statistics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub fn from_percentage(value: u8) -> Self {
        match value {
            70..=u8::MAX => RiskBand::High,
            40..=69 => RiskBand::Medium,
            _ => RiskBand::Low,
        }
    }
}

/// A URL found in a submission, with the page it came from when known.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UrlCandidate {
    pub url: String,
    pub page: Option<usize>,
}

impl UrlCandidate {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            page: None,
        }
    }

    pub fn on_page(url: impl Into<String>, page: usize) -> Self {
        Self {
            url: url.into(),
            page: Some(page),
        }
    }
}

/// Outcome of scoring one URL string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UrlScore {
    pub signals: SignalMap,
    pub risk: RiskScore,
    /// Names of the combination rules that fired.
    pub combos: Vec<String>,
}

impl UrlScore {
    pub fn neutral() -> Self {
        Self {
            signals: SignalMap::default(),
            risk: RiskScore::ZERO,
            combos: vec![],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerUrlResult {
    pub url: String,
    pub page: Option<usize>,
    pub signals: SignalMap,
    pub risk: RiskScore,
    #[serde(default)]
    pub combos: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocumentRisk {
    pub risk: RiskScore,
    pub signals: SignalMap,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocumentReport {
    pub results: Vec<PerUrlResult>,
    pub document: DocumentRisk,
}

/// A recorded (flagged) scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub url: String,
    pub fingerprint: String,
    pub risk_percentage: u8,
    pub features: SignalMap,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HistoryStats {
    pub total_scans: u64,
    pub high_risk: u64,
    pub medium_risk: u64,
    pub low_risk: u64,
    pub by_date: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HistoryView {
    pub history: Vec<HistoryEntry>,
    pub statistics: HistoryStats,
    pub feature_stats: BTreeMap<SignalName, u64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Jsonl,
    Markdown,
    Csv,
}
