use crate::core::types::SignalMap;
use crate::core::url::ParsedUrl;

pub mod host;
pub mod lexical;

/// A group of signal checks sharing one view of the URL.
pub trait Detector {
    fn name(&self) -> &'static str;
    fn run(&self, view: &UrlView<'_>, signals: &mut SignalMap);
}

/// Parsed URL plus the lowercase forms most checks match against.
pub struct UrlView<'a> {
    pub parsed: &'a ParsedUrl,
    pub url_lower: String,
    pub netloc_lower: String,
    pub path_lower: String,
    /// Length in characters, not bytes.
    pub len: usize,
}

impl<'a> UrlView<'a> {
    pub fn new(parsed: &'a ParsedUrl) -> Self {
        Self {
            url_lower: parsed.url_lower(),
            netloc_lower: parsed.netloc_lower(),
            path_lower: parsed.path.to_lowercase(),
            len: parsed.url.chars().count(),
            parsed,
        }
    }

    pub fn url_contains_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.url_lower.contains(*n))
    }
}

const DETECTORS: &[&dyn Detector] = &[&host::HostDetector, &lexical::LexicalDetector];

/// Evaluate every detector against one parsed URL.
pub fn detect_signals(parsed: &ParsedUrl) -> SignalMap {
    let view = UrlView::new(parsed);
    let mut signals = SignalMap::default();
    for detector in DETECTORS {
        detector.run(&view, &mut signals);
    }
    signals
}
