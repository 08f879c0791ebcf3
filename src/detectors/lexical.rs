use crate::core::types::SignalMap;
use crate::detectors::{Detector, UrlView};

const LONG_URL_CHARS: usize = 75;
const TINY_URL_CHARS: usize = 20;
const MAX_HYPHENS: usize = 3;

const SHORTENERS: &[&str] = &["bit.ly", "tinyurl", "t.co", "goo.gl"];
const REDIRECT_TERMS: &[&str] = &["redirect", "forward"];
const REQUEST_TERMS: &[&str] = &[
    "request", "login", "signin", "account", "verify", "secure", "update", "confirm",
];
const ANCHOR_TERMS: &[&str] = &["#", "javascript:"];
const LINK_TERMS: &[&str] = &["link", "url", "click"];
const SFH_TERMS: &[&str] = &["about:blank", "javascript:void", "data:"];
const FRAME_TERMS: &[&str] = &["iframe", "frame"];
const SPECIAL_CHARS: &[char] = &['<', '>', '{', '}', '[', ']', '\\', '^', '~', '`'];
const SUSPICIOUS_KEYWORDS: &[&str] = &[
    "security",
    "update",
    "verify",
    "authentication",
    "confirm",
    "account",
    "banking",
    "subscription",
    "password",
];

/// Substring and character-class checks over the whole URL.
pub struct LexicalDetector;

impl Detector for LexicalDetector {
    fn name(&self) -> &'static str {
        "lexical"
    }

    fn run(&self, view: &UrlView<'_>, signals: &mut SignalMap) {
        let url = view.parsed.url.as_str();

        signals.url_length = view.len > LONG_URL_CHARS;
        signals.tiny_url = view.len < TINY_URL_CHARS && view.url_contains_any(SHORTENERS);
        signals.redirecting =
            view.parsed.path.contains("//") || view.url_contains_any(REDIRECT_TERMS);
        signals.favicon = view.url_lower.contains("favicon") || view.path_lower.contains("icon");
        signals.request_url = view.url_contains_any(REQUEST_TERMS);
        signals.anchor = view.url_contains_any(ANCHOR_TERMS);
        signals.links = view.url_contains_any(LINK_TERMS);
        signals.sfh = view.url_contains_any(SFH_TERMS);
        signals.mailto = view.url_lower.contains("mailto:") || view.path_lower.contains("mail");
        signals.iframes = view.url_contains_any(FRAME_TERMS);
        signals.special_chars =
            url.contains(SPECIAL_CHARS) || url.matches('-').count() > MAX_HYPHENS;
        signals.encoded_chars = has_percent_escape(url);
        signals.suspicious_keywords = view.url_contains_any(SUSPICIOUS_KEYWORDS);
    }
}

/// True when a `%` is followed by two hex digits somewhere in the string.
fn has_percent_escape(url: &str) -> bool {
    url.as_bytes()
        .windows(3)
        .any(|w| w[0] == b'%' && w[1].is_ascii_hexdigit() && w[2].is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::url::ParsedUrl;

    fn run(raw: &str) -> SignalMap {
        let parsed = ParsedUrl::parse(raw);
        let view = UrlView::new(&parsed);
        let mut signals = SignalMap::default();
        LexicalDetector.run(&view, &mut signals);
        signals
    }

    #[test]
    fn tiny_url_needs_short_length() {
        assert!(run("bit.ly/x").tiny_url);
        assert!(!run("https://bit.ly/abc123").tiny_url);
    }

    #[test]
    fn long_urls_fire_length() {
        let long = format!("https://example.com/{}", "a".repeat(60));
        assert!(run(&long).url_length);
        assert!(!run("https://example.com/").url_length);
    }

    #[test]
    fn path_double_slash_is_redirecting() {
        assert!(run("http://example.com//evil.com").redirecting);
        assert!(run("http://example.com/?next=Redirect").redirecting);
        assert!(!run("http://example.com/a/b").redirecting);
    }

    #[test]
    fn path_params_are_not_part_of_the_path() {
        assert!(!run("http://example.com/a;mail").mailto);
        assert!(!run("http://example.com/a;icon").favicon);
        assert!(!run("http://example.com/a;x//y;z").redirecting);
        assert!(run("http://example.com/mail;a").mailto);
    }

    #[test]
    fn percent_escape_requires_two_hex_digits() {
        assert!(run("http://example.com/%2Fetc").encoded_chars);
        assert!(!run("http://example.com/100%").encoded_chars);
        assert!(!run("http://example.com/%zz").encoded_chars);
    }

    #[test]
    fn special_chars_and_hyphen_count() {
        assert!(run("http://example.com/a~b").special_chars);
        assert!(run("http://a-b-c-d-e.com/").special_chars);
        assert!(!run("http://a-b-c.com/").special_chars);
    }

    #[test]
    fn weak_lexical_matches_are_kept() {
        let signals = run("http://example.com/mail/click#top");
        assert!(signals.mailto);
        assert!(signals.links);
        assert!(signals.anchor);
        assert!(run("http://example.com/favicon.ico").favicon);
        assert!(run("http://example.com/frame").iframes);
        assert!(run("javascript:void(0)").sfh);
    }
}
