use crate::core::types::SignalMap;
use crate::core::url::is_ipv4_literal;
use crate::detectors::{Detector, UrlView};

pub const SUSPICIOUS_TLDS: &[&str] = &[
    "tk", "ml", "ga", "cf", "gq", "pw", "xyz", "top", "work", "party", "date", "stream", "racing",
    "win",
];

pub const COMMON_BRANDS: &[&str] = &[
    "paypal",
    "apple",
    "microsoft",
    "amazon",
    "google",
    "facebook",
    "netflix",
    "bank",
];

const STANDARD_PORTS: [u16; 2] = [80, 443];

/// Checks on the authority and the domain decomposition.
pub struct HostDetector;

impl Detector for HostDetector {
    fn name(&self) -> &'static str {
        "host"
    }

    fn run(&self, view: &UrlView<'_>, signals: &mut SignalMap) {
        let parsed = view.parsed;
        let netloc = view.netloc_lower.as_str();

        signals.ip_address = is_ipv4_literal(&parsed.netloc);
        signals.at_symbol = netloc.contains('@');
        signals.prefix_suffix = netloc.contains('-') || first_label_has_digit(netloc);
        signals.sub_domains =
            parsed.subdomain.split('.').count() > 2 || netloc.split('.').count() > 3;
        signals.https = parsed.scheme != "https";
        signals.port = parsed
            .port
            .is_some_and(|p| p != 0 && !STANDARD_PORTS.contains(&p));
        signals.https_domain = parsed.netloc.contains("https") || parsed.netloc.contains("ssl");
        signals.suspicious_tld = SUSPICIOUS_TLDS.contains(&parsed.suffix.as_str());
        signals.brand_impersonation = brand_impersonation(view);
        signals.numeric_domain = netloc.chars().filter(|c| c.is_ascii_digit()).count() > 3;
    }
}

fn first_label_has_digit(netloc: &str) -> bool {
    netloc
        .split('.')
        .next()
        .is_some_and(|label| label.chars().any(|c| c.is_ascii_digit()))
}

/// A brand in the authority, unless the URL carries it as `.<brand>.`.
fn brand_impersonation(view: &UrlView<'_>) -> bool {
    let mentions_brand = COMMON_BRANDS
        .iter()
        .any(|brand| view.netloc_lower.contains(*brand));
    if !mentions_brand {
        return false;
    }
    !COMMON_BRANDS
        .iter()
        .any(|brand| view.url_lower.contains(&format!(".{}.", brand)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::url::ParsedUrl;

    fn run(raw: &str) -> SignalMap {
        let parsed = ParsedUrl::parse(raw);
        let view = UrlView::new(&parsed);
        let mut signals = SignalMap::default();
        HostDetector.run(&view, &mut signals);
        signals
    }

    #[test]
    fn ip_literal_with_port_is_not_bare() {
        assert!(run("http://10.0.0.1/x").ip_address);
        assert!(!run("http://10.0.0.1:8080/x").ip_address);
        assert!(run("http://10.0.0.1:8080/x").port);
    }

    #[test]
    fn standard_ports_do_not_fire() {
        assert!(!run("http://example.com:80/").port);
        assert!(!run("https://example.com:443/").port);
        assert!(!run("http://example.com:0/").port);
        assert!(run("http://example.com:8443/").port);
    }

    #[test]
    fn brand_on_its_own_domain_is_not_impersonation() {
        assert!(!run("https://www.paypal.com/signin").brand_impersonation);
        assert!(run("https://paypal.com.account-check.xyz").brand_impersonation);
        assert!(run("http://secure-paypal.tk/").brand_impersonation);
    }

    #[test]
    fn https_in_authority_is_case_sensitive() {
        assert!(run("http://https-login.example.com/").https_domain);
        assert!(run("http://ssl.example.com/").https_domain);
        assert!(!run("http://HTTPS-Login.example.com/").https_domain);
    }

    #[test]
    fn second_level_suffix_is_not_a_suspicious_tld() {
        assert!(!run("http://shop.com.ml/").suspicious_tld);
        assert!(!run("http://shop.co.pw/").suspicious_tld);
        assert!(run("http://shop.ml/").suspicious_tld);
        assert!(run("http://shop.pw/").suspicious_tld);
    }

    #[test]
    fn subdomain_depth() {
        assert!(run("http://a.b.c.example.com/").sub_domains);
        assert!(!run("http://www.example.com/").sub_domains);
    }

    #[test]
    fn authority_shape_signals() {
        let signals = run("http://user@1login-https.example.com/");
        assert!(signals.at_symbol);
        assert!(signals.prefix_suffix);
        assert!(signals.https_domain);
        assert!(run("http://12345.example.com/").numeric_domain);
        assert!(!run("https://example.com/").https);
    }
}
