use linksniff::core::engine::{score_document, score_url, Engine};
use linksniff::core::types::{RiskBand, SignalName, UrlCandidate};
use linksniff::pipeline::reducer::reduce_percentages;
use linksniff::pipeline::scorer::ScoringOptions;

#[test]
fn ip_login_outscores_plain_login() {
    let ip = score_url("http://192.168.1.1/login/secure/verify");
    assert!(ip.signals.ip_address);
    assert!(ip.signals.request_url);
    assert!(ip.signals.suspicious_keywords);
    assert!(ip.combos.iter().any(|c| c == "ip_login"));

    let plain = score_url("http://example.com/login");
    assert!(plain.signals.request_url);
    assert!(!plain.signals.ip_address);
    assert!(ip.risk > plain.risk);
}

#[test]
fn clean_https_url_is_neutral() {
    let score = score_url("https://example.com");
    assert!(!score.signals.any());
    assert_eq!(score.risk.value(), 0);
    assert!(score.combos.is_empty());
}

#[test]
fn brand_on_suspicious_tld_is_high_risk() {
    let score = score_url("http://paypal-secure.tk/verify");
    for name in [
        SignalName::BrandImpersonation,
        SignalName::SuspiciousTld,
        SignalName::SuspiciousKeywords,
        SignalName::PrefixSuffix,
    ] {
        assert!(score.signals.get(name), "{} should fire", name);
    }
    assert!(score.combos.len() >= 2);
    assert!(score.risk.value() > 70);
    assert_eq!(score.risk.band(), RiskBand::High);
}

#[test]
fn scoring_is_idempotent_and_bounded() {
    let urls = [
        "",
        "   ",
        "not a url at all",
        "http://user@paypal-login.tk:8080/%2e%2e/verify//redirect?account=1&x=<y>",
        "bit.ly/x",
    ];
    for url in urls {
        let first = score_url(url);
        let second = score_url(url);
        assert_eq!(first, second);
        assert!(first.risk.value() <= 100);
    }
    assert_eq!(score_url("").risk.value(), 0);
}

#[test]
fn extended_combos_never_lower_a_score() {
    let url = "http://10.0.0.1/%41dmin/account";
    let core = Engine::default().score_url(url);
    let extended = Engine::new(ScoringOptions {
        extended_combos: true,
    })
    .score_url(url);
    assert!(extended.risk >= core.risk);
    assert!(extended.combos.iter().any(|c| c == "ip_encoded"));
    assert!(!core.combos.iter().any(|c| c == "ip_encoded"));
}

#[test]
fn document_scores_follow_input_order() {
    let report = score_document(&[
        UrlCandidate::on_page("https://example.com", 0),
        UrlCandidate::on_page("http://paypal-secure.tk/verify", 1),
        UrlCandidate::new("http://example.com/login"),
    ]);
    let urls: Vec<&str> = report.results.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://example.com",
            "http://paypal-secure.tk/verify",
            "http://example.com/login"
        ]
    );
    assert_eq!(report.results[1].page, Some(1));
    assert_eq!(report.results[2].page, None);
    assert!(report.document.signals.brand_impersonation);
    assert!(report.document.signals.request_url);
}

#[test]
fn empty_document_is_neutral() {
    let report = score_document(&[]);
    assert!(report.results.is_empty());
    assert_eq!(report.document.risk.value(), 0);
    assert!(!report.document.signals.any());
}

#[test]
fn one_dominant_url_drives_the_document() {
    assert_eq!(reduce_percentages(&[80, 30, 10]).value(), 100);
    assert_eq!(reduce_percentages(&[0, 0, 0]).value(), 0);
}
