//! Lenient URL splitting.
//!
//! Phishing URLs are frequently malformed on purpose, so nothing here can fail: a string
//! without an `http://`/`https://` prefix gets `http://` prepended, and fields that cannot be
//! recovered are left empty or `None`.

use serde::Serialize;

const DEFAULT_SCHEME_PREFIX: &str = "http://";

/// Two-label public suffixes (ICANN section) recognised before falling back to the last label.
const MULTI_LABEL_SUFFIXES: &[&str] = &[
    "com.ml", "edu.ml", "gouv.ml", "gov.ml", "net.ml", "org.ml", "presse.ml", "belau.pw",
    "co.pw", "ed.pw", "go.pw", "ne.pw", "or.pw",
    "co.uk", "org.uk", "ac.uk", "gov.uk", "me.uk", "net.uk", "ltd.uk", "plc.uk", "com.au",
    "net.au", "org.au", "edu.au", "gov.au", "co.nz", "org.nz", "net.nz", "co.jp", "ne.jp",
    "or.jp", "ac.jp", "co.kr", "or.kr", "com.br", "net.br", "org.br", "com.cn", "net.cn",
    "org.cn", "gov.cn", "com.mx", "com.ar", "com.tr", "co.in", "net.in", "org.in", "co.za",
    "com.sg", "com.hk", "com.tw", "co.il", "com.my", "com.ph", "com.pk", "com.ng", "co.id",
];

/// Read-only decomposition of a raw URL string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedUrl {
    /// The normalized string every lexical check runs against.
    pub url: String,
    pub scheme: String,
    /// Authority as written: userinfo, host and port.
    pub netloc: String,
    pub hostname: String,
    pub port: Option<u16>,
    pub path: String,
    /// `;params` of the last path segment, split off the path.
    pub params: String,
    pub query: String,
    pub fragment: String,
    pub subdomain: String,
    pub domain: String,
    pub suffix: String,
}

impl ParsedUrl {
    pub fn parse(raw: &str) -> Self {
        let url = normalize(raw);
        let cleaned: String = url
            .chars()
            .filter(|c| !matches!(c, '\t' | '\r' | '\n'))
            .collect();

        let (scheme, rest) = split_scheme(&cleaned);
        let (netloc, rest) = match rest.strip_prefix("//") {
            Some(after) => {
                let end = after
                    .find(|c: char| matches!(c, '/' | '?' | '#'))
                    .unwrap_or(after.len());
                (after[..end].to_string(), &after[end..])
            }
            None => (String::new(), rest),
        };
        let (rest, fragment) = match rest.split_once('#') {
            Some((head, frag)) => (head, frag.to_string()),
            None => (rest, String::new()),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((head, q)) => (head, q.to_string()),
            None => (rest, String::new()),
        };
        let (path, params) = split_params(rest);

        let (host, port) = split_host_port(&netloc);
        let hostname = host.to_lowercase().trim_end_matches('.').to_string();
        let (subdomain, domain, suffix) = split_domain(&hostname);

        Self {
            url,
            scheme,
            netloc,
            hostname,
            port,
            path: path.to_string(),
            params: params.to_string(),
            query,
            fragment,
            subdomain,
            domain,
            suffix,
        }
    }

    pub fn url_lower(&self) -> String {
        self.url.to_lowercase()
    }

    pub fn netloc_lower(&self) -> String {
        self.netloc.to_lowercase()
    }

}

/// Prefix `http://` unless the string already carries a web scheme.
pub fn normalize(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME_PREFIX, raw)
    }
}

/// Params are split only when the last segment carries a `;`, and then at the first `;`.
fn split_params(path: &str) -> (&str, &str) {
    let last_segment = path.rfind('/').unwrap_or(0);
    if !path[last_segment..].contains(';') {
        return (path, "");
    }
    path.split_once(';').unwrap_or((path, ""))
}

fn split_scheme(url: &str) -> (String, &str) {
    if let Some((candidate, rest)) = url.split_once(':') {
        let mut chars = candidate.chars();
        let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if valid {
            return (candidate.to_lowercase(), rest);
        }
    }
    (String::new(), url)
}

fn split_host_port(netloc: &str) -> (String, Option<u16>) {
    let hostinfo = netloc.rsplit_once('@').map(|(_, h)| h).unwrap_or(netloc);
    let (host, port) = if let Some((_, bracketed)) = hostinfo.split_once('[') {
        match bracketed.split_once(']') {
            Some((inner, tail)) => (
                inner.to_string(),
                tail.split_once(':').map(|(_, p)| p).unwrap_or(""),
            ),
            None => (bracketed.to_string(), ""),
        }
    } else {
        match hostinfo.split_once(':') {
            Some((h, p)) => (h.to_string(), p),
            None => (hostinfo.to_string(), ""),
        }
    };
    (host, parse_port(port))
}

fn parse_port(value: &str) -> Option<u16> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse::<u16>().ok()
}

/// Splits a lowercase hostname into (subdomain, domain, suffix).
fn split_domain(hostname: &str) -> (String, String, String) {
    if hostname.is_empty() {
        return (String::new(), String::new(), String::new());
    }
    if is_ipv4_literal(hostname) {
        return (String::new(), hostname.to_string(), String::new());
    }
    let labels: Vec<&str> = hostname.split('.').collect();
    let suffix_len = suffix_label_count(&labels);
    if suffix_len == 0 {
        let (domain, rest) = match labels.split_last() {
            Some((last, rest)) => (last.to_string(), rest.join(".")),
            None => (String::new(), String::new()),
        };
        return (rest, domain, String::new());
    }
    let split = labels.len() - suffix_len;
    (
        labels[..split - 1].join("."),
        labels[split - 1].to_string(),
        labels[split..].join("."),
    )
}

fn suffix_label_count(labels: &[&str]) -> usize {
    if labels.len() < 2 {
        return 0;
    }
    let last_two = labels[labels.len() - 2..].join(".");
    if labels.len() > 2 && MULTI_LABEL_SUFFIXES.contains(&last_two.as_str()) {
        return 2;
    }
    let last = labels[labels.len() - 1];
    let alphabetic = last.len() >= 2 && last.chars().all(|c| c.is_ascii_alphabetic());
    if alphabetic || last.starts_with("xn--") {
        1
    } else {
        0
    }
}

/// `^\d{1,3}(\.\d{1,3}){3}$` without a regex.
pub fn is_ipv4_literal(value: &str) -> bool {
    let parts: Vec<&str> = value.split('.').collect();
    parts.len() == 4
        && parts
            .iter()
            .all(|p| (1..=3).contains(&p.len()) && p.bytes().all(|b| b.is_ascii_digit()))
}
