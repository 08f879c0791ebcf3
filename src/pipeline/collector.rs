use std::sync::OnceLock;

use regex::Regex;

use crate::core::types::UrlCandidate;
use crate::sources::{Page, TextSource};

const URL_PATTERN: &str =
    r"https?://(?:[a-zA-Z]|[0-9]|[$-_@.&+]|[!*\(\),]|(?:%[0-9a-fA-F][0-9a-fA-F]))+";

static URL_RE: OnceLock<Regex> = OnceLock::new();

fn url_re() -> &'static Regex {
    URL_RE.get_or_init(|| Regex::new(URL_PATTERN).expect("URL pattern is a valid regex"))
}

/// URLs in order of appearance, tagged with their page index.
pub fn collect_urls(pages: &[Page]) -> Vec<UrlCandidate> {
    let mut out = Vec::new();
    for page in pages {
        for m in url_re().find_iter(&page.text) {
            out.push(UrlCandidate::on_page(m.as_str(), page.index));
        }
    }
    out
}

pub fn collect_from_source(source: &dyn TextSource) -> Vec<UrlCandidate> {
    let pages = source.pages();
    let urls = collect_urls(&pages);
    tracing::debug!(
        "collected {} urls from {} pages of {}",
        urls.len(),
        pages.len(),
        source.name()
    );
    urls
}
