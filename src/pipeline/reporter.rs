use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::core::types::{
    DocumentReport, HistoryView, OutputFormat, PerUrlResult, RiskBand, SignalMap, SignalName,
    UrlScore,
};

#[derive(Serialize)]
struct UrlRecord<'a> {
    url: &'a str,
    page: Option<usize>,
    risk_percentage: u8,
    band: RiskBand,
    features: &'a SignalMap,
    detected: Vec<SignalName>,
    combos: &'a [String],
}

impl<'a> UrlRecord<'a> {
    fn from_result(result: &'a PerUrlResult) -> Self {
        Self {
            url: &result.url,
            page: result.page,
            risk_percentage: result.risk.value(),
            band: result.risk.band(),
            features: &result.signals,
            detected: result.signals.fired(),
            combos: &result.combos,
        }
    }

    fn from_score(url: &'a str, score: &'a UrlScore) -> Self {
        Self {
            url,
            page: None,
            risk_percentage: score.risk.value(),
            band: score.risk.band(),
            features: &score.signals,
            detected: score.signals.fired(),
            combos: &score.combos,
        }
    }
}

#[derive(Serialize)]
struct DocumentSummary<'a> {
    document: &'a str,
    document_id: &'a str,
    risk_percentage: u8,
    /// Only the signals that fired somewhere in the document.
    features: BTreeMap<SignalName, bool>,
    url_count: usize,
}

#[derive(Serialize)]
struct DocumentBundle<'a> {
    #[serde(flatten)]
    summary: DocumentSummary<'a>,
    url_analysis: Vec<UrlRecord<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "record_type", content = "record")]
enum ReportRecord<'a> {
    Document(&'a DocumentSummary<'a>),
    Url(&'a UrlRecord<'a>),
}

pub fn render_url(url: &str, score: &UrlScore, format: OutputFormat) -> Result<String> {
    let record = UrlRecord::from_score(url, score);
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&record)?),
        OutputFormat::Jsonl => jsonl(&[ReportRecord::Url(&record)]),
        OutputFormat::Markdown => {
            let mut out = String::new();
            out.push_str("# LinkSniff URL Report\n\n");
            write_url_markdown(&mut out, &record);
            Ok(out)
        }
        OutputFormat::Csv => Ok(csv(&[record])),
    }
}

pub fn render_document(
    name: &str,
    document_id: &str,
    report: &DocumentReport,
    format: OutputFormat,
) -> Result<String> {
    let summary = DocumentSummary {
        document: name,
        document_id,
        risk_percentage: report.document.risk.value(),
        features: fired_map(&report.document.signals),
        url_count: report.results.len(),
    };
    let records: Vec<UrlRecord<'_>> = report.results.iter().map(UrlRecord::from_result).collect();

    match format {
        OutputFormat::Json => {
            let bundle = DocumentBundle {
                summary,
                url_analysis: records,
            };
            Ok(serde_json::to_string_pretty(&bundle)?)
        }
        OutputFormat::Jsonl => {
            let mut lines = vec![ReportRecord::Document(&summary)];
            lines.extend(records.iter().map(ReportRecord::Url));
            jsonl(&lines)
        }
        OutputFormat::Markdown => {
            let mut out = String::new();
            out.push_str("# LinkSniff Document Report\n\n");
            out.push_str(&format!("- Document: {}\n", summary.document));
            out.push_str(&format!("- Document ID: {}\n", summary.document_id));
            out.push_str(&format!(
                "- Document risk: {}%\n",
                summary.risk_percentage
            ));
            out.push_str(&format!("- URLs found: {}\n", summary.url_count));
            out.push_str(&format!(
                "- Signals detected: {}\n\n",
                join_names(&report.document.signals.fired())
            ));
            if records.is_empty() {
                out.push_str("No URLs found.\n");
            }
            for record in &records {
                write_url_markdown(&mut out, record);
            }
            Ok(out)
        }
        OutputFormat::Csv => Ok(csv(&records)),
    }
}

pub fn render_history(view: &HistoryView, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
        OutputFormat::Jsonl => {
            let mut out = String::new();
            for entry in &view.history {
                out.push_str(&serde_json::to_string(entry)?);
                out.push('\n');
            }
            Ok(out)
        }
        OutputFormat::Markdown => {
            let stats = &view.statistics;
            let mut out = String::new();
            out.push_str("# LinkSniff History\n\n");
            out.push_str("## Statistics\n");
            out.push_str(&format!("- Total scans: {}\n", stats.total_scans));
            out.push_str(&format!("- High risk (>=70%): {}\n", stats.high_risk));
            out.push_str(&format!("- Medium risk (40-69%): {}\n", stats.medium_risk));
            out.push_str(&format!("- Low risk (<40%): {}\n\n", stats.low_risk));
            out.push_str("## By Date\n");
            if stats.by_date.is_empty() {
                out.push_str("- No activity.\n");
            }
            for (date, count) in &stats.by_date {
                out.push_str(&format!("- {}: {}\n", date, count));
            }
            out.push_str("\n## Signal Frequency\n");
            if view.feature_stats.is_empty() {
                out.push_str("- None.\n");
            }
            for (name, count) in &view.feature_stats {
                out.push_str(&format!("- {}: {}\n", name, count));
            }
            out.push_str("\n## Recent Entries\n");
            for entry in &view.history {
                out.push_str(&format!(
                    "- {} {} ({}%) [{}]\n",
                    entry.timestamp.to_rfc3339(),
                    entry.url,
                    entry.risk_percentage,
                    join_names(&entry.features.fired())
                ));
            }
            Ok(out)
        }
        OutputFormat::Csv => {
            let mut out = String::new();
            out.push_str("timestamp,url,risk_percentage,signals\n");
            for entry in &view.history {
                out.push_str(&format!(
                    "{},{},{},{}\n",
                    entry.timestamp.to_rfc3339(),
                    csv_field(&entry.url),
                    entry.risk_percentage,
                    entry
                        .features
                        .fired()
                        .iter()
                        .map(|s| s.as_str())
                        .collect::<Vec<_>>()
                        .join(";")
                ));
            }
            Ok(out)
        }
    }
}

/// Writes to `path` when given, otherwise prints to stdout.
pub fn emit(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, content)?;
            tracing::info!("report written to {}", path.display());
        }
        None => {
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}

fn fired_map(signals: &SignalMap) -> BTreeMap<SignalName, bool> {
    signals.fired().into_iter().map(|s| (s, true)).collect()
}

fn jsonl(records: &[ReportRecord<'_>]) -> Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

fn write_url_markdown(out: &mut String, record: &UrlRecord<'_>) {
    out.push_str(&format!("## {}\n", record.url));
    if let Some(page) = record.page {
        out.push_str(&format!("- Page: {}\n", page + 1));
    }
    out.push_str(&format!(
        "- Risk: {}% ({:?})\n",
        record.risk_percentage, record.band
    ));
    out.push_str(&format!("- Signals: {}\n", join_names(&record.detected)));
    if !record.combos.is_empty() {
        out.push_str(&format!("- Combinations: {}\n", record.combos.join(", ")));
    }
    out.push('\n');
}

fn csv(records: &[UrlRecord<'_>]) -> String {
    let mut out = String::new();
    out.push_str("url,page,risk_percentage,band,signals,combos\n");
    for r in records {
        out.push_str(&format!(
            "{},{},{},{:?},{},{}\n",
            csv_field(r.url),
            r.page.map(|p| p.to_string()).unwrap_or_default(),
            r.risk_percentage,
            r.band,
            r.detected
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(";"),
            r.combos.join(";")
        ));
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains(&[',', '"', '\n'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn join_names(names: &[SignalName]) -> String {
    if names.is_empty() {
        return "none".to_string();
    }
    names
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::{score_document, score_url};
    use crate::core::types::UrlCandidate;

    #[test]
    fn url_json_lists_detected_signals() {
        let score = score_url("http://paypal-secure.tk/verify");
        let json = render_url("http://paypal-secure.tk/verify", &score, OutputFormat::Json)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["band"], "High");
        let detected = value["detected"].as_array().unwrap();
        assert!(detected.iter().any(|d| d == "brand_impersonation"));
        assert_eq!(value["features"]["port"], false);
    }

    #[test]
    fn document_jsonl_starts_with_summary() {
        let report = score_document(&[
            UrlCandidate::on_page("https://example.com", 0),
            UrlCandidate::on_page("http://192.168.1.1/login", 1),
        ]);
        let out = render_document("doc.txt", "doc_x", &report, OutputFormat::Jsonl).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["record_type"], "Document");
        assert_eq!(first["record"]["url_count"], 2);
        let features = first["record"]["features"].as_object().unwrap();
        assert!(features.contains_key("ip_address"));
        assert!(!features.contains_key("brand_impersonation"));
    }

    #[test]
    fn csv_quotes_commas() {
        let score = score_url("http://example.com/a,b");
        let out = render_url("http://example.com/a,b", &score, OutputFormat::Csv).unwrap();
        assert!(out.lines().nth(1).unwrap().starts_with("\"http://example.com/a,b\","));
    }

    #[test]
    fn empty_document_markdown() {
        let report = score_document(&[]);
        let out = render_document("empty.txt", "doc_e", &report, OutputFormat::Markdown).unwrap();
        assert!(out.contains("- Document risk: 0%"));
        assert!(out.contains("No URLs found."));
    }
}
