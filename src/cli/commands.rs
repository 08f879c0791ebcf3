use anyhow::{anyhow, Result};

use crate::cli::config::{ensure_output_dir, resolve_config, RunConfig};
use crate::cli::flags::{Cli, Command};
use crate::core::engine::Engine;
use crate::core::hash::document_id;
use crate::core::history::History;
use crate::core::recorder::Recorder;
use crate::core::store::Store;
use crate::core::types::{DocumentReport, PerUrlResult};
use crate::pipeline::collector::collect_from_source;
use crate::pipeline::escalator::{escalate_results, RecordPolicy};
use crate::pipeline::reporter::{emit, render_document, render_history, render_url};
use crate::sources::load_source;

pub async fn run(cli: Cli) -> Result<()> {
    let cfg = resolve_config(&cli)?;
    tracing::debug!("resolved config: {:?}", cfg);

    match &cli.command {
        Command::Url { url, .. } => run_url(&cfg, url),
        Command::Doc { input, .. } => run_doc(&cfg, input).await.map(|_| ()),
        Command::History { .. } => run_history(&cfg),
    }
}

fn run_url(cfg: &RunConfig, url: &str) -> Result<()> {
    let engine = Engine::new(cfg.app.scoring_options());
    let score = engine.score_url(url);
    tracing::info!("{} scored {} ({} combos)", url, score.risk, score.combos.len());

    let result = PerUrlResult {
        url: url.to_string(),
        page: None,
        signals: score.signals,
        risk: score.risk,
        combos: score.combos.clone(),
    };
    record_results(cfg, std::slice::from_ref(&result))?;

    let rendered = render_url(url, &score, cfg.format)?;
    write_report(cfg, &rendered)
}

/// Scores a document and returns the report it rendered.
pub async fn run_doc(cfg: &RunConfig, input: &str) -> Result<DocumentReport> {
    let source = load_source(input).await?;
    let candidates = collect_from_source(source.as_ref());
    if candidates.is_empty() {
        tracing::warn!("no URLs found in {}", source.name());
    }

    let engine = Engine::new(cfg.app.scoring_options());
    let report = engine.score_document(&candidates);
    tracing::info!(
        "{}: {} urls, document risk {}",
        source.name(),
        report.results.len(),
        report.document.risk
    );

    record_results(cfg, &report.results)?;

    let doc_id = document_id(source.text());
    let rendered = render_document(source.name(), &doc_id, &report, cfg.format)?;
    write_report(cfg, &rendered)?;
    Ok(report)
}

fn run_history(cfg: &RunConfig) -> Result<()> {
    let store = open_store(cfg)?;
    let entries = store.recent(cfg.app.history.capacity)?;
    let history = History::from_entries(entries, cfg.app.history.capacity);
    if history.is_empty() {
        tracing::info!("no recorded scans in {}", cfg.db_path.display());
    }

    let view = history.view(cfg.history_limit);
    let rendered = render_history(&view, cfg.format)?;
    write_report(cfg, &rendered)
}

fn record_results(cfg: &RunConfig, results: &[PerUrlResult]) -> Result<usize> {
    if cfg.record.policy == RecordPolicy::Never {
        return Ok(0);
    }
    let entries = escalate_results(results, &cfg.record);
    if entries.is_empty() {
        return Ok(0);
    }

    let mut recorder = Recorder::new(open_store(cfg)?, cfg.app.history.capacity);
    let recorded = recorder.record(&entries);
    tracing::info!("recorded {} of {} results", recorded, results.len());
    Ok(recorded)
}

fn open_store(cfg: &RunConfig) -> Result<Store> {
    let mut store = Store::new(&cfg.db_path)
        .map_err(|e| anyhow!("cannot open history at {}: {}", cfg.db_path.display(), e))?;
    let retention = cfg.app.history.retention_days;
    if retention > 0 {
        let purged = store.purge_older_than(retention)?;
        if purged > 0 {
            tracing::info!("purged {} entries older than {} days", purged, retention);
        }
    }
    Ok(store)
}

fn write_report(cfg: &RunConfig, rendered: &str) -> Result<()> {
    if let Some(path) = &cfg.output {
        if let Some(parent) = path.parent() {
            ensure_output_dir(parent)?;
        }
    }
    emit(rendered, cfg.output.as_deref())
}
