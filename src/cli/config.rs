use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use crate::cli::flags::{Cli, Command};
use crate::config::{load_config, AppConfig};
use crate::core::types::OutputFormat;
use crate::pipeline::escalator::{RecordPolicy, RecordRule};

/// Effective settings for one invocation: file config with CLI overrides applied.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub app: AppConfig,
    pub db_path: PathBuf,
    pub record: RecordRule,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub history_limit: usize,
}

pub fn resolve_config(cli: &Cli) -> Result<RunConfig> {
    let app = load_config(cli.config.as_deref())?;
    resolve_with(cli, app)
}

pub fn resolve_with(cli: &Cli, app: AppConfig) -> Result<RunConfig> {
    let (format_arg, output, limit, default_format) = match &cli.command {
        Command::Url { format, output, .. } | Command::Doc { format, output, .. } => {
            (*format, output.clone(), None, OutputFormat::Json)
        }
        Command::History {
            limit,
            format,
            output,
        } => (*format, output.clone(), *limit, OutputFormat::Markdown),
    };

    let format = format_arg.map(OutputFormat::from).unwrap_or(default_format);

    let history_limit = match limit {
        Some(0) => return Err(anyhow!("--limit must be greater than 0")),
        Some(n) => n,
        None => app.history.view_limit,
    };

    let db_path = cli
        .db_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(&app.history.db_path));

    let mut record = app.record_rule();
    if cli.no_record {
        record.policy = RecordPolicy::Never;
    }

    Ok(RunConfig {
        app,
        db_path,
        record,
        format,
        output,
        history_limit,
    })
}

pub fn ensure_output_dir(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() || path.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn defaults_per_command() {
        let cfg = resolve_with(&cli(&["linksniff", "url", "x"]), AppConfig::default()).unwrap();
        assert_eq!(cfg.format, OutputFormat::Json);
        assert_eq!(cfg.db_path, PathBuf::from("data/linksniff.db"));
        assert_eq!(cfg.record.policy, RecordPolicy::AnySignal);

        let cfg = resolve_with(&cli(&["linksniff", "history"]), AppConfig::default()).unwrap();
        assert_eq!(cfg.format, OutputFormat::Markdown);
        assert_eq!(cfg.history_limit, 100);
    }

    #[test]
    fn flags_override_file_values() {
        let cfg = resolve_with(
            &cli(&[
                "linksniff",
                "--db-path",
                "tmp/other.db",
                "--no-record",
                "history",
                "--limit",
                "5",
            ]),
            AppConfig::default(),
        )
        .unwrap();
        assert_eq!(cfg.db_path, PathBuf::from("tmp/other.db"));
        assert_eq!(cfg.record.policy, RecordPolicy::Never);
        assert_eq!(cfg.history_limit, 5);
    }

    #[test]
    fn zero_limit_is_rejected() {
        let res = resolve_with(
            &cli(&["linksniff", "history", "--limit", "0"]),
            AppConfig::default(),
        );
        assert!(res.is_err());
    }
}
