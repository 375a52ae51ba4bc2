mod cli;
mod config;
mod output;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use tabula_compute::{describe, InsightEngine};
use tabula_core::{config::load_dotenv, Dataset};
use tabula_rules::{evaluate_all, LoadStatus, RuleLoader};

use crate::cli::{CliArgs, Command};

fn main() -> Result<()> {
    load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let rendered = match args.command {
        Command::Analyze {
            file,
            config: config_path,
            seed,
            parallel,
            format,
        } => {
            let mut config =
                config::load(config_path.as_deref()).context("failed to load configuration")?;
            if seed.is_some() {
                config.engine.seed = seed;
            }
            if parallel {
                config.engine.parallel = true;
            }
            config.log_summary();

            let dataset = load(&file)?;
            let report = InsightEngine::new(config).run(&dataset);
            output::render(&report, format, output::report_text)?
        }
        Command::Describe { file, format } => {
            let dataset = load(&file)?;
            output::render(&describe(&dataset), format, output::summary_text)?
        }
        Command::Alert {
            file,
            rules,
            format,
        } => {
            let loader = load_rules(&rules)?;
            let dataset = load(&file)?;
            let alerts = evaluate_all(loader.rules(), &dataset);
            info!(rules = loader.len(), fired = alerts.len(), "alert rules evaluated");
            output::render(alerts.as_slice(), format, output::alerts_text)?
        }
    };

    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn load(path: &Path) -> Result<Dataset> {
    tabula_ingest::load_path(path)
        .with_context(|| format!("failed to load dataset: {}", path.display()))
}

/// Load a single rule file, or every rule under a directory.
fn load_rules(path: &Path) -> Result<RuleLoader> {
    if path.is_file() {
        let rule = RuleLoader::load_file(path)
            .with_context(|| format!("failed to load rule: {}", path.display()))?;
        let dir = path.parent().unwrap_or(path).to_path_buf();
        let mut loader = RuleLoader::new(dir);
        loader.insert(rule);
        return Ok(loader);
    }

    let (loader, results) = RuleLoader::load_dir(path)
        .with_context(|| format!("failed to read rules directory: {}", path.display()))?;
    let failed = results
        .iter()
        .filter(|r| matches!(r.status, LoadStatus::Failed { .. }))
        .count();
    if failed > 0 {
        warn!(failed, loaded = loader.len(), "some rule files could not be loaded");
    }
    Ok(loader)
}
