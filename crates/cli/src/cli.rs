use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Automated insights for tabular data.
///
/// Loads a CSV or JSON file and reports trends, correlations, anomalies,
/// segments, and forecasts ranked by confidence.
#[derive(Parser, Debug)]
#[command(name = "tabula", version, about = "Automated insights for tabular data")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every analyzer and print ranked insights
    Analyze {
        /// CSV or JSON file to analyze
        file: PathBuf,

        /// Path to config file (default: ~/.config/tabula/config.toml)
        #[arg(long, env = "TABULA_CONFIG")]
        config: Option<PathBuf>,

        /// Seed for clustering (overrides config and TABULA_SEED)
        #[arg(long)]
        seed: Option<u64>,

        /// Run analyzers on the rayon thread pool
        #[arg(long)]
        parallel: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Summarize each column: kind, valid and skipped counts, basic stats
    Describe {
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Evaluate threshold alert rules against a dataset
    Alert {
        file: PathBuf,

        /// Rule file or directory of rule files (scanned recursively)
        #[arg(long)]
        rules: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn parses_analyze_flags() {
        let args = CliArgs::try_parse_from([
            "tabula", "analyze", "sales.csv", "--seed", "7", "--parallel", "--format", "json",
        ])
        .unwrap();
        match args.command {
            Command::Analyze {
                file,
                seed,
                parallel,
                format,
                ..
            } => {
                assert_eq!(file, PathBuf::from("sales.csv"));
                assert_eq!(seed, Some(7));
                assert!(parallel);
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn alert_requires_rules() {
        assert!(CliArgs::try_parse_from(["tabula", "alert", "sales.csv"]).is_err());
    }

    #[test]
    fn format_defaults_to_text() {
        let args = CliArgs::try_parse_from(["tabula", "describe", "data.json"]).unwrap();
        let Command::Describe { format, .. } = args.command else {
            panic!("expected describe");
        };
        assert_eq!(format, OutputFormat::Text);
    }
}
