//! CLI argument definitions, tracing setup, and the run entry point.

use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use color_eyre::eyre::Result;
use gitingester_core::{ProcessOptions, build_output_path, process_directory};
use gitingester_ingest::{FsIngestor, IngestLimits, ProgressReporter};
use gitingester_patterns::split_patterns;
use gitingester_shared::{AppConfig, load_config, load_config_from};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Process directories into a single text digest.
#[derive(Parser, Debug)]
#[command(
    name = "gitingester",
    version,
    about = "Process directories into a text digest, honouring .gitignore.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Directory to process.
    #[arg(long)]
    pub dir: PathBuf,

    /// Maximum file size in bytes (default: 20KB).
    #[arg(long)]
    pub fs: Option<u64>,

    /// Include patterns (;-separated).
    #[arg(long)]
    pub incl: Option<String>,

    /// Exclude patterns (;-separated).
    #[arg(long)]
    pub excl: Option<String>,

    /// Custom suffix for the output filename.
    #[arg(long)]
    pub suffix: Option<String>,

    /// Log params: any non-empty value prints the resolved patterns.
    #[arg(long)]
    pub debug: Option<String>,

    /// Directory for digest files (defaults to `_processed`).
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Config file to load instead of `~/.gitingester/gitingester.toml`.
    #[arg(long, env = "GITINGESTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr; stdout carries
/// the run report.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "gitingester=warn",
        1 => "gitingester=info",
        2 => "gitingester=debug",
        _ => "gitingester=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Run one ingestion as described by the CLI flags.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    let output_path = build_output_path(
        &output_root(&cli, &config),
        &cli.dir,
        Local::now().naive_local(),
        cli.suffix.as_deref(),
    );
    let options = process_options(&cli, &config);

    info!(
        dir = %cli.dir.display(),
        output = %output_path.display(),
        "processing directory"
    );

    let progress = CliProgress::new();
    let ingestor = FsIngestor::with_progress(IngestLimits::from(&config.limits), &progress);
    let mut stdout = std::io::stdout().lock();

    process_directory(&cli.dir, &output_path, &options, &ingestor, &mut stdout)?;

    Ok(())
}

/// Directory digests are written into: `--out-dir`, else the config value.
fn output_root(cli: &Cli, config: &AppConfig) -> PathBuf {
    cli.out_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.defaults.output_dir))
}

/// Merge CLI flags over config values.
fn process_options(cli: &Cli, config: &AppConfig) -> ProcessOptions {
    ProcessOptions {
        debug: cli.debug.as_deref().is_some_and(|d| !d.is_empty()),
        include_patterns: cli.incl.as_deref().and_then(split_patterns),
        exclude_patterns: cli.excl.as_deref().and_then(split_patterns),
        max_file_size: cli.fs.unwrap_or(config.defaults.max_file_size),
    }
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn file_collected(&self, rel_path: &str, count: usize) {
        if count == 1 {
            self.spinner
                .enable_steady_tick(std::time::Duration::from_millis(80));
        }
        self.spinner
            .set_message(format!("Collecting [{count}] {rel_path}"));
    }

    fn done(&self, _file_count: usize) {
        self.spinner.finish_and_clear();
    }
}

// A failed run never reaches `done`; don't leave the spinner on screen.
impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitingester_shared::pattern_set;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gitingester").chain(args.iter().copied()))
            .expect("parse")
    }

    #[test]
    fn dir_is_required() {
        let err = Cli::try_parse_from(["gitingester", "--fs", "10"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn non_integer_file_size_is_rejected() {
        let err = Cli::try_parse_from(["gitingester", "--dir", "x", "--fs", "big"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn defaults_come_from_config() {
        let cli = parse(&["--dir", "foo"]);
        let options = process_options(&cli, &AppConfig::default());
        assert!(!options.debug);
        assert_eq!(options.include_patterns, None);
        assert_eq!(options.exclude_patterns, None);
        assert_eq!(options.max_file_size, 20 * 1024);

        let mut config = AppConfig::default();
        config.defaults.max_file_size = 99;
        assert_eq!(process_options(&cli, &config).max_file_size, 99);
    }

    #[test]
    fn flags_override_config() {
        let cli = parse(&[
            "--dir", "foo", "--fs", "1000", "--incl", "*.rs;*.toml", "--excl", "target",
            "--debug", "yes",
        ]);
        let options = process_options(&cli, &AppConfig::default());
        assert!(options.debug);
        assert_eq!(options.max_file_size, 1000);
        assert_eq!(options.include_patterns, Some(pattern_set(["*.rs", "*.toml"])));
        assert_eq!(options.exclude_patterns, Some(pattern_set(["target"])));
    }

    #[test]
    fn empty_debug_value_is_off() {
        let cli = parse(&["--dir", "foo", "--debug", ""]);
        assert!(!process_options(&cli, &AppConfig::default()).debug);
    }

    #[test]
    fn output_root_precedence() {
        let mut config = AppConfig::default();
        let cli = parse(&["--dir", "foo"]);
        assert_eq!(output_root(&cli, &config), PathBuf::from("_processed"));

        config.defaults.output_dir = "digests".into();
        assert_eq!(output_root(&cli, &config), PathBuf::from("digests"));

        let cli = parse(&["--dir", "foo", "--out-dir", "/tmp/out"]);
        assert_eq!(output_root(&cli, &config), PathBuf::from("/tmp/out"));
    }

    #[test]
    fn spinner_is_cleared_when_run_aborts() {
        let progress = CliProgress::new();
        progress.file_collected("a.txt", 1);
        let spinner = progress.spinner.clone();
        assert!(!spinner.is_finished());

        drop(progress);
        assert!(spinner.is_finished());
    }

    #[test]
    fn verbosity_and_log_format() {
        let cli = parse(&["--dir", "foo", "-vv", "--log-format", "json"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.log_format, LogFormat::Json));
    }
}
