//! CLI definition, argument handling, tracing setup, and the run command.

use std::ffi::OsString;
use std::sync::Arc;

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Report, Result, WrapErr};
use gradiomd_core::pipeline::{self, ProgressReporter, RunResult};
use gradiomd_core::resolve_output_path;
use gradiomd_crawler::{Transport, TransportOptions};
use gradiomd_discovery::GitHubBrowser;
use gradiomd_shared::{GradioMdError, load_config};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// Environment variable selecting the log formatter.
const LOG_FORMAT_ENV_VAR: &str = "GRADIO_MD_LOG_FORMAT";

/// Filter used when `RUST_LOG` is unset: the library crates and this binary.
const DEFAULT_LOG_FILTER: &str = "gradiomd=info,gradio_md=info";

const ENV_HELP: &str = "\
Environment:
  GITHUB_TOKEN, GH_TOKEN  Optional GitHub token sent as a bearer token
  GRADIO_MD_CONFIG        Path to a TOML config file (default ~/.gradio-md/gradio-md.toml)
  RUST_LOG                Log filter (default gradiomd=info,gradio_md=info)
  GRADIO_MD_LOG_FORMAT    Log format: text (default) or json";

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// gradio-md: combine the Gradio guides into one markdown file.
#[derive(Parser, Debug)]
#[command(
    name = "gradio-md",
    about = "Download every Gradio guide and combine them into a single ordered markdown document.",
    long_about = None,
    after_help = ENV_HELP,
    disable_version_flag = true,
)]
pub(crate) struct Cli {
    /// Output file, or a directory to place gradio.md in (default: ./gradio.md).
    #[arg(value_name = "OUTPUT")]
    pub output: Option<String>,
}

/// What the process should do after argument parsing.
#[derive(Debug)]
pub(crate) enum Invocation {
    Run(Cli),
    Help(String),
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Parse process arguments. Every failure is a one-line usage error.
pub(crate) fn parse_args<I, T>(args: I) -> std::result::Result<Invocation, GradioMdError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => {
            if let Some(output) = cli.output.as_deref() {
                if output.starts_with('-') {
                    return Err(GradioMdError::usage(format!(
                        "unexpected argument '{output}'"
                    )));
                }
            }
            Ok(Invocation::Run(cli))
        }
        Err(err) if err.kind() == ErrorKind::DisplayHelp => {
            Ok(Invocation::Help(err.render().to_string()))
        }
        Err(err) => {
            let rendered = err.to_string();
            let first = rendered.lines().next().unwrap_or_default();
            let message = first.strip_prefix("error: ").unwrap_or(first);
            Err(GradioMdError::usage(message.trim()))
        }
    }
}

/// Flatten an error report and its causes onto one line.
pub(crate) fn single_line(report: &Report) -> String {
    report
        .chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join(": ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

fn log_format_from(value: Option<&str>) -> LogFormat {
    value
        .and_then(|v| LogFormat::from_str(v.trim(), true).ok())
        .unwrap_or(LogFormat::Text)
}

/// Initialize tracing from `RUST_LOG` and `GRADIO_MD_LOG_FORMAT`.
pub(crate) fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let format = log_format_from(std::env::var(LOG_FORMAT_ENV_VAR).ok().as_deref());

    match format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
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

/// Aggregate the guides into the resolved output file.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = load_config().wrap_err("failed to load configuration")?;

    let cwd = std::env::current_dir().wrap_err("cannot determine the working directory")?;
    let output = resolve_output_path(cli.output.as_deref(), &cwd, &config.output.default_filename)?;
    info!(output = %output.display(), "resolved output path");

    let transport = Transport::new(&TransportOptions::from_config(&config))?;
    let browser = Arc::new(GitHubBrowser::new(transport, &config.repository)?);

    let progress = Arc::new(CliProgress::new());
    let outcome = pipeline::run(&config, browser, &output, progress.clone()).await;
    progress.clear();

    let result = outcome?;
    println!(
        "Wrote {} guides to {}",
        result.file_count,
        result.output_path.display()
    );
    Ok(())
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
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn clear(&self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn file_fetched(&self, path: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Downloading [{current}/{total}] {path}"));
    }

    fn done(&self, _result: &RunResult) {
        self.spinner.finish_and_clear();
    }
}
