//! Purpose: `confpeek` CLI entry point.
//! Role: Binary crate root; parses args, runs one config check, reports, picks the exit code.
//! Invariants: Success output goes to stdout; diagnostics and logs go to stderr.
//! Invariants: Failed checks exit 0 unless `--strict`; usage errors always exit 2.
//! Invariants: Exactly one report is written per run.
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind};
use tracing_subscriber::EnvFilter;

use confpeek::color_json::{DEFAULT_INDENT, RenderOptions};
use confpeek::core::error::{Error, ErrorKind, to_exit_code};
use confpeek::core::pipeline::{Outcome, RunOptions, run_once};
use confpeek::core::source::config_source_from_env;
use confpeek::report::{ErrorFormat, ReportOptions, Reporter};

const LOG_ENV_VAR: &str = "CONFPEEK_LOG";

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                return Ok(RunOutcome::ok());
            }
            _ => {
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(clap_error_summary(&err))
                        .with_hint("Try `confpeek --help`."),
                    ColorMode::Auto,
                ));
            }
        },
    };

    let color_mode = cli.color;
    init_tracing(color_mode.use_color(io::stderr().is_terminal()));

    let options = RunOptions {
        timeout: cli
            .timeout
            .as_deref()
            .map(parse_duration)
            .transpose()
            .map_err(|err| (err, color_mode))?,
    };
    let reporter = Reporter::new(report_options(&cli));
    let source = config_source_from_env(cli.path);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| {
            (
                Error::new(ErrorKind::Internal)
                    .with_message("failed to start runtime")
                    .with_source(err),
                color_mode,
            )
        })?;
    let outcome = runtime.block_on(run_once(&source, &options));
    // A timed-out read can leave its blocking thread stuck in open/read.
    runtime.shutdown_background();

    reporter
        .report(&outcome, &mut io::stdout().lock(), &mut io::stderr().lock())
        .map_err(|err| {
            (
                Error::new(ErrorKind::Io)
                    .with_message("failed to write report")
                    .with_source(err),
                color_mode,
            )
        })?;

    Ok(RunOutcome::with_code(exit_code_for(&outcome, cli.strict)))
}

#[derive(Parser)]
#[command(
    name = "confpeek",
    version,
    about = "Read one JSON config file, parse it, and print the result",
    long_about = None,
    after_help = r#"EXAMPLES
  $ confpeek /etc/myapp/config.json
  $ CONFPEEK_CONFIG=./dev.json confpeek --indent 4
  $ confpeek --strict --error-format json config.json

The config path comes from PATH, then $CONFPEEK_CONFIG, then /root/test/new_config.conf.
Set CONFPEEK_LOG=debug to trace the read and parse steps on stderr."#
)]
struct Cli {
    #[arg(help = "Config file to read", value_hint = ValueHint::FilePath)]
    path: Option<PathBuf>,
    #[arg(
        long,
        default_value = "auto",
        value_enum,
        help = "Colorize labels and JSON output: auto|always|never"
    )]
    color: ColorMode,
    #[arg(
        long,
        default_value_t = DEFAULT_INDENT as u8,
        value_parser = clap::value_parser!(u8).range(0..=16),
        help = "Spaces per indent level in the printed JSON"
    )]
    indent: u8,
    #[arg(
        long,
        default_value = "text",
        value_enum,
        help = "Diagnostic format on stderr: text|json"
    )]
    error_format: ErrorFormatCli,
    #[arg(long, help = "Give up on the read after this long (e.g. 500ms, 5s)")]
    timeout: Option<String>,
    #[arg(long, help = "Exit non-zero when the config cannot be read or parsed")]
    strict: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ErrorFormatCli {
    Text,
    Json,
}

impl From<ErrorFormatCli> for ErrorFormat {
    fn from(value: ErrorFormatCli) -> Self {
        match value {
            ErrorFormatCli::Text => ErrorFormat::Text,
            ErrorFormatCli::Json => ErrorFormat::Json,
        }
    }
}

fn report_options(cli: &Cli) -> ReportOptions {
    ReportOptions {
        render: RenderOptions {
            indent: usize::from(cli.indent),
            color: cli.color.use_color(io::stdout().is_terminal()),
        },
        color_stderr: cli.color.use_color(io::stderr().is_terminal()),
        error_format: cli.error_format.into(),
    }
}

fn exit_code_for(outcome: &Outcome, strict: bool) -> i32 {
    match outcome.error() {
        Some(err) if strict => to_exit_code(err.kind()),
        _ => 0,
    }
}

fn init_tracing(use_color: bool) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(use_color)
        .with_writer(io::stderr)
        .try_init();
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let options = ReportOptions {
        color_stderr: color_mode.use_color(io::stderr().is_terminal()),
        ..ReportOptions::default()
    };
    let _ = Reporter::new(options).report_error(err, &mut io::stderr().lock());
}

fn parse_duration(input: &str) -> Result<Duration, Error> {
    let invalid = || {
        Error::new(ErrorKind::Usage)
            .with_message(format!("invalid duration: {input:?}"))
            .with_hint("Use a number plus ms|s|m|h (e.g. 10s).")
    };
    let trimmed = input.trim();
    let split = trimmed.char_indices().find(|(_, ch)| !ch.is_ascii_digit());
    let (num_str, unit) = match split {
        Some((idx, _)) => trimmed.split_at(idx),
        None => return Err(invalid()),
    };
    if num_str.is_empty() {
        return Err(invalid());
    }
    let value: u64 = num_str.parse().map_err(|_| invalid())?;
    let millis = match unit {
        "ms" => value,
        "s" => value.saturating_mul(1_000),
        "m" => value.saturating_mul(60_000),
        "h" => value.saturating_mul(3_600_000),
        _ => return Err(invalid()),
    };
    Ok(Duration::from_millis(millis))
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}
