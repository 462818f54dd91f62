//! Purpose: Render a run outcome for humans (or tools) on stdout/stderr.
//! Exports: `Reporter`, `ReportOptions`, `ErrorFormat`, label constants.
//! Role: Terminal step of a run; the only place that writes report text.
//! Invariants: Success writes only to the out sink; failures write only to the err sink.
//! Invariants: Each call writes exactly one report; the first line always starts with a label.
//! Invariants: Read and parse failures use distinct labels.
use std::io::{self, Write};

use serde::Serialize;

use crate::color_json::{RenderOptions, render_json};
use crate::core::error::{Error, Stage};
use crate::core::pipeline::Outcome;

pub const SUCCESS_LABEL: &str = "Config parsed successfully:";
pub const READ_FAILURE_LABEL: &str = "Failed to read config file:";
pub const PARSE_FAILURE_LABEL: &str = "Failed to parse config file:";
pub const SETUP_FAILURE_LABEL: &str = "error:";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ErrorFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ReportOptions {
    pub render: RenderOptions,
    pub color_stderr: bool,
    pub error_format: ErrorFormat,
}

#[derive(Copy, Clone, Debug)]
enum AnsiColor {
    Red,
    Green,
    Yellow,
}

pub struct Reporter {
    options: ReportOptions,
}

impl Reporter {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    pub fn report<O, E>(&self, outcome: &Outcome, out: &mut O, err: &mut E) -> io::Result<()>
    where
        O: Write,
        E: Write,
    {
        match outcome {
            Outcome::Parsed(parsed) => {
                let label =
                    colorize_label(SUCCESS_LABEL, self.options.render.color, AnsiColor::Green);
                writeln!(out, "{label}")?;
                writeln!(out, "{}", render_json(parsed.value(), self.options.render))?;
                out.flush()
            }
            Outcome::ReadFailed(error) | Outcome::ParseFailed(error) => {
                self.report_error(error, err)
            }
        }
    }

    /// Writes one labeled diagnostic; the label follows the error's stage.
    pub fn report_error<E: Write>(&self, error: &Error, err: &mut E) -> io::Result<()> {
        let rendered = match self.options.error_format {
            ErrorFormat::Text => error_text(error, self.options.color_stderr),
            ErrorFormat::Json => error_json(error),
        };
        writeln!(err, "{rendered}")?;
        err.flush()
    }
}

pub fn label_for(stage: Stage) -> &'static str {
    match stage {
        Stage::Read => READ_FAILURE_LABEL,
        Stage::Parse => PARSE_FAILURE_LABEL,
        Stage::Setup => SETUP_FAILURE_LABEL,
    }
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Green => "32",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

/// Source-chain entries that add something beyond the message itself.
fn extra_causes(error: &Error) -> Vec<String> {
    let description = error.description();
    error
        .causes()
        .into_iter()
        .filter(|cause| cause != description)
        .collect()
}

fn error_text(error: &Error, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        colorize_label(label_for(error.stage()), use_color, AnsiColor::Red),
        error.description()
    ));

    if let Some(path) = error.path() {
        lines.push(format!(
            "{} {}",
            colorize_label("path:", use_color, AnsiColor::Yellow),
            path.display()
        ));
    }
    if let Some(hint) = error.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(cause) = extra_causes(error).first() {
        lines.push(format!(
            "{} {cause}",
            colorize_label("caused by:", use_color, AnsiColor::Yellow)
        ));
    }

    lines.join("\n")
}

#[derive(Serialize)]
struct ErrorReport<'a> {
    error: ErrorBody<'a>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    label: &'static str,
    stage: &'static str,
    kind: String,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    causes: Vec<String>,
}

fn error_json(error: &Error) -> String {
    let report = ErrorReport {
        error: ErrorBody {
            label: label_for(error.stage()),
            stage: error.stage().as_str(),
            kind: format!("{:?}", error.kind()),
            message: error.description(),
            path: error.path().map(|path| path.display().to_string()),
            hint: error.hint(),
            causes: extra_causes(error),
        },
    };
    serde_json::to_string(&report).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    })
}
