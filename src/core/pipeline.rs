//! Purpose: Drive one read -> parse cycle and capture its terminal state.
//! Exports: `RunOptions`, `Outcome`, `run_once`.
//! Role: Sequences loader and parser; the reporter consumes the resulting `Outcome`.
//! Invariants: Parsing never starts after a failed read.
//! Invariants: Every call yields exactly one `Outcome`; failures are final, never retried.

use std::time::Duration;

use tracing::debug;

use crate::core::error::Error;
use crate::core::loader::load_text;
use crate::core::parser::{ParsedConfig, parse_config};
use crate::core::source::ConfigSource;

#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    pub timeout: Option<Duration>,
}

#[derive(Debug)]
pub enum Outcome {
    Parsed(ParsedConfig),
    ReadFailed(Error),
    ParseFailed(Error),
}

impl Outcome {
    pub fn error(&self) -> Option<&Error> {
        match self {
            Outcome::Parsed(_) => None,
            Outcome::ReadFailed(err) | Outcome::ParseFailed(err) => Some(err),
        }
    }
}

pub async fn run_once(source: &ConfigSource, options: &RunOptions) -> Outcome {
    debug!(path = %source.path().display(), origin = %source.origin(), "starting config check");

    let text = match load_text(source.path(), options.timeout).await {
        Ok(text) => text,
        Err(err) => return Outcome::ReadFailed(err),
    };

    match parse_config(text, source.path()) {
        Ok(parsed) => Outcome::Parsed(parsed),
        Err(err) => Outcome::ParseFailed(err),
    }
}
