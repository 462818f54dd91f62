//! Purpose: Turn loaded config text into a generic JSON value.
//! Exports: `ParsedConfig`, `parse_config`.
//! Role: Maps `json::parse` failures into parse-stage crate errors with a category hint.
//! Invariants: Any syntactically valid JSON document is accepted, scalars included.
//! Invariants: No schema checks; a `ParsedConfig` exists only for fully valid input.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::core::error::{Error, ErrorKind};
use crate::json::parse;

#[derive(Clone, Debug, PartialEq)]
pub struct ParsedConfig {
    path: PathBuf,
    value: Value,
}

impl ParsedConfig {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

pub fn parse_config(text: String, path: &Path) -> Result<ParsedConfig, Error> {
    match parse::from_str::<Value>(&text) {
        Ok(value) => {
            debug!(path = %path.display(), kind = value_kind(&value), "parsed config");
            Ok(ParsedConfig {
                path: path.to_path_buf(),
                value,
            })
        }
        Err(err) => {
            let category = parse::categorize_error(&err);
            debug!(path = %path.display(), category = category.as_str(), "config parse failed");
            Err(Error::new(ErrorKind::Parse)
                .with_message(err.to_string())
                .with_hint(parse::hint_for_error(&err, "config"))
                .with_path(path)
                .with_source(err))
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
