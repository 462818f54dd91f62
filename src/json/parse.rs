//! Purpose: Provide the internal runtime JSON decode entrypoint and failure categories.
//! Exports: `from_str`, `ParseFailureCategory`, `categorize_error`, `categorize_message`,
//! `hint_for_error`.
//! Role: Parser boundary that centralizes serde_json usage details.
//! Invariants: Nesting depth is bounded only by memory; deep documents grow the stack on
//! the heap instead of hitting a recursion limit.
//! Invariants: Numbers keep their literal text, so out-of-range values still parse.
//! Invariants: Categories are derived from the error class plus message text only.
//! Invariants: Hints never echo the input payload.
//! Notes: Error mapping into the crate error type is done by callsites so path context
//! stays explicit.

use serde::de::DeserializeOwned;
use serde_json::error::Category;

pub(crate) fn from_str<T: DeserializeOwned>(input: &str) -> Result<T, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_str(input);
    de.disable_recursion_limit();
    let value: T = serde::Deserialize::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ParseFailureCategory {
    Syntax,
    Eof,
    TrailingCharacters,
    NumericRange,
    DepthLimit,
    Utf8,
    Unknown,
}

impl ParseFailureCategory {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => "syntax",
            ParseFailureCategory::Eof => "eof",
            ParseFailureCategory::TrailingCharacters => "trailing-characters",
            ParseFailureCategory::NumericRange => "numeric-range",
            ParseFailureCategory::DepthLimit => "depth-limit",
            ParseFailureCategory::Utf8 => "utf8",
            ParseFailureCategory::Unknown => "unknown",
        }
    }
}

pub(crate) fn categorize_error(err: &serde_json::Error) -> ParseFailureCategory {
    match categorize_message(&err.to_string()) {
        ParseFailureCategory::Unknown => match err.classify() {
            Category::Eof => ParseFailureCategory::Eof,
            Category::Syntax => ParseFailureCategory::Syntax,
            Category::Data | Category::Io => ParseFailureCategory::Unknown,
        },
        category => category,
    }
}

pub(crate) fn categorize_message(message: &str) -> ParseFailureCategory {
    let lower = message.to_ascii_lowercase();
    if lower.contains("recursion limit") {
        ParseFailureCategory::DepthLimit
    } else if lower.contains("number out of range") {
        ParseFailureCategory::NumericRange
    } else if lower.contains("trailing characters") {
        ParseFailureCategory::TrailingCharacters
    } else if lower.contains("invalid unicode code point") || lower.contains("utf-8") {
        ParseFailureCategory::Utf8
    } else if lower.contains("eof while parsing") {
        ParseFailureCategory::Eof
    } else {
        ParseFailureCategory::Unknown
    }
}

pub(crate) fn hint_for_error(err: &serde_json::Error, context: &str) -> String {
    format!(
        "parse category: {}; context: {context}",
        categorize_error(err).as_str()
    )
}
