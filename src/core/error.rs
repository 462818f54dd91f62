//! Purpose: Crate-wide error type shared by the loader, parser, reporter and CLI.
//! Exports: `Error`, `ErrorKind`, `Stage`, `to_exit_code`.
//! Role: Carries kind + optional context (message, hint, path, source) to the reporter.
//! Invariants: Every kind belongs to exactly one `Stage`.
//! Invariants: Exit-code mapping is stable; new kinds get new codes.
use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Internal,
    Usage,
    NotFound,
    Permission,
    Encoding,
    Io,
    Parse,
    Timeout,
}

/// Where in a run an error happened.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    Setup,
    Read,
    Parse,
}

impl ErrorKind {
    pub fn stage(self) -> Stage {
        match self {
            ErrorKind::Internal | ErrorKind::Usage => Stage::Setup,
            ErrorKind::NotFound
            | ErrorKind::Permission
            | ErrorKind::Encoding
            | ErrorKind::Io
            | ErrorKind::Timeout => Stage::Read,
            ErrorKind::Parse => Stage::Parse,
        }
    }

    pub fn default_message(self) -> &'static str {
        match self {
            ErrorKind::Internal => "internal error",
            ErrorKind::Usage => "usage error",
            ErrorKind::NotFound => "file not found",
            ErrorKind::Permission => "permission denied",
            ErrorKind::Encoding => "file is not valid UTF-8",
            ErrorKind::Io => "i/o error",
            ErrorKind::Parse => "invalid JSON",
            ErrorKind::Timeout => "timed out",
        }
    }
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Setup => "setup",
            Stage::Read => "read",
            Stage::Parse => "parse",
        }
    }
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    hint: Option<String>,
    path: Option<PathBuf>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            hint: None,
            path: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn stage(&self) -> Stage {
        self.kind.stage()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Message if set, otherwise the kind's fallback text.
    pub fn description(&self) -> &str {
        self.message
            .as_deref()
            .unwrap_or_else(|| self.kind.default_message())
    }

    /// Display strings of the `source()` chain, outermost first.
    pub fn causes(&self) -> Vec<String> {
        let mut causes = Vec::new();
        let mut cur = self.source();
        while let Some(source) = cur {
            causes.push(source.to_string());
            cur = source.source();
        }
        causes
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::NotFound => 3,
        ErrorKind::Permission => 4,
        ErrorKind::Encoding => 5,
        ErrorKind::Io => 6,
        ErrorKind::Parse => 7,
        ErrorKind::Timeout => 8,
    }
}
