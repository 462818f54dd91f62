//! Purpose: Read one config file into UTF-8 text.
//! Exports: `load_text`.
//! Role: The only filesystem touchpoint of a run; maps I/O failures into read-stage errors.
//! Invariants: Exactly one read per call; no retries, no caching, no path validation.
//! Invariants: Decoding is strict UTF-8; a leading BOM is kept and left for the parser to reject.
//! Invariants: The optional timeout bounds the read only, never the decode.

use std::io;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use crate::core::error::{Error, ErrorKind};

pub async fn load_text(path: &Path, timeout: Option<Duration>) -> Result<String, Error> {
    debug!(path = %path.display(), ?timeout, "reading config");

    let read = tokio::fs::read(path);
    let bytes = match timeout {
        Some(limit) => match tokio::time::timeout(limit, read).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    path = %path.display(),
                    timeout_ms = limit.as_millis() as u64,
                    "config read timed out"
                );
                return Err(Error::new(ErrorKind::Timeout)
                    .with_message(format!("read timed out after {}ms", limit.as_millis()))
                    .with_path(path)
                    .with_hint("Raise --timeout or check whether the file lives on a slow mount."));
            }
        },
        None => read.await,
    }
    .map_err(|err| read_error(path, err))?;

    debug!(path = %path.display(), bytes = bytes.len(), "read config");
    decode_text(path, bytes)
}

fn decode_text(path: &Path, bytes: Vec<u8>) -> Result<String, Error> {
    String::from_utf8(bytes).map_err(|err| {
        let offset = err.utf8_error().valid_up_to();
        Error::new(ErrorKind::Encoding)
            .with_message(format!(
                "file is not valid UTF-8 (first bad byte at offset {offset})"
            ))
            .with_path(path)
            .with_source(err)
    })
}

fn read_error(path: &Path, err: io::Error) -> Error {
    let (kind, hint) = match err.kind() {
        io::ErrorKind::NotFound => (
            ErrorKind::NotFound,
            Some("Pass the config path as an argument or set CONFPEEK_CONFIG."),
        ),
        io::ErrorKind::PermissionDenied => (
            ErrorKind::Permission,
            Some("Check file permissions for the current user."),
        ),
        io::ErrorKind::InvalidData => (ErrorKind::Encoding, None),
        io::ErrorKind::IsADirectory => (
            ErrorKind::Io,
            Some("The path names a directory, not a file."),
        ),
        _ => (ErrorKind::Io, None),
    };

    let mut error = Error::new(kind)
        .with_message(err.to_string())
        .with_path(path);
    if let Some(hint) = hint {
        error = error.with_hint(hint);
    }
    error.with_source(err)
}
