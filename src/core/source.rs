//! Purpose: Decide which config file a run reads.
//! Exports: `DEFAULT_CONFIG_PATH`, `CONFIG_ENV_VAR`, `ConfigSource`, `Origin`,
//! `resolve_config_path`, `config_source_from_env`.
//! Role: Keep path precedence in one pure function so the CLI and tests agree.
//! Invariants: Precedence is CLI argument, then `CONFPEEK_CONFIG`, then the default.
//! Invariants: Empty values are treated as unset; paths are otherwise used verbatim.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "/root/test/new_config.conf";
pub const CONFIG_ENV_VAR: &str = "CONFPEEK_CONFIG";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Origin {
    Argument,
    Environment,
    Default,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Origin::Argument => "argument",
            Origin::Environment => CONFIG_ENV_VAR,
            Origin::Default => "default",
        };
        f.write_str(label)
    }
}

/// The config file location for one run. Fixed at startup.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    path: PathBuf,
    origin: Origin,
}

impl ConfigSource {
    pub fn new(path: impl Into<PathBuf>, origin: Origin) -> Self {
        Self {
            path: path.into(),
            origin,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }
}

pub fn resolve_config_path(arg: Option<PathBuf>, env_value: Option<OsString>) -> ConfigSource {
    if let Some(path) = arg.filter(|path| !path.as_os_str().is_empty()) {
        return ConfigSource::new(path, Origin::Argument);
    }
    if let Some(value) = env_value.filter(|value| !value.is_empty()) {
        return ConfigSource::new(value, Origin::Environment);
    }
    ConfigSource::new(DEFAULT_CONFIG_PATH, Origin::Default)
}

pub fn config_source_from_env(arg: Option<PathBuf>) -> ConfigSource {
    resolve_config_path(arg, std::env::var_os(CONFIG_ENV_VAR))
}
