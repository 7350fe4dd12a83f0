//! How to reach the `tc` utility.
//!
//! Every field has a default, so an empty file (or no file at all) gives a
//! working configuration that runs `tc` from `PATH` without `sudo`.
//!
//! ```yaml
//! program: /sbin/tc
//! sudo: true
//! tbf_buffer: 1600
//! tbf_limit: 3000
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Default program name, resolved through `PATH`.
pub const DEFAULT_TC_PROGRAM: &str = "tc";

/// Default TBF bucket size in bytes.
pub const DEFAULT_TBF_BUFFER: u32 = 1600;

/// Default TBF queue limit in bytes.
pub const DEFAULT_TBF_LIMIT: u32 = 3000;

/// Configuration for the `tc` invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TcConfig {
    /// Path or name of the `tc` binary.
    pub program: String,
    /// Run `tc` through `sudo`.
    pub sudo: bool,
    /// TBF `buffer` parameter in bytes.
    pub tbf_buffer: u32,
    /// TBF `limit` parameter in bytes.
    pub tbf_limit: u32,
}

impl Default for TcConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_TC_PROGRAM.to_string(),
            sudo: false,
            tbf_buffer: DEFAULT_TBF_BUFFER,
            tbf_limit: DEFAULT_TBF_LIMIT,
        }
    }
}

impl TcConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `tc` program path.
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Run `tc` through `sudo`.
    pub fn sudo(mut self, sudo: bool) -> Self {
        self.sudo = sudo;
        self
    }

    /// Set the TBF bucket size in bytes.
    pub fn tbf_buffer(mut self, bytes: u32) -> Self {
        self.tbf_buffer = bytes;
        self
    }

    /// Set the TBF queue limit in bytes.
    pub fn tbf_limit(mut self, bytes: u32) -> Self {
        self.tbf_limit = bytes;
        self
    }

    /// Load a configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading configuration from {:?}", path);

        let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::from_yaml(&contents).map_err(|e| match e {
            Error::Config { message, .. } => Error::Config {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Parse a configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| Error::Config {
            path: "<string>".into(),
            message: e.to_string(),
        })
    }
}
