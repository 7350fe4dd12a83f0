//! Rules: what runs on which interface.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::algorithm::Algorithm;
use super::settings::{BANDWIDTH_MBIT, QdiscConfig, QdiscSettings, Settings};
use crate::error::Result;

/// The root qdisc observed on one interface.
///
/// Built fresh from `tc` output on every read and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// Interface name.
    pub interface: String,
    /// Detected algorithm.
    pub algorithm: Algorithm,
    /// Parameters found in the `tc` output.
    pub settings: QdiscSettings,
}

impl Rule {
    /// Wrap parsed settings with the interface they were read from.
    pub fn new(interface: impl Into<String>, settings: QdiscSettings) -> Self {
        Self {
            interface: interface.into(),
            algorithm: settings.algorithm(),
            settings,
        }
    }
}

/// A rule as requested by a caller, before validation.
///
/// The algorithm is kept as the raw tag so that an unknown tag surfaces as
/// [`Error::UnsupportedAlgorithm`](crate::Error::UnsupportedAlgorithm)
/// rather than a deserialisation error.
///
/// ```
/// use netpilot::RuleRequest;
///
/// let req: RuleRequest = serde_json::from_str(
///     r#"{"interface": "eth0", "algorithm": "cake", "settings": {"bandwidth_mbit": 500}}"#,
/// )?;
/// assert_eq!(req, RuleRequest::new("eth0", "cake").bandwidth_mbit(500));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleRequest {
    /// Interface to configure.
    pub interface: String,
    /// Requested algorithm tag.
    pub algorithm: String,
    /// Algorithm parameters.
    #[serde(default)]
    pub settings: Settings,
}

impl RuleRequest {
    /// Create a request with no settings.
    pub fn new(interface: impl Into<String>, algorithm: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            algorithm: algorithm.into(),
            settings: Settings::new(),
        }
    }

    /// Set an arbitrary setting.
    pub fn setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Set `bandwidth_mbit`.
    pub fn bandwidth_mbit(self, mbit: u32) -> Self {
        self.setting(BANDWIDTH_MBIT, mbit)
    }

    /// Parse a request from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the algorithm tag and its required settings.
    pub fn validate(&self) -> Result<QdiscConfig> {
        let algorithm: Algorithm = self.algorithm.parse()?;
        QdiscConfig::from_settings(algorithm, &self.settings)
    }
}
