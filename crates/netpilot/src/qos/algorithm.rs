//! Queueing discipline selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A root queueing discipline we know how to install or recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// cake - Common Applications Kept Enhanced
    Cake,
    /// fq_codel - Fair Queue Controlled Delay
    FqCodel,
    /// tbf - Token Bucket Filter
    Tbf,
    /// sfq - Stochastic Fairness Queuing
    Sfq,
    /// pfifo_fast - the kernel default, restored by removing the root qdisc
    #[serde(alias = "default")]
    PfifoFast,
    /// Output that matched no known qdisc. Never installable.
    Unknown,
}

impl Algorithm {
    /// The tag used on the wire and as the `tc` kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cake => "cake",
            Self::FqCodel => "fq_codel",
            Self::Tbf => "tbf",
            Self::Sfq => "sfq",
            Self::PfifoFast => "pfifo_fast",
            Self::Unknown => "unknown",
        }
    }

    /// Map a `tc` qdisc kind keyword to a known algorithm.
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            "cake" => Some(Self::Cake),
            "fq_codel" => Some(Self::FqCodel),
            "tbf" => Some(Self::Tbf),
            "sfq" => Some(Self::Sfq),
            "pfifo_fast" => Some(Self::PfifoFast),
            _ => None,
        }
    }

    /// Whether apply needs a `bandwidth_mbit` setting.
    pub const fn requires_bandwidth(&self) -> bool {
        matches!(self, Self::Cake | Self::Tbf)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    /// Parse an installable algorithm tag. `default` is an alias for
    /// `pfifo_fast`; `unknown` and anything else is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::PfifoFast),
            other => {
                Self::from_kind(other).ok_or_else(|| Error::UnsupportedAlgorithm(s.to_string()))
            }
        }
    }
}
