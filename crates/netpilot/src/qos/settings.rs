//! Per-algorithm parameters.
//!
//! Two directions, two shapes:
//!
//! - Requests carry [`Settings`], an untyped JSON map, because every
//!   algorithm takes different parameters. [`QdiscConfig::from_settings`]
//!   validates it into a typed install plan.
//! - Reads produce [`QdiscSettings`], a variant per algorithm with named
//!   optional fields, serialised as a flat map.

use serde::Serialize;
use serde_json::Value;

use super::algorithm::Algorithm;
use crate::error::{Error, Result};
use crate::util::rate;

/// Untyped request parameters, keyed by name.
pub type Settings = serde_json::Map<String, Value>;

/// Setting key holding the bandwidth of rate-limiting algorithms.
pub const BANDWIDTH_MBIT: &str = "bandwidth_mbit";

// ============================================================================
// Desired configuration
// ============================================================================

/// A validated root qdisc to install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QdiscConfig {
    /// cake shaped to `bandwidth_mbit`.
    Cake {
        /// Shaping bandwidth in megabits per second.
        bandwidth_mbit: u32,
    },
    /// tbf limited to `bandwidth_mbit`.
    Tbf {
        /// Rate in megabits per second.
        bandwidth_mbit: u32,
    },
    /// fq_codel with kernel defaults.
    FqCodel,
    /// sfq with kernel defaults.
    Sfq,
    /// No custom qdisc; the kernel default takes over.
    PfifoFast,
}

impl QdiscConfig {
    /// Validate request settings for `algorithm`.
    ///
    /// Fails with [`Error::UnsupportedAlgorithm`] for [`Algorithm::Unknown`]
    /// and with [`Error::MissingSetting`] / [`Error::InvalidSetting`] when a
    /// required setting is absent or unusable. Extra keys are ignored.
    pub fn from_settings(algorithm: Algorithm, settings: &Settings) -> Result<Self> {
        let bandwidth = if algorithm.requires_bandwidth() {
            bandwidth_mbit(algorithm, settings)?
        } else {
            0
        };

        match algorithm {
            Algorithm::Cake => Ok(Self::Cake {
                bandwidth_mbit: bandwidth,
            }),
            Algorithm::Tbf => Ok(Self::Tbf {
                bandwidth_mbit: bandwidth,
            }),
            Algorithm::FqCodel => Ok(Self::FqCodel),
            Algorithm::Sfq => Ok(Self::Sfq),
            Algorithm::PfifoFast => Ok(Self::PfifoFast),
            Algorithm::Unknown => Err(Error::UnsupportedAlgorithm(algorithm.to_string())),
        }
    }

    /// The algorithm this configuration installs.
    pub const fn algorithm(&self) -> Algorithm {
        match self {
            Self::Cake { .. } => Algorithm::Cake,
            Self::Tbf { .. } => Algorithm::Tbf,
            Self::FqCodel => Algorithm::FqCodel,
            Self::Sfq => Algorithm::Sfq,
            Self::PfifoFast => Algorithm::PfifoFast,
        }
    }
}

/// Extract `bandwidth_mbit` as a whole number of megabits.
///
/// JSON decoders hand numbers over as floats, so `500.0` is accepted.
/// Fractional, negative, non-finite and out-of-range values are rejected
/// rather than truncated.
fn bandwidth_mbit(algorithm: Algorithm, settings: &Settings) -> Result<u32> {
    let algo = algorithm.as_str();
    let value = settings
        .get(BANDWIDTH_MBIT)
        .filter(|v| !v.is_null())
        .ok_or(Error::MissingSetting {
            algorithm: algo,
            key: BANDWIDTH_MBIT,
        })?;

    let invalid = |reason: String| Error::InvalidSetting {
        algorithm: algo,
        key: BANDWIDTH_MBIT,
        reason,
    };

    if let Some(n) = value.as_u64() {
        return u32::try_from(n).map_err(|_| invalid(format!("is out of range: {n}")));
    }

    let Some(f) = value.as_f64() else {
        return Err(invalid(format!("must be a number, got {value}")));
    };
    if !f.is_finite() || f < 0.0 {
        return Err(invalid(format!("must be a non-negative number, got {f}")));
    }
    if f.fract() != 0.0 {
        return Err(invalid(format!("must be a whole number of megabits, got {f}")));
    }
    if f > f64::from(u32::MAX) {
        return Err(invalid(format!("is out of range: {f}")));
    }
    Ok(f as u32)
}

// ============================================================================
// Observed configuration
// ============================================================================

/// Settings scraped from `tc qdisc show`, typed by algorithm.
///
/// Every field is optional: a field the output does not show (or shows in
/// an unexpected format) is simply absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QdiscSettings {
    /// cake
    Cake(CakeSettings),
    /// fq_codel
    FqCodel(FqCodelSettings),
    /// tbf
    Tbf(TbfSettings),
    /// sfq
    Sfq(SfqSettings),
    /// pfifo_fast, or nothing at all
    Default(DefaultSettings),
    /// No known qdisc was found
    Unknown(UnknownSettings),
}

/// cake parameters as printed by `tc`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CakeSettings {
    /// Shaping bandwidth (e.g. `500Mbit`, `unlimited`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<String>,
    /// Diffserv mode (`diffserv3`, `besteffort`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diffserv: Option<String>,
    /// Flow isolation mode (`triple-isolate`, `dual-srchost`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_isolation: Option<String>,
    /// RTT estimate (e.g. `100ms`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rtt: Option<String>,
    /// Per-packet overhead in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overhead: Option<String>,
    /// NAT-aware flow hashing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nat: Option<bool>,
    /// DSCP washing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wash: Option<bool>,
    /// ACK filter mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ack_filter: Option<String>,
}

/// fq_codel parameters as printed by `tc`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FqCodelSettings {
    /// Queue limit in packets (e.g. `10240p`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    /// Number of flows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flows: Option<String>,
    /// Bytes dequeued per round.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantum: Option<String>,
    /// Target delay.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Control interval.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    /// Memory limit (e.g. `32Mb`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<String>,
    /// Drop batch size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_batch: Option<String>,
    /// ECN marking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecn: Option<bool>,
}

/// tbf parameters as printed by `tc`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TbfSettings {
    /// Rate (e.g. `500Mbit`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<String>,
    /// Bucket size (e.g. `1600b`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub burst: Option<String>,
    /// Maximum latency derived from the limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency: Option<String>,
    /// Queue limit in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

/// sfq parameters as printed by `tc`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SfqSettings {
    /// Queue limit in packets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    /// Bytes dequeued per round.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantum: Option<String>,
    /// Per-flow depth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<String>,
    /// Hash table divisor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub divisor: Option<String>,
    /// Hash perturbation period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perturb: Option<String>,
}

/// The kernel default carries no settings. Serialises as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DefaultSettings {}

/// Output we could not interpret, kept for diagnosis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnknownSettings {
    /// First qdisc kind seen, if any line looked like a qdisc.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// The full `tc` output.
    pub raw_output: String,
}

impl QdiscSettings {
    /// Settings of the kernel default qdisc.
    pub const fn default_qdisc() -> Self {
        Self::Default(DefaultSettings {})
    }

    /// The algorithm these settings describe.
    pub const fn algorithm(&self) -> Algorithm {
        match self {
            Self::Cake(_) => Algorithm::Cake,
            Self::FqCodel(_) => Algorithm::FqCodel,
            Self::Tbf(_) => Algorithm::Tbf,
            Self::Sfq(_) => Algorithm::Sfq,
            Self::Default(_) => Algorithm::PfifoFast,
            Self::Unknown(_) => Algorithm::Unknown,
        }
    }

    /// The shaping rate as printed: cake `bandwidth` or tbf `rate`.
    pub fn bandwidth(&self) -> Option<&str> {
        match self {
            Self::Cake(cake) => cake.bandwidth.as_deref(),
            Self::Tbf(tbf) => tbf.rate.as_deref(),
            _ => None,
        }
    }

    /// The shaping rate normalised to bits per second.
    ///
    /// `Ok(None)` when there is no rate or cake runs `unlimited`. A rate with
    /// a unit we cannot read is [`Error::Parse`].
    pub fn bandwidth_bps(&self) -> Result<Option<u64>> {
        match self.bandwidth() {
            None | Some("unlimited") => Ok(None),
            Some(b) => Ok(Some(rate::get_rate(b)?)),
        }
    }
}
