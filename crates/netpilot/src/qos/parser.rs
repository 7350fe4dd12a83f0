//! Reading the active root qdisc back from `tc qdisc show`.
//!
//! `tc` prints one line per qdisc:
//!
//! ```text
//! qdisc cake 8001: root refcnt 2 bandwidth 500Mbit diffserv3 triple-isolate nonat nowash no-ack-filter split-gso rtt 100ms raw overhead 0
//! qdisc fq_codel 0: root refcnt 2 limit 10240p flows 1024 quantum 1514 target 5ms interval 100ms memory_limit 32Mb ecn drop_batch 64
//! qdisc tbf 8002: root refcnt 2 rate 500Mbit burst 1600b lat 3.2ms
//! qdisc sfq 8003: root refcnt 2 limit 127p quantum 1514b depth 127 divisor 1024 perturb 10sec
//! ```
//!
//! The text is not a stable interface: fields come and go between kernel and
//! iproute2 versions. Parsing is therefore done in two lenient stages. The
//! first `qdisc <kind>` line with a kind we know selects the algorithm; then
//! each labelled field is looked up independently and kept only if the value
//! after the label has the expected shape. Rates, sizes and times must also
//! be accepted by [`crate::util::rate`]. Nothing here returns an error.

use tracing::debug;
use winnow::ascii::digit1;
use winnow::combinator::{alt, opt};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_while;

use super::algorithm::Algorithm;
use super::settings::{
    CakeSettings, FqCodelSettings, QdiscSettings, SfqSettings, TbfSettings, UnknownSettings,
};
use crate::error::{Error, Result};
use crate::exec::CommandRunner;
use crate::tc::Tc;
use crate::util::rate::{get_rate, get_size, get_time};

/// Result type for the token parsers.
type PResult<T> = core::result::Result<T, ErrMode<ContextError>>;

const CAKE_DIFFSERV: [&str; 5] = [
    "diffserv3",
    "diffserv4",
    "diffserv8",
    "besteffort",
    "precedence",
];
const CAKE_FLOW_MODES: [&str; 8] = [
    "flowblind",
    "srchost",
    "dsthost",
    "hosts",
    "flows",
    "dual-srchost",
    "dual-dsthost",
    "triple-isolate",
];
const CAKE_ACK_FILTER: [&str; 3] = ["ack-filter", "ack-filter-aggressive", "no-ack-filter"];

// ============================================================================
// Token parsers
// ============================================================================

fn number<'s>(input: &mut &'s str) -> PResult<&'s str> {
    (digit1, opt(('.', digit1))).take().parse_next(input)
}

fn unit<'s>(input: &mut &'s str) -> PResult<&'s str> {
    take_while(1.., |c: char| c.is_ascii_alphabetic()).parse_next(input)
}

/// `500Mbit`, `1.5Gbit`, `64Kbit`
fn rate<'s>(input: &mut &'s str) -> PResult<&'s str> {
    (number, unit)
        .take()
        .verify(|t: &str| get_rate(t).is_ok())
        .parse_next(input)
}

/// `5ms`, `3.2ms`, `100us`, `10sec`
fn time<'s>(input: &mut &'s str) -> PResult<&'s str> {
    (number, unit)
        .take()
        .verify(|t: &str| get_time(t).is_ok())
        .parse_next(input)
}

/// `1600b`, `32Kb`, `10240p`, `1514`
fn size<'s>(input: &mut &'s str) -> PResult<&'s str> {
    (digit1, opt(unit))
        .take()
        .verify(|t: &str| get_size(t).is_ok())
        .parse_next(input)
}

/// `1024`
fn count<'s>(input: &mut &'s str) -> PResult<&'s str> {
    digit1.parse_next(input)
}

/// `0`, `-4`, `38`
fn signed<'s>(input: &mut &'s str) -> PResult<&'s str> {
    (opt('-'), digit1).take().parse_next(input)
}

/// `500Mbit` or `unlimited`
fn bandwidth<'s>(input: &mut &'s str) -> PResult<&'s str> {
    alt(("unlimited", rate)).parse_next(input)
}

// ============================================================================
// Field extraction
// ============================================================================

/// The whitespace-separated words of one `qdisc` line.
struct Fields<'a> {
    tokens: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            tokens: line.split_whitespace().collect(),
        }
    }

    /// Value after `label`, if it fully matches `parser`.
    fn value<P>(&self, label: &str, mut parser: P) -> Option<String>
    where
        P: Parser<&'a str, &'a str, ErrMode<ContextError>>,
    {
        let pos = self.tokens.iter().position(|t| *t == label)?;
        let token = *self.tokens.get(pos + 1)?;
        parser.parse(token).ok().map(str::to_string)
    }

    /// First bare flag present from `choices`.
    fn one_of(&self, choices: &[&str]) -> Option<String> {
        self.tokens
            .iter()
            .copied()
            .find(|t| choices.contains(t))
            .map(str::to_string)
    }

    /// `Some(true)` if `on` is present, `Some(false)` if `off` is.
    fn switch(&self, on: &str, off: &str) -> Option<bool> {
        self.tokens.iter().find_map(|t| match *t {
            t if t == on => Some(true),
            t if t == off => Some(false),
            _ => None,
        })
    }

    fn has(&self, flag: &str) -> bool {
        self.tokens.contains(&flag)
    }
}

fn cake_settings(fields: &Fields<'_>) -> CakeSettings {
    CakeSettings {
        bandwidth: fields.value("bandwidth", bandwidth),
        diffserv: fields.one_of(&CAKE_DIFFSERV),
        flow_isolation: fields.one_of(&CAKE_FLOW_MODES),
        rtt: fields.value("rtt", time),
        overhead: fields.value("overhead", signed),
        nat: fields.switch("nat", "nonat"),
        wash: fields.switch("wash", "nowash"),
        ack_filter: fields.one_of(&CAKE_ACK_FILTER),
    }
}

fn fq_codel_settings(fields: &Fields<'_>) -> FqCodelSettings {
    FqCodelSettings {
        limit: fields.value("limit", size),
        flows: fields.value("flows", count),
        quantum: fields.value("quantum", size),
        target: fields.value("target", time),
        interval: fields.value("interval", time),
        memory_limit: fields.value("memory_limit", size),
        drop_batch: fields.value("drop_batch", count),
        ecn: fields.has("ecn").then_some(true),
    }
}

fn tbf_settings(fields: &Fields<'_>) -> TbfSettings {
    TbfSettings {
        rate: fields.value("rate", rate),
        burst: fields.value("burst", size),
        latency: fields.value("lat", time),
        limit: fields.value("limit", size),
    }
}

fn sfq_settings(fields: &Fields<'_>) -> SfqSettings {
    SfqSettings {
        limit: fields.value("limit", size),
        quantum: fields.value("quantum", size),
        depth: fields.value("depth", count),
        divisor: fields.value("divisor", count),
        perturb: fields.value("perturb", time),
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Interpret the output of `tc qdisc show dev <iface>`.
///
/// Pure and total: identical input always yields identical settings.
///
/// - blank output is the kernel default with no settings;
/// - the first line whose kind we know selects the algorithm, and fields
///   that do not match are left out;
/// - anything else is [`QdiscSettings::Unknown`] holding the raw text.
pub fn parse_qdisc_show(output: &str) -> QdiscSettings {
    if output.trim().is_empty() {
        return QdiscSettings::default_qdisc();
    }

    let mut first_kind = None;
    for line in output.lines() {
        let fields = Fields::new(line);
        let (Some(&"qdisc"), Some(&kind)) = (fields.tokens.first(), fields.tokens.get(1)) else {
            continue;
        };
        if first_kind.is_none() {
            first_kind = Some(kind);
        }

        let Some(algorithm) = Algorithm::from_kind(kind) else {
            continue;
        };
        return match algorithm {
            Algorithm::Cake => QdiscSettings::Cake(cake_settings(&fields)),
            Algorithm::FqCodel => QdiscSettings::FqCodel(fq_codel_settings(&fields)),
            Algorithm::Tbf => QdiscSettings::Tbf(tbf_settings(&fields)),
            Algorithm::Sfq => QdiscSettings::Sfq(sfq_settings(&fields)),
            Algorithm::PfifoFast | Algorithm::Unknown => QdiscSettings::default_qdisc(),
        };
    }

    QdiscSettings::Unknown(UnknownSettings {
        kind: first_kind.map(str::to_string),
        raw_output: output.to_string(),
    })
}

/// Whether `tc` output says the interface does not exist.
pub fn is_missing_device(output: &str) -> bool {
    output.contains("does not exist") || output.contains("Cannot find device")
}

impl<R: CommandRunner> Tc<R> {
    /// Read the root qdisc currently installed on `dev`.
    ///
    /// Returns `Ok(None)` when `tc` reports that the interface does not
    /// exist. Any other failure to run `tc` is an error carrying its output.
    pub fn current_qdisc(&self, dev: &str) -> Result<Option<QdiscSettings>> {
        let out = self.exec(&["qdisc", "show", "dev", dev])?;

        if !out.success() {
            if is_missing_device(&out.output) {
                debug!(dev, "interface does not exist, no rule");
                return Ok(None);
            }
            return Err(Error::command_failed(
                format!("show qdisc on {dev}"),
                out.status(),
                out.output,
            ));
        }

        Ok(Some(parse_qdisc_show(&out.output)))
    }
}
