//! Rate, size and time strings as `tc` reads and prints them.
//!
//! `tc` accepts lowercase unit suffixes on input (`500mbit`) and prints
//! capitalised ones on output (`500Mbit`, `1600b`, `5ms`). The helpers here
//! produce the former and normalise the latter so that values read back
//! from `tc qdisc show` can be compared with what was applied.
//!
//! # Example
//!
//! ```
//! use netpilot::util::rate;
//!
//! assert_eq!(rate::format_mbit(500), "500mbit");
//! assert_eq!(rate::get_rate("500Mbit").unwrap(), rate::mbit_to_bits(500));
//! ```

use std::time::Duration;

/// Error type for unit parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("unknown unit: {0}")]
    UnknownUnit(String),
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Format a megabit count the way `tc` expects it on the command line.
///
/// ```
/// use netpilot::util::rate::format_mbit;
///
/// assert_eq!(format_mbit(500), "500mbit");
/// assert_eq!(format_mbit(0), "0mbit");
/// ```
pub fn format_mbit(mbit: u32) -> String {
    format!("{mbit}mbit")
}

/// Convert megabits per second to bits per second.
#[inline]
pub const fn mbit_to_bits(mbit: u64) -> u64 {
    mbit * 1_000_000
}

/// Parse a rate into bits per second.
///
/// Case-insensitive; supports `bit`, `kbit`, `mbit`, `gbit`, `tbit`, their
/// binary `kibit`.. forms and the `bps` family (bytes per second).
pub fn get_rate(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase();
    let (num_str, unit) = split_number_unit(&s);
    let num = parse_number(num_str)?;

    let multiplier: f64 = match unit {
        "" | "bit" => 1.0,
        "kbit" | "k" => 1e3,
        "mbit" | "m" => 1e6,
        "gbit" | "g" => 1e9,
        "tbit" | "t" => 1e12,
        "kibit" => 1024.0,
        "mibit" => 1024.0 * 1024.0,
        "gibit" => 1024.0 * 1024.0 * 1024.0,
        "tibit" => 1024.0 * 1024.0 * 1024.0 * 1024.0,
        "bps" => 8.0,
        "kbps" => 8e3,
        "mbps" => 8e6,
        "gbps" => 8e9,
        "tbps" => 8e12,
        _ => return Err(ParseError::UnknownUnit(unit.to_string())),
    };

    Ok((num * multiplier) as u64)
}

/// Parse a size into bytes.
///
/// `tc` prints sizes as `1600b`, `32Kb`, `4Mb`; the `k`/`m`/`g` prefixes are
/// binary. A trailing `p` (packets) is accepted and counted as-is.
pub fn get_size(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase();
    let (num_str, unit) = split_number_unit(&s);
    let num = parse_number(num_str)?;

    let multiplier: f64 = match unit {
        "" | "b" | "p" => 1.0,
        "k" | "kb" => 1024.0,
        "m" | "mb" => 1024.0 * 1024.0,
        "g" | "gb" => 1024.0 * 1024.0 * 1024.0,
        _ => return Err(ParseError::UnknownUnit(unit.to_string())),
    };

    Ok((num * multiplier) as u64)
}

/// Parse a time duration (`s`, `sec`, `ms`, `us`, `ns`).
pub fn get_time(s: &str) -> Result<Duration> {
    let s = s.trim().to_lowercase();
    let (num_str, unit) = split_number_unit(&s);
    let num = parse_number(num_str)?;

    let nanos_per_unit: f64 = match unit {
        "" | "s" | "sec" | "secs" => 1e9,
        "ms" | "msec" | "msecs" => 1e6,
        "us" | "usec" | "usecs" => 1e3,
        "ns" | "nsec" | "nsecs" => 1.0,
        _ => return Err(ParseError::UnknownUnit(unit.to_string())),
    };

    Ok(Duration::from_nanos((num * nanos_per_unit).round() as u64))
}

fn parse_number(s: &str) -> Result<f64> {
    let num: f64 = s
        .parse()
        .map_err(|_| ParseError::InvalidNumber(s.to_string()))?;
    if !num.is_finite() || num < 0.0 {
        return Err(ParseError::InvalidNumber(s.to_string()));
    }
    Ok(num)
}

/// Split a string into number and unit parts.
fn split_number_unit(s: &str) -> (&str, &str) {
    let idx = s
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(s.len());
    (&s[..idx], &s[idx..])
}
