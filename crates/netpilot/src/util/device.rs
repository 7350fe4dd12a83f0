//! Interface enumeration through sysfs.
//!
//! Used to offer the operator a list of interfaces a rule can be applied
//! to: everything that is administratively up and is not a loopback.

use std::fs;
use std::io;
use std::path::Path;

/// Default sysfs directory holding one entry per network interface.
pub const SYSFS_NET: &str = "/sys/class/net";

/// List interfaces that are up and not loopback, sorted by name.
///
/// # Example
/// ```ignore
/// let names = netpilot::util::list_interfaces()?;
/// // e.g. ["eth0", "wlan0"]
/// ```
pub fn list_interfaces() -> io::Result<Vec<String>> {
    list_interfaces_in(SYSFS_NET)
}

/// Same as [`list_interfaces`], reading from an arbitrary sysfs-like root.
///
/// Entries without a readable `flags` file are skipped.
pub fn list_interfaces_in(root: impl AsRef<Path>) -> io::Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in fs::read_dir(root.as_ref())? {
        let entry = entry?;
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };

        let Ok(raw) = fs::read_to_string(entry.path().join("flags")) else {
            continue;
        };
        let Some(flags) = parse_flags(&raw) else {
            continue;
        };

        let loopback = (flags & libc::IFF_LOOPBACK as u32) != 0;
        let up = (flags & libc::IFF_UP as u32) != 0;
        if up && !loopback {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

/// Parse the hex flags word sysfs exposes (e.g. `0x1003`).
fn parse_flags(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    let hex = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    u32::from_str_radix(hex, 16).ok()
}
