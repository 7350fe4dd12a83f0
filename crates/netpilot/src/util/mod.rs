//! Shared utilities for netpilot.

pub mod device;
pub mod rate;

pub use device::{list_interfaces, list_interfaces_in};
pub use rate::{format_mbit, get_rate, get_size, get_time};
