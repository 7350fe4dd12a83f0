//! Root queueing discipline management through the `tc` utility.
//!
//! netpilot installs, inspects and removes the root qdisc of Linux network
//! interfaces by running `tc` and reading its output back. It keeps no state:
//! every read reflects what the kernel reports at that moment.
//!
//! Supported algorithms are cake, fq_codel, tbf, sfq and the kernel default
//! (pfifo_fast).
//!
//! # Example
//!
//! ```ignore
//! use netpilot::{QosManager, RuleRequest, TcConfig};
//!
//! fn main() -> netpilot::Result<()> {
//!     let qos = QosManager::new(TcConfig::new().sudo(true));
//!
//!     qos.apply_rule(&RuleRequest::new("eth0", "cake").bandwidth_mbit(500))?;
//!
//!     match qos.get_rule("eth0")? {
//!         Some(rule) => println!("{}: {}", rule.interface, rule.algorithm),
//!         None => println!("eth0 does not exist"),
//!     }
//!
//!     qos.delete_rule("eth0")?;
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! All process execution goes through [`CommandRunner`]. Supply your own
//! runner with [`QosManager::with_runner`] to script `tc` responses.

pub mod config;
pub mod error;
pub mod exec;
pub mod qos;
pub mod tc;
pub mod util;

pub use config::TcConfig;
pub use error::{Error, Result};
pub use exec::{CommandOutput, CommandRunner, SystemRunner};
pub use qos::{Algorithm, QdiscConfig, QdiscSettings, QosManager, Rule, RuleRequest, Settings};
pub use tc::Tc;
