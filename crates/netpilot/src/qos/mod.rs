//! Root qdisc rules.
//!
//! - [`algorithm`]: the supported queueing disciplines
//! - [`settings`]: request validation and parsed parameters
//! - [`dispatch`]: clearing and installing the root qdisc
//! - [`parser`]: reading it back from `tc qdisc show`
//! - [`rule`] / [`manager`]: the caller-facing rule operations

pub mod algorithm;
pub mod dispatch;
pub mod manager;
pub mod parser;
pub mod rule;
pub mod settings;

pub use algorithm::Algorithm;
pub use manager::QosManager;
pub use parser::parse_qdisc_show;
pub use rule::{Rule, RuleRequest};
pub use settings::{
    CakeSettings, DefaultSettings, FqCodelSettings, QdiscConfig, QdiscSettings, SfqSettings,
    Settings, TbfSettings, UnknownSettings,
};
