//! The three rule operations offered to callers.

use super::rule::{Rule, RuleRequest};
use crate::config::TcConfig;
use crate::error::Result;
use crate::exec::{CommandRunner, SystemRunner};
use crate::tc::Tc;

/// Apply, read and delete root qdisc rules.
///
/// Stateless: every call goes to `tc`, so concurrent use on different
/// interfaces is independent. Calls on the same interface are not ordered
/// against each other.
///
/// # Example
///
/// ```ignore
/// use netpilot::{QosManager, RuleRequest, TcConfig};
///
/// let qos = QosManager::new(TcConfig::default());
///
/// qos.apply_rule(&RuleRequest::new("eth0", "cake").bandwidth_mbit(500))?;
///
/// if let Some(rule) = qos.get_rule("eth0")? {
///     println!("{} on {}", rule.algorithm, rule.interface);
/// }
///
/// qos.delete_rule("eth0")?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct QosManager<R = SystemRunner> {
    tc: Tc<R>,
}

impl QosManager<SystemRunner> {
    /// Create a manager that runs `tc` on the host.
    pub fn new(config: TcConfig) -> Self {
        Self { tc: Tc::new(config) }
    }
}

impl<R: CommandRunner> QosManager<R> {
    /// Create a manager with a custom runner.
    pub fn with_runner(config: TcConfig, runner: R) -> Self {
        Self {
            tc: Tc::with_runner(config, runner),
        }
    }

    /// Validate `request` and install it as the root qdisc.
    ///
    /// Nothing runs if validation fails. Once validated, the existing root
    /// qdisc is removed first; if the add then fails the interface is left
    /// with the kernel default rather than its previous qdisc.
    pub fn apply_rule(&self, request: &RuleRequest) -> Result<()> {
        let config = request.validate()?;
        self.tc.apply_qdisc(&request.interface, &config)
    }

    /// Remove any custom root qdisc. Idempotent.
    pub fn delete_rule(&self, interface: &str) -> Result<()> {
        self.tc.delete_root(interface)
    }

    /// Read the live rule on `interface`.
    ///
    /// `Ok(None)` when the interface does not exist.
    pub fn get_rule(&self, interface: &str) -> Result<Option<Rule>> {
        Ok(self
            .tc
            .current_qdisc(interface)?
            .map(|settings| Rule::new(interface, settings)))
    }
}
