//! Installing and removing root qdiscs.
//!
//! Every install first removes whatever root qdisc is present, then adds the
//! requested one:
//!
//! ```text
//! tc qdisc del dev eth0 root                                   (errors ignored)
//! tc qdisc add dev eth0 root cake bandwidth 500mbit
//! tc qdisc add dev eth0 root tbf rate 500mbit buffer 1600 limit 3000
//! tc qdisc add dev eth0 root fq_codel
//! tc qdisc add dev eth0 root sfq
//! ```
//!
//! pfifo_fast is the kernel default, so "installing" it is just the removal.

use tracing::{debug, info, warn};

use super::settings::QdiscConfig;
use crate::error::Result;
use crate::exec::CommandRunner;
use crate::tc::Tc;
use crate::util::rate::format_mbit;

impl QdiscConfig {
    /// Arguments following `tc qdisc add dev <dev> root`.
    ///
    /// `None` when nothing has to be added.
    pub fn tc_args(&self, tbf_buffer: u32, tbf_limit: u32) -> Option<Vec<String>> {
        let args = match *self {
            Self::Cake { bandwidth_mbit } => vec![
                "cake".to_string(),
                "bandwidth".to_string(),
                format_mbit(bandwidth_mbit),
            ],
            Self::Tbf { bandwidth_mbit } => vec![
                "tbf".to_string(),
                "rate".to_string(),
                format_mbit(bandwidth_mbit),
                "buffer".to_string(),
                tbf_buffer.to_string(),
                "limit".to_string(),
                tbf_limit.to_string(),
            ],
            Self::FqCodel => vec!["fq_codel".to_string()],
            Self::Sfq => vec!["sfq".to_string()],
            Self::PfifoFast => return None,
        };
        Some(args)
    }
}

impl<R: CommandRunner> Tc<R> {
    /// Remove the root qdisc of `dev`, ignoring every failure.
    ///
    /// Deleting a qdisc that is not there fails, and so does a missing
    /// interface; neither matters to the caller.
    pub fn clear_root(&self, dev: &str) {
        match self.exec(&["qdisc", "del", "dev", dev, "root"]) {
            Ok(out) if out.success() => debug!(dev, "removed root qdisc"),
            Ok(out) => debug!(
                dev,
                status = %out.status(),
                output = out.output.trim_end(),
                "no root qdisc removed"
            ),
            Err(e) => warn!(dev, error = %e, "could not run tc to remove root qdisc"),
        }
    }

    /// Replace the root qdisc of `dev` with `config`.
    ///
    /// The removal step never fails the call; the add step does.
    pub fn apply_qdisc(&self, dev: &str, config: &QdiscConfig) -> Result<()> {
        self.clear_root(dev);

        let Some(extra) = config.tc_args(self.config().tbf_buffer, self.config().tbf_limit) else {
            info!(dev, "restored default qdisc");
            return Ok(());
        };

        let algorithm = config.algorithm();
        let mut args = vec!["qdisc", "add", "dev", dev, "root"];
        args.extend(extra.iter().map(String::as_str));
        self.exec_checked(&format!("apply {algorithm} qdisc"), &args)?;

        info!(dev, %algorithm, "applied root qdisc");
        Ok(())
    }

    /// Remove any custom root qdisc from `dev`.
    ///
    /// Always succeeds, including when there was nothing to remove.
    pub fn delete_root(&self, dev: &str) -> Result<()> {
        self.clear_root(dev);
        info!(dev, "deleted root qdisc");
        Ok(())
    }
}
