//! netpilot apply command implementation.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Args;
use netpilot::RuleRequest;

use super::Context;

#[derive(Args)]
pub struct ApplyCmd {
    /// Device name.
    #[arg(value_name = "DEV", required_unless_present = "from_json")]
    dev: Option<String>,

    /// Algorithm: cake, fq_codel, tbf, sfq or default.
    #[arg(value_name = "ALGORITHM", required_unless_present = "from_json")]
    algorithm: Option<String>,

    /// Bandwidth in megabits per second (cake, tbf).
    #[arg(short = 'b', long, value_name = "MBIT", value_parser = parse_mbit)]
    bandwidth: Option<f64>,

    /// Read a JSON rule from a file, or "-" for stdin.
    #[arg(long, value_name = "FILE", conflicts_with_all = ["dev", "algorithm", "bandwidth"])]
    from_json: Option<PathBuf>,
}

impl ApplyCmd {
    pub async fn run(self, ctx: &Context) -> anyhow::Result<()> {
        let request = self.request()?;
        ctx.run(move |qos| qos.apply_rule(&request)).await
    }

    fn request(self) -> anyhow::Result<RuleRequest> {
        if let Some(path) = self.from_json {
            let json = read_input(&path)?;
            return RuleRequest::from_json(&json)
                .with_context(|| format!("parsing rule from {}", path.display()));
        }

        // clap guarantees both are present without --from-json
        let (Some(dev), Some(algorithm)) = (self.dev, self.algorithm) else {
            anyhow::bail!("DEV and ALGORITHM are required");
        };

        let mut request = RuleRequest::new(dev, algorithm);
        if let Some(mbit) = self.bandwidth {
            request = request.setting(netpilot::qos::settings::BANDWIDTH_MBIT, mbit);
        }
        Ok(request)
    }
}

/// Any finite number; whole-number and range checks happen in the library.
fn parse_mbit(s: &str) -> Result<f64, String> {
    let mbit: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if !mbit.is_finite() {
        return Err(format!("must be a finite number, got {s}"));
    }
    Ok(mbit)
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading rule from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
