//! netpilot del command implementation.

use clap::Args;

use super::Context;

#[derive(Args)]
pub struct DelCmd {
    /// Device name.
    #[arg(value_name = "DEV")]
    dev: String,
}

impl DelCmd {
    pub async fn run(self, ctx: &Context) -> anyhow::Result<()> {
        let dev = self.dev;
        ctx.run(move |qos| qos.delete_rule(&dev)).await
    }
}
