//! netpilot show command implementation.

use std::io::{self, Write};

use clap::Args;
use netpilot::{QdiscSettings, Rule};
use serde_json::Value;

use super::Context;
use crate::output::{OutputFormat, OutputOptions, Printable};

#[derive(Args)]
pub struct ShowCmd {
    /// Device name.
    #[arg(value_name = "DEV")]
    dev: String,
}

/// The rule on one device, or its absence.
struct Shown {
    dev: String,
    rule: Option<Rule>,
}

impl Printable for Shown {
    fn print_text<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let Some(rule) = &self.rule else {
            return writeln!(w, "no rule on {}", self.dev);
        };

        write!(w, "{}: {}", rule.interface, rule.algorithm)?;

        if let QdiscSettings::Unknown(unknown) = &rule.settings {
            if let Some(kind) = &unknown.kind {
                write!(w, " (qdisc {kind})")?;
            }
            writeln!(w)?;
            for line in unknown.raw_output.lines() {
                writeln!(w, "    {line}")?;
            }
            return Ok(());
        }

        if let Ok(Value::Object(fields)) = serde_json::to_value(&rule.settings) {
            for (key, value) in fields {
                match value {
                    Value::String(s) => write!(w, " {key} {s}")?,
                    other => write!(w, " {key} {other}")?,
                }
            }
        }
        writeln!(w)
    }

    fn to_json(&self) -> Value {
        serde_json::to_value(&self.rule).unwrap_or(Value::Null)
    }
}

impl ShowCmd {
    pub async fn run(
        self,
        ctx: &Context,
        format: OutputFormat,
        opts: &OutputOptions,
    ) -> anyhow::Result<()> {
        let dev = self.dev;
        let rule = {
            let dev = dev.clone();
            ctx.run(move |qos| qos.get_rule(&dev)).await?
        };

        let shown = Shown { dev, rule };
        let mut stdout = io::stdout().lock();
        shown.print(&mut stdout, format, opts)?;
        Ok(())
    }
}
