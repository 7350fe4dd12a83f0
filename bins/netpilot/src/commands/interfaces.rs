//! netpilot interfaces command implementation.

use std::io::{self, Write};

use anyhow::Context as _;
use clap::Args;

use crate::output::{OutputFormat, OutputOptions, Printable};

#[derive(Args)]
pub struct InterfacesCmd {}

struct Interface(String);

impl Printable for Interface {
    fn print_text<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "{}", self.0)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::String(self.0.clone())
    }
}

impl InterfacesCmd {
    pub fn run(self, format: OutputFormat, opts: &OutputOptions) -> anyhow::Result<()> {
        let names = netpilot::util::list_interfaces().context("listing interfaces")?;
        let interfaces: Vec<_> = names.into_iter().map(Interface).collect();

        let mut stdout = io::stdout().lock();
        interfaces.print(&mut stdout, format, opts)?;
        Ok(())
    }
}
