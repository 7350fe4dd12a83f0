//! netpilot - apply, show and remove root qdisc rules.

mod commands;
mod output;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use netpilot::TcConfig;

use commands::Context;
use output::{OutputFormat, OutputOptions};

#[derive(Parser)]
#[command(name = "netpilot", version, about = "Root qdisc rule manager")]
struct Cli {
    /// Output JSON.
    #[arg(short = 'j', long, global = true)]
    json: bool,

    /// Pretty print JSON.
    #[arg(short = 'p', long, global = true)]
    pretty: bool,

    /// Log every tc invocation.
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// YAML configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to the tc binary.
    #[arg(long, global = true, value_name = "PATH")]
    tc_path: Option<String>,

    /// Run tc through sudo.
    #[arg(long, global = true)]
    sudo: bool,

    /// Give up on a tc call after this many seconds.
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replace the root qdisc of an interface.
    Apply(commands::apply::ApplyCmd),

    /// Show the root qdisc of an interface.
    #[command(visible_alias = "get")]
    Show(commands::show::ShowCmd),

    /// Remove the root qdisc of an interface.
    #[command(visible_alias = "delete")]
    Del(commands::del::DelCmd),

    /// List interfaces that are up.
    #[command(visible_alias = "ls")]
    Interfaces(commands::interfaces::InterfacesCmd),
}

impl Cli {
    fn tc_config(&self) -> anyhow::Result<TcConfig> {
        let mut config = match &self.config {
            Some(path) => TcConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => TcConfig::default(),
        };
        if let Some(program) = &self.tc_path {
            config.program = program.clone();
        }
        if self.sudo {
            config.sudo = true;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let opts = OutputOptions { pretty: cli.pretty };

    if let Err(e) = run(cli, format, &opts).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }

    Ok(())
}

async fn run(cli: Cli, format: OutputFormat, opts: &OutputOptions) -> anyhow::Result<()> {
    let ctx = Context::new(cli.tc_config()?, cli.timeout.map(Duration::from_secs));

    match cli.command {
        Command::Apply(cmd) => cmd.run(&ctx).await,
        Command::Show(cmd) => cmd.run(&ctx, format, opts).await,
        Command::Del(cmd) => cmd.run(&ctx).await,
        Command::Interfaces(cmd) => cmd.run(format, opts),
    }
}

/// 2 for requests rejected before tc ran, 1 for everything else.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<netpilot::Error>() {
        Some(e) if e.is_validation() => 2,
        _ => 1,
    }
}
