//! Handle for invoking the `tc` utility.

use tracing::debug;

use crate::config::TcConfig;
use crate::error::{Error, Result};
use crate::exec::{CommandOutput, CommandRunner, SystemRunner};

/// A configured `tc` binary plus the runner used to execute it.
///
/// Holds no state between calls. Qdisc operations are implemented on this
/// type in [`crate::qos`].
#[derive(Debug, Clone, Default)]
pub struct Tc<R = SystemRunner> {
    config: TcConfig,
    runner: R,
}

impl Tc<SystemRunner> {
    /// Create a handle that runs `tc` on the host.
    pub fn new(config: TcConfig) -> Self {
        Self::with_runner(config, SystemRunner)
    }
}

impl<R: CommandRunner> Tc<R> {
    /// Create a handle with a custom runner.
    pub fn with_runner(config: TcConfig, runner: R) -> Self {
        Self { config, runner }
    }

    /// The configuration this handle was built with.
    pub fn config(&self) -> &TcConfig {
        &self.config
    }

    /// Run `tc` with the given arguments.
    ///
    /// Only a failure to start the program is an error here; callers decide
    /// what a non-zero exit means.
    pub fn exec(&self, args: &[&str]) -> Result<CommandOutput> {
        let (program, argv) = self.command_line(args);
        debug!(%program, ?argv, "running tc");

        self.runner
            .run(&program, &argv)
            .map_err(|source| Error::Spawn { program, source })
    }

    /// Run `tc` and turn a non-zero exit into [`Error::CommandFailed`].
    pub fn exec_checked(&self, operation: &str, args: &[&str]) -> Result<CommandOutput> {
        let out = self.exec(args)?;
        if !out.success() {
            return Err(Error::command_failed(operation, out.status(), out.output));
        }
        Ok(out)
    }

    fn command_line(&self, args: &[&str]) -> (String, Vec<String>) {
        let args = args.iter().map(|a| a.to_string());
        if self.config.sudo {
            let argv = std::iter::once(self.config.program.clone())
                .chain(args)
                .collect();
            ("sudo".to_string(), argv)
        } else {
            (self.config.program.clone(), args.collect())
        }
    }
}
