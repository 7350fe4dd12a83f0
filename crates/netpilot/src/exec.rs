//! Running external programs.
//!
//! [`CommandRunner`] is the one capability the QoS core needs from the
//! outside world: run a program with arguments, wait for it, and hand back
//! its exit status together with everything it printed, standard output
//! first and standard error after it. [`SystemRunner`]
//! does that with [`std::process::Command`]; tests substitute a scripted
//! runner.

use std::io;
use std::process::{Command, Stdio};

/// Exit status and captured output of a finished program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `None` if the process was killed by a signal.
    pub code: Option<i32>,
    /// Standard output followed by standard error.
    pub output: String,
}

impl CommandOutput {
    /// Create an output for a process that exited with `code`.
    pub fn new(code: i32, output: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            output: output.into(),
        }
    }

    /// Create an output for a successful run.
    pub fn ok(output: impl Into<String>) -> Self {
        Self::new(0, output)
    }

    /// Whether the process exited with status 0.
    #[inline]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Describe the exit status for error messages.
    pub fn status(&self) -> String {
        match self.code {
            Some(code) => format!("exit status: {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Synchronously execute a program and capture its output.
pub trait CommandRunner {
    /// Run `program` with `args` and wait for it to exit.
    ///
    /// Returns `Err` only when the program could not be started; a non-zero
    /// exit is reported through [`CommandOutput::code`]. The two streams are
    /// captured separately, so [`CommandOutput::output`] holds all of stdout
    /// followed by all of stderr rather than their interleaving.
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        (**self).run(program, args)
    }
}

/// Runs programs on the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        let out = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;

        let mut output = String::from_utf8_lossy(&out.stdout).into_owned();
        output.push_str(&String::from_utf8_lossy(&out.stderr));

        Ok(CommandOutput {
            code: out.status.code(),
            output,
        })
    }
}
