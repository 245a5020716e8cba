//! OS command execution with deadlines.

use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;

use crate::error::{FailoverError, FailoverResult};
use crate::resilience::timeouts::with_deadline;

/// Captured result of a finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Render a command line for logs and errors.
pub fn display(program: &str, args: &[&str]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Run a command to completion, whatever its exit status.
///
/// The child is killed if the deadline elapses.
pub async fn output(program: &str, args: &[&str], deadline: Duration) -> FailoverResult<CommandOutput> {
    let label = display(program, args);
    let mut cmd = Command::new(program);
    cmd.args(args).stdin(Stdio::null()).kill_on_drop(true);

    with_deadline(&label, deadline, async { Ok(CommandOutput::from(cmd.output().await?)) }).await
}

/// Run a command and fail unless it exits with status 0.
pub async fn run(program: &str, args: &[&str], deadline: Duration) -> FailoverResult<CommandOutput> {
    let out = output(program, args, deadline).await?;
    if out.success() {
        Ok(out)
    } else {
        Err(FailoverError::CommandFailed {
            command: display(program, args),
            code: out.code,
            stderr: out.stderr.trim().to_string(),
        })
    }
}
