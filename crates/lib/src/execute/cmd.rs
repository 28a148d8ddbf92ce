//! Runs tool invocations as real child processes.

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use super::{ExecuteError, Invocation, ToolRunner};

/// [`ToolRunner`] backed by `tokio::process`.
///
/// The child inherits stdout/stderr so build tool output reaches the user
/// unmodified.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
  async fn run(&self, invocation: &Invocation) -> Result<(), ExecuteError> {
    info!(cwd = %invocation.cwd.display(), cmd = %invocation, "running");

    let mut command = Command::new(&invocation.program);
    command
      .args(&invocation.args)
      .current_dir(&invocation.cwd)
      .envs(&invocation.env)
      .stdin(Stdio::null())
      .stdout(Stdio::inherit())
      .stderr(Stdio::inherit());

    debug!(program = %invocation.program.display(), "spawning process");

    let status = command.status().await.map_err(|source| ExecuteError::Spawn {
      program: invocation.program.clone(),
      source,
    })?;

    if !status.success() {
      return Err(ExecuteError::CmdFailed {
        cmd: invocation.to_string(),
        code: status.code(),
      });
    }

    Ok(())
  }
}
