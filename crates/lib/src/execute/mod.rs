//! External tool execution.
//!
//! Everything that starts a process goes through [`ToolRunner`], so the build
//! driver can be exercised with a recording fake instead of a real cmake.

mod cmd;
mod types;

use std::future::Future;

pub use cmd::SystemRunner;
pub use types::*;

/// Runs one [`Invocation`] to completion.
pub trait ToolRunner: Send + Sync {
  fn run(&self, invocation: &Invocation) -> impl Future<Output = Result<(), ExecuteError>> + Send;
}
