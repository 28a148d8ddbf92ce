//! Test utilities for vdeps-lib.
//!
//! [`FakeRunner`] stands in for cmake and git: it records every invocation,
//! writes the CMake cache file on configure and fabricates build outputs on
//! build, so the driver and orchestrator can run end to end in a temp dir.

use std::path::Path;
use std::sync::Mutex;

use crate::consts::CMAKE_CACHE_FILE;
use crate::execute::{ExecuteError, Invocation, ToolRunner};

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

/// Which tool step an invocation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
  Submodules,
  Configure,
  Build,
}

/// Recording fake for [`ToolRunner`].
///
/// Rules are keyed by a fragment that must equal the file name of the
/// invocation's working directory (the dependency source tree) or of its
/// build directory (`build_debug`, `foo_release`, ...).
#[derive(Debug, Default)]
pub struct FakeRunner {
  calls: Mutex<Vec<Invocation>>,
  failures: Vec<(Step, String)>,
  outputs: Vec<(String, Vec<String>)>,
}

impl FakeRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Fail `step` for invocations matching `fragment`.
  pub fn fail_on(mut self, step: Step, fragment: &str) -> Self {
    self.failures.push((step, fragment.to_string()));
    self
  }

  /// On build, create `files` (relative to the build directory) for
  /// invocations matching `fragment`. `{config}` expands to the
  /// `--config` value of multi-config builds.
  pub fn produce(mut self, fragment: &str, files: &[&str]) -> Self {
    self
      .outputs
      .push((fragment.to_string(), files.iter().map(|f| f.to_string()).collect()));
    self
  }

  pub fn invocations(&self) -> Vec<Invocation> {
    self.calls.lock().unwrap().clone()
  }

  pub fn step_of(&self, invocation: &Invocation) -> Step {
    if invocation.has_arg("--build") {
      Step::Build
    } else if invocation.has_arg("-S") {
      Step::Configure
    } else {
      Step::Submodules
    }
  }

  pub fn count(&self, step: Step) -> usize {
    self
      .invocations()
      .iter()
      .filter(|inv| self.step_of(inv) == step)
      .count()
  }

  /// Invocations of `step` matching `fragment`.
  pub fn calls_for(&self, step: Step, fragment: &str) -> Vec<Invocation> {
    self
      .invocations()
      .into_iter()
      .filter(|inv| self.step_of(inv) == step && matches(inv, fragment))
      .collect()
  }
}

fn build_dir_of(invocation: &Invocation) -> Option<&Path> {
  invocation
    .arg_value("-B")
    .or_else(|| invocation.arg_value("--build"))
    .map(Path::new)
}

fn matches(invocation: &Invocation, fragment: &str) -> bool {
  let name_is = |p: &Path| p.file_name().is_some_and(|n| n == fragment);
  name_is(invocation.cwd.as_path()) || build_dir_of(invocation).is_some_and(name_is)
}

impl ToolRunner for FakeRunner {
  async fn run(&self, invocation: &Invocation) -> Result<(), ExecuteError> {
    self.calls.lock().unwrap().push(invocation.clone());
    let step = self.step_of(invocation);

    if self
      .failures
      .iter()
      .any(|(s, fragment)| *s == step && matches(invocation, fragment))
    {
      return Err(ExecuteError::CmdFailed {
        cmd: invocation.to_string(),
        code: Some(1),
      });
    }

    let Some(build_dir) = build_dir_of(invocation) else {
      return Ok(());
    };

    match step {
      Step::Configure => {
        std::fs::create_dir_all(build_dir).unwrap();
        std::fs::write(build_dir.join(CMAKE_CACHE_FILE), "# fake cache\n").unwrap();
      }
      Step::Build => {
        let config = invocation.arg_value("--config").unwrap_or("");
        for (fragment, files) in &self.outputs {
          if !matches(invocation, fragment) {
            continue;
          }
          for file in files {
            let path = build_dir.join(file.replace("{config}", config));
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, file.as_bytes()).unwrap();
          }
        }
      }
      Step::Submodules => {}
    }

    Ok(())
  }
}

/// Create `files` (relative to `root`) with placeholder content.
pub fn touch_all(root: &Path, files: &[&str]) {
  for file in files {
    let path = root.join(file);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, file.as_bytes()).unwrap();
  }
}
