use std::fmt;
use std::path::PathBuf;

use crate::build::{BuildConfig, BuildMode, UnitState};
use crate::collect::MissingArtifact;
use crate::layout::{CopiedArtifact, CopyFailure};
use crate::platform::Platform;

/// Options for one run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
  pub mode: BuildMode,
  /// Dependency names to process. Empty means every `build_by_default` one.
  pub selection: Vec<String>,
  /// Dependencies processed concurrently. `0` means one per CPU.
  pub jobs: usize,
}

impl RunOptions {
  pub fn worker_count(&self) -> usize {
    match self.jobs {
      0 => std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
      n => n,
    }
  }
}

/// Locations a run works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
  pub config_file: PathBuf,
  /// Project root; `lib/` and `tools/` are created here.
  pub root_dir: PathBuf,
  pub deps_dir: PathBuf,
}

/// Why a unit failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitFailure {
  /// The declaration was invalid or its source tree is missing.
  Configuration(String),
  Submodules(String),
  Configure(String),
  Build(String),
  Collect(String),
  /// The worker processing the dependency stopped unexpectedly.
  Aborted(String),
}

impl fmt::Display for UnitFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      UnitFailure::Configuration(msg) => write!(f, "configuration error: {msg}"),
      UnitFailure::Submodules(msg)
      | UnitFailure::Configure(msg)
      | UnitFailure::Build(msg)
      | UnitFailure::Collect(msg) => f.write_str(msg),
      UnitFailure::Aborted(msg) => write!(f, "aborted: {msg}"),
    }
  }
}

/// Outcome of one (dependency, configuration) unit.
///
/// A dependency that failed before any configuration was attempted (invalid
/// declaration, missing source tree) is reported once with `config: None`.
#[derive(Debug)]
pub struct UnitReport {
  pub dependency: String,
  pub config: Option<BuildConfig>,
  pub state: UnitState,
  /// Whether the configure step ran in this run.
  pub configured: bool,
  pub failure: Option<UnitFailure>,
  pub missing: Vec<MissingArtifact>,
  pub copied: Vec<CopiedArtifact>,
  pub copy_failures: Vec<CopyFailure>,
}

impl UnitReport {
  pub fn new(dependency: impl Into<String>, config: Option<BuildConfig>) -> Self {
    Self {
      dependency: dependency.into(),
      config,
      state: UnitState::NotConfigured,
      configured: false,
      failure: None,
      missing: Vec::new(),
      copied: Vec::new(),
      copy_failures: Vec::new(),
    }
  }

  pub fn failed(dependency: impl Into<String>, config: Option<BuildConfig>, failure: UnitFailure) -> Self {
    let mut report = Self::new(dependency, config);
    report.fail(failure);
    report
  }

  pub fn fail(&mut self, failure: UnitFailure) {
    self.state = UnitState::Failed;
    self.failure = Some(failure);
  }

  /// Collected everything it asked for and copied all of it.
  pub fn is_success(&self) -> bool {
    self.state == UnitState::ArtifactsCollected && self.missing.is_empty() && self.copy_failures.is_empty()
  }

  /// `foo [debug]`, or just `foo` for dependency-level failures.
  pub fn label(&self) -> String {
    match self.config {
      Some(config) => format!("{} [{}]", self.dependency, config),
      None => self.dependency.clone(),
    }
  }
}

/// Aggregate outcome of a run, in declaration order.
#[derive(Debug)]
pub struct RunReport {
  pub platform: Platform,
  pub units: Vec<UnitReport>,
}

impl RunReport {
  pub fn is_success(&self) -> bool {
    self.units.iter().all(UnitReport::is_success)
  }

  pub fn failed_units(&self) -> impl Iterator<Item = &UnitReport> {
    self.units.iter().filter(|u| !u.is_success())
  }

  pub fn exit_code(&self) -> u8 {
    if self.is_success() { 0 } else { 1 }
  }
}
