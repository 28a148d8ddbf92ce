//! Per (dependency, configuration) configure/build state machine.

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::toolchain::{Toolchain, build_args, configure_args};
use super::{BuildConfig, BuildMode, BuildState, UnitState};
use crate::config::DependencySpec;
use crate::execute::{ExecuteError, Invocation, ToolRunner};
use crate::platform::Platform;

#[derive(Debug, Error)]
pub enum BuildError {
  #[error("submodule update failed: {0}")]
  Submodules(#[source] ExecuteError),

  #[error("configure failed: {0}")]
  Configure(#[source] ExecuteError),

  #[error("build failed: {0}")]
  Build(#[source] ExecuteError),
}

/// What happened to the configure step of one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigureAction {
  Ran,
  /// Not run; carries the state that made it unnecessary.
  Skipped(BuildState),
}

/// Result of the submodule step for one dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmoduleOutcome {
  NotRequested,
  NotARepository,
  Updated,
}

/// One unit of build work.
#[derive(Debug, Clone, Copy)]
pub struct BuildJob<'a> {
  pub spec: &'a DependencySpec,
  pub config: BuildConfig,
  pub build_dir: &'a Path,
  pub mode: BuildMode,
  /// Extra environment for every tool call of this unit.
  pub env: &'a BTreeMap<String, String>,
}

/// Drives cmake for one platform.
pub struct BuildDriver<'a, R> {
  runner: &'a R,
  toolchain: &'a Toolchain,
  platform: Platform,
}

impl<'a, R: ToolRunner> BuildDriver<'a, R> {
  pub fn new(runner: &'a R, toolchain: &'a Toolchain, platform: Platform) -> Self {
    Self {
      runner,
      toolchain,
      platform,
    }
  }

  /// `git submodule update --init --recursive --depth 1` in the source tree
  /// when requested and the tree (or its parent) is a git checkout.
  pub async fn init_submodules(&self, spec: &DependencySpec) -> Result<SubmoduleOutcome, BuildError> {
    if !spec.init_submodules {
      return Ok(SubmoduleOutcome::NotRequested);
    }

    let source = &spec.source_dir;
    let in_repo = source.join(".git").exists() || source.parent().is_some_and(|p| p.join(".git").exists());
    if !in_repo {
      info!(dependency = %spec.name, "skipping submodule update (not a git repository)");
      return Ok(SubmoduleOutcome::NotARepository);
    }

    info!(dependency = %spec.name, "initializing submodules");
    let invocation = Invocation::new(&self.toolchain.git, source).args([
      "submodule",
      "update",
      "--init",
      "--recursive",
      "--depth",
      "1",
    ]);
    self.runner.run(&invocation).await.map_err(BuildError::Submodules)?;
    Ok(SubmoduleOutcome::Updated)
  }

  /// Advance `state` through configure and build.
  ///
  /// On success `state` is [`UnitState::Built`]; on error it is
  /// [`UnitState::Failed`] and the error says which step failed.
  pub async fn drive(&self, job: &BuildJob<'_>, state: &mut UnitState) -> Result<ConfigureAction, BuildError> {
    let action = match self.configure_if_needed(job).await {
      Ok(action) => action,
      Err(err) => {
        *state = UnitState::Failed;
        return Err(err);
      }
    };
    *state = UnitState::Configured;

    if let Err(err) = self.build(job).await {
      *state = UnitState::Failed;
      return Err(err);
    }
    *state = UnitState::Built;
    Ok(action)
  }

  async fn configure_if_needed(&self, job: &BuildJob<'_>) -> Result<ConfigureAction, BuildError> {
    let existing = BuildState::inspect(job.build_dir);
    if !existing.needs_configure(job.mode) {
      if existing == BuildState::Partial {
        warn!(
          dependency = %job.spec.name,
          config = %job.config,
          build_dir = %job.build_dir.display(),
          "build directory exists without a completed configuration; skipping configure"
        );
      } else {
        debug!(dependency = %job.spec.name, config = %job.config, "already configured");
      }
      return Ok(ConfigureAction::Skipped(existing));
    }

    info!(
      dependency = %job.spec.name,
      config = %job.config,
      build_type = job.config.cmake_build_type(self.platform),
      "configuring"
    );
    let args = configure_args(
      &job.spec.source_dir,
      job.build_dir,
      self.platform,
      job.config,
      job.spec.cxx_standard,
      &job.spec.cmake_options,
    );
    let invocation = Invocation::new(&self.toolchain.cmake, &job.spec.source_dir)
      .args(args)
      .envs(job.env);
    self.runner.run(&invocation).await.map_err(BuildError::Configure)?;
    Ok(ConfigureAction::Ran)
  }

  async fn build(&self, job: &BuildJob<'_>) -> Result<(), BuildError> {
    info!(dependency = %job.spec.name, config = %job.config, "building");
    let invocation = Invocation::new(&self.toolchain.cmake, &job.spec.source_dir)
      .args(build_args(job.build_dir, self.platform, job.config))
      .envs(job.env);
    self.runner.run(&invocation).await.map_err(BuildError::Build)
  }
}
