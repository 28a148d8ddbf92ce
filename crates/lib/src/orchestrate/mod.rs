//! Orchestrator: drives every selected dependency through build, collection
//! and copy for both configurations.
//!
//! Failures are per unit. A broken declaration, a failing configure or a
//! missing artifact is recorded in the [`RunReport`] and the run moves on to
//! the next unit; only run-level problems (unreadable configuration, unknown
//! dependency names) return an error.
//!
//! Dependencies run one after another unless [`RunOptions::jobs`] asks for a
//! worker pool. In that mode configurations of one dependency still run in
//! order, and copies into the shared `lib/` and `tools/` trees are serialized.

mod types;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

pub use types::*;

use crate::build::env::process_library_search_env;
use crate::build::{
  BuildConfig, BuildDriver, BuildError, BuildJob, BuildMode, ConfigureAction, Toolchain, UnitState, build_dir,
  collection_root,
};
use crate::collect::collect;
use crate::config::{self, Config, ConfigError, Declared, DependencySpec, LoadContext};
use crate::execute::ToolRunner;
use crate::layout::OutputLayout;
use crate::platform::Platform;

#[derive(Debug, Error)]
pub enum OrchestrateError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error("unknown dependencies: {}", .0.join(", "))]
  UnknownDependencies(Vec<String>),
}

/// Runs dependencies through the build pipeline.
pub struct Orchestrator<R> {
  inner: Arc<Inner<R>>,
}

struct Inner<R> {
  runner: R,
  toolchain: Toolchain,
  platform: Platform,
  config: Config,
  layout: OutputLayout,
  write_lock: Mutex<()>,
}

impl<R: ToolRunner + 'static> Orchestrator<R> {
  pub fn new(runner: R, toolchain: Toolchain, platform: Platform, root_dir: impl Into<PathBuf>, config: Config) -> Self {
    Self {
      inner: Arc::new(Inner {
        runner,
        toolchain,
        platform,
        config,
        layout: OutputLayout::new(root_dir),
        write_lock: Mutex::new(()),
      }),
    }
  }

  /// Load the configuration file and set up an orchestrator for it.
  pub fn load(runner: R, toolchain: Toolchain, platform: Platform, paths: &ProjectPaths) -> Result<Self, OrchestrateError> {
    let ctx = LoadContext::new(platform, &paths.root_dir, &paths.deps_dir);
    let config = config::load_file(&paths.config_file, &ctx)?;
    info!(
      platform = %platform,
      dependencies = config.dependencies.len(),
      "configuration loaded"
    );
    Ok(Self::new(runner, toolchain, platform, &paths.root_dir, config))
  }

  pub fn config(&self) -> &Config {
    &self.inner.config
  }

  pub fn layout(&self) -> &OutputLayout {
    &self.inner.layout
  }

  /// Indices of the dependencies to process, in declaration order.
  ///
  /// With no names every `build_by_default` dependency is selected; with
  /// names exactly those are, and any undeclared name is an error.
  pub fn select(&self, names: &[String]) -> Result<Vec<usize>, OrchestrateError> {
    let declared = &self.inner.config.dependencies;
    if names.is_empty() {
      return Ok(
        declared
          .iter()
          .enumerate()
          .filter(|(_, d)| d.build_by_default())
          .map(|(i, _)| i)
          .collect(),
      );
    }

    let unknown: Vec<String> = names
      .iter()
      .filter(|name| !declared.iter().any(|d| d.name() == name.as_str()))
      .cloned()
      .collect();
    if !unknown.is_empty() {
      return Err(OrchestrateError::UnknownDependencies(unknown));
    }

    Ok(
      declared
        .iter()
        .enumerate()
        .filter(|(_, d)| names.iter().any(|n| n == d.name()))
        .map(|(i, _)| i)
        .collect(),
    )
  }

  /// Process the selected dependencies and report every unit.
  pub async fn run(&self, options: &RunOptions) -> Result<RunReport, OrchestrateError> {
    let selected = self.select(&options.selection)?;
    let workers = options.worker_count();
    info!(
      platform = %self.inner.platform,
      dependencies = selected.len(),
      mode = ?options.mode,
      workers,
      "starting run"
    );

    let units = if workers <= 1 || selected.len() <= 1 {
      self.run_sequential(&selected, options.mode).await
    } else {
      self.run_parallel(&selected, options.mode, workers).await
    };

    Ok(RunReport {
      platform: self.inner.platform,
      units,
    })
  }

  async fn run_sequential(&self, selected: &[usize], mode: BuildMode) -> Vec<UnitReport> {
    let mut units = Vec::new();
    for &index in selected {
      units.extend(self.inner.process(index, mode).await);
    }
    units
  }

  async fn run_parallel(&self, selected: &[usize], mode: BuildMode, workers: usize) -> Vec<UnitReport> {
    let semaphore = Arc::new(Semaphore::new(workers));
    let mut join_set = JoinSet::new();

    for &index in selected {
      let inner = Arc::clone(&self.inner);
      let semaphore = Arc::clone(&semaphore);
      join_set.spawn(async move {
        let _permit = semaphore.acquire_owned().await.ok();
        (index, inner.process(index, mode).await)
      });
    }

    let mut by_index: HashMap<usize, Vec<UnitReport>> = HashMap::new();
    while let Some(joined) = join_set.join_next().await {
      match joined {
        Ok((index, units)) => {
          by_index.insert(index, units);
        }
        Err(e) => error!(error = %e, "dependency worker failed"),
      }
    }

    // Declaration order, whatever order the workers finished in.
    let mut units = Vec::new();
    for &index in selected {
      match by_index.remove(&index) {
        Some(reports) => units.extend(reports),
        None => {
          let name = self.inner.config.dependencies[index].name();
          units.push(UnitReport::failed(
            name,
            None,
            UnitFailure::Aborted("worker stopped before reporting".to_string()),
          ));
        }
      }
    }
    units
  }
}

impl<R: ToolRunner> Inner<R> {
  /// Every unit of one dependency.
  async fn process(&self, index: usize, mode: BuildMode) -> Vec<UnitReport> {
    let spec = match &self.config.dependencies[index] {
      Declared::Valid(spec) => spec,
      Declared::Invalid(invalid) => {
        error!(dependency = %invalid.name, error = %invalid.error, "skipping invalid dependency");
        return vec![UnitReport::failed(
          &invalid.name,
          None,
          UnitFailure::Configuration(invalid.error.to_string()),
        )];
      }
    };

    if !spec.source_dir.is_dir() {
      let err = ConfigError::MissingSource(spec.source_dir.clone());
      error!(dependency = %spec.name, error = %err, "skipping dependency");
      return vec![UnitReport::failed(&spec.name, None, UnitFailure::Configuration(err.to_string()))];
    }

    info!(dependency = %spec.name, "processing dependency");
    let driver = BuildDriver::new(&self.runner, &self.toolchain, self.platform);

    if let Err(e) = driver.init_submodules(spec).await {
      error!(dependency = %spec.name, error = %e, "submodule update failed");
      return BuildConfig::ALL
        .iter()
        .map(|&config| UnitReport::failed(&spec.name, Some(config), UnitFailure::Submodules(e.to_string())))
        .collect();
    }

    let mut units = Vec::with_capacity(BuildConfig::ALL.len());
    for config in BuildConfig::ALL {
      units.push(self.process_unit(&driver, spec, config, mode).await);
    }
    units
  }

  async fn process_unit(
    &self,
    driver: &BuildDriver<'_, R>,
    spec: &DependencySpec,
    config: BuildConfig,
    mode: BuildMode,
  ) -> UnitReport {
    let mut report = UnitReport::new(&spec.name, Some(config));

    if spec.build {
      let dir = build_dir(spec, &self.config.global, self.platform, config);
      let mut search_dirs = vec![self.layout.lib_dir(self.platform, config)];
      search_dirs.extend(spec.extra_link_dirs.iter().cloned());
      let env = process_library_search_env(self.platform.conventions(), &search_dirs);

      let job = BuildJob {
        spec,
        config,
        build_dir: &dir,
        mode,
        env: &env,
      };
      match driver.drive(&job, &mut report.state).await {
        Ok(action) => report.configured = action == ConfigureAction::Ran,
        Err(e) => {
          error!(dependency = %spec.name, config = %config, error = %e, "unit failed");
          report.fail(match e {
            BuildError::Submodules(_) => UnitFailure::Submodules(e.to_string()),
            BuildError::Configure(_) => UnitFailure::Configure(e.to_string()),
            BuildError::Build(_) => UnitFailure::Build(e.to_string()),
          });
          return report;
        }
      }
    } else {
      info!(dependency = %spec.name, config = %config, "skipping build (build = false)");
      report.state = UnitState::Built;
    }

    let root = collection_root(spec, &self.config.global, self.platform, config);
    let collection = match collect(&root, spec, self.platform, config) {
      Ok(collection) => collection,
      Err(e) => {
        error!(dependency = %spec.name, config = %config, error = %e, "artifact collection failed");
        report.fail(UnitFailure::Collect(e.to_string()));
        return report;
      }
    };
    for missing in &collection.missing {
      warn!(dependency = %spec.name, config = %config, artifact = %missing, "artifact not found");
    }

    let written = {
      let _guard = self.write_lock.lock().await;
      self.layout.write(&collection.instructions, self.platform, config).await
    };
    if written.copied.is_empty() {
      warn!(dependency = %spec.name, config = %config, "no artifacts copied");
    }
    debug!(
      dependency = %spec.name,
      config = %config,
      copied = written.copied.len(),
      failed = written.failed.len(),
      "copy phase done"
    );

    report.missing = collection.missing;
    report.copied = written.copied;
    report.copy_failures = written.failed;
    report.state = UnitState::ArtifactsCollected;
    report
  }
}
