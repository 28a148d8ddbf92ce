//! Implementation of the `vdeps` run.
//!
//! Loads `vdeps.toml`, builds the selected dependencies for the current
//! platform in both configurations, and prints one line per unit.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::debug;

use vdeps_lib::build::{BuildMode, Toolchain};
use vdeps_lib::execute::SystemRunner;
use vdeps_lib::orchestrate::{Orchestrator, ProjectPaths, RunOptions, RunReport, UnitReport};
use vdeps_lib::platform::Platform;

use crate::output::{format_duration, print_error, print_info, print_stat, print_success, print_warning};

/// Arguments of a run, as parsed from the command line.
#[derive(Debug, Clone)]
pub struct RunArgs {
  pub config: PathBuf,
  pub root: Option<PathBuf>,
  pub deps_dir: PathBuf,
  pub names: Vec<String>,
  pub build_only: bool,
  pub jobs: usize,
}

/// Execute a run and map its report to the process exit code.
pub fn cmd_run(args: &RunArgs) -> Result<ExitCode> {
  let started = Instant::now();
  let paths = resolve_paths(args)?;
  debug!(
    config = %paths.config_file.display(),
    root = %paths.root_dir.display(),
    deps = %paths.deps_dir.display(),
    "resolved project paths"
  );

  let orchestrator = Orchestrator::load(SystemRunner, Toolchain::from_env(), Platform::current(), &paths)
    .with_context(|| format!("Failed to load {}", paths.config_file.display()))?;

  let options = RunOptions {
    mode: if args.build_only {
      BuildMode::BuildOnly
    } else {
      BuildMode::Full
    },
    selection: args.names.clone(),
    jobs: args.jobs,
  };

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt.block_on(orchestrator.run(&options))?;

  print_report(&report, started.elapsed());
  Ok(ExitCode::from(report.exit_code()))
}

fn resolve_paths(args: &RunArgs) -> Result<ProjectPaths> {
  let config_file = dunce::canonicalize(&args.config)
    .with_context(|| format!("Configuration file not found: {}", args.config.display()))?;

  let root_dir = match &args.root {
    Some(root) => {
      dunce::canonicalize(root).with_context(|| format!("Project root not found: {}", root.display()))?
    }
    None => config_file
      .parent()
      .map(Path::to_path_buf)
      .context("Configuration file has no parent directory")?,
  };
  let deps_dir = root_dir.join(&args.deps_dir);

  Ok(ProjectPaths {
    config_file,
    root_dir,
    deps_dir,
  })
}

fn print_report(report: &RunReport, elapsed: Duration) {
  println!();
  for unit in &report.units {
    print_unit(unit);
  }

  let failed = report.failed_units().count();
  println!();
  print_info(&format!("{} units, {} failed", report.units.len(), failed));
  print_stat("Platform", report.platform.as_str());
  print_stat("Elapsed", &format_duration(elapsed));
}

fn print_unit(unit: &UnitReport) {
  let label = unit.label();
  if unit.is_success() {
    print_success(&format!("{} ({} copied)", label, unit.copied.len()));
    return;
  }

  match &unit.failure {
    Some(failure) => print_error(&format!("{}: {}", label, failure)),
    None => print_error(&format!("{}: incomplete", label)),
  }
  for missing in &unit.missing {
    print_warning(&format!("missing {}", missing));
  }
  for failure in &unit.copy_failures {
    print_warning(&format!(
      "could not copy {} to {}: {}",
      failure.source.display(),
      failure.destination.display(),
      failure.error
    ));
  }
}
