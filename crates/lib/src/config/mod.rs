//! Configuration model loaded from `vdeps.toml`.
//!
//! The file is read once per run. A syntax error in the file is fatal; a bad
//! `[[dependency]]` record only invalidates that dependency, which is kept in
//! declaration order as [`Declared::Invalid`] so the orchestrator can report
//! it alongside the others.

mod types;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

pub use types::*;

use crate::placeholder::{self, project_vars};
use crate::platform::{TokenError, resolve};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid configuration: {0}")]
  Parse(#[from] toml::de::Error),

  #[error("invalid dependency record: {0}")]
  Record(#[source] toml::de::Error),

  #[error(transparent)]
  Token(#[from] TokenError),

  #[error("unknown install target '{target}' (expected lib or tools, optionally followed by /<subdir>)")]
  InstallTarget { target: String },

  #[error("invalid install pattern '{pattern}': {source}")]
  InstallPattern {
    pattern: String,
    #[source]
    source: globset::Error,
  },

  #[error("source directory not found: {}", .0.display())]
  MissingSource(PathBuf),
}

/// Load the configuration file at `path`.
pub fn load_file(path: &Path, ctx: &LoadContext) -> Result<Config, ConfigError> {
  let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  debug!(path = %path.display(), "loaded configuration file");
  load_str(&content, ctx)
}

/// Parse configuration text.
pub fn load_str(content: &str, ctx: &LoadContext) -> Result<Config, ConfigError> {
  let raw: RawManifest = toml::from_str(content)?;
  Ok(load(raw, ctx))
}

fn load(raw: RawManifest, ctx: &LoadContext) -> Config {
  let global = GlobalConfig {
    temp_dir: resolve_temp_dir(raw.temp_dir.as_deref(), &ctx.root_dir),
  };

  let dependencies = raw
    .dependency
    .into_iter()
    .enumerate()
    .map(|(index, table)| load_record(index, table, ctx))
    .collect();

  Config { global, dependencies }
}

fn load_record(index: usize, table: toml::Table, ctx: &LoadContext) -> Declared {
  let name = table
    .get("name")
    .and_then(toml::Value::as_str)
    .map(str::to_string)
    .unwrap_or_else(|| format!("dependency[{index}]"));
  let build_by_default = table
    .get("build_by_default")
    .and_then(toml::Value::as_bool)
    .unwrap_or(true);

  let result = toml::Value::Table(table)
    .try_into::<RawDependency>()
    .map_err(ConfigError::Record)
    .and_then(|raw| resolve_dependency(raw, ctx));

  match result {
    Ok(spec) => Declared::Valid(spec),
    Err(error) => {
      warn!(dependency = %name, error = %error, "invalid dependency declaration");
      Declared::Invalid(InvalidDependency {
        name,
        build_by_default,
        error,
      })
    }
  }
}

fn resolve_dependency(raw: RawDependency, ctx: &LoadContext) -> Result<DependencySpec, ConfigError> {
  let vars = project_vars(&ctx.root_dir);
  let cmake_options = resolve(&raw.cmake_options, ctx.platform)?
    .into_iter()
    .map(|option| placeholder::substitute(&option, &vars))
    .collect();

  let install = raw
    .install
    .iter()
    .map(|rule| InstallRule::new(&rule.pattern, &rule.target))
    .collect::<Result<Vec<_>, _>>()?;

  let extra_link_dirs = raw
    .extra_link_dirs
    .iter()
    .map(|dir| ctx.root_dir.join(dir))
    .collect();

  let rel_path = PathBuf::from(&raw.rel_path);
  Ok(DependencySpec {
    source_dir: ctx.deps_dir.join(&rel_path),
    name: raw.name,
    rel_path,
    libs: raw.libs,
    executables: raw.executables,
    extra_files: raw.extra_files,
    cmake_options,
    cxx_standard: raw.cxx_standard,
    extra_link_dirs,
    build_by_default: raw.build_by_default,
    build: raw.build,
    init_submodules: raw.init_submodules,
    install,
  })
}

/// Blank values fall back to the default layout; relative paths join the root.
fn resolve_temp_dir(raw: Option<&str>, root_dir: &Path) -> Option<PathBuf> {
  let trimmed = raw?.trim();
  if trimmed.is_empty() {
    return None;
  }
  Some(root_dir.join(trimmed))
}
