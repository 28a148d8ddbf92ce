use std::path::{Path, PathBuf};

use globset::GlobMatcher;
use serde::Deserialize;

use super::ConfigError;
use crate::consts::DEFAULT_CXX_STANDARD;
use crate::layout::OutputKind;
use crate::platform::Platform;

/// Top level of `vdeps.toml`.
///
/// Dependency records stay untyped here so each one can fail on its own.
#[derive(Debug, Default, Deserialize)]
pub(super) struct RawManifest {
  #[serde(default)]
  pub temp_dir: Option<String>,
  #[serde(default)]
  pub dependency: Vec<toml::Table>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct RawDependency {
  pub name: String,
  pub rel_path: String,
  #[serde(default)]
  pub libs: Vec<String>,
  #[serde(default)]
  pub executables: Vec<String>,
  #[serde(default)]
  pub extra_files: Vec<String>,
  #[serde(default)]
  pub cmake_options: Vec<String>,
  #[serde(default = "default_cxx_standard")]
  pub cxx_standard: u32,
  #[serde(default, alias = "library_paths")]
  pub extra_link_dirs: Vec<String>,
  #[serde(default = "default_true")]
  pub build_by_default: bool,
  #[serde(default = "default_true")]
  pub build: bool,
  #[serde(default)]
  pub init_submodules: bool,
  #[serde(default)]
  pub install: Vec<RawInstallRule>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct RawInstallRule {
  pub pattern: String,
  pub target: String,
}

fn default_cxx_standard() -> u32 {
  DEFAULT_CXX_STANDARD
}

fn default_true() -> bool {
  true
}

/// Everything needed to resolve raw records into specs.
#[derive(Debug, Clone)]
pub struct LoadContext {
  pub platform: Platform,
  /// Project root. `${ROOT_DIR}`, relative link dirs and a relative
  /// `temp_dir` resolve against it.
  pub root_dir: PathBuf,
  /// Directory that `rel_path` is relative to.
  pub deps_dir: PathBuf,
}

impl LoadContext {
  pub fn new(platform: Platform, root_dir: impl Into<PathBuf>, deps_dir: impl Into<PathBuf>) -> Self {
    Self {
      platform,
      root_dir: root_dir.into(),
      deps_dir: deps_dir.into(),
    }
  }
}

/// Process-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalConfig {
  /// Absolute build-output root replacing `<source>/build_<config>`.
  pub temp_dir: Option<PathBuf>,
}

/// One resolved dependency declaration.
///
/// `cmake_options` are already pruned for the current platform and have
/// `${ROOT_DIR}` substituted.
#[derive(Debug, Clone)]
pub struct DependencySpec {
  pub name: String,
  pub rel_path: PathBuf,
  pub source_dir: PathBuf,
  pub libs: Vec<String>,
  pub executables: Vec<String>,
  pub extra_files: Vec<String>,
  pub cmake_options: Vec<String>,
  pub cxx_standard: u32,
  /// Additional linker search paths, absolute.
  pub extra_link_dirs: Vec<PathBuf>,
  pub build_by_default: bool,
  /// `false` marks a prebuilt dependency: no configure or build, artifacts
  /// are collected from the source tree.
  pub build: bool,
  pub init_submodules: bool,
  pub install: Vec<InstallRule>,
}

impl DependencySpec {
  /// Minimal spec with every optional field at its default.
  pub fn new(name: impl Into<String>, rel_path: impl Into<PathBuf>, deps_dir: &Path) -> Self {
    let rel_path = rel_path.into();
    Self {
      name: name.into(),
      source_dir: deps_dir.join(&rel_path),
      rel_path,
      libs: Vec::new(),
      executables: Vec::new(),
      extra_files: Vec::new(),
      cmake_options: Vec::new(),
      cxx_standard: DEFAULT_CXX_STANDARD,
      extra_link_dirs: Vec::new(),
      build_by_default: true,
      build: true,
      init_submodules: false,
      install: Vec::new(),
    }
  }
}

/// Copy files matching `pattern` (relative to the collection root) into `target`.
#[derive(Debug, Clone)]
pub struct InstallRule {
  pub pattern: String,
  pub matcher: GlobMatcher,
  pub target: InstallTarget,
}

impl InstallRule {
  pub fn new(pattern: &str, target: &str) -> Result<Self, ConfigError> {
    let glob = globset::GlobBuilder::new(pattern)
      .literal_separator(true)
      .build()
      .map_err(|source| ConfigError::InstallPattern {
        pattern: pattern.to_string(),
        source,
      })?;
    Ok(Self {
      pattern: pattern.to_string(),
      matcher: glob.compile_matcher(),
      target: target.parse()?,
    })
  }
}

/// `lib` or `tools`, optionally followed by `/<subdir>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
  pub kind: OutputKind,
  pub subdir: Option<PathBuf>,
}

impl std::str::FromStr for InstallTarget {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let invalid = || ConfigError::InstallTarget { target: s.to_string() };
    let normalized = s.trim().replace('\\', "/");
    let (base, subdir) = match normalized.split_once('/') {
      Some((base, rest)) => (base, rest.trim_matches('/')),
      None => (normalized.as_str(), ""),
    };

    let kind = match base {
      "lib" => OutputKind::Lib,
      "tools" => OutputKind::Tools,
      _ => return Err(invalid()),
    };

    if subdir.split('/').any(|part| part == "..") {
      return Err(invalid());
    }

    let subdir = (!subdir.is_empty()).then(|| PathBuf::from(subdir));
    Ok(Self { kind, subdir })
  }
}

/// A dependency whose record could not be resolved.
#[derive(Debug)]
pub struct InvalidDependency {
  /// Declared name, or `dependency[<index>]` when the record has none.
  pub name: String,
  pub build_by_default: bool,
  pub error: ConfigError,
}

/// A dependency record in declaration order.
#[derive(Debug)]
pub enum Declared {
  Valid(DependencySpec),
  Invalid(InvalidDependency),
}

impl Declared {
  pub fn name(&self) -> &str {
    match self {
      Declared::Valid(spec) => &spec.name,
      Declared::Invalid(invalid) => &invalid.name,
    }
  }

  pub fn build_by_default(&self) -> bool {
    match self {
      Declared::Valid(spec) => spec.build_by_default,
      Declared::Invalid(invalid) => invalid.build_by_default,
    }
  }
}

/// The loaded configuration, immutable for the run.
#[derive(Debug, Default)]
pub struct Config {
  pub global: GlobalConfig,
  pub dependencies: Vec<Declared>,
}

impl Config {
  pub fn valid(&self) -> impl Iterator<Item = &DependencySpec> {
    self.dependencies.iter().filter_map(|d| match d {
      Declared::Valid(spec) => Some(spec),
      Declared::Invalid(_) => None,
    })
  }

  pub fn get(&self, name: &str) -> Option<&Declared> {
    self.dependencies.iter().find(|d| d.name() == name)
  }
}
