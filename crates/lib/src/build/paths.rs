//! Where build-output directories live.

use std::path::PathBuf;

use super::BuildConfig;
use crate::config::{DependencySpec, GlobalConfig};
use crate::platform::Platform;

/// Build-output directory of `spec` for `config`.
///
/// Single-config generators get one tree per configuration:
/// `<source>/build_<config>`, or `<temp_dir>/<name>_<config>` when a temp dir
/// is set. The multi-config generator on win shares one tree between both
/// configurations: `<source>/build`, or `<temp_dir>/<name>`.
pub fn build_dir(spec: &DependencySpec, global: &GlobalConfig, platform: Platform, config: BuildConfig) -> PathBuf {
  let shared = platform.is_multi_config();
  match (&global.temp_dir, shared) {
    (Some(temp), false) => temp.join(format!("{}_{}", spec.name, config)),
    (Some(temp), true) => temp.join(&spec.name),
    (None, false) => spec.source_dir.join(format!("build_{config}")),
    (None, true) => spec.source_dir.join("build"),
  }
}

/// Root that artifacts are collected from.
///
/// Prebuilt dependencies (`build = false`) are collected straight from the
/// source tree.
pub fn collection_root(spec: &DependencySpec, global: &GlobalConfig, platform: Platform, config: BuildConfig) -> PathBuf {
  if spec.build {
    build_dir(spec, global, platform, config)
  } else {
    spec.source_dir.clone()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::Path;

  fn spec() -> DependencySpec {
    DependencySpec::new("dep", "dep", Path::new("/path/to/vdeps"))
  }

  #[test]
  fn default_build_dir_is_inside_source() {
    let dir = build_dir(&spec(), &GlobalConfig::default(), Platform::Linux, BuildConfig::Debug);
    assert_eq!(dir, PathBuf::from("/path/to/vdeps/dep/build_debug"));
  }

  #[test]
  fn temp_dir_redirects_build_dir() {
    let global = GlobalConfig {
      temp_dir: Some(PathBuf::from("/path/to/build_artifacts")),
    };
    let dir = build_dir(&spec(), &global, Platform::Mac, BuildConfig::Release);
    assert_eq!(dir, PathBuf::from("/path/to/build_artifacts/dep_release"));
  }

  #[test]
  fn win_shares_one_tree_between_configs() {
    let debug = build_dir(&spec(), &GlobalConfig::default(), Platform::Win, BuildConfig::Debug);
    let release = build_dir(&spec(), &GlobalConfig::default(), Platform::Win, BuildConfig::Release);
    assert_eq!(debug, release);
    assert_eq!(debug, PathBuf::from("/path/to/vdeps/dep/build"));
  }

  #[test]
  fn prebuilt_collects_from_source() {
    let mut spec = spec();
    spec.build = false;
    let root = collection_root(&spec, &GlobalConfig::default(), Platform::Linux, BuildConfig::Debug);
    assert_eq!(root, PathBuf::from("/path/to/vdeps/dep"));
  }
}
