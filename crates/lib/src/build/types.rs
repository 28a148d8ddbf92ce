use std::fmt;
use std::path::Path;

use crate::consts::CMAKE_CACHE_FILE;
use crate::platform::Platform;

/// A build variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuildConfig {
  Debug,
  Release,
}

impl BuildConfig {
  /// Every configuration, in the order they are built.
  pub const ALL: [BuildConfig; 2] = [BuildConfig::Debug, BuildConfig::Release];

  /// Name used in directory names (`build_debug`, `lib/linux_release`).
  pub const fn as_str(&self) -> &'static str {
    match self {
      BuildConfig::Debug => "debug",
      BuildConfig::Release => "release",
    }
  }

  /// CMake build type. Release keeps debug info on win so PDBs are produced.
  pub const fn cmake_build_type(&self, platform: Platform) -> &'static str {
    match (self, platform) {
      (BuildConfig::Debug, _) => "Debug",
      (BuildConfig::Release, Platform::Win) => "RelWithDebInfo",
      (BuildConfig::Release, _) => "Release",
    }
  }
}

impl fmt::Display for BuildConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// How much of the build driver runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
  /// Configure when no completed configuration exists, then build.
  #[default]
  Full,
  /// `--build`: never configure an existing build directory, only build.
  BuildOnly,
}

/// What is on disk for a build-output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
  /// No directory.
  Absent,
  /// Directory exists but CMake never finished configuring it.
  Partial,
  /// CMake's cache file is present.
  Configured,
}

impl BuildState {
  pub fn inspect(build_dir: &Path) -> Self {
    if build_dir.join(CMAKE_CACHE_FILE).is_file() {
      BuildState::Configured
    } else if build_dir.is_dir() {
      BuildState::Partial
    } else {
      BuildState::Absent
    }
  }

  /// Whether the configure step has to run in `mode`.
  ///
  /// `Full` trusts only the cache file. `BuildOnly` trusts the directory.
  pub const fn needs_configure(&self, mode: BuildMode) -> bool {
    match (mode, self) {
      (BuildMode::Full, BuildState::Configured) => false,
      (BuildMode::Full, _) => true,
      (BuildMode::BuildOnly, BuildState::Absent) => true,
      (BuildMode::BuildOnly, _) => false,
    }
  }
}

/// Progress of one (dependency, configuration) unit.
///
/// Moves forward one step at a time; `Failed` is terminal and reachable from
/// any other non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitState {
  #[default]
  NotConfigured,
  Configured,
  Built,
  ArtifactsCollected,
  Failed,
}

impl UnitState {
  pub const fn is_terminal(&self) -> bool {
    matches!(self, UnitState::ArtifactsCollected | UnitState::Failed)
  }
}

impl fmt::Display for UnitState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      UnitState::NotConfigured => "not configured",
      UnitState::Configured => "configured",
      UnitState::Built => "built",
      UnitState::ArtifactsCollected => "artifacts collected",
      UnitState::Failed => "failed",
    };
    f.write_str(s)
  }
}
