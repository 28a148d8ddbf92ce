//! Shared test helpers for CLI integration tests.

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

use vdeps_lib::build::BuildConfig;
use vdeps_lib::platform::Platform;

/// Stand-in for cmake.
///
/// Configure (`-S <src> -B <dir> ...`) creates the build directory and its
/// cache file. Build (`--build <dir> ...`) drops `lib<name>.a` into the build
/// directory, where `<name>` is the working directory's base name. Every
/// invocation is appended to `$FAKE_CMAKE_LOG`; a configure whose source name
/// equals `$FAKE_CMAKE_FAIL` exits 1.
const FAKE_CMAKE: &str = r##"#!/bin/sh
echo "$@" >> "$FAKE_CMAKE_LOG"
name=$(basename "$(pwd -P)")
case "$1" in
  -S)
    if [ "$name" = "$FAKE_CMAKE_FAIL" ]; then
      echo "CMake Error: configured to fail" >&2
      exit 1
    fi
    mkdir -p "$4"
    echo "# fake" > "$4/CMakeCache.txt"
    ;;
  --build)
    echo "$name" > "$2/lib$name.a"
    ;;
esac
exit 0
"##;

/// Isolated project directory with a fake cmake on hand.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Project with `vdeps.toml` set to `config` and one empty source tree per
  /// entry of `deps`.
  pub fn new(config: &str, deps: &[&str]) -> Self {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("vdeps.toml"), config).unwrap();
    for dep in deps {
      std::fs::create_dir_all(temp.path().join("vdeps").join(dep)).unwrap();
    }

    let cmake = temp.path().join("bin").join("cmake");
    std::fs::create_dir_all(cmake.parent().unwrap()).unwrap();
    std::fs::write(&cmake, FAKE_CMAKE).unwrap();
    std::fs::set_permissions(&cmake, std::fs::Permissions::from_mode(0o755)).unwrap();

    Self { temp }
  }

  pub fn root(&self) -> PathBuf {
    dunce::canonicalize(self.temp.path()).unwrap()
  }

  pub fn log_path(&self) -> PathBuf {
    self.temp.path().join("cmake.log")
  }

  /// Lines the fake cmake logged, empty when it never ran.
  pub fn cmake_calls(&self) -> Vec<String> {
    std::fs::read_to_string(self.log_path())
      .map(|log| log.lines().map(str::to_string).collect())
      .unwrap_or_default()
  }

  pub fn configure_count(&self) -> usize {
    self.cmake_calls().iter().filter(|l| l.starts_with("-S ")).count()
  }

  /// `lib/<platform>_<config>/<file>` for the host platform.
  pub fn lib_file(&self, config: BuildConfig, file: &str) -> PathBuf {
    self
      .root()
      .join("lib")
      .join(format!("{}_{}", Platform::current(), config))
      .join(file)
  }

  /// Get a pre-configured Command for the vdeps binary.
  ///
  /// Runs in the project root with `VDEPS_CMAKE` pointing at the fake cmake.
  pub fn vdeps_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("vdeps");
    cmd.current_dir(self.temp.path());
    cmd.env("VDEPS_CMAKE", self.temp.path().join("bin").join("cmake"));
    cmd.env("FAKE_CMAKE_LOG", self.log_path());
    cmd.env_remove("FAKE_CMAKE_FAIL");
    cmd.env_remove("RUST_LOG");
    cmd
  }
}
