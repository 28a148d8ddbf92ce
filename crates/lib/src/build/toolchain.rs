//! CMake command lines and built-in toolchain defaults.
//!
//! Defaults are fixed per platform. A dependency's own options always win:
//! a default define is dropped when the dependency defines the same variable,
//! the default generator is dropped when it passes `-G`, and warning
//! suppression is dropped when it sets any warning flag itself.

use std::path::{Path, PathBuf};

use super::BuildConfig;
use crate::consts::{CMAKE_ENV, GIT_ENV};
use crate::platform::Platform;

/// Paths of the external tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
  pub cmake: PathBuf,
  pub git: PathBuf,
}

impl Default for Toolchain {
  fn default() -> Self {
    Self {
      cmake: PathBuf::from("cmake"),
      git: PathBuf::from("git"),
    }
  }
}

impl Toolchain {
  /// Tool paths from `VDEPS_CMAKE` / `VDEPS_GIT`, falling back to `PATH` lookup.
  pub fn from_env() -> Self {
    let lookup = |var: &str, fallback: &str| {
      std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(fallback))
    };
    Self {
      cmake: lookup(CMAKE_ENV, "cmake"),
      git: lookup(GIT_ENV, "git"),
    }
  }
}

/// One piece of a default define's value.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Flag {
  text: String,
  warning: bool,
}

impl Flag {
  fn plain(text: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      warning: false,
    }
  }

  fn warning(text: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      warning: true,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DefaultArg {
  Generator(&'static str),
  Define { var: &'static str, flags: Vec<Flag> },
}

fn define(var: &'static str, flags: Vec<Flag>) -> DefaultArg {
  DefaultArg::Define { var, flags }
}

fn default_args(platform: Platform, config: BuildConfig, cxx_standard: u32) -> Vec<DefaultArg> {
  let mut args = vec![
    define("CMAKE_CXX_STANDARD", vec![Flag::plain(cxx_standard.to_string())]),
    define("CMAKE_CXX_STANDARD_REQUIRED", vec![Flag::plain("ON")]),
  ];

  match platform {
    Platform::Win => args.extend([
      define("CMAKE_CXX_FLAGS", vec![Flag::warning("/W0")]),
      define("CMAKE_POLICY_DEFAULT_CMP0091", vec![Flag::plain("NEW")]),
      define(
        "CMAKE_MSVC_RUNTIME_LIBRARY",
        vec![Flag::plain("MultiThreaded$<$<CONFIG:Debug>:Debug>")],
      ),
      define("VK_USE_PLATFORM_WIN32_KHR", vec![Flag::plain("ON")]),
    ]),
    Platform::Linux | Platform::Mac => {
      let mut link = vec![Flag::plain("-stdlib=libc++")];
      if platform == Platform::Linux {
        link.push(Flag::plain("-lc++abi"));
      }
      args.extend([
        DefaultArg::Generator("Ninja"),
        define("CMAKE_C_COMPILER", vec![Flag::plain("clang")]),
        define("CMAKE_CXX_COMPILER", vec![Flag::plain("clang++")]),
        define("CMAKE_C_FLAGS", vec![Flag::warning("-w")]),
        define("CMAKE_CXX_FLAGS", vec![Flag::warning("-w"), Flag::plain("-stdlib=libc++")]),
        define("CMAKE_EXE_LINKER_FLAGS", link.clone()),
        define("CMAKE_SHARED_LINKER_FLAGS", link),
        define(
          "CMAKE_BUILD_TYPE",
          vec![Flag::plain(config.cmake_build_type(platform))],
        ),
      ]);
    }
  }

  args
}

/// Variable name of a `-D<VAR>[:TYPE]=<value>` option.
fn defined_var(option: &str) -> Option<&str> {
  let body = option.trim_start().strip_prefix("-D")?;
  let name = body.split(['=', ':']).next()?.trim();
  (!name.is_empty()).then_some(name)
}

fn is_generator(option: &str) -> bool {
  option.trim_start().starts_with("-G")
}

/// Compiler warning switches: `-w`, `-W<...>`, `/w`, `/W<n>`, `/Wall`.
fn is_warning_flag(word: &str) -> bool {
  if word == "-w" || word == "/w" {
    return true;
  }
  if let Some(rest) = word.strip_prefix("-W") {
    // -Wl, -Wa, -Wp forward options to the linker/assembler/preprocessor
    return !rest.is_empty() && !["l,", "a,", "p,"].iter().any(|p| rest.starts_with(p));
  }
  if let Some(rest) = word.strip_prefix("/W") {
    return rest == "all" || rest == "X" || (!rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()));
  }
  false
}

/// Whether the dependency takes control of warning levels.
///
/// Top-level `-W...` arguments are CMake's own developer warnings (`-Wno-dev`),
/// so only compiler-style flags count there.
fn sets_warning_level(explicit: &[String]) -> bool {
  explicit.iter().any(|option| match defined_var(option) {
    Some(var) => {
      matches!(var, "CMAKE_C_FLAGS" | "CMAKE_CXX_FLAGS")
        || option
          .split_once('=')
          .is_some_and(|(_, value)| value.split_whitespace().any(is_warning_flag))
    }
    None => {
      let word = option.trim();
      word == "-w" || word == "/w" || (word.starts_with("/W") && is_warning_flag(word))
    }
  })
}

/// Render the defaults that survive the dependency's explicit options.
pub fn effective_defaults(platform: Platform, config: BuildConfig, cxx_standard: u32, explicit: &[String]) -> Vec<String> {
  let overridden: Vec<&str> = explicit.iter().filter_map(|o| defined_var(o)).collect();
  let custom_generator = explicit.iter().any(|o| is_generator(o));
  let drop_warnings = sets_warning_level(explicit);

  let mut out = Vec::new();
  for arg in default_args(platform, config, cxx_standard) {
    match arg {
      DefaultArg::Generator(name) => {
        if !custom_generator {
          out.push("-G".to_string());
          out.push(name.to_string());
        }
      }
      DefaultArg::Define { var, flags } => {
        if overridden.contains(&var) {
          continue;
        }
        let kept: Vec<&str> = flags
          .iter()
          .filter(|f| !(drop_warnings && f.warning))
          .map(|f| f.text.as_str())
          .collect();
        if kept.is_empty() {
          continue;
        }
        out.push(format!("-D{var}={}", kept.join(" ")));
      }
    }
  }
  out
}

/// Arguments of the configure step.
pub fn configure_args(
  source_dir: &Path,
  build_dir: &Path,
  platform: Platform,
  config: BuildConfig,
  cxx_standard: u32,
  explicit: &[String],
) -> Vec<String> {
  let mut args = vec![
    "-S".to_string(),
    source_dir.to_string_lossy().into_owned(),
    "-B".to_string(),
    build_dir.to_string_lossy().into_owned(),
  ];
  args.extend(effective_defaults(platform, config, cxx_standard, explicit));
  args.extend(explicit.iter().cloned());
  args
}

/// Arguments of the build step. Multi-config trees need `--config`.
pub fn build_args(build_dir: &Path, platform: Platform, config: BuildConfig) -> Vec<String> {
  let mut args = vec!["--build".to_string(), build_dir.to_string_lossy().into_owned()];
  if platform.is_multi_config() {
    args.push("--config".to_string());
    args.push(config.cmake_build_type(platform).to_string());
  }
  args
}
