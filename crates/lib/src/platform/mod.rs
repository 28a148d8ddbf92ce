//! Host platform identity.
//!
//! Every run is tied to exactly one [`Platform`], detected once from the host.
//! It selects the toolchain defaults, the artifact naming rules (see
//! [`conventions`]) and decides which platform-scoped configuration values
//! apply (see [`token`]).

pub mod conventions;
pub mod token;

use std::fmt;
use std::str::FromStr;

pub use conventions::Conventions;
pub use token::{Condition, ConditionalToken, TokenError, resolve};

/// Platform identity used in output directory names and conditional tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
  Win,
  Linux,
  Mac,
}

impl Platform {
  pub const ALL: [Platform; 3] = [Platform::Win, Platform::Linux, Platform::Mac];

  /// Detect the platform of the running host.
  ///
  /// Unix flavours other than macOS are treated as linux: they share the
  /// Ninja + Clang toolchain and the `lib*.a` naming.
  pub fn current() -> Self {
    match std::env::consts::OS {
      "windows" => Self::Win,
      "macos" => Self::Mac,
      _ => Self::Linux,
    }
  }

  /// Returns the tag used in `lib/<tag>_<config>` and in conditional tokens.
  pub const fn as_str(&self) -> &'static str {
    match self {
      Self::Win => "win",
      Self::Linux => "linux",
      Self::Mac => "mac",
    }
  }

  /// Artifact naming conventions for this platform.
  pub const fn conventions(&self) -> &'static Conventions {
    match self {
      Self::Win => &conventions::WIN,
      Self::Linux => &conventions::LINUX,
      Self::Mac => &conventions::MAC,
    }
  }

  /// Whether the platform's generator produces one build tree serving every
  /// configuration (Visual Studio style) instead of one tree per configuration.
  pub const fn is_multi_config(&self) -> bool {
    matches!(self, Self::Win)
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Platform {
  type Err = UnknownPlatform;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "win" => Ok(Self::Win),
      "linux" => Ok(Self::Linux),
      "mac" => Ok(Self::Mac),
      other => Err(UnknownPlatform(other.to_string())),
    }
  }
}

/// A platform name outside `{win, linux, mac}`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform '{0}' (expected one of win, linux, mac)")]
pub struct UnknownPlatform(pub String);
