use std::fmt;
use std::path::{Path, PathBuf};

use crate::build::BuildConfig;
use crate::consts::{LIB_DIR_NAME, TOOLS_DIR_NAME};
use crate::platform::Platform;

/// Which canonical tree an artifact lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutputKind {
  Lib,
  Tools,
}

impl OutputKind {
  pub const fn dir_name(&self) -> &'static str {
    match self {
      OutputKind::Lib => LIB_DIR_NAME,
      OutputKind::Tools => TOOLS_DIR_NAME,
    }
  }
}

impl fmt::Display for OutputKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.dir_name())
  }
}

/// One file to copy into the canonical layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyInstruction {
  pub source: PathBuf,
  pub kind: OutputKind,
  /// Extra directory below `<kind>/<platform>_<config>/`, from install rules.
  pub subdir: Option<PathBuf>,
  pub file_name: String,
}

impl CopyInstruction {
  pub fn new(source: impl Into<PathBuf>, kind: OutputKind, file_name: impl Into<String>) -> Self {
    Self {
      source: source.into(),
      kind,
      subdir: None,
      file_name: file_name.into(),
    }
  }

  pub fn with_subdir(mut self, subdir: Option<PathBuf>) -> Self {
    self.subdir = subdir;
    self
  }

  /// Path relative to the `<platform>_<config>` directory.
  pub fn relative_destination(&self) -> PathBuf {
    match &self.subdir {
      Some(subdir) => subdir.join(&self.file_name),
      None => PathBuf::from(&self.file_name),
    }
  }
}

/// The `lib/` and `tools/` trees under the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
  root: PathBuf,
}

impl OutputLayout {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// `<root>/<lib|tools>/<platform>_<config>`
  pub fn dir(&self, kind: OutputKind, platform: Platform, config: BuildConfig) -> PathBuf {
    self.root.join(kind.dir_name()).join(format!("{platform}_{config}"))
  }

  pub fn lib_dir(&self, platform: Platform, config: BuildConfig) -> PathBuf {
    self.dir(OutputKind::Lib, platform, config)
  }

  pub fn tools_dir(&self, platform: Platform, config: BuildConfig) -> PathBuf {
    self.dir(OutputKind::Tools, platform, config)
  }

  pub fn destination(&self, instruction: &CopyInstruction, platform: Platform, config: BuildConfig) -> PathBuf {
    self
      .dir(instruction.kind, platform, config)
      .join(instruction.relative_destination())
  }
}

/// A file that was copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedArtifact {
  pub source: PathBuf,
  pub destination: PathBuf,
}

/// A file that could not be copied.
#[derive(Debug)]
pub struct CopyFailure {
  pub source: PathBuf,
  pub destination: PathBuf,
  pub error: super::CopyError,
}

/// Outcome of one [`write`](super::write) call.
#[derive(Debug, Default)]
pub struct WriteReport {
  pub copied: Vec<CopiedArtifact>,
  pub failed: Vec<CopyFailure>,
}

impl WriteReport {
  pub fn is_success(&self) -> bool {
    self.failed.is_empty()
  }
}
