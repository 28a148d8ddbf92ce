use std::fmt;
use std::path::PathBuf;

use crate::layout::CopyInstruction;

/// What a requested name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
  Library,
  Executable,
  ExtraFile,
}

impl fmt::Display for ArtifactKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      ArtifactKind::Library => "library",
      ArtifactKind::Executable => "executable",
      ArtifactKind::ExtraFile => "extra file",
    };
    f.write_str(s)
  }
}

/// A requested artifact with no matching file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingArtifact {
  pub kind: ArtifactKind,
  pub name: String,
}

impl fmt::Display for MissingArtifact {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} '{}'", self.kind, self.name)
  }
}

/// Output of one collection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
  pub instructions: Vec<CopyInstruction>,
  pub missing: Vec<MissingArtifact>,
}

/// A directory searched for artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRoot {
  pub path: PathBuf,
  /// Files below a directory with one of these names are skipped. Multi-config
  /// trees keep each configuration's outputs in its own `Debug/`,
  /// `RelWithDebInfo/` dir; files outside all of them are shared.
  pub excluded_dirs: Vec<String>,
}

impl SearchRoot {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      excluded_dirs: Vec::new(),
    }
  }
}

/// A file found while scanning search roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
  pub root: usize,
  pub depth: usize,
  /// Path relative to its search root.
  pub relative: PathBuf,
  pub path: PathBuf,
  pub file_name: String,
}
