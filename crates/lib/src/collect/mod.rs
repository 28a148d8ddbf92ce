//! Artifact collector.
//!
//! Finds the files a dependency asked for (`libs`, `executables`,
//! `extra_files`, install rules) after its build and turns them into
//! [`CopyInstruction`]s. Naming differences between platforms are handled by
//! [`Conventions`]; this module only decides search order and which match wins.
//!
//! Search order is: search root order (build output, then the dependency's
//! own `bin/` and `lib/`), then shallowest depth, then lexical path.

mod scan;
mod types;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

pub use scan::scan;
pub use types::*;

use crate::build::BuildConfig;
use crate::config::DependencySpec;
use crate::layout::{CopyInstruction, OutputKind};
use crate::platform::{Conventions, Platform};

/// `libs = ["*"]` collects every library.
pub const ALL_LIBS: &str = "*";

#[derive(Debug, Error)]
pub enum CollectError {
  #[error("failed to scan for artifacts: {0}")]
  Walk(#[from] walkdir::Error),
}

/// Per-configuration output folders of a multi-config generator.
const MULTI_CONFIG_DIRS: [&str; 4] = ["Debug", "Release", "MinSizeRel", "RelWithDebInfo"];

/// The build-output root. In a shared multi-config tree the other
/// configurations' folders are excluded.
fn output_root(root: &Path, spec: &DependencySpec, platform: Platform, config: BuildConfig) -> SearchRoot {
  let mut search = SearchRoot::new(root);
  if spec.build && platform.is_multi_config() {
    let current = config.cmake_build_type(platform);
    search.excluded_dirs = MULTI_CONFIG_DIRS
      .iter()
      .filter(|dir| **dir != current)
      .map(|dir| dir.to_string())
      .collect();
  }
  search
}

/// Directories searched for `spec`'s artifacts, in priority order.
pub fn search_roots(root: &Path, spec: &DependencySpec, platform: Platform, config: BuildConfig) -> Vec<SearchRoot> {
  let mut roots = vec![output_root(root, spec, platform, config)];

  // Prebuilt binaries shipped inside the source tree.
  if root != spec.source_dir {
    for dir in ["bin", "lib"] {
      roots.push(SearchRoot::new(spec.source_dir.join(dir)));
    }
  }
  roots
}

/// Collect `spec`'s artifacts from `root` (its build-output directory, or
/// its source tree when it is not built).
pub fn collect(root: &Path, spec: &DependencySpec, platform: Platform, config: BuildConfig) -> Result<Collection, CollectError> {
  let candidates = scan(&search_roots(root, spec, platform, config))?;
  let mut collector = Collector::new(platform.conventions(), &candidates);

  for name in &spec.libs {
    if name == ALL_LIBS {
      collector.all_libraries();
    } else {
      collector.library(name);
    }
  }
  for name in &spec.executables {
    collector.executable(name);
  }
  for name in &spec.extra_files {
    collector.extra_file(name);
  }

  if platform == Platform::Win && config == BuildConfig::Release {
    collector.debug_symbols();
  }

  if !spec.install.is_empty() {
    let installable = scan(&[output_root(root, spec, platform, config)])?;
    for rule in &spec.install {
      let matched: Vec<&Candidate> = installable
        .iter()
        .filter(|c| rule.matcher.is_match(&c.relative))
        .collect();
      if matched.is_empty() {
        warn!(dependency = %spec.name, pattern = %rule.pattern, "install rule matched no files");
      }
      for candidate in matched {
        collector.push(
          CopyInstruction::new(&candidate.path, rule.target.kind, &candidate.file_name)
            .with_subdir(rule.target.subdir.clone()),
        );
      }
    }
  }

  debug!(
    dependency = %spec.name,
    config = %config,
    found = collector.collection.instructions.len(),
    missing = collector.collection.missing.len(),
    "collected artifacts"
  );
  Ok(collector.collection)
}

struct Collector<'a> {
  conventions: &'a Conventions,
  candidates: &'a [Candidate],
  collection: Collection,
  destinations: HashSet<(OutputKind, Option<PathBuf>, String)>,
  /// Matched libraries and executables, for debug-symbol lookup.
  primaries: Vec<(&'a Candidate, OutputKind)>,
}

impl<'a> Collector<'a> {
  fn new(conventions: &'a Conventions, candidates: &'a [Candidate]) -> Self {
    Self {
      conventions,
      candidates,
      collection: Collection::default(),
      destinations: HashSet::new(),
      primaries: Vec::new(),
    }
  }

  /// Add an instruction unless something already claimed its destination.
  fn push(&mut self, instruction: CopyInstruction) -> bool {
    let key = (
      instruction.kind,
      instruction.subdir.clone(),
      instruction.file_name.clone(),
    );
    if !self.destinations.insert(key) {
      return false;
    }
    self.collection.instructions.push(instruction);
    true
  }

  fn push_candidate(&mut self, candidate: &'a Candidate, kind: OutputKind) {
    if self.push(CopyInstruction::new(&candidate.path, kind, &candidate.file_name)) {
      self.primaries.push((candidate, kind));
    }
  }

  fn missing(&mut self, kind: ArtifactKind, name: &str) {
    self.collection.missing.push(MissingArtifact {
      kind,
      name: name.to_string(),
    });
  }

  /// First static archive plus every distinct shared-library file.
  fn library(&mut self, name: &str) {
    let conventions = self.conventions;
    let candidates = self.candidates;

    let static_lib = candidates
      .iter()
      .find(|c| conventions.is_static_lib(&c.file_name, name));
    let shared: Vec<&Candidate> = candidates
      .iter()
      .filter(|c| conventions.is_shared_lib(&c.file_name, name))
      .collect();

    if static_lib.is_none() && shared.is_empty() {
      self.missing(ArtifactKind::Library, name);
      return;
    }
    for candidate in static_lib.into_iter().chain(shared) {
      self.push_candidate(candidate, OutputKind::Lib);
    }
  }

  fn all_libraries(&mut self) {
    let conventions = self.conventions;
    let candidates = self.candidates;
    for candidate in candidates {
      let is_lib = conventions.static_lib_name(&candidate.file_name).is_some()
        || conventions.shared_lib_name(&candidate.file_name).is_some();
      if is_lib {
        self.push_candidate(candidate, OutputKind::Lib);
      }
    }
  }

  fn executable(&mut self, name: &str) {
    let conventions = self.conventions;
    let candidates = self.candidates;
    match candidates.iter().find(|c| conventions.is_executable(&c.file_name, name)) {
      Some(candidate) => self.push_candidate(candidate, OutputKind::Tools),
      None => self.missing(ArtifactKind::Executable, name),
    }
  }

  fn extra_file(&mut self, name: &str) {
    let candidates = self.candidates;
    match candidates.iter().find(|c| c.file_name == name) {
      Some(candidate) => {
        self.push(CopyInstruction::new(&candidate.path, OutputKind::Tools, &candidate.file_name));
      }
      None => self.missing(ArtifactKind::ExtraFile, name),
    }
  }

  /// Debug-symbol companions of matched artifacts; absent ones are ignored.
  ///
  /// A companion next to the artifact is preferred over one found elsewhere.
  fn debug_symbols(&mut self) {
    let candidates = self.candidates;
    let primaries = std::mem::take(&mut self.primaries);
    for (artifact, kind) in &primaries {
      let Some(symbols) = self.conventions.debug_symbol_file(&artifact.file_name) else {
        continue;
      };
      let sibling = artifact.path.with_file_name(&symbols);
      let found = candidates
        .iter()
        .find(|c| c.path == sibling)
        .or_else(|| candidates.iter().find(|c| c.file_name == symbols));
      if let Some(candidate) = found {
        self.push(CopyInstruction::new(&candidate.path, *kind, &candidate.file_name));
      }
    }
    self.primaries = primaries;
  }
}
