//! Deterministic directory scanning.

use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use super::{Candidate, CollectError, SearchRoot};

/// CMake's scratch directory; its compiler-check binaries are never artifacts.
const SKIPPED_DIRS: &[&str] = &["CMakeFiles"];

/// List every file under `roots`, ordered by root, then depth, then path.
///
/// Roots that do not exist are skipped.
pub fn scan(roots: &[SearchRoot]) -> Result<Vec<Candidate>, CollectError> {
  let mut candidates = Vec::new();

  for (index, root) in roots.iter().enumerate() {
    if !root.path.is_dir() {
      debug!(root = %root.path.display(), "search root missing, skipping");
      continue;
    }
    scan_root(index, root, &mut candidates)?;
  }

  candidates.sort_by(|a, b| {
    (a.root, a.depth, &a.relative).cmp(&(b.root, b.depth, &b.relative))
  });
  Ok(candidates)
}

fn scan_root(index: usize, root: &SearchRoot, out: &mut Vec<Candidate>) -> Result<(), CollectError> {
  let walker = WalkDir::new(&root.path)
    .follow_links(false)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|e| {
      !(e.file_type().is_dir() && e.file_name().to_str().is_some_and(|name| SKIPPED_DIRS.contains(&name)))
    });

  for entry in walker {
    let entry = entry?;
    if !entry.file_type().is_file() && !is_file_link(entry.path(), entry.file_type().is_symlink()) {
      continue;
    }

    let Ok(relative) = entry.path().strip_prefix(&root.path) else {
      continue;
    };
    let excluded = relative
      .components()
      .any(|c| root.excluded_dirs.iter().any(|dir| c.as_os_str() == dir.as_str()));
    if excluded {
      continue;
    }
    let Some(file_name) = entry.file_name().to_str() else {
      continue;
    };

    out.push(Candidate {
      root: index,
      depth: entry.depth(),
      relative: relative.to_path_buf(),
      path: entry.path().to_path_buf(),
      file_name: file_name.to_string(),
    });
  }

  Ok(())
}

// Versioned shared libraries are usually symlinks (libfoo.so -> libfoo.so.1).
fn is_file_link(path: &Path, is_symlink: bool) -> bool {
  is_symlink && path.is_file()
}
