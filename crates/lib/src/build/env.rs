//! Library search environment for tool invocations.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::platform::Conventions;

/// Environment variables that put `dirs` in front of the linker's and CMake's
/// library search paths.
///
/// `current` looks up the existing value of a variable; existing values are
/// kept after the new entries.
pub fn library_search_env(
  conventions: &Conventions,
  dirs: &[PathBuf],
  current: impl Fn(&str) -> Option<String>,
) -> BTreeMap<String, String> {
  let sep = conventions.path_list_separator.to_string();
  let joined = dirs
    .iter()
    .map(|d| d.to_string_lossy().into_owned())
    .collect::<Vec<_>>()
    .join(&sep);

  conventions
    .library_path_vars
    .iter()
    .map(|var| {
      let value = match current(var).filter(|v| !v.is_empty()) {
        Some(existing) => format!("{joined}{sep}{existing}"),
        None => joined.clone(),
      };
      (var.to_string(), value)
    })
    .collect()
}

/// [`library_search_env`] against the process environment.
pub fn process_library_search_env(conventions: &Conventions, dirs: &[PathBuf]) -> BTreeMap<String, String> {
  library_search_env(conventions, dirs, |var| std::env::var(var).ok())
}
