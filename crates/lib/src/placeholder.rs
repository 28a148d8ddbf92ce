//! `${NAME}` interpolation for configuration values.
//!
//! Only names the [`Resolver`] knows are replaced. Everything else, including
//! unclosed `${` sequences and CMake's own `${VAR}` references, passes through
//! unchanged so options can still carry CMake syntax.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use vdeps_lib::placeholder::substitute;
//!
//! let vars = BTreeMap::from([("ROOT_DIR".to_string(), "/work/app".to_string())]);
//! assert_eq!(
//!   substitute("-DSDK=${ROOT_DIR}/sdk -DX=${CMAKE_SOURCE_DIR}", &vars),
//!   "-DSDK=/work/app/sdk -DX=${CMAKE_SOURCE_DIR}"
//! );
//! ```

use std::collections::BTreeMap;
use std::path::Path;

/// Variable holding the project root.
pub const ROOT_DIR: &str = "ROOT_DIR";

/// A segment of parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
  Literal(&'a str),
  /// `${name}`, with the original text kept for passthrough.
  Variable { name: &'a str, raw: &'a str },
}

/// Looks up variable values during substitution.
pub trait Resolver {
  fn resolve(&self, name: &str) -> Option<&str>;
}

impl Resolver for BTreeMap<String, String> {
  fn resolve(&self, name: &str) -> Option<&str> {
    self.get(name).map(String::as_str)
  }
}

/// Split `input` into literal and `${...}` segments.
///
/// An unclosed `${` is treated as literal text.
pub fn parse(input: &str) -> Vec<Segment<'_>> {
  let mut segments = Vec::new();
  let mut rest = input;

  while let Some(start) = rest.find("${") {
    let after = &rest[start + 2..];
    let Some(end) = after.find('}') else {
      break;
    };
    if start > 0 {
      segments.push(Segment::Literal(&rest[..start]));
    }
    segments.push(Segment::Variable {
      name: &after[..end],
      raw: &rest[start..start + 2 + end + 1],
    });
    rest = &after[end + 1..];
  }

  if !rest.is_empty() {
    segments.push(Segment::Literal(rest));
  }
  segments
}

/// Replace every known `${NAME}` in `input`.
pub fn substitute(input: &str, resolver: &impl Resolver) -> String {
  let mut out = String::with_capacity(input.len());
  for segment in parse(input) {
    match segment {
      Segment::Literal(text) => out.push_str(text),
      Segment::Variable { name, raw } => out.push_str(resolver.resolve(name).unwrap_or(raw)),
    }
  }
  out
}

/// Variables available to configuration values of a project rooted at `root`.
///
/// Paths are written with forward slashes, which CMake accepts everywhere.
pub fn project_vars(root: &Path) -> BTreeMap<String, String> {
  let root = root.to_string_lossy().replace('\\', "/");
  BTreeMap::from([(ROOT_DIR.to_string(), root)])
}
