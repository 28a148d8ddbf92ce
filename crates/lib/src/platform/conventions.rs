//! Per-platform artifact naming rules.
//!
//! The artifact collector never compares against extension literals itself;
//! it asks the [`Conventions`] of the current platform whether a file name is
//! the static library, shared library, executable or debug-symbol companion
//! for a requested base name.

/// Naming rules of one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conventions {
  /// Prefix the toolchain puts in front of library names (`lib` on unix).
  pub lib_prefix: &'static str,
  /// Extension of static libraries / import libraries.
  pub static_lib_ext: &'static str,
  /// Extension of shared libraries.
  pub shared_lib_ext: &'static str,
  /// Whether shared libraries carry trailing version numbers (`libfoo.so.1.2`).
  pub versioned_shared_libs: bool,
  /// Extension of executables (empty on unix).
  pub exe_ext: &'static str,
  /// Extension of separate debug-symbol files, where the toolchain emits them.
  pub debug_symbol_ext: Option<&'static str>,
  /// Separator for path lists in environment variables.
  pub path_list_separator: char,
  /// Environment variables the linker and CMake consult for library search paths.
  pub library_path_vars: &'static [&'static str],
}

pub const WIN: Conventions = Conventions {
  lib_prefix: "",
  static_lib_ext: ".lib",
  shared_lib_ext: ".dll",
  versioned_shared_libs: false,
  exe_ext: ".exe",
  debug_symbol_ext: Some(".pdb"),
  path_list_separator: ';',
  library_path_vars: &["LIB", "CMAKE_LIBRARY_PATH"],
};

pub const LINUX: Conventions = Conventions {
  lib_prefix: "lib",
  static_lib_ext: ".a",
  shared_lib_ext: ".so",
  versioned_shared_libs: true,
  exe_ext: "",
  debug_symbol_ext: None,
  path_list_separator: ':',
  library_path_vars: &["LIBRARY_PATH", "CMAKE_LIBRARY_PATH"],
};

pub const MAC: Conventions = Conventions {
  lib_prefix: "lib",
  static_lib_ext: ".a",
  shared_lib_ext: ".dylib",
  versioned_shared_libs: false,
  exe_ext: "",
  debug_symbol_ext: None,
  path_list_separator: ':',
  library_path_vars: &["LIBRARY_PATH", "CMAKE_LIBRARY_PATH"],
};

impl Conventions {
  /// Library name of a static library file, with prefix and extension removed.
  ///
  /// A missing prefix is tolerated (`foo.a` names `foo` just like `libfoo.a`).
  pub fn static_lib_name<'a>(&self, file_name: &'a str) -> Option<&'a str> {
    let stem = file_name.strip_suffix(self.static_lib_ext)?;
    non_empty(self.strip_lib_prefix(stem))
  }

  /// Library name of a shared library file, including versioned `.so.N` files.
  pub fn shared_lib_name<'a>(&self, file_name: &'a str) -> Option<&'a str> {
    let stem = match file_name.strip_suffix(self.shared_lib_ext) {
      Some(stem) => stem,
      None if self.versioned_shared_libs => {
        let (stem, version) = file_name.rsplit_once(self.shared_lib_ext)?;
        let version = version.strip_prefix('.')?;
        if !version.split('.').all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())) {
          return None;
        }
        stem
      }
      None => return None,
    };
    non_empty(self.strip_lib_prefix(stem))
  }

  /// Whether `file_name` is the static library named `name`.
  pub fn is_static_lib(&self, file_name: &str, name: &str) -> bool {
    self.static_lib_name(file_name) == Some(name) || self.unprefixed_match(file_name, name, self.static_lib_ext)
  }

  /// Whether `file_name` is a shared library (or versioned link) named `name`.
  pub fn is_shared_lib(&self, file_name: &str, name: &str) -> bool {
    self.shared_lib_name(file_name) == Some(name)
  }

  /// Whether `file_name` is the executable named `name`.
  pub fn is_executable(&self, file_name: &str, name: &str) -> bool {
    file_name.strip_suffix(self.exe_ext) == Some(name)
  }

  /// File name of the debug-symbol companion for an artifact file, if the
  /// platform emits separate debug symbols.
  pub fn debug_symbol_file(&self, artifact_file_name: &str) -> Option<String> {
    let ext = self.debug_symbol_ext?;
    let stem = artifact_file_name
      .rsplit_once('.')
      .map(|(stem, _)| stem)
      .unwrap_or(artifact_file_name);
    Some(format!("{stem}{ext}"))
  }

  fn strip_lib_prefix<'a>(&self, stem: &'a str) -> &'a str {
    if self.lib_prefix.is_empty() {
      return stem;
    }
    stem.strip_prefix(self.lib_prefix).unwrap_or(stem)
  }

  // `liblzma.a` requested as "liblzma": the prefix is part of the requested name.
  fn unprefixed_match(&self, file_name: &str, name: &str, ext: &str) -> bool {
    file_name.strip_suffix(ext) == Some(name)
  }
}

fn non_empty(s: &str) -> Option<&str> {
  if s.is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unix_static_lib_matches_with_and_without_prefix() {
    assert!(LINUX.is_static_lib("libnvrhi.a", "nvrhi"));
    assert!(LINUX.is_static_lib("nvrhi.a", "nvrhi"));
    assert!(MAC.is_static_lib("libnvrhi.a", "nvrhi"));
  }

  #[test]
  fn static_lib_requires_exact_base_name() {
    assert!(!LINUX.is_static_lib("libnvrhi_vk.a", "nvrhi"));
    assert!(!WIN.is_static_lib("nvrhi_vk.lib", "nvrhi"));
    assert!(!LINUX.is_static_lib("libnvrhi.a.bak", "nvrhi"));
    assert!(!LINUX.is_static_lib("libnvrhi.lib", "nvrhi"));
  }

  #[test]
  fn win_static_lib_uses_lib_extension() {
    assert!(WIN.is_static_lib("nvrhi.lib", "nvrhi"));
    assert!(!WIN.is_static_lib("libnvrhi.a", "nvrhi"));
  }

  #[test]
  fn prefix_can_be_part_of_requested_name() {
    assert!(LINUX.is_static_lib("liblzma.a", "liblzma"));
  }

  #[test]
  fn versioned_shared_libraries_on_linux() {
    assert_eq!(LINUX.shared_lib_name("libfoo.so"), Some("foo"));
    assert_eq!(LINUX.shared_lib_name("libfoo.so.1"), Some("foo"));
    assert_eq!(LINUX.shared_lib_name("libfoo.so.1.2.3"), Some("foo"));
    assert_eq!(LINUX.shared_lib_name("libfoo.so.debug"), None);
    assert_eq!(LINUX.shared_lib_name("libfoo.so."), None);
  }

  #[test]
  fn versioned_shared_library_name_may_contain_extension_text() {
    assert_eq!(LINUX.shared_lib_name("libfoo.socket.so.1"), Some("foo.socket"));
    assert!(LINUX.is_shared_lib("libfoo.socket.so.1.0", "foo.socket"));
    assert!(!LINUX.is_shared_lib("libfoo.socket.so.1", "foo"));
  }

  #[test]
  fn mac_and_win_shared_libraries() {
    assert!(MAC.is_shared_lib("libfoo.dylib", "foo"));
    assert!(!MAC.is_shared_lib("libfoo.so", "foo"));
    assert!(WIN.is_shared_lib("foo.dll", "foo"));
    assert!(!WIN.is_shared_lib("foo.dll.manifest", "foo"));
  }

  #[test]
  fn executables_follow_platform_extension() {
    assert!(LINUX.is_executable("nvrhi-scomp", "nvrhi-scomp"));
    assert!(!LINUX.is_executable("nvrhi-scomp.exe", "nvrhi-scomp"));
    assert!(WIN.is_executable("nvrhi-scomp.exe", "nvrhi-scomp"));
    assert!(!WIN.is_executable("nvrhi-scomp", "nvrhi-scomp"));
  }

  #[test]
  fn debug_symbols_only_on_win() {
    assert_eq!(WIN.debug_symbol_file("nvrhi.lib").as_deref(), Some("nvrhi.pdb"));
    assert_eq!(WIN.debug_symbol_file("slangc.exe").as_deref(), Some("slangc.pdb"));
    assert_eq!(LINUX.debug_symbol_file("libnvrhi.a"), None);
  }
}
