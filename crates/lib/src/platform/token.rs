//! Platform-conditional configuration values.
//!
//! A token is either an unconditional string, or `<platforms>:<value>` /
//! `!<platforms>:<value>` where `<platforms>` is a comma separated list of
//! platform tags. Tokens are parsed into a [`ConditionalToken`] once, at load
//! time; nothing downstream ever looks at the raw prefix again.
//!
//! Only list-shaped prefixes count. `-DPATH=C:/x` has a colon but `-DPATH=C`
//! is not a list of identifiers, so the whole string is a plain value.

use thiserror::Error;

use super::{Platform, UnknownPlatform};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
  #[error("unknown platform '{name}' in '{token}'")]
  UnknownPlatform { name: String, token: String },
}

/// Which platforms a value applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
  Always,
  Only(Vec<Platform>),
  Except(Vec<Platform>),
}

impl Condition {
  pub fn applies_to(&self, platform: Platform) -> bool {
    match self {
      Condition::Always => true,
      Condition::Only(list) => list.contains(&platform),
      Condition::Except(list) => !list.contains(&platform),
    }
  }
}

/// A configuration value scoped to a set of platforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalToken {
  pub condition: Condition,
  pub value: String,
}

impl ConditionalToken {
  /// Parse a raw token.
  ///
  /// Platform names are trimmed and the value after a recognized prefix is
  /// trimmed; unconditional strings are kept byte for byte.
  pub fn parse(raw: &str) -> Result<Self, TokenError> {
    let Some((prefix, value)) = raw.split_once(':') else {
      return Ok(Self::always(raw));
    };

    let (negated, list) = match prefix.trim_start().strip_prefix('!') {
      Some(rest) => (true, rest),
      None => (false, prefix),
    };

    let names: Vec<&str> = list.split(',').map(str::trim).collect();
    if !names.iter().all(|name| is_identifier(name)) {
      return Ok(Self::always(raw));
    }

    let platforms = names
      .into_iter()
      .map(|name| {
        name.parse::<Platform>().map_err(|UnknownPlatform(name)| TokenError::UnknownPlatform {
          name,
          token: raw.to_string(),
        })
      })
      .collect::<Result<Vec<_>, _>>()?;

    let condition = if negated {
      Condition::Except(platforms)
    } else {
      Condition::Only(platforms)
    };

    Ok(Self {
      condition,
      value: value.trim().to_string(),
    })
  }

  fn always(raw: &str) -> Self {
    Self {
      condition: Condition::Always,
      value: raw.to_string(),
    }
  }

  pub fn applies_to(&self, platform: Platform) -> bool {
    self.condition.applies_to(platform)
  }
}

fn is_identifier(s: &str) -> bool {
  !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Resolve tokens for `platform`, keeping order and stripping prefixes.
///
/// Empty values (`"linux:"`) are dropped. Fails on the first token naming an
/// unknown platform.
pub fn resolve<S: AsRef<str>>(tokens: &[S], platform: Platform) -> Result<Vec<String>, TokenError> {
  let mut resolved = Vec::with_capacity(tokens.len());
  for raw in tokens {
    let token = ConditionalToken::parse(raw.as_ref())?;
    if token.applies_to(platform) && !token.value.is_empty() {
      resolved.push(token.value);
    }
  }
  Ok(resolved)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn on_linux(tokens: &[&str]) -> Vec<String> {
    resolve(tokens, Platform::Linux).unwrap()
  }

  #[test]
  fn linux_resolution_examples() {
    assert!(on_linux(&["win:-DX=ON"]).is_empty());
    assert_eq!(on_linux(&["linux,mac:-DY=ON"]), vec!["-DY=ON"]);
    assert_eq!(on_linux(&["!win:-DZ=ON"]), vec!["-DZ=ON"]);
    assert_eq!(on_linux(&["-DW=ON"]), vec!["-DW=ON"]);
  }

  #[test]
  fn negation_excludes_listed_platforms() {
    let tokens = ["!win,mac:-DONLY_LINUX=ON"];
    assert_eq!(resolve(&tokens, Platform::Linux).unwrap(), vec!["-DONLY_LINUX=ON"]);
    assert!(resolve(&tokens, Platform::Win).unwrap().is_empty());
    assert!(resolve(&tokens, Platform::Mac).unwrap().is_empty());
  }

  #[test]
  fn order_is_preserved() {
    let tokens = ["-DA=1", "win:-DB=1", "linux:-DC=1", "-DD=1"];
    assert_eq!(on_linux(&tokens), vec!["-DA=1", "-DC=1", "-DD=1"]);
    assert_eq!(
      resolve(&tokens, Platform::Win).unwrap(),
      vec!["-DA=1", "-DB=1", "-DD=1"]
    );
  }

  #[test]
  fn whitespace_around_names_and_value_is_trimmed() {
    assert_eq!(on_linux(&[" linux , mac : -DX=ON "]), vec!["-DX=ON"]);
    assert_eq!(on_linux(&["! win:-DY=ON"]), vec!["-DY=ON"]);
    assert!(resolve(&["! win:-DY=ON"], Platform::Win).unwrap().is_empty());
  }

  #[test]
  fn empty_values_are_dropped() {
    assert_eq!(on_linux(&["linux:", "linux: ", "!win:  ", "-DX=ON"]), vec!["-DX=ON"]);
    assert!(on_linux(&[""]).is_empty());
  }

  #[test]
  fn unconditional_values_are_kept_verbatim() {
    assert_eq!(on_linux(&["  -DSPACED=ON "]), vec!["  -DSPACED=ON "]);
  }

  #[test]
  fn colons_inside_values_are_not_prefixes() {
    assert_eq!(on_linux(&["-DPATH=C:/x"]), vec!["-DPATH=C:/x"]);
    let runtime = "-DCMAKE_MSVC_RUNTIME_LIBRARY=MultiThreaded$<$<CONFIG:Debug>:Debug>";
    assert_eq!(on_linux(&[runtime]), vec![runtime]);
  }

  #[test]
  fn value_after_prefix_may_contain_colons() {
    assert_eq!(
      resolve(&["win:-DPATH=C:/sdk"], Platform::Win).unwrap(),
      vec!["-DPATH=C:/sdk"]
    );
  }

  #[test]
  fn unknown_platform_is_rejected() {
    let err = resolve(&["windows:-DX=ON"], Platform::Linux).unwrap_err();
    assert_eq!(
      err,
      TokenError::UnknownPlatform {
        name: "windows".to_string(),
        token: "windows:-DX=ON".to_string(),
      }
    );
  }

  #[test]
  fn unknown_platform_in_negated_list_is_rejected() {
    assert!(resolve(&["!win,bsd:-DX=ON"], Platform::Linux).is_err());
  }

  #[test]
  fn parse_exposes_condition() {
    let token = ConditionalToken::parse("linux,mac:-DY=ON").unwrap();
    assert_eq!(token.condition, Condition::Only(vec![Platform::Linux, Platform::Mac]));
    assert_eq!(token.value, "-DY=ON");
    assert!(token.applies_to(Platform::Mac));
    assert!(!token.applies_to(Platform::Win));
  }
}
