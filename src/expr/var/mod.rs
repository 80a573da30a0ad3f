use regex::Regex;
use once_cell::sync::Lazy;
use thiserror::Error;

use std::fmt::{self, Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A variable in an expression, left intentionally un-evaluated.
///
/// User variables are identified by strings. A user variable's name
/// must begin with a letter, followed by zero or more letters, digits,
/// or apostrophes. This structure enforces these constraints.
///
/// The engine additionally creates *fresh* variables (see
/// [`Var::fresh`]) whose names contain a `#`. No user-typed name can
/// ever contain that character, so a fresh variable never collides
/// with anything in the user's expression.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(String);

#[derive(Clone, Debug, Error)]
#[error("Invalid variable name: {original_string:?}")]
pub struct TryFromStringError {
  original_string: String,
}

pub static VALID_NAME_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^[a-zA-Z][a-zA-Z0-9']*$").unwrap()
});

static FRESH_COUNTER: AtomicUsize = AtomicUsize::new(0);

impl Var {
  pub fn new(name: impl Into<String>) -> Option<Self> {
    Self::try_from(name.into()).ok()
  }

  /// A brand new variable, distinct from every user variable and from
  /// every other fresh variable. The hint only affects how the
  /// variable looks if it is ever displayed.
  pub fn fresh(hint: &str) -> Self {
    let id = FRESH_COUNTER.fetch_add(1, Ordering::Relaxed);
    Self(format!("{hint}#{id}"))
  }

  pub fn is_fresh(&self) -> bool {
    self.0.contains('#')
  }

  /// For a fresh variable, the hint and the numerical index it was
  /// generated with.
  pub fn fresh_parts(&self) -> Option<(&str, &str)> {
    self.0.split_once('#')
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl TryFrom<String> for Var {
  type Error = TryFromStringError;

  fn try_from(name: String) -> Result<Self, Self::Error> {
    if VALID_NAME_RE.is_match(&name) {
      Ok(Self(name))
    } else {
      Err(TryFromStringError { original_string: name })
    }
  }
}

impl From<Var> for String {
  fn from(v: Var) -> Self {
    v.0
  }
}

impl Display for Var {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self.fresh_parts() {
      Some((hint, id)) => write!(f, "{hint}_{id}"),
      None => write!(f, "{}", &self.0),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_valid_variable_names() {
    Var::new("abc").unwrap();
    Var::new("q0").unwrap();
    Var::new("x1234567890").unwrap();
    Var::new("AaAaAa").unwrap();
    Var::new("abc'").unwrap();
    Var::new("a''''A").unwrap();
    Var::new("r0'0").unwrap();
  }

  #[test]
  fn test_invalid_variable_names() {
    assert_eq!(Var::new(""), None);
    assert_eq!(Var::new("0"), None);
    assert_eq!(Var::new("0a"), None);
    assert_eq!(Var::new("'"), None);
    assert_eq!(Var::new("a b"), None);
    assert_eq!(Var::new("c-d"), None);
    assert_eq!(Var::new("u#0"), None);
    assert_eq!(Var::new("$"), None);
  }

  #[test]
  fn test_fresh_variables_are_distinct() {
    let a = Var::fresh("u");
    let b = Var::fresh("u");
    assert_ne!(a, b);
    assert!(a.is_fresh());
    assert!(!Var::new("u").unwrap().is_fresh());
    assert_eq!(a.fresh_parts().map(|(hint, _)| hint), Some("u"));
  }

  #[test]
  fn test_fresh_variable_cannot_be_typed() {
    let fresh = Var::fresh("x");
    assert_eq!(Var::new(fresh.as_str()), None);
  }
}
