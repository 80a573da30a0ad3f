use super::number::{self, Number};
use super::var::Var;

use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Atom {
  Number(Number),
  Constant(MathConstant),
  Var(Var),
}

/// Named transcendental constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MathConstant {
  /// Euler's number, the base of the natural logarithm.
  E,
  Pi,
}

impl MathConstant {
  pub fn to_f64(self) -> f64 {
    match self {
      MathConstant::E => std::f64::consts::E,
      MathConstant::Pi => std::f64::consts::PI,
    }
  }
}

impl From<Number> for Atom {
  fn from(n: Number) -> Self {
    Self::Number(n)
  }
}

impl From<Var> for Atom {
  fn from(v: Var) -> Self {
    Self::Var(v)
  }
}

impl From<i64> for Atom {
  fn from(n: i64) -> Self {
    Self::Number(number::integer(n))
  }
}

impl From<MathConstant> for Atom {
  fn from(c: MathConstant) -> Self {
    Self::Constant(c)
  }
}

impl Display for MathConstant {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      MathConstant::E => write!(f, "E"),
      MathConstant::Pi => write!(f, "pi"),
    }
  }
}

impl Display for Atom {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      Atom::Number(n) => write!(f, "{n}"),
      Atom::Constant(c) => write!(f, "{c}"),
      Atom::Var(v) => write!(f, "{v}"),
    }
  }
}
