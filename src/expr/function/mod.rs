//! The elementary functions known to the engine. Any other function
//! name is treated as an opaque user function.

pub mod flags;

use flags::FunctionFlags;

use phf::phf_map;

use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementaryFunction {
  Sin,
  Cos,
  Tan,
  Cot,
  Sec,
  Csc,
  Asin,
  Acos,
  Atan,
  Exp,
  Log,
  Sqrt,
}

static ELEMENTARY_FUNCTIONS: phf::Map<&'static str, ElementaryFunction> = phf_map! {
  "sin" => ElementaryFunction::Sin,
  "cos" => ElementaryFunction::Cos,
  "tan" => ElementaryFunction::Tan,
  "cot" => ElementaryFunction::Cot,
  "sec" => ElementaryFunction::Sec,
  "csc" => ElementaryFunction::Csc,
  "asin" => ElementaryFunction::Asin,
  "acos" => ElementaryFunction::Acos,
  "atan" => ElementaryFunction::Atan,
  "exp" => ElementaryFunction::Exp,
  "log" => ElementaryFunction::Log,
  "sqrt" => ElementaryFunction::Sqrt,
};

/// Call names with built-in meaning that are not functions in the
/// mathematical sense.
const OPERATORS: [&str; 7] = ["+", "*", "^", "deriv", "integral", "=", "!="];

impl ElementaryFunction {
  pub fn from_name(name: &str) -> Option<Self> {
    ELEMENTARY_FUNCTIONS.get(name).copied()
  }

  pub fn name(self) -> &'static str {
    match self {
      ElementaryFunction::Sin => "sin",
      ElementaryFunction::Cos => "cos",
      ElementaryFunction::Tan => "tan",
      ElementaryFunction::Cot => "cot",
      ElementaryFunction::Sec => "sec",
      ElementaryFunction::Csc => "csc",
      ElementaryFunction::Asin => "asin",
      ElementaryFunction::Acos => "acos",
      ElementaryFunction::Atan => "atan",
      ElementaryFunction::Exp => "exp",
      ElementaryFunction::Log => "log",
      ElementaryFunction::Sqrt => "sqrt",
    }
  }

  pub fn flags(self) -> FunctionFlags {
    match self {
      ElementaryFunction::Sin | ElementaryFunction::Cos | ElementaryFunction::Tan |
      ElementaryFunction::Cot | ElementaryFunction::Sec | ElementaryFunction::Csc => FunctionFlags::TRIGONOMETRIC,
      ElementaryFunction::Asin | ElementaryFunction::Acos | ElementaryFunction::Atan => FunctionFlags::INVERSE_TRIGONOMETRIC,
      ElementaryFunction::Exp => FunctionFlags::EXPONENTIAL,
      ElementaryFunction::Log => FunctionFlags::LOGARITHMIC,
      ElementaryFunction::Sqrt => FunctionFlags::empty(),
    }
  }

  pub fn is_trigonometric(self) -> bool {
    self.flags().contains(FunctionFlags::TRIGONOMETRIC)
  }

  /// Human-readable name used in explanations.
  pub fn long_name(self) -> &'static str {
    match self {
      ElementaryFunction::Sin => "sine",
      ElementaryFunction::Cos => "cosine",
      ElementaryFunction::Tan => "tangent",
      ElementaryFunction::Cot => "cotangent",
      ElementaryFunction::Sec => "secant",
      ElementaryFunction::Csc => "cosecant",
      ElementaryFunction::Asin => "arcsine",
      ElementaryFunction::Acos => "arccosine",
      ElementaryFunction::Atan => "arctangent",
      ElementaryFunction::Exp => "exponential function",
      ElementaryFunction::Log => "logarithm",
      ElementaryFunction::Sqrt => "square root",
    }
  }
}

impl Display for ElementaryFunction {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name())
  }
}

pub fn is_operator(name: &str) -> bool {
  OPERATORS.contains(&name)
}

/// True if `name` denotes a function the engine knows nothing about,
/// such as a user-supplied `f` or `g`.
pub fn is_opaque_function(name: &str) -> bool {
  !is_operator(name) && ElementaryFunction::from_name(name).is_none()
}

/// The name of the derivative of the opaque single-argument function
/// `name`, e.g. `f` becomes `f'`.
pub fn derivative_name(name: &str) -> String {
  format!("{name}'")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_lookup_by_name() {
    assert_eq!(ElementaryFunction::from_name("tan"), Some(ElementaryFunction::Tan));
    assert_eq!(ElementaryFunction::from_name("f"), None);
    for function in [ElementaryFunction::Sin, ElementaryFunction::Atan, ElementaryFunction::Sqrt] {
      assert_eq!(ElementaryFunction::from_name(function.name()), Some(function));
    }
  }

  #[test]
  fn test_trig_family() {
    assert!(ElementaryFunction::Csc.is_trigonometric());
    assert!(!ElementaryFunction::Atan.is_trigonometric());
    assert!(ElementaryFunction::Atan.flags().contains(FunctionFlags::INVERSE_TRIGONOMETRIC));
  }

  #[test]
  fn test_opaque_functions() {
    assert!(is_opaque_function("f"));
    assert!(is_opaque_function("f'"));
    assert!(!is_opaque_function("sin"));
    assert!(!is_opaque_function("+"));
    assert!(!is_opaque_function("deriv"));
    assert_eq!(derivative_name("g"), "g'");
  }
}
