//! The expression substrate: a small, exact computer algebra layer
//! the step engines are built on.
//!
//! Operators are ordinary calls. Sums are n-ary `+`, products are
//! n-ary `*`, and powers are binary `^`. There is no subtraction or
//! division node: `a - b` is `a + (-1)*b` and `a / b` is `a * b^-1`.

pub mod algebra;
pub mod arithmetic;
pub mod atom;
pub mod calculus;
pub mod function;
pub mod number;
pub mod numeric;
pub mod ordering;
pub mod prisms;
pub mod simplifier;
pub mod substitute;
pub mod var;
pub mod walker;

use atom::{Atom, MathConstant};
use number::Number;
use var::Var;
use function::ElementaryFunction;

use num::{Zero, One};

use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
  Atom(Atom),
  Call(String, Vec<Expr>),
}

impl Expr {
  /// Convenience constructor for [Expr::Call].
  pub fn call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Call(name.to_string(), args)
  }

  /// A user variable with the given name, or `None` if the name is
  /// not a valid variable name.
  pub fn var(name: &str) -> Option<Expr> {
    Var::new(name).map(Expr::from)
  }

  pub fn zero() -> Expr {
    Expr::from(0)
  }

  pub fn one() -> Expr {
    Expr::from(1)
  }

  pub fn minus_one() -> Expr {
    Expr::from(-1)
  }

  pub fn e() -> Expr {
    Expr::Atom(Atom::Constant(MathConstant::E))
  }

  pub fn pi() -> Expr {
    Expr::Atom(Atom::Constant(MathConstant::Pi))
  }

  /// Applies a known elementary function to a single argument.
  pub fn apply(function: ElementaryFunction, arg: Expr) -> Expr {
    Expr::call(function.name(), vec![arg])
  }

  /// Raw `base ^ exp` node. No simplification is performed.
  pub fn pow(base: Expr, exp: Expr) -> Expr {
    Expr::call("^", vec![base, exp])
  }

  /// Calls the function `name` on `args`, unless `args` has fewer than
  /// two elements. On zero arguments, the `default` is produced. On
  /// one argument, that argument is returned unmodified.
  pub fn call_on_several<F>(name: &str, mut args: Vec<Expr>, default: F) -> Expr
  where F: FnOnce() -> Expr {
    match args.len() {
      0 => default(),
      1 => args.pop().unwrap_or_else(default),
      _ => Expr::call(name, args),
    }
  }

  /// Raw n-ary sum, collapsing the degenerate cases.
  pub fn sum(args: Vec<Expr>) -> Expr {
    Expr::call_on_several("+", args, Expr::zero)
  }

  /// Raw n-ary product, collapsing the degenerate cases.
  pub fn product(args: Vec<Expr>) -> Expr {
    Expr::call_on_several("*", args, Expr::one)
  }

  /// `lhs = rhs`, used for display purposes only.
  pub fn equation(lhs: Expr, rhs: Expr) -> Expr {
    Expr::call("=", vec![lhs, rhs])
  }

  /// `d/dvar expr`, an unevaluated derivative.
  pub fn derivative(expr: Expr, var: Var) -> Expr {
    Expr::call("deriv", vec![expr, Expr::from(var)])
  }

  /// `∫ expr dvar`, an unevaluated antiderivative.
  pub fn integral(expr: Expr, var: Var) -> Expr {
    Expr::call("integral", vec![expr, Expr::from(var)])
  }

  pub fn as_number(&self) -> Option<&Number> {
    match self {
      Expr::Atom(Atom::Number(n)) => Some(n),
      _ => None,
    }
  }

  pub fn as_var(&self) -> Option<&Var> {
    match self {
      Expr::Atom(Atom::Var(v)) => Some(v),
      _ => None,
    }
  }

  pub fn is_var(&self, var: &Var) -> bool {
    self.as_var() == Some(var)
  }

  /// The arguments of this expression, if it is a call to the
  /// function `name`.
  pub fn as_call_named(&self, name: &str) -> Option<&[Expr]> {
    match self {
      Expr::Call(function_name, args) if function_name == name => Some(args),
      _ => None,
    }
  }

  /// The argument of this expression, if it is a one-argument
  /// application of the elementary function `function`.
  pub fn as_unary(&self, function: ElementaryFunction) -> Option<&Expr> {
    match self.as_call_named(function.name()) {
      Some([arg]) => Some(arg),
      _ => None,
    }
  }

  pub fn is_number(&self) -> bool {
    self.as_number().is_some()
  }

  pub fn is_zero(&self) -> bool {
    self.as_number().map_or(false, Number::is_zero)
  }

  pub fn is_one(&self) -> bool {
    self.as_number().map_or(false, Number::is_one)
  }

  /// True if `var` occurs anywhere in `self`.
  pub fn contains_var(&self, var: &Var) -> bool {
    walker::any(self, |e| e.is_var(var))
  }

  /// True if `self` contains the subexpression `needle`.
  pub fn contains(&self, needle: &Expr) -> bool {
    walker::any(self, |e| e == needle)
  }

  /// All variables occurring in `self`.
  pub fn free_vars(&self) -> BTreeSet<Var> {
    let mut vars = BTreeSet::new();
    walker::postorder_walk_borrowed(self, |e| {
      if let Some(v) = e.as_var() {
        vars.insert(v.clone());
      }
    });
    vars
  }

  /// True if any unevaluated `integral` call remains in `self`.
  pub fn has_unevaluated_integral(&self) -> bool {
    walker::any(self, |e| e.as_call_named("integral").is_some())
  }
}

impl From<Atom> for Expr {
  fn from(a: Atom) -> Expr {
    Expr::Atom(a)
  }
}

impl From<Var> for Expr {
  fn from(v: Var) -> Expr {
    Expr::Atom(Atom::Var(v))
  }
}

impl From<Number> for Expr {
  fn from(n: Number) -> Expr {
    Expr::Atom(Atom::Number(n))
  }
}

impl From<i64> for Expr {
  fn from(n: i64) -> Expr {
    Expr::Atom(Atom::from(n))
  }
}

impl Display for Expr {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", crate::display::basic::to_basic(self))
  }
}
