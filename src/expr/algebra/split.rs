//! Functions which take an expression apart into pieces, without
//! otherwise changing it.

use crate::expr::Expr;
use crate::expr::number::Number;
use crate::expr::var::Var;

use num::One;

/// The summands of `expr`. A non-sum is a single summand.
pub fn terms(expr: &Expr) -> Vec<Expr> {
  match expr.as_call_named("+") {
    Some(args) => args.to_vec(),
    None => vec![expr.clone()],
  }
}

/// The multiplicands of `expr`. A non-product is a single
/// multiplicand.
pub fn factors(expr: &Expr) -> Vec<Expr> {
  match expr.as_call_named("*") {
    Some(args) => args.to_vec(),
    None => vec![expr.clone()],
  }
}

/// Splits `expr` into a base and an exponent. Expressions which are
/// not powers have an exponent of one.
pub fn as_base_exp(expr: &Expr) -> (Expr, Expr) {
  match expr.as_call_named("^") {
    Some([base, exp]) => (base.clone(), exp.clone()),
    _ => (expr.clone(), Expr::one()),
  }
}

/// Splits a product into `(independent, dependent)` factors with
/// respect to `var`. The product of the two pieces is always equal to
/// `expr`; either piece may be the literal `1`.
pub fn as_independent(expr: &Expr, var: &Var) -> (Expr, Expr) {
  let (independent, dependent): (Vec<_>, Vec<_>) =
    factors(expr).into_iter().partition(|f| !f.contains_var(var));
  (Expr::product(independent), Expr::product(dependent))
}

/// Splits a sum into `(independent, dependent)` summands with respect
/// to `var`. Either piece may be the literal `0`.
pub fn as_independent_terms(expr: &Expr, var: &Var) -> (Expr, Expr) {
  let (independent, dependent): (Vec<_>, Vec<_>) =
    terms(expr).into_iter().partition(|t| !t.contains_var(var));
  (Expr::sum(independent), Expr::sum(dependent))
}

/// The numerical coefficient of a product, together with the
/// remaining factors.
pub fn as_coeff_mul(expr: &Expr) -> (Number, Expr) {
  let mut coeff = Number::one();
  let mut rest = Vec::new();
  for factor in factors(expr) {
    match factor.as_number() {
      Some(n) => coeff *= n,
      None => rest.push(factor),
    }
  }
  (coeff, Expr::product(rest))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::expr::number;

  fn var(name: &str) -> Expr {
    Expr::var(name).unwrap()
  }

  #[test]
  fn test_as_base_exp() {
    let x2 = Expr::pow(var("x"), Expr::from(2));
    assert_eq!(as_base_exp(&x2), (var("x"), Expr::from(2)));
    assert_eq!(as_base_exp(&var("x")), (var("x"), Expr::one()));
  }

  #[test]
  fn test_as_independent() {
    let x = Var::new("x").unwrap();
    let expr = Expr::product(vec![Expr::from(3), var("y"), Expr::call("sin", vec![var("x")])]);
    let (independent, dependent) = as_independent(&expr, &x);
    assert_eq!(independent, Expr::product(vec![Expr::from(3), var("y")]));
    assert_eq!(dependent, Expr::call("sin", vec![var("x")]));

    let (independent, dependent) = as_independent(&var("x"), &x);
    assert_eq!(independent, Expr::one());
    assert_eq!(dependent, var("x"));
  }

  #[test]
  fn test_as_independent_terms() {
    let x = Var::new("x").unwrap();
    let expr = Expr::sum(vec![var("x"), Expr::from(1), var("y")]);
    let (independent, dependent) = as_independent_terms(&expr, &x);
    assert_eq!(independent, Expr::sum(vec![Expr::from(1), var("y")]));
    assert_eq!(dependent, var("x"));
  }

  #[test]
  fn test_as_coeff_mul() {
    let expr = Expr::product(vec![Expr::from(-2), var("x"), Expr::from(number::ratio(1, 4))]);
    assert_eq!(as_coeff_mul(&expr), (number::ratio(-1, 2), var("x")));
    assert_eq!(as_coeff_mul(&var("x")), (Number::one(), var("x")));
  }
}
