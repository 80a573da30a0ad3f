use crate::expr::Expr;
use crate::expr::number::{self, Number};
use crate::expr::atom::{Atom, MathConstant};
use crate::expr::arithmetic::ArithExpr;
use crate::expr::function::ElementaryFunction;
use crate::expr::prisms::{ExprToPower, Power};
use crate::util::prism::Prism;
use super::base::Simplifier;

use num::{Zero, Signed};

/// `PowerSimplifier` is a [`Simplifier`] for the `^` operator.
///
/// It removes trivial exponents and bases, folds exact numerical
/// powers, and pushes integer exponents through nested powers and
/// products. Powers of the constant `E` become applications of `exp`,
/// and powers of `exp(a)` are folded into the argument.
///
/// Examples:
///
/// ```text
/// x^0 ==> 1
/// 4^(1/2) ==> 2
/// (x^2)^3 ==> x^(2*3)
/// (x*y)^2 ==> x^2 * y^2
/// E^x ==> exp(x)
/// exp(x)^2 ==> exp(x*2)
/// ```
#[derive(Debug, Default)]
pub struct PowerSimplifier;

impl Simplifier for PowerSimplifier {
  fn simplify_expr_part(&self, expr: Expr) -> Expr {
    match ExprToPower.narrow_type(expr) {
      Ok(Power { base, exp }) => simplify_power(base, exp),
      Err(expr) => expr,
    }
  }
}

fn is_integer(expr: &Expr) -> bool {
  expr.as_number().map_or(false, Number::is_integer)
}

fn simplify_power(base: Expr, exp: Expr) -> Expr {
  if exp.is_zero() || base.is_one() {
    return Expr::one();
  }
  if exp.is_one() {
    return base;
  }
  if let (Some(b), Some(e)) = (base.as_number(), exp.as_number()) {
    if let Some(n) = number::pow_exact(b, e) {
      return Expr::from(n);
    }
    if b.is_zero() && e.is_positive() {
      return Expr::zero();
    }
  }
  if base == Expr::Atom(Atom::Constant(MathConstant::E)) {
    return Expr::apply(ElementaryFunction::Exp, exp);
  }
  if let Some(inner) = base.as_unary(ElementaryFunction::Exp) {
    let product = ArithExpr::from(inner.clone()) * ArithExpr::from(exp);
    return Expr::apply(ElementaryFunction::Exp, product.into());
  }
  if is_integer(&exp) {
    if let Some([inner_base, inner_exp]) = base.as_call_named("^") {
      let product = ArithExpr::from(inner_exp.clone()) * ArithExpr::from(exp);
      return Expr::pow(inner_base.clone(), product.into());
    }
    if let Some(factors) = base.as_call_named("*") {
      let factors = factors.iter().map(|f| Expr::pow(f.clone(), exp.clone())).collect();
      return Expr::product(factors);
    }
  }
  Expr::pow(base, exp)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn var(name: &str) -> Expr {
    Expr::var(name).unwrap()
  }

  fn run(expr: Expr) -> Expr {
    PowerSimplifier.simplify_expr_part(expr)
  }

  #[test]
  fn test_trivial_powers() {
    assert_eq!(run(Expr::pow(var("x"), Expr::zero())), Expr::one());
    assert_eq!(run(Expr::pow(var("x"), Expr::one())), var("x"));
    assert_eq!(run(Expr::pow(Expr::one(), var("x"))), Expr::one());
  }

  #[test]
  fn test_numerical_powers() {
    assert_eq!(run(Expr::pow(Expr::from(2), Expr::from(-3))), Expr::from(number::ratio(1, 8)));
    assert_eq!(run(Expr::pow(Expr::from(9), Expr::from(number::ratio(1, 2)))), Expr::from(3));
    let irrational = Expr::pow(Expr::from(2), Expr::from(number::ratio(1, 2)));
    assert_eq!(run(irrational.clone()), irrational);
  }

  #[test]
  fn test_nested_powers() {
    let expr = Expr::pow(Expr::pow(var("x"), Expr::from(2)), Expr::from(3));
    assert_eq!(run(expr), Expr::pow(var("x"), Expr::from(6)));
    let fractional = Expr::pow(Expr::pow(var("x"), Expr::from(2)), Expr::from(number::ratio(1, 2)));
    assert_eq!(run(fractional.clone()), fractional);
  }

  #[test]
  fn test_power_of_product() {
    let expr = Expr::pow(Expr::product(vec![var("x"), var("y")]), Expr::from(2));
    assert_eq!(run(expr), Expr::product(vec![
      Expr::pow(var("x"), Expr::from(2)),
      Expr::pow(var("y"), Expr::from(2)),
    ]));
  }

  #[test]
  fn test_exponentials() {
    assert_eq!(run(Expr::pow(Expr::e(), var("x"))), Expr::call("exp", vec![var("x")]));
    let expr = Expr::pow(Expr::call("exp", vec![var("x")]), Expr::from(2));
    assert_eq!(run(expr), Expr::call("exp", vec![Expr::call("*", vec![var("x"), Expr::from(2)])]));
  }
}
