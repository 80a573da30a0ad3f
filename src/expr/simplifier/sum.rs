use crate::expr::Expr;
use crate::expr::number::Number;
use crate::expr::ordering::cmp_expr;
use crate::expr::algebra::split::{as_coeff_mul, factors};
use super::base::Simplifier;

use num::{Zero, One};

/// `SumSimplifier` is a [`Simplifier`] for the `+` operator.
///
/// Numerical summands are added together and moved to the end, and
/// like terms (summands which differ only in their numerical
/// coefficient) are collected. Terms whose coefficients cancel are
/// dropped.
#[derive(Debug, Default)]
pub struct SumSimplifier;

impl Simplifier for SumSimplifier {
  fn simplify_expr_part(&self, expr: Expr) -> Expr {
    match expr {
      Expr::Call(function_name, args) if function_name == "+" => simplify_sum(args),
      expr => expr,
    }
  }
}

fn simplify_sum(args: Vec<Expr>) -> Expr {
  let mut constant = Number::zero();
  let mut groups: Vec<(Expr, Number)> = Vec::new();
  for arg in args {
    if let Some(n) = arg.as_number() {
      constant += n;
      continue;
    }
    let (coeff, rest) = as_coeff_mul(&arg);
    match groups.iter_mut().find(|(r, _)| *r == rest) {
      Some((_, c)) => *c += coeff,
      None => groups.push((rest, coeff)),
    }
  }
  groups.retain(|(_, c)| !c.is_zero());
  groups.sort_by(|(a, _), (b, _)| cmp_expr(a, b));

  let mut summands: Vec<Expr> = groups.into_iter().map(|(rest, coeff)| with_coeff(coeff, rest)).collect();
  if !constant.is_zero() {
    summands.push(Expr::from(constant));
  }
  Expr::sum(summands)
}

fn with_coeff(coeff: Number, rest: Expr) -> Expr {
  if coeff.is_one() {
    return rest;
  }
  let mut args = factors(&rest);
  args.insert(0, Expr::from(coeff));
  Expr::product(args)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn var(name: &str) -> Expr {
    Expr::var(name).unwrap()
  }

  fn run(args: Vec<Expr>) -> Expr {
    SumSimplifier.simplify_expr_part(Expr::call("+", args))
  }

  #[test]
  fn test_constants_collected() {
    assert_eq!(run(vec![Expr::from(1), var("x"), Expr::from(2)]), Expr::sum(vec![var("x"), Expr::from(3)]));
    assert_eq!(run(vec![Expr::from(1), Expr::from(-1)]), Expr::zero());
  }

  #[test]
  fn test_like_terms() {
    let expr = run(vec![var("x"), Expr::product(vec![Expr::from(2), var("x")]), var("y")]);
    assert_eq!(expr, Expr::sum(vec![Expr::product(vec![Expr::from(3), var("x")]), var("y")]));
  }

  #[test]
  fn test_cancellation() {
    let expr = run(vec![var("x"), Expr::product(vec![Expr::minus_one(), var("x")])]);
    assert_eq!(expr, Expr::zero());
  }

  #[test]
  fn test_compound_like_terms() {
    let xy = Expr::product(vec![var("x"), var("y")]);
    let expr = run(vec![xy.clone(), Expr::product(vec![Expr::from(4), var("x"), var("y")])]);
    assert_eq!(expr, Expr::product(vec![Expr::from(5), var("x"), var("y")]));
  }
}
