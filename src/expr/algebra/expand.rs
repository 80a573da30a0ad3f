//! Distribution of products over sums.

use crate::expr::Expr;
use crate::expr::number;
use crate::expr::walker::postorder_walk_ok;
use crate::expr::simplifier::simplify;
use super::split::terms;

use itertools::Itertools;

/// Largest integer power of a sum which will be multiplied out.
const MAX_EXPANDED_POWER: i64 = 12;

/// Multiplies out every product of sums, and every small positive
/// integer power of a sum, in `expr`. The result is simplified.
pub fn expand(expr: Expr) -> Expr {
  let expanded = postorder_walk_ok(simplify(expr), expand_node);
  simplify(expanded)
}

fn expand_node(expr: Expr) -> Expr {
  if let Some(args) = expr.as_call_named("*") {
    if args.iter().any(|arg| arg.as_call_named("+").is_some()) {
      return distribute(args);
    }
    return expr;
  }
  if let Some([base, exp]) = expr.as_call_named("^") {
    if base.as_call_named("+").is_some() {
      if let Some(n) = exp.as_number().and_then(number::to_i64) {
        if (2..=MAX_EXPANDED_POWER).contains(&n) {
          let copies = vec![base.clone(); n as usize];
          return distribute(&copies);
        }
      }
    }
  }
  expr
}

fn distribute(factors: &[Expr]) -> Expr {
  let summands = factors.iter()
    .map(terms)
    .multi_cartesian_product()
    .map(Expr::product)
    .collect();
  Expr::sum(summands)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::expr::numeric::evaluate_at;

  use approx::assert_abs_diff_eq;

  fn var(name: &str) -> Expr {
    Expr::var(name).unwrap()
  }

  #[test]
  fn test_distribute_product() {
    // (x + 1) * (x - 1) = x^2 - 1
    let expr = Expr::product(vec![
      Expr::sum(vec![var("x"), Expr::one()]),
      Expr::sum(vec![var("x"), Expr::minus_one()]),
    ]);
    let expanded = expand(expr);
    assert_eq!(expanded, Expr::sum(vec![Expr::pow(var("x"), Expr::from(2)), Expr::minus_one()]));
  }

  #[test]
  fn test_expand_square() {
    let expr = Expr::pow(Expr::sum(vec![var("x"), Expr::one()]), Expr::from(2));
    let expanded = expand(expr.clone());
    assert!(expanded.as_call_named("+").is_some());
    for x in [-1.5, 0.0, 2.0] {
      assert_abs_diff_eq!(
        evaluate_at(&expanded, "x", x).unwrap(),
        evaluate_at(&expr, "x", x).unwrap(),
        epsilon = 1e-9,
      );
    }
  }

  #[test]
  fn test_expand_leaves_non_products_alone() {
    let expr = Expr::call("sin", vec![var("x")]);
    assert_eq!(expand(expr.clone()), expr);
  }
}
