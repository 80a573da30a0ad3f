//! Replacing subexpressions of an expression.

use super::Expr;
use super::var::Var;
use super::number::Number;
use super::algebra::split::{as_base_exp, as_coeff_mul};
use super::function::ElementaryFunction;
use super::walker::preorder_replace;

use num::Zero;

/// Replaces every occurrence of `target` in `expr` with
/// `replacement`. The replacement itself is not searched again.
pub fn substitute(expr: Expr, target: &Expr, replacement: &Expr) -> Expr {
  preorder_replace(expr, |e| (e == target).then(|| replacement.clone()))
}

pub fn substitute_var(expr: Expr, var: &Var, replacement: &Expr) -> Expr {
  preorder_replace(expr, |e| e.is_var(var).then(|| replacement.clone()))
}

/// Performs several replacements at once. The first matching pair
/// wins at each node, and replacements are never searched again, so
/// `x -> y, y -> x` swaps the two variables.
pub fn substitute_all(expr: Expr, pairs: &[(Expr, Expr)]) -> Expr {
  preorder_replace(expr, |e| {
    pairs.iter().find(|(target, _)| target == e).map(|(_, replacement)| replacement.clone())
  })
}

/// Like [`substitute`], but also recognizes powers of the target.
/// With `target = exp(a)`, the node `exp(k*a)` becomes `u^k`; with
/// `target = b^n`, the node `b^(k*n)` (or `b` itself) becomes `u^k`
/// for integer `k`.
pub fn substitute_power_aware(expr: Expr, target: &Expr, replacement: &Var) -> Expr {
  let u = Expr::from(replacement.clone());
  preorder_replace(expr, |e| {
    if e == target {
      return Some(u.clone());
    }
    power_of_target(e, target).map(|k| Expr::pow(u.clone(), Expr::from(k)))
  })
}

/// If `expr` is `target ^ k` in disguise, returns `k`.
fn power_of_target(expr: &Expr, target: &Expr) -> Option<Number> {
  if let (Some(inner), Some(target_inner)) = (expr.as_unary(ElementaryFunction::Exp), target.as_unary(ElementaryFunction::Exp)) {
    let (k1, rest1) = as_coeff_mul(inner);
    let (k2, rest2) = as_coeff_mul(target_inner);
    if rest1 == rest2 && !k2.is_zero() {
      return Some(k1 / k2);
    }
    return None;
  }
  if let Some([base2, exp2]) = target.as_call_named("^") {
    let (base1, exp1) = as_base_exp(expr);
    if base1 != *base2 {
      return None;
    }
    let (Some(n1), Some(n2)) = (exp1.as_number(), exp2.as_number()) else { return None };
    if n2.is_zero() {
      return None;
    }
    let k = n1 / n2;
    return k.is_integer().then_some(k);
  }
  None
}

#[cfg(test)]
mod tests {
  use super::*;

  fn var(name: &str) -> Expr {
    Expr::var(name).unwrap()
  }

  fn exp(arg: Expr) -> Expr {
    Expr::call("exp", vec![arg])
  }

  #[test]
  fn test_substitute_var() {
    let x = Var::new("x").unwrap();
    let expr = Expr::call("sin", vec![Expr::pow(var("x"), Expr::from(2))]);
    assert_eq!(
      substitute_var(expr, &x, &var("t")),
      Expr::call("sin", vec![Expr::pow(var("t"), Expr::from(2))]),
    );
  }

  #[test]
  fn test_substitute_subexpression() {
    let inner = Expr::pow(var("x"), Expr::from(2));
    let expr = Expr::call("sin", vec![inner.clone()]);
    assert_eq!(substitute(expr, &inner, &var("u")), Expr::call("sin", vec![var("u")]));
  }

  #[test]
  fn test_substitute_all_is_simultaneous() {
    let expr = Expr::call("f", vec![var("x"), var("y")]);
    let swapped = substitute_all(expr, &[(var("x"), var("y")), (var("y"), var("x"))]);
    assert_eq!(swapped, Expr::call("f", vec![var("y"), var("x")]));
  }

  #[test]
  fn test_power_aware_exp() {
    let u = Var::new("u").unwrap();
    let target = exp(var("x"));
    let expr = Expr::sum(vec![Expr::one(), exp(Expr::product(vec![Expr::from(2), var("x")]))]);
    assert_eq!(
      substitute_power_aware(expr, &target, &u),
      Expr::sum(vec![Expr::one(), Expr::pow(var("u"), Expr::from(2))]),
    );
  }

  #[test]
  fn test_power_aware_pow() {
    let u = Var::new("u").unwrap();
    let target = Expr::pow(var("x"), Expr::from(2));
    let x4 = Expr::pow(var("x"), Expr::from(4));
    assert_eq!(substitute_power_aware(x4, &target, &u), Expr::pow(var("u"), Expr::from(2)));
    let x3 = Expr::pow(var("x"), Expr::from(3));
    assert_eq!(substitute_power_aware(x3.clone(), &target, &u), x3);
  }

  #[test]
  fn test_power_aware_reciprocal() {
    let u = Var::new("u").unwrap();
    let cos = Expr::call("cos", vec![var("x")]);
    let target = Expr::pow(cos.clone(), Expr::minus_one());
    let expr = Expr::product(vec![Expr::call("sin", vec![var("x")]), cos]);
    assert_eq!(
      substitute_power_aware(expr, &target, &u),
      Expr::product(vec![Expr::call("sin", vec![var("x")]), Expr::pow(var("u"), Expr::minus_one())]),
    );
  }
}
