use super::rule::{IntegralRule, IntegralKind};
use super::select::IntegralSelector;
use crate::expr::Expr;
use crate::expr::var::Var;
use crate::expr::number;
use crate::expr::arithmetic::ArithExpr;
use crate::expr::calculus::{InProgress, differentiate};
use crate::expr::function::{ElementaryFunction, is_opaque_function};
use crate::expr::algebra::split::as_independent;
use crate::expr::simplifier::simplify;
use crate::expr::substitute::{substitute_power_aware, substitute_var};
use crate::expr::walker;
use crate::steps::rename::RuleTree;

use tracing::trace;

/// A candidate substitution `u = u_func`, under which the integrand
/// becomes `constant * rewritten` (in terms of `u`).
#[derive(Debug, Clone, PartialEq)]
struct Substitution {
  u_func: Expr,
  constant: Expr,
  rewritten: Expr,
}

impl IntegralSelector {
  /// u-substitution. Every candidate subterm whose derivative divides
  /// the integrand, leaving only the new variable behind, is one way of
  /// doing the integral. Candidates whose rewritten integrand has no
  /// complete derivation are dropped.
  pub(super) fn substitution_rule(&mut self, expr: &Expr, symbol: &Var, in_progress: &mut InProgress) -> Option<IntegralRule> {
    let u_var = Var::fresh("u");
    let mut ways = Vec::new();
    for substitution in find_substitutions(expr, symbol, &u_var) {
      let substep = self.select(&substitution.rewritten, &u_var, in_progress);
      if substep.contains_unknown() {
        continue;
      }
      let substep = if substitution.constant.is_one() {
        substep
      } else {
        let context = simplify(Expr::product(vec![substitution.constant.clone(), substitution.rewritten.clone()]));
        IntegralRule::new(context, u_var.clone(), IntegralKind::ConstantTimes {
          constant: substitution.constant.clone(),
          other: substitution.rewritten,
          substep: Box::new(substep),
        })
      };
      ways.push(IntegralRule::new(expr.clone(), symbol.clone(), IntegralKind::USub {
        u_var: u_var.clone(),
        u_func: substitution.u_func,
        constant: substitution.constant,
        substep: Box::new(substep),
      }));
    }
    match ways.len() {
      0 => self.exp_substitution(expr, symbol, &u_var, in_progress),
      1 => ways.pop(),
      _ => Some(IntegralRule::new(expr.clone(), symbol.clone(), IntegralKind::Alternative { alternatives: ways })),
    }
  }

  /// Last resort for integrands involving `exp`: try `u = exp(symbol)`.
  fn exp_substitution(&mut self, expr: &Expr, symbol: &Var, u_var: &Var, in_progress: &mut InProgress) -> Option<IntegralRule> {
    let has_exp = walker::any(expr, |e| e.as_unary(ElementaryFunction::Exp).is_some());
    if !has_exp {
      return None;
    }
    let u_func = Expr::apply(ElementaryFunction::Exp, Expr::from(symbol.clone()));
    let quotient = simplify((ArithExpr::from(expr.clone()) / ArithExpr::from(u_func.clone())).into());
    let rewritten = simplify(substitute_power_aware(quotient, &u_func, u_var));
    if rewritten.is_zero() || rewritten.contains_var(symbol) {
      return None;
    }
    let substep = self.select(&rewritten, u_var, in_progress);
    Some(IntegralRule::new(expr.clone(), symbol.clone(), IntegralKind::USub {
      u_var: u_var.clone(),
      u_func,
      constant: Expr::one(),
      substep: Box::new(substep),
    }))
  }
}

fn find_substitutions(expr: &Expr, symbol: &Var, u_var: &Var) -> Vec<Substitution> {
  let renamed = substitute_var(expr.clone(), symbol, &Expr::from(u_var.clone()));
  let mut results = Vec::new();
  let mut candidates = Vec::new();
  possible_subterms(expr, symbol, &mut candidates);
  let mut seen = Vec::new();
  for u_func in candidates {
    if u_func.is_var(symbol) || seen.contains(&u_func) {
      continue;
    }
    seen.push(u_func.clone());
    let Some(substitution) = try_substitution(expr, symbol, u_var, &u_func) else { continue };
    if substitution.rewritten == renamed {
      continue;
    }
    trace!(u = %substitution.u_func, rewritten = %substitution.rewritten, "substitution candidate");
    if !results.contains(&substitution) {
      results.push(substitution);
    }
  }
  results
}

fn try_substitution(expr: &Expr, symbol: &Var, u_var: &Var, u_func: &Expr) -> Option<Substitution> {
  let du = differentiate(u_func, symbol);
  if du.is_zero() {
    return None;
  }
  let quotient = simplify((ArithExpr::from(expr.clone()) / ArithExpr::from(du)).into());
  if !quotient.contains_var(symbol) {
    return None;
  }
  let rewritten = simplify(substitute_power_aware(quotient, u_func, u_var));
  if rewritten.contains_var(symbol) {
    return None;
  }
  let (constant, rewritten) = as_independent(&rewritten, u_var);
  Some(Substitution { u_func: u_func.clone(), constant, rewritten })
}

/// Subterms of `expr` worth trying as `u`, in the order they are
/// found. May contain duplicates.
fn possible_subterms(expr: &Expr, symbol: &Var, out: &mut Vec<Expr>) {
  let Expr::Call(name, args) = expr else { return };
  match (name.as_str(), args.as_slice()) {
    ("+" | "*", _) => {
      for arg in args {
        out.push(arg.clone());
        possible_subterms(arg, symbol, out);
      }
    }
    ("^", [base, exp]) => {
      if !exp.contains_var(symbol) {
        out.push(base.clone());
      } else if !base.contains_var(symbol) {
        out.push(exp.clone());
      }
      if let Some(n) = exp.as_number().and_then(number::to_i64) {
        for d in prime_factors(n.unsigned_abs()) {
          if 1 < d && d < n.unsigned_abs() {
            out.push(Expr::pow(base.clone(), Expr::from(d as i64)));
          }
        }
        if base.as_call_named("+").is_some() {
          let mut inner = Vec::new();
          possible_subterms(base, symbol, &mut inner);
          out.extend(inner.into_iter().filter(|t| t.as_call_named("^").is_some()));
        }
      }
    }
    (name, [arg]) if ElementaryFunction::from_name(name).is_some() || is_opaque_function(name) => {
      out.push(arg.clone());
    }
    _ => {}
  }
}

fn prime_factors(mut n: u64) -> Vec<u64> {
  let mut primes = Vec::new();
  let mut p = 2;
  while p * p <= n {
    if n % p == 0 {
      primes.push(p);
      while n % p == 0 {
        n /= p;
      }
    }
    p += 1;
  }
  if n > 1 {
    primes.push(n);
  }
  primes
}

#[cfg(test)]
mod tests {
  use super::*;

  fn var(name: &str) -> Expr {
    Expr::var(name).unwrap()
  }

  fn x() -> Var {
    Var::new("x").unwrap()
  }

  #[test]
  fn test_prime_factors() {
    assert_eq!(prime_factors(12), vec![2, 3]);
    assert_eq!(prime_factors(7), vec![7]);
    assert_eq!(prime_factors(1), Vec::<u64>::new());
  }

  #[test]
  fn test_possible_subterms_of_power() {
    let expr = Expr::pow(Expr::sum(vec![Expr::pow(var("x"), Expr::from(2)), Expr::one()]), Expr::from(6));
    let mut out = Vec::new();
    possible_subterms(&expr, &x(), &mut out);
    let base = Expr::sum(vec![Expr::pow(var("x"), Expr::from(2)), Expr::one()]);
    assert_eq!(out[0], base);
    assert!(out.contains(&Expr::pow(base.clone(), Expr::from(2))));
    assert!(out.contains(&Expr::pow(base, Expr::from(3))));
    assert!(out.contains(&Expr::pow(var("x"), Expr::from(2))));
  }

  #[test]
  fn test_substitution_extracts_constant() {
    // sin(2x): u = 2x, du = 2 dx
    let expr = Expr::apply(ElementaryFunction::Sin, Expr::product(vec![Expr::from(2), var("x")]));
    let u = Var::fresh("u");
    let found = find_substitutions(&expr, &x(), &u);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].constant, Expr::from(number::ratio(1, 2)));
    assert_eq!(found[0].rewritten, Expr::apply(ElementaryFunction::Sin, Expr::from(u)));
  }

  #[test]
  fn test_substitution_rejects_leftover_symbol() {
    let expr = Expr::product(vec![var("x"), Expr::apply(ElementaryFunction::Exp, var("x"))]);
    assert!(find_substitutions(&expr, &x(), &Var::fresh("u")).is_empty());
  }
}
