use super::rule::{IntegralRule, IntegralKind, TrigForm};
use crate::expr::Expr;
use crate::expr::atom::Atom;
use crate::expr::var::Var;
use crate::expr::number::{self, Number};
use crate::expr::arithmetic::ArithExpr;
use crate::expr::calculus::InProgress;
use crate::expr::function::ElementaryFunction;
use crate::expr::algebra::expand::expand;
use crate::expr::algebra::split::{as_base_exp, as_coeff_mul, as_independent, terms};
use crate::expr::simplifier::simplify;

use crate::steps::rename::RuleTree;

use num::{One, Signed};
use tracing::debug;

use std::collections::HashMap;

/// Builds the rule tree explaining the antiderivative of `expr` with
/// respect to `symbol`. Never fails: integrands with no manual
/// derivation become [`IntegralKind::Unknown`].
///
/// Every integrand being selected is recorded in `in_progress` for the
/// duration of its selection. Asking for one which is already there
/// (directly or through the integration oracle) yields `Unknown`.
pub fn select(expr: &Expr, symbol: &Var, in_progress: &mut InProgress) -> IntegralRule {
  IntegralSelector::default().select(expr, symbol, in_progress)
}

/// Per-request selection state.
#[derive(Debug, Default)]
pub(super) struct IntegralSelector {
  /// How often each trig or exponential `u` has been chosen for
  /// integration by parts.
  pub(super) parts_u_uses: HashMap<Expr, usize>,
}

impl IntegralSelector {
  pub(super) fn select(&mut self, expr: &Expr, symbol: &Var, in_progress: &mut InProgress) -> IntegralRule {
    if in_progress.contains(expr, symbol) {
      debug!(%expr, "integrand is already being selected");
      return IntegralRule::unknown(expr.clone(), symbol.clone());
    }
    in_progress.scoped(expr, symbol, |in_progress| Some(self.select_unguarded(expr, symbol, in_progress)))
      .unwrap_or_else(|| IntegralRule::unknown(expr.clone(), symbol.clone()))
  }

  /// Selects a rule for `expr` without consulting or updating the
  /// in-progress set for `expr` itself.
  pub(super) fn select_unguarded(&mut self, expr: &Expr, symbol: &Var, in_progress: &mut InProgress) -> IntegralRule {
    let rule = self.select_by_shape(expr, symbol, in_progress)
      .or_else(|| self.select_by_search(expr, symbol, in_progress))
      .unwrap_or_else(|| IntegralRule::unknown(expr.clone(), symbol.clone()));
    debug!(%expr, rule = rule.kind.name(), "selected integral rule");
    rule
  }

  /// The rules which apply to one particular shape of integrand.
  fn select_by_shape(&mut self, expr: &Expr, symbol: &Var, in_progress: &mut InProgress) -> Option<IntegralRule> {
    let rule = |kind| IntegralRule::new(expr.clone(), symbol.clone(), kind);
    if !expr.contains_var(symbol) {
      return Some(rule(IntegralKind::Constant { constant: expr.clone() }));
    }
    match expr {
      Expr::Atom(Atom::Var(_)) => self.power_rule(expr, symbol),
      Expr::Atom(_) => None,
      Expr::Call(name, args) => match (name.as_str(), args.as_slice()) {
        ("^", [_, _]) => {
          self.power_rule(expr, symbol)
            .or_else(|| self.trig_power_rule(expr, symbol))
            .or_else(|| self.arctan_rule(expr, symbol))
        }
        ("+", _) => {
          let substeps = terms(expr).iter().map(|t| self.select(t, symbol, in_progress)).collect();
          Some(rule(IntegralKind::Add { substeps }))
        }
        ("*", _) => {
          self.constant_times_rule(expr, symbol, in_progress)
            .or_else(|| self.trig_product_rule(expr, symbol))
        }
        (name, [arg]) => {
          let f = ElementaryFunction::from_name(name)?;
          match f {
            ElementaryFunction::Exp if arg.is_var(symbol) => {
              Some(rule(IntegralKind::Exp { base: Expr::e(), exp: arg.clone() }))
            }
            ElementaryFunction::Sqrt => {
              let rewritten = Expr::pow(arg.clone(), Expr::from(number::ratio(1, 2)));
              Some(self.rewrite(expr, symbol, rewritten, in_progress))
            }
            f if f.is_trigonometric() => self.trig_rule(expr, symbol, f, arg, in_progress),
            _ => None,
          }
        }
        _ => None,
      },
    }
  }

  /// Every general technique which succeeds, as an `Alternative` if
  /// there is more than one.
  fn select_by_search(&mut self, expr: &Expr, symbol: &Var, in_progress: &mut InProgress) -> Option<IntegralRule> {
    let attempts = [
      self.reciprocal_trig_rule(expr, symbol, in_progress),
      self.substitution_rule(expr, symbol, in_progress),
      self.parts_rule(expr, symbol, in_progress),
      self.expand_rule(expr, symbol, in_progress),
    ];
    let mut found: Vec<IntegralRule> = Vec::new();
    for rule in attempts.into_iter().flatten() {
      if !rule.is_unknown() && !found.contains(&rule) {
        found.push(rule);
      }
    }
    if found.len() > 1 {
      let doable: Vec<_> = found.iter().filter(|r| !r.contains_unknown()).cloned().collect();
      if !doable.is_empty() {
        found = doable;
      }
    }
    match found.len() {
      0 => None,
      1 => found.pop(),
      _ => Some(IntegralRule::new(expr.clone(), symbol.clone(), IntegralKind::Alternative { alternatives: found })),
    }
  }

  pub(super) fn rewrite(&mut self, expr: &Expr, symbol: &Var, rewritten: Expr, in_progress: &mut InProgress) -> IntegralRule {
    let substep = self.select(&rewritten, symbol, in_progress);
    IntegralRule::new(expr.clone(), symbol.clone(), IntegralKind::Rewrite { rewritten, substep: Box::new(substep) })
  }

  fn power_rule(&self, expr: &Expr, symbol: &Var) -> Option<IntegralRule> {
    let (base, exp) = as_base_exp(expr);
    let kind = if base.is_var(symbol) && !exp.contains_var(symbol) {
      if exp.as_number().map_or(false, number::is_minus_one) {
        IntegralKind::Reciprocal { func: base }
      } else {
        IntegralKind::Power { base, exp }
      }
    } else if exp.is_var(symbol) && !base.contains_var(symbol) {
      IntegralKind::Exp { base, exp }
    } else {
      return None;
    };
    Some(IntegralRule::new(expr.clone(), symbol.clone(), kind))
  }

  /// `sec(x)^2` and `csc(x)^2`.
  fn trig_power_rule(&self, expr: &Expr, symbol: &Var) -> Option<IntegralRule> {
    let (base, exp) = as_base_exp(expr);
    if exp != Expr::from(2) {
      return None;
    }
    let x = Expr::from(symbol.clone());
    let form = if base.as_unary(ElementaryFunction::Sec) == Some(&x) {
      TrigForm::SecSquared
    } else if base.as_unary(ElementaryFunction::Csc) == Some(&x) {
      TrigForm::CscSquared
    } else {
      return None;
    };
    Some(IntegralRule::new(expr.clone(), symbol.clone(), IntegralKind::Trig { form, arg: x }))
  }

  /// `1 / (c x^2 + d)` for positive numbers `c` and `d`. Anything but
  /// `1 / (x^2 + 1)` is reduced to it by pulling out `1/d` and
  /// substituting `u = sqrt(c/d) x`.
  fn arctan_rule(&self, expr: &Expr, symbol: &Var) -> Option<IntegralRule> {
    let (base, exp) = as_base_exp(expr);
    if exp != Expr::minus_one() {
      return None;
    }
    let (c, d) = quadratic_coefficients(&base, symbol)?;
    let x = Expr::from(symbol.clone());
    if c.is_one() && d.is_one() {
      return Some(IntegralRule::new(expr.clone(), symbol.clone(), IntegralKind::Arctan));
    }
    let k = &c / &d;
    let normalized = |var: Expr, k: &Number| {
      let square = Expr::pow(var, Expr::from(2));
      let square = if k.is_one() { square } else { Expr::product(vec![Expr::from(k.clone()), square]) };
      simplify(Expr::pow(Expr::sum(vec![square, Expr::one()]), Expr::minus_one()))
    };
    let other = normalized(x.clone(), &k);
    let substep = if k.is_one() {
      IntegralRule::new(other.clone(), symbol.clone(), IntegralKind::Arctan)
    } else {
      let u = Var::fresh("u");
      let sqrt_k = simplify(Expr::pow(Expr::from(k.clone()), Expr::from(number::ratio(1, 2))));
      let constant = simplify(ArithExpr::from(sqrt_k.clone()).recip().into());
      let arctan = normalized(Expr::from(u.clone()), &Number::one());
      let inner = IntegralRule::new(
        simplify(Expr::product(vec![constant.clone(), arctan.clone()])),
        u.clone(),
        IntegralKind::ConstantTimes {
          constant: constant.clone(),
          other: arctan.clone(),
          substep: Box::new(IntegralRule::new(arctan, u.clone(), IntegralKind::Arctan)),
        },
      );
      IntegralRule::new(other.clone(), symbol.clone(), IntegralKind::USub {
        u_var: u,
        u_func: simplify(Expr::product(vec![sqrt_k, x])),
        constant,
        substep: Box::new(inner),
      })
    };
    let constant = Expr::from(d.recip());
    Some(IntegralRule::new(expr.clone(), symbol.clone(), IntegralKind::ConstantTimes {
      constant,
      other,
      substep: Box::new(substep),
    }))
  }

  fn constant_times_rule(&mut self, expr: &Expr, symbol: &Var, in_progress: &mut InProgress) -> Option<IntegralRule> {
    let (coeff, f) = as_independent(expr, symbol);
    if coeff.is_one() {
      return None;
    }
    let substep = self.select(&f, symbol, in_progress);
    Some(IntegralRule::new(expr.clone(), symbol.clone(), IntegralKind::ConstantTimes {
      constant: coeff,
      other: f,
      substep: Box::new(substep),
    }))
  }

  /// Constant multiples of `sec(x) tan(x)` and `csc(x) cot(x)`.
  fn trig_product_rule(&self, expr: &Expr, symbol: &Var) -> Option<IntegralRule> {
    let x = Expr::from(symbol.clone());
    let pairs = [
      (TrigForm::SecTan, ElementaryFunction::Sec, ElementaryFunction::Tan),
      (TrigForm::CscCot, ElementaryFunction::Csc, ElementaryFunction::Cot),
    ];
    for (form, f, g) in pairs {
      let product = Expr::product(vec![Expr::apply(f, x.clone()), Expr::apply(g, x.clone())]);
      let quotient = simplify((ArithExpr::from(expr.clone()) / ArithExpr::from(product.clone())).into());
      if quotient.contains_var(symbol) {
        continue;
      }
      let rule = IntegralRule::new(product.clone(), symbol.clone(), IntegralKind::Trig { form, arg: x.clone() });
      if quotient.is_one() {
        return Some(IntegralRule { context: expr.clone(), ..rule });
      }
      return Some(IntegralRule::new(expr.clone(), symbol.clone(), IntegralKind::ConstantTimes {
        constant: quotient,
        other: product,
        substep: Box::new(rule),
      }));
    }
    None
  }

  /// `sin` and `cos` of the symbol are table entries. The other four
  /// are rewritten in terms of functions with table entries.
  fn trig_rule(
    &mut self,
    expr: &Expr,
    symbol: &Var,
    f: ElementaryFunction,
    arg: &Expr,
    in_progress: &mut InProgress,
  ) -> Option<IntegralRule> {
    use ElementaryFunction::*;
    let call = |g: ElementaryFunction| Expr::apply(g, arg.clone());
    let recip = |e: Expr| Expr::pow(e, Expr::minus_one());
    let square = |e: Expr| Expr::pow(e, Expr::from(2));
    let rewritten = match f {
      Sin | Cos => {
        if !arg.is_var(symbol) {
          return None;
        }
        let form = if f == Sin { TrigForm::Sin } else { TrigForm::Cos };
        return Some(IntegralRule::new(expr.clone(), symbol.clone(), IntegralKind::Trig { form, arg: arg.clone() }));
      }
      Tan => Expr::product(vec![call(Sin), recip(call(Cos))]),
      Cot => Expr::product(vec![call(Cos), recip(call(Sin))]),
      Sec => Expr::product(vec![
        Expr::sum(vec![square(call(Sec)), Expr::product(vec![call(Sec), call(Tan)])]),
        recip(Expr::sum(vec![call(Sec), call(Tan)])),
      ]),
      Csc => Expr::product(vec![
        Expr::sum(vec![square(call(Csc)), Expr::product(vec![call(Csc), call(Cot)])]),
        recip(Expr::sum(vec![call(Csc), call(Cot)])),
      ]),
      _ => return None,
    };
    Some(self.rewrite(expr, symbol, simplify(rewritten), in_progress))
  }

  /// `1/cos(x)` and `1/sin(x)` become `sec(x)` and `csc(x)`.
  fn reciprocal_trig_rule(&mut self, expr: &Expr, symbol: &Var, in_progress: &mut InProgress) -> Option<IntegralRule> {
    let (base, exp) = as_base_exp(expr);
    if exp != Expr::minus_one() {
      return None;
    }
    let x = Expr::from(symbol.clone());
    let rewritten = if base.as_unary(ElementaryFunction::Cos) == Some(&x) {
      Expr::apply(ElementaryFunction::Sec, x)
    } else if base.as_unary(ElementaryFunction::Sin) == Some(&x) {
      Expr::apply(ElementaryFunction::Csc, x)
    } else {
      return None;
    };
    Some(self.rewrite(expr, symbol, rewritten, in_progress))
  }

  /// Products and powers whose expansion is a different expression.
  fn expand_rule(&mut self, expr: &Expr, symbol: &Var, in_progress: &mut InProgress) -> Option<IntegralRule> {
    if expr.as_call_named("*").is_none() && expr.as_call_named("^").is_none() {
      return None;
    }
    let expanded = expand(expr.clone());
    if expanded == *expr {
      return None;
    }
    Some(self.rewrite(expr, symbol, expanded, in_progress))
  }
}

/// If `expr` is `c*x^2 + d` for positive numbers `c` and `d`, returns
/// `(c, d)`.
fn quadratic_coefficients(expr: &Expr, symbol: &Var) -> Option<(Number, Number)> {
  let [first, second] = expr.as_call_named("+")? else { return None };
  let square = Expr::pow(Expr::from(symbol.clone()), Expr::from(2));
  let (constant, quadratic) = match (first.as_number(), second.as_number()) {
    (Some(d), None) => (d, second),
    (None, Some(d)) => (d, first),
    _ => return None,
  };
  let (c, rest) = as_coeff_mul(quadratic);
  (rest == square && c.is_positive() && constant.is_positive()).then(|| (c, constant.clone()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use super::super::eval::evaluate;
  use crate::expr::calculus::differentiate;
  use crate::expr::numeric::evaluate_at;

  use approx::assert_abs_diff_eq;

  fn var(name: &str) -> Expr {
    Expr::var(name).unwrap()
  }

  fn x() -> Var {
    Var::new("x").unwrap()
  }

  fn call(name: &str, arg: Expr) -> Expr {
    Expr::call(name, vec![arg])
  }

  fn select_simplified(expr: Expr) -> IntegralRule {
    select(&simplify(expr), &x(), &mut InProgress::new())
  }

  /// Checks that the rule's value differentiates back to its context.
  fn assert_sound(rule: &IntegralRule) {
    assert!(!rule.contains_unknown(), "unexpected Unknown in {rule:?}");
    let result = evaluate(rule, &mut InProgress::new());
    let derivative = differentiate(&result, &x());
    for point in [0.3, 0.7, 1.1] {
      assert_abs_diff_eq!(
        evaluate_at(&derivative, "x", point).unwrap(),
        evaluate_at(&rule.context, "x", point).unwrap(),
        epsilon = 1e-8,
      );
    }
  }

  #[test]
  fn test_table_shapes() {
    assert_eq!(select_simplified(Expr::from(5)).kind.name(), "Constant");
    assert_eq!(select_simplified(var("x")).kind.name(), "Power");
    assert_eq!(select_simplified(Expr::pow(var("x"), Expr::minus_one())).kind.name(), "Reciprocal");
    assert_eq!(select_simplified(call("exp", var("x"))).kind.name(), "Exp");
    assert_eq!(select_simplified(Expr::pow(Expr::from(2), var("x"))).kind.name(), "Exp");
    assert_eq!(select_simplified(call("sin", var("x"))).kind.name(), "Trig");
    assert_eq!(select_simplified(Expr::pow(call("sec", var("x")), Expr::from(2))).kind.name(), "Trig");
    let arctan = Expr::pow(Expr::sum(vec![Expr::pow(var("x"), Expr::from(2)), Expr::one()]), Expr::minus_one());
    assert_eq!(select_simplified(arctan).kind.name(), "Arctan");
  }

  #[test]
  fn test_table_shapes_are_sound() {
    for expr in [
      Expr::pow(var("x"), Expr::from(3)),
      Expr::pow(Expr::from(2), var("x")),
      call("cos", var("x")),
      Expr::product(vec![call("csc", var("x")), call("cot", var("x"))]),
      Expr::pow(call("csc", var("x")), Expr::from(2)),
    ] {
      assert_sound(&select_simplified(expr));
    }
  }

  #[test]
  fn test_general_arctan_form() {
    let expr = Expr::pow(
      Expr::sum(vec![Expr::product(vec![Expr::from(4), Expr::pow(var("x"), Expr::from(2))]), Expr::from(9)]),
      Expr::minus_one(),
    );
    let rule = select_simplified(expr);
    assert_eq!(rule.kind.name(), "ConstantTimes");
    assert!(rule.find("USub").is_some());
    assert!(rule.find("Arctan").is_some());
    assert_sound(&rule);
  }

  #[test]
  fn test_substitution() {
    // sin(2x) and 2x cos(x^2)
    let rule = select_simplified(call("sin", Expr::product(vec![Expr::from(2), var("x")])));
    assert!(rule.find("USub").is_some());
    assert_sound(&rule);
    let expr = Expr::product(vec![Expr::from(2), var("x"), call("cos", Expr::pow(var("x"), Expr::from(2)))]);
    let rule = select_simplified(expr);
    assert!(rule.find("USub").is_some());
    assert_sound(&rule);
  }

  #[test]
  fn test_trig_rewrites() {
    for name in ["tan", "cot", "sec"] {
      let rule = select_simplified(call(name, var("x")));
      assert_eq!(rule.kind.name(), "Rewrite", "{name}");
      assert_sound(&rule);
    }
  }

  #[test]
  fn test_parts_with_polynomial_u() {
    let expr = Expr::product(vec![Expr::pow(var("x"), Expr::from(2)), call("exp", var("x"))]);
    let rule = select_simplified(expr);
    assert_eq!(rule.kind.name(), "Parts");
    assert_sound(&rule);
  }

  #[test]
  fn test_log_by_parts() {
    let rule = select_simplified(call("log", var("x")));
    match &rule.kind {
      IntegralKind::Parts { u, dv, .. } => {
        assert_eq!(*u, call("log", var("x")));
        assert_eq!(*dv, Expr::one());
      }
      other => panic!("expected parts, got {other:?}"),
    }
    assert_sound(&rule);
  }

  #[test]
  fn test_atan_by_parts() {
    let rule = select_simplified(call("atan", var("x")));
    assert_eq!(rule.kind.name(), "Parts");
    assert_sound(&rule);
  }

  #[test]
  fn test_expansion_alternative() {
    let expr = Expr::pow(Expr::sum(vec![var("x"), Expr::one()]), Expr::from(2));
    let rule = select_simplified(expr);
    assert_eq!(rule.kind.name(), "Alternative");
    assert_sound(&rule);
  }

  #[test]
  fn test_in_progress_integrand_is_unknown() {
    let expr = call("sin", var("x"));
    let mut in_progress = InProgress::new();
    let rule = in_progress.scoped(&expr, &x(), |ip| Some(select(&expr, &x(), ip)));
    assert_eq!(rule.map(|r| r.is_unknown()), Some(true));
  }

  #[test]
  fn test_no_manual_derivation() {
    let rule = select_simplified(call("exp", Expr::pow(var("x"), Expr::from(2))));
    assert!(rule.is_unknown());
  }
}
