use super::eval::evaluate;
use super::rule::{IntegralRule, IntegralKind, PartsStep};
use super::select::IntegralSelector;
use crate::expr::Expr;
use crate::expr::atom::Atom;
use crate::expr::var::Var;
use crate::expr::number::{self, Number};
use crate::expr::arithmetic::ArithExpr;
use crate::expr::calculus::{InProgress, differentiate};
use crate::expr::function::ElementaryFunction;
use crate::expr::function::flags::FunctionFlags;
use crate::expr::algebra::split::{as_coeff_mul, factors};
use crate::expr::simplifier::simplify;
use crate::steps::rename::RuleTree;

use num::One;
use tracing::trace;

/// How many times a trig or exponential factor may be chosen as `u`
/// during one request.
const MAX_U_USES: usize = 2;

/// Rounds of integration by parts tried while looking for the
/// integrand to repeat itself.
const MAX_CYCLIC_ROUNDS: usize = 4;

/// The LIATE order for choosing `u`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Liate {
  Logarithmic,
  InverseTrig,
  Algebraic,
  Trig,
  Exponential,
}

const LIATE_ORDER: [Liate; 5] = [
  Liate::Logarithmic,
  Liate::InverseTrig,
  Liate::Algebraic,
  Liate::Trig,
  Liate::Exponential,
];

/// One successful choice of `u` and `dv`.
#[derive(Debug, Clone)]
struct PartsChoice {
  u: Expr,
  dv: Expr,
  v: Expr,
  du: Expr,
  v_step: IntegralRule,
}

impl IntegralSelector {
  /// Integration by parts, for products and for lone logarithms and
  /// inverse trig functions (with `dv = 1`). Repeats the process while
  /// it makes progress, and recognizes when the integrand comes back as
  /// a constant multiple of itself.
  pub(super) fn parts_rule(&mut self, expr: &Expr, symbol: &Var, in_progress: &mut InProgress) -> Option<IntegralRule> {
    if expr.as_call_named("*").is_none() && !is_log_or_inverse_trig(expr) {
      return None;
    }
    let (constant, integrand) = as_coeff_mul(expr);
    let first = self.choose_parts(&integrand, symbol, in_progress)?;
    trace!(u = %first.u, dv = %first.dv, v = %first.v, du = %first.du, "integration by parts");
    if uses_are_limited(&first.u) {
      let uses = self.parts_u_uses.entry(first.u.clone()).or_default();
      if *uses >= MAX_U_USES {
        return None;
      }
      *uses += 1;
    }

    let mut steps = vec![first];
    for round in 0..MAX_CYCLIC_ROUNDS {
      let Some(last) = steps.last() else { break };
      let v_du = simplify((ArithExpr::from(last.v.clone()) * ArithExpr::from(last.du.clone())).into());
      trace!(round, %v_du, "looking for a cycle");
      let coefficient = simplify((ArithExpr::from(v_du.clone()) / ArithExpr::from(integrand.clone())).into());
      if coefficient.is_one() {
        break;
      }
      if !coefficient.contains_var(symbol) {
        let sign = if steps.len() % 2 == 0 { Expr::one() } else { Expr::minus_one() };
        let coefficient = simplify(Expr::product(vec![sign, coefficient]));
        let parts = steps.into_iter().map(|s| PartsStep { u: s.u, dv: s.dv, v_step: s.v_step }).collect();
        let rule = IntegralRule::new(integrand.clone(), symbol.clone(), IntegralKind::CyclicParts { parts, coefficient });
        return Some(with_constant(expr, constant, integrand, rule));
      }
      let (next_constant, next_integrand) = as_coeff_mul(&v_du);
      let Some(mut next) = self.choose_parts(&next_integrand, symbol, in_progress) else { break };
      let next_constant = Expr::from(next_constant);
      next.u = simplify(Expr::product(vec![next_constant.clone(), next.u]));
      next.du = simplify(Expr::product(vec![next_constant, next.du]));
      steps.push(next);
    }

    let rule = self.chain_parts(&integrand, symbol, &steps, in_progress);
    Some(with_constant(expr, constant, integrand, rule))
  }

  /// Nests `steps` into `Parts` rules, each one's second integral being
  /// the next. The last second integral gets a fresh selection.
  fn chain_parts(&mut self, integrand: &Expr, symbol: &Var, steps: &[PartsChoice], in_progress: &mut InProgress) -> IntegralRule {
    let Some((step, rest)) = steps.split_first() else {
      return self.select(integrand, symbol, in_progress);
    };
    let v_du = simplify((ArithExpr::from(step.v.clone()) * ArithExpr::from(step.du.clone())).into());
    let second_step = self.chain_parts(&v_du, symbol, rest, in_progress);
    IntegralRule::new(integrand.clone(), symbol.clone(), IntegralKind::Parts {
      u: step.u.clone(),
      dv: step.dv.clone(),
      v_step: Box::new(step.v_step.clone()),
      second_step: Box::new(second_step),
    })
  }

  /// Picks `u` by the LIATE order and makes sure `dv` can be
  /// integrated.
  fn choose_parts(&mut self, integrand: &Expr, symbol: &Var, in_progress: &mut InProgress) -> Option<PartsChoice> {
    let candidates = parts_factors(integrand);
    for (index, class) in LIATE_ORDER.iter().enumerate() {
      let Some((u, dv)) = pull_out(*class, &candidates, symbol) else { continue };
      if !u.contains_var(symbol) {
        return None;
      }
      if *class == Liate::Algebraic && !is_polynomial(&u, symbol) {
        return None;
      }
      if u.as_unary(ElementaryFunction::Log).is_some() {
        let recip = simplify(ArithExpr::from(dv.clone()).recip().into());
        if polynomial_degree(&recip, symbol) == Some(1) {
          return None;
        }
      }
      if !accepts(index, *class, &dv, &candidates, symbol) {
        continue;
      }
      let du = differentiate(&u, symbol);
      let v_step = self.select(&simplify(dv.clone()), symbol, in_progress);
      if v_step.contains_unknown() {
        return None;
      }
      let v = evaluate(&v_step, in_progress);
      return Some(PartsChoice { u, dv, v, du, v_step });
    }
    None
  }
}

fn with_constant(expr: &Expr, constant: Number, integrand: Expr, rule: IntegralRule) -> IntegralRule {
  if constant.is_one() {
    return rule;
  }
  IntegralRule::new(expr.clone(), rule.symbol.clone(), IntegralKind::ConstantTimes {
    constant: Expr::from(constant),
    other: integrand,
    substep: Box::new(rule),
  })
}

/// Candidate factors for `u`. A lone logarithm or inverse trig
/// function is its own single factor, with `dv = 1`.
fn parts_factors(integrand: &Expr) -> Vec<Expr> {
  if is_log_or_inverse_trig(integrand) {
    vec![integrand.clone()]
  } else if integrand.as_call_named("*").is_some() {
    factors(integrand)
  } else {
    Vec::new()
  }
}

/// The product of the factors belonging to `class` as `u`, and the
/// rest as `dv`.
fn pull_out(class: Liate, candidates: &[Expr], symbol: &Var) -> Option<(Expr, Expr)> {
  let (u, dv): (Vec<_>, Vec<_>) = candidates.iter().cloned().partition(|f| classify(f, symbol) == Some(class));
  if u.is_empty() {
    return None;
  }
  Some((Expr::product(u), simplify(Expr::product(dv))))
}

/// Whether `dv` is worth integrating once `u` has been chosen from
/// `class`.
fn accepts(index: usize, class: Liate, dv: &Expr, candidates: &[Expr], symbol: &Var) -> bool {
  if index < 2 {
    return true;
  }
  if class == Liate::Algebraic && factors(dv).iter().all(is_sin_cos_exp) {
    return true;
  }
  LIATE_ORDER[index + 1..].iter()
    .filter_map(|later| pull_out(*later, candidates, symbol))
    .any(|(later_u, _)| later_u == *dv)
}

fn classify(factor: &Expr, symbol: &Var) -> Option<Liate> {
  if is_algebraic(factor, symbol) {
    return Some(Liate::Algebraic);
  }
  let Expr::Call(name, args) = factor else { return None };
  let f = ElementaryFunction::from_name(name)?;
  if args.len() != 1 {
    return None;
  }
  let flags = f.flags();
  if flags.contains(FunctionFlags::LOGARITHMIC) {
    Some(Liate::Logarithmic)
  } else if flags.contains(FunctionFlags::INVERSE_TRIGONOMETRIC) {
    Some(Liate::InverseTrig)
  } else if matches!(f, ElementaryFunction::Sin | ElementaryFunction::Cos) {
    Some(Liate::Trig)
  } else if flags.contains(FunctionFlags::EXPONENTIAL) {
    Some(Liate::Exponential)
  } else {
    None
  }
}

fn is_log_or_inverse_trig(expr: &Expr) -> bool {
  let Expr::Call(name, args) = expr else { return false };
  args.len() == 1 && ElementaryFunction::from_name(name).map_or(false, |f| {
    f.flags().intersects(FunctionFlags::LOGARITHMIC | FunctionFlags::INVERSE_TRIGONOMETRIC)
  })
}

fn is_sin_cos_exp(expr: &Expr) -> bool {
  [ElementaryFunction::Sin, ElementaryFunction::Cos, ElementaryFunction::Exp].into_iter()
    .any(|f| expr.as_unary(f).is_some())
}

/// Trig and exponential choices of `u` can cycle forever.
fn uses_are_limited(u: &Expr) -> bool {
  is_sin_cos_exp(u)
}

/// Built from the symbol and constants using sums, products and
/// rational powers only.
fn is_algebraic(expr: &Expr, symbol: &Var) -> bool {
  if !expr.contains_var(symbol) {
    return true;
  }
  match expr {
    Expr::Atom(_) => true,
    Expr::Call(name, args) => match (name.as_str(), args.as_slice()) {
      ("+" | "*", _) => args.iter().all(|a| is_algebraic(a, symbol)),
      ("^", [base, exp]) => is_algebraic(base, symbol) && exp.as_number().is_some(),
      ("sqrt", [arg]) => is_algebraic(arg, symbol),
      _ => false,
    },
  }
}

fn is_polynomial(expr: &Expr, symbol: &Var) -> bool {
  polynomial_degree(expr, symbol).is_some()
}

/// The degree of `expr` as a polynomial in `symbol`, if it is one.
fn polynomial_degree(expr: &Expr, symbol: &Var) -> Option<i64> {
  if !expr.contains_var(symbol) {
    return Some(0);
  }
  match expr {
    Expr::Atom(Atom::Var(_)) => Some(1),
    Expr::Atom(_) => Some(0),
    Expr::Call(name, args) => match (name.as_str(), args.as_slice()) {
      ("+", _) => args.iter().map(|a| polynomial_degree(a, symbol)).try_fold(0, |acc, d| Some(acc.max(d?))),
      ("*", _) => args.iter().map(|a| polynomial_degree(a, symbol)).try_fold(0, |acc, d| Some(acc + d?)),
      ("^", [base, exp]) => {
        let n = exp.as_number().and_then(number::to_i64).filter(|n| *n >= 0)?;
        Some(polynomial_degree(base, symbol)? * n)
      }
      _ => None,
    },
  }
}
