use super::guard::InProgress;
use super::derivative::differentiate;
use crate::expr::Expr;
use crate::expr::var::Var;
use crate::expr::number;
use crate::expr::arithmetic::ArithExpr;
use crate::expr::function::ElementaryFunction;
use crate::expr::algebra::split::{as_coeff_mul, as_independent};
use crate::expr::algebra::expand::expand;
use crate::expr::simplifier::simplify;

use num::Signed;
use num::pow::Pow;
use tracing::trace;

/// A fallback strategy consulted by the [`IntegrationEngine`] when
/// none of its own rules apply.
///
/// Implementations receive the in-progress set so that any nested
/// integration they perform is guarded against re-entering the same
/// integrand.
pub trait IntegrationHeuristic {
  fn integrate(&self, expr: &Expr, var: &Var, in_progress: &mut InProgress) -> Option<Expr>;
}

/// A small automatic integrator: constants, linearity, a table of
/// elementary antiderivatives (also for linear arguments), and one
/// retry after expansion. Everything else is delegated to the
/// optional heuristic.
pub struct IntegrationEngine<'a> {
  target_variable: Var,
  heuristic: Option<&'a dyn IntegrationHeuristic>,
}

impl<'a> IntegrationEngine<'a> {
  pub fn new(target_variable: Var, heuristic: Option<&'a dyn IntegrationHeuristic>) -> Self {
    Self { target_variable, heuristic }
  }

  pub fn integrate(&self, expr: &Expr, in_progress: &mut InProgress) -> Option<Expr> {
    let x = &self.target_variable;
    if !expr.contains_var(x) {
      return Some(Expr::product(vec![expr.clone(), Expr::from(x.clone())]));
    }
    if let Some(terms) = expr.as_call_named("+") {
      let integrals = terms.iter()
        .map(|t| self.integrate(t, in_progress))
        .collect::<Option<Vec<_>>>()?;
      return Some(Expr::sum(integrals));
    }
    let (coeff, dependent) = as_independent(expr, x);
    if !coeff.is_one() {
      let integral = self.integrate(&dependent, in_progress)?;
      return Some(Expr::product(vec![coeff, integral]));
    }
    if let Some(result) = self.table(expr) {
      return Some(result);
    }
    let expanded = expand(expr.clone());
    if expanded != *expr {
      return self.integrate(&expanded, in_progress);
    }
    let heuristic = self.heuristic?;
    trace!(%expr, "no table entry, consulting heuristic");
    in_progress.scoped(expr, x, |in_progress| heuristic.integrate(expr, x, in_progress))
  }

  fn table(&self, expr: &Expr) -> Option<Expr> {
    use ElementaryFunction::*;
    let x = &self.target_variable;
    if expr.is_var(x) {
      let square = ArithExpr::from(expr.clone()).pow(ArithExpr::from(2));
      return Some((square * ArithExpr::from(number::ratio(1, 2))).into());
    }
    if let Some([base, exp]) = expr.as_call_named("^") {
      return self.power_table(base, exp);
    }
    if let Some(args) = expr.as_call_named("*") {
      return self.product_table(args);
    }
    let ElementaryCallRef { function, arg } = ElementaryCallRef::of(expr)?;
    let slope = linear_slope(arg, x)?;
    let a = ArithExpr::from(arg.clone());
    let call = |f: ElementaryFunction, e: ArithExpr| ArithExpr::call(f.name(), vec![e]);
    let log = |e: ArithExpr| ArithExpr::call("log", vec![e]);
    let antiderivative = match function {
      Exp => call(Exp, a),
      Sin => -call(Cos, a),
      Cos => call(Sin, a),
      Tan => -log(call(Cos, a)),
      Cot => log(call(Sin, a)),
      Sec => log(call(Sec, a.clone()) + call(Tan, a)),
      Csc => -log(call(Csc, a.clone()) + call(Cot, a)),
      Log => a.clone() * log(a.clone()) - a,
      Atan => a.clone() * call(Atan, a.clone()) - log(ArithExpr::from(1) + a.pow(ArithExpr::from(2))) * ArithExpr::from(number::ratio(1, 2)),
      Asin | Acos | Sqrt => return None,
    };
    Some((antiderivative / ArithExpr::from(slope)).into())
  }

  fn power_table(&self, base: &Expr, exp: &Expr) -> Option<Expr> {
    let x = &self.target_variable;
    let b = ArithExpr::from(base.clone());
    let e = ArithExpr::from(exp.clone());
    if !exp.contains_var(x) {
      if let Some(slope) = linear_slope(base, x) {
        let slope = ArithExpr::from(slope);
        if exp.as_number().map_or(false, number::is_minus_one) {
          return Some((ArithExpr::call("log", vec![base.clone()]) / slope).into());
        }
        let e1 = e + ArithExpr::from(1);
        return Some((b.pow(e1.clone()) / (e1 * slope)).into());
      }
      if exp.as_number().map_or(false, number::is_minus_one) {
        return self.arctan_table(base);
      }
      if exp.as_number().and_then(number::to_i64) == Some(2) {
        let call = ElementaryCallRef::of(base)?;
        let slope = ArithExpr::from(linear_slope(call.arg, x)?);
        let a = ArithExpr::from(call.arg.clone());
        return match call.function {
          ElementaryFunction::Sec => Some((ArithExpr::call("tan", vec![a]) / slope).into()),
          ElementaryFunction::Csc => Some((-ArithExpr::call("cot", vec![a]) / slope).into()),
          _ => None,
        };
      }
      return None;
    }
    if !base.contains_var(x) {
      let slope = ArithExpr::from(linear_slope(exp, x)?);
      let log_b = ArithExpr::call("log", vec![base.clone()]);
      return Some((b.pow(e) / (log_b * slope)).into());
    }
    None
  }

  /// `1 / (c*x^2 + d)` with positive numbers `c`, `d`.
  fn arctan_table(&self, denominator: &Expr) -> Option<Expr> {
    let x = &self.target_variable;
    let [t1, t2] = denominator.as_call_named("+")? else { return None };
    let (quadratic, constant) = if t1.is_number() { (t2, t1) } else { (t1, t2) };
    let d = constant.as_number()?;
    let (c, rest) = as_coeff_mul(quadratic);
    if rest != Expr::pow(Expr::from(x.clone()), Expr::from(2)) || !c.is_positive() || !d.is_positive() {
      return None;
    }
    let half_power = |n: number::Number| ArithExpr::from(n).pow(ArithExpr::from(number::ratio(1, 2)));
    let scale = half_power(c.clone() / d);
    let norm = half_power(c * d);
    let arg = scale * ArithExpr::from(Expr::from(x.clone()));
    Some((ArithExpr::call("atan", vec![arg]) / norm).into())
  }

  fn product_table(&self, args: &[Expr]) -> Option<Expr> {
    use ElementaryFunction::*;
    let x = &self.target_variable;
    let [f, g] = args else { return None };
    let (f, g) = (ElementaryCallRef::of(f)?, ElementaryCallRef::of(g)?);
    if f.arg != g.arg {
      return None;
    }
    let slope = ArithExpr::from(linear_slope(f.arg, x)?);
    let a = ArithExpr::from(f.arg.clone());
    let result = match (f.function, g.function) {
      (Sec, Tan) | (Tan, Sec) => ArithExpr::call("sec", vec![a]),
      (Csc, Cot) | (Cot, Csc) => -ArithExpr::call("csc", vec![a]),
      _ => return None,
    };
    Some((result / slope).into())
  }
}

/// A borrowed view of a one-argument elementary function call.
struct ElementaryCallRef<'e> {
  function: ElementaryFunction,
  arg: &'e Expr,
}

impl<'e> ElementaryCallRef<'e> {
  fn of(expr: &'e Expr) -> Option<Self> {
    let Expr::Call(name, args) = expr else { return None };
    let function = ElementaryFunction::from_name(name)?;
    match args.as_slice() {
      [arg] => Some(Self { function, arg }),
      _ => None,
    }
  }
}

/// If `expr` is a linear function `a*x + b` of `var`, returns the
/// nonzero slope `a`.
pub fn linear_slope(expr: &Expr, var: &Var) -> Option<Expr> {
  let slope = differentiate(expr, var);
  if slope.contains_var(var) || slope.is_zero() {
    None
  } else {
    Some(slope)
  }
}

/// Integrates `expr` with respect to `var`. Returns `None` if no
/// antiderivative can be found.
///
/// If a heuristic is given, it is consulted last, with `(expr, var)`
/// marked in `in_progress` for the duration of the call.
pub fn integrate(
  expr: &Expr,
  var: &Var,
  in_progress: &mut InProgress,
  heuristic: Option<&dyn IntegrationHeuristic>,
) -> Option<Expr> {
  let engine = IntegrationEngine::new(var.clone(), heuristic);
  engine.integrate(&simplify(expr.clone()), in_progress).map(simplify)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::expr::calculus::differentiate;
  use crate::expr::numeric::evaluate_at;

  use approx::assert_abs_diff_eq;

  fn var(name: &str) -> Expr {
    Expr::var(name).unwrap()
  }

  fn x() -> Var {
    Var::new("x").unwrap()
  }

  /// Checks that `d/dx result == integrand` at a few sample points.
  fn assert_antiderivative(integrand: &Expr, result: &Expr) {
    let derivative = differentiate(result, &x());
    for point in [0.2, 0.5, 0.9, 1.3] {
      assert_abs_diff_eq!(
        evaluate_at(&derivative, "x", point).unwrap(),
        evaluate_at(integrand, "x", point).unwrap(),
        epsilon = 1e-9,
      );
    }
  }

  fn check(integrand: Expr) {
    let result = integrate(&integrand, &x(), &mut InProgress::new(), None)
      .unwrap_or_else(|| panic!("no antiderivative for {integrand}"));
    assert_antiderivative(&integrand, &result);
  }

  #[test]
  fn test_polynomials() {
    check(Expr::from(3));
    check(var("x"));
    check(Expr::sum(vec![
      Expr::product(vec![Expr::from(3), Expr::pow(var("x"), Expr::from(2))]),
      Expr::product(vec![Expr::from(-2), var("x")]),
      Expr::from(5),
    ]));
    check(Expr::pow(var("x"), Expr::from(number::ratio(1, 2))));
  }

  #[test]
  fn test_reciprocal() {
    let result = integrate(&Expr::pow(var("x"), Expr::minus_one()), &x(), &mut InProgress::new(), None);
    assert_eq!(result, Some(Expr::call("log", vec![var("x")])));
  }

  #[test]
  fn test_linear_arguments() {
    let arg = Expr::sum(vec![Expr::product(vec![Expr::from(number::ratio(1, 2)), var("x")]), Expr::from(number::ratio(1, 10))]);
    for name in ["sin", "cos", "exp", "tan", "sec", "log"] {
      check(Expr::call(name, vec![arg.clone()]));
    }
    check(Expr::pow(arg, Expr::from(4)));
  }

  #[test]
  fn test_trig_products() {
    check(Expr::pow(Expr::call("sec", vec![var("x")]), Expr::from(2)));
    check(Expr::pow(Expr::call("csc", vec![var("x")]), Expr::from(2)));
    check(Expr::product(vec![Expr::call("sec", vec![var("x")]), Expr::call("tan", vec![var("x")])]));
  }

  #[test]
  fn test_arctan_form() {
    let integrand = Expr::pow(
      Expr::sum(vec![Expr::product(vec![Expr::from(4), Expr::pow(var("x"), Expr::from(2))]), Expr::from(9)]),
      Expr::minus_one(),
    );
    check(integrand);
  }

  #[test]
  fn test_expansion_retry() {
    check(Expr::product(vec![var("x"), Expr::sum(vec![var("x"), Expr::one()])]));
  }

  #[test]
  fn test_gives_up_without_heuristic() {
    let integrand = Expr::product(vec![var("x"), Expr::call("exp", vec![var("x")])]);
    assert_eq!(integrate(&integrand, &x(), &mut InProgress::new(), None), None);
  }

  struct AlwaysFails;

  impl IntegrationHeuristic for AlwaysFails {
    fn integrate(&self, expr: &Expr, var: &Var, in_progress: &mut InProgress) -> Option<Expr> {
      assert!(in_progress.contains(expr, var));
      // Re-entering on the same integrand must short-circuit.
      integrate(expr, var, in_progress, Some(self))
    }
  }

  #[test]
  fn test_heuristic_is_guarded() {
    let integrand = Expr::product(vec![var("x"), Expr::call("exp", vec![var("x")])]);
    assert_eq!(integrate(&integrand, &x(), &mut InProgress::new(), Some(&AlwaysFails)), None);
  }
}
