use super::rule::{IntegralRule, IntegralKind, TrigForm};
use super::ManualIntegrator;
use crate::steps::printer::evaluated_alternative;
use crate::expr::Expr;
use crate::expr::arithmetic::ArithExpr;
use crate::expr::calculus::{InProgress, integrate};
use crate::expr::function::ElementaryFunction;
use crate::expr::simplifier::simplify;
use crate::expr::substitute::substitute_var;

use num::pow::Pow;

/// Computes the antiderivative a rule tree describes, without the
/// constant of integration.
///
/// `Unknown` leaves are handed to the integration oracle, with this
/// module's own rule selector as its fallback heuristic. The leaf's
/// integrand is marked in progress for the duration of the call, so the
/// heuristic is only ever consulted on strictly smaller pieces. An
/// integral the oracle cannot find stays in the result as an
/// unevaluated `integral` node.
pub fn evaluate(rule: &IntegralRule, in_progress: &mut InProgress) -> Expr {
  use IntegralKind::*;
  let x = ArithExpr::from(Expr::from(rule.symbol.clone()));
  let result = match &rule.kind {
    Constant { constant } => ArithExpr::from(constant.clone()) * x,
    ConstantTimes { constant, substep, .. } => {
      ArithExpr::from(constant.clone()) * ArithExpr::from(evaluate(substep, in_progress))
    }
    Power { base, exp } => {
      let exp = ArithExpr::from(exp.clone()) + ArithExpr::from(1);
      ArithExpr::from(base.clone()).pow(exp.clone()) / exp
    }
    Reciprocal { func } => ArithExpr::call(ElementaryFunction::Log.name(), vec![func.clone()]),
    Exp { base, exp } => {
      if *base == Expr::e() {
        ArithExpr::call(ElementaryFunction::Exp.name(), vec![exp.clone()])
      } else {
        let log = ArithExpr::call(ElementaryFunction::Log.name(), vec![base.clone()]);
        ArithExpr::from(base.clone()).pow(ArithExpr::from(exp.clone())) / log
      }
    }
    Trig { form, arg } => trig_antiderivative(*form, arg),
    Arctan => ArithExpr::call(ElementaryFunction::Atan.name(), vec![Expr::from(rule.symbol.clone())]),
    Add { substeps } => {
      ArithExpr::sum(substeps.iter().map(|s| evaluate(s, in_progress)).collect())
    }
    USub { u_var, u_func, substep, .. } => {
      ArithExpr::from(substitute_var(evaluate(substep, in_progress), u_var, u_func))
    }
    Parts { u, v_step, second_step, .. } => {
      let v = evaluate(v_step, in_progress);
      let second = evaluate(second_step, in_progress);
      ArithExpr::from(u.clone()) * ArithExpr::from(v) - ArithExpr::from(second)
    }
    CyclicParts { parts, coefficient } => {
      let mut summands = Vec::with_capacity(parts.len());
      let mut sign = ArithExpr::from(1);
      for step in parts {
        let v = evaluate(&step.v_step, in_progress);
        summands.push(Expr::from(sign.clone() * ArithExpr::from(step.u.clone()) * ArithExpr::from(v)));
        sign = -sign;
      }
      ArithExpr::sum(summands) / (ArithExpr::from(1) - ArithExpr::from(coefficient.clone()))
    }
    Alternative { alternatives } => {
      return match evaluated_alternative(alternatives) {
        Some(alternative) => evaluate(alternative, in_progress),
        None => evaluate_with_oracle(rule, in_progress),
      };
    }
    Rewrite { substep, .. } => return evaluate(substep, in_progress),
    Unknown => return evaluate_with_oracle(rule, in_progress),
  };
  simplify(result.into())
}

fn trig_antiderivative(form: TrigForm, arg: &Expr) -> ArithExpr {
  use ElementaryFunction::*;
  let call = |f: ElementaryFunction| ArithExpr::call(f.name(), vec![arg.clone()]);
  match form {
    TrigForm::Sin => -call(Cos),
    TrigForm::Cos => call(Sin),
    TrigForm::SecSquared => call(Tan),
    TrigForm::CscSquared => -call(Cot),
    TrigForm::SecTan => call(Sec),
    TrigForm::CscCot => -call(Csc),
  }
}

fn evaluate_with_oracle(rule: &IntegralRule, in_progress: &mut InProgress) -> Expr {
  let (context, symbol) = (&rule.context, &rule.symbol);
  in_progress.scoped(context, symbol, |in_progress| integrate(context, symbol, in_progress, Some(&ManualIntegrator)))
    .unwrap_or_else(|| Expr::integral(context.clone(), symbol.clone()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use super::super::rule::PartsStep;
  use crate::expr::var::Var;
  use crate::expr::numeric::evaluate_at;

  use approx::assert_abs_diff_eq;

  fn var(name: &str) -> Expr {
    Expr::var(name).unwrap()
  }

  fn x() -> Var {
    Var::new("x").unwrap()
  }

  fn exp_x() -> Expr {
    Expr::apply(ElementaryFunction::Exp, var("x"))
  }

  fn exp_rule() -> IntegralRule {
    IntegralRule::new(exp_x(), x(), IntegralKind::Exp { base: Expr::e(), exp: var("x") })
  }

  #[test]
  fn test_power_rule() {
    let context = Expr::pow(var("x"), Expr::from(2));
    let rule = IntegralRule::new(context, x(), IntegralKind::Power { base: var("x"), exp: Expr::from(2) });
    let result = evaluate(&rule, &mut InProgress::new());
    assert_abs_diff_eq!(evaluate_at(&result, "x", 3.0).unwrap(), 9.0, epsilon = 1e-9);
  }

  #[test]
  fn test_cyclic_parts_solves_for_integral() {
    // e^x sin(x), by parts twice.
    let sin = Expr::apply(ElementaryFunction::Sin, var("x"));
    let cos = Expr::apply(ElementaryFunction::Cos, var("x"));
    let context = Expr::product(vec![exp_x(), sin.clone()]);
    let rule = IntegralRule::new(context, x(), IntegralKind::CyclicParts {
      parts: vec![
        PartsStep { u: sin, dv: exp_x(), v_step: exp_rule() },
        PartsStep { u: cos, dv: exp_x(), v_step: exp_rule() },
      ],
      coefficient: Expr::minus_one(),
    });
    let result = evaluate(&rule, &mut InProgress::new());
    for point in [0.2f64, 1.1] {
      let expected = point.exp() * (point.sin() - point.cos()) / 2.0;
      assert_abs_diff_eq!(evaluate_at(&result, "x", point).unwrap(), expected, epsilon = 1e-9);
    }
  }

  #[test]
  fn test_unknown_without_antiderivative_stays_unevaluated() {
    let context = Expr::apply(ElementaryFunction::Exp, Expr::pow(var("x"), Expr::from(2)));
    let rule = IntegralRule::unknown(context.clone(), x());
    let result = evaluate(&rule, &mut InProgress::new());
    assert!(result.has_unevaluated_integral());
  }

  #[test]
  fn test_unknown_with_table_antiderivative() {
    let context = Expr::apply(ElementaryFunction::Cos, Expr::product(vec![Expr::from(3), var("x")]));
    let rule = IntegralRule::unknown(context, x());
    let result = evaluate(&rule, &mut InProgress::new());
    assert_abs_diff_eq!(evaluate_at(&result, "x", 0.4).unwrap(), (1.2f64).sin() / 3.0, epsilon = 1e-9);
  }
}
