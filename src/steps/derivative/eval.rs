use super::rule::{DerivativeRule, DerivativeKind};
use crate::steps::printer::evaluated_alternative;
use crate::expr::Expr;
use crate::expr::var::Var;
use crate::expr::arithmetic::ArithExpr;
use crate::expr::calculus::differentiate;
use crate::expr::simplifier::simplify;
use crate::expr::substitute::{substitute_all, substitute_var};

use num::pow::Pow;

/// Computes the derivative a rule tree describes.
pub fn evaluate(rule: &DerivativeRule) -> Expr {
  use DerivativeKind::*;
  let result = match &rule.kind {
    Constant { .. } => return Expr::zero(),
    ConstantTimes { constant, substep, .. } => {
      ArithExpr::from(constant.clone()) * ArithExpr::from(evaluate(substep))
    }
    Add { substeps } => ArithExpr::sum(substeps.iter().map(evaluate).collect()),
    Mul { terms, substeps } => {
      let summands = substeps.iter().enumerate().map(|(i, substep)| {
        let mut factors = terms.clone();
        factors[i] = evaluate(substep);
        Expr::product(factors)
      }).collect();
      ArithExpr::sum(summands)
    }
    Div { numerator, denominator, numerstep, denomstep } => {
      let f = ArithExpr::from(numerator.clone());
      let g = ArithExpr::from(denominator.clone());
      let numer = g.clone() * ArithExpr::from(evaluate(numerstep)) - f * ArithExpr::from(evaluate(denomstep));
      numer / g.pow(ArithExpr::from(2))
    }
    Chain { substep, inner, u_var, innerstep } => {
      let outer = substitute_var(evaluate(substep), u_var, inner);
      ArithExpr::from(outer) * ArithExpr::from(evaluate(innerstep))
    }
    Alternative { alternatives } => {
      return match evaluated_alternative(alternatives) {
        Some(alternative) => evaluate(alternative),
        None => evaluate_table_rule(rule),
      };
    }
    Rewrite { substep, .. } => return evaluate(substep),
    Power { .. } | Trig { .. } | Exp { .. } | Log { .. } | OpaqueFunction | Unknown => {
      return evaluate_table_rule(rule);
    }
  };
  simplify(result.into())
}

/// Evaluates a one-step rule by asking the differentiation oracle.
///
/// Symbol-independent arguments of the outermost call are replaced by
/// placeholders before differentiating and substituted back after, so
/// the oracle only ever sees the bare one-step form `f(x, c, ...)`. If
/// a dependent argument is anything other than the bare symbol, the
/// rule is not a one-step form and the oracle gets the whole context.
fn evaluate_table_rule(rule: &DerivativeRule) -> Expr {
  let symbol = &rule.symbol;
  let Expr::Call(name, args) = &rule.context else {
    return differentiate(&rule.context, symbol);
  };
  let mut placeholders = Vec::new();
  let mut normalized = Vec::with_capacity(args.len());
  for arg in args {
    if !arg.contains_var(symbol) {
      let placeholder = Expr::from(Var::fresh("c"));
      placeholders.push((placeholder.clone(), arg.clone()));
      normalized.push(placeholder);
    } else if arg.is_var(symbol) {
      normalized.push(arg.clone());
    } else {
      return differentiate(&rule.context, symbol);
    }
  }
  let derivative = differentiate(&Expr::Call(name.clone(), normalized), symbol);
  simplify(substitute_all(derivative, &placeholders))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::expr::function::ElementaryFunction;
  use crate::expr::numeric::evaluate_at;

  use approx::assert_abs_diff_eq;

  fn var(name: &str) -> Expr {
    Expr::var(name).unwrap()
  }

  fn x() -> Var {
    Var::new("x").unwrap()
  }

  #[test]
  fn test_power_table_rule() {
    let context = Expr::pow(var("x"), Expr::from(3));
    let rule = DerivativeRule::new(context, x(), DerivativeKind::Power { base: var("x"), exp: Expr::from(3) });
    assert_eq!(evaluate(&rule), Expr::product(vec![Expr::from(3), Expr::pow(var("x"), Expr::from(2))]));
  }

  #[test]
  fn test_exponential_with_constant_base() {
    let context = Expr::pow(Expr::from(2), var("x"));
    let rule = DerivativeRule::new(context.clone(), x(), DerivativeKind::Exp { f: context.clone(), base: Expr::from(2) });
    let result = evaluate(&rule);
    assert!(!result.free_vars().iter().any(Var::is_fresh));
    let expected = 2f64.powf(0.5) * 2f64.ln();
    assert_abs_diff_eq!(evaluate_at(&result, "x", 0.5).unwrap(), expected, epsilon = 1e-9);
  }

  #[test]
  fn test_chain_substitutes_inner() {
    // d/dx sin(x^2), assembled by hand.
    let u = Var::fresh("u");
    let inner = Expr::pow(var("x"), Expr::from(2));
    let outer = DerivativeRule::new(
      Expr::apply(ElementaryFunction::Sin, Expr::from(u.clone())),
      u.clone(),
      DerivativeKind::Trig { function: ElementaryFunction::Sin },
    );
    let innerstep = DerivativeRule::new(inner.clone(), x(), DerivativeKind::Power { base: var("x"), exp: Expr::from(2) });
    let rule = DerivativeRule::new(
      Expr::apply(ElementaryFunction::Sin, inner.clone()),
      x(),
      DerivativeKind::Chain { substep: Box::new(outer), inner, u_var: u, innerstep: Box::new(innerstep) },
    );
    let result = evaluate(&rule);
    assert_abs_diff_eq!(evaluate_at(&result, "x", 0.8).unwrap(), 2.0 * 0.8 * (0.64f64).cos(), epsilon = 1e-9);
  }

  #[test]
  fn test_unknown_defers_to_oracle() {
    let context = Expr::pow(var("x"), var("x"));
    let rule = DerivativeRule::unknown(context.clone(), x());
    assert_eq!(evaluate(&rule), differentiate(&context, &x()));
  }
}
