use crate::expr::Expr;
use crate::expr::atom::Atom;
use crate::expr::var::Var;
use crate::expr::number;
use crate::expr::arithmetic::ArithExpr;
use crate::expr::function::{ElementaryFunction, is_opaque_function, derivative_name};
use crate::expr::simplifier::simplify;

use num::pow::Pow;

/// Symbolic differentiation with respect to one variable. The engine
/// is total: anything it cannot take apart is left as an unevaluated
/// `deriv(expr, var)` node.
#[derive(Debug)]
pub struct DerivativeEngine {
  target_variable: Var,
}

impl DerivativeEngine {
  pub fn new(target_variable: Var) -> Self {
    Self { target_variable }
  }

  pub fn differentiate(&self, expr: &Expr) -> Expr {
    if !expr.contains_var(&self.target_variable) {
      return Expr::zero();
    }
    match expr {
      Expr::Atom(Atom::Var(_)) => Expr::one(),
      Expr::Atom(_) => Expr::zero(),
      Expr::Call(function, args) => self.differentiate_call(expr, function, args),
    }
  }

  fn d(&self, expr: &Expr) -> ArithExpr {
    ArithExpr::from(self.differentiate(expr))
  }

  fn differentiate_call(&self, expr: &Expr, function: &str, args: &[Expr]) -> Expr {
    match (function, args) {
      ("+", args) => {
        ArithExpr::sum(args.iter().map(|arg| self.differentiate(arg)).collect()).into()
      }
      ("*", args) => {
        // Product rule, one summand per factor.
        let summands = (0..args.len()).map(|i| {
          let mut factors = args.to_vec();
          factors[i] = self.differentiate(&args[i]);
          Expr::product(factors)
        }).collect();
        Expr::sum(summands)
      }
      ("^", [base, exp]) => self.differentiate_power(base, exp),
      ("integral", [integrand, Expr::Atom(Atom::Var(v))]) if *v == self.target_variable => {
        integrand.clone()
      }
      ("log", [arg, base]) => {
        let rewritten = ArithExpr::call("log", vec![arg.clone()]) / ArithExpr::call("log", vec![base.clone()]);
        self.differentiate(rewritten.as_ref())
      }
      (name, [arg]) => {
        if let Some(f) = ElementaryFunction::from_name(name) {
          (ArithExpr::from(elementary_derivative(f, arg.clone())) * self.d(arg)).into()
        } else if is_opaque_function(name) {
          let outer = ArithExpr::call(&derivative_name(name), vec![arg.clone()]);
          (outer * self.d(arg)).into()
        } else {
          self.unevaluated(expr)
        }
      }
      _ => self.unevaluated(expr),
    }
  }

  fn differentiate_power(&self, base: &Expr, exp: &Expr) -> Expr {
    let x = &self.target_variable;
    let b = ArithExpr::from(base.clone());
    let e = ArithExpr::from(exp.clone());
    if !exp.contains_var(x) {
      // e * b^(e-1) * b'
      (e.clone() * b.pow(e - ArithExpr::from(1)) * self.d(base)).into()
    } else if !base.contains_var(x) {
      // b^e * log(b) * e'
      (b.clone().pow(e) * ArithExpr::call("log", vec![base.clone()]) * self.d(exp)).into()
    } else {
      // b^e * (e' log(b) + e b' / b)
      let log_b = ArithExpr::call("log", vec![base.clone()]);
      let inner = self.d(exp) * log_b + e.clone() * self.d(base) / b.clone();
      (b.pow(e) * inner).into()
    }
  }

  fn unevaluated(&self, expr: &Expr) -> Expr {
    Expr::derivative(expr.clone(), self.target_variable.clone())
  }
}

/// The derivative of the elementary function `f`, evaluated at `arg`.
pub fn elementary_derivative(f: ElementaryFunction, arg: Expr) -> Expr {
  use ElementaryFunction::*;
  let a = ArithExpr::from(arg.clone());
  let one = || ArithExpr::from(1);
  let call = |g: ElementaryFunction| ArithExpr::call(g.name(), vec![arg.clone()]);
  let result = match f {
    Sin => call(Cos),
    Cos => -call(Sin),
    Tan => call(Sec).pow(ArithExpr::from(2)),
    Cot => -call(Csc).pow(ArithExpr::from(2)),
    Sec => call(Sec) * call(Tan),
    Csc => -(call(Csc) * call(Cot)),
    Asin => (one() - a.pow(ArithExpr::from(2))).pow(ArithExpr::from(number::ratio(-1, 2))),
    Acos => -(one() - a.pow(ArithExpr::from(2))).pow(ArithExpr::from(number::ratio(-1, 2))),
    Atan => (one() + a.pow(ArithExpr::from(2))).recip(),
    Exp => call(Exp),
    Log => a.recip(),
    Sqrt => ArithExpr::from(number::ratio(1, 2)) * a.pow(ArithExpr::from(number::ratio(-1, 2))),
  };
  result.into()
}

/// Differentiates `expr` with respect to `var` and simplifies the
/// result.
pub fn differentiate(expr: &Expr, var: &Var) -> Expr {
  let engine = DerivativeEngine::new(var.clone());
  simplify(engine.differentiate(expr))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::expr::numeric::evaluate_at;

  use approx::assert_abs_diff_eq;

  fn var(name: &str) -> Expr {
    Expr::var(name).unwrap()
  }

  fn x() -> Var {
    Var::new("x").unwrap()
  }

  fn assert_same_function(actual: &Expr, expected: &Expr) {
    for point in [0.3, 0.7, 1.2, 2.1] {
      let a = evaluate_at(actual, "x", point).unwrap();
      let b = evaluate_at(expected, "x", point).unwrap();
      assert_abs_diff_eq!(a, b, epsilon = 1e-9);
    }
  }

  #[test]
  fn test_constants_and_variables() {
    assert_eq!(differentiate(&Expr::from(7), &x()), Expr::zero());
    assert_eq!(differentiate(&var("y"), &x()), Expr::zero());
    assert_eq!(differentiate(&var("x"), &x()), Expr::one());
  }

  #[test]
  fn test_power_rule() {
    let expr = Expr::pow(var("x"), Expr::from(3));
    assert_eq!(differentiate(&expr, &x()), Expr::product(vec![Expr::from(3), Expr::pow(var("x"), Expr::from(2))]));
  }

  #[test]
  fn test_chain_rule() {
    let expr = Expr::call("sin", vec![Expr::pow(var("x"), Expr::from(2))]);
    let expected = Expr::product(vec![
      Expr::from(2),
      var("x"),
      Expr::call("cos", vec![Expr::pow(var("x"), Expr::from(2))]),
    ]);
    assert_same_function(&differentiate(&expr, &x()), &expected);
  }

  #[test]
  fn test_exponential_base() {
    let expr = Expr::pow(Expr::from(2), var("x"));
    let expected = Expr::product(vec![Expr::pow(Expr::from(2), var("x")), Expr::call("log", vec![Expr::from(2)])]);
    assert_same_function(&differentiate(&expr, &x()), &expected);
  }

  #[test]
  fn test_variable_base_and_exponent() {
    // d/dx x^x = x^x (log(x) + 1)
    let expr = Expr::pow(var("x"), var("x"));
    let expected = Expr::product(vec![
      Expr::pow(var("x"), var("x")),
      Expr::sum(vec![Expr::call("log", vec![var("x")]), Expr::one()]),
    ]);
    assert_same_function(&differentiate(&expr, &x()), &expected);
  }

  #[test]
  fn test_trig_table() {
    for name in ["tan", "cot", "sec", "csc", "asin", "acos", "atan", "log", "sqrt"] {
      let expr = Expr::call(name, vec![var("x")]);
      let derivative = differentiate(&expr, &x());
      // Central difference check.
      for point in [0.3, 0.6] {
        let h = 1e-6;
        let numeric = (evaluate_at(&expr, "x", point + h).unwrap() - evaluate_at(&expr, "x", point - h).unwrap()) / (2.0 * h);
        assert_abs_diff_eq!(evaluate_at(&derivative, "x", point).unwrap(), numeric, epsilon = 1e-5);
      }
    }
  }

  #[test]
  fn test_opaque_function() {
    let expr = Expr::call("f", vec![var("x")]);
    assert_eq!(differentiate(&expr, &x()), Expr::call("f'", vec![var("x")]));
  }

  #[test]
  fn test_unknown_multiargument_function() {
    let expr = Expr::call("g", vec![var("x"), var("y")]);
    assert_eq!(differentiate(&expr, &x()), Expr::derivative(expr.clone(), x()));
  }

  #[test]
  fn test_fundamental_theorem() {
    let integrand = Expr::call("f", vec![var("x")]);
    assert_eq!(differentiate(&Expr::integral(integrand.clone(), x()), &x()), integrand);
  }
}
