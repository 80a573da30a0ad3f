//! Floating-point evaluation of expressions, used to spot-check
//! symbolic results.

use super::Expr;
use super::atom::Atom;
use super::var::Var;
use super::number;
use super::function::ElementaryFunction;

use std::collections::HashMap;

/// Evaluates `expr` with the given variable bindings. Returns `None`
/// if the expression mentions an unbound variable, an opaque
/// function, or an unevaluated derivative or integral.
pub fn evaluate(expr: &Expr, env: &HashMap<Var, f64>) -> Option<f64> {
  match expr {
    Expr::Atom(Atom::Number(n)) => number::to_f64(n),
    Expr::Atom(Atom::Constant(c)) => Some(c.to_f64()),
    Expr::Atom(Atom::Var(v)) => env.get(v).copied(),
    Expr::Call(name, args) => {
      let args = args.iter().map(|arg| evaluate(arg, env)).collect::<Option<Vec<_>>>()?;
      apply(name, &args)
    }
  }
}

/// Evaluates a function of the single variable `name` at `x`.
pub fn evaluate_at(expr: &Expr, name: &str, x: f64) -> Option<f64> {
  let var = Var::new(name)?;
  evaluate(expr, &HashMap::from([(var, x)]))
}

fn apply(name: &str, args: &[f64]) -> Option<f64> {
  match (name, args) {
    ("+", args) => Some(args.iter().sum()),
    ("*", args) => Some(args.iter().product()),
    ("^", [base, exp]) => Some(base.powf(*exp)),
    (name, [a, b]) if ElementaryFunction::from_name(name) == Some(ElementaryFunction::Log) => Some(a.ln() / b.ln()),
    (name, [a]) => {
      use ElementaryFunction::*;
      let value = match ElementaryFunction::from_name(name)? {
        Sin => a.sin(),
        Cos => a.cos(),
        Tan => a.tan(),
        Cot => a.tan().recip(),
        Sec => a.cos().recip(),
        Csc => a.sin().recip(),
        Asin => a.asin(),
        Acos => a.acos(),
        Atan => a.atan(),
        Exp => a.exp(),
        Log => a.ln(),
        Sqrt => a.sqrt(),
      };
      Some(value)
    }
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use approx::assert_abs_diff_eq;

  fn var(name: &str) -> Expr {
    Expr::var(name).unwrap()
  }

  #[test]
  fn test_evaluate_polynomial() {
    let expr = Expr::sum(vec![Expr::pow(var("x"), Expr::from(2)), Expr::product(vec![Expr::from(3), var("x")])]);
    assert_abs_diff_eq!(evaluate_at(&expr, "x", 2.0).unwrap(), 10.0);
  }

  #[test]
  fn test_evaluate_functions() {
    let expr = Expr::call("sin", vec![Expr::product(vec![Expr::pi(), var("x")])]);
    assert_abs_diff_eq!(evaluate_at(&expr, "x", 0.5).unwrap(), 1.0, epsilon = 1e-12);
    let expr = Expr::call("log", vec![Expr::from(8), Expr::from(2)]);
    assert_abs_diff_eq!(evaluate_at(&expr, "x", 0.0).unwrap(), 3.0, epsilon = 1e-12);
  }

  #[test]
  fn test_unknowns_fail() {
    assert_eq!(evaluate_at(&var("y"), "x", 1.0), None);
    assert_eq!(evaluate_at(&Expr::call("f", vec![var("x")]), "x", 1.0), None);
  }
}
