use crate::expr::Expr;
use super::base::Simplifier;

/// `Flattener` is a [`Simplifier`] that flattens nested applications
/// of the associative operators `+` and `*`, and collapses
/// applications of them to fewer than two arguments. An empty nested
/// application has already collapsed to the identity by the time its
/// parent is visited, so identity arguments are dropped as well.
///
/// Examples:
///
/// ```text
/// +(x, +(y, z), t) ==> +(x, y, z, t)
/// *(*(), a, b) ==> *(a, b)
/// +(x) ==> x
/// +(x, 0) ==> x
/// ```
#[derive(Debug, Default)]
pub struct Flattener;

fn is_associative(function_name: &str) -> bool {
  function_name == "+" || function_name == "*"
}

fn is_identity(function_name: &str, arg: &Expr) -> bool {
  match function_name {
    "+" => arg.is_zero(),
    "*" => arg.is_one(),
    _ => false,
  }
}

fn flatten_nested(function_name: &str, args: Vec<Expr>) -> Vec<Expr> {
  let mut new_args = Vec::with_capacity(args.len());
  for arg in args {
    match arg {
      Expr::Call(f, sub_args) if f == function_name => {
        new_args.extend(flatten_nested(function_name, sub_args));
      }
      arg if is_identity(function_name, &arg) => {}
      arg => {
        new_args.push(arg);
      }
    }
  }
  new_args
}

impl Simplifier for Flattener {
  fn simplify_expr_part(&self, expr: Expr) -> Expr {
    match expr {
      Expr::Call(function_name, args) if is_associative(&function_name) => {
        let args = flatten_nested(&function_name, args);
        if function_name == "+" {
          Expr::sum(args)
        } else {
          Expr::product(args)
        }
      }
      expr => expr,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn var(name: &str) -> Expr {
    Expr::var(name).unwrap()
  }

  #[test]
  fn test_flatten_sum() {
    let expr = Expr::call("+", vec![var("x"), Expr::call("+", vec![var("y"), var("z")]), var("t")]);
    assert_eq!(
      Flattener.simplify_expr(expr),
      Expr::call("+", vec![var("x"), var("y"), var("z"), var("t")]),
    );
  }

  #[test]
  fn test_flatten_empty_and_singleton() {
    let expr = Expr::call("*", vec![Expr::call("*", vec![]), var("a"), var("b")]);
    assert_eq!(Flattener.simplify_expr(expr), Expr::call("*", vec![var("a"), var("b")]));
    assert_eq!(Flattener.simplify_expr(Expr::call("+", vec![var("x")])), var("x"));
    assert_eq!(Flattener.simplify_expr(Expr::call("*", vec![])), Expr::one());
  }

  #[test]
  fn test_flatten_drops_identities() {
    let expr = Expr::call("+", vec![var("x"), Expr::call("+", vec![]), Expr::zero()]);
    assert_eq!(Flattener.simplify_expr(expr), var("x"));
    let expr = Expr::call("*", vec![Expr::one(), var("a")]);
    assert_eq!(Flattener.simplify_expr(expr), var("a"));
  }

  #[test]
  fn test_flatten_deeply_nested() {
    let expr = Expr::call("*", vec![Expr::call("*", vec![Expr::call("*", vec![var("x"), var("y")])]), var("z")]);
    assert_eq!(Flattener.simplify_expr(expr), Expr::call("*", vec![var("x"), var("y"), var("z")]));
  }

  #[test]
  fn test_other_functions_untouched() {
    let expr = Expr::call("f", vec![Expr::call("f", vec![var("x")])]);
    assert_eq!(Flattener.simplify_expr(expr.clone()), expr);
  }
}
