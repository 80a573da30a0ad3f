use crate::expr::Expr;
use crate::expr::walker::postorder_walk_ok;

/// A rewriting pass over expressions.
///
/// Implementors define how a single node is rewritten, assuming its
/// children have already been visited. [`Simplifier::simplify_expr`]
/// then applies that rewrite to the whole tree, bottom-up.
pub trait Simplifier {
  fn simplify_expr_part(&self, expr: Expr) -> Expr;

  fn simplify_expr(&self, expr: Expr) -> Expr {
    postorder_walk_ok(expr, |e| self.simplify_expr_part(e))
  }
}

impl<S: Simplifier + ?Sized> Simplifier for Box<S> {
  fn simplify_expr_part(&self, expr: Expr) -> Expr {
    (**self).simplify_expr_part(expr)
  }

  fn simplify_expr(&self, expr: Expr) -> Expr {
    (**self).simplify_expr(expr)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::expr::simplifier::flattener::Flattener;
  use crate::expr::simplifier::repeated::RepeatedSimplifier;

  fn var(name: &str) -> Expr {
    Expr::var(name).unwrap()
  }

  #[test]
  fn test_boxed_simplifier_forwards() {
    let expr = Expr::call("+", vec![var("x"), Expr::call("+", vec![var("y"), var("z")])]);
    let boxed: Box<dyn Simplifier> = Box::new(Flattener);
    assert_eq!(boxed.simplify_expr(expr.clone()), Flattener.simplify_expr(expr.clone()));
    let repeated = RepeatedSimplifier::new(boxed, 4);
    assert_eq!(repeated.simplify_expr(expr), Expr::call("+", vec![var("x"), var("y"), var("z")]));
  }
}
