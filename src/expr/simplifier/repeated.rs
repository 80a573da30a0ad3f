use super::base::Simplifier;
use crate::expr::Expr;
use crate::expr::walker::postorder_walk_ok;

use tracing::trace;

/// Applies the inner simplifier to the whole tree repeatedly, until
/// either nothing changes or `max_times` passes have been made.
#[derive(Debug)]
pub struct RepeatedSimplifier<S> {
  inner: S,
  max_times: usize,
}

impl<S> RepeatedSimplifier<S> {
  pub fn new(inner: S, max_times: usize) -> RepeatedSimplifier<S> {
    RepeatedSimplifier { inner, max_times }
  }
}

impl<S: Simplifier> Simplifier for RepeatedSimplifier<S> {
  fn simplify_expr(&self, mut expr: Expr) -> Expr {
    for pass in 0..self.max_times {
      let next = postorder_walk_ok(expr.clone(), |e| self.simplify_expr_part(e));
      if next == expr {
        trace!(passes = pass + 1, "simplifier reached a fixpoint");
        return next;
      }
      expr = next;
    }
    expr
  }

  fn simplify_expr_part(&self, expr: Expr) -> Expr {
    self.inner.simplify_expr_part(expr)
  }
}
