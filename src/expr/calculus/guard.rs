use crate::expr::Expr;
use crate::expr::var::Var;

use tracing::{trace, warn};

/// Nesting limit past which [`InProgress::scoped`] refuses to recurse
/// any further, even on integrands it has not seen.
const MAX_DEPTH: usize = 24;

/// The set of `(integrand, variable)` pairs currently being worked on
/// further up the call stack.
///
/// An `InProgress` value is created once per top-level request and
/// threaded by `&mut` through every call which might recurse into the
/// integration machinery. Asking for an integrand which is already on
/// the stack short-circuits instead of looping forever.
#[derive(Debug, Clone, Default)]
pub struct InProgress {
  stack: Vec<(Expr, Var)>,
}

impl InProgress {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn contains(&self, expr: &Expr, var: &Var) -> bool {
    self.stack.iter().any(|(e, v)| e == expr && v == var)
  }

  pub fn depth(&self) -> usize {
    self.stack.len()
  }

  /// Runs `f` with `(expr, var)` marked as in progress. Returns `None`
  /// without calling `f` if the pair is already in progress, or if
  /// the nesting limit has been reached.
  pub fn scoped<T, F>(&mut self, expr: &Expr, var: &Var, f: F) -> Option<T>
  where F: FnOnce(&mut Self) -> Option<T> {
    if self.contains(expr, var) {
      warn!(%expr, %var, "integrand is already in progress, refusing to re-enter");
      return None;
    }
    if self.stack.len() >= MAX_DEPTH {
      warn!(%expr, depth = self.stack.len(), "integration nesting limit reached");
      return None;
    }
    trace!(%expr, depth = self.stack.len(), "entering integrand");
    self.stack.push((expr.clone(), var.clone()));
    let result = f(self);
    self.stack.pop();
    result
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn x() -> Var {
    Var::new("x").unwrap()
  }

  #[test]
  fn test_detects_reentry_until_scope_ends() {
    let mut in_progress = InProgress::new();
    let expr = Expr::call("sin", vec![Expr::from(x())]);
    let result = in_progress.scoped(&expr, &x(), |inner| {
      assert!(inner.contains(&expr, &x()));
      assert_eq!(inner.scoped(&expr, &x(), |_| Some(1)), None);
      Some(2)
    });
    assert_eq!(result, Some(2));
    assert!(!in_progress.contains(&expr, &x()));
    assert_eq!(in_progress.scoped(&expr, &x(), |_| Some(3)), Some(3));
  }

  #[test]
  fn test_different_variables_do_not_collide() {
    let mut in_progress = InProgress::new();
    let expr = Expr::call("f", vec![Expr::from(x())]);
    let y = Var::new("y").unwrap();
    let result = in_progress.scoped(&expr, &x(), |inner| inner.scoped(&expr, &y, |_| Some(())));
    assert_eq!(result, Some(()));
  }

  #[test]
  fn test_depth_limit() {
    fn nest(in_progress: &mut InProgress, n: i64) -> Option<usize> {
      let expr = Expr::from(n);
      in_progress.scoped(&expr, &Var::new("x").unwrap(), |inner| {
        nest(inner, n + 1).or(Some(inner.depth()))
      })
    }
    let mut in_progress = InProgress::new();
    assert_eq!(nest(&mut in_progress, 0), Some(MAX_DEPTH));
    assert_eq!(in_progress.depth(), 0);
  }
}
