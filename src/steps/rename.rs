//! Structural maps over rule trees, and the bound-variable rename
//! built on them.

use crate::expr::Expr;
use crate::expr::var::Var;
use crate::expr::substitute::substitute_var;

/// A function applied to every expression-valued and variable-valued
/// field of a rule tree by [`RuleTree::map_with`].
pub trait RuleMapper {
  fn map_expr(&mut self, expr: &Expr) -> Expr;
  fn map_var(&mut self, var: &Var) -> Var;
}

/// The operations shared by derivative and integral rule trees.
pub trait RuleTree: Sized {
  /// A copy of this tree with `mapper` applied to every field which
  /// holds an expression or a variable, including the fields of every
  /// nested rule.
  fn map_with<M: RuleMapper>(&self, mapper: &mut M) -> Self;

  /// True if this rule or any rule beneath it is `Unknown`.
  fn contains_unknown(&self) -> bool;

  fn context(&self) -> &Expr;

  fn symbol(&self) -> &Var;
}

struct Rename<'a> {
  old: &'a Var,
  new: &'a Var,
}

impl<'a> RuleMapper for Rename<'a> {
  fn map_expr(&mut self, expr: &Expr) -> Expr {
    substitute_var(expr.clone(), self.old, &Expr::from(self.new.clone()))
  }

  fn map_var(&mut self, var: &Var) -> Var {
    if var == self.old { self.new.clone() } else { var.clone() }
  }
}

/// Replaces every occurrence of `old` in `rule` by `new`, producing a
/// new tree. The input is left untouched.
pub fn rename_bound_variable<R: RuleTree>(rule: &R, old: &Var, new: &Var) -> R {
  rule.map_with(&mut Rename { old, new })
}

/// Maps `mapper` over a boxed subrule.
pub(super) fn map_boxed<R: RuleTree, M: RuleMapper>(rule: &R, mapper: &mut M) -> Box<R> {
  Box::new(rule.map_with(mapper))
}

/// Maps `mapper` over a list of subrules.
pub(super) fn map_all<R: RuleTree, M: RuleMapper>(rules: &[R], mapper: &mut M) -> Vec<R> {
  rules.iter().map(|r| r.map_with(mapper)).collect()
}
