//! Step-by-step integration.

mod eval;
mod parts;
mod render;
mod rule;
mod select;
mod substitution;

pub use eval::evaluate;
pub use render::render;
pub use rule::{IntegralRule, IntegralKind, PartsStep, TrigForm};
pub use select::select;

use select::IntegralSelector;
use crate::expr::Expr;
use crate::expr::var::Var;
use crate::expr::calculus::{InProgress, IntegrationHeuristic};
use crate::steps::rename::RuleTree;

/// The manual rule selector, offered to the integration oracle as its
/// fallback. Succeeds only when a complete derivation exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualIntegrator;

impl IntegrationHeuristic for ManualIntegrator {
  fn integrate(&self, expr: &Expr, var: &Var, in_progress: &mut InProgress) -> Option<Expr> {
    // The oracle has already marked `expr` as in progress.
    let rule = IntegralSelector::default().select_unguarded(expr, var, in_progress);
    if rule.contains_unknown() {
      return None;
    }
    Some(evaluate(&rule, in_progress))
  }
}
