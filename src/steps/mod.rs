//! "Show your work" differentiation and integration.
//!
//! Each request selects a rule tree for the expression, renders an
//! explanation by walking the tree, and computes the answer by
//! evaluating the same tree. See [`differentiate_with_steps`] and
//! [`integrate_with_steps`].

pub mod derivative;
pub mod document;
pub mod integral;
mod printer;
pub mod rename;

pub use document::{Block, Document, Fragment, Step};

use printer::{StepPrinter, text};
use crate::expr::Expr;
use crate::expr::var::Var;
use crate::expr::prisms::ExprToVar;
use crate::expr::calculus::InProgress;
use crate::expr::algebra::expand::expand;
use crate::expr::simplifier::simplify;
use crate::util::prism::Prism;

use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum StepsError {
  #[error("Cannot derive steps for {expr}")]
  CannotDeriveSteps { expr: Expr },
  #[error("Expected a variable, got {expr}")]
  NotAVariable { expr: Expr },
}

/// Options for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSettings {
  /// Whether to look for a simpler form of the final answer.
  pub simplify: bool,
  /// The constant of integration appended to antiderivatives.
  pub integration_constant: Var,
}

impl Default for StepSettings {
  fn default() -> Self {
    Self {
      simplify: true,
      integration_constant: Var::new("C").unwrap_or_else(|| Var::fresh("C")),
    }
  }
}

/// Explains the derivative of `expr` with respect to `symbol`.
pub fn differentiate_with_steps(expr: &Expr, symbol: &Expr) -> Result<Document, StepsError> {
  differentiate_with_steps_in(expr, symbol, &StepSettings::default())
}

pub fn differentiate_with_steps_in(expr: &Expr, symbol: &Expr, settings: &StepSettings) -> Result<Document, StepsError> {
  let symbol = to_symbol(symbol)?;
  let expr = simplify(expr.clone());
  info!(%expr, %symbol, "differentiating with steps");
  let rule = derivative::select(&expr, &symbol);
  if rule.is_unknown() {
    return Err(StepsError::CannotDeriveSteps { expr });
  }
  let mut p = StepPrinter::new(&expr);
  derivative::render(&rule, &mut p);
  let answer = finalize(&mut p, derivative::evaluate(&rule), settings);
  Ok(p.finish(&answer))
}

/// Explains the indefinite integral of `expr` with respect to
/// `symbol`.
pub fn integrate_with_steps(expr: &Expr, symbol: &Expr) -> Result<Document, StepsError> {
  integrate_with_steps_in(expr, symbol, &StepSettings::default())
}

pub fn integrate_with_steps_in(expr: &Expr, symbol: &Expr, settings: &StepSettings) -> Result<Document, StepsError> {
  let symbol = to_symbol(symbol)?;
  let expr = simplify(expr.clone());
  info!(%expr, %symbol, "integrating with steps");
  let mut in_progress = InProgress::new();
  let rule = integral::select(&expr, &symbol, &mut in_progress);
  if rule.is_unknown() {
    return Err(StepsError::CannotDeriveSteps { expr });
  }
  let mut p = StepPrinter::new(&expr);
  integral::render(&rule, &mut p, &mut in_progress);
  let answer = finalize(&mut p, integral::evaluate(&rule, &mut in_progress), settings);
  p.new_step();
  p.line(vec![text("Add the constant of integration:")]);
  let answer = Expr::sum(vec![answer, Expr::from(settings.integration_constant.clone())]);
  p.display(&answer);
  Ok(p.finish(&answer))
}

fn to_symbol(symbol: &Expr) -> Result<Var, StepsError> {
  ExprToVar.narrow_type(symbol.clone()).map_err(|expr| StepsError::NotAVariable { expr })
}

/// Adds a "Now simplify" step if a smaller form of `answer` exists,
/// and returns the form to report.
fn finalize(p: &mut StepPrinter, answer: Expr, settings: &StepSettings) -> Expr {
  if !settings.simplify {
    return answer;
  }
  let simplified = simplify(answer.clone());
  let expanded = simplify(expand(simplified.clone()));
  let best = if node_count(&expanded) < node_count(&simplified) { expanded } else { simplified };
  if best == answer {
    return answer;
  }
  debug!(%answer, %best, "answer simplified");
  p.new_step();
  p.line(vec![text("Now simplify:")]);
  p.display(&best);
  best
}

fn node_count(expr: &Expr) -> usize {
  match expr {
    Expr::Atom(_) => 1,
    Expr::Call(_, args) => 1 + args.iter().map(node_count).sum::<usize>(),
  }
}
