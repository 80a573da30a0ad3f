//! Bottom-up rewriting passes which bring expressions into a
//! canonical, reasonably small form.

mod base;
pub mod chained;
pub mod flattener;
pub mod function;
pub mod identity;
pub mod power;
pub mod product;
pub mod repeated;
pub mod sum;

pub use base::Simplifier;

use crate::expr::Expr;

/// Upper bound on the number of full passes [`simplify`] makes.
const MAX_PASSES: usize = 32;

pub fn default_simplifier() -> Box<dyn Simplifier> {
  let chain = chained::ChainedSimplifier::several([
    Box::new(flattener::Flattener) as Box<dyn Simplifier>,
    Box::new(function::FunctionSimplifier),
    Box::new(power::PowerSimplifier),
    Box::new(product::ProductSimplifier),
    Box::new(sum::SumSimplifier),
  ].into_iter());
  Box::new(repeated::RepeatedSimplifier::new(chain, MAX_PASSES))
}

/// Simplifies `expr` with the [`default_simplifier`].
pub fn simplify(expr: Expr) -> Expr {
  default_simplifier().simplify_expr(expr)
}
