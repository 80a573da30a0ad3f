//! Step-by-step differentiation.

mod eval;
mod render;
mod rule;
mod select;

pub use eval::evaluate;
pub use render::render;
pub use rule::{DerivativeRule, DerivativeKind};
pub use select::select;
