//! Subsystems for doing basic calculus on expressions, such as taking
//! derivatives and integrals.

mod derivative;
mod guard;
mod integral;

pub use derivative::{DerivativeEngine, differentiate, elementary_derivative};
pub use guard::InProgress;
pub use integral::{IntegrationEngine, IntegrationHeuristic, integrate, linear_slope};
