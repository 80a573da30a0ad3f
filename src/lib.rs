//! Step-by-step derivatives and integrals.
//!
//! [`steps::differentiate_with_steps`] and
//! [`steps::integrate_with_steps`] explain how a result is obtained,
//! one calculus identity at a time, over the small computer algebra
//! system in [`expr`].

// The #[non_exhaustive] attribute applies at the crate-level, and I
// want module-level restrictions, which are far stricter.
#![allow(clippy::manual_non_exhaustive)]

pub mod display;
pub mod error;
pub mod expr;
pub mod steps;
pub mod util;

pub use error::Error;
pub use steps::{Document, StepSettings, StepsError, differentiate_with_steps, integrate_with_steps};
