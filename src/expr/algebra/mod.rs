//! Helpers for manipulating expressions algebraically.

pub mod expand;
pub mod split;
pub mod term;
