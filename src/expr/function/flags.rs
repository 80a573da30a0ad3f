use bitflags::bitflags;

bitflags! {
  /// Families of elementary functions. Rule selection dispatches on a
  /// whole family rather than on individual function names.
  #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
  pub struct FunctionFlags: u32 {
    /// `sin`, `cos`, `tan`, `cot`, `sec`, `csc`.
    const TRIGONOMETRIC = 0b0001;
    /// `asin`, `acos`, `atan`.
    const INVERSE_TRIGONOMETRIC = 0b0010;
    /// `exp`.
    const EXPONENTIAL = 0b0100;
    /// `log`, with or without an explicit base.
    const LOGARITHMIC = 0b1000;
  }
}
