/// The binding strength of an operator, used to decide where a
/// printer needs parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Precedence(u64);

impl Precedence {
  pub const MIN: Precedence = Precedence(0);
  pub const RELATION: Precedence = Precedence(10);
  pub const SUM: Precedence = Precedence(20);
  pub const PRODUCT: Precedence = Precedence(30);
  pub const NEGATION: Precedence = Precedence(35);
  pub const POWER: Precedence = Precedence(40);
  pub const ATOM: Precedence = Precedence(100);

  /// Internally, precedences are spaced out so that a value can be
  /// incremented to represent associativity.
  ///
  /// For example, if `#` is a left-associative operator with
  /// precedence value `p`, then its left-hand side is also at
  /// precedence value `p`, while its right-hand side is at precedence
  /// value `p + 1`, indicating parentheses will be required if `#` is
  /// encountered again.
  pub fn incremented(self) -> Precedence {
    Precedence(self.0 + 1)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_ordering() {
    assert!(Precedence::SUM < Precedence::PRODUCT);
    assert!(Precedence::PRODUCT < Precedence::POWER);
    assert!(Precedence::POWER < Precedence::POWER.incremented());
    assert!(Precedence::POWER.incremented() < Precedence::ATOM);
  }
}
