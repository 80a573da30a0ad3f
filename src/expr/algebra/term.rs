use crate::expr::Expr;
use crate::expr::number::{self, Number};
use crate::expr::algebra::split::factors;

use num::{One, Signed};

use std::ops::Neg;

/// A `Term` is a product, represented as a sign, a numerator, and a
/// denominator. Neither the numerator nor the denominator contain
/// applications of `*`.
///
/// Every expression can be interpreted as a `Term` via
/// [`Term::parse`]. Factors of the form `b ^ -n` (for a positive
/// number `n`) are moved into the denominator as `b ^ n`, and a
/// rational coefficient is split across both parts. This is the view
/// the printers use to render fractions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
  pub sign: Sign,
  numerator: Vec<Expr>,
  denominator: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Sign {
  Negative,
  Positive,
}

impl Term {
  pub fn numerator(&self) -> &[Expr] {
    &self.numerator
  }

  pub fn denominator(&self) -> &[Expr] {
    &self.denominator
  }

  pub fn into_parts(self) -> (Vec<Expr>, Vec<Expr>) {
    (self.numerator, self.denominator)
  }

  pub fn has_denominator(&self) -> bool {
    !self.denominator.is_empty()
  }

  pub fn is_negative(&self) -> bool {
    self.sign == Sign::Negative
  }

  pub fn parse(expr: &Expr) -> Term {
    let mut sign = Sign::Positive;
    let mut coeff = Number::one();
    let mut numerator = Vec::new();
    let mut denominator = Vec::new();
    for factor in factors(expr) {
      if let Some(n) = factor.as_number() {
        coeff *= n;
        continue;
      }
      match factor.as_call_named("^") {
        Some([base, exp]) if exp.as_number().map_or(false, Signed::is_negative) => {
          let exp = exp.as_number().map(Neg::neg).unwrap_or_else(Number::one);
          if exp.is_one() {
            denominator.push(base.clone());
          } else {
            denominator.push(Expr::pow(base.clone(), Expr::from(exp)));
          }
        }
        _ => numerator.push(factor),
      }
    }
    if coeff.is_negative() {
      sign = Sign::Negative;
      coeff = -coeff;
    }
    if !coeff.numer().is_one() || numerator.is_empty() {
      numerator.insert(0, Expr::from(Number::from_integer(coeff.numer().clone())));
    }
    if !coeff.denom().is_one() {
      denominator.insert(0, Expr::from(Number::from_integer(coeff.denom().clone())));
    }
    Term { sign, numerator, denominator }
  }

  /// The unsigned term, as an expression.
  pub fn magnitude(&self) -> Expr {
    let numerator = Expr::product(self.numerator.clone());
    if self.denominator.is_empty() {
      numerator
    } else {
      let denominator = Expr::product(self.denominator.clone());
      Expr::product(vec![numerator, Expr::pow(denominator, Expr::minus_one())])
    }
  }
}

impl Sign {
  pub fn other(self) -> Self {
    match self {
      Self::Negative => Self::Positive,
      Self::Positive => Self::Negative,
    }
  }
}

impl Neg for Term {
  type Output = Self;

  fn neg(self) -> Self::Output {
    Self { sign: self.sign.other(), ..self }
  }
}

impl From<Term> for Expr {
  fn from(term: Term) -> Expr {
    let magnitude = term.magnitude();
    match term.sign {
      Sign::Positive => magnitude,
      Sign::Negative => Expr::product(vec![Expr::minus_one(), magnitude]),
    }
  }
}

/// Splits `expr` into a signed numerator and a denominator, so that
/// `expr == numerator / denominator`. The denominator is `1` when
/// there is nothing to divide by.
pub fn as_numer_denom(expr: &Expr) -> (Expr, Expr) {
  let term = Term::parse(expr);
  let sign = term.sign;
  let (numerator, denominator) = term.into_parts();
  let mut numerator = Expr::product(numerator);
  if sign == Sign::Negative {
    numerator = Expr::product(vec![Expr::minus_one(), numerator]);
  }
  (numerator, Expr::product(denominator))
}

/// True if the literal numerical coefficient of `expr` is negative.
pub fn has_negative_coefficient(expr: &Expr) -> bool {
  factors(expr).iter().filter_map(Expr::as_number).fold(number::integer(1), |acc, n| acc * n).is_negative()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn var(name: &str) -> Expr {
    Expr::var(name).unwrap()
  }

  #[test]
  fn test_parse_plain_factor() {
    let term = Term::parse(&var("x"));
    assert_eq!(term.sign, Sign::Positive);
    assert_eq!(term.numerator(), &[var("x")]);
    assert!(!term.has_denominator());
  }

  #[test]
  fn test_parse_negative_exponent() {
    let expr = Expr::product(vec![var("x"), Expr::pow(var("y"), Expr::from(-2))]);
    let term = Term::parse(&expr);
    assert_eq!(term.numerator(), &[var("x")]);
    assert_eq!(term.denominator(), &[Expr::pow(var("y"), Expr::from(2))]);
  }

  #[test]
  fn test_parse_rational_coefficient() {
    let expr = Expr::product(vec![Expr::from(number::ratio(-3, 4)), var("x")]);
    let term = Term::parse(&expr);
    assert_eq!(term.sign, Sign::Negative);
    assert_eq!(term.numerator(), &[Expr::from(3), var("x")]);
    assert_eq!(term.denominator(), &[Expr::from(4)]);
  }

  #[test]
  fn test_parse_pure_reciprocal() {
    let expr = Expr::pow(var("x"), Expr::minus_one());
    let term = Term::parse(&expr);
    assert_eq!(term.numerator(), &[Expr::one()]);
    assert_eq!(term.denominator(), &[var("x")]);
  }

  #[test]
  fn test_negative_coefficient() {
    assert!(has_negative_coefficient(&Expr::product(vec![Expr::from(-1), var("x")])));
    assert!(!has_negative_coefficient(&var("x")));
    let neg = -Term::parse(&var("x"));
    assert!(neg.is_negative());
    assert_eq!(Expr::from(neg), Expr::product(vec![Expr::minus_one(), var("x")]));
  }

  #[test]
  fn test_as_numer_denom() {
    let expr = Expr::product(vec![Expr::call("sin", vec![var("x")]), Expr::pow(Expr::call("cos", vec![var("x")]), Expr::minus_one())]);
    assert_eq!(as_numer_denom(&expr), (Expr::call("sin", vec![var("x")]), Expr::call("cos", vec![var("x")])));
    assert_eq!(as_numer_denom(&var("x")), (var("x"), Expr::one()));
    let expr = Expr::product(vec![Expr::minus_one(), var("x")]);
    assert_eq!(as_numer_denom(&expr), (Expr::product(vec![Expr::minus_one(), var("x")]), Expr::one()));
  }
}
