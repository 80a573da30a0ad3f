use super::Expr;
use super::number::{self, Number};

use num::{Zero, One};
use num::pow::Pow;

use std::ops::{Add, Sub, Mul, Div, Neg};

/// This struct forms a thin wrapper around [`Expr`] and can be used
/// in arithmetic expressions, such as `+` and `*`.
///
/// Arithmetic on two numerical literals is folded immediately, while
/// more complex expressions simply apply the corresponding operator at
/// the expression level. The results are *not* otherwise simplified;
/// pass them through [`simplify`](crate::expr::simplifier::simplify)
/// when a canonical form is needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArithExpr {
  inner: Expr,
}

impl ArithExpr {
  /// Equivalent to `ArithExpr::into` but with an explicit type, to
  /// aid in type inference in some situations.
  pub fn into_expr(self) -> Expr {
    self.into()
  }

  /// Convenience wrapper around [`Expr::call`] that works on
  /// `ArithExpr`.
  pub fn call(name: &str, args: Vec<impl Into<Expr>>) -> Self {
    let expr = Expr::call(name, args.into_iter().map(|e| e.into()).collect());
    ArithExpr::from(expr)
  }

  /// Sums a vector of `ArithExpr` values. If all of the values are
  /// numbers, then the result will be a number. Otherwise, the result
  /// will be an addition expression consisting of the arguments.
  ///
  /// A vector of one value will always result in that value, not an
  /// addition expression containing it.
  pub fn sum(exprs: Vec<impl Into<Expr>>) -> Self {
    let exprs: Vec<Expr> = exprs.into_iter().map(|e| e.into()).collect();
    if exprs.iter().all(Expr::is_number) {
      let sum = exprs.iter().filter_map(Expr::as_number).fold(Number::zero(), |acc, n| acc + n);
      sum.into()
    } else {
      ArithExpr::from(Expr::sum(exprs))
    }
  }

  /// Returns the product of `ArithExpr` values. If all of the values
  /// are numbers, then the result will be a number. Otherwise, the
  /// result will be a multiplication expression consisting of the
  /// arguments.
  ///
  /// A vector of one value will always result in that value, not a
  /// multiplication expression containing it.
  pub fn product(exprs: Vec<impl Into<Expr>>) -> Self {
    let exprs: Vec<Expr> = exprs.into_iter().map(|e| e.into()).collect();
    if exprs.iter().all(Expr::is_number) {
      let product = exprs.iter().filter_map(Expr::as_number).fold(Number::one(), |acc, n| acc * n);
      product.into()
    } else {
      ArithExpr::from(Expr::product(exprs))
    }
  }

  pub fn recip(self) -> Self {
    self.pow(ArithExpr::from(-1))
  }

  fn binary_op<F>(self, rhs: Self, op_name: &str, op: F) -> Self
  where F: FnOnce(&Number, &Number) -> Number {
    match (self.inner.as_number(), rhs.inner.as_number()) {
      (Some(a), Some(b)) => ArithExpr::from(op(a, b)),
      _ => ArithExpr::from(Expr::call(op_name, vec![self.into(), rhs.into()])),
    }
  }
}

impl From<Expr> for ArithExpr {
  fn from(inner: Expr) -> Self {
    Self { inner }
  }
}

impl From<Number> for ArithExpr {
  fn from(n: Number) -> Self {
    ArithExpr::from(Expr::from(n))
  }
}

impl From<i64> for ArithExpr {
  fn from(n: i64) -> Self {
    ArithExpr::from(Expr::from(n))
  }
}

impl From<ArithExpr> for Expr {
  fn from(arith_expr: ArithExpr) -> Self {
    arith_expr.inner
  }
}

impl AsRef<Expr> for ArithExpr {
  fn as_ref(&self) -> &Expr {
    &self.inner
  }
}

impl Zero for ArithExpr {
  fn zero() -> Self {
    ArithExpr::from(Expr::zero())
  }

  fn is_zero(&self) -> bool {
    self.as_ref().is_zero()
  }
}

impl One for ArithExpr {
  fn one() -> Self {
    ArithExpr::from(Expr::one())
  }

  fn is_one(&self) -> bool {
    self.as_ref().is_one()
  }
}

impl Add for ArithExpr {
  type Output = ArithExpr;

  fn add(self, rhs: Self) -> Self::Output {
    ArithExpr::binary_op(self, rhs, "+", |a, b| a + b)
  }
}

impl Sub for ArithExpr {
  type Output = ArithExpr;

  fn sub(self, rhs: Self) -> Self::Output {
    self + (-rhs)
  }
}

impl Mul for ArithExpr {
  type Output = ArithExpr;

  fn mul(self, rhs: Self) -> Self::Output {
    ArithExpr::binary_op(self, rhs, "*", |a, b| a * b)
  }
}

impl Div for ArithExpr {
  type Output = ArithExpr;

  fn div(self, rhs: Self) -> Self::Output {
    match (self.inner.as_number(), rhs.inner.as_number()) {
      (Some(a), Some(b)) if !b.is_zero() => ArithExpr::from(a / b),
      _ => self * rhs.recip(),
    }
  }
}

impl Neg for ArithExpr {
  type Output = ArithExpr;

  fn neg(self) -> Self::Output {
    ArithExpr::from(-1) * self
  }
}

impl Pow<ArithExpr> for ArithExpr {
  type Output = ArithExpr;

  fn pow(self, rhs: Self) -> Self::Output {
    if let (Some(a), Some(b)) = (self.inner.as_number(), rhs.inner.as_number()) {
      if let Some(n) = number::pow_exact(a, b) {
        return ArithExpr::from(n);
      }
    }
    ArithExpr::from(Expr::pow(self.into(), rhs.into()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn var(x: &str) -> ArithExpr {
    ArithExpr::from(Expr::var(x).unwrap())
  }

  #[test]
  fn test_numeric_folding() {
    assert_eq!(ArithExpr::from(2) + ArithExpr::from(3), ArithExpr::from(5));
    assert_eq!(ArithExpr::from(2) - ArithExpr::from(3), ArithExpr::from(-1));
    assert_eq!(ArithExpr::from(2) * ArithExpr::from(3), ArithExpr::from(6));
    assert_eq!(ArithExpr::from(3) / ArithExpr::from(4), ArithExpr::from(number::ratio(3, 4)));
    assert_eq!(ArithExpr::from(2).pow(ArithExpr::from(3)), ArithExpr::from(8));
  }

  #[test]
  fn test_symbolic_ops() {
    assert_eq!(
      (var("x") + ArithExpr::from(1)).into_expr(),
      Expr::call("+", vec![Expr::var("x").unwrap(), Expr::from(1)]),
    );
    assert_eq!(
      (var("x") - var("y")).into_expr(),
      Expr::call("+", vec![
        Expr::var("x").unwrap(),
        Expr::call("*", vec![Expr::from(-1), Expr::var("y").unwrap()]),
      ]),
    );
    assert_eq!(
      (var("x") / var("y")).into_expr(),
      Expr::call("*", vec![
        Expr::var("x").unwrap(),
        Expr::call("^", vec![Expr::var("y").unwrap(), Expr::from(-1)]),
      ]),
    );
  }

  #[test]
  fn test_sum_and_product() {
    assert_eq!(ArithExpr::sum(vec![Expr::from(1), Expr::from(2)]), ArithExpr::from(3));
    assert_eq!(ArithExpr::product(Vec::<Expr>::new()), ArithExpr::one());
    assert_eq!(ArithExpr::sum(vec![var("x")]), var("x"));
  }
}
