//! Exact rational numbers, the only numeric literals the engine
//! works with.

use num::{BigInt, BigRational, Signed, ToPrimitive, Zero, One};

/// Arbitrary precision rational number.
pub type Number = BigRational;

/// Largest exponent magnitude [`pow_exact`] is willing to compute.
const MAX_EXACT_EXPONENT: i64 = 1024;

pub fn integer(n: i64) -> Number {
  Number::from_integer(BigInt::from(n))
}

pub fn ratio(numer: i64, denom: i64) -> Number {
  Number::new(BigInt::from(numer), BigInt::from(denom))
}

pub fn to_i64(n: &Number) -> Option<i64> {
  if n.is_integer() {
    n.to_integer().to_i64()
  } else {
    None
  }
}

pub fn to_f64(n: &Number) -> Option<f64> {
  n.to_f64()
}

/// Computes `base ^ exp` if the result is again an exact rational
/// number. Returns `None` for division by zero, irrational results,
/// or absurdly large exponents.
pub fn pow_exact(base: &Number, exp: &Number) -> Option<Number> {
  if exp.is_integer() {
    let exp = to_i64(exp)?;
    if exp.abs() > MAX_EXACT_EXPONENT {
      return None;
    }
    if base.is_zero() && exp < 0 {
      return None;
    }
    return Some(base.pow(i32::try_from(exp).ok()?));
  }
  // Fractional exponent p/q: take an exact q-th root, then raise to p.
  let q = exp.denom().to_u32()?;
  let p = exp.numer().to_i64()?;
  if base.is_negative() {
    return None;
  }
  let numer = exact_root(base.numer(), q)?;
  let denom = exact_root(base.denom(), q)?;
  pow_exact(&Number::new(numer, denom), &integer(p))
}

fn exact_root(n: &BigInt, q: u32) -> Option<BigInt> {
  let root = n.nth_root(q);
  if num::pow(root.clone(), q as usize) == *n {
    Some(root)
  } else {
    None
  }
}

pub fn is_minus_one(n: &Number) -> bool {
  (-n).is_one()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_integer_powers() {
    assert_eq!(pow_exact(&integer(2), &integer(10)), Some(integer(1024)));
    assert_eq!(pow_exact(&integer(2), &integer(-2)), Some(ratio(1, 4)));
    assert_eq!(pow_exact(&integer(-3), &integer(3)), Some(integer(-27)));
    assert_eq!(pow_exact(&integer(0), &integer(-1)), None);
  }

  #[test]
  fn test_fractional_powers() {
    assert_eq!(pow_exact(&integer(4), &ratio(1, 2)), Some(integer(2)));
    assert_eq!(pow_exact(&ratio(8, 27), &ratio(2, 3)), Some(ratio(4, 9)));
    assert_eq!(pow_exact(&integer(9), &ratio(-1, 2)), Some(ratio(1, 3)));
    assert_eq!(pow_exact(&integer(2), &ratio(1, 2)), None);
    assert_eq!(pow_exact(&integer(-4), &ratio(1, 2)), None);
  }

  #[test]
  fn test_to_i64() {
    assert_eq!(to_i64(&integer(-7)), Some(-7));
    assert_eq!(to_i64(&ratio(1, 2)), None);
  }
}
