//! Various utility functions.

pub mod prism;

use std::cmp::Ordering;
use std::convert::Infallible;

pub fn unwrap_infallible<T>(res: Result<T, Infallible>) -> T {
  match res {
    Ok(res) => res,
    Err(_) => unreachable!(),
  }
}

/// Lexicographic comparison of two iterables, using the given
/// comparison function on the elements. A proper prefix compares less
/// than the longer sequence.
pub fn cmp_iter_by<I1, I2, F>(iter1: I1, iter2: I2, mut cmp: F) -> Ordering
where I1: IntoIterator,
      I2: IntoIterator,
      F: FnMut(&I1::Item, &I2::Item) -> Ordering {
  let mut iter1 = iter1.into_iter();
  let mut iter2 = iter2.into_iter();
  loop {
    let Some(a) = iter1.next() else { return if iter2.next().is_none() { Ordering::Equal } else { Ordering::Less } };
    let Some(b) = iter2.next() else { return Ordering::Greater };
    let ord = cmp(&a, &b);
    if ord != Ordering::Equal {
      return ord;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unwrap_infallible_unwraps() {
    let res = Ok(1);
    assert_eq!(unwrap_infallible(res), 1);
  }

  #[test]
  fn test_cmp_iter_by() {
    let cmp = |a: &&i32, b: &&i32| a.cmp(b);
    assert_eq!(cmp_iter_by(&[1, 2, 3], &[1, 2, 3], cmp), Ordering::Equal);
    assert_eq!(cmp_iter_by(&[1, 2], &[1, 2, 3], cmp), Ordering::Less);
    assert_eq!(cmp_iter_by(&[1, 2, 3], &[1, 2], cmp), Ordering::Greater);
    assert_eq!(cmp_iter_by(&[1, 5], &[1, 2, 3], cmp), Ordering::Greater);
    assert_eq!(cmp_iter_by(&[0, 5], &[1], cmp), Ordering::Less);
  }
}
