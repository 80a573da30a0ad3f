//! This module defines a total ordering on the [`Expr`] type, used to
//! put the arguments of commutative operators into a canonical order.
//! This ordering has the following properties.
//!
//! * It is consistent with the `Eq` instance on `Expr`.
//!
//! * Numbers come first and compare using the typical ordering,
//! followed by named constants, then variables (alphabetically), then
//! function calls.
//!
//! * Function calls compare by name first, then lexicographically by
//! their arguments.

use super::Expr;
use super::var::Var;
use super::atom::{Atom, MathConstant};
use super::number::Number;
use crate::util::cmp_iter_by;

use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct OrderedExpr<'a> {
  data: OrderedExprImpl<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum OrderedExprImpl<'a> {
  Number(&'a Number),
  Constant(MathConstant),
  Var(&'a Var),
  Call(&'a str, OrderedExprSlice<'a>),
}

/// Type which implements ordering for a slice of `Expr` via this
/// module, without having to clone any of the inner expressions or
/// the vector structure.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OrderedExprSlice<'a> {
  elems: &'a [Expr],
}

impl<'a> OrderedExpr<'a> {
  pub fn new(e: &'a Expr) -> Self {
    let data = match e {
      Expr::Atom(Atom::Number(n)) => OrderedExprImpl::Number(n),
      Expr::Atom(Atom::Constant(c)) => OrderedExprImpl::Constant(*c),
      Expr::Atom(Atom::Var(v)) => OrderedExprImpl::Var(v),
      Expr::Call(function_name, args) => {
        OrderedExprImpl::Call(function_name, OrderedExprSlice { elems: args })
      }
    };
    OrderedExpr { data }
  }
}

impl<'a> PartialOrd for OrderedExprSlice<'a> {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl<'a> Ord for OrderedExprSlice<'a> {
  fn cmp(&self, other: &Self) -> Ordering {
    cmp_iter_by(self.elems, other.elems, |a, b| cmp_expr(a, b))
  }
}

pub fn cmp_expr(a: &Expr, b: &Expr) -> Ordering {
  OrderedExpr::new(a).cmp(&OrderedExpr::new(b))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_number() {
    let expr = Expr::from(10);
    assert_eq!(OrderedExpr::new(&expr), OrderedExpr { data: OrderedExprImpl::Number(&crate::expr::number::integer(10)) });
  }

  #[test]
  fn test_parse_var() {
    let expr = Expr::var("x").unwrap();
    assert_eq!(OrderedExpr::new(&expr), OrderedExpr { data: OrderedExprImpl::Var(&Var::new("x").unwrap()) });
  }

  #[test]
  fn test_parse_call() {
    let expr = Expr::call("function_name", vec![Expr::from(10), Expr::from(20)]);
    assert_eq!(OrderedExpr::new(&expr), OrderedExpr {
      data: OrderedExprImpl::Call("function_name", OrderedExprSlice { elems: &[Expr::from(10), Expr::from(20)] }),
    });
  }

  #[test]
  fn test_kinds_are_ordered() {
    let number = Expr::from(100);
    let constant = Expr::pi();
    let var = Expr::var("a").unwrap();
    let call = Expr::call("f", vec![]);
    assert_eq!(cmp_expr(&number, &constant), Ordering::Less);
    assert_eq!(cmp_expr(&constant, &var), Ordering::Less);
    assert_eq!(cmp_expr(&var, &call), Ordering::Less);
    assert_eq!(cmp_expr(&Expr::from(-3), &Expr::from(2)), Ordering::Less);
  }

  #[test]
  fn test_calls_compare_by_name_then_args() {
    let x = Expr::var("x").unwrap();
    let y = Expr::var("y").unwrap();
    let cos_x = Expr::call("cos", vec![x.clone()]);
    let sin_x = Expr::call("sin", vec![x.clone()]);
    let sin_y = Expr::call("sin", vec![y]);
    assert_eq!(cmp_expr(&cos_x, &sin_x), Ordering::Less);
    assert_eq!(cmp_expr(&sin_x, &sin_y), Ordering::Less);
    assert_eq!(cmp_expr(&sin_x, &sin_x.clone()), Ordering::Equal);
  }
}
