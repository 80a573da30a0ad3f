use crate::expr::Expr;
use crate::expr::number::Number;
use crate::expr::function::ElementaryFunction;
use crate::expr::ordering::cmp_expr;
use crate::expr::algebra::split::{as_base_exp, terms};
use super::base::Simplifier;

use num::{Zero, One};

/// `ProductSimplifier` is a [`Simplifier`] for the `*` operator.
///
/// Numerical factors are multiplied into a single leading
/// coefficient, factors of `exp` are merged into one application,
/// and factors with a common base have their exponents summed. The
/// remaining factors are sorted. A numerical coefficient times a
/// single sum is distributed over that sum.
#[derive(Debug, Default)]
pub struct ProductSimplifier;

impl Simplifier for ProductSimplifier {
  fn simplify_expr_part(&self, expr: Expr) -> Expr {
    match expr {
      Expr::Call(function_name, args) if function_name == "*" => simplify_product(args),
      expr => expr,
    }
  }
}

fn simplify_product(args: Vec<Expr>) -> Expr {
  let mut coeff = Number::one();
  let mut exp_args = Vec::new();
  let mut groups: Vec<(Expr, Vec<Expr>)> = Vec::new();
  for arg in args {
    if let Some(n) = arg.as_number() {
      coeff *= n;
      continue;
    }
    if let Some(inner) = arg.as_unary(ElementaryFunction::Exp) {
      exp_args.push(inner.clone());
      continue;
    }
    let (base, exp) = as_base_exp(&arg);
    match groups.iter_mut().find(|(b, _)| *b == base) {
      Some((_, exps)) => exps.push(exp),
      None => groups.push((base, vec![exp])),
    }
  }
  if coeff.is_zero() {
    return Expr::zero();
  }

  let mut factors: Vec<Expr> = groups.into_iter().map(|(base, mut exps)| {
    let exp = if exps.len() == 1 { exps.remove(0) } else { Expr::sum(exps) };
    if exp.is_one() { base } else { Expr::pow(base, exp) }
  }).collect();
  if !exp_args.is_empty() {
    factors.push(Expr::apply(ElementaryFunction::Exp, Expr::sum(exp_args)));
  }
  factors.sort_by(cmp_expr);

  if !coeff.is_one() && factors.len() == 1 && factors[0].as_call_named("+").is_some() {
    let summands = terms(&factors[0]).into_iter()
      .map(|t| Expr::product(vec![Expr::from(coeff.clone()), t]))
      .collect();
    return Expr::sum(summands);
  }
  if !coeff.is_one() || factors.is_empty() {
    factors.insert(0, Expr::from(coeff));
  }
  Expr::product(factors)
}
