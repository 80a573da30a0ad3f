use crate::expr::Expr;
use crate::expr::number;
use crate::expr::function::ElementaryFunction;
use crate::expr::algebra::split::as_coeff_mul;
use crate::expr::prisms::{ExprToElementary, ElementaryCall};
use crate::util::prism::Prism;
use super::base::Simplifier;

/// `FunctionSimplifier` is a [`Simplifier`] which evaluates
/// elementary functions at their well-known exact points and cancels
/// inverse pairs such as `log(exp(a))`.
///
/// Square roots are rewritten as powers, so that the remaining
/// simplifiers only ever need to deal with `^`.
#[derive(Debug, Default)]
pub struct FunctionSimplifier;

impl Simplifier for FunctionSimplifier {
  fn simplify_expr_part(&self, expr: Expr) -> Expr {
    match ExprToElementary.narrow_type(expr) {
      Ok(call) => simplify_call(call),
      Err(expr) => expr,
    }
  }
}

fn simplify_call(call: ElementaryCall) -> Expr {
  use ElementaryFunction::*;
  let ElementaryCall { function, mut args } = call;
  if function == Log && args.len() == 2 && args[1] == Expr::e() {
    args.truncate(1);
  }
  if args.len() != 1 {
    return Expr::call(function.name(), args);
  }
  let arg = args.remove(0);
  match function {
    Sqrt => Expr::pow(arg, Expr::from(number::ratio(1, 2))),
    Sin | Tan | Asin | Atan if arg.is_zero() => Expr::zero(),
    Cos | Exp if arg.is_zero() => Expr::one(),
    Log if arg.is_one() => Expr::zero(),
    Log if arg == Expr::e() => Expr::one(),
    Log => match arg.as_unary(Exp) {
      Some(inner) => inner.clone(),
      None => Expr::apply(Log, arg),
    },
    Exp => {
      if let Some(inner) = arg.as_unary(Log) {
        return inner.clone();
      }
      let (coeff, rest) = as_coeff_mul(&arg);
      match rest.as_unary(Log) {
        Some(inner) => Expr::pow(inner.clone(), Expr::from(coeff)),
        None => Expr::apply(Exp, arg),
      }
    }
    function => Expr::apply(function, arg),
  }
}
