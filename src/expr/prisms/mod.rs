//! Prisms which downcast an [`Expr`] to one particular node shape.

use super::Expr;
use super::var::Var;
use super::atom::Atom;
use super::function::ElementaryFunction;
use crate::util::prism::Prism;

/// `base ^ exp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Power {
  pub base: Expr,
  pub exp: Expr,
}

/// An application of a known elementary function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementaryCall {
  pub function: ElementaryFunction,
  pub args: Vec<Expr>,
}

/// Prism which only accepts expressions which are a [`Var`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ExprToVar;

/// Prism which only accepts `^` nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExprToPower;

/// Prism which only accepts applications of elementary functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExprToElementary;

impl Prism<Expr, Var> for ExprToVar {
  fn narrow_type(&self, expr: Expr) -> Result<Var, Expr> {
    match expr {
      Expr::Atom(Atom::Var(v)) => Ok(v),
      expr => Err(expr),
    }
  }

  fn widen_type(&self, var: Var) -> Expr {
    Expr::from(var)
  }
}

impl Prism<Expr, Power> for ExprToPower {
  fn narrow_type(&self, expr: Expr) -> Result<Power, Expr> {
    match expr {
      Expr::Call(name, args) if name == "^" && args.len() == 2 => {
        let [base, exp]: [Expr; 2] = args.try_into().map_err(|args| Expr::Call(name, args))?;
        Ok(Power { base, exp })
      }
      expr => Err(expr),
    }
  }

  fn widen_type(&self, power: Power) -> Expr {
    Expr::pow(power.base, power.exp)
  }
}

impl Prism<Expr, ElementaryCall> for ExprToElementary {
  fn narrow_type(&self, expr: Expr) -> Result<ElementaryCall, Expr> {
    match expr {
      Expr::Call(name, args) => match ElementaryFunction::from_name(&name) {
        Some(function) => Ok(ElementaryCall { function, args }),
        None => Err(Expr::Call(name, args)),
      },
      expr => Err(expr),
    }
  }

  fn widen_type(&self, call: ElementaryCall) -> Expr {
    Expr::call(call.function.name(), call.args)
  }
}
