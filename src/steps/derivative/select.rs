use super::rule::{DerivativeRule, DerivativeKind};
use crate::expr::Expr;
use crate::expr::atom::Atom;
use crate::expr::var::Var;
use crate::expr::function::{ElementaryFunction, is_opaque_function};
use crate::expr::function::flags::FunctionFlags;
use crate::expr::algebra::split::{as_base_exp, as_independent, terms};
use crate::expr::algebra::term::as_numer_denom;

use tracing::debug;

/// Builds the rule tree explaining the derivative of `expr` with
/// respect to `symbol`. Never fails: shapes with no structural rule
/// become [`DerivativeKind::Unknown`].
pub fn select(expr: &Expr, symbol: &Var) -> DerivativeRule {
  let rule = DerivativeSelector { symbol }.select(expr);
  debug!(%expr, rule = rule.kind.name(), "selected derivative rule");
  rule
}

struct DerivativeSelector<'a> {
  symbol: &'a Var,
}

impl<'a> DerivativeSelector<'a> {
  fn rule(&self, context: &Expr, kind: DerivativeKind) -> DerivativeRule {
    DerivativeRule::new(context.clone(), self.symbol.clone(), kind)
  }

  fn select(&self, expr: &Expr) -> DerivativeRule {
    if !expr.contains_var(self.symbol) {
      return self.rule(expr, DerivativeKind::Constant { number: expr.clone() });
    }
    match expr {
      Expr::Atom(Atom::Var(_)) => self.power_rule(expr),
      Expr::Atom(_) => self.rule(expr, DerivativeKind::Constant { number: expr.clone() }),
      Expr::Call(name, args) => match (name.as_str(), args.as_slice()) {
        ("^", [_, _]) => self.power_rule(expr),
        ("+", _) => self.add_rule(expr),
        ("*", _) => self.mul_rule(expr),
        (name, args) => match ElementaryFunction::from_name(name) {
          Some(f) => self.elementary_rule(expr, f, args),
          None if is_opaque_function(name) => self.function_rule(expr, name, args),
          None => DerivativeRule::unknown(expr.clone(), self.symbol.clone()),
        },
      },
    }
  }

  /// Wraps `outer`, a rule for `f(u)` with respect to the fresh `u`,
  /// into a chain rule for `f(inner)`.
  fn chain(&self, expr: &Expr, outer: DerivativeRule, inner: &Expr, u: Var) -> DerivativeRule {
    let innerstep = self.select(inner);
    self.rule(expr, DerivativeKind::Chain {
      substep: Box::new(outer),
      inner: inner.clone(),
      u_var: u,
      innerstep: Box::new(innerstep),
    })
  }

  fn power_rule(&self, expr: &Expr) -> DerivativeRule {
    let (base, exp) = as_base_exp(expr);
    if !base.contains_var(self.symbol) {
      if exp.is_var(self.symbol) {
        return self.rule(expr, DerivativeKind::Exp { f: expr.clone(), base });
      }
      let u = Var::fresh("u");
      let f = Expr::pow(base.clone(), Expr::from(u.clone()));
      let outer = DerivativeRule::new(f.clone(), u.clone(), DerivativeKind::Exp { f, base });
      self.chain(expr, outer, &exp, u)
    } else if !exp.contains_var(self.symbol) {
      if base.is_var(self.symbol) {
        return self.rule(expr, DerivativeKind::Power { base, exp });
      }
      let u = Var::fresh("u");
      let u_expr = Expr::from(u.clone());
      let f = Expr::pow(u_expr.clone(), exp.clone());
      let outer = DerivativeRule::new(f, u.clone(), DerivativeKind::Power { base: u_expr, exp });
      self.chain(expr, outer, &base, u)
    } else {
      DerivativeRule::unknown(expr.clone(), self.symbol.clone())
    }
  }

  fn add_rule(&self, expr: &Expr) -> DerivativeRule {
    let substeps = terms(expr).iter().map(|t| self.select(t)).collect();
    self.rule(expr, DerivativeKind::Add { substeps })
  }

  fn mul_rule(&self, expr: &Expr) -> DerivativeRule {
    let (coeff, f) = as_independent(expr, self.symbol);
    if !coeff.is_one() {
      let substep = self.select(&f);
      return self.rule(expr, DerivativeKind::ConstantTimes {
        constant: coeff,
        other: f,
        substep: Box::new(substep),
      });
    }
    let (numerator, denominator) = as_numer_denom(expr);
    if !denominator.is_one() {
      let numerstep = self.select(&numerator);
      let denomstep = self.select(&denominator);
      return self.rule(expr, DerivativeKind::Div {
        numerator,
        denominator,
        numerstep: Box::new(numerstep),
        denomstep: Box::new(denomstep),
      });
    }
    let terms = expr.as_call_named("*").map(<[Expr]>::to_vec).unwrap_or_else(|| vec![expr.clone()]);
    let substeps = terms.iter().map(|t| self.select(t)).collect();
    self.rule(expr, DerivativeKind::Mul { terms, substeps })
  }

  fn elementary_rule(&self, expr: &Expr, f: ElementaryFunction, args: &[Expr]) -> DerivativeRule {
    let flags = f.flags();
    match (f, args) {
      (_, [arg]) if flags.intersects(FunctionFlags::TRIGONOMETRIC | FunctionFlags::INVERSE_TRIGONOMETRIC) => {
        self.trig_rule(expr, f, arg)
      }
      (ElementaryFunction::Exp, [arg]) => self.exp_rule(expr, arg),
      (ElementaryFunction::Log, [arg]) => self.log_rule(expr, arg, None),
      (ElementaryFunction::Log, [arg, base]) => self.log_rule(expr, arg, Some(base)),
      (ElementaryFunction::Sqrt, [arg]) => {
        let rewritten = Expr::pow(arg.clone(), Expr::from(crate::expr::number::ratio(1, 2)));
        self.rewrite(expr, rewritten)
      }
      _ => DerivativeRule::unknown(expr.clone(), self.symbol.clone()),
    }
  }

  fn rewrite(&self, expr: &Expr, rewritten: Expr) -> DerivativeRule {
    let substep = self.select(&rewritten);
    self.rule(expr, DerivativeKind::Rewrite { rewritten, substep: Box::new(substep) })
  }

  fn trig_rule(&self, expr: &Expr, f: ElementaryFunction, arg: &Expr) -> DerivativeRule {
    use ElementaryFunction::*;
    let default = if arg.is_var(self.symbol) {
      self.rule(expr, DerivativeKind::Trig { function: f })
    } else {
      let u = Var::fresh("u");
      let outer = DerivativeRule::new(Expr::apply(f, Expr::from(u.clone())), u.clone(), DerivativeKind::Trig { function: f });
      self.chain(expr, outer, arg, u)
    };
    let call = |g: ElementaryFunction| Expr::apply(g, arg.clone());
    let recip = |e: Expr| Expr::pow(e, Expr::minus_one());
    let rewrites = match f {
      Tan => vec![Expr::product(vec![call(Sin), recip(call(Cos))])],
      Csc => vec![recip(call(Sin))],
      Sec => vec![recip(call(Cos))],
      Cot => vec![recip(call(Tan)), Expr::product(vec![call(Cos), recip(call(Sin))])],
      _ => return default,
    };
    let mut alternatives = vec![default];
    alternatives.extend(rewrites.into_iter().map(|rewritten| self.rewrite(expr, rewritten)));
    self.rule(expr, DerivativeKind::Alternative { alternatives })
  }

  fn exp_rule(&self, expr: &Expr, arg: &Expr) -> DerivativeRule {
    if arg.is_var(self.symbol) {
      return self.rule(expr, DerivativeKind::Exp { f: expr.clone(), base: Expr::e() });
    }
    let u = Var::fresh("u");
    let f = Expr::apply(ElementaryFunction::Exp, Expr::from(u.clone()));
    let outer = DerivativeRule::new(f.clone(), u.clone(), DerivativeKind::Exp { f, base: Expr::e() });
    self.chain(expr, outer, arg, u)
  }

  fn log_rule(&self, expr: &Expr, arg: &Expr, base: Option<&Expr>) -> DerivativeRule {
    if let Some(base) = base {
      if base.contains_var(self.symbol) {
        let log = |e: &Expr| Expr::apply(ElementaryFunction::Log, e.clone());
        let rewritten = Expr::product(vec![log(arg), Expr::pow(log(base), Expr::minus_one())]);
        return self.rewrite(expr, rewritten);
      }
    }
    let base_expr = base.cloned().unwrap_or_else(Expr::e);
    if arg.is_var(self.symbol) {
      return self.rule(expr, DerivativeKind::Log { arg: arg.clone(), base: base_expr });
    }
    let u = Var::fresh("u");
    let u_expr = Expr::from(u.clone());
    let mut log_args = vec![u_expr.clone()];
    log_args.extend(base.cloned());
    let f = Expr::call(ElementaryFunction::Log.name(), log_args);
    let outer = DerivativeRule::new(f, u.clone(), DerivativeKind::Log { arg: u_expr, base: base_expr });
    self.chain(expr, outer, arg, u)
  }

  fn function_rule(&self, expr: &Expr, name: &str, args: &[Expr]) -> DerivativeRule {
    match args {
      [arg] if !arg.is_var(self.symbol) => {
        let u = Var::fresh("u");
        let f = Expr::call(name, vec![Expr::from(u.clone())]);
        let outer = DerivativeRule::new(f, u.clone(), DerivativeKind::OpaqueFunction);
        self.chain(expr, outer, arg, u)
      }
      _ => self.rule(expr, DerivativeKind::OpaqueFunction),
    }
  }
}
