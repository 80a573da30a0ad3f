use crate::expr::Expr;
use crate::expr::var::Var;
use crate::steps::rename::{RuleMapper, RuleTree, map_all, map_boxed};

/// One application of an integration technique to `context`, with
/// respect to `symbol`.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegralRule {
  pub context: Expr,
  pub symbol: Var,
  pub kind: IntegralKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IntegralKind {
  Constant { constant: Expr },
  ConstantTimes { constant: Expr, other: Expr, substep: Box<IntegralRule> },
  /// `base ^ exp` with `base` the symbol and `exp != -1` independent of
  /// it.
  Power { base: Expr, exp: Expr },
  /// `1 / func`, integrating to `log(func)`.
  Reciprocal { func: Expr },
  /// `base ^ exp` with `exp` the symbol and `base` independent of it.
  Exp { base: Expr, exp: Expr },
  Trig { form: TrigForm, arg: Expr },
  /// `1 / (symbol^2 + 1)`.
  Arctan,
  Add { substeps: Vec<IntegralRule> },
  /// Substitute `u_var` for `u_func`. The substep integrates
  /// `constant * (rewritten integrand)` with respect to `u_var`.
  USub { u_var: Var, u_func: Expr, constant: Expr, substep: Box<IntegralRule> },
  Parts { u: Expr, dv: Expr, v_step: Box<IntegralRule>, second_step: Box<IntegralRule> },
  /// Repeated integration by parts which reproduces `coefficient`
  /// times the original integrand.
  CyclicParts { parts: Vec<PartsStep>, coefficient: Expr },
  Alternative { alternatives: Vec<IntegralRule> },
  Rewrite { rewritten: Expr, substep: Box<IntegralRule> },
  Unknown,
}

/// One round of integration by parts inside a [`IntegralKind::CyclicParts`].
#[derive(Debug, Clone, PartialEq)]
pub struct PartsStep {
  pub u: Expr,
  pub dv: Expr,
  pub v_step: IntegralRule,
}

/// The trigonometric antiderivative table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrigForm {
  Sin,
  Cos,
  SecSquared,
  CscSquared,
  SecTan,
  CscCot,
}

impl TrigForm {
  pub fn sentence(self) -> Option<&'static str> {
    match self {
      TrigForm::Sin => Some("The integral of sine is negative cosine:"),
      TrigForm::Cos => Some("The integral of cosine is sine:"),
      TrigForm::SecTan => Some("The integral of secant times tangent is secant:"),
      TrigForm::CscCot => Some("The integral of cosecant times cotangent is negative cosecant:"),
      TrigForm::SecSquared | TrigForm::CscSquared => None,
    }
  }
}

impl IntegralKind {
  /// Short name of the variant, for logs and tests.
  pub fn name(&self) -> &'static str {
    use IntegralKind::*;
    match self {
      Constant { .. } => "Constant",
      ConstantTimes { .. } => "ConstantTimes",
      Power { .. } => "Power",
      Reciprocal { .. } => "Reciprocal",
      Exp { .. } => "Exp",
      Trig { .. } => "Trig",
      Arctan => "Arctan",
      Add { .. } => "Add",
      USub { .. } => "USub",
      Parts { .. } => "Parts",
      CyclicParts { .. } => "CyclicParts",
      Alternative { .. } => "Alternative",
      Rewrite { .. } => "Rewrite",
      Unknown => "Unknown",
    }
  }
}

impl IntegralRule {
  pub fn new(context: Expr, symbol: Var, kind: IntegralKind) -> Self {
    Self { context, symbol, kind }
  }

  pub fn unknown(context: Expr, symbol: Var) -> Self {
    Self::new(context, symbol, IntegralKind::Unknown)
  }

  pub fn is_unknown(&self) -> bool {
    matches!(self.kind, IntegralKind::Unknown)
  }

  /// Every immediate subrule, in field order.
  pub fn children(&self) -> Vec<&IntegralRule> {
    use IntegralKind::*;
    match &self.kind {
      ConstantTimes { substep, .. } | USub { substep, .. } | Rewrite { substep, .. } => vec![substep.as_ref()],
      Add { substeps } => substeps.iter().collect(),
      Alternative { alternatives } => alternatives.iter().collect(),
      Parts { v_step, second_step, .. } => vec![v_step.as_ref(), second_step.as_ref()],
      CyclicParts { parts, .. } => parts.iter().map(|step| &step.v_step).collect(),
      Constant { .. } | Power { .. } | Reciprocal { .. } | Exp { .. } | Trig { .. } |
      Arctan | Unknown => vec![],
    }
  }

  /// Depth-first search for a rule of the given variant name.
  pub fn find(&self, name: &str) -> Option<&IntegralRule> {
    if self.kind.name() == name {
      return Some(self);
    }
    self.children().into_iter().find_map(|child| child.find(name))
  }
}

impl RuleTree for IntegralRule {
  fn map_with<M: RuleMapper>(&self, m: &mut M) -> Self {
    use IntegralKind::*;
    let kind = match &self.kind {
      Constant { constant } => Constant { constant: m.map_expr(constant) },
      ConstantTimes { constant, other, substep } => ConstantTimes {
        constant: m.map_expr(constant),
        other: m.map_expr(other),
        substep: map_boxed(substep.as_ref(), m),
      },
      Power { base, exp } => Power { base: m.map_expr(base), exp: m.map_expr(exp) },
      Reciprocal { func } => Reciprocal { func: m.map_expr(func) },
      Exp { base, exp } => Exp { base: m.map_expr(base), exp: m.map_expr(exp) },
      Trig { form, arg } => Trig { form: *form, arg: m.map_expr(arg) },
      Arctan => Arctan,
      Add { substeps } => Add { substeps: map_all(substeps, m) },
      USub { u_var, u_func, constant, substep } => USub {
        u_var: m.map_var(u_var),
        u_func: m.map_expr(u_func),
        constant: m.map_expr(constant),
        substep: map_boxed(substep.as_ref(), m),
      },
      Parts { u, dv, v_step, second_step } => Parts {
        u: m.map_expr(u),
        dv: m.map_expr(dv),
        v_step: map_boxed(v_step.as_ref(), m),
        second_step: map_boxed(second_step.as_ref(), m),
      },
      CyclicParts { parts, coefficient } => CyclicParts {
        parts: parts.iter().map(|step| PartsStep {
          u: m.map_expr(&step.u),
          dv: m.map_expr(&step.dv),
          v_step: step.v_step.map_with(m),
        }).collect(),
        coefficient: m.map_expr(coefficient),
      },
      Alternative { alternatives } => Alternative { alternatives: map_all(alternatives, m) },
      Rewrite { rewritten, substep } => Rewrite {
        rewritten: m.map_expr(rewritten),
        substep: map_boxed(substep.as_ref(), m),
      },
      Unknown => Unknown,
    };
    IntegralRule {
      context: m.map_expr(&self.context),
      symbol: m.map_var(&self.symbol),
      kind,
    }
  }

  fn contains_unknown(&self) -> bool {
    self.is_unknown() || self.children().into_iter().any(|r| r.contains_unknown())
  }

  fn context(&self) -> &Expr {
    &self.context
  }

  fn symbol(&self) -> &Var {
    &self.symbol
  }
}
