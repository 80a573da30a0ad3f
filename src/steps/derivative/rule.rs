use crate::expr::Expr;
use crate::expr::var::Var;
use crate::expr::function::ElementaryFunction;
use crate::steps::rename::{RuleMapper, RuleTree, map_all, map_boxed};

/// One application of a differentiation identity to `context`, with
/// respect to `symbol`.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivativeRule {
  pub context: Expr,
  pub symbol: Var,
  pub kind: DerivativeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DerivativeKind {
  /// `context` does not depend on `symbol`.
  Constant { number: Expr },
  ConstantTimes { constant: Expr, other: Expr, substep: Box<DerivativeRule> },
  /// `base ^ exp` where `base` is `symbol` and `exp` is independent of
  /// it.
  Power { base: Expr, exp: Expr },
  Add { substeps: Vec<DerivativeRule> },
  Mul { terms: Vec<Expr>, substeps: Vec<DerivativeRule> },
  Div {
    numerator: Expr,
    denominator: Expr,
    numerstep: Box<DerivativeRule>,
    denomstep: Box<DerivativeRule>,
  },
  /// `substep` differentiates the outer function with respect to
  /// `u_var`, which stands for `inner`. `innerstep` differentiates
  /// `inner`.
  Chain {
    substep: Box<DerivativeRule>,
    inner: Expr,
    u_var: Var,
    innerstep: Box<DerivativeRule>,
  },
  /// A trigonometric or inverse trigonometric function of `symbol`.
  Trig { function: ElementaryFunction },
  /// `base ^ f`, where `base` is independent of `symbol`. `base` is
  /// `E` for the natural exponential.
  Exp { f: Expr, base: Expr },
  Log { arg: Expr, base: Expr },
  OpaqueFunction,
  Alternative { alternatives: Vec<DerivativeRule> },
  Rewrite { rewritten: Expr, substep: Box<DerivativeRule> },
  Unknown,
}

impl DerivativeKind {
  /// Short name of the variant, for logs and tests.
  pub fn name(&self) -> &'static str {
    use DerivativeKind::*;
    match self {
      Constant { .. } => "Constant",
      ConstantTimes { .. } => "ConstantTimes",
      Power { .. } => "Power",
      Add { .. } => "Add",
      Mul { .. } => "Mul",
      Div { .. } => "Div",
      Chain { .. } => "Chain",
      Trig { .. } => "Trig",
      Exp { .. } => "Exp",
      Log { .. } => "Log",
      OpaqueFunction => "OpaqueFunction",
      Alternative { .. } => "Alternative",
      Rewrite { .. } => "Rewrite",
      Unknown => "Unknown",
    }
  }
}

impl DerivativeRule {
  pub fn new(context: Expr, symbol: Var, kind: DerivativeKind) -> Self {
    Self { context, symbol, kind }
  }

  /// The `Unknown` rule for `context`.
  pub fn unknown(context: Expr, symbol: Var) -> Self {
    Self::new(context, symbol, DerivativeKind::Unknown)
  }

  pub fn is_unknown(&self) -> bool {
    matches!(self.kind, DerivativeKind::Unknown)
  }

  /// Every immediate subrule, in field order.
  pub fn children(&self) -> Vec<&DerivativeRule> {
    use DerivativeKind::*;
    match &self.kind {
      ConstantTimes { substep, .. } | Rewrite { substep, .. } => vec![substep.as_ref()],
      Add { substeps } | Mul { substeps, .. } => substeps.iter().collect(),
      Alternative { alternatives } => alternatives.iter().collect(),
      Div { numerstep, denomstep, .. } => vec![numerstep.as_ref(), denomstep.as_ref()],
      Chain { substep, innerstep, .. } => vec![substep.as_ref(), innerstep.as_ref()],
      Constant { .. } | Power { .. } | Trig { .. } | Exp { .. } | Log { .. } |
      OpaqueFunction | Unknown => vec![],
    }
  }
}

impl RuleTree for DerivativeRule {
  fn map_with<M: RuleMapper>(&self, m: &mut M) -> Self {
    use DerivativeKind::*;
    let kind = match &self.kind {
      Constant { number } => Constant { number: m.map_expr(number) },
      ConstantTimes { constant, other, substep } => ConstantTimes {
        constant: m.map_expr(constant),
        other: m.map_expr(other),
        substep: map_boxed(substep.as_ref(), m),
      },
      Power { base, exp } => Power { base: m.map_expr(base), exp: m.map_expr(exp) },
      Add { substeps } => Add { substeps: map_all(substeps, m) },
      Mul { terms, substeps } => Mul {
        terms: terms.iter().map(|t| m.map_expr(t)).collect(),
        substeps: map_all(substeps, m),
      },
      Div { numerator, denominator, numerstep, denomstep } => Div {
        numerator: m.map_expr(numerator),
        denominator: m.map_expr(denominator),
        numerstep: map_boxed(numerstep.as_ref(), m),
        denomstep: map_boxed(denomstep.as_ref(), m),
      },
      Chain { substep, inner, u_var, innerstep } => Chain {
        substep: map_boxed(substep.as_ref(), m),
        inner: m.map_expr(inner),
        u_var: m.map_var(u_var),
        innerstep: map_boxed(innerstep.as_ref(), m),
      },
      Trig { function } => Trig { function: *function },
      Exp { f, base } => Exp { f: m.map_expr(f), base: m.map_expr(base) },
      Log { arg, base } => Log { arg: m.map_expr(arg), base: m.map_expr(base) },
      OpaqueFunction => OpaqueFunction,
      Alternative { alternatives } => Alternative { alternatives: map_all(alternatives, m) },
      Rewrite { rewritten, substep } => Rewrite {
        rewritten: m.map_expr(rewritten),
        substep: map_boxed(substep.as_ref(), m),
      },
      Unknown => Unknown,
    };
    DerivativeRule {
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
