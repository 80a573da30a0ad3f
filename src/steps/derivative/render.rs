use super::rule::{DerivativeRule, DerivativeKind};
use super::eval::evaluate;
use crate::steps::printer::{StepPrinter, AlternativeChoice, choose_alternative, text, math, eq};
use crate::steps::rename::rename_bound_variable;
use crate::expr::Expr;
use crate::expr::var::Var;
use crate::expr::function::ElementaryFunction;

/// Writes the explanation of `rule` to `p`.
pub fn render(rule: &DerivativeRule, p: &mut StepPrinter) {
  use DerivativeKind::*;
  match &rule.kind {
    Constant { number } => {
      p.new_step();
      p.line(vec![text("The derivative of the constant "), math(number), text(" is zero.")]);
    }
    ConstantTimes { substep, .. } => {
      p.new_step();
      p.line(vec![text("The derivative of a constant times a function is the constant times the derivative of the function.")]);
      p.nested(|p| render(substep, p));
      p.line(vec![text("So, the result is: "), math(&evaluate(rule))]);
    }
    Power { .. } => {
      p.new_step();
      p.line(vec![
        text("Apply the power rule: "),
        math(&rule.context),
        text(" goes to "),
        math(&evaluate(rule)),
      ]);
    }
    Add { substeps } => {
      p.new_step();
      p.line(vec![text("Differentiate "), math(&rule.context), text(" term by term:")]);
      p.nested(|p| {
        for substep in substeps {
          render(substep, p);
        }
      });
      p.line(vec![text("The result is: "), math(&evaluate(rule))]);
    }
    Mul { terms, substeps } => render_product(rule, terms, substeps, p),
    Div { numerator, denominator, numerstep, denomstep } => {
      render_quotient(rule, numerator, denominator, numerstep, denomstep, p);
    }
    Chain { substep, inner, u_var, innerstep } => {
      render_chain(rule, substep, inner, u_var, innerstep, p);
    }
    Trig { function } => {
      p.new_step();
      p.line(vec![text(trig_sentence(*function))]);
      p.display(&eq(derivative_of(rule), evaluate(rule)));
    }
    Exp { base, .. } => {
      p.new_step();
      if *base == Expr::e() {
        let exp = Expr::apply(ElementaryFunction::Exp, Expr::from(rule.symbol.clone()));
        p.line(vec![text("The derivative of "), math(&exp), text(" is itself.")]);
      } else {
        p.line(vec![math(&eq(derivative_of(rule), evaluate(rule)))]);
      }
    }
    Log { .. } => {
      p.new_step();
      p.line(vec![
        text("The derivative of "),
        math(&rule.context),
        text(" is "),
        math(&evaluate(rule)),
        text("."),
      ]);
    }
    OpaqueFunction => {
      p.new_step();
      p.line(vec![text("Trivial:")]);
      p.display(&eq(derivative_of(rule), evaluate(rule)));
    }
    Alternative { alternatives } => match choose_alternative(alternatives) {
      AlternativeChoice::Direct(alternative) => render(alternative, p),
      AlternativeChoice::Methods(methods) => {
        p.new_step();
        p.line(vec![text("There are multiple ways to do this derivative.")]);
        for (index, method) in methods.into_iter().enumerate() {
          p.collapsible(format!("Method #{}", index + 1), |p| render(method, p));
        }
      }
    },
    Rewrite { rewritten, substep } => {
      p.new_step();
      p.line(vec![text("Rewrite the function to be differentiated:")]);
      p.display(&eq(rule.context.clone(), rewritten.clone()));
      render(substep, p);
    }
    Unknown => {
      p.new_step();
      p.line(vec![text("Don't know the steps in finding this derivative.")]);
      p.line(vec![text("But the derivative is")]);
      p.display(&evaluate(rule));
    }
  }
}

fn derivative_of(rule: &DerivativeRule) -> Expr {
  Expr::derivative(rule.context.clone(), rule.symbol.clone())
}

fn trig_sentence(function: ElementaryFunction) -> String {
  use ElementaryFunction::*;
  match function {
    Sin => "The derivative of sine is cosine:".to_owned(),
    Cos => "The derivative of cosine is negative sine:".to_owned(),
    Tan => "The derivative of tangent is secant squared:".to_owned(),
    Cot => "The derivative of cotangent is negative cosecant squared:".to_owned(),
    Sec => "The derivative of secant is secant times tangent:".to_owned(),
    Csc => "The derivative of cosecant is negative cosecant times cotangent:".to_owned(),
    f => format!("The derivative of the {} is:", f.long_name()),
  }
}

/// Placeholder names for the factors in the statement of the product
/// rule.
fn function_names(count: usize) -> Vec<String> {
  match count {
    2 => vec!["f".to_owned(), "g".to_owned()],
    3 => vec!["f".to_owned(), "g".to_owned(), "h".to_owned()],
    n => (1..=n).map(|i| format!("f{i}")).collect(),
  }
}

fn render_product(rule: &DerivativeRule, terms: &[Expr], substeps: &[DerivativeRule], p: &mut StepPrinter) {
  let x = Expr::from(rule.symbol.clone());
  let functions: Vec<Expr> = function_names(terms.len()).iter()
    .map(|name| Expr::call(name, vec![x.clone()]))
    .collect();
  let derivatives: Vec<Expr> = functions.iter()
    .map(|f| Expr::derivative(f.clone(), rule.symbol.clone()))
    .collect();
  let summands = (0..functions.len()).map(|i| {
    let mut factors = functions.clone();
    factors[i] = derivatives[i].clone();
    Expr::product(factors)
  }).collect();
  let statement = eq(Expr::derivative(Expr::product(functions.clone()), rule.symbol.clone()), Expr::sum(summands));

  p.new_step();
  p.line(vec![text("Apply the product rule:")]);
  p.display(&statement);
  for ((f, d), (term, substep)) in functions.iter().zip(&derivatives).zip(terms.iter().zip(substeps)) {
    p.line(vec![math(&eq(f.clone(), term.clone())), text("; to find "), math(d), text(":")]);
    p.nested(|p| render(substep, p));
  }
  p.line(vec![text("The result is: "), math(&evaluate(rule))]);
}

fn render_quotient(
  rule: &DerivativeRule,
  numerator: &Expr,
  denominator: &Expr,
  numerstep: &DerivativeRule,
  denomstep: &DerivativeRule,
  p: &mut StepPrinter,
) {
  let x = Expr::from(rule.symbol.clone());
  let f = Expr::call("f", vec![x.clone()]);
  let g = Expr::call("g", vec![x]);
  let df = Expr::derivative(f.clone(), rule.symbol.clone());
  let dg = Expr::derivative(g.clone(), rule.symbol.clone());
  let quotient = Expr::product(vec![f.clone(), Expr::pow(g.clone(), Expr::minus_one())]);
  let statement = eq(
    Expr::derivative(quotient, rule.symbol.clone()),
    Expr::product(vec![
      Expr::sum(vec![
        Expr::product(vec![g.clone(), df.clone()]),
        Expr::product(vec![Expr::minus_one(), f.clone(), dg.clone()]),
      ]),
      Expr::pow(g.clone(), Expr::from(-2)),
    ]),
  );

  p.new_step();
  p.line(vec![text("Apply the quotient rule, which is:")]);
  p.display(&statement);
  p.line(vec![
    math(&eq(f, numerator.clone())),
    text(" and "),
    math(&eq(g, denominator.clone())),
    text("."),
  ]);
  p.line(vec![text("To find "), math(&df), text(":")]);
  p.nested(|p| render(numerstep, p));
  p.line(vec![text("To find "), math(&dg), text(":")]);
  p.nested(|p| render(denomstep, p));
  p.line(vec![text("Now plug in to the quotient rule:")]);
  p.line(vec![math(&evaluate(rule))]);
}

fn render_chain(
  rule: &DerivativeRule,
  substep: &DerivativeRule,
  inner: &Expr,
  u_var: &Var,
  innerstep: &DerivativeRule,
  p: &mut StepPrinter,
) {
  let u = p.next_display_name();
  p.new_step();
  p.line(vec![text("Let "), math(&eq(Expr::from(u.clone()), inner.clone())), text(".")]);
  render(&rename_bound_variable(substep, u_var, &u), p);

  p.new_step();
  let inner_derivative = Expr::derivative(inner.clone(), rule.symbol.clone());
  p.line(vec![text("Then, apply the chain rule. Multiply by "), math(&inner_derivative), text(":")]);
  if matches!(innerstep.kind, DerivativeKind::OpaqueFunction) {
    p.display(&evaluate(rule));
  } else {
    p.nested(|p| render(innerstep, p));
    p.line(vec![text("The result of the chain rule is:")]);
    p.display(&evaluate(rule));
  }
}
