use super::rule::{IntegralRule, IntegralKind, PartsStep};
use super::eval::evaluate;
use crate::steps::printer::{StepPrinter, AlternativeChoice, choose_alternative, evaluated_alternative, text, math, eq};
use crate::steps::document::Fragment;
use crate::steps::rename::rename_bound_variable;
use crate::expr::Expr;
use crate::expr::var::Var;
use crate::expr::arithmetic::ArithExpr;
use crate::expr::calculus::{InProgress, differentiate};
use crate::expr::function::ElementaryFunction;
use crate::expr::simplifier::simplify;
use crate::display::to_latex;

/// Writes the explanation of `rule` to `p`. Intermediate results are
/// computed with [`evaluate`], sharing `in_progress` with it.
pub fn render(rule: &IntegralRule, p: &mut StepPrinter, in_progress: &mut InProgress) {
  use IntegralKind::*;
  match &rule.kind {
    Constant { .. } => {
      p.new_step();
      p.line(vec![text("The integral of a constant is the constant times the variable of integration:")]);
      p.display(&eq(integral_of(rule), evaluate(rule, in_progress)));
    }
    ConstantTimes { constant, other, substep } => {
      p.new_step();
      p.line(vec![text("The integral of a constant times a function is the constant times the integral of the function:")]);
      let pulled_out = Expr::product(vec![constant.clone(), Expr::integral(other.clone(), rule.symbol.clone())]);
      p.display(&eq(integral_of(rule), pulled_out));
      p.nested(|p| render(substep, p, in_progress));
      p.line(vec![text("So, the result is: "), math(&evaluate(rule, in_progress))]);
    }
    Power { .. } => {
      let x = Expr::from(rule.symbol.clone());
      let n = Expr::from(Var::new("n").unwrap_or_else(|| rule.symbol.clone()));
      let n_plus_one = Expr::sum(vec![n.clone(), Expr::one()]);
      let formula = Expr::product(vec![
        Expr::pow(x.clone(), n_plus_one.clone()),
        Expr::pow(n_plus_one, Expr::minus_one()),
      ]);
      p.new_step();
      p.line(vec![
        text("The integral of "),
        math(&Expr::pow(x, n.clone())),
        text(" is "),
        math(&formula),
        text(" when "),
        math(&Expr::call("!=", vec![n, Expr::minus_one()])),
        text(":"),
      ]);
      p.display(&eq(integral_of(rule), evaluate(rule, in_progress)));
    }
    Reciprocal { func } => {
      p.new_step();
      p.line(vec![
        text("The integral of "),
        math(&Expr::pow(func.clone(), Expr::minus_one())),
        text(" is "),
        math(&Expr::apply(ElementaryFunction::Log, func.clone())),
        text("."),
      ]);
    }
    Exp { base, .. } => {
      p.new_step();
      if *base == Expr::e() {
        p.line(vec![text("The integral of the exponential function is itself.")]);
      } else {
        p.line(vec![text("The integral of an exponential function is itself divided by the natural logarithm of the base.")]);
      }
      p.display(&eq(integral_of(rule), evaluate(rule, in_progress)));
    }
    Trig { form, .. } => {
      p.new_step();
      if let Some(sentence) = form.sentence() {
        p.line(vec![text(sentence)]);
      }
      p.display(&eq(integral_of(rule), evaluate(rule, in_progress)));
    }
    Arctan => {
      p.new_step();
      p.line(vec![
        text("The integral of "),
        math(&rule.context),
        text(" is "),
        math(&evaluate(rule, in_progress)),
        text("."),
      ]);
    }
    Add { substeps } => {
      p.new_step();
      p.line(vec![text("Integrate term-by-term:")]);
      p.nested(|p| {
        for substep in substeps {
          render(substep, p, in_progress);
        }
      });
      p.line(vec![text("The result is: "), math(&evaluate(rule, in_progress))]);
    }
    USub { u_var, u_func, substep, .. } => {
      render_substitution(rule, u_var, u_func, substep, p, in_progress);
    }
    Parts { u, dv, v_step, second_step } => {
      render_parts(rule, u, dv, v_step, p, in_progress);
      render(second_step, p, in_progress);
      p.line(vec![text("So, the result is: "), math(&evaluate(rule, in_progress))]);
    }
    CyclicParts { parts, coefficient } => render_cyclic_parts(rule, parts, coefficient, p, in_progress),
    Alternative { alternatives } => match choose_alternative(alternatives) {
      AlternativeChoice::Direct(alternative) => render(alternative, p, in_progress),
      AlternativeChoice::Methods(methods) => {
        if !p.mark_alternatives_shown(&rule.context) {
          if let Some(alternative) = evaluated_alternative(alternatives) {
            render(alternative, p, in_progress);
          }
          return;
        }
        p.new_step();
        p.line(vec![text("There are multiple ways to do this integral.")]);
        for (index, method) in methods.into_iter().enumerate() {
          p.collapsible(format!("Method #{}", index + 1), |p| render(method, p, in_progress));
        }
      }
    },
    Rewrite { rewritten, substep } => {
      p.new_step();
      p.line(vec![text("Rewrite the integrand:")]);
      p.display(&eq(rule.context.clone(), rewritten.clone()));
      render(substep, p, in_progress);
    }
    Unknown => {
      let answer = evaluate(rule, in_progress);
      p.new_step();
      p.line(vec![text("Don't know the steps in finding this integral.")]);
      if answer.has_unevaluated_integral() {
        p.line(vec![text("The integral cannot be evaluated, so it is left as")]);
      } else {
        p.line(vec![text("But the integral is")]);
      }
      p.display(&answer);
    }
  }
}

fn integral_of(rule: &IntegralRule) -> Expr {
  Expr::integral(rule.context.clone(), rule.symbol.clone())
}

/// `d{var}`, typeset.
fn differential(var: &Var) -> String {
  format!("d {}", to_latex(&Expr::from(var.clone())))
}

/// `factor d{var}`, typeset, grouping a sum in parentheses.
fn times_differential(factor: &Expr, var: &Var) -> String {
  let latex = to_latex(factor);
  if factor.as_call_named("+").is_some() {
    format!(r"\left({latex}\right) {}", differential(var))
  } else {
    format!("{latex} {}", differential(var))
  }
}

fn render_substitution(
  rule: &IntegralRule,
  u_var: &Var,
  u_func: &Expr,
  substep: &IntegralRule,
  p: &mut StepPrinter,
  in_progress: &mut InProgress,
) {
  let u = p.next_display_name();
  let substep = rename_bound_variable(substep, u_var, &u);
  let du = simplify(differentiate(u_func, &rule.symbol));
  p.new_step();
  p.line(vec![text("Let "), math(&eq(Expr::from(u.clone()), u_func.clone())), text(".")]);
  p.line(vec![
    text("Then let "),
    Fragment::math(format!("{} = {}", differential(&u), times_differential(&du, &rule.symbol))),
    text(" and substitute "),
    Fragment::math(times_differential(&substep.context, &u)),
    text(":"),
  ]);
  p.nested(|p| render(&substep, p, in_progress));
  p.line(vec![text("Now substitute "), math(&Expr::from(u)), text(" back in:")]);
  p.display(&evaluate(rule, in_progress));
}

/// The `u(x)`, `v(x)`, `du(x)`, `dv(x)` placeholders of the parts
/// formula.
fn parts_placeholders(symbol: &Var) -> [Expr; 4] {
  let x = Expr::from(symbol.clone());
  ["u", "v", "du", "dv"].map(|name| Expr::call(name, vec![x.clone()]))
}

fn render_parts(
  rule: &IntegralRule,
  u: &Expr,
  dv: &Expr,
  v_step: &IntegralRule,
  p: &mut StepPrinter,
  in_progress: &mut InProgress,
) {
  let [u_f, v_f, du_f, dv_f] = parts_placeholders(&rule.symbol);
  p.new_step();
  p.line(vec![text("Use integration by parts:")]);
  p.display_latex(r"\int \operatorname{u} \operatorname{dv} = \operatorname{u}\operatorname{v} - \int \operatorname{v} \operatorname{du}");
  p.line(vec![
    text("Let "),
    math(&eq(u_f, u.clone())),
    text(" and let "),
    math(&eq(dv_f, dv.clone())),
    text("."),
  ]);
  p.line(vec![text("Then "), math(&eq(du_f, differentiate(u, &rule.symbol))), text(".")]);
  p.line(vec![text("To find "), math(&v_f), text(":")]);
  p.nested(|p| render(v_step, p, in_progress));
  p.line(vec![text("Now evaluate the sub-integral.")]);
}

fn render_cyclic_parts(
  rule: &IntegralRule,
  parts: &[PartsStep],
  coefficient: &Expr,
  p: &mut StepPrinter,
  in_progress: &mut InProgress,
) {
  let [u_f, _, _, dv_f] = parts_placeholders(&rule.symbol);
  let integral = integral_of(rule);
  p.new_step();
  p.line(vec![text("Use integration by parts, noting that the integrand eventually repeats itself.")]);
  p.nested(|p| {
    let mut current = rule.context.clone();
    let mut total = ArithExpr::from(0);
    let mut sign = ArithExpr::from(1);
    for step in parts {
      p.new_step();
      p.line(vec![text("For the integrand "), math(&current), text(":")]);
      let v = evaluate(&step.v_step, in_progress);
      let du = differentiate(&step.u, &rule.symbol);
      total = total + sign.clone() * ArithExpr::from(step.u.clone()) * ArithExpr::from(v.clone());
      current = simplify((ArithExpr::from(v) * ArithExpr::from(du)).into());
      let remaining = simplify((sign.clone() * ArithExpr::from(Expr::integral(current.clone(), rule.symbol.clone()))).into());
      let shown = Expr::sum(vec![
        simplify(total.clone().into()),
        simplify((ArithExpr::from(-1) * ArithExpr::from(remaining)).into()),
      ]);
      p.line(vec![
        text("Let "),
        math(&eq(u_f.clone(), step.u.clone())),
        text(" and let "),
        math(&eq(dv_f.clone(), step.dv.clone())),
        text("."),
      ]);
      p.line(vec![text("Then "), math(&eq(integral.clone(), shown)), text(".")]);
      sign = -sign;
    }
    let total: Expr = simplify(total.into());
    let one_minus = simplify((ArithExpr::from(1) - ArithExpr::from(coefficient.clone())).into());
    p.new_step();
    p.line(vec![text("Notice that the integrand has repeated itself, so move it to one side:")]);
    p.display(&eq(Expr::product(vec![one_minus, integral.clone()]), total));
    p.line(vec![text("Therefore,")]);
    p.display(&eq(integral.clone(), evaluate(rule, in_progress)));
  });
}

#[cfg(test)]
mod tests {
  use super::*;

  fn var(name: &str) -> Expr {
    Expr::var(name).unwrap()
  }

  fn x() -> Var {
    Var::new("x").unwrap()
  }

  #[test]
  fn test_differential_groups_sums() {
    let sec = Expr::apply(ElementaryFunction::Sec, var("x"));
    let tan = Expr::apply(ElementaryFunction::Tan, var("x"));
    let du = Expr::sum(vec![Expr::product(vec![sec.clone(), tan]), Expr::pow(sec, Expr::from(2))]);
    let latex = times_differential(&du, &x());
    assert!(latex.starts_with(r"\left("), "{latex}");
    assert!(latex.ends_with(r"\right) d x"), "{latex}");
  }

  #[test]
  fn test_differential_of_single_term() {
    assert_eq!(times_differential(&Expr::from(2), &x()), "2 d x");
  }
}
