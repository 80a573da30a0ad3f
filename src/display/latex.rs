use super::{LanguageMode, output_sep_by};
use super::precedence::Precedence;
use super::basic::{own_precedence, prints_as_term};
use crate::expr::Expr;
use crate::expr::atom::{Atom, MathConstant};
use crate::expr::number;
use crate::expr::var::Var;
use crate::expr::algebra::term::Term;
use crate::expr::function::ElementaryFunction;
use crate::expr::function::flags::FunctionFlags;

use once_cell::sync::Lazy;
use regex::Regex;

/// LaTeX math markup, meant to be typeset on the client.
#[derive(Clone, Debug, Default)]
pub struct LatexLanguageMode;

pub fn to_latex(expr: &Expr) -> String {
  LatexLanguageMode.render(expr)
}

/// Trailing digits on a variable name become a subscript: `u1`
/// prints as `u_{1}`.
static INDEXED_NAME_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^([a-zA-Z]+)([0-9]+)$").unwrap()
});

pub fn var_to_latex(var: &Var) -> String {
  if let Some((hint, id)) = var.fresh_parts() {
    return format!("{hint}_{{{id}}}");
  }
  match INDEXED_NAME_RE.captures(var.as_str()) {
    Some(caps) => format!("{}_{{{}}}", &caps[1], &caps[2]),
    None => var.as_str().to_owned(),
  }
}

fn is_half(expr: &Expr) -> bool {
  expr.as_number().map_or(false, |n| *n == number::ratio(1, 2))
}

fn is_positive_integer(expr: &Expr) -> bool {
  expr.as_number().map_or(false, |n| n.is_integer() && *n > number::integer(0))
}

impl LatexLanguageMode {
  fn write_sum(&self, out: &mut String, args: &[Expr]) {
    for (i, arg) in args.iter().enumerate() {
      let term = Term::parse(arg);
      match (i, term.is_negative()) {
        (0, true) => out.push('-'),
        (0, false) => {}
        (_, true) => out.push_str(" - "),
        (_, false) => out.push_str(" + "),
      }
      if term.is_negative() {
        self.write_magnitude(out, &term, Precedence::NEGATION);
      } else {
        self.write_expr(out, arg, Precedence::SUM.incremented());
      }
    }
  }

  fn write_term(&self, out: &mut String, term: &Term) {
    if term.is_negative() {
      out.push('-');
      self.write_magnitude(out, term, Precedence::NEGATION);
    } else {
      self.write_magnitude(out, term, Precedence::PRODUCT);
    }
  }

  fn write_magnitude(&self, out: &mut String, term: &Term, prec: Precedence) {
    if !term.has_denominator() {
      if let [single] = term.numerator() {
        self.write_expr(out, single, prec);
      } else {
        self.write_factors(out, term.numerator());
      }
      return;
    }
    out.push_str("\\frac{");
    self.write_factors(out, term.numerator());
    out.push_str("}{");
    self.write_factors(out, term.denominator());
    out.push('}');
  }

  fn write_factors(&self, out: &mut String, factors: &[Expr]) {
    for (i, factor) in factors.iter().enumerate() {
      if i > 0 {
        out.push_str(if factor.is_number() { " \\cdot " } else { " " });
      }
      let prec = if factors.len() == 1 { Precedence::MIN } else { Precedence::PRODUCT.incremented() };
      self.write_expr(out, factor, prec);
    }
  }

  fn write_power(&self, out: &mut String, base: &Expr, exp: &Expr) {
    if is_half(exp) {
      out.push_str("\\sqrt{");
      self.write_expr(out, base, Precedence::MIN);
      out.push('}');
      return;
    }
    if let Expr::Call(name, args) = base {
      if let (Some(f), [arg]) = (ElementaryFunction::from_name(name), args.as_slice()) {
        if f.flags().intersects(FunctionFlags::TRIGONOMETRIC | FunctionFlags::LOGARITHMIC) && is_positive_integer(exp) {
          // sin^2(x), as is traditional.
          out.push_str(function_command(f));
          out.push_str("^{");
          self.write_expr(out, exp, Precedence::MIN);
          out.push('}');
          self.write_braced_args(out, std::slice::from_ref(arg));
          return;
        }
      }
    }
    self.write_expr(out, base, Precedence::POWER.incremented());
    out.push_str("^{");
    self.write_expr(out, exp, Precedence::MIN);
    out.push('}');
  }

  fn write_braced_args(&self, out: &mut String, args: &[Expr]) {
    out.push_str("{\\left(");
    output_sep_by(out, args, ", ", |out, e| self.write_expr(out, e, Precedence::MIN));
    out.push_str(" \\right)}");
  }

  fn write_call(&self, out: &mut String, name: &str, args: &[Expr]) {
    match (ElementaryFunction::from_name(name), args) {
      (Some(ElementaryFunction::Exp), [arg]) => {
        out.push_str("e^{");
        self.write_expr(out, arg, Precedence::MIN);
        out.push('}');
      }
      (Some(ElementaryFunction::Sqrt), [arg]) => {
        out.push_str("\\sqrt{");
        self.write_expr(out, arg, Precedence::MIN);
        out.push('}');
      }
      (Some(ElementaryFunction::Log), [arg, base]) => {
        out.push_str("\\log_{");
        self.write_expr(out, base, Precedence::MIN);
        out.push('}');
        self.write_braced_args(out, std::slice::from_ref(arg));
      }
      (Some(f), args) => {
        out.push_str(function_command(f));
        self.write_braced_args(out, args);
      }
      (None, args) => {
        let stem = name.trim_end_matches('\'');
        if let Some(caps) = INDEXED_NAME_RE.captures(stem) {
          out.push_str(&format!("{}_{{{}}}", &caps[1], &caps[2]));
          out.push_str(&name[stem.len()..]);
        } else if stem.chars().count() == 1 {
          out.push_str(name);
        } else {
          out.push_str("\\operatorname{");
          out.push_str(stem);
          out.push('}');
          out.push_str(&name[stem.len()..]);
        }
        self.write_braced_args(out, args);
      }
    }
  }
}

fn function_command(f: ElementaryFunction) -> &'static str {
  use ElementaryFunction::*;
  match f {
    Sin => "\\sin",
    Cos => "\\cos",
    Tan => "\\tan",
    Cot => "\\cot",
    Sec => "\\sec",
    Csc => "\\csc",
    Asin => "\\operatorname{asin}",
    Acos => "\\operatorname{acos}",
    Atan => "\\operatorname{atan}",
    Exp => "\\exp",
    Log => "\\log",
    Sqrt => "\\sqrt",
  }
}

impl LanguageMode for LatexLanguageMode {
  fn write_expr(&self, out: &mut String, expr: &Expr, prec: Precedence) {
    let parens = own_precedence(expr) < prec;
    if parens {
      out.push_str("\\left(");
    }
    if prints_as_term(expr) {
      self.write_term(out, &Term::parse(expr));
    } else {
      match expr {
        Expr::Atom(Atom::Number(n)) => out.push_str(&n.to_string()),
        Expr::Atom(Atom::Constant(MathConstant::E)) => out.push('e'),
        Expr::Atom(Atom::Constant(MathConstant::Pi)) => out.push_str("\\pi"),
        Expr::Atom(Atom::Var(v)) => out.push_str(&var_to_latex(v)),
        Expr::Call(name, args) => match (name.as_str(), args.as_slice()) {
          ("+", args) => self.write_sum(out, args),
          ("^", [base, exp]) => self.write_power(out, base, exp),
          ("=", [lhs, rhs]) | ("!=", [lhs, rhs]) => {
            self.write_expr(out, lhs, Precedence::RELATION.incremented());
            out.push_str(if name == "=" { " = " } else { " \\neq " });
            self.write_expr(out, rhs, Precedence::RELATION.incremented());
          }
          ("deriv", [e, var]) => {
            out.push_str("\\frac{d}{d ");
            self.write_expr(out, var, Precedence::ATOM);
            out.push_str("} ");
            self.write_expr(out, e, Precedence::PRODUCT.incremented());
          }
          ("integral", [e, var]) => {
            out.push_str("\\int ");
            self.write_expr(out, e, Precedence::SUM.incremented());
            out.push_str("\\, d");
            self.write_expr(out, var, Precedence::ATOM);
          }
          (name, args) => self.write_call(out, name, args),
        },
      }
    }
    if parens {
      out.push_str("\\right)");
    }
  }
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
  fn test_chain_rule_answer() {
    let expr = Expr::product(vec![Expr::from(2), var("x"), Expr::call("cos", vec![Expr::pow(var("x"), Expr::from(2))])]);
    assert_eq!(to_latex(&expr), "2 x \\cos{\\left(x^{2} \\right)}");
  }

  #[test]
  fn test_fractions() {
    let expr = Expr::product(vec![Expr::call("sin", vec![var("x")]), Expr::pow(Expr::call("cos", vec![var("x")]), Expr::minus_one())]);
    assert_eq!(to_latex(&expr), "\\frac{\\sin{\\left(x \\right)}}{\\cos{\\left(x \\right)}}");
    assert_eq!(to_latex(&Expr::from(number::ratio(-1, 2))), "-\\frac{1}{2}");
  }

  #[test]
  fn test_powers() {
    assert_eq!(to_latex(&Expr::pow(var("x"), Expr::from(number::ratio(1, 2)))), "\\sqrt{x}");
    assert_eq!(to_latex(&Expr::pow(Expr::call("sec", vec![var("x")]), Expr::from(2))), "\\sec^{2}{\\left(x \\right)}");
    let expr = Expr::pow(Expr::sum(vec![var("x"), Expr::one()]), Expr::from(3));
    assert_eq!(to_latex(&expr), "\\left(x + 1\\right)^{3}");
    assert_eq!(to_latex(&Expr::call("exp", vec![var("x")])), "e^{x}");
  }

  #[test]
  fn test_sums() {
    let expr = Expr::sum(vec![
      Expr::product(vec![var("x"), Expr::call("exp", vec![var("x")])]),
      Expr::product(vec![Expr::minus_one(), Expr::call("exp", vec![var("x")])]),
    ]);
    assert_eq!(to_latex(&expr), "x e^{x} - e^{x}");
  }

  #[test]
  fn test_opaque_and_fresh() {
    assert_eq!(to_latex(&Expr::call("f'", vec![var("x")])), "f'{\\left(x \\right)}");
    assert_eq!(to_latex(&Expr::call("foo", vec![var("x")])), "\\operatorname{foo}{\\left(x \\right)}");
    assert_eq!(to_latex(&Expr::call("f2", vec![var("x")])), "f_{2}{\\left(x \\right)}");
    let fresh = Var::fresh("u");
    let (_, id) = fresh.fresh_parts().unwrap();
    assert_eq!(to_latex(&Expr::from(fresh.clone())), format!("u_{{{id}}}"));
    assert_eq!(to_latex(&var("u12")), "u_{12}");
  }

  #[test]
  fn test_calculus_notation() {
    let derivative = Expr::derivative(Expr::call("sin", vec![var("x")]), x());
    assert_eq!(to_latex(&derivative), "\\frac{d}{d x} \\sin{\\left(x \\right)}");
    let integral = Expr::integral(Expr::sum(vec![var("x"), Expr::one()]), x());
    assert_eq!(to_latex(&integral), "\\int \\left(x + 1\\right)\\, dx");
    let equation = Expr::equation(var("u"), Expr::pow(var("x"), Expr::from(2)));
    assert_eq!(to_latex(&equation), "u = x^{2}");
  }
}
