use super::{LanguageMode, output_sep_by};
use super::precedence::Precedence;
use crate::expr::Expr;
use crate::expr::atom::Atom;
use crate::expr::algebra::term::Term;

use num::Signed;

/// Plain infix text, e.g. `2*x*cos(x^2) - 1/y`. This is the language
/// of the [`Display`](std::fmt::Display) impl on [`Expr`].
#[derive(Clone, Debug, Default)]
pub struct BasicLanguageMode;

pub fn to_basic(expr: &Expr) -> String {
  BasicLanguageMode.render(expr)
}

impl BasicLanguageMode {
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
    if term.numerator().len() == 1 && !term.has_denominator() {
      self.write_expr(out, &term.numerator()[0], prec);
      return;
    }
    output_sep_by(out, term.numerator(), "*", |out, e| self.write_expr(out, e, Precedence::PRODUCT.incremented()));
    if term.has_denominator() {
      out.push('/');
      if let [single] = term.denominator() {
        self.write_expr(out, single, Precedence::POWER);
      } else {
        out.push('(');
        output_sep_by(out, term.denominator(), "*", |out, e| self.write_expr(out, e, Precedence::PRODUCT.incremented()));
        out.push(')');
      }
    }
  }

  fn write_call(&self, out: &mut String, name: &str, args: &[Expr]) {
    out.push_str(name);
    out.push('(');
    output_sep_by(out, args, ", ", |out, e| self.write_expr(out, e, Precedence::MIN));
    out.push(')');
  }
}

/// The precedence at which `expr` is printed by either printer.
pub(super) fn own_precedence(expr: &Expr) -> Precedence {
  match expr {
    Expr::Atom(Atom::Number(n)) if n.is_negative() => Precedence::NEGATION,
    Expr::Atom(Atom::Number(n)) if !n.is_integer() => Precedence::PRODUCT,
    Expr::Atom(_) => Precedence::ATOM,
    Expr::Call(name, args) => match (name.as_str(), args.as_slice()) {
      ("=" | "!=", [_, _]) => Precedence::RELATION,
      ("+", _) => Precedence::SUM,
      ("*", _) => {
        if Term::parse(expr).is_negative() { Precedence::NEGATION } else { Precedence::PRODUCT }
      }
      ("^", [_, exp]) if is_negative_number(exp) => Precedence::PRODUCT,
      ("^", [_, _]) => Precedence::POWER,
      _ => Precedence::ATOM,
    },
  }
}

pub(super) fn is_negative_number(expr: &Expr) -> bool {
  expr.as_number().map_or(false, Signed::is_negative)
}

/// True if `expr` should be printed through the numerator/denominator
/// view.
pub(super) fn prints_as_term(expr: &Expr) -> bool {
  match expr {
    Expr::Atom(Atom::Number(n)) => n.is_negative() || !n.is_integer(),
    Expr::Call(name, args) => match (name.as_str(), args.as_slice()) {
      ("*", _) => true,
      ("^", [_, exp]) => is_negative_number(exp),
      _ => false,
    },
    Expr::Atom(_) => false,
  }
}

impl LanguageMode for BasicLanguageMode {
  fn write_expr(&self, out: &mut String, expr: &Expr, prec: Precedence) {
    let parens = own_precedence(expr) < prec;
    if parens {
      out.push('(');
    }
    if prints_as_term(expr) {
      self.write_term(out, &Term::parse(expr));
    } else {
      match expr {
        Expr::Atom(atom) => out.push_str(&atom.to_string()),
        Expr::Call(name, args) => match (name.as_str(), args.as_slice()) {
          ("+", args) => self.write_sum(out, args),
          ("^", [base, exp]) => {
            self.write_expr(out, base, Precedence::POWER.incremented());
            out.push('^');
            self.write_expr(out, exp, Precedence::POWER);
          }
          ("=", [lhs, rhs]) | ("!=", [lhs, rhs]) => {
            self.write_expr(out, lhs, Precedence::RELATION.incremented());
            out.push_str(if name == "=" { " = " } else { " != " });
            self.write_expr(out, rhs, Precedence::RELATION.incremented());
          }
          ("deriv", [e, var]) => {
            out.push_str("d/d");
            self.write_expr(out, var, Precedence::ATOM);
            out.push('(');
            self.write_expr(out, e, Precedence::MIN);
            out.push(')');
          }
          (name, args) => self.write_call(out, name, args),
        },
      }
    }
    if parens {
      out.push(')');
    }
  }
}
