//! Stringification of expressions, both as plain text and as LaTeX
//! markup for client-side math rendering.

pub mod basic;
pub mod latex;
pub mod precedence;

use crate::expr::Expr;
use precedence::Precedence;

pub use basic::to_basic;
pub use latex::to_latex;

/// A language mode provides a mechanism to convert Exprs into text in
/// some output language.
pub trait LanguageMode {
  fn write_expr(&self, out: &mut String, expr: &Expr, prec: Precedence);

  fn render(&self, expr: &Expr) -> String {
    let mut out = String::new();
    self.write_expr(&mut out, expr, Precedence::MIN);
    out
  }
}

/// Helper function to output a list of values, separated by a chosen
/// delimiter.
pub fn output_sep_by<T, I, F>(
  out: &mut String,
  elems: I,
  delimiter: &str,
  mut printer: F,
)
where I: IntoIterator<Item = T>,
      F: FnMut(&mut String, T) {
  let mut elems = elems.into_iter();
  if let Some(first) = elems.next() {
    printer(out, first);
    for elem in elems {
      out.push_str(delimiter);
      printer(out, elem);
    }
  }
}
