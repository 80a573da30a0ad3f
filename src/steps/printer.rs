//! Shared machinery for the explanation renderers: the step printer,
//! display names for bound variables, and the policy for showing
//! alternative derivations.

use super::document::{Document, DocumentBuilder, Fragment};
use super::rename::RuleTree;
use crate::expr::Expr;
use crate::expr::var::Var;
use crate::display::to_latex;

use std::collections::{BTreeSet, HashSet};

/// Preferred display names for bound variables, in order of use.
const DISPLAY_NAMES: [&str; 6] = ["u", "w", "t", "s", "p", "q"];

/// Hands out readable names for the fresh variables of a rule tree,
/// never reusing a name and never producing one which occurs in the
/// expression being explained.
#[derive(Debug, Clone)]
pub struct DisplayNames {
  taken: BTreeSet<Var>,
  next_index: usize,
}

/// A [`DocumentBuilder`] together with the naming state a renderer
/// needs while it walks a rule tree.
#[derive(Debug)]
pub struct StepPrinter {
  out: DocumentBuilder,
  names: DisplayNames,
  alternatives_shown: HashSet<String>,
}

/// How an `Alternative` rule should be shown.
#[derive(Debug)]
pub enum AlternativeChoice<'r, R> {
  /// Show this one alternative as if it were the only one.
  Direct(&'r R),
  /// Offer every listed alternative as a separate method.
  Methods(Vec<&'r R>),
}

impl DisplayNames {
  pub fn for_expr(expr: &Expr) -> Self {
    Self { taken: expr.free_vars(), next_index: 0 }
  }

  fn candidate(index: usize) -> Option<Var> {
    match DISPLAY_NAMES.get(index) {
      Some(name) => Var::new(*name),
      None => Var::new(format!("u{}", index - DISPLAY_NAMES.len() + 1)),
    }
  }

  pub fn next_name(&mut self) -> Var {
    loop {
      let index = self.next_index;
      self.next_index += 1;
      if let Some(var) = Self::candidate(index) {
        if self.taken.insert(var.clone()) {
          return var;
        }
      }
    }
  }
}

impl StepPrinter {
  /// A printer for explaining `expr`.
  pub fn new(expr: &Expr) -> Self {
    Self {
      out: DocumentBuilder::new(),
      names: DisplayNames::for_expr(expr),
      alternatives_shown: HashSet::new(),
    }
  }

  pub fn new_step(&mut self) {
    self.out.new_step();
  }

  pub fn line(&mut self, fragments: Vec<Fragment>) {
    self.out.line(fragments);
  }

  pub fn display(&mut self, expr: &Expr) {
    self.out.display(to_latex(expr));
  }

  pub fn display_latex(&mut self, latex: impl Into<String>) {
    self.out.display(latex);
  }

  /// Runs `f` one nesting level deeper, attaching whatever it prints
  /// to the current step.
  pub fn nested<F>(&mut self, f: F)
  where F: FnOnce(&mut Self) {
    self.out.open_level();
    f(self);
    self.out.close_level();
  }

  /// Like [`StepPrinter::nested`], but the level becomes a collapsible
  /// section with the given header.
  pub fn collapsible<F>(&mut self, header: impl Into<String>, f: F)
  where F: FnOnce(&mut Self) {
    self.out.open_level();
    f(self);
    self.out.close_collapsible(header);
  }

  pub fn next_display_name(&mut self) -> Var {
    self.names.next_name()
  }

  /// Records that a multi-method block was shown for expressions with
  /// the same head as `context`. Returns false if one already was.
  pub fn mark_alternatives_shown(&mut self, context: &Expr) -> bool {
    let head = match context {
      Expr::Call(name, _) => name.clone(),
      Expr::Atom(atom) => atom.to_string(),
    };
    self.alternatives_shown.insert(head)
  }

  pub fn finish(self, answer: &Expr) -> Document {
    self.out.finish(to_latex(answer))
  }
}

pub fn text(s: impl Into<String>) -> Fragment {
  Fragment::text(s)
}

pub fn math(expr: &Expr) -> Fragment {
  Fragment::math(to_latex(expr))
}

pub fn eq(lhs: Expr, rhs: Expr) -> Expr {
  Expr::equation(lhs, rhs)
}

/// Decides how to show a list of alternative derivations. Alternatives
/// which bottom out in `Unknown` are dropped, unless that would drop
/// all of them. A single survivor is shown directly. Of exactly two,
/// the second is shown directly. Anything more is offered as separate
/// methods.
pub fn choose_alternative<R: RuleTree>(alternatives: &[R]) -> AlternativeChoice<'_, R> {
  let known: Vec<&R> = alternatives.iter().filter(|r| !r.contains_unknown()).collect();
  let candidates = if known.is_empty() { alternatives.iter().collect() } else { known };
  match candidates.len() {
    1 => AlternativeChoice::Direct(candidates[0]),
    2 => AlternativeChoice::Direct(candidates[1]),
    _ => AlternativeChoice::Methods(candidates),
  }
}

/// The alternative whose value stands for the whole list: the one shown
/// directly, or else the second of the methods offered.
pub fn evaluated_alternative<R: RuleTree>(alternatives: &[R]) -> Option<&R> {
  match choose_alternative(alternatives) {
    AlternativeChoice::Direct(alternative) => Some(alternative),
    AlternativeChoice::Methods(methods) => methods.get(1).or(methods.first()).copied(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn var(name: &str) -> Expr {
    Expr::var(name).unwrap()
  }

  #[test]
  fn test_display_names_skip_taken() {
    let expr = Expr::sum(vec![var("u"), var("t"), var("x")]);
    let mut names = DisplayNames::for_expr(&expr);
    let produced: Vec<_> = (0..6).map(|_| names.next_name().as_str().to_owned()).collect();
    assert_eq!(produced, ["w", "s", "p", "q", "u1", "u2"]);
  }

  #[test]
  fn test_display_names_are_never_fresh() {
    let mut names = DisplayNames::for_expr(&var("x"));
    for _ in 0..10 {
      assert!(!names.next_name().is_fresh());
    }
  }
}
