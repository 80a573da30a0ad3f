//! The explanation document produced by the step renderers.
//!
//! A [`Document`] is an ordered list of [`Step`]s followed by the final
//! answer. Each step is a sequence of [`Block`]s: lines of text with
//! inline math, display math, nested lists of steps, or collapsible
//! sections (used to offer several methods side by side). Math is
//! always LaTeX, meant to be typeset on the client.

use html_escape::{encode_safe, encode_script};
use serde::Serialize;

use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
  pub steps: Vec<Step>,
  /// LaTeX for the final answer.
  pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Step {
  pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
  Text { fragments: Vec<Fragment> },
  Math { latex: String },
  List { steps: Vec<Step> },
  Collapsible { header: String, steps: Vec<Step> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Fragment {
  Text(String),
  Math(String),
}

/// Builds a [`Document`] one step at a time. Nested lists are opened
/// with [`DocumentBuilder::open_level`] and closed with one of the
/// `close_*` methods, which attach the finished list to the step that
/// was current when the level was opened.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
  levels: Vec<Vec<Step>>,
}

impl Fragment {
  pub fn text(text: impl Into<String>) -> Self {
    Fragment::Text(text.into())
  }

  pub fn math(latex: impl Into<String>) -> Self {
    Fragment::Math(latex.into())
  }
}

impl Step {
  /// All text and math of this step (and its children), flattened.
  /// Used by tests and logs.
  pub fn plain_text(&self) -> String {
    let mut out = String::new();
    for block in &self.blocks {
      block.write_plain_text(&mut out);
    }
    out
  }
}

impl Block {
  fn write_plain_text(&self, out: &mut String) {
    match self {
      Block::Text { fragments } => {
        for fragment in fragments {
          match fragment {
            Fragment::Text(s) | Fragment::Math(s) => out.push_str(s),
          }
        }
        out.push('\n');
      }
      Block::Math { latex } => {
        out.push_str(latex);
        out.push('\n');
      }
      Block::List { steps } => {
        for step in steps {
          out.push_str(&step.plain_text());
        }
      }
      Block::Collapsible { header, steps } => {
        out.push_str(header);
        out.push('\n');
        for step in steps {
          out.push_str(&step.plain_text());
        }
      }
    }
  }
}

impl Document {
  pub fn to_json(&self) -> serde_json::Result<String> {
    serde_json::to_string(self)
  }

  /// All text and math of the document, flattened.
  pub fn plain_text(&self) -> String {
    let mut out: String = self.steps.iter().map(Step::plain_text).collect();
    out.push_str(&self.answer);
    out
  }

  /// Renders the document as an HTML fragment. Math is emitted in
  /// `<script type="math/tex">` tags for client-side typesetting.
  pub fn to_html(&self) -> String {
    let mut out = String::new();
    write_steps_html(&mut out, &self.steps);
    out.push_str("<hr/>\n<p>The answer is:</p>\n");
    write_display_math_html(&mut out, &self.answer);
    out
  }
}

fn write_steps_html(out: &mut String, steps: &[Step]) {
  out.push_str("<ol>\n");
  for step in steps {
    out.push_str("<li>\n");
    for block in &step.blocks {
      write_block_html(out, block);
    }
    out.push_str("</li>\n");
  }
  out.push_str("</ol>\n");
}

fn write_block_html(out: &mut String, block: &Block) {
  match block {
    Block::Text { fragments } => {
      out.push_str("<div class=\"content\">");
      for fragment in fragments {
        match fragment {
          Fragment::Text(text) => out.push_str(&encode_safe(text)),
          Fragment::Math(latex) => {
            let _ = write!(out, "<script type=\"math/tex\">{}</script>", encode_script(latex));
          }
        }
      }
      out.push_str("</div>\n");
    }
    Block::Math { latex } => write_display_math_html(out, latex),
    Block::List { steps } => write_steps_html(out, steps),
    Block::Collapsible { header, steps } => {
      out.push_str("<div class=\"collapsible\">\n");
      let _ = writeln!(out, "<h3>{}</h3>", encode_safe(header));
      out.push_str("<div class=\"collapsible-body\">\n");
      write_steps_html(out, steps);
      out.push_str("</div>\n</div>\n");
    }
  }
}

fn write_display_math_html(out: &mut String, latex: &str) {
  let _ = writeln!(
    out,
    "<div class=\"content\"><script type=\"math/tex; mode=display\">{}</script></div>",
    encode_script(latex),
  );
}

impl DocumentBuilder {
  pub fn new() -> Self {
    Self { levels: vec![Vec::new()] }
  }

  fn current_level(&mut self) -> &mut Vec<Step> {
    if self.levels.is_empty() {
      self.levels.push(Vec::new());
    }
    let last = self.levels.len() - 1;
    &mut self.levels[last]
  }

  fn current_step(&mut self) -> &mut Step {
    let level = self.current_level();
    if level.is_empty() {
      level.push(Step::default());
    }
    let last = level.len() - 1;
    &mut level[last]
  }

  /// Starts a new step at the current nesting level.
  pub fn new_step(&mut self) {
    self.current_level().push(Step::default());
  }

  pub fn push_block(&mut self, block: Block) {
    self.current_step().blocks.push(block);
  }

  /// Appends a line of text and inline math to the current step.
  pub fn line(&mut self, fragments: Vec<Fragment>) {
    self.push_block(Block::Text { fragments });
  }

  /// Appends a display-math block to the current step.
  pub fn display(&mut self, latex: impl Into<String>) {
    self.push_block(Block::Math { latex: latex.into() });
  }

  pub fn open_level(&mut self) {
    self.levels.push(Vec::new());
  }

  /// Closes the innermost level, attaching it to the enclosing step as
  /// a nested list. Empty levels are dropped.
  pub fn close_level(&mut self) {
    let steps = self.pop_level();
    if !steps.is_empty() {
      self.push_block(Block::List { steps });
    }
  }

  /// Closes the innermost level, attaching it to the enclosing step as
  /// a collapsible section with the given header.
  pub fn close_collapsible(&mut self, header: impl Into<String>) {
    let steps = self.pop_level();
    self.push_block(Block::Collapsible { header: header.into(), steps });
  }

  fn pop_level(&mut self) -> Vec<Step> {
    if self.levels.len() > 1 {
      self.levels.pop().unwrap_or_default()
    } else {
      Vec::new()
    }
  }

  pub fn finish(mut self, answer: impl Into<String>) -> Document {
    while self.levels.len() > 1 {
      self.close_level();
    }
    let steps = self.levels.pop().unwrap_or_default();
    Document { steps, answer: answer.into() }
  }
}

impl Default for DocumentBuilder {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> Document {
    let mut builder = DocumentBuilder::new();
    builder.new_step();
    builder.line(vec![Fragment::text("Let "), Fragment::math("u = x^{2}"), Fragment::text(".")]);
    builder.open_level();
    builder.new_step();
    builder.line(vec![Fragment::text("inner <step>")]);
    builder.close_level();
    builder.new_step();
    builder.open_level();
    builder.new_step();
    builder.display("x");
    builder.close_collapsible("Method #1");
    builder.finish("2 x")
  }

  #[test]
  fn test_builder_nesting() {
    let doc = sample();
    assert_eq!(doc.steps.len(), 2);
    assert_eq!(doc.steps[0].blocks.len(), 2);
    assert!(matches!(&doc.steps[0].blocks[1], Block::List { steps } if steps.len() == 1));
    assert!(matches!(&doc.steps[1].blocks[0], Block::Collapsible { header, .. } if header == "Method #1"));
    assert_eq!(doc.answer, "2 x");
  }

  #[test]
  fn test_empty_levels_are_dropped() {
    let mut builder = DocumentBuilder::new();
    builder.new_step();
    builder.open_level();
    builder.close_level();
    let doc = builder.finish("0");
    assert_eq!(doc.steps, vec![Step::default()]);
  }

  #[test]
  fn test_json_shape() {
    let json: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
    assert_eq!(json["answer"], "2 x");
    assert_eq!(json["steps"][0]["blocks"][0]["type"], "text");
    assert_eq!(json["steps"][0]["blocks"][0]["fragments"][1]["type"], "math");
    assert_eq!(json["steps"][0]["blocks"][0]["fragments"][1]["value"], "u = x^{2}");
    assert_eq!(json["steps"][1]["blocks"][0]["type"], "collapsible");
  }

  #[test]
  fn test_html_escapes_text() {
    let html = sample().to_html();
    assert!(html.contains("inner &lt;step&gt;"));
    assert!(html.contains("<script type=\"math/tex\">u = x^{2}</script>"));
    assert!(html.contains("<h3>Method #1</h3>"));
    assert!(html.ends_with("<script type=\"math/tex; mode=display\">2 x</script></div>\n"));
  }
}
