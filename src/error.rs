//! Shared error utilities used across the compilation pipeline.
//!
//! Errors only remember a byte offset into the expression. The offending line
//! and caret are produced on demand by [`CompileError::render`], which keeps
//! the error values free of borrows into the input.

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum CompileError {
  /// A character the tokenizer does not recognise, or an out-of-range literal.
  #[snafu(display("{message}"))]
  Lex { loc: usize, message: String },

  /// The token stream does not match the expression grammar.
  #[snafu(display("{message}"))]
  Parse { loc: usize, message: String },
}

impl CompileError {
  pub fn lex(loc: usize, message: impl Into<String>) -> Self {
    Self::Lex {
      loc,
      message: message.into(),
    }
  }

  pub fn parse(loc: usize, message: impl Into<String>) -> Self {
    Self::Parse {
      loc,
      message: message.into(),
    }
  }

  /// Byte offset of the offending character or token.
  pub fn loc(&self) -> usize {
    match self {
      Self::Lex { loc, .. } | Self::Parse { loc, .. } => *loc,
    }
  }

  pub fn message(&self) -> &str {
    match self {
      Self::Lex { message, .. } | Self::Parse { message, .. } => message,
    }
  }

  /// Format the error chibicc-style: the quoted input line holding the
  /// offset, then a caret under the offending column followed by the message.
  pub fn render(&self, expr: &str) -> String {
    let safe_loc = floor_char_boundary(expr, self.loc().min(expr.len()));
    let line_start = expr[..safe_loc].rfind('\n').map_or(0, |i| i + 1);
    let line_end = expr[safe_loc..]
      .find('\n')
      .map_or(expr.len(), |i| safe_loc + i);
    let line = expr[line_start..line_end].trim_end_matches('\r');

    let expr_line = format!("'{line}'");
    let char_offset = expr[line_start..safe_loc].chars().count() + 1; // account for opening quote
    let marker = format!("{}^", " ".repeat(char_offset));
    format!("{expr_line}\n{marker} {}", self.message())
  }
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
  while !s.is_char_boundary(index) {
    index -= 1;
  }
  index
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn render_points_caret_at_offset() {
    let err = CompileError::lex(2, "invalid token: '@'");
    assert_eq!(err.render("1+@"), "'1+@'\n   ^ invalid token: '@'");
  }

  #[test]
  fn render_clamps_offset_past_end() {
    let err = CompileError::parse(10, "expected a number, but got \"EOF\"");
    assert_eq!(
      err.render("1+"),
      "'1+'\n   ^ expected a number, but got \"EOF\""
    );
  }

  #[test]
  fn render_counts_columns_in_chars() {
    let err = CompileError::lex(3, "invalid token: 'é'");
    // Offset 3 falls inside "é" and snaps back to its first byte.
    assert_eq!(err.render("1 é+"), "'1 é+'\n   ^ invalid token: 'é'");
  }

  #[test]
  fn render_shows_only_the_offending_line() {
    let err = CompileError::lex(6, "invalid token: '@'");
    assert_eq!(err.render("1 +\n  @"), "'  @'\n   ^ invalid token: '@'");

    let err = CompileError::parse(2, "unexpected token \"2\"");
    assert_eq!(
      err.render("1 2\n+3"),
      "'1 2'\n   ^ unexpected token \"2\""
    );
  }

  #[test]
  fn display_is_the_bare_message() {
    let err = CompileError::parse(0, "expression is empty");
    assert_eq!(err.to_string(), "expression is empty");
    assert_eq!(err.loc(), 0);
  }
}
