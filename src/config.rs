//! Options that select what a compilation run produces.

use std::{fmt, str::FromStr};

use crate::codegen::Dialect;

/// Artifact printed by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emit {
  /// The assembly listing.
  #[default]
  Asm,
  /// One line per token, for debugging the tokenizer.
  Tokens,
  /// The pretty-printed expression tree.
  Ast,
}

impl fmt::Display for Emit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Asm => f.write_str("asm"),
      Self::Tokens => f.write_str("tokens"),
      Self::Ast => f.write_str("ast"),
    }
  }
}

impl FromStr for Emit {
  type Err = String;

  fn from_str(string: &str) -> Result<Self, Self::Err> {
    match string {
      "asm" => Ok(Self::Asm),
      "tokens" => Ok(Self::Tokens),
      "ast" => Ok(Self::Ast),
      other => Err(format!("unknown emit kind '{other}' (expected asm, tokens or ast)")),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
  pub dialect: Dialect,
  pub emit: Emit,
}
