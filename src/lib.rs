//! Crate root: wires together the compilation pipeline.
//!
//! - `tokenizer` performs lexical analysis and produces a flat token stream.
//! - `parser` owns all syntactic knowledge and returns the expression tree.
//! - `ast` defines that tree.
//! - `codegen` lowers the tree into x86-64 stack-machine assembly.
//! - `error` centralises the diagnostics shared by the other modules.
//! - `config` selects the dialect and the artifact to produce.

pub mod ast;
pub mod codegen;
pub mod config;
pub mod error;
pub mod parser;
pub mod tokenizer;

pub use ast::{BinaryOp, Node};
pub use codegen::Dialect;
pub use config::{Emit, Options};
pub use error::{CompileError, CompileResult};

/// Tokenize and parse `expr` into its expression tree.
pub fn parse_expression(expr: &str) -> CompileResult<Node> {
  let tokens = tokenizer::tokenize(expr)?;
  parser::parse(tokens, expr)
}

/// Compile a source string into Intel-syntax assembly.
pub fn generate_assembly(expr: &str) -> CompileResult<String> {
  compile(expr, &Options::default())
}

/// Run the pipeline as far as `options.emit` requires and render the result.
pub fn compile(expr: &str, options: &Options) -> CompileResult<String> {
  match options.emit {
    Emit::Tokens => {
      let tokens = tokenizer::tokenize(expr)?;
      Ok(
        tokens
          .iter()
          .map(|token| {
            let text = tokenizer::describe_token(Some(token), expr);
            format!("{:?} {text} @{}\n", token.kind, token.loc)
          })
          .collect(),
      )
    }
    Emit::Ast => {
      let node = parse_expression(expr)?;
      Ok(format!("{node:#?}\n"))
    }
    Emit::Asm => {
      let node = parse_expression(expr)?;
      Ok(codegen::emit_program(&node, options.dialect))
    }
  }
}
