//! Recursive-descent parser producing the expression AST.
//!
//! The parser mirrors the classic chibicc structure: one helper per precedence
//! level, each folding its operands into a left-leaning tree. All helpers share
//! a single [`TokenStream`] cursor.

use tracing::debug;

use crate::ast::{BinaryOp, Node};
use crate::error::{CompileError, CompileResult};
use crate::tokenizer::{Token, TokenKind, describe_token, token_text};

/// Parse a complete expression from the token stream.
///
/// Every token before `Eof` must be consumed by the grammar; anything left
/// over is reported at its own location.
pub fn parse(tokens: Vec<Token>, source: &str) -> CompileResult<Node> {
  let mut stream = TokenStream::new(tokens, source);

  if stream.is_eof() {
    return Err(CompileError::parse(0, "expression is empty"));
  }

  let node = parse_expr(&mut stream)?;

  if !stream.is_eof() {
    let (loc, got) = stream.describe_current();
    return Err(CompileError::parse(
      loc,
      format!("unexpected token \"{got}\""),
    ));
  }

  debug!(nodes = node.node_count(), "parsed expression");
  Ok(node)
}

fn parse_expr(stream: &mut TokenStream) -> CompileResult<Node> {
  parse_equality(stream)
}

fn parse_equality(stream: &mut TokenStream) -> CompileResult<Node> {
  let mut node = parse_relational(stream)?;

  loop {
    if stream.equal("==") {
      let rhs = parse_relational(stream)?;
      node = Node::binary(BinaryOp::Eq, node, rhs);
    } else if stream.equal("!=") {
      let rhs = parse_relational(stream)?;
      node = Node::binary(BinaryOp::Ne, node, rhs);
    } else {
      return Ok(node);
    }
  }
}

fn parse_relational(stream: &mut TokenStream) -> CompileResult<Node> {
  let mut node = parse_add(stream)?;

  // `a > b` is `b < a` and `a >= b` is `b <= a`.
  loop {
    if stream.equal("<") {
      let rhs = parse_add(stream)?;
      node = Node::binary(BinaryOp::Lt, node, rhs);
    } else if stream.equal("<=") {
      let rhs = parse_add(stream)?;
      node = Node::binary(BinaryOp::Le, node, rhs);
    } else if stream.equal(">") {
      let lhs = parse_add(stream)?;
      node = Node::binary(BinaryOp::Lt, lhs, node);
    } else if stream.equal(">=") {
      let lhs = parse_add(stream)?;
      node = Node::binary(BinaryOp::Le, lhs, node);
    } else {
      return Ok(node);
    }
  }
}

fn parse_add(stream: &mut TokenStream) -> CompileResult<Node> {
  let mut node = parse_mul(stream)?;

  loop {
    let op = match stream.peek_punctuator() {
      Some("+") => BinaryOp::Add,
      Some("-") => BinaryOp::Sub,
      _ => return Ok(node),
    };

    stream.advance();
    let rhs = parse_mul(stream)?;
    node = Node::binary(op, node, rhs);
  }
}

fn parse_mul(stream: &mut TokenStream) -> CompileResult<Node> {
  let mut node = parse_unary(stream)?;

  loop {
    let op = match stream.peek_punctuator() {
      Some("*") => BinaryOp::Mul,
      Some("/") => BinaryOp::Div,
      _ => return Ok(node),
    };

    stream.advance();
    let rhs = parse_unary(stream)?;
    node = Node::binary(op, node, rhs);
  }
}

fn parse_unary(stream: &mut TokenStream) -> CompileResult<Node> {
  if stream.equal("+") {
    return parse_unary(stream);
  }

  if stream.equal("-") {
    let operand = parse_unary(stream)?;
    return Ok(Node::negate(operand));
  }

  parse_primary(stream)
}

fn parse_primary(stream: &mut TokenStream) -> CompileResult<Node> {
  if stream.equal("(") {
    let node = parse_expr(stream)?;
    stream.skip(")")?;
    return Ok(node);
  }

  let value = stream.get_number()?;
  Ok(Node::number(value))
}

/// Lightweight cursor over the token vector.
struct TokenStream<'a> {
  tokens: Vec<Token>,
  source: &'a str,
  pos: usize,
}

impl<'a> TokenStream<'a> {
  fn new(tokens: Vec<Token>, source: &'a str) -> Self {
    Self {
      tokens,
      source,
      pos: 0,
    }
  }

  fn peek(&self) -> Option<&Token> {
    self.tokens.get(self.pos)
  }

  /// Text of the current token when it is a punctuator.
  fn peek_punctuator(&self) -> Option<&'a str> {
    let source = self.source;
    self
      .peek()
      .filter(|token| token.kind == TokenKind::Punctuator)
      .map(|token| token_text(token, source))
  }

  fn advance(&mut self) {
    if self.pos < self.tokens.len() {
      self.pos += 1;
    }
  }

  /// Consume the current token if it matches the provided punctuator.
  fn equal(&mut self, op: &str) -> bool {
    if self.peek_punctuator() == Some(op) {
      self.pos += 1;
      return true;
    }
    false
  }

  fn skip(&mut self, s: &str) -> CompileResult<()> {
    if self.equal(s) {
      return Ok(());
    }

    let (loc, got) = self.describe_current();
    Err(CompileError::parse(
      loc,
      format!("expected \"{s}\", but got \"{got}\""),
    ))
  }

  /// Consume the current token as an integer literal and return its value.
  fn get_number(&mut self) -> CompileResult<i64> {
    if let Some(Token {
      kind: TokenKind::Num,
      value: Some(value),
      ..
    }) = self.peek()
    {
      let value = *value;
      self.pos += 1;
      return Ok(value);
    }

    let (loc, got) = self.describe_current();
    Err(CompileError::parse(
      loc,
      format!("expected a number, but got \"{got}\""),
    ))
  }

  fn describe_current(&self) -> (usize, String) {
    match self.peek() {
      Some(token) => (token.loc, describe_token(Some(token), self.source)),
      None => (self.source.len(), "EOF".to_string()),
    }
  }

  fn is_eof(&self) -> bool {
    matches!(self.peek().map(|token| token.kind), Some(TokenKind::Eof) | None)
  }
}
