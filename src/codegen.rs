//! Code generation: lower the expression tree into x86-64 assembly.
//!
//! The emitter is a plain stack machine. Every node leaves exactly one value
//! on the hardware stack; binary nodes pop their two operands into `rax` and
//! `rdi`, combine them into `rax` and push the result back.

use std::{fmt, str::FromStr};

use tracing::debug;

use crate::ast::{BinaryOp, Node};

/// Assembly syntax understood by the GNU assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
  /// `.intel_syntax noprefix`, destination operand first.
  #[default]
  Intel,
  /// AT&T syntax with `%` registers and `$` immediates, source operand first.
  Att,
}

impl fmt::Display for Dialect {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Intel => f.write_str("intel"),
      Self::Att => f.write_str("att"),
    }
  }
}

impl FromStr for Dialect {
  type Err = String;

  fn from_str(string: &str) -> Result<Self, Self::Err> {
    match string {
      "intel" => Ok(Self::Intel),
      "att" => Ok(Self::Att),
      other => Err(format!("unknown syntax '{other}' (expected intel or att)")),
    }
  }
}

impl Dialect {
  fn reg(self, name: &str) -> String {
    match self {
      Self::Intel => name.to_string(),
      Self::Att => format!("%{name}"),
    }
  }

  fn imm(self, value: i64) -> String {
    match self {
      Self::Intel => value.to_string(),
      Self::Att => format!("${value}"),
    }
  }

  /// Render a two-operand instruction given in Intel operand order.
  fn two(self, mnemonic: &str, dst: &str, src: &str) -> String {
    match self {
      Self::Intel => format!("{mnemonic} {dst}, {src}"),
      Self::Att => format!("{mnemonic} {src}, {dst}"),
    }
  }

  fn zero_extend_al(self) -> String {
    match self {
      Self::Intel => "movzx eax, al".to_string(),
      Self::Att => "movzbl %al, %eax".to_string(),
    }
  }
}

/// Emit the stack-machine instructions for `root`, one instruction per line.
///
/// When the listing runs, it leaves the value of the expression on top of the
/// stack. Popping that value is left to the caller.
pub fn generate(root: &Node, dialect: Dialect) -> Vec<String> {
  let mut emitter = Emitter {
    dialect,
    lines: Vec::new(),
  };
  emitter.emit_expr(root);
  emitter.lines
}

/// Emit a complete program whose `main` returns the value of `root`.
pub fn emit_program(root: &Node, dialect: Dialect) -> String {
  let body = generate(root, dialect);
  debug!(%dialect, instructions = body.len(), "generated code");

  let mut asm = String::new();
  if dialect == Dialect::Intel {
    asm.push_str(".intel_syntax noprefix\n");
  }
  asm.push_str(".globl main\n");
  asm.push_str("main:\n");

  for line in &body {
    asm.push_str("    ");
    asm.push_str(line);
    asm.push('\n');
  }

  asm.push_str(&format!("    pop {}\n", dialect.reg("rax")));
  asm.push_str("    ret\n");
  asm
}

struct Emitter {
  dialect: Dialect,
  lines: Vec<String>,
}

impl Emitter {
  fn push_line(&mut self, line: String) {
    self.lines.push(line);
  }

  fn emit_expr(&mut self, node: &Node) {
    match node {
      Node::Num { value } => self.emit_push_imm(*value),
      Node::Binary { op, lhs, rhs } => {
        self.emit_expr(lhs);
        self.emit_expr(rhs);

        let d = self.dialect;
        let (rax, rdi) = (d.reg("rax"), d.reg("rdi"));
        self.push_line(format!("pop {rdi}"));
        self.push_line(format!("pop {rax}"));
        self.emit_op(*op, &rax, &rdi);
        self.push_line(format!("push {rax}"));
      }
    }
  }

  fn emit_push_imm(&mut self, value: i64) {
    let d = self.dialect;
    // `push` only encodes a sign-extended 32-bit immediate.
    if i32::try_from(value).is_ok() {
      self.push_line(format!("push {}", d.imm(value)));
      return;
    }

    let rax = d.reg("rax");
    let mnemonic = match d {
      Dialect::Intel => "mov",
      Dialect::Att => "movabs",
    };
    self.push_line(d.two(mnemonic, &rax, &d.imm(value)));
    self.push_line(format!("push {rax}"));
  }

  /// Combine `rax` (left operand) and `rdi` (right operand) into `rax`.
  fn emit_op(&mut self, op: BinaryOp, rax: &str, rdi: &str) {
    let d = self.dialect;
    match op {
      BinaryOp::Add => self.push_line(d.two("add", rax, rdi)),
      BinaryOp::Sub => self.push_line(d.two("sub", rax, rdi)),
      BinaryOp::Mul => self.push_line(d.two("imul", rax, rdi)),
      BinaryOp::Div => {
        self.push_line("cqo".to_string());
        self.push_line(format!("idiv {rdi}"));
      }
      BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le => {
        let set = match op {
          BinaryOp::Eq => "sete",
          BinaryOp::Ne => "setne",
          BinaryOp::Lt => "setl",
          _ => "setle",
        };
        self.push_line(d.two("cmp", rax, rdi));
        self.push_line(format!("{set} {}", d.reg("al")));
        self.push_line(d.zero_extend_al());
      }
    }
  }
}
