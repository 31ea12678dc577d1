//! A tiny interpreter for the listings produced by the code generator.
//!
//! It understands just enough of both assembler dialects to run the
//! stack-machine subset `exprcc` emits, which lets the tests check the value an
//! expression evaluates to without assembling anything.

use exprcc::{Dialect, Options};

#[derive(Default)]
struct Machine {
  stack: Vec<i64>,
  rax: i64,
  rdi: i64,
  flags: Option<(i64, i64)>,
}

impl Machine {
  fn read(&self, operand: &str) -> i64 {
    match operand {
      "rax" => self.rax,
      "rdi" => self.rdi,
      imm => imm
        .parse()
        .unwrap_or_else(|_| panic!("unknown operand {imm:?}")),
    }
  }

  fn write(&mut self, operand: &str, value: i64) {
    match operand {
      "rax" => self.rax = value,
      "rdi" => self.rdi = value,
      other => panic!("cannot write to {other:?}"),
    }
  }

  fn compare(&self, pick: fn(i64, i64) -> bool) -> i64 {
    let (lhs, rhs) = self.flags.expect("set without a preceding cmp");
    i64::from(pick(lhs, rhs))
  }

  fn set_al(&mut self, bit: i64) {
    self.rax = (self.rax & !0xff) | bit;
  }

  /// Execute one instruction; returns the result once `ret` is reached.
  fn step(&mut self, mnemonic: &str, ops: &[&str]) -> Option<i64> {
    match (mnemonic, ops) {
      ("push", [src]) => {
        let value = self.read(src);
        self.stack.push(value);
      }
      ("pop", [dst]) => {
        let value = self.stack.pop().expect("pop from empty stack");
        self.write(dst, value);
      }
      ("mov" | "movabs", [dst, src]) => self.write(dst, self.read(src)),
      ("add", [dst, src]) => self.write(dst, self.read(dst).wrapping_add(self.read(src))),
      ("sub", [dst, src]) => self.write(dst, self.read(dst).wrapping_sub(self.read(src))),
      ("imul", [dst, src]) => self.write(dst, self.read(dst).wrapping_mul(self.read(src))),
      ("cqo", []) => {}
      ("idiv", [src]) => self.rax = self.rax.wrapping_div(self.read(src)),
      ("cmp", [lhs, rhs]) => self.flags = Some((self.read(lhs), self.read(rhs))),
      ("sete", ["al"]) => self.set_al(self.compare(|a, b| a == b)),
      ("setne", ["al"]) => self.set_al(self.compare(|a, b| a != b)),
      ("setl", ["al"]) => self.set_al(self.compare(|a, b| a < b)),
      ("setle", ["al"]) => self.set_al(self.compare(|a, b| a <= b)),
      ("movzx" | "movzbl", ["eax", "al"]) => self.rax &= 0xff,
      ("ret", []) => {
        assert!(self.stack.is_empty(), "stack not balanced: {:?}", self.stack);
        return Some(self.rax);
      }
      _ => panic!("unsupported instruction: {mnemonic} {ops:?}"),
    }
    None
  }
}

/// Run an assembly listing and return the value `main` returns.
pub fn run(asm: &str) -> i64 {
  let mut machine = Machine::default();

  for line in asm.lines().map(str::trim) {
    if line.is_empty() || line.starts_with('.') || line.ends_with(':') {
      continue;
    }

    let (mnemonic, rest) = line.split_once(' ').unwrap_or((line, ""));
    let att = rest.contains('%') || rest.contains('$');
    let mut ops: Vec<&str> = rest
      .split(',')
      .map(str::trim)
      .filter(|op| !op.is_empty())
      .map(|op| op.trim_start_matches(['%', '$']))
      .collect();
    if att {
      // AT&T lists the source operand first.
      ops.reverse();
    }

    if let Some(result) = machine.step(mnemonic, &ops) {
      return result;
    }
  }

  panic!("listing ended without ret");
}

/// Compile `expr` in the given dialect and run it.
pub fn eval_with(expr: &str, dialect: Dialect) -> i64 {
  let options = Options {
    dialect,
    ..Options::default()
  };
  let asm = exprcc::compile(expr, &options)
    .unwrap_or_else(|err| panic!("failed to compile {expr:?}:\n{}", err.render(expr)));
  run(&asm)
}

/// Compile `expr` as Intel syntax, run it, and check AT&T agrees.
pub fn eval(expr: &str) -> i64 {
  let intel = eval_with(expr, Dialect::Intel);
  let att = eval_with(expr, Dialect::Att);
  assert_eq!(intel, att, "dialects disagree on {expr:?}");
  intel
}
