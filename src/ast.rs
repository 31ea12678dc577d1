//! Expression tree produced by the parser and consumed by code generation.
//!
//! Every node is either a literal leaf or a binary operation that owns both of
//! its operands. Unary minus, unary plus and the "greater" comparisons are
//! desugared by the parser, so they have no variants here.

/// Binary operators that survive parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Div,
  Eq,
  Ne,
  Lt,
  Le,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
  Num {
    value: i64,
  },
  Binary {
    op: BinaryOp,
    lhs: Box<Node>,
    rhs: Box<Node>,
  },
}

impl Node {
  pub fn number(value: i64) -> Self {
    Self::Num { value }
  }

  pub fn binary(op: BinaryOp, lhs: Node, rhs: Node) -> Self {
    Self::Binary {
      op,
      lhs: Box::new(lhs),
      rhs: Box::new(rhs),
    }
  }

  /// `-x` is represented as `0 - x`.
  pub fn negate(operand: Node) -> Self {
    Self::binary(BinaryOp::Sub, Self::number(0), operand)
  }

  /// Number of nodes in the tree rooted here.
  pub fn node_count(&self) -> usize {
    match self {
      Self::Num { .. } => 1,
      Self::Binary { lhs, rhs, .. } => 1 + lhs.node_count() + rhs.node_count(),
    }
  }
}
