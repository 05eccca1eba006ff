//! Basic blocks of the control flow graph

use super::{Op, Var};
use std::fmt;

/// Handle to a block owned by a `Decl`.
///
/// Carries the id of the container that created it, so a handle from one
/// container is never mistaken for a block of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId {
    decl: u32,
    index: u32,
}

impl BlockId {
    pub(crate) fn new(decl: u32, index: u32) -> Self {
        Self { decl, index }
    }

    /// Position in the owning container's creation order
    pub fn index(self) -> usize {
        self.index as usize
    }

    /// Id of the owning container
    pub fn decl(self) -> u32 {
        self.decl
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bb{}.{}", self.decl, self.index)
    }
}

/// Successor configuration of a block.
///
/// Encodes the two jump slots `(false, true)`: `(null, null)`, `(x, null)` and
/// `(x, y)`. A true target without a false target cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Jump {
    /// Leave the function, returning `expr` if there is one
    #[default]
    Return,
    /// Continue at the target unconditionally
    Goto(BlockId),
    /// Evaluate `expr`, continue at `if_false` when zero and `if_true` otherwise
    Branch { if_false: BlockId, if_true: BlockId },
}

impl Jump {
    /// The two jump slots, false target first
    pub fn targets(self) -> [Option<BlockId>; 2] {
        match self {
            Jump::Return => [None, None],
            Jump::Goto(next) => [Some(next), None],
            Jump::Branch { if_false, if_true } => [Some(if_false), Some(if_true)],
        }
    }
}

/// A straight-line sequence of instructions with a single exit
#[derive(Debug, Clone)]
pub struct Block {
    label: String,
    code: Vec<Op>,
    expr: Option<Var>,
    jump: Jump,
}

impl Block {
    pub(crate) fn new(label: String) -> Self {
        Self {
            label,
            code: Vec::new(),
            expr: None,
            jump: Jump::Return,
        }
    }

    /// Jump target label, unique within the translation unit
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Instructions in insertion order
    pub fn code(&self) -> &[Op] {
        &self.code
    }

    /// Append an instruction.
    ///
    /// Callers must not append to a block once it has been given a successor
    /// configuration that ends its straight-line code. Blocks start out as
    /// `Jump::Return`, so this is not checked.
    pub fn push(&mut self, op: Op) {
        self.code.push(op);
    }

    /// Branch condition, return value, or the value of the last expression
    /// parsed into this block
    pub fn expr(&self) -> Option<&Var> {
        self.expr.as_ref()
    }

    pub fn set_expr(&mut self, expr: Var) {
        self.expr = Some(expr);
    }

    pub fn clear_expr(&mut self) {
        self.expr = None;
    }

    pub fn jump(&self) -> Jump {
        self.jump
    }

    pub fn set_jump(&mut self, jump: Jump) {
        self.jump = jump;
    }

    pub fn jump_to(&mut self, next: BlockId) {
        self.jump = Jump::Goto(next);
    }

    pub fn branch(&mut self, if_false: BlockId, if_true: BlockId) {
        self.jump = Jump::Branch { if_false, if_true };
    }

    /// Make this a terminal block returning `value`
    pub fn ret(&mut self, value: Option<Var>) {
        self.expr = value;
        self.jump = Jump::Return;
    }

    /// The two jump slots, false target first
    pub fn successors(&self) -> [Option<BlockId>; 2] {
        self.jump.targets()
    }

    pub fn is_terminal(&self) -> bool {
        self.jump == Jump::Return
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}
