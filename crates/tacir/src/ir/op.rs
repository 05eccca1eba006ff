//! Three-address instructions
//!
//! The numeric value of an `OpKind` encodes its arity: kinds in the `0x20`
//! band read two source operands, every other kind reads one. Each band is a
//! contiguous range, so `OpKind::noperands` is a single bit test. Code that
//! walks instructions asks `noperands` (or `Op::sources`) instead of matching
//! on individual kinds.
//!
//! `Op` stores a `UnaryKind` or a `BinaryKind`, which carry the same values as
//! the matching `OpKind`s. An instruction whose kind disagrees with its number
//! of operands cannot be built.

use super::Var;
use std::fmt;
use std::iter;

const BINARY_BAND: u8 = 0x20;

/// Three address code operation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpKind {
    /// param a
    Param = 0x00,
    /// a = b
    Assign = 0x10,
    /// a = *b
    Deref,
    /// a = &b
    Addr,
    /// a = b()
    Call,
    /// a = (T) b
    Cast,
    /// a = ~b
    Not,
    /// a = b + c
    Add = 0x20,
    Sub,
    Mul,
    Div,
    Mod,
    LogicalAnd,
    LogicalOr,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    Shl,
    Shr,
    /// a = b == c
    Eq,
    /// a = b >= c
    Ge,
    /// a = b > c
    Gt,
}

impl OpKind {
    /// Every declared kind, in encoding order
    pub const ALL: [OpKind; 22] = [
        OpKind::Param,
        OpKind::Assign,
        OpKind::Deref,
        OpKind::Addr,
        OpKind::Call,
        OpKind::Cast,
        OpKind::Not,
        OpKind::Add,
        OpKind::Sub,
        OpKind::Mul,
        OpKind::Div,
        OpKind::Mod,
        OpKind::LogicalAnd,
        OpKind::LogicalOr,
        OpKind::BitwiseAnd,
        OpKind::BitwiseOr,
        OpKind::BitwiseXor,
        OpKind::Shl,
        OpKind::Shr,
        OpKind::Eq,
        OpKind::Ge,
        OpKind::Gt,
    ];

    /// Number of source operands: 2 in the binary band, 1 otherwise
    pub const fn noperands(self) -> usize {
        if self as u8 & BINARY_BAND != 0 { 2 } else { 1 }
    }

    pub const fn is_binary(self) -> bool {
        self.noperands() == 2
    }

    /// Kinds of the form `a = op b`
    pub const fn is_unary(self) -> bool {
        !self.is_binary() && !matches!(self, OpKind::Param)
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| *kind as u8 == value)
    }

    /// Operator spelling used in listings
    pub fn symbol(self) -> &'static str {
        match self {
            OpKind::Param => "param",
            OpKind::Assign => "",
            OpKind::Deref => "*",
            OpKind::Addr => "&",
            OpKind::Call => "call",
            OpKind::Cast => "cast",
            OpKind::Not => "~",
            OpKind::Add => "+",
            OpKind::Sub => "-",
            OpKind::Mul => "*",
            OpKind::Div => "/",
            OpKind::Mod => "%",
            OpKind::LogicalAnd => "&&",
            OpKind::LogicalOr => "||",
            OpKind::BitwiseAnd => "&",
            OpKind::BitwiseOr => "|",
            OpKind::BitwiseXor => "^",
            OpKind::Shl => "<<",
            OpKind::Shr => ">>",
            OpKind::Eq => "==",
            OpKind::Ge => ">=",
            OpKind::Gt => ">",
        }
    }
}

/// Arity of an operation kind
pub const fn noperands(kind: OpKind) -> usize {
    kind.noperands()
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Kinds of the single operand band, `a = op b`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum UnaryKind {
    Assign = 0x10,
    Deref,
    Addr,
    Call,
    Cast,
    Not,
}

/// Kinds of the two operand band, `a = b op c`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BinaryKind {
    Add = 0x20,
    Sub,
    Mul,
    Div,
    Mod,
    LogicalAnd,
    LogicalOr,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    Shl,
    Shr,
    Eq,
    Ge,
    Gt,
}

impl From<UnaryKind> for OpKind {
    fn from(kind: UnaryKind) -> Self {
        match kind {
            UnaryKind::Assign => OpKind::Assign,
            UnaryKind::Deref => OpKind::Deref,
            UnaryKind::Addr => OpKind::Addr,
            UnaryKind::Call => OpKind::Call,
            UnaryKind::Cast => OpKind::Cast,
            UnaryKind::Not => OpKind::Not,
        }
    }
}

impl From<BinaryKind> for OpKind {
    fn from(kind: BinaryKind) -> Self {
        match kind {
            BinaryKind::Add => OpKind::Add,
            BinaryKind::Sub => OpKind::Sub,
            BinaryKind::Mul => OpKind::Mul,
            BinaryKind::Div => OpKind::Div,
            BinaryKind::Mod => OpKind::Mod,
            BinaryKind::LogicalAnd => OpKind::LogicalAnd,
            BinaryKind::LogicalOr => OpKind::LogicalOr,
            BinaryKind::BitwiseAnd => OpKind::BitwiseAnd,
            BinaryKind::BitwiseOr => OpKind::BitwiseOr,
            BinaryKind::BitwiseXor => OpKind::BitwiseXor,
            BinaryKind::Shl => OpKind::Shl,
            BinaryKind::Shr => OpKind::Shr,
            BinaryKind::Eq => OpKind::Eq,
            BinaryKind::Ge => OpKind::Ge,
            BinaryKind::Gt => OpKind::Gt,
        }
    }
}

/// Fails with the original kind when it is outside the single operand band
impl TryFrom<OpKind> for UnaryKind {
    type Error = OpKind;

    fn try_from(kind: OpKind) -> Result<Self, OpKind> {
        Ok(match kind {
            OpKind::Assign => UnaryKind::Assign,
            OpKind::Deref => UnaryKind::Deref,
            OpKind::Addr => UnaryKind::Addr,
            OpKind::Call => UnaryKind::Call,
            OpKind::Cast => UnaryKind::Cast,
            OpKind::Not => UnaryKind::Not,
            other => return Err(other),
        })
    }
}

/// Fails with the original kind when it is outside the two operand band
impl TryFrom<OpKind> for BinaryKind {
    type Error = OpKind;

    fn try_from(kind: OpKind) -> Result<Self, OpKind> {
        Ok(match kind {
            OpKind::Add => BinaryKind::Add,
            OpKind::Sub => BinaryKind::Sub,
            OpKind::Mul => BinaryKind::Mul,
            OpKind::Div => BinaryKind::Div,
            OpKind::Mod => BinaryKind::Mod,
            OpKind::LogicalAnd => BinaryKind::LogicalAnd,
            OpKind::LogicalOr => BinaryKind::LogicalOr,
            OpKind::BitwiseAnd => BinaryKind::BitwiseAnd,
            OpKind::BitwiseOr => BinaryKind::BitwiseOr,
            OpKind::BitwiseXor => BinaryKind::BitwiseXor,
            OpKind::Shl => BinaryKind::Shl,
            OpKind::Shr => BinaryKind::Shr,
            OpKind::Eq => BinaryKind::Eq,
            OpKind::Ge => BinaryKind::Ge,
            OpKind::Gt => BinaryKind::Gt,
            other => return Err(other),
        })
    }
}

impl fmt::Display for UnaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&OpKind::from(*self), f)
    }
}

impl fmt::Display for BinaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&OpKind::from(*self), f)
    }
}

/// A three address instruction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op {
    /// Pass `a` as the next call argument
    Param(Var),
    /// `a = op b`
    Unary { kind: UnaryKind, a: Var, b: Var },
    /// `a = b op c`
    Binary { kind: BinaryKind, a: Var, b: Var, c: Var },
}

impl Op {
    pub fn param(a: Var) -> Self {
        Op::Param(a)
    }

    pub fn unary(kind: UnaryKind, a: Var, b: Var) -> Self {
        Op::Unary { kind, a, b }
    }

    pub fn binary(kind: BinaryKind, a: Var, b: Var, c: Var) -> Self {
        Op::Binary { kind, a, b, c }
    }

    pub fn assign(a: Var, b: Var) -> Self {
        Self::unary(UnaryKind::Assign, a, b)
    }

    pub fn deref(a: Var, b: Var) -> Self {
        Self::unary(UnaryKind::Deref, a, b)
    }

    pub fn addr(a: Var, b: Var) -> Self {
        Self::unary(UnaryKind::Addr, a, b)
    }

    pub fn call(a: Var, b: Var) -> Self {
        Self::unary(UnaryKind::Call, a, b)
    }

    pub fn cast(a: Var, b: Var) -> Self {
        Self::unary(UnaryKind::Cast, a, b)
    }

    pub fn not(a: Var, b: Var) -> Self {
        Self::unary(UnaryKind::Not, a, b)
    }

    pub fn kind(&self) -> OpKind {
        match *self {
            Op::Param(_) => OpKind::Param,
            Op::Unary { kind, .. } => kind.into(),
            Op::Binary { kind, .. } => kind.into(),
        }
    }

    /// Destination operand; `param` has none
    pub fn dest(&self) -> Option<&Var> {
        match self {
            Op::Param(_) => None,
            Op::Unary { a, .. } | Op::Binary { a, .. } => Some(a),
        }
    }

    /// Operands read by the instruction, `kind().noperands()` of them
    pub fn sources(&self) -> impl Iterator<Item = &Var> {
        let (first, second) = match self {
            Op::Param(a) => (a, None),
            Op::Unary { b, .. } => (b, None),
            Op::Binary { b, c, .. } => (b, Some(c)),
        };
        iter::once(first).chain(second)
    }
}
