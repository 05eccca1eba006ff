//! Operands of three-address instructions

use crate::symbol::{StrId, SymbolId};
use crate::types::TypeId;

/// Immediate value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Integer(i64),
    Real(f64),
    /// String literal, owned by the symbol table's literal pool
    String(StrId),
}

/// Addressing mode of an operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    Direct,
    Deref,
    Immediate,
}

/// A reference to some storage location or a constant.
///
/// Offsets are in bytes, never scaled by element size. Callers indexing into
/// arrays or structs multiply before constructing the operand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Var {
    /// `*(&symbol + offset)`. The symbol must have storage.
    Direct {
        ty: TypeId,
        symbol: SymbolId,
        offset: i32,
        lvalue: bool,
    },
    /// `*(symbol + offset)`. The symbol must have pointer type.
    Deref {
        ty: TypeId,
        symbol: SymbolId,
        offset: i32,
        lvalue: bool,
    },
    /// Constant of type `ty`. Never an lvalue.
    Immediate { ty: TypeId, value: Value },
}

/// Run-time view of memory used to resolve operand addresses
pub trait AddressSpace {
    /// Address of the storage allocated to `symbol`
    fn base_address(&self, symbol: SymbolId) -> u64;

    /// Pointer value currently held in `symbol`
    fn pointer_value(&self, symbol: SymbolId) -> u64;
}

impl Var {
    /// Lvalue reference to a symbol's storage
    pub fn direct(ty: TypeId, symbol: SymbolId) -> Self {
        Self::direct_at(ty, symbol, 0)
    }

    /// Lvalue reference `offset` bytes into a symbol's storage
    pub fn direct_at(ty: TypeId, symbol: SymbolId, offset: i32) -> Self {
        Var::Direct { ty, symbol, offset, lvalue: true }
    }

    /// Lvalue reference through the pointer held in `symbol`
    pub fn deref(ty: TypeId, symbol: SymbolId, offset: i32) -> Self {
        Var::Deref { ty, symbol, offset, lvalue: true }
    }

    pub fn immediate(ty: TypeId, value: Value) -> Self {
        Var::Immediate { ty, value }
    }

    pub fn int(ty: TypeId, value: i64) -> Self {
        Self::immediate(ty, Value::Integer(value))
    }

    pub fn real(ty: TypeId, value: f64) -> Self {
        Self::immediate(ty, Value::Real(value))
    }

    pub fn string(ty: TypeId, value: StrId) -> Self {
        Self::immediate(ty, Value::String(value))
    }

    /// The same location, read as a value
    pub fn rvalue(self) -> Self {
        match self {
            Var::Direct { ty, symbol, offset, .. } => Var::Direct { ty, symbol, offset, lvalue: false },
            Var::Deref { ty, symbol, offset, .. } => Var::Deref { ty, symbol, offset, lvalue: false },
            imm @ Var::Immediate { .. } => imm,
        }
    }

    /// Reinterpret the operand as another type without moving it
    pub fn with_type(self, ty: TypeId) -> Self {
        match self {
            Var::Direct { symbol, offset, lvalue, .. } => Var::Direct { ty, symbol, offset, lvalue },
            Var::Deref { symbol, offset, lvalue, .. } => Var::Deref { ty, symbol, offset, lvalue },
            Var::Immediate { value, .. } => Var::Immediate { ty, value },
        }
    }

    pub fn mode(&self) -> AddressMode {
        match self {
            Var::Direct { .. } => AddressMode::Direct,
            Var::Deref { .. } => AddressMode::Deref,
            Var::Immediate { .. } => AddressMode::Immediate,
        }
    }

    pub fn ty(&self) -> TypeId {
        match self {
            Var::Direct { ty, .. } | Var::Deref { ty, .. } | Var::Immediate { ty, .. } => *ty,
        }
    }

    /// Referenced symbol; `None` exactly for immediates
    pub fn symbol(&self) -> Option<SymbolId> {
        match self {
            Var::Direct { symbol, .. } | Var::Deref { symbol, .. } => Some(*symbol),
            Var::Immediate { .. } => None,
        }
    }

    pub fn offset(&self) -> i32 {
        match self {
            Var::Direct { offset, .. } | Var::Deref { offset, .. } => *offset,
            Var::Immediate { .. } => 0,
        }
    }

    pub fn value(&self) -> Option<Value> {
        match self {
            Var::Immediate { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn is_lvalue(&self) -> bool {
        match self {
            Var::Direct { lvalue, .. } | Var::Deref { lvalue, .. } => *lvalue,
            Var::Immediate { .. } => false,
        }
    }

    pub fn is_immediate(&self) -> bool {
        matches!(self, Var::Immediate { .. })
    }

    /// Address the operand reads from or writes to. Immediates have none.
    pub fn effective_address(&self, space: &impl AddressSpace) -> Option<u64> {
        match *self {
            Var::Direct { symbol, offset, .. } => {
                Some(space.base_address(symbol).wrapping_add_signed(i64::from(offset)))
            }
            Var::Deref { symbol, offset, .. } => {
                Some(space.pointer_value(symbol).wrapping_add_signed(i64::from(offset)))
            }
            Var::Immediate { .. } => None,
        }
    }
}
