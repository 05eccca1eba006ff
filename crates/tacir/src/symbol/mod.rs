//! Symbol table collaborator
//!
//! Operands and containers refer to symbols through copyable `SymbolId`
//! handles. The table owns the symbols, their interned names, and the pool of
//! string literals that immediate operands point into.

mod table;

pub use table::{StrId, Storage, Symbol, SymbolId, SymbolKind, SymbolTable};
