//! tacir - three-address code IR for a C compiler
//!
//! This library holds the layer between a C front end and a code generator:
//! operands, three-address instructions, basic blocks and the per-function
//! control flow graph, built incrementally while parsing and walked later by
//! a back end.
//!
//! ## Architecture
//!
//! The crate is organized into:
//! - **IR** (`ir/`): operands, instructions, blocks, containers, printing
//!   and verification
//! - **Types** (`types/`): the type tree operands refer to
//! - **Symbols** (`symbol/`): the symbol table operands refer to
//! - **Common** (`common/`): errors and diagnostics

pub mod common;
pub mod types;
pub mod symbol;
pub mod ir;

// Re-exports for convenience
pub use common::{DiagnosticReporter, IrError, IrResult};
pub use ir::{BinaryKind, Block, BlockId, Decl, Jump, Op, OpKind, TranslationUnit, UnaryKind, Value, Var};
pub use symbol::{SymbolId, SymbolTable};
pub use types::{TypeId, TypeTable};
