//! Type tree collaborator for the IR
//!
//! Types are owned by a `TypeTable` and referenced from operands through
//! copyable `TypeId` handles.

mod ir_type;
mod table;

pub use ir_type::{IrType, IrTypeKind};
pub use table::{TypeId, TypeTable};
