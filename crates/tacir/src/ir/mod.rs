//! Intermediate representation module
//!
//! Three-address code operands and instructions, basic blocks, and the
//! per-function container that owns the control flow graph.

mod var;
mod op;
mod block;
mod decl;
mod unit;
mod escape;
mod printer;
mod verify;

pub use var::{AddressMode, AddressSpace, Value, Var};
pub use op::{noperands, BinaryKind, Op, OpKind, UnaryKind};
pub use block::{Block, BlockId, Jump};
pub use decl::{Decl, DeclConfig};
pub use unit::TranslationUnit;
pub use escape::{escape_c_string, Quoted};
pub use printer::{Listing, PrintConfig};
pub use verify::verify;
