//! Structural checks over a finished control flow graph
//!
//! Construction never validates its inputs. `verify` is the after-the-fact
//! check a driver runs before handing a container to a code generator, or in
//! tests.

use super::{Block, Decl, Quoted, Value, Var};
use crate::common::{IrError, IrResult};
use crate::symbol::SymbolTable;
use crate::types::TypeTable;

/// Check every handle and operand in `decl`
pub fn verify(decl: &Decl, types: &TypeTable, symbols: &SymbolTable) -> IrResult<()> {
    for (which, designated) in [("entry", decl.head()), ("body", decl.body())] {
        match designated {
            Some(target) if !decl.contains(target) => {
                return Err(IrError::DanglingDesignation { which, target });
            }
            None if decl.is_function() => return Err(IrError::MissingEntry { which }),
            _ => {}
        }
    }

    let checker = Checker { types, symbols };
    for (_, block) in decl.blocks() {
        for target in block.successors().into_iter().flatten() {
            if !decl.contains(target) {
                return Err(IrError::unknown_block(block.label(), target));
            }
        }
        checker.check_block(block)?;
    }

    Ok(())
}

struct Checker<'a> {
    types: &'a TypeTable,
    symbols: &'a SymbolTable,
}

impl Checker<'_> {
    fn check_block(&self, block: &Block) -> IrResult<()> {
        for op in block.code() {
            if let Some(dest) = op.dest() {
                if !dest.is_lvalue() {
                    return Err(IrError::assign_to_rvalue(block.label(), op.kind()));
                }
                self.check_var(block, dest)?;
            }
            for source in op.sources() {
                self.check_var(block, source)?;
            }
        }

        if let Some(expr) = block.expr() {
            self.check_var(block, expr)?;
        }
        Ok(())
    }

    fn check_var(&self, block: &Block, var: &Var) -> IrResult<()> {
        let Some(ty) = self.types.try_get(var.ty()) else {
            return Err(IrError::UnknownType {
                block: block.label().to_string(),
                ty: var.ty(),
            });
        };

        match *var {
            Var::Direct { symbol, .. } | Var::Deref { symbol, .. } => {
                let Some(sym) = self.symbols.try_get(symbol) else {
                    return Err(IrError::UnknownSymbol {
                        block: block.label().to_string(),
                        symbol,
                    });
                };
                if !sym.has_storage() {
                    return Err(IrError::no_storage(block.label(), self.symbols.name(symbol)));
                }
                let is_pointer = self.types.try_get(sym.ty).is_some_and(|t| t.is_pointer());
                if matches!(var, Var::Deref { .. }) && !is_pointer {
                    return Err(IrError::deref_non_pointer(
                        block.label(),
                        self.symbols.name(symbol),
                    ));
                }
            }
            Var::Immediate { value, .. } => {
                let fits = match value {
                    Value::Integer(_) => ty.is_integer() || ty.is_pointer(),
                    Value::Real(_) => ty.is_real(),
                    Value::String(_) => ty.is_pointer() || ty.is_array(),
                };
                if !fits {
                    let shown = match value {
                        Value::Integer(n) => n.to_string(),
                        Value::Real(x) => x.to_string(),
                        Value::String(s) => Quoted(self.symbols.string(s)).to_string(),
                    };
                    return Err(IrError::immediate_mismatch(block.label(), shown, ty.to_string()));
                }
            }
        }
        Ok(())
    }
}
