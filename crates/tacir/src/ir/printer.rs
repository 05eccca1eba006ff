//! Human readable three address code listings

use super::{Block, BlockId, Decl, Jump, Op, Quoted, UnaryKind, Value, Var};
use crate::symbol::{SymbolId, SymbolTable};
use crate::types::{TypeId, TypeTable};
use std::fmt;

/// Listing options
#[derive(Debug, Clone)]
pub struct PrintConfig {
    /// Append `:type` to every operand
    pub show_types: bool,
    /// Print blocks not reachable from `head` after the reachable ones
    pub show_unreachable: bool,
    /// Spaces before each instruction
    pub indent: usize,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            show_types: false,
            show_unreachable: true,
            indent: 2,
        }
    }
}

/// Display adapter rendering a container as a three address code listing
pub struct Listing<'a> {
    decl: &'a Decl,
    types: &'a TypeTable,
    symbols: &'a SymbolTable,
    config: PrintConfig,
}

impl<'a> Listing<'a> {
    pub fn new(decl: &'a Decl, types: &'a TypeTable, symbols: &'a SymbolTable) -> Self {
        Self {
            decl,
            types,
            symbols,
            config: PrintConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PrintConfig) -> Self {
        self.config = config;
        self
    }

    /// Blocks in listing order: reachable from `head` first, then the rest in
    /// creation order if configured
    fn order(&self) -> Vec<BlockId> {
        let mut order = self.decl.reachable();
        if self.config.show_unreachable {
            let mut seen = vec![false; self.decl.num_blocks()];
            for id in &order {
                seen[id.index()] = true;
            }
            order.extend(self.decl.blocks().map(|(id, _)| id).filter(|id| !seen[id.index()]));
        }
        order
    }

    fn label(&self, id: BlockId) -> String {
        match self.decl.try_block(id) {
            Some(block) => block.label().to_string(),
            None => id.to_string(),
        }
    }

    fn symbol(&self, id: SymbolId) -> SymbolName<'_> {
        SymbolName { symbols: self.symbols, id }
    }

    fn ty(&self, id: TypeId) -> TypeName<'_> {
        TypeName { types: self.types, id }
    }

    fn write_var(&self, f: &mut fmt::Formatter<'_>, var: &Var) -> fmt::Result {
        match *var {
            Var::Direct { symbol, offset: 0, .. } => write!(f, "{}", self.symbol(symbol))?,
            Var::Direct { symbol, offset, .. } => {
                write!(f, "*(&{}{})", self.symbol(symbol), Displacement(offset))?;
            }
            Var::Deref { symbol, offset: 0, .. } => write!(f, "*{}", self.symbol(symbol))?,
            Var::Deref { symbol, offset, .. } => {
                write!(f, "*({}{})", self.symbol(symbol), Displacement(offset))?;
            }
            Var::Immediate { value: Value::Integer(n), .. } => write!(f, "{}", n)?,
            Var::Immediate { value: Value::Real(x), .. } => write!(f, "{:?}", x)?,
            Var::Immediate { value: Value::String(s), .. } => {
                write!(f, "{}", Quoted(self.symbols.string(s)))?;
            }
        }
        if self.config.show_types {
            write!(f, ":{}", self.ty(var.ty()))?;
        }
        Ok(())
    }

    fn write_op(&self, f: &mut fmt::Formatter<'_>, op: &Op) -> fmt::Result {
        write!(f, "{:indent$}", "", indent = self.config.indent)?;
        match op {
            Op::Param(a) => {
                write!(f, "param ")?;
                self.write_var(f, a)?;
            }
            Op::Unary { kind, a, b } => {
                self.write_var(f, a)?;
                write!(f, " = ")?;
                match kind {
                    UnaryKind::Call => write!(f, "call ")?,
                    UnaryKind::Cast => write!(f, "({}) ", self.ty(a.ty()))?,
                    _ => write!(f, "{}", kind)?,
                }
                self.write_var(f, b)?;
            }
            Op::Binary { kind, a, b, c } => {
                self.write_var(f, a)?;
                write!(f, " = ")?;
                self.write_var(f, b)?;
                write!(f, " {} ", kind)?;
                self.write_var(f, c)?;
            }
        }
        writeln!(f)
    }

    fn write_block(&self, f: &mut fmt::Formatter<'_>, id: BlockId, block: &Block) -> fmt::Result {
        write!(f, "{}:", block.label())?;
        if self.decl.body() == Some(id) && self.decl.head() != Some(id) {
            write!(f, "  ; body")?;
        }
        writeln!(f)?;

        for op in block.code() {
            self.write_op(f, op)?;
        }

        write!(f, "{:indent$}", "", indent = self.config.indent)?;
        match block.jump() {
            Jump::Return => {
                write!(f, "return")?;
                if let Some(expr) = block.expr() {
                    write!(f, " ")?;
                    self.write_var(f, expr)?;
                }
            }
            Jump::Goto(next) => write!(f, "goto {}", self.label(next))?,
            Jump::Branch { if_false, if_true } => {
                write!(f, "if ")?;
                match block.expr() {
                    Some(expr) => self.write_var(f, expr)?,
                    None => write!(f, "?")?,
                }
                write!(f, " goto {} else {}", self.label(if_true), self.label(if_false))?;
            }
        }
        writeln!(f)
    }
}

/// Symbol name, or the raw handle when the table does not know it
struct SymbolName<'a> {
    symbols: &'a SymbolTable,
    id: SymbolId,
}

impl fmt::Display for SymbolName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbols.try_name(self.id) {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Type text, or the raw handle when the table does not know it
struct TypeName<'a> {
    types: &'a TypeTable,
    id: TypeId,
}

impl fmt::Display for TypeName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.types.try_get(self.id) {
            Some(ty) => write!(f, "{}", ty),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Signed byte offset printed as ` + n` or ` - n`
struct Displacement(i32);

impl fmt::Display for Displacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, " - {}", self.0.unsigned_abs())
        } else {
            write!(f, " + {}", self.0)
        }
    }
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.decl.fun() {
            Some(fun) => writeln!(f, "function {}:", self.symbol(fun))?,
            None => writeln!(f, "declarations:")?,
        }

        if !self.decl.params().is_empty() {
            write!(f, "; params:")?;
            for param in self.decl.params() {
                write!(f, " {}", self.symbol(*param))?;
            }
            writeln!(f)?;
        }
        if !self.decl.locals().is_empty() {
            write!(f, "; locals:")?;
            for local in self.decl.locals() {
                write!(f, " {}", self.symbol(*local))?;
            }
            writeln!(f, " ({} bytes)", self.decl.locals_size())?;
        }

        for id in self.order() {
            self.write_block(f, id, self.decl.block(id))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::BinaryKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_function_listing() {
        let mut types = TypeTable::new();
        let mut symbols = SymbolTable::new();
        let int = types.int();
        let int_ptr = types.pointer_to(int);
        let main = symbols.global("main", int);
        let n = symbols.local("n", int);
        let p = symbols.local("p", int_ptr);
        let t = symbols.temporary(int);

        let mut decl = Decl::function(main);
        decl.add_param(n);
        decl.add_local(p, &types, &symbols);
        decl.add_local(t, &types, &symbols);

        let head = decl.create_block();
        let body = decl.create_block();
        let then = decl.create_block();
        let exit = decl.create_block();
        decl.set_head(head);
        decl.set_body(body);
        decl.link(head, body, None);

        decl.append(body, Op::addr(Var::direct(int_ptr, p), Var::direct(int, n)));
        decl.append(body, Op::binary(BinaryKind::Gt, Var::direct(int, t), Var::deref(int, p, 0), Var::int(int, 3)));
        decl.set_expr(body, Var::direct(int, t));
        decl.link(body, exit, Some(then));

        decl.append(then, Op::assign(Var::deref(int, p, 4), Var::int(int, -1)));
        decl.link(then, exit, None);
        decl.set_return(exit, Some(Var::direct(int, n)));

        let text = Listing::new(&decl, &types, &symbols).to_string();
        assert_eq!(
            text,
            "function main:\n\
             ; params: n\n\
             ; locals: p .t0 (12 bytes)\n\
             .L0:\n  goto .L1\n\
             .L1:  ; body\n  p = &n\n  .t0 = *p > 3\n  if .t0 goto .L2 else .L3\n\
             .L3:\n  return n\n\
             .L2:\n  *(p + 4) = -1\n  goto .L3\n"
        );
    }

    #[test]
    fn test_operand_forms_and_types() {
        let mut types = TypeTable::new();
        let mut symbols = SymbolTable::new();
        let long = types.long();
        let char_ptr = types.pointer_to(types.char());
        let s = symbols.local("s", char_ptr);
        let x = symbols.local("x", long);
        let hello = symbols.intern_string("a \"b\"\n");

        let mut decl = Decl::new();
        let head = decl.create_block();
        decl.set_head(head);
        decl.append(head, Op::assign(Var::direct(char_ptr, s), Var::string(char_ptr, hello)));
        decl.append(head, Op::cast(Var::direct_at(types.int(), x, -4), Var::real(types.double(), 2.0)));
        decl.append(head, Op::param(Var::direct_at(long, x, 8)));

        let config = PrintConfig {
            show_types: true,
            ..PrintConfig::default()
        };
        let text = Listing::new(&decl, &types, &symbols).with_config(config).to_string();
        assert_eq!(
            text,
            "declarations:\n\
             .L0:\n  s:char * = \"a \\\"b\\\"\\n\":char *\n  \
             *(&x - 4):int = (int) 2.0:double\n  \
             param *(&x + 8):long\n  \
             return\n"
        );
    }

    #[test]
    fn test_string_bytes_outside_ascii() {
        let mut types = TypeTable::new();
        let mut symbols = SymbolTable::new();
        let char_ptr = types.pointer_to(types.char());
        let text = symbols.intern_string(b"\xff\x01ok\x7f");

        let mut decl = Decl::new();
        let head = decl.create_block();
        decl.set_head(head);
        decl.append(head, Op::param(Var::string(char_ptr, text)));

        let listing = Listing::new(&decl, &types, &symbols).to_string();
        assert_eq!(listing, "declarations:\n.L0:\n  param \"\\377\\001ok\\177\"\n  return\n");
    }

    #[test]
    fn test_unknown_handles_print_raw() {
        let types = TypeTable::new();
        let symbols = SymbolTable::new();

        let mut decl = Decl::function(SymbolId(7));
        let head = decl.create_block();
        decl.set_head(head);
        decl.append(head, Op::param(Var::direct(TypeId(40), SymbolId(3))));

        let config = PrintConfig {
            show_types: true,
            ..PrintConfig::default()
        };
        let listing = Listing::new(&decl, &types, &symbols).with_config(config).to_string();
        assert_eq!(listing, "function sym7:\n.L0:\n  param sym3:ty40\n  return\n");
    }

    #[test]
    fn test_unreachable_blocks() {
        let types = TypeTable::new();
        let symbols = SymbolTable::new();
        let mut decl = Decl::new();
        let head = decl.create_block();
        let _dead = decl.create_block();
        decl.set_head(head);

        let shown = Listing::new(&decl, &types, &symbols).to_string();
        assert!(shown.contains(".L1:"));

        let config = PrintConfig {
            show_unreachable: false,
            ..PrintConfig::default()
        };
        let hidden = Listing::new(&decl, &types, &symbols).with_config(config).to_string();
        assert!(!hidden.contains(".L1:"));
    }
}
