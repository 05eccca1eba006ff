//! Symbol storage and string interning

use crate::types::TypeId;
use std::collections::HashMap;
use std::fmt;
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Handle to a symbol in a `SymbolTable`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sym{}", self.0)
    }
}

/// Handle to an interned string literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrId(u32);

/// Where a symbol lives at run time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// No storage: typedef names and enumeration constants
    None,
    Static,
    Extern,
    /// Stack slot in the enclosing function
    Automatic,
}

/// What the declaration introduced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Definition,
    Tentative,
    Declaration,
    Typedef,
    EnumConstant(i64),
}

/// A symbol in the symbol table
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: DefaultSymbol,
    pub ty: TypeId,
    pub storage: Storage,
    pub kind: SymbolKind,
}

impl Symbol {
    /// Whether the symbol denotes an addressable location
    pub fn has_storage(&self) -> bool {
        self.storage != Storage::None
    }
}

/// Owns symbols, their names, and string literal contents.
///
/// Literal contents are raw bytes: C string data need not be UTF-8.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    names: DefaultStringInterner,
    literals: Vec<Box<[u8]>>,
    literal_ids: HashMap<Box<[u8]>, StrId>,
    temp_counter: u32,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol. Redeclaration rules belong to the front end; every call
    /// creates a new entry.
    pub fn declare(
        &mut self,
        name: &str,
        ty: TypeId,
        storage: Storage,
        kind: SymbolKind,
    ) -> SymbolId {
        let name = self.names.get_or_intern(name);
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol { name, ty, storage, kind });
        id
    }

    /// Automatic variable definition
    pub fn local(&mut self, name: &str, ty: TypeId) -> SymbolId {
        self.declare(name, ty, Storage::Automatic, SymbolKind::Definition)
    }

    /// Definition with external linkage
    pub fn global(&mut self, name: &str, ty: TypeId) -> SymbolId {
        self.declare(name, ty, Storage::Extern, SymbolKind::Definition)
    }

    /// Compiler-generated temporary with automatic storage, named `.t<n>`
    pub fn temporary(&mut self, ty: TypeId) -> SymbolId {
        let name = format!(".t{}", self.temp_counter);
        self.temp_counter += 1;
        self.local(&name, ty)
    }

    /// Most recently declared symbol with the given name
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        let name = self.names.get(name)?;
        self.symbols
            .iter()
            .rposition(|sym| sym.name == name)
            .map(|index| SymbolId(index as u32))
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    pub fn try_get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    pub fn name(&self, id: SymbolId) -> &str {
        self.names.resolve(self.get(id).name).unwrap_or("<anon>")
    }

    /// Name of a symbol that may not belong to this table
    pub fn try_name(&self, id: SymbolId) -> Option<&str> {
        self.names.resolve(self.try_get(id)?.name)
    }

    /// Intern the contents of a string literal, without the terminating NUL
    pub fn intern_string(&mut self, contents: impl AsRef<[u8]>) -> StrId {
        let contents = contents.as_ref();
        if let Some(id) = self.literal_ids.get(contents) {
            return *id;
        }
        let id = StrId(self.literals.len() as u32);
        self.literals.push(contents.into());
        self.literal_ids.insert(contents.into(), id);
        id
    }

    /// Literal contents; empty for a handle from another table
    pub fn string(&self, id: StrId) -> &[u8] {
        self.literals.get(id.0 as usize).map_or(&[][..], |bytes| &bytes[..])
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
