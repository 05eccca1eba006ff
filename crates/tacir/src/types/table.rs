//! Type interning
//!
//! Operands refer to types by `TypeId`. Equal types intern to the same
//! handle, so handle equality is type equality.

use super::IrType;
use std::collections::HashMap;
use std::fmt;

/// Handle to an interned type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ty{}", self.0)
    }
}

/// Owns every type node referenced from the IR
#[derive(Debug)]
pub struct TypeTable {
    types: Vec<IrType>,
    ids: HashMap<IrType, TypeId>,
    void: TypeId,
    char: TypeId,
    int: TypeId,
    long: TypeId,
    double: TypeId,
}

impl TypeTable {
    pub fn new() -> Self {
        let mut table = Self {
            types: Vec::new(),
            ids: HashMap::new(),
            void: TypeId(0),
            char: TypeId(0),
            int: TypeId(0),
            long: TypeId(0),
            double: TypeId(0),
        };
        table.void = table.intern(IrType::void());
        table.char = table.intern(IrType::char());
        table.int = table.intern(IrType::int32());
        table.long = table.intern(IrType::long());
        table.double = table.intern(IrType::double());
        table
    }

    /// Intern a type, returning the existing handle for an equal type
    pub fn intern(&mut self, ty: IrType) -> TypeId {
        if let Some(id) = self.ids.get(&ty) {
            return *id;
        }
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty.clone());
        self.ids.insert(ty, id);
        id
    }

    /// Resolve a handle. Handles are only ever produced by this table.
    pub fn get(&self, id: TypeId) -> &IrType {
        &self.types[id.0 as usize]
    }

    pub fn try_get(&self, id: TypeId) -> Option<&IrType> {
        self.types.get(id.0 as usize)
    }

    /// Intern `T *` for an interned `T`
    pub fn pointer_to(&mut self, id: TypeId) -> TypeId {
        let inner = self.get(id).clone();
        self.intern(IrType::ptr(inner))
    }

    /// Intern `T[count]` for an interned `T`
    pub fn array_of(&mut self, id: TypeId, count: Option<usize>) -> TypeId {
        let element = self.get(id).clone();
        self.intern(IrType::array(element, count))
    }

    pub fn size_of(&self, id: TypeId) -> usize {
        self.get(id).size
    }

    pub fn align_of(&self, id: TypeId) -> usize {
        self.get(id).align
    }

    pub fn is_pointer(&self, id: TypeId) -> bool {
        self.get(id).is_pointer()
    }

    pub fn void(&self) -> TypeId {
        self.void
    }

    pub fn char(&self) -> TypeId {
        self.char
    }

    pub fn int(&self) -> TypeId {
        self.int
    }

    pub fn long(&self) -> TypeId {
        self.long
    }

    pub fn double(&self) -> TypeId {
        self.double
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interning_is_structural() {
        let mut types = TypeTable::new();
        let a = types.intern(IrType::ptr(IrType::int32()));
        let b = types.pointer_to(types.int());
        assert_eq!(a, b);
        assert_ne!(a, types.pointer_to(types.char()));
        assert!(types.is_pointer(a));
        assert_eq!(types.size_of(a), 8);
    }

    #[test]
    fn test_well_known_types() {
        let types = TypeTable::new();
        assert!(types.get(types.void()).is_void());
        assert_eq!(types.size_of(types.char()), 1);
        assert_eq!(types.size_of(types.int()), 4);
        assert_eq!(types.size_of(types.long()), 8);
        assert!(types.get(types.double()).is_real());
        assert_eq!(types.len(), 5);
    }

    #[test]
    fn test_array_of() {
        let mut types = TypeTable::new();
        let arr = types.array_of(types.char(), Some(16));
        assert_eq!(types.size_of(arr), 16);
        assert_eq!(types.align_of(arr), 1);
        assert!(types.get(arr).is_array());
        assert_eq!(types.get(arr).to_string(), "[16] char");
    }
}
