//! Translation unit: the tables every container refers into, and label
//! numbering across containers

use super::decl::LabelCounter;
use super::{Decl, DeclConfig};
use crate::symbol::{SymbolId, SymbolTable};
use crate::types::TypeTable;
use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;

/// State shared by all containers of one translation unit.
///
/// Every container created here draws block labels from the unit's counter,
/// so labels are unique over the whole unit even while several containers
/// are being built at once.
#[derive(Debug)]
pub struct TranslationUnit {
    pub types: TypeTable,
    pub symbols: SymbolTable,
    label_prefix: String,
    next_label: LabelCounter,
    finalized: usize,
}

impl TranslationUnit {
    pub fn new() -> Self {
        Self::with_config(DeclConfig::default())
    }

    pub fn with_config(config: DeclConfig) -> Self {
        Self {
            types: TypeTable::new(),
            symbols: SymbolTable::new(),
            label_prefix: config.label_prefix,
            next_label: Rc::new(Cell::new(config.first_label)),
            finalized: 0,
        }
    }

    /// Container for a group of external declarations
    pub fn create_decl(&self) -> Decl {
        Decl::with_labels(self.label_prefix.clone(), Rc::clone(&self.next_label))
    }

    /// Container for the definition of `fun`
    pub fn create_function(&self, fun: SymbolId) -> Decl {
        let mut decl = self.create_decl();
        decl.set_fun(fun);
        decl
    }

    /// Release `decl`. Label numbers it used stay taken.
    pub fn finalize(&mut self, decl: Decl) {
        self.finalized += 1;
        debug!(
            next_label = self.next_label.get(),
            finalized = self.finalized,
            "translation unit finalized container"
        );
        decl.finalize();
    }

    /// Number the next created block, in any container of this unit, will get
    pub fn next_label(&self) -> u32 {
        self.next_label.get()
    }

    /// Containers finalized so far
    pub fn finalized(&self) -> usize {
        self.finalized
    }
}

impl Default for TranslationUnit {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_labels_unique_across_containers() {
        let mut unit = TranslationUnit::new();
        let mut labels = HashSet::new();

        for _ in 0..3 {
            let mut decl = unit.create_decl();
            for _ in 0..4 {
                let id = decl.create_block();
                assert!(labels.insert(decl.block(id).label().to_string()));
            }
            unit.finalize(decl);
        }

        assert_eq!(labels.len(), 12);
        assert_eq!(unit.next_label(), 12);
        assert_eq!(unit.finalized(), 3);
    }

    #[test]
    fn test_labels_unique_across_live_containers() {
        let unit = TranslationUnit::new();
        let mut first = unit.create_decl();
        let mut second = unit.create_decl();

        let a = first.create_block();
        let b = second.create_block();
        let c = first.create_block();

        assert_eq!(first.block(a).label(), ".L0");
        assert_eq!(second.block(b).label(), ".L1");
        assert_eq!(first.block(c).label(), ".L2");
        assert_eq!(unit.next_label(), 3);

        // Dropping a container without going through the unit keeps its
        // numbers reserved.
        second.finalize();
        let mut third = unit.create_decl();
        let d = third.create_block();
        assert_eq!(third.block(d).label(), ".L3");
    }

    #[test]
    fn test_create_function_sets_symbol() {
        let mut unit = TranslationUnit::new();
        let fun_ty = unit.types.int();
        let main = unit.symbols.global("main", fun_ty);

        let decl = unit.create_function(main);
        assert_eq!(decl.fun(), Some(main));
        assert!(decl.is_function());
        unit.finalize(decl);
    }

    #[test]
    fn test_empty_container_keeps_counter() {
        let mut unit = TranslationUnit::new();
        let decl = unit.create_decl();
        unit.finalize(decl);
        assert_eq!(unit.next_label(), 0);
    }
}
