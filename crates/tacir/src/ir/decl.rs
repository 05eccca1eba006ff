//! Function definitions and declaration lists
//!
//! A `Decl` owns every block created for one function, or for one group of
//! external declarations. Blocks are created, appended to and linked only
//! through the container and are released all at once by `finalize`.
//! Successor slots and the `head`/`body` designations are `BlockId` handles
//! into the container's arena. Every container has its own id, stamped into
//! the handles it creates.

use super::{Block, BlockId, Jump, Op, Var};
use crate::symbol::{SymbolId, SymbolTable};
use crate::types::TypeTable;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, trace};

static NEXT_DECL_ID: AtomicU32 = AtomicU32::new(0);

/// Source of block label numbers, shared by every container of one
/// translation unit
pub(crate) type LabelCounter = Rc<Cell<u32>>;

/// Container creation options
#[derive(Debug, Clone)]
pub struct DeclConfig {
    /// Prefix of generated block labels
    pub label_prefix: String,
    /// Number used for the first generated label
    pub first_label: u32,
}

impl Default for DeclConfig {
    fn default() -> Self {
        Self {
            label_prefix: ".L".to_string(),
            first_label: 0,
        }
    }
}

/// An external declaration list or a function definition
#[derive(Debug)]
pub struct Decl {
    id: u32,

    /// Function symbol, or `None` for a list of declarations
    fun: Option<SymbolId>,
    head: Option<BlockId>,
    body: Option<BlockId>,

    /// Number of bytes to allocate for local variables on the stack
    locals_size: usize,

    params: Vec<SymbolId>,
    locals: Vec<SymbolId>,

    blocks: Vec<Block>,
    label_prefix: String,
    next_label: LabelCounter,
}

impl Decl {
    /// Empty container with no function symbol
    pub fn new() -> Self {
        Self::with_config(&DeclConfig::default())
    }

    /// Empty container for the definition of `fun`
    pub fn function(fun: SymbolId) -> Self {
        let mut decl = Self::new();
        decl.fun = Some(fun);
        decl
    }

    /// Empty container with its own label counter
    pub fn with_config(config: &DeclConfig) -> Self {
        Self::with_labels(config.label_prefix.clone(), Rc::new(Cell::new(config.first_label)))
    }

    /// Empty container drawing label numbers from `next_label`
    pub(crate) fn with_labels(label_prefix: String, next_label: LabelCounter) -> Self {
        let id = NEXT_DECL_ID.fetch_add(1, Ordering::Relaxed);
        debug!(decl = id, first_label = next_label.get(), "creating cfg container");
        Self {
            id,
            fun: None,
            head: None,
            body: None,
            locals_size: 0,
            params: Vec::new(),
            locals: Vec::new(),
            blocks: Vec::new(),
            label_prefix,
            next_label,
        }
    }

    // ==================== Blocks ====================

    /// Create a block with a fresh label. The handle stays valid until the
    /// container is finalized.
    pub fn create_block(&mut self) -> BlockId {
        let id = BlockId::new(self.id, self.blocks.len() as u32);
        let number = self.next_label.get();
        self.next_label.set(number + 1);
        let label = format!("{}{}", self.label_prefix, number);
        trace!(block = %id, label = %label, "created block");
        self.blocks.push(Block::new(label));
        id
    }

    /// Id stamped into every handle this container creates
    pub fn id(&self) -> u32 {
        self.id
    }

    fn slot(&self, id: BlockId) -> usize {
        assert!(self.contains(id), "{} does not belong to container {}", id, self.id);
        id.index()
    }

    /// Resolve a handle created by this container. Panics on a handle from
    /// another container.
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[self.slot(id)]
    }

    pub fn block_mut(&mut self, id: BlockId) -> &mut Block {
        let slot = self.slot(id);
        &mut self.blocks[slot]
    }

    /// Resolve a handle that may not belong to this container
    pub fn try_block(&self, id: BlockId) -> Option<&Block> {
        if id.decl() != self.id {
            return None;
        }
        self.blocks.get(id.index())
    }

    /// Whether `id` was created by this container
    pub fn contains(&self, id: BlockId) -> bool {
        id.decl() == self.id && id.index() < self.blocks.len()
    }

    /// Blocks in creation order
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> {
        let decl = self.id;
        self.blocks
            .iter()
            .enumerate()
            .map(move |(index, block)| (BlockId::new(decl, index as u32), block))
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Total number of instructions over all blocks
    pub fn num_ops(&self) -> usize {
        self.blocks.iter().map(Block::len).sum()
    }

    /// Append an instruction to `block`. See `Block::push` for the ordering
    /// precondition.
    pub fn append(&mut self, block: BlockId, op: Op) {
        self.block_mut(block).push(op);
    }

    /// Set the jump slots of `block`: unconditional when `if_true` is `None`,
    /// otherwise a branch on the block's `expr`.
    pub fn link(&mut self, block: BlockId, if_false: BlockId, if_true: Option<BlockId>) {
        let jump = match if_true {
            None => Jump::Goto(if_false),
            Some(if_true) => Jump::Branch { if_false, if_true },
        };
        trace!(block = %block, ?jump, "linked block");
        self.block_mut(block).set_jump(jump);
    }

    /// Make `block` terminal, returning `value`
    pub fn set_return(&mut self, block: BlockId, value: Option<Var>) {
        self.block_mut(block).ret(value);
    }

    pub fn set_expr(&mut self, block: BlockId, expr: Var) {
        self.block_mut(block).set_expr(expr);
    }

    // ==================== Designated blocks ====================

    pub fn fun(&self) -> Option<SymbolId> {
        self.fun
    }

    pub fn set_fun(&mut self, fun: SymbolId) {
        self.fun = Some(fun);
    }

    pub fn is_function(&self) -> bool {
        self.fun.is_some()
    }

    /// Entry block
    pub fn head(&self) -> Option<BlockId> {
        self.head
    }

    pub fn set_head(&mut self, head: BlockId) {
        self.head = Some(head);
    }

    /// Block where code for the function's statements starts, after any
    /// parameter setup in `head`
    pub fn body(&self) -> Option<BlockId> {
        self.body
    }

    pub fn set_body(&mut self, body: BlockId) {
        self.body = Some(body);
    }

    // ==================== Symbols ====================

    pub fn params(&self) -> &[SymbolId] {
        &self.params
    }

    pub fn locals(&self) -> &[SymbolId] {
        &self.locals
    }

    pub fn add_param(&mut self, param: SymbolId) {
        self.params.push(param);
    }

    /// Register a local variable and reserve its stack slot. Returns the
    /// slot's byte offset from the start of the locals area.
    pub fn add_local(&mut self, local: SymbolId, types: &TypeTable, symbols: &SymbolTable) -> usize {
        let ty = symbols.get(local).ty;
        let offset = self.locals_size.next_multiple_of(types.align_of(ty).max(1));
        self.locals_size = offset + types.size_of(ty);
        self.locals.push(local);
        offset
    }

    /// Bytes of stack needed for locals
    pub fn locals_size(&self) -> usize {
        self.locals_size
    }

    pub fn set_locals_size(&mut self, size: usize) {
        self.locals_size = size;
    }

    // ==================== Traversal ====================

    /// Number the next created block would get
    pub fn next_label(&self) -> u32 {
        self.next_label.get()
    }

    /// Blocks reachable from `head`, depth first in preorder, false successor
    /// before true successor. Handles that do not belong to this container are
    /// skipped.
    pub fn reachable(&self) -> Vec<BlockId> {
        let mut visited = vec![false; self.blocks.len()];
        let mut order = Vec::new();
        let mut stack: Vec<BlockId> = self.head.into_iter().collect();

        while let Some(id) = stack.pop() {
            let Some(block) = self.try_block(id) else {
                continue;
            };
            if visited[id.index()] {
                continue;
            }
            visited[id.index()] = true;
            order.push(id);

            let [if_false, if_true] = block.successors();
            stack.extend(if_true);
            stack.extend(if_false);
        }

        order
    }

    /// Release every block and the container's own storage. Handles obtained
    /// from this container are meaningless afterwards.
    pub fn finalize(self) {
        debug!(
            decl = self.id,
            blocks = self.blocks.len(),
            ops = self.num_ops(),
            locals_size = self.locals_size,
            "finalizing cfg container"
        );
        drop(self);
    }
}

impl Default for Decl {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::BinaryKind;
    use std::collections::HashSet;

    #[test]
    fn test_new_container_is_empty() {
        let decl = Decl::new();
        assert_eq!(decl.num_blocks(), 0);
        assert!(decl.params().is_empty());
        assert!(decl.locals().is_empty());
        assert_eq!(decl.locals_size(), 0);
        assert!(decl.fun().is_none());
        assert!(decl.head().is_none());
        assert!(decl.reachable().is_empty());
    }

    #[test]
    fn test_labels_are_unique() {
        let mut decl = Decl::new();
        let ids: Vec<BlockId> = (0..50).map(|_| decl.create_block()).collect();

        let labels: HashSet<&str> = ids.iter().map(|id| decl.block(*id).label()).collect();
        assert_eq!(labels.len(), 50);
        assert_eq!(decl.block(ids[0]).label(), ".L0");
        assert_eq!(decl.block(ids[49]).label(), ".L49");
    }

    #[test]
    fn test_label_config() {
        let config = DeclConfig {
            label_prefix: ".B".to_string(),
            first_label: 10,
        };
        let mut decl = Decl::with_config(&config);
        let id = decl.create_block();
        assert_eq!(decl.block(id).label(), ".B10");
        assert_eq!(decl.next_label(), 11);
    }

    #[test]
    fn test_append_zero_ops() {
        let mut decl = Decl::new();
        let id = decl.create_block();
        assert!(decl.block(id).code().is_empty());
        assert_eq!(decl.num_ops(), 0);
    }

    #[test]
    fn test_link_states() {
        let mut decl = Decl::new();
        let a = decl.create_block();
        let b = decl.create_block();
        let c = decl.create_block();

        decl.link(a, b, None);
        assert_eq!(decl.block(a).jump(), Jump::Goto(b));

        decl.link(a, b, Some(c));
        assert_eq!(decl.block(a).successors(), [Some(b), Some(c)]);

        decl.set_return(a, None);
        assert!(decl.block(a).is_terminal());
    }

    #[test]
    fn test_reachable_with_loop() {
        let types = TypeTable::new();
        let mut symbols = SymbolTable::new();
        let i = Var::direct(types.int(), symbols.local("i", types.int()));

        // head -> cond; cond false -> exit, true -> loop; loop -> cond
        let mut decl = Decl::new();
        let head = decl.create_block();
        let cond = decl.create_block();
        let body = decl.create_block();
        let exit = decl.create_block();
        let orphan = decl.create_block();

        decl.set_head(head);
        decl.link(head, cond, None);
        decl.set_expr(cond, i);
        decl.link(cond, exit, Some(body));
        decl.append(body, Op::binary(BinaryKind::Add, i, i, Var::int(types.int(), 1)));
        decl.link(body, cond, None);

        assert_eq!(decl.reachable(), vec![head, cond, exit, body]);
        assert!(!decl.reachable().contains(&orphan));
    }

    #[test]
    fn test_reachable_skips_foreign_handles() {
        let mut decl = Decl::new();
        let head = decl.create_block();
        decl.set_head(head);
        decl.link(head, BlockId::new(decl.id(), 42), None);

        assert_eq!(decl.reachable(), vec![head]);
        assert!(!decl.contains(BlockId::new(decl.id(), 42)));
    }

    #[test]
    fn test_handles_from_another_container_do_not_alias() {
        let mut a = Decl::new();
        let mut b = Decl::new();
        let a0 = a.create_block();
        let a1 = a.create_block();
        let b0 = b.create_block();
        let b1 = b.create_block();

        assert_ne!(a.id(), b.id());
        assert_eq!(a1.index(), b1.index());
        assert_ne!(a1, b1);
        assert!(!b.contains(a1));
        assert!(b.try_block(a0).is_none());

        b.set_head(b0);
        b.link(b0, a1, None);
        assert_eq!(b.reachable(), vec![b0]);
    }

    #[test]
    #[should_panic(expected = "does not belong to container")]
    fn test_block_panics_on_foreign_handle() {
        let mut a = Decl::new();
        let b = Decl::new();
        let id = a.create_block();
        let _ = b.block(id);
    }

    #[test]
    fn test_locals_size_respects_alignment() {
        let mut types = TypeTable::new();
        let mut symbols = SymbolTable::new();
        let buf = types.array_of(types.char(), Some(3));
        let c = symbols.local("c", buf);
        let n = symbols.local("n", types.long());
        let x = symbols.local("x", types.int());

        let mut decl = Decl::new();
        assert_eq!(decl.add_local(c, &types, &symbols), 0);
        assert_eq!(decl.add_local(n, &types, &symbols), 8);
        assert_eq!(decl.add_local(x, &types, &symbols), 16);
        assert_eq!(decl.locals_size(), 20);
        assert_eq!(decl.locals(), &[c, n, x]);
    }

    #[test]
    fn test_params_keep_order_and_duplicates() {
        let types = TypeTable::new();
        let mut symbols = SymbolTable::new();
        let a = symbols.local("a", types.int());
        let b = symbols.local("b", types.int());

        let mut decl = Decl::new();
        decl.add_param(a);
        decl.add_param(b);
        decl.add_param(a);
        assert_eq!(decl.params(), &[a, b, a]);
    }
}
