//! Lexical scopes and block nesting records.

use lume_ir::{BlockId, Name, VarId};
use rustc_hash::FxHashMap;

use super::{Resolver, VarInfoId};

/// What kind of block a [`BlockInfo`] describes. Loop continuing blocks and
/// switch cases carry extra validation rules.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum BlockKind {
    Generic,
    Loop,
    LoopContinuing,
    SwitchCase,
}

/// Per-block bookkeeping, parent-linked to mirror the nesting at the point
/// of resolution. Blocks stay in the arena after they are left so that
/// records referencing them (continue bypass checks) stay valid.
pub(crate) struct BlockInfo {
    pub ast_block: BlockId,
    pub kind: BlockKind,
    pub parent: Option<usize>,
    /// Variables declared directly in this block, in statement order.
    pub decls: Vec<VarId>,
    /// Index into `decls` at the first `continue` statement, for loops.
    pub first_continue: Option<usize>,
}

impl BlockInfo {
    pub fn new(ast_block: BlockId, kind: BlockKind, parent: Option<usize>) -> Self {
        BlockInfo {
            ast_block,
            kind,
            parent,
            decls: Vec::new(),
            first_continue: None,
        }
    }
}

/// Name-to-variable scope stack. Frame zero is the module scope and is never
/// popped; lookups report whether the hit came from it.
pub(crate) struct ScopeStack {
    frames: Vec<FxHashMap<Name, VarInfoId>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack {
            frames: vec![FxHashMap::default()],
        }
    }

    pub fn push_scope(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    pub fn pop_scope(&mut self) {
        assert!(self.frames.len() > 1, "cannot pop the module scope");
        self.frames.pop();
    }

    pub fn set(&mut self, name: Name, var: VarInfoId) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name, var);
        }
    }

    pub fn set_global(&mut self, name: Name, var: VarInfoId) {
        self.frames[0].insert(name, var);
    }

    /// Innermost binding for `name`, with whether it is module-scope.
    pub fn get(&self, name: Name) -> Option<(VarInfoId, bool)> {
        for (depth, frame) in self.frames.iter().enumerate().rev() {
            if let Some(&var) = frame.get(&name) {
                return Some((var, depth == 0));
            }
        }
        None
    }
}

impl Resolver<'_> {
    /// Run `f` inside a fresh block scope of the given kind.
    pub(crate) fn block_scope<F>(&mut self, block: BlockId, kind: BlockKind, f: F) -> bool
    where
        F: FnOnce(&mut Self) -> bool,
    {
        let parent = self.current_block;
        self.blocks.push(BlockInfo::new(block, kind, parent));
        self.current_block = Some(self.blocks.len() - 1);
        self.scope.push_scope();
        let result = f(self);
        self.scope.pop_scope();
        self.current_block = parent;
        result
    }

    /// Walk the block chain from `from` (inclusive) looking for `kind`.
    pub(crate) fn find_first_parent(&self, from: usize, kind: BlockKind) -> Option<usize> {
        let mut current = Some(from);
        while let Some(idx) = current {
            if self.blocks[idx].kind == kind {
                return Some(idx);
            }
            current = self.blocks[idx].parent;
        }
        None
    }
}
