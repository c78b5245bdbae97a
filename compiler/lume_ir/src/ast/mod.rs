//! Flat AST types using arena allocation.
//!
//! All node references are `u32` index handles into [`AstArena`]; there are
//! no boxed subtrees. A [`Module`] is a list of global declarations in source
//! order plus the arena that owns every node.
//!
//! # Module Structure
//!
//! - `expr`: expression nodes
//! - `stmt`: statement and block nodes
//! - `decl`: variables, functions, decorations
//! - `operators`: binary and unary operators
//! - `enums`: storage classes, pipeline stages, and other closed tag sets

mod decl;
mod enums;
mod expr;
mod operators;
mod stmt;

pub use decl::{
    Decoration, DecorationKind, Function, MemberDecoration, MemberDecorationKind, Var,
};
pub use enums::{
    AccessMode, BuiltinValue, ImageFormat, PipelineStage, SamplerKind, StorageClass,
    TextureDimension,
};
pub use expr::{Expr, ExprKind, Literal};
pub use operators::{BinaryOp, UnaryOp};
pub use stmt::{Block, CaseSelector, Stmt, StmtKind};

use crate::{BlockId, ExprId, FunctionId, Span, StmtId, TypeId, VarId};

/// A module-level declaration, in source order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GlobalDecl {
    /// A type declaration (alias or struct), by interned type handle.
    Type(TypeId, Span),
    /// A function declaration.
    Function(FunctionId),
    /// A module-scope variable or constant.
    Var(VarId),
}

/// Arena that owns every AST node of one module.
#[derive(Debug, Default)]
pub struct AstArena {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    blocks: Vec<Block>,
    vars: Vec<Var>,
    functions: Vec<Function>,
}

impl AstArena {
    pub fn new() -> Self {
        AstArena::default()
    }

    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::from_raw(self.exprs.len() as u32);
        self.exprs.push(expr);
        id
    }

    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::from_raw(self.stmts.len() as u32);
        self.stmts.push(stmt);
        id
    }

    pub fn alloc_block(&mut self, block: Block) -> BlockId {
        let id = BlockId::from_raw(self.blocks.len() as u32);
        self.blocks.push(block);
        id
    }

    pub fn alloc_var(&mut self, var: Var) -> VarId {
        let id = VarId::from_raw(self.vars.len() as u32);
        self.vars.push(var);
        id
    }

    pub fn alloc_function(&mut self, function: Function) -> FunctionId {
        let id = FunctionId::from_raw(self.functions.len() as u32);
        self.functions.push(function);
        id
    }

    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    pub fn var(&self, id: VarId) -> &Var {
        &self.vars[id.index()]
    }

    pub fn function(&self, id: FunctionId) -> &Function {
        &self.functions[id.index()]
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }
}

/// A parsed module: global declarations in source order plus the node arena.
#[derive(Debug, Default)]
pub struct Module {
    pub decls: Vec<GlobalDecl>,
    pub arena: AstArena,
}

impl Module {
    pub fn new() -> Self {
        Module::default()
    }

    pub fn expr(&self, id: ExprId) -> &Expr {
        self.arena.expr(id)
    }

    pub fn stmt(&self, id: StmtId) -> &Stmt {
        self.arena.stmt(id)
    }

    pub fn block(&self, id: BlockId) -> &Block {
        self.arena.block(id)
    }

    pub fn var(&self, id: VarId) -> &Var {
        self.arena.var(id)
    }

    pub fn function(&self, id: FunctionId) -> &Function {
        self.arena.function(id)
    }

    /// Iterate over declared functions in declaration order.
    pub fn functions(&self) -> impl Iterator<Item = FunctionId> + '_ {
        self.decls.iter().filter_map(|decl| match decl {
            GlobalDecl::Function(id) => Some(*id),
            _ => None,
        })
    }
}
