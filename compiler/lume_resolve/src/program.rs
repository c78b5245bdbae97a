//! A resolvable program and its construction API.
//!
//! [`Program`] bundles the module with the string and type interners the AST
//! references point into. [`ProgramBuilder`] is the construction surface used
//! by front ends and by tests; it allocates arena nodes, interns names and
//! types, and registers global declarations in source order.

use lume_ir::ast::{
    AccessMode, Block, BuiltinValue, CaseSelector, Decoration, DecorationKind, Expr, ExprKind,
    Function, GlobalDecl, Literal, MemberDecoration, Module, PipelineStage, StmtKind, StorageClass,
    Var,
};
use lume_ir::ast::{BinaryOp, Stmt, UnaryOp};
use lume_ir::{BlockId, ExprId, FunctionId, Name, Span, StmtId, StringInterner, TypeId, VarId};
use lume_types::{StructDecl, StructMember, TypeInterner};

/// An immutable program ready for resolution.
pub struct Program {
    pub module: Module,
    pub names: StringInterner,
    pub types: TypeInterner,
}

/// Incremental program construction.
///
/// All node-creating methods return the arena handle for the new node. Spans
/// default to [`Span::DUMMY`]; front ends that track source locations use the
/// `*_at` variants.
#[derive(Default)]
pub struct ProgramBuilder {
    module: Module,
    names: StringInterner,
    types: TypeInterner,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        ProgramBuilder::default()
    }

    pub fn build(self) -> Program {
        Program {
            module: self.module,
            names: self.names,
            types: self.types,
        }
    }

    pub fn name(&self, text: &str) -> Name {
        self.names.intern(text)
    }

    pub fn types(&self) -> &TypeInterner {
        &self.types
    }

    // Type shorthands.

    pub fn ty_vec(&self, elem: TypeId, size: u32) -> TypeId {
        self.types.vector(elem, size)
    }

    pub fn ty_mat(&self, elem: TypeId, columns: u32, rows: u32) -> TypeId {
        self.types.matrix(elem, columns, rows)
    }

    pub fn ty_array(&self, elem: TypeId, count: u32) -> TypeId {
        self.types.array(elem, count, None)
    }

    pub fn ty_array_with_stride(&self, elem: TypeId, count: u32, stride: u32) -> TypeId {
        self.types.array(elem, count, Some(stride))
    }

    pub fn ty_runtime_array(&self, elem: TypeId) -> TypeId {
        self.types.runtime_array(elem, None)
    }

    pub fn ty_ptr(&self, elem: TypeId, storage_class: StorageClass) -> TypeId {
        self.types.pointer(elem, storage_class)
    }

    pub fn ty_alias(&self, name: &str, elem: TypeId) -> TypeId {
        self.types.alias(self.name(name), elem)
    }

    pub fn ty_access(&self, access: AccessMode, elem: TypeId) -> TypeId {
        self.types.access(access, elem)
    }

    // Expressions.

    pub fn expr(&mut self, kind: ExprKind) -> ExprId {
        self.expr_at(kind, Span::DUMMY)
    }

    pub fn expr_at(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.module.arena.alloc_expr(Expr::new(kind, span))
    }

    pub fn lit_bool(&mut self, v: bool) -> ExprId {
        self.expr(ExprKind::Literal(Literal::Bool(v)))
    }

    pub fn lit_i32(&mut self, v: i32) -> ExprId {
        self.expr(ExprKind::Literal(Literal::I32(v)))
    }

    pub fn lit_u32(&mut self, v: u32) -> ExprId {
        self.expr(ExprKind::Literal(Literal::U32(v)))
    }

    pub fn lit_f32(&mut self, v: f32) -> ExprId {
        self.expr(ExprKind::Literal(Literal::F32(v)))
    }

    pub fn ident(&mut self, name: &str) -> ExprId {
        self.ident_at(name, Span::DUMMY)
    }

    pub fn ident_at(&mut self, name: &str, span: Span) -> ExprId {
        let name = self.name(name);
        self.expr_at(ExprKind::Ident(name), span)
    }

    pub fn unary(&mut self, op: UnaryOp, expr: ExprId) -> ExprId {
        self.expr(ExprKind::Unary { op, expr })
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.expr(ExprKind::Binary { op, lhs, rhs })
    }

    pub fn index(&mut self, base: ExprId, index: ExprId) -> ExprId {
        self.expr(ExprKind::Index { base, index })
    }

    pub fn member(&mut self, base: ExprId, member: &str) -> ExprId {
        let member = self.name(member);
        self.expr(ExprKind::Member {
            base,
            member,
            member_span: Span::DUMMY,
        })
    }

    /// A call with an identifier target.
    pub fn call(&mut self, target: &str, args: Vec<ExprId>) -> ExprId {
        let target = self.ident(target);
        self.expr(ExprKind::Call { target, args })
    }

    pub fn construct(&mut self, ty: TypeId, args: Vec<ExprId>) -> ExprId {
        self.expr(ExprKind::Construct { ty, args })
    }

    pub fn bitcast(&mut self, ty: TypeId, expr: ExprId) -> ExprId {
        self.expr(ExprKind::Bitcast { ty, expr })
    }

    // Statements and blocks.

    pub fn stmt(&mut self, kind: StmtKind) -> StmtId {
        self.stmt_at(kind, Span::DUMMY)
    }

    pub fn stmt_at(&mut self, kind: StmtKind, span: Span) -> StmtId {
        self.module.arena.alloc_stmt(Stmt::new(kind, span))
    }

    pub fn block(&mut self, stmts: Vec<StmtId>) -> BlockId {
        self.module.arena.alloc_block(Block::new(stmts, Span::DUMMY))
    }

    pub fn assign(&mut self, lhs: ExprId, rhs: ExprId) -> StmtId {
        self.stmt(StmtKind::Assign { lhs, rhs })
    }

    pub fn decl_stmt(&mut self, var: VarId) -> StmtId {
        self.stmt(StmtKind::VarDecl(var))
    }

    pub fn ret(&mut self, value: Option<ExprId>) -> StmtId {
        self.stmt(StmtKind::Return { value })
    }

    pub fn call_stmt(&mut self, call: ExprId) -> StmtId {
        self.stmt(StmtKind::Call(call))
    }

    pub fn break_stmt(&mut self) -> StmtId {
        self.stmt(StmtKind::Break)
    }

    pub fn continue_stmt(&mut self) -> StmtId {
        self.stmt(StmtKind::Continue)
    }

    pub fn discard_stmt(&mut self) -> StmtId {
        self.stmt(StmtKind::Discard)
    }

    pub fn fallthrough_stmt(&mut self) -> StmtId {
        self.stmt(StmtKind::Fallthrough)
    }

    pub fn if_stmt(&mut self, condition: ExprId, body: BlockId, else_stmts: Vec<StmtId>) -> StmtId {
        self.stmt(StmtKind::If {
            condition,
            body,
            else_stmts,
        })
    }

    pub fn else_stmt(&mut self, condition: Option<ExprId>, body: BlockId) -> StmtId {
        self.stmt(StmtKind::Else { condition, body })
    }

    pub fn loop_stmt(&mut self, body: BlockId, continuing: Option<BlockId>) -> StmtId {
        self.stmt(StmtKind::Loop { body, continuing })
    }

    pub fn switch_stmt(&mut self, selector: ExprId, cases: Vec<StmtId>) -> StmtId {
        self.stmt(StmtKind::Switch { selector, cases })
    }

    pub fn case(&mut self, selectors: Vec<Literal>, body: BlockId) -> StmtId {
        let selectors = selectors
            .into_iter()
            .map(|value| CaseSelector {
                value,
                span: Span::DUMMY,
            })
            .collect();
        self.stmt(StmtKind::Case { selectors, body })
    }

    pub fn default_case(&mut self, body: BlockId) -> StmtId {
        self.stmt(StmtKind::Case {
            selectors: Vec::new(),
            body,
        })
    }

    // Variables.

    /// A variable node; not yet attached to a scope or statement.
    pub fn var(
        &mut self,
        name: &str,
        storage_class: StorageClass,
        ty: Option<TypeId>,
        constructor: Option<ExprId>,
        decorations: Vec<Decoration>,
    ) -> VarId {
        let name = self.name(name);
        self.module.arena.alloc_var(Var {
            name,
            is_const: false,
            storage_class,
            ty,
            constructor,
            decorations,
            span: Span::DUMMY,
        })
    }

    /// A constant node; not yet attached to a scope or statement.
    pub fn constant(
        &mut self,
        name: &str,
        storage_class: StorageClass,
        ty: Option<TypeId>,
        constructor: Option<ExprId>,
    ) -> VarId {
        let name = self.name(name);
        self.module.arena.alloc_var(Var {
            name,
            is_const: true,
            storage_class,
            ty,
            constructor,
            decorations: Vec::new(),
            span: Span::DUMMY,
        })
    }

    /// A function parameter. Parameters carry no storage class.
    pub fn param(&mut self, name: &str, ty: TypeId) -> VarId {
        self.param_with(name, ty, Vec::new())
    }

    pub fn param_with(&mut self, name: &str, ty: TypeId, decorations: Vec<Decoration>) -> VarId {
        let name = self.name(name);
        self.module.arena.alloc_var(Var {
            name,
            is_const: true,
            storage_class: StorageClass::None,
            ty: Some(ty),
            constructor: None,
            decorations,
            span: Span::DUMMY,
        })
    }

    /// Declare a module-scope variable.
    pub fn global_var(
        &mut self,
        name: &str,
        storage_class: StorageClass,
        ty: TypeId,
        constructor: Option<ExprId>,
        decorations: Vec<Decoration>,
    ) -> VarId {
        let id = self.var(name, storage_class, Some(ty), constructor, decorations);
        self.module.decls.push(GlobalDecl::Var(id));
        id
    }

    /// Declare a module-scope constant.
    pub fn global_const(&mut self, name: &str, ty: TypeId, constructor: Option<ExprId>) -> VarId {
        self.global_const_in(name, StorageClass::None, ty, constructor)
    }

    /// Declare a module-scope constant with an explicit storage class, which
    /// the resolver rejects. Front ends surface the construct so the
    /// diagnostic points at source rather than failing to parse.
    pub fn global_const_in(
        &mut self,
        name: &str,
        storage_class: StorageClass,
        ty: TypeId,
        constructor: Option<ExprId>,
    ) -> VarId {
        let id = self.constant(name, storage_class, Some(ty), constructor);
        self.module.decls.push(GlobalDecl::Var(id));
        id
    }

    // Functions.

    /// Declare a function.
    pub fn func(
        &mut self,
        name: &str,
        params: Vec<VarId>,
        return_ty: TypeId,
        body: Option<BlockId>,
        decorations: Vec<Decoration>,
    ) -> FunctionId {
        self.func_with(name, params, return_ty, Vec::new(), body, decorations)
    }

    pub fn func_with(
        &mut self,
        name: &str,
        params: Vec<VarId>,
        return_ty: TypeId,
        return_decorations: Vec<Decoration>,
        body: Option<BlockId>,
        decorations: Vec<Decoration>,
    ) -> FunctionId {
        let name = self.name(name);
        let id = self.module.arena.alloc_function(Function {
            name,
            params,
            return_ty,
            return_decorations,
            body,
            decorations,
            span: Span::DUMMY,
        });
        self.module.decls.push(GlobalDecl::Function(id));
        id
    }

    /// Declare an entry point in the given stage.
    pub fn entry_point(
        &mut self,
        name: &str,
        stage: PipelineStage,
        params: Vec<VarId>,
        return_ty: TypeId,
        return_decorations: Vec<Decoration>,
        body: Option<BlockId>,
    ) -> FunctionId {
        self.func_with(
            name,
            params,
            return_ty,
            return_decorations,
            body,
            vec![Decoration::new(DecorationKind::Stage(stage), Span::DUMMY)],
        )
    }

    // Types as module declarations.

    /// Declare a struct and register it as a global type declaration.
    pub fn struct_decl(
        &mut self,
        name: &str,
        members: Vec<StructMember>,
        block_decoration: bool,
    ) -> TypeId {
        let name = self.name(name);
        let (_, ty) = self.types.declare_struct(StructDecl {
            name,
            members,
            block_decoration,
            span: Span::DUMMY,
        });
        self.module.decls.push(GlobalDecl::Type(ty, Span::DUMMY));
        ty
    }

    pub fn struct_member(
        &self,
        name: &str,
        ty: TypeId,
        decorations: Vec<MemberDecoration>,
    ) -> StructMember {
        StructMember {
            name: self.name(name),
            ty,
            decorations,
            span: Span::DUMMY,
        }
    }

    /// Register an alias (or other named type) as a global type declaration.
    pub fn type_decl(&mut self, ty: TypeId) {
        self.module.decls.push(GlobalDecl::Type(ty, Span::DUMMY));
    }

    // Decoration shorthands.

    pub fn builtin_deco(&self, builtin: BuiltinValue) -> Decoration {
        Decoration::new(DecorationKind::Builtin(builtin), Span::DUMMY)
    }

    pub fn location_deco(&self, location: u32) -> Decoration {
        Decoration::new(DecorationKind::Location(location), Span::DUMMY)
    }

    pub fn stage_deco(&self, stage: PipelineStage) -> Decoration {
        Decoration::new(DecorationKind::Stage(stage), Span::DUMMY)
    }
}
