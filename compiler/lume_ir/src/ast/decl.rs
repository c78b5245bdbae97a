//! Variable and function declarations, and their decorations.

use super::enums::{BuiltinValue, PipelineStage, StorageClass};
use crate::{BlockId, ExprId, Name, Span, TypeId, VarId};

/// A decoration attached to a variable, function, or return type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub span: Span,
}

impl Decoration {
    pub fn new(kind: DecorationKind, span: Span) -> Self {
        Decoration { kind, span }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DecorationKind {
    Binding(u32),
    Group(u32),
    Builtin(BuiltinValue),
    Location(u32),
    ConstantId(u32),
    Stage(PipelineStage),
    WorkgroupSize(u32, u32, u32),
    /// Marks a compiler-synthesized function that may legally lack a body.
    Internal,
}

/// A decoration attached to a struct member.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MemberDecoration {
    pub kind: MemberDecorationKind,
    pub span: Span,
}

impl MemberDecoration {
    pub fn new(kind: MemberDecorationKind, span: Span) -> Self {
        MemberDecoration { kind, span }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MemberDecorationKind {
    /// Explicit byte offset. Not produced by the text form, but emitted by
    /// binary-format readers.
    Offset(u32),
    Align(u32),
    Size(u32),
    Builtin(BuiltinValue),
    Location(u32),
}

/// A variable declaration: module-scope variable or constant, function
/// parameter, or function-local declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct Var {
    pub name: Name,
    pub is_const: bool,
    pub storage_class: StorageClass,
    /// Declared type. `None` means the type is inferred from the constructor.
    pub ty: Option<TypeId>,
    pub constructor: Option<ExprId>,
    pub decorations: Vec<Decoration>,
    pub span: Span,
}

/// A function declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub name: Name,
    pub params: Vec<VarId>,
    pub return_ty: TypeId,
    pub return_decorations: Vec<Decoration>,
    /// Entry points and internal stub functions may lack a body.
    pub body: Option<BlockId>,
    pub decorations: Vec<Decoration>,
    pub span: Span,
}

impl Function {
    /// The declared pipeline stage, or [`PipelineStage::None`].
    pub fn stage(&self) -> PipelineStage {
        for deco in &self.decorations {
            if let DecorationKind::Stage(stage) = deco.kind {
                return stage;
            }
        }
        PipelineStage::None
    }

    /// Whether this function is an externally invocable entry point.
    pub fn is_entry_point(&self) -> bool {
        self.stage() != PipelineStage::None
    }

    /// Whether this function carries the `internal` decoration.
    pub fn is_internal(&self) -> bool {
        self.decorations
            .iter()
            .any(|d| matches!(d.kind, DecorationKind::Internal))
    }

    /// The last statement of the body, if any.
    pub fn last_statement(&self, arena: &super::AstArena) -> Option<crate::StmtId> {
        let body = self.body?;
        arena.block(body).stmts.last().copied()
    }
}
