//! Semantic information produced by a resolution pass.
//!
//! Every table is a dense vector indexed by the corresponding AST id, holding
//! `None` for nodes the resolver never reached (for example, nodes after the
//! first error). The tables are write-once: the resolver fills them during
//! [`crate::Resolver::resolve`] and hands them out immutably.

use bitflags::bitflags;
use lume_intrinsic::IntrinsicOverload;
use lume_ir::ast::StorageClass;
use lume_ir::{BlockId, ExprId, FunctionId, StmtId, StructId, TypeId, VarId};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

bitflags! {
    /// The storage classes a type has been used in, transitively.
    #[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
    pub struct StorageClassUsage: u16 {
        const NONE = 1 << 0;
        const FUNCTION = 1 << 1;
        const PRIVATE = 1 << 2;
        const WORKGROUP = 1 << 3;
        const UNIFORM = 1 << 4;
        const UNIFORM_CONSTANT = 1 << 5;
        const STORAGE = 1 << 6;
        const INPUT = 1 << 7;
        const OUTPUT = 1 << 8;
    }
}

impl From<StorageClass> for StorageClassUsage {
    fn from(sc: StorageClass) -> Self {
        match sc {
            StorageClass::None => StorageClassUsage::NONE,
            StorageClass::Function => StorageClassUsage::FUNCTION,
            StorageClass::Private => StorageClassUsage::PRIVATE,
            StorageClass::Workgroup => StorageClassUsage::WORKGROUP,
            StorageClass::Uniform => StorageClassUsage::UNIFORM,
            StorageClass::UniformConstant => StorageClassUsage::UNIFORM_CONSTANT,
            StorageClass::Storage => StorageClassUsage::STORAGE,
            StorageClass::Input => StorageClassUsage::INPUT,
            StorageClass::Output => StorageClassUsage::OUTPUT,
        }
    }
}

bitflags! {
    /// How a struct type participates in entry-point interfaces.
    #[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
    pub struct PipelineStageUsage: u8 {
        const VERTEX_INPUT = 1 << 0;
        const VERTEX_OUTPUT = 1 << 1;
        const FRAGMENT_INPUT = 1 << 2;
        const FRAGMENT_OUTPUT = 1 << 3;
        const COMPUTE_INPUT = 1 << 4;
        const COMPUTE_OUTPUT = 1 << 5;
    }
}

/// What a call expression resolved to.
#[derive(Clone, PartialEq, Debug)]
pub enum CallTarget {
    Function(FunctionId),
    Intrinsic(IntrinsicOverload),
}

/// Extra structure attached to specific expression forms.
#[derive(Clone, PartialEq, Debug, Default)]
pub enum SemExprKind {
    #[default]
    Plain,
    /// An identifier that resolved to a variable.
    VariableUse(VarId),
    Call(CallTarget),
    /// A member accessor that hit a named struct member.
    StructMemberAccess {
        struct_id: StructId,
        member_index: u32,
    },
    /// A member accessor that swizzled a vector; component indices in
    /// accessor order.
    Swizzle(SmallVec<[u32; 4]>),
}

/// Per-expression semantic record.
#[derive(Clone, PartialEq, Debug)]
pub struct SemExpression {
    /// Resolved type. Identifiers naming non-constant variables get a
    /// pointer type in the variable's storage class.
    pub ty: TypeId,
    /// The statement the expression appeared in, if any.
    pub stmt: Option<StmtId>,
    pub kind: SemExprKind,
}

/// Per-statement semantic record.
#[derive(Clone, PartialEq, Debug)]
pub struct SemStatement {
    /// The innermost lexical block holding the statement.
    pub block: Option<BlockId>,
}

/// Per-variable semantic record.
#[derive(Clone, PartialEq, Debug)]
pub struct SemVariable {
    pub ty: TypeId,
    pub storage_class: StorageClass,
    /// Identifier expressions referencing this variable, in resolution order.
    pub users: Vec<ExprId>,
}

/// Per-function semantic record.
#[derive(Clone, PartialEq, Debug)]
pub struct SemFunction {
    pub params: Vec<VarId>,
    /// Module-scope variables referenced by this function or anything it
    /// calls, transitively. Insertion order, deduplicated.
    pub referenced_module_vars: Vec<VarId>,
    /// Module-scope variables referenced directly in this function's body.
    pub local_referenced_module_vars: Vec<VarId>,
    /// Every function this one calls, directly or transitively.
    pub transitive_calls: Vec<FunctionId>,
    /// All return statements in the body.
    pub return_statements: Vec<StmtId>,
    /// Entry points from which this function is reachable.
    pub ancestor_entry_points: Vec<FunctionId>,
}

/// Computed layout for one struct member.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct SemStructMember {
    pub offset: u32,
    pub align: u32,
    pub size: u32,
}

/// Per-struct semantic record: layout plus usage tracking.
#[derive(Clone, PartialEq, Debug)]
pub struct SemStruct {
    pub members: Vec<SemStructMember>,
    pub align: u32,
    /// Size rounded up to the struct's alignment.
    pub size: u32,
    /// Size without trailing padding.
    pub size_no_padding: u32,
    pub storage_class_usage: StorageClassUsage,
    pub pipeline_stage_uses: PipelineStageUsage,
}

/// Computed layout for an array type.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct SemArray {
    pub align: u32,
    /// Total size; for runtime-sized arrays, the size of one element stride.
    pub size: u32,
    /// Element stride, explicit or implicit.
    pub stride: u32,
}

/// The full output of one resolution pass.
#[derive(Default)]
pub struct SemanticInfo {
    pub(crate) exprs: Vec<Option<SemExpression>>,
    pub(crate) stmts: Vec<Option<SemStatement>>,
    pub(crate) variables: Vec<Option<SemVariable>>,
    pub(crate) functions: Vec<Option<SemFunction>>,
    pub(crate) structs: Vec<Option<SemStruct>>,
    pub(crate) arrays: FxHashMap<TypeId, SemArray>,
}

impl SemanticInfo {
    pub fn expr(&self, id: ExprId) -> Option<&SemExpression> {
        self.exprs.get(id.index()).and_then(Option::as_ref)
    }

    /// Resolved type of an expression, if the resolver reached it.
    pub fn ty_of(&self, id: ExprId) -> Option<TypeId> {
        self.expr(id).map(|e| e.ty)
    }

    pub fn statement(&self, id: StmtId) -> Option<&SemStatement> {
        self.stmts.get(id.index()).and_then(Option::as_ref)
    }

    pub fn variable(&self, id: VarId) -> Option<&SemVariable> {
        self.variables.get(id.index()).and_then(Option::as_ref)
    }

    pub fn function(&self, id: FunctionId) -> Option<&SemFunction> {
        self.functions.get(id.index()).and_then(Option::as_ref)
    }

    pub fn structure(&self, id: StructId) -> Option<&SemStruct> {
        self.structs.get(id.index()).and_then(Option::as_ref)
    }

    /// Layout for an array type, keyed by the unaliased array `TypeId`.
    pub fn array(&self, ty: TypeId) -> Option<&SemArray> {
        self.arrays.get(&ty)
    }
}
