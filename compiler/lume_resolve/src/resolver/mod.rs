//! The resolution pass.
//!
//! Organized by concern, all extending the one [`Resolver`] type:
//!
//! - `canonical`: memoized structural canonicalization of types
//! - `scope`: the lexical scope stack and block nesting records
//! - `expr`: expression resolution
//! - `operators`: binary operator validation and result typing
//! - `stmt`: statement resolution and control-flow validation
//! - `function`: function resolution, call-graph tracking, entry-point I/O
//! - `vars`: variable resolution, module-scope validation
//! - `layout`: struct and array memory layout, storability
//! - `build`: final assembly of the semantic tables

mod build;
mod canonical;
mod expr;
mod function;
mod layout;
mod operators;
mod scope;
mod stmt;
mod vars;

#[cfg(test)]
mod tests;

use lume_diagnostic::{Diagnostics, ErrorCode};
use lume_ir::ast::{GlobalDecl, Module, StorageClass};
use lume_ir::{ExprId, FunctionId, Name, Span, StmtId, StringInterner, StructId, TypeId, VarId};
use lume_types::{Type, TypeInterner};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::sem::{SemArray, SemExprKind, SemExpression, SemStatement, SemStruct, SemanticInfo};
use crate::{Program, ResolverOptions};

use scope::{BlockInfo, ScopeStack};

/// Index into [`Resolver::variables`].
pub(crate) type VarInfoId = usize;
/// Index into [`Resolver::functions`].
pub(crate) type FuncInfoId = usize;

/// Working record for one resolved variable.
pub(crate) struct VariableInfo {
    pub decl: VarId,
    pub ty: TypeId,
    pub storage_class: StorageClass,
    pub users: Vec<ExprId>,
}

/// Working record for one resolved function.
pub(crate) struct FunctionInfo {
    pub decl: FunctionId,
    pub parameters: Vec<VarInfoId>,
    pub referenced_module_vars: Vec<VarInfoId>,
    pub local_referenced_module_vars: Vec<VarInfoId>,
    pub transitive_calls: Vec<FuncInfoId>,
    pub return_statements: Vec<StmtId>,
}

impl FunctionInfo {
    fn new(decl: FunctionId) -> Self {
        FunctionInfo {
            decl,
            parameters: Vec::new(),
            referenced_module_vars: Vec::new(),
            local_referenced_module_vars: Vec::new(),
            transitive_calls: Vec::new(),
            return_statements: Vec::new(),
        }
    }
}

/// The outcome of one resolution pass.
///
/// Semantic info is materialized even on failure, holding whatever was
/// resolved before the first error.
pub struct Resolution {
    pub success: bool,
    pub info: SemanticInfo,
    pub diagnostics: Diagnostics,
}

/// One-shot semantic resolver.
///
/// Walks the module's global declarations in source order, which is what
/// enforces declare-before-use for functions and module-scope variables.
pub struct Resolver<'a> {
    program: &'a Program,
    options: ResolverOptions,
    diagnostics: Diagnostics,

    scope: ScopeStack,
    blocks: Vec<BlockInfo>,
    current_block: Option<usize>,
    current_function: Option<FuncInfoId>,
    current_statement: Option<StmtId>,

    variables: Vec<VariableInfo>,
    var_to_info: Vec<Option<VarInfoId>>,
    functions: Vec<FunctionInfo>,
    function_to_info: Vec<Option<FuncInfoId>>,
    function_names: FxHashMap<Name, FuncInfoId>,

    expr_info: Vec<Option<SemExpression>>,
    stmt_info: Vec<Option<SemStatement>>,
    struct_info: FxHashMap<StructId, SemStruct>,
    array_info: FxHashMap<TypeId, SemArray>,
    canonical_memo: FxHashMap<TypeId, TypeId>,
}

impl<'a> Resolver<'a> {
    pub fn new(program: &'a Program, options: ResolverOptions) -> Self {
        let arena = &program.module.arena;
        Resolver {
            program,
            options,
            diagnostics: Diagnostics::new(),
            scope: ScopeStack::new(),
            blocks: Vec::new(),
            current_block: None,
            current_function: None,
            current_statement: None,
            variables: Vec::new(),
            var_to_info: vec![None; arena.var_count()],
            functions: Vec::new(),
            function_to_info: vec![None; arena.function_count()],
            function_names: FxHashMap::default(),
            expr_info: vec![None; arena.expr_count()],
            stmt_info: vec![None; arena.stmt_count()],
            struct_info: FxHashMap::default(),
            array_info: FxHashMap::default(),
            canonical_memo: FxHashMap::default(),
        }
    }

    /// Run the pass, consuming the resolver.
    pub fn resolve(mut self) -> Resolution {
        debug!(
            decls = self.program.module.decls.len(),
            "resolving module"
        );
        let ok = self.resolve_internal();

        // Even on failure, assemble semantic nodes for everything that did
        // resolve.
        let info = self.build_semantic_info();
        let success = ok && !self.diagnostics.has_errors();
        debug!(success, errors = self.diagnostics.error_count(), "resolution finished");
        Resolution {
            success,
            info,
            diagnostics: self.diagnostics,
        }
    }

    fn resolve_internal(&mut self) -> bool {
        // Source order enforces use-before-declaration validation.
        for decl in &self.program.module.decls {
            match *decl {
                GlobalDecl::Type(ty, span) => {
                    if !self.type_decl(ty, span) {
                        return false;
                    }
                }
                GlobalDecl::Function(id) => {
                    if !self.function(id) {
                        return false;
                    }
                }
                GlobalDecl::Var(id) => {
                    if !self.global_variable(id) {
                        return false;
                    }
                }
            }
        }
        true
    }

    fn type_decl(&mut self, ty: TypeId, span: Span) -> bool {
        let unaliased = self.types().unwrap_alias(ty);
        match self.types().get(unaliased) {
            Type::Struct(struct_id) => self.structure(struct_id),
            Type::Array { .. } => self.array_layout(unaliased, span).is_some(),
            _ => true,
        }
    }

    // Shared accessors. These borrow from the program, not the resolver, so
    // they stay usable while resolver state is mutably borrowed.

    pub(crate) fn module(&self) -> &'a Module {
        &self.program.module
    }

    pub(crate) fn types(&self) -> &'a TypeInterner {
        &self.program.types
    }

    pub(crate) fn names(&self) -> &'a StringInterner {
        &self.program.names
    }

    pub(crate) fn name_str(&self, name: Name) -> &'static str {
        self.program.names.resolve(name)
    }

    pub(crate) fn friendly(&self, ty: TypeId) -> String {
        self.program.types.friendly_name(ty, &self.program.names)
    }

    pub(crate) fn capabilities(&self) -> crate::Capabilities {
        self.options.capabilities
    }

    // Diagnostics.

    pub(crate) fn error(&mut self, message: impl Into<String>, span: Span) {
        self.diagnostics.add_error(message, span);
    }

    pub(crate) fn error_code(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        self.diagnostics.add_error_with_code(code, message, span);
    }

    pub(crate) fn note(&mut self, message: impl Into<String>, span: Span) {
        self.diagnostics.add_note(message, span);
    }

    // Expression and statement records.

    /// Record the resolved type (and extra structure) of an expression.
    ///
    /// Panics if the expression was already resolved; `expression` guards
    /// against re-entry, so a double set is an internal bug.
    pub(crate) fn set_expr_type(&mut self, expr: ExprId, ty: TypeId, kind: SemExprKind) {
        let slot = &mut self.expr_info[expr.index()];
        assert!(slot.is_none(), "expression resolved twice");
        *slot = Some(SemExpression {
            ty,
            stmt: self.current_statement,
            kind,
        });
    }

    pub(crate) fn expr_ty(&self, expr: ExprId) -> Option<TypeId> {
        self.expr_info[expr.index()].as_ref().map(|info| info.ty)
    }

    /// Resolved type of an expression that `expression` already accepted.
    pub(crate) fn resolved_ty(&self, expr: ExprId) -> TypeId {
        self.expr_ty(expr)
            .unwrap_or_else(|| panic!("expression has no resolved type"))
    }

    pub(crate) fn record_statement(&mut self, stmt: StmtId, block: Option<lume_ir::BlockId>) {
        self.stmt_info[stmt.index()] = Some(SemStatement { block });
    }

    pub(crate) fn with_current_statement<R>(
        &mut self,
        stmt: StmtId,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let prev = self.current_statement.replace(stmt);
        let result = f(self);
        self.current_statement = prev;
        result
    }

    /// Track a module-scope variable reference on the current function.
    pub(crate) fn set_referenced_from_function_if_needed(
        &mut self,
        var: VarInfoId,
        local: bool,
    ) {
        let Some(current) = self.current_function else {
            return;
        };
        let sc = self.variables[var].storage_class;
        if sc == StorageClass::None || sc == StorageClass::Function {
            return;
        }
        let func = &mut self.functions[current];
        push_unique(&mut func.referenced_module_vars, var);
        if local {
            push_unique(&mut func.local_referenced_module_vars, var);
        }
    }
}

/// Append preserving insertion order, skipping duplicates.
pub(crate) fn push_unique<T: PartialEq>(list: &mut Vec<T>, value: T) {
    if !list.contains(&value) {
        list.push(value);
    }
}
