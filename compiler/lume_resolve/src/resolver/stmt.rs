//! Statement resolution and control-flow validation.

use lume_diagnostic::ErrorCode;
use lume_ir::ast::{Literal, StmtKind, StorageClass};
use lume_ir::{BlockId, ExprId, Span, StmtId, TypeId, VarId};
use lume_types::Type;
use rustc_hash::FxHashSet;

use super::scope::BlockKind;
use super::Resolver;

impl Resolver<'_> {
    pub(crate) fn block_statement(&mut self, block: BlockId) -> bool {
        self.block_scope(block, BlockKind::Generic, |r| r.statements(block))
    }

    pub(crate) fn statements(&mut self, block: BlockId) -> bool {
        let stmts = self.module().block(block).stmts.clone();
        for stmt in stmts {
            if !self.statement(stmt) {
                return false;
            }
        }
        true
    }

    pub(crate) fn statement(&mut self, stmt: StmtId) -> bool {
        let enclosing = self.current_block.map(|idx| self.blocks[idx].ast_block);
        self.record_statement(stmt, enclosing);

        let node = self.module().stmt(stmt);
        let span = node.span;
        let kind = node.kind.clone();
        self.with_current_statement(stmt, |r| match kind {
            StmtKind::Assign { lhs, rhs } => r.assignment(lhs, rhs, span),
            StmtKind::Block(block) => r.block_statement(block),
            StmtKind::Break => {
                let in_breakable = r.current_block.is_some_and(|block| {
                    r.find_first_parent(block, BlockKind::Loop).is_some()
                        || r.find_first_parent(block, BlockKind::SwitchCase).is_some()
                });
                if !in_breakable {
                    r.error("break statement must be in a loop or switch case", span);
                    return false;
                }
                true
            }
            StmtKind::Call(call) => r.expression(call),
            StmtKind::Case { body, .. } => {
                r.block_scope(body, BlockKind::SwitchCase, |r| r.statements(body))
            }
            StmtKind::Continue => {
                // Track where the first continue falls relative to this
                // loop's declarations.
                let loop_block = r
                    .current_block
                    .and_then(|block| r.find_first_parent(block, BlockKind::Loop));
                let Some(loop_block) = loop_block else {
                    r.error("continue statement must be in a loop", span);
                    return false;
                };
                let info = &mut r.blocks[loop_block];
                if info.first_continue.is_none() {
                    info.first_continue = Some(info.decls.len());
                }
                true
            }
            StmtKind::Discard | StmtKind::Fallthrough => true,
            StmtKind::Else { .. } => {
                panic!("else clause resolved outside of its if statement")
            }
            StmtKind::If {
                condition,
                body,
                else_stmts,
            } => r.if_statement(condition, body, &else_stmts),
            StmtKind::Loop { body, continuing } => {
                // The body block parents the continuing block so the scope
                // carries across the two.
                r.block_scope(body, BlockKind::Loop, |r| {
                    if !r.statements(body) {
                        return false;
                    }
                    if let Some(continuing) = continuing {
                        if !r.block_scope(continuing, BlockKind::LoopContinuing, |r| {
                            r.statements(continuing)
                        }) {
                            return false;
                        }
                    }
                    true
                })
            }
            StmtKind::Return { value } => r.return_statement(stmt, value, span),
            StmtKind::Switch { selector, cases } => r.switch_statement(selector, &cases, span),
            StmtKind::VarDecl(var) => r.variable_decl_statement(var, span),
        })
    }

    fn if_statement(&mut self, condition: ExprId, body: BlockId, else_stmts: &[StmtId]) -> bool {
        if !self.expression(condition) {
            return false;
        }
        let cond_type = self.types().unwrap_all(self.resolved_ty(condition));
        if cond_type != TypeId::BOOL {
            let message = format!(
                "if statement condition must be bool, got {}",
                self.friendly(cond_type)
            );
            let span = self.module().expr(condition).span;
            self.error(message, span);
            return false;
        }

        if !self.block_statement(body) {
            return false;
        }

        for &else_id in else_stmts {
            // Else clauses hang off the if statement rather than living in a
            // block of their own.
            self.record_statement(else_id, None);
            let StmtKind::Else {
                condition,
                body,
            } = self.module().stmt(else_id).kind
            else {
                panic!("if statement else clause is not an else statement");
            };
            let ok = self.with_current_statement(else_id, |r| {
                if let Some(condition) = condition {
                    if !r.expression(condition) {
                        return false;
                    }
                }
                r.block_statement(body)
            });
            if !ok {
                return false;
            }
        }
        true
    }

    fn return_statement(&mut self, stmt: StmtId, value: Option<ExprId>, span: Span) -> bool {
        let Some(current) = self.current_function else {
            panic!("return statement resolved outside of a function");
        };
        self.functions[current].return_statements.push(stmt);

        // Validate after resolving the value so its type is available.
        let ret_type = match value {
            Some(value) => {
                if !self.expression(value) {
                    return false;
                }
                self.types().unwrap_all(self.resolved_ty(value))
            }
            None => TypeId::VOID,
        };

        let func_type = self.module().function(self.functions[current].decl).return_ty;
        let declared = self.types().unwrap_all(func_type);
        if self.canonical(declared) != self.canonical(ret_type) {
            let message = format!(
                "return statement type must match its function return type, \
                 returned '{}', expected '{}'",
                self.friendly(ret_type),
                self.friendly(func_type)
            );
            self.error_code(ErrorCode::ReturnTypeMismatch, message, span);
            return false;
        }
        true
    }

    fn switch_statement(&mut self, selector: ExprId, cases: &[StmtId], span: Span) -> bool {
        if !self.expression(selector) {
            return false;
        }
        for &case in cases {
            if !self.statement(case) {
                return false;
            }
        }
        self.validate_switch(selector, cases, span)
    }

    fn validate_switch(&mut self, selector: ExprId, cases: &[StmtId], span: Span) -> bool {
        let cond_type = self.types().unwrap_all(self.resolved_ty(selector));
        if !self.types().is_integer_scalar(cond_type) {
            let selector_span = self.module().expr(selector).span;
            self.error_code(
                ErrorCode::V0025,
                "switch statement selector expression must be of a scalar integer type",
                selector_span,
            );
            return false;
        }

        let mut has_default = false;
        let mut seen: FxHashSet<u32> = FxHashSet::default();
        for &case in cases {
            let case_span = self.module().stmt(case).span;
            let StmtKind::Case { ref selectors, .. } = self.module().stmt(case).kind else {
                panic!("switch case is not a case statement");
            };
            if selectors.is_empty() {
                if has_default {
                    self.error_code(
                        ErrorCode::V0008,
                        "switch statement must have exactly one default clause",
                        case_span,
                    );
                    return false;
                }
                has_default = true;
            }

            for sel in selectors {
                let sel_type = match sel.value {
                    Literal::Bool(_) => TypeId::BOOL,
                    Literal::I32(_) => TypeId::I32,
                    Literal::U32(_) => TypeId::U32,
                    Literal::F32(_) => TypeId::F32,
                };
                if cond_type != sel_type {
                    self.error_code(
                        ErrorCode::V0026,
                        "the case selector values must have the same type as the selector expression.",
                        case_span,
                    );
                    return false;
                }
                if let Some(value) = sel.value.switch_value() {
                    if !seen.insert(value) {
                        let message = format!(
                            "a literal value must not appear more than once in \
                             the case selectors for a switch statement: '{}'",
                            sel.value
                        );
                        self.error_code(ErrorCode::V0027, message, case_span);
                        return false;
                    }
                }
            }
        }

        if !has_default {
            self.error("switch statement must have a default clause", span);
            return false;
        }

        if let Some(&last_case) = cases.last() {
            let StmtKind::Case { body, .. } = self.module().stmt(last_case).kind else {
                panic!("switch case is not a case statement");
            };
            if let Some(&last_stmt) = self.module().block(body).stmts.last() {
                if matches!(self.module().stmt(last_stmt).kind, StmtKind::Fallthrough) {
                    let fallthrough_span = self.module().stmt(last_stmt).span;
                    self.error_code(
                        ErrorCode::V0028,
                        "a fallthrough statement must not appear as the last \
                         statement in last clause of a switch",
                        fallthrough_span,
                    );
                    return false;
                }
            }
        }
        true
    }

    fn variable_decl_statement(&mut self, var_id: VarId, span: Span) -> bool {
        let var = self.module().var(var_id);

        if let Some((_, is_global)) = self.scope.get(var.name) {
            let code = if is_global {
                ErrorCode::V0013
            } else {
                ErrorCode::V0014
            };
            let message = format!("redeclared identifier '{}'", self.name_str(var.name));
            self.error_code(code, message, span);
            return false;
        }

        let mut ty = var.ty;
        if let Some(ctor) = var.constructor {
            if !self.expression(ctor) {
                return false;
            }
            let rhs_type = self.resolved_ty(ctor);

            // Without a declared type, infer it from the right-hand side.
            let declared =
                ty.get_or_insert_with(|| self.types().unwrap_ptr_if_needed(rhs_type));
            let declared = *declared;

            if !self.is_valid_assignment(declared, rhs_type) {
                let message = format!(
                    "variable of type '{}' cannot be initialized with a value of type '{}'",
                    self.friendly(declared),
                    self.friendly(rhs_type)
                );
                self.error(message, span);
                return false;
            }
        }

        let Some(info) = self.variable(var_id, ty) else {
            return false;
        };
        // Keep the declared (possibly aliased) type on the record; users
        // observe it through identifier expressions.
        if let Some(declared) = ty {
            self.variables[info].ty = declared;
        }
        self.scope.set(var.name, info);
        if let Some(block) = self.current_block {
            self.blocks[block].decls.push(var_id);
        }

        if !self.validate_variable(info, var.span) {
            return false;
        }

        if !var.is_const {
            let sc = self.variables[info].storage_class;
            if sc != StorageClass::Function {
                if sc != StorageClass::None {
                    self.error("function variable has a non-function storage class", span);
                    return false;
                }
                self.variables[info].storage_class = StorageClass::Function;
            }
        }

        let sc = self.variables[info].storage_class;
        let var_ty = self.variables[info].ty;
        let var_span = self.module().var(var_id).span;
        if !self.apply_storage_class_usage_to_type(sc, var_ty, var_span) {
            let message = format!(
                "while instantiating variable {}",
                self.name_str(self.module().var(var_id).name)
            );
            self.note(message, var_span);
            return false;
        }
        true
    }

    pub(crate) fn is_valid_assignment(&mut self, lhs: TypeId, rhs: TypeId) -> bool {
        let l = self.types().unwrap_if_needed(lhs);
        let l = self.canonical(l);
        let r = self.types().unwrap_if_needed(rhs);
        if l == self.canonical(r) {
            return true;
        }
        // Try the dereferenced right-hand side.
        let r = self.types().unwrap_all(rhs);
        l == self.canonical(r)
    }

    fn assignment(&mut self, lhs: ExprId, rhs: ExprId, span: Span) -> bool {
        if !self.expression(lhs) || !self.expression(rhs) {
            return false;
        }

        let lhs_type = self.types().unwrap_all(self.resolved_ty(lhs));
        let rhs_type = self.resolved_ty(rhs);
        if !self.is_valid_assignment(lhs_type, rhs_type) {
            let message = format!(
                "invalid assignment: cannot assign value of type '{}' to a variable of type '{}'",
                self.friendly(rhs_type),
                self.friendly(lhs_type)
            );
            self.error(message, span);
            return false;
        }

        // Pointers themselves are not storable; the right-hand side must
        // dereference to something that is.
        let rhs_result = self.types().unwrap_all(rhs_type);
        if !self.is_storable(rhs_result) {
            let message = format!(
                "invalid assignment: right-hand-side is not storable: {}",
                self.friendly(rhs_type)
            );
            self.error_code(ErrorCode::InvalidAssignment, message, span);
            return false;
        }

        // The left-hand side must reference storage.
        let lhs_result = self.types().unwrap_if_needed(self.resolved_ty(lhs));
        if !matches!(self.types().get(lhs_result), Type::Pointer { .. }) {
            // Assigning to a constant is common enough to deserve its own
            // message.
            if let lume_ir::ast::ExprKind::Ident(name) = self.module().expr(lhs).kind {
                if let Some((info, _)) = self.scope.get(name) {
                    if self.module().var(self.variables[info].decl).is_const {
                        let message =
                            format!("cannot re-assign a constant: '{}'", self.name_str(name));
                        self.error_code(ErrorCode::V0021, message, span);
                        return false;
                    }
                }
            }
            let message = format!(
                "invalid assignment: left-hand-side does not reference storage: {}",
                self.friendly(self.resolved_ty(lhs))
            );
            self.error_code(ErrorCode::InvalidAssignment, message, span);
            return false;
        }
        true
    }
}
