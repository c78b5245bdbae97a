//! Expression resolution.
//!
//! `expression` is idempotent: revisiting a resolved expression is a no-op.
//! Identifiers naming non-constant variables resolve to a pointer in the
//! variable's storage class; most other forms peel that pointer off again
//! where a value is consumed.

use lume_intrinsic::{lookup, parse_intrinsic, IntrinsicKind};
use lume_ir::ast::{ExprKind, Literal};
use lume_ir::{ExprId, Name, Span, TypeId};
use lume_types::Type;
use smallvec::SmallVec;

use crate::sem::{CallTarget, SemExprKind};
use crate::stack::ensure_sufficient_stack;

use super::scope::BlockKind;
use super::{push_unique, Resolver};
use lume_diagnostic::ErrorCode;

impl Resolver<'_> {
    pub(crate) fn expression(&mut self, expr: ExprId) -> bool {
        if self.expr_ty(expr).is_some() {
            return true; // Already resolved
        }
        ensure_sufficient_stack(|| {
            let node = self.module().expr(expr);
            let span = node.span;
            match node.kind {
                ExprKind::Literal(lit) => {
                    let ty = match lit {
                        Literal::Bool(_) => TypeId::BOOL,
                        Literal::I32(_) => TypeId::I32,
                        Literal::U32(_) => TypeId::U32,
                        Literal::F32(_) => TypeId::F32,
                    };
                    self.set_expr_type(expr, ty, SemExprKind::Plain);
                    true
                }
                ExprKind::Ident(name) => self.identifier(expr, name, span),
                ExprKind::Unary { expr: inner, .. } => {
                    // Result type matches the operand type.
                    if !self.expression(inner) {
                        return false;
                    }
                    let ty = self.types().unwrap_ptr_if_needed(self.resolved_ty(inner));
                    self.set_expr_type(expr, ty, SemExprKind::Plain);
                    true
                }
                ExprKind::Binary { op, lhs, rhs } => self.binary(expr, op, lhs, rhs, span),
                ExprKind::Index { base, index } => self.index_accessor(expr, base, index, span),
                ExprKind::Member {
                    base,
                    member,
                    member_span,
                } => self.member_accessor(expr, base, member, member_span, span),
                ExprKind::Call { target, ref args } => {
                    let args = args.clone();
                    self.call(expr, target, &args, span)
                }
                ExprKind::Construct { ty, ref args } => {
                    let args = args.clone();
                    self.type_constructor(expr, ty, &args)
                }
                ExprKind::Bitcast { ty, expr: inner } => {
                    if !self.expression(inner) {
                        return false;
                    }
                    self.set_expr_type(expr, ty, SemExprKind::Plain);
                    true
                }
            }
        })
    }

    fn identifier(&mut self, expr: ExprId, name: Name, span: Span) -> bool {
        if let Some((var, _)) = self.scope.get(name) {
            // A constant is the type, but a variable is always a pointer, so
            // synthesize the pointer around the variable type.
            let info = &self.variables[var];
            let is_const = self.module().var(info.decl).is_const;
            let ty = if is_const || matches!(self.types().get(info.ty), Type::Pointer { .. }) {
                info.ty
            } else {
                self.types().pointer(info.ty, info.storage_class)
            };
            let decl = info.decl;
            self.set_expr_type(expr, ty, SemExprKind::VariableUse(decl));
            self.variables[var].users.push(expr);
            self.set_referenced_from_function_if_needed(var, true);

            // An identifier in a loop continuing block must not refer to a
            // declaration bypassed by a continue in the loop body.
            if let Some(block) = self.current_block {
                if let Some(continuing) = self.find_first_parent(block, BlockKind::LoopContinuing) {
                    if let Some(loop_block) = self.find_first_parent(continuing, BlockKind::Loop) {
                        let info = &self.blocks[loop_block];
                        if let Some(first_continue) = info.first_continue {
                            let bypassed = info.decls[first_continue..]
                                .iter()
                                .any(|&v| self.module().var(v).name == name);
                            if bypassed {
                                let message = format!(
                                    "continue statement bypasses declaration of '{}' in continuing block",
                                    self.name_str(name)
                                );
                                self.error(message, span);
                                return false;
                            }
                        }
                    }
                }
            }
            return true;
        }

        if self.function_names.contains_key(&name) {
            self.error("missing '(' for function call", span.end_point());
            return false;
        }
        if parse_intrinsic(self.name_str(name)).is_some() {
            self.error("missing '(' for intrinsic call", span.end_point());
            return false;
        }
        let message = format!(
            "identifier must be declared before use: {}",
            self.name_str(name)
        );
        self.error_code(ErrorCode::V0006, message, span);
        false
    }

    fn index_accessor(&mut self, expr: ExprId, base: ExprId, index: ExprId, span: Span) -> bool {
        if !self.expression(base) || !self.expression(index) {
            return false;
        }

        let res = self.resolved_ty(base);
        let parent = self.types().unwrap_all(res);
        let ret = match self.types().get(parent) {
            Type::Array { elem, .. } | Type::Vector { elem, .. } => elem,
            Type::Matrix { elem, rows, .. } => self.types().vector(elem, rows),
            _ => {
                let message = format!(
                    "invalid parent type ({}) in array accessor",
                    self.friendly(parent)
                );
                self.error(message, span);
                return false;
            }
        };

        // Extracting through a pointer yields a pointer. Extracting a
        // non-scalar element out of an array also does; it needs function
        // storage synthesized for it downstream.
        let ret = if let Type::Pointer { storage_class, .. } = self.types().get(res) {
            self.types().pointer(ret, storage_class)
        } else if let Type::Array { elem, .. } = self.types().get(parent) {
            if self.types().is_scalar(elem) {
                ret
            } else {
                self.types()
                    .pointer(ret, lume_ir::ast::StorageClass::Function)
            }
        } else {
            ret
        };
        self.set_expr_type(expr, ret, SemExprKind::Plain);
        true
    }

    fn member_accessor(
        &mut self,
        expr: ExprId,
        base: ExprId,
        member: Name,
        member_span: Span,
        span: Span,
    ) -> bool {
        if !self.expression(base) {
            return false;
        }

        let res = self.resolved_ty(base);
        let data_type = self
            .types()
            .unwrap_if_needed(self.types().unwrap_ptr_if_needed(res));

        match self.types().get(data_type) {
            Type::Struct(struct_id) => {
                if !self.structure(struct_id) {
                    return false;
                }
                let decl = self.types().struct_decl(struct_id);
                let Some(index) = decl.members.iter().position(|m| m.name == member) else {
                    let message =
                        format!("struct member {} not found", self.name_str(member));
                    self.error(message, span);
                    return false;
                };
                let mut ret = decl.members[index].ty;
                if let Type::Pointer { storage_class, .. } = self.types().get(res) {
                    ret = self.types().pointer(ret, storage_class);
                }
                self.set_expr_type(
                    expr,
                    ret,
                    SemExprKind::StructMemberAccess {
                        struct_id,
                        member_index: index as u32,
                    },
                );
                true
            }
            Type::Vector { elem, .. } => {
                self.swizzle(expr, res, elem, member, member_span)
            }
            _ => {
                let message = format!(
                    "invalid use of member accessor on a non-vector/non-struct {}",
                    self.friendly(data_type)
                );
                self.error(message, span);
                false
            }
        }
    }

    fn swizzle(
        &mut self,
        expr: ExprId,
        res: TypeId,
        elem: TypeId,
        member: Name,
        member_span: Span,
    ) -> bool {
        let text = self.name_str(member);
        let mut swizzle: SmallVec<[u32; 4]> = SmallVec::new();
        for c in text.chars() {
            match c {
                'x' | 'r' => swizzle.push(0),
                'y' | 'g' => swizzle.push(1),
                'z' | 'b' => swizzle.push(2),
                'w' | 'a' => swizzle.push(3),
                _ => {
                    self.error("invalid vector swizzle character", member_span);
                    return false;
                }
            }
        }

        let size = text.len();
        if size < 1 || size > 4 {
            self.error("invalid vector swizzle size", member_span);
            return false;
        }

        // All characters are valid; reject mixed color and dimension names.
        let rgba = text.chars().all(|c| matches!(c, 'r' | 'g' | 'b' | 'a'));
        let xyzw = text.chars().all(|c| matches!(c, 'x' | 'y' | 'z' | 'w'));
        if !rgba && !xyzw {
            self.error(
                "invalid mixing of vector swizzle characters rgba with xyzw",
                member_span,
            );
            return false;
        }

        let ret = if size == 1 {
            // A single element swizzle is just the element type, through a
            // pointer if the base was one.
            if let Type::Pointer { storage_class, .. } = self.types().get(res) {
                self.types().pointer(elem, storage_class)
            } else {
                elem
            }
        } else {
            self.types().vector(elem, size as u32)
        };
        self.set_expr_type(expr, ret, SemExprKind::Swizzle(swizzle));
        true
    }

    fn call(&mut self, expr: ExprId, target: ExprId, args: &[ExprId], span: Span) -> bool {
        for &arg in args {
            if !self.expression(arg) {
                return false;
            }
        }

        // There are no function values; the callee must be a plain name.
        let ExprKind::Ident(name) = self.module().expr(target).kind else {
            self.error("call target is not an identifier", span);
            return false;
        };
        let name_str = self.name_str(name);

        if let Some(kind) = parse_intrinsic(name_str) {
            return self.intrinsic_call(expr, kind, args, span);
        }

        if let Some(current) = self.current_function {
            let Some(&callee) = self.function_names.get(&name) else {
                let current_name = self.module().function(self.functions[current].decl).name;
                if current_name == name {
                    let message =
                        format!("recursion is not permitted. '{name_str}' attempted to call itself.");
                    self.error_code(ErrorCode::V0004, message, span);
                } else {
                    let message = format!("unable to find called function: {name_str}");
                    self.error_code(ErrorCode::V0006, message, span);
                }
                return false;
            };

            // Functions resolve before they are callable, so the callee's
            // call set is complete; fold it into ours.
            let callee_calls = self.functions[callee].transitive_calls.clone();
            let callee_refs = self.functions[callee].referenced_module_vars.clone();
            let func = &mut self.functions[current];
            push_unique(&mut func.transitive_calls, callee);
            for transitive in callee_calls {
                push_unique(&mut self.functions[current].transitive_calls, transitive);
            }
            for var in callee_refs {
                self.set_referenced_from_function_if_needed(var, false);
            }
        }

        let Some(&callee) = self.function_names.get(&name) else {
            let message = format!("function must be declared before use: '{name_str}'");
            self.error_code(ErrorCode::V0005, message, span);
            return false;
        };
        let decl = self.functions[callee].decl;
        let return_ty = self.module().function(decl).return_ty;
        self.set_expr_type(expr, return_ty, SemExprKind::Call(CallTarget::Function(decl)));
        true
    }

    fn intrinsic_call(
        &mut self,
        expr: ExprId,
        kind: IntrinsicKind,
        args: &[ExprId],
        span: Span,
    ) -> bool {
        let arg_tys: Vec<TypeId> = args.iter().map(|&arg| self.resolved_ty(arg)).collect();
        match lookup(kind, &arg_tys, self.types(), self.names(), span) {
            Ok(overload) => {
                self.set_expr_type(
                    expr,
                    overload.return_ty,
                    SemExprKind::Call(CallTarget::Intrinsic(overload)),
                );
                true
            }
            Err(err) => {
                let span = err.span;
                self.error(err.to_string(), span);
                false
            }
        }
    }

    fn type_constructor(&mut self, expr: ExprId, ty: TypeId, args: &[ExprId]) -> bool {
        for &arg in args {
            if !self.expression(arg) {
                return false;
            }
        }
        self.set_expr_type(expr, ty, SemExprKind::Plain);

        // With the argument types determined, apply the constructor rules.
        match self.types().get(self.types().unwrap_alias(ty)) {
            Type::Vector { elem, size } => self.validate_vector_constructor(ty, elem, size, args),
            Type::Matrix {
                elem,
                columns,
                rows,
            } => self.validate_matrix_constructor(ty, elem, columns, rows, args),
            _ => true,
        }
    }

    fn validate_vector_constructor(
        &mut self,
        vec_ty: TypeId,
        elem: TypeId,
        size: u32,
        args: &[ExprId],
    ) -> bool {
        let elem_type = self.types().unwrap_all(elem);
        let mut cardinality_sum = 0u32;
        for &value in args {
            let value_span = self.module().expr(value).span;
            let value_type = self.types().unwrap_all(self.resolved_ty(value));
            if self.types().is_scalar(value_type) {
                if elem_type != value_type {
                    let message = format!(
                        "type in vector constructor does not match vector type: expected '{}', found '{}'",
                        self.friendly(elem_type),
                        self.friendly(value_type)
                    );
                    self.error(message, value_span);
                    return false;
                }
                cardinality_sum += 1;
            } else if let Type::Vector {
                elem: value_elem,
                size: value_size,
            } = self.types().get(value_type)
            {
                let value_elem_type = self.types().unwrap_all(value_elem);
                // An element type mismatch is only an error with multiple
                // arguments; a lone vector argument is a conversion. A
                // conversion from a bool vector is never allowed.
                if elem_type != value_elem_type
                    && (args.len() > 1 || value_elem_type == TypeId::BOOL)
                {
                    let message = format!(
                        "type in vector constructor does not match vector type: expected '{}', found '{}'",
                        self.friendly(elem_type),
                        self.friendly(value_elem_type)
                    );
                    self.error(message, value_span);
                    return false;
                }
                cardinality_sum += value_size;
            } else {
                let message = format!(
                    "expected vector or scalar type in vector constructor; found: {}",
                    self.friendly(value_type)
                );
                self.error(message, value_span);
                return false;
            }
        }

        // Either a zero-value expression, or the component count of the
        // arguments must add up to the vector cardinality.
        if cardinality_sum > 0 && cardinality_sum != size {
            let first = self.module().expr(args[0]).span;
            let last = self.module().expr(args[args.len() - 1]).span;
            let message = format!(
                "attempted to construct '{}' with {cardinality_sum} component(s)",
                self.friendly(vec_ty)
            );
            self.error(message, first.to(last));
            return false;
        }
        true
    }

    fn validate_matrix_constructor(
        &mut self,
        mat_ty: TypeId,
        elem: TypeId,
        columns: u32,
        rows: u32,
        args: &[ExprId],
    ) -> bool {
        // Zero-value expression.
        if args.is_empty() {
            return true;
        }

        let elem_type = self.types().unwrap_all(elem);
        let column_ty = self.types().vector(elem_type, rows);
        if columns as usize != args.len() {
            let first = self.module().expr(args[0]).span;
            let last = self.module().expr(args[args.len() - 1]).span;
            let message = format!(
                "expected {columns} '{}' arguments in '{}' constructor, found {}",
                self.friendly(column_ty),
                self.friendly(mat_ty),
                args.len()
            );
            self.error(message, first.to(last));
            return false;
        }

        for &value in args {
            let value_span = self.module().expr(value).span;
            let value_type = self.types().unwrap_all(self.resolved_ty(value));
            let column_ok = match self.types().get(value_type) {
                Type::Vector {
                    elem: value_elem,
                    size,
                } => size == rows && self.types().unwrap_all(value_elem) == elem_type,
                _ => false,
            };
            if !column_ok {
                let message = format!(
                    "expected argument type '{}' in '{}' constructor, found '{}'",
                    self.friendly(column_ty),
                    self.friendly(mat_ty),
                    self.friendly(value_type)
                );
                self.error(message, value_span);
                return false;
            }
        }
        true
    }
}
