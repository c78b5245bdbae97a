//! Binary operator validation and result type derivation.

use lume_ir::ast::BinaryOp;
use lume_ir::{ExprId, Span, TypeId};
use lume_types::Type;

use crate::sem::SemExprKind;

use super::Resolver;

/// Canonical operand shape, precomputed once per side.
#[derive(Copy, Clone)]
struct Operand {
    ty: TypeId,
    vec: Option<(TypeId, u32)>,
    mat: Option<(TypeId, u32, u32)>,
}

impl Operand {
    fn vec_elem(&self) -> Option<TypeId> {
        self.vec.map(|(elem, _)| elem)
    }

    fn mat_elem(&self) -> Option<TypeId> {
        self.mat.map(|(elem, _, _)| elem)
    }

    fn is_scalar_of(&self, ty: TypeId) -> bool {
        self.ty == ty
    }
}

fn is_numeric(ty: TypeId) -> bool {
    matches!(ty, TypeId::I32 | TypeId::U32 | TypeId::F32)
}

fn is_integer(ty: TypeId) -> bool {
    matches!(ty, TypeId::I32 | TypeId::U32)
}

impl Resolver<'_> {
    pub(crate) fn binary(
        &mut self,
        expr: ExprId,
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
        span: Span,
    ) -> bool {
        if !self.expression(lhs) || !self.expression(rhs) {
            return false;
        }
        if !self.validate_binary(op, lhs, rhs, span) {
            return false;
        }

        // Bitwise, shift, and additive-style operators take the left operand
        // type.
        if op.is_bitwise() || op.is_bit_shift() || matches!(
            op,
            BinaryOp::Add | BinaryOp::Subtract | BinaryOp::Divide | BinaryOp::Modulo
        ) {
            let ty = self.types().unwrap_ptr_if_needed(self.resolved_ty(lhs));
            self.set_expr_type(expr, ty, SemExprKind::Plain);
            return true;
        }

        // Logical and comparison operators produce bool with the operand
        // arity.
        if op.produces_bool() {
            let param = self.types().unwrap_all(self.resolved_ty(lhs));
            let ty = match self.types().get(param) {
                Type::Vector { size, .. } => self.types().vector(TypeId::BOOL, size),
                _ => TypeId::BOOL,
            };
            self.set_expr_type(expr, ty, SemExprKind::Plain);
            return true;
        }

        debug_assert_eq!(op, BinaryOp::Multiply);
        let lhs_type = self.types().unwrap_all(self.resolved_ty(lhs));
        let rhs_type = self.types().unwrap_all(self.resolved_ty(rhs));
        let ty = self.multiply_result(lhs_type, rhs_type);
        self.set_expr_type(expr, ty, SemExprKind::Plain);
        true
    }

    /// The multiplication result type; the ordering of the cases matters.
    fn multiply_result(&self, lhs: TypeId, rhs: TypeId) -> TypeId {
        let types = self.types();
        let lhs_mat = match types.get(lhs) {
            Type::Matrix {
                elem,
                columns,
                rows,
            } => Some((elem, columns, rows)),
            _ => None,
        };
        let rhs_mat = match types.get(rhs) {
            Type::Matrix {
                elem,
                columns,
                rows,
            } => Some((elem, columns, rows)),
            _ => None,
        };
        let lhs_vec = matches!(types.get(lhs), Type::Vector { .. });
        let rhs_vec = matches!(types.get(rhs), Type::Vector { .. });

        match (lhs_mat, rhs_mat) {
            (Some((elem, _, rows)), Some((_, columns, _))) => {
                types.matrix(elem, columns, rows)
            }
            (Some((elem, _, rows)), None) if rhs_vec => types.vector(elem, rows),
            (None, Some((elem, columns, _))) if lhs_vec => types.vector(elem, columns),
            (Some(_), None) => lhs, // matrix * scalar
            (None, Some(_)) => rhs, // scalar * matrix
            (None, None) if lhs_vec => lhs,
            (None, None) if rhs_vec => rhs,
            (None, None) => lhs, // scalar * scalar
        }
    }

    fn operand(&mut self, expr: ExprId) -> Operand {
        let declared = self.types().unwrap_all(self.resolved_ty(expr));
        let ty = self.canonical(declared);
        let vec = match self.types().get(ty) {
            Type::Vector { elem, size } => Some((elem, size)),
            _ => None,
        };
        let mat = match self.types().get(ty) {
            Type::Matrix {
                elem,
                columns,
                rows,
            } => Some((elem, columns, rows)),
            _ => None,
        };
        Operand { ty, vec, mat }
    }

    fn validate_binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId, span: Span) -> bool {
        let l = self.operand(lhs);
        let r = self.operand(rhs);

        let matching_vec_elem_types = match (l.vec, r.vec) {
            (Some((le, ls)), Some((re, rs))) => le == re && ls == rs,
            _ => false,
        };
        let matching_types = matching_vec_elem_types || l.ty == r.ty;

        if op.is_logical() && matching_types && l.ty == TypeId::BOOL {
            return true;
        }

        // `&` and `|` on booleans are the non-short-circuiting forms; `^`
        // is not defined for bool.
        if matches!(op, BinaryOp::And | BinaryOp::Or)
            && matching_types
            && (l.ty == TypeId::BOOL || l.vec_elem() == Some(TypeId::BOOL))
        {
            return true;
        }

        if op.is_arithmetic() && matching_types {
            if is_numeric(l.ty) {
                return true;
            }
            if l.vec_elem().is_some_and(is_numeric) {
                return true;
            }
        }

        // Multiplication with mixed scalar, vector, and matrix operands.
        if op == BinaryOp::Multiply && self.multiply_valid(l, r) {
            return true;
        }

        if op.is_comparison() {
            let equality = matches!(op, BinaryOp::Equal | BinaryOp::NotEqual);
            if matching_types {
                if l.ty == TypeId::BOOL && equality {
                    return true;
                }
                if is_numeric(l.ty) {
                    return true;
                }
            }
            if matching_vec_elem_types {
                if l.vec_elem() == Some(TypeId::BOOL) && equality {
                    return true;
                }
                if l.vec_elem().is_some_and(is_numeric) {
                    return true;
                }
            }
        }

        if op.is_bitwise() && matching_types && is_integer(l.ty) {
            return true;
        }
        if op.is_bitwise()
            && matching_types
            && l.vec_elem().is_some_and(is_integer)
        {
            return true;
        }

        if op.is_bit_shift() {
            // The same rules cover both directions, despite the computation
            // differing for arithmetic and logical right shifts.
            if is_integer(l.ty) && r.ty == TypeId::U32 {
                return true;
            }
            if l.vec_elem().is_some_and(is_integer) && r.vec_elem() == Some(TypeId::U32) {
                return true;
            }
        }

        let lhs_declared = self.types().unwrap_all(self.resolved_ty(lhs));
        let rhs_declared = self.types().unwrap_all(self.resolved_ty(rhs));
        let message = format!(
            "binary expression operand types are invalid for this operation: {} {op} {}",
            self.friendly(lhs_declared),
            self.friendly(rhs_declared)
        );
        self.error(message, span);
        false
    }

    fn multiply_valid(&self, l: Operand, r: Operand) -> bool {
        // Vector times scalar.
        if l.is_scalar_of(TypeId::F32) && r.vec_elem() == Some(TypeId::F32) {
            return true;
        }
        if l.vec_elem() == Some(TypeId::F32) && r.is_scalar_of(TypeId::F32) {
            return true;
        }

        // Matrix times scalar.
        if l.is_scalar_of(TypeId::F32) && r.mat_elem() == Some(TypeId::F32) {
            return true;
        }
        if l.mat_elem() == Some(TypeId::F32) && r.is_scalar_of(TypeId::F32) {
            return true;
        }

        // Vector times matrix: the vector length must match the matrix rows.
        if let (Some((le, ls)), Some((re, _, rr))) = (l.vec, r.mat) {
            if le == TypeId::F32 && re == TypeId::F32 && ls == rr {
                return true;
            }
        }

        // Matrix times vector: the matrix columns must match the vector
        // length.
        if let (Some((le, lc, _)), Some((re, rs))) = (l.mat, r.vec) {
            if le == TypeId::F32 && re == TypeId::F32 && lc == rs {
                return true;
            }
        }

        // Matrix times matrix.
        if let (Some((le, lc, _)), Some((re, _, rr))) = (l.mat, r.mat) {
            if le == TypeId::F32 && re == TypeId::F32 && lc == rr {
                return true;
            }
        }

        false
    }
}
