//! Expression nodes.

use std::fmt;

use super::operators::{BinaryOp, UnaryOp};
use crate::{ExprId, Name, Span, TypeId};

/// A literal value.
///
/// Also serves as the scalar constructor expression: a literal's type is the
/// scalar type of its variant.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Literal {
    Bool(bool),
    I32(i32),
    U32(u32),
    F32(f32),
}

impl Literal {
    /// Bit pattern used for switch case selector comparison. Only integer
    /// literals are valid selectors.
    pub fn switch_value(self) -> Option<u32> {
        match self {
            #[allow(clippy::cast_sign_loss)]
            Literal::I32(v) => Some(v as u32),
            Literal::U32(v) => Some(v),
            Literal::Bool(_) | Literal::F32(_) => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(v) => write!(f, "{v}"),
            Literal::I32(v) => write!(f, "{v}"),
            Literal::U32(v) => write!(f, "{v}u"),
            Literal::F32(v) => write!(f, "{v}"),
        }
    }
}

/// Expression node.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

/// Expression variants.
///
/// All children are arena indices, never boxes.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// A literal (scalar constructor).
    Literal(Literal),
    /// An identifier reference.
    Ident(Name),
    /// A unary operation.
    Unary { op: UnaryOp, expr: ExprId },
    /// A binary operation.
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    /// Array/vector/matrix index access: `base[index]`.
    Index { base: ExprId, index: ExprId },
    /// Struct member access or vector swizzle: `base.member`.
    Member {
        base: ExprId,
        member: Name,
        member_span: Span,
    },
    /// A call. The target must be an identifier expression naming a function
    /// or intrinsic; there are no function values.
    Call { target: ExprId, args: Vec<ExprId> },
    /// Type constructor: `vec3<f32>(...)`, `mat2x2<f32>()`, `array<f32, 4>(...)`.
    Construct { ty: TypeId, args: Vec<ExprId> },
    /// Bit reinterpretation to an explicitly annotated type.
    Bitcast { ty: TypeId, expr: ExprId },
}
