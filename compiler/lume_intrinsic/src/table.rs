//! Intrinsic kinds and the overload table.

use std::fmt;

use lume_ir::{Span, StringInterner, TypeId};
use lume_types::{Type, TypeInterner};

/// Built-in functions understood by the resolver.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum IntrinsicKind {
    Abs,
    Acos,
    All,
    Any,
    ArrayLength,
    Asin,
    Atan,
    Atan2,
    Ceil,
    Clamp,
    Cos,
    Cross,
    Distance,
    Dot,
    Exp,
    Exp2,
    Floor,
    Fract,
    InverseSqrt,
    Length,
    Log,
    Log2,
    Max,
    Min,
    Mix,
    Normalize,
    Pow,
    Reflect,
    Round,
    Select,
    Sign,
    Sin,
    Sqrt,
    Step,
    Tan,
}

impl IntrinsicKind {
    pub fn name(self) -> &'static str {
        match self {
            IntrinsicKind::Abs => "abs",
            IntrinsicKind::Acos => "acos",
            IntrinsicKind::All => "all",
            IntrinsicKind::Any => "any",
            IntrinsicKind::ArrayLength => "arrayLength",
            IntrinsicKind::Asin => "asin",
            IntrinsicKind::Atan => "atan",
            IntrinsicKind::Atan2 => "atan2",
            IntrinsicKind::Ceil => "ceil",
            IntrinsicKind::Clamp => "clamp",
            IntrinsicKind::Cos => "cos",
            IntrinsicKind::Cross => "cross",
            IntrinsicKind::Distance => "distance",
            IntrinsicKind::Dot => "dot",
            IntrinsicKind::Exp => "exp",
            IntrinsicKind::Exp2 => "exp2",
            IntrinsicKind::Floor => "floor",
            IntrinsicKind::Fract => "fract",
            IntrinsicKind::InverseSqrt => "inverseSqrt",
            IntrinsicKind::Length => "length",
            IntrinsicKind::Log => "log",
            IntrinsicKind::Log2 => "log2",
            IntrinsicKind::Max => "max",
            IntrinsicKind::Min => "min",
            IntrinsicKind::Mix => "mix",
            IntrinsicKind::Normalize => "normalize",
            IntrinsicKind::Pow => "pow",
            IntrinsicKind::Reflect => "reflect",
            IntrinsicKind::Round => "round",
            IntrinsicKind::Select => "select",
            IntrinsicKind::Sign => "sign",
            IntrinsicKind::Sin => "sin",
            IntrinsicKind::Sqrt => "sqrt",
            IntrinsicKind::Step => "step",
            IntrinsicKind::Tan => "tan",
        }
    }
}

impl fmt::Display for IntrinsicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Map a source identifier to an intrinsic kind, if it names one.
pub fn parse_intrinsic(name: &str) -> Option<IntrinsicKind> {
    use IntrinsicKind::*;
    let kind = match name {
        "abs" => Abs,
        "acos" => Acos,
        "all" => All,
        "any" => Any,
        "arrayLength" => ArrayLength,
        "asin" => Asin,
        "atan" => Atan,
        "atan2" => Atan2,
        "ceil" => Ceil,
        "clamp" => Clamp,
        "cos" => Cos,
        "cross" => Cross,
        "distance" => Distance,
        "dot" => Dot,
        "exp" => Exp,
        "exp2" => Exp2,
        "floor" => Floor,
        "fract" => Fract,
        "inverseSqrt" => InverseSqrt,
        "length" => Length,
        "log" => Log,
        "log2" => Log2,
        "max" => Max,
        "min" => Min,
        "mix" => Mix,
        "normalize" => Normalize,
        "pow" => Pow,
        "reflect" => Reflect,
        "round" => Round,
        "select" => Select,
        "sign" => Sign,
        "sin" => Sin,
        "sqrt" => Sqrt,
        "step" => Step,
        "tan" => Tan,
        _ => return None,
    };
    Some(kind)
}

/// A resolved intrinsic overload.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct IntrinsicOverload {
    pub kind: IntrinsicKind,
    pub return_ty: TypeId,
}

/// Overload resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no matching call to {call}")]
pub struct NoMatchingOverload {
    /// Rendered call signature, e.g. `dot(f32, f32)`.
    pub call: String,
    pub span: Span,
}

/// Shape of an argument after unwrapping pointers, aliases, and access
/// qualifiers.
#[derive(Copy, Clone, PartialEq, Eq)]
enum Shape {
    Scalar(TypeId),
    Vector { elem: TypeId, size: u32 },
    Other,
}

fn shape_of(types: &TypeInterner, ty: TypeId) -> Shape {
    let unwrapped = types.unwrap_all(ty);
    match types.get(unwrapped) {
        Type::Vector { elem, size } => Shape::Vector {
            elem: types.unwrap_all(elem),
            size,
        },
        t if t.is_scalar() => Shape::Scalar(unwrapped),
        _ => Shape::Other,
    }
}

fn is_float(shape: Shape) -> bool {
    matches!(shape, Shape::Scalar(TypeId::F32) | Shape::Vector { elem: TypeId::F32, .. })
}

fn is_numeric(types: &TypeInterner, shape: Shape) -> bool {
    match shape {
        Shape::Scalar(id) => types.is_numeric_scalar(id),
        Shape::Vector { elem, .. } => types.is_numeric_scalar(elem),
        Shape::Other => false,
    }
}

/// The (unwrapped) type a shape denotes.
fn shape_type(types: &TypeInterner, shape: Shape, fallback: TypeId) -> TypeId {
    match shape {
        Shape::Scalar(id) => id,
        Shape::Vector { elem, size } => types.vector(elem, size),
        Shape::Other => fallback,
    }
}

/// Resolve an intrinsic overload for the given argument types.
pub fn lookup(
    kind: IntrinsicKind,
    args: &[TypeId],
    types: &TypeInterner,
    names: &StringInterner,
    span: Span,
) -> Result<IntrinsicOverload, NoMatchingOverload> {
    let shapes: Vec<Shape> = args.iter().map(|&a| shape_of(types, a)).collect();
    let no_match = || {
        let rendered: Vec<String> = args
            .iter()
            .map(|&a| types.friendly_name(a, names))
            .collect();
        NoMatchingOverload {
            call: format!("{kind}({})", rendered.join(", ")),
            span,
        }
    };
    let ok = |return_ty| Ok(IntrinsicOverload { kind, return_ty });

    use IntrinsicKind::*;
    match kind {
        // Component-wise float functions: f32 or vecN<f32> -> same.
        Acos | Asin | Atan | Ceil | Cos | Exp | Exp2 | Floor | Fract | InverseSqrt | Log
        | Log2 | Round | Sign | Sin | Sqrt | Tan => match shapes.as_slice() {
            [s] if is_float(*s) => ok(shape_type(types, *s, TypeId::F32)),
            _ => Err(no_match()),
        },

        // abs accepts any numeric scalar or vector.
        Abs => match shapes.as_slice() {
            [s] if is_numeric(types, *s) => ok(shape_type(types, *s, TypeId::F32)),
            _ => Err(no_match()),
        },

        // Two matching float operands -> same.
        Atan2 | Pow | Step | Reflect => match shapes.as_slice() {
            [a, b] if a == b && is_float(*a) => ok(shape_type(types, *a, TypeId::F32)),
            _ => Err(no_match()),
        },

        // min/max: two matching numeric operands -> same.
        Max | Min => match shapes.as_slice() {
            [a, b] if a == b && is_numeric(types, *a) => ok(shape_type(types, *a, TypeId::F32)),
            _ => Err(no_match()),
        },

        // clamp(e, low, high): three matching numeric operands -> same.
        Clamp => match shapes.as_slice() {
            [a, b, c] if a == b && b == c && is_numeric(types, *a) => {
                ok(shape_type(types, *a, TypeId::F32))
            }
            _ => Err(no_match()),
        },

        // mix(a, b, t): three matching float operands -> same.
        Mix => match shapes.as_slice() {
            [a, b, c] if a == b && b == c && is_float(*a) => {
                ok(shape_type(types, *a, TypeId::F32))
            }
            _ => Err(no_match()),
        },

        Normalize => match shapes.as_slice() {
            [s @ Shape::Vector { elem: TypeId::F32, .. }] => {
                ok(shape_type(types, *s, TypeId::F32))
            }
            _ => Err(no_match()),
        },

        Length => match shapes.as_slice() {
            [s] if is_float(*s) => ok(TypeId::F32),
            _ => Err(no_match()),
        },

        Distance => match shapes.as_slice() {
            [a, b] if a == b && is_float(*a) => ok(TypeId::F32),
            _ => Err(no_match()),
        },

        Dot => match shapes.as_slice() {
            [a @ Shape::Vector { elem: TypeId::F32, .. }, b] if a == b => ok(TypeId::F32),
            _ => Err(no_match()),
        },

        Cross => match shapes.as_slice() {
            [a @ Shape::Vector { elem: TypeId::F32, size: 3 }, b] if a == b => {
                ok(types.vector(TypeId::F32, 3))
            }
            _ => Err(no_match()),
        },

        // select(a, b, cond): matching operands plus a bool selector.
        Select => match shapes.as_slice() {
            [a, b, Shape::Scalar(TypeId::BOOL)] if a == b && *a != Shape::Other => {
                ok(shape_type(types, *a, TypeId::F32))
            }
            _ => Err(no_match()),
        },

        All | Any => match shapes.as_slice() {
            [Shape::Vector { elem: TypeId::BOOL, .. }] => ok(TypeId::BOOL),
            _ => Err(no_match()),
        },

        // arrayLength(a): a runtime-sized array -> u32.
        ArrayLength => match args {
            [arg] => {
                let unwrapped = types.unwrap_all(*arg);
                if types.get(unwrapped).is_runtime_array() {
                    ok(TypeId::U32)
                } else {
                    Err(no_match())
                }
            }
            _ => Err(no_match()),
        },
    }
}
