//! The closed type variant set and struct declarations.

use lume_ir::ast::{
    AccessMode, ImageFormat, MemberDecoration, SamplerKind, StorageClass, TextureDimension,
};
use lume_ir::{Name, Span, StructId, TypeId};

/// A value type.
///
/// Element references are `TypeId` handles into the same interner, so `Type`
/// is `Copy` and structural equality of interned types is handle equality.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Type {
    Void,
    Bool,
    I32,
    U32,
    F32,
    Vector {
        elem: TypeId,
        size: u32,
    },
    Matrix {
        elem: TypeId,
        columns: u32,
        rows: u32,
    },
    /// A fixed or runtime-sized array. `count == 0` means runtime-sized.
    Array {
        elem: TypeId,
        count: u32,
        /// Explicit element stride from a stride decoration, if any.
        stride: Option<u32>,
    },
    Pointer {
        elem: TypeId,
        storage_class: StorageClass,
    },
    /// A named alias of another type.
    Alias {
        name: Name,
        elem: TypeId,
    },
    /// An access-qualified type.
    AccessControl {
        access: AccessMode,
        elem: TypeId,
    },
    Struct(StructId),
    Sampler(SamplerKind),
    SampledTexture {
        dim: TextureDimension,
        elem: TypeId,
    },
    MultisampledTexture {
        dim: TextureDimension,
        elem: TypeId,
    },
    DepthTexture {
        dim: TextureDimension,
    },
    StorageTexture {
        dim: TextureDimension,
        format: ImageFormat,
        elem: TypeId,
    },
}

impl Type {
    pub fn is_scalar(self) -> bool {
        matches!(self, Type::Bool | Type::I32 | Type::U32 | Type::F32)
    }

    pub fn is_numeric_scalar(self) -> bool {
        matches!(self, Type::I32 | Type::U32 | Type::F32)
    }

    pub fn is_integer_scalar(self) -> bool {
        matches!(self, Type::I32 | Type::U32)
    }

    /// Whether this array type is runtime-sized.
    pub fn is_runtime_array(self) -> bool {
        matches!(self, Type::Array { count: 0, .. })
    }
}

/// A struct member declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructMember {
    pub name: Name,
    pub ty: TypeId,
    pub decorations: Vec<MemberDecoration>,
    pub span: Span,
}

/// A struct declaration registered with the type interner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructDecl {
    pub name: Name,
    pub members: Vec<StructMember>,
    /// Whether the struct carries the block decoration marking it valid for
    /// buffer-backed storage.
    pub block_decoration: bool,
    pub span: Span,
}
