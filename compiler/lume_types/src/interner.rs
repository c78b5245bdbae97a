//! Identity-uniquing type interner.
//!
//! Follows the same pattern as `StringInterner` in `lume_ir`: a shared
//! reference can intern, and `TypeId` handles are stable for the life of the
//! interner. Derived types (pointer-of, vector-of, ...) are created on demand
//! through the convenience constructors.

use std::sync::Arc;

use lume_ir::ast::{
    AccessMode, ImageFormat, SamplerKind, StorageClass, TextureDimension,
};
use lume_ir::{Name, StringInterner, StructId, TypeId};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::{StructDecl, Type};

struct InternerState {
    map: FxHashMap<Type, u32>,
    types: Vec<Type>,
    structs: Vec<Arc<StructDecl>>,
}

/// Type interner.
///
/// Pre-interns the scalar primitives at the indices promised by the `TypeId`
/// constants; every other type is interned on first use.
pub struct TypeInterner {
    state: RwLock<InternerState>,
}

impl TypeInterner {
    pub fn new() -> Self {
        let primitives = [Type::Void, Type::Bool, Type::I32, Type::U32, Type::F32];
        let mut map = FxHashMap::default();
        for (idx, ty) in primitives.iter().enumerate() {
            map.insert(*ty, idx as u32);
        }
        debug_assert_eq!(primitives.len(), TypeId::FIRST_COMPOUND as usize);
        TypeInterner {
            state: RwLock::new(InternerState {
                map,
                types: primitives.to_vec(),
                structs: Vec::new(),
            }),
        }
    }

    /// Intern a type, returning its identity handle.
    pub fn intern(&self, ty: Type) -> TypeId {
        {
            let state = self.state.read();
            if let Some(&idx) = state.map.get(&ty) {
                return TypeId::from_raw(idx);
            }
        }
        let mut state = self.state.write();
        if let Some(&idx) = state.map.get(&ty) {
            return TypeId::from_raw(idx);
        }
        let idx = u32::try_from(state.types.len())
            .unwrap_or_else(|_| panic!("type interner exceeded {} entries", u32::MAX));
        state.types.push(ty);
        state.map.insert(ty, idx);
        TypeId::from_raw(idx)
    }

    /// Look up the type for a handle.
    pub fn get(&self, id: TypeId) -> Type {
        self.state.read().types[id.index()]
    }

    /// Register a struct declaration and intern its nominal type.
    pub fn declare_struct(&self, decl: StructDecl) -> (StructId, TypeId) {
        let struct_id = {
            let mut state = self.state.write();
            let id = StructId::from_raw(state.structs.len() as u32);
            state.structs.push(Arc::new(decl));
            id
        };
        (struct_id, self.intern(Type::Struct(struct_id)))
    }

    /// Look up a registered struct declaration.
    pub fn struct_decl(&self, id: StructId) -> Arc<StructDecl> {
        Arc::clone(&self.state.read().structs[id.index()])
    }

    /// Number of registered struct declarations.
    pub fn struct_count(&self) -> usize {
        self.state.read().structs.len()
    }

    // Convenience constructors for derived types.

    pub fn vector(&self, elem: TypeId, size: u32) -> TypeId {
        self.intern(Type::Vector { elem, size })
    }

    pub fn matrix(&self, elem: TypeId, columns: u32, rows: u32) -> TypeId {
        self.intern(Type::Matrix {
            elem,
            columns,
            rows,
        })
    }

    pub fn array(&self, elem: TypeId, count: u32, stride: Option<u32>) -> TypeId {
        self.intern(Type::Array {
            elem,
            count,
            stride,
        })
    }

    pub fn runtime_array(&self, elem: TypeId, stride: Option<u32>) -> TypeId {
        self.array(elem, 0, stride)
    }

    pub fn pointer(&self, elem: TypeId, storage_class: StorageClass) -> TypeId {
        self.intern(Type::Pointer {
            elem,
            storage_class,
        })
    }

    pub fn alias(&self, name: Name, elem: TypeId) -> TypeId {
        self.intern(Type::Alias { name, elem })
    }

    pub fn access(&self, access: AccessMode, elem: TypeId) -> TypeId {
        self.intern(Type::AccessControl { access, elem })
    }

    pub fn sampler(&self, kind: SamplerKind) -> TypeId {
        self.intern(Type::Sampler(kind))
    }

    pub fn sampled_texture(&self, dim: TextureDimension, elem: TypeId) -> TypeId {
        self.intern(Type::SampledTexture { dim, elem })
    }

    pub fn multisampled_texture(&self, dim: TextureDimension, elem: TypeId) -> TypeId {
        self.intern(Type::MultisampledTexture { dim, elem })
    }

    pub fn depth_texture(&self, dim: TextureDimension) -> TypeId {
        self.intern(Type::DepthTexture { dim })
    }

    pub fn storage_texture(
        &self,
        dim: TextureDimension,
        format: ImageFormat,
        elem: TypeId,
    ) -> TypeId {
        self.intern(Type::StorageTexture { dim, format, elem })
    }

    // Structural queries. All take handles and chase wrappers through the
    // interner.

    pub fn is_scalar(&self, id: TypeId) -> bool {
        self.get(id).is_scalar()
    }

    pub fn is_numeric_scalar(&self, id: TypeId) -> bool {
        self.get(id).is_numeric_scalar()
    }

    pub fn is_integer_scalar(&self, id: TypeId) -> bool {
        self.get(id).is_integer_scalar()
    }

    /// Strip any chain of aliases.
    pub fn unwrap_alias(&self, id: TypeId) -> TypeId {
        let mut current = id;
        while let Type::Alias { elem, .. } = self.get(current) {
            current = elem;
        }
        current
    }

    /// Strip any chain of aliases and access qualifiers.
    pub fn unwrap_if_needed(&self, id: TypeId) -> TypeId {
        let mut current = id;
        loop {
            match self.get(current) {
                Type::Alias { elem, .. } | Type::AccessControl { elem, .. } => current = elem,
                _ => return current,
            }
        }
    }

    /// Strip one pointer layer, if present.
    pub fn unwrap_ptr_if_needed(&self, id: TypeId) -> TypeId {
        match self.get(id) {
            Type::Pointer { elem, .. } => elem,
            _ => id,
        }
    }

    /// Strip pointers, aliases, and access qualifiers, repeatedly.
    pub fn unwrap_all(&self, id: TypeId) -> TypeId {
        let mut current = id;
        loop {
            match self.get(current) {
                Type::Alias { elem, .. }
                | Type::AccessControl { elem, .. }
                | Type::Pointer { elem, .. } => current = elem,
                _ => return current,
            }
        }
    }

    /// Whether the type (after unwrapping) is a vector of bools.
    pub fn is_bool_vector(&self, id: TypeId) -> bool {
        match self.get(self.unwrap_all(id)) {
            Type::Vector { elem, .. } => self.get(self.unwrap_all(elem)) == Type::Bool,
            _ => false,
        }
    }

    /// Human-readable name for diagnostics.
    pub fn friendly_name(&self, id: TypeId, names: &StringInterner) -> String {
        match self.get(id) {
            Type::Void => "void".to_owned(),
            Type::Bool => "bool".to_owned(),
            Type::I32 => "i32".to_owned(),
            Type::U32 => "u32".to_owned(),
            Type::F32 => "f32".to_owned(),
            Type::Vector { elem, size } => {
                format!("vec{size}<{}>", self.friendly_name(elem, names))
            }
            Type::Matrix {
                elem,
                columns,
                rows,
            } => format!("mat{columns}x{rows}<{}>", self.friendly_name(elem, names)),
            Type::Array {
                elem, count: 0, ..
            } => format!("array<{}>", self.friendly_name(elem, names)),
            Type::Array { elem, count, .. } => {
                format!("array<{}, {count}>", self.friendly_name(elem, names))
            }
            Type::Pointer {
                elem,
                storage_class,
            } => format!("ptr<{storage_class}, {}>", self.friendly_name(elem, names)),
            Type::Alias { name, .. } => names.resolve(name).to_owned(),
            Type::AccessControl { access, elem } => {
                format!("[[access({access})]] {}", self.friendly_name(elem, names))
            }
            Type::Struct(struct_id) => names.resolve(self.struct_decl(struct_id).name).to_owned(),
            Type::Sampler(kind) => kind.to_string(),
            Type::SampledTexture { dim, elem } => {
                format!("texture_{dim}<{}>", self.friendly_name(elem, names))
            }
            Type::MultisampledTexture { dim, elem } => {
                format!("texture_multisampled_{dim}<{}>", self.friendly_name(elem, names))
            }
            Type::DepthTexture { dim } => format!("texture_depth_{dim}"),
            Type::StorageTexture { dim, format, .. } => {
                format!("texture_storage_{dim}<{format}>")
            }
        }
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        TypeInterner::new()
    }
}
