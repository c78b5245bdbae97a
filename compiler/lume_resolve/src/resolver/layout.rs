//! Struct and array memory layout, storability, and storage-class usage
//! propagation.
//!
//! Layout follows the std430-style rules: scalars are 4/4, vec2 is 8/8,
//! vec3 is 16/12, vec4 is 16/16, and a matCxR lays out as C column vectors
//! of R elements aligned like vecR.

use lume_diagnostic::ErrorCode;
use lume_ir::ast::{MemberDecorationKind, StorageClass};
use lume_ir::{Span, StructId, TypeId};
use lume_types::Type;

use crate::sem::{SemArray, SemStruct, SemStructMember, StorageClassUsage};

use super::Resolver;

const VECTOR_SIZE: [u32; 5] = [0, 0, 8, 12, 16];
const VECTOR_ALIGN: [u32; 5] = [0, 0, 8, 16, 16];

fn round_up(align: u32, value: u32) -> u32 {
    debug_assert!(align > 0);
    value.div_ceil(align) * align
}

impl Resolver<'_> {
    /// Default alignment and size for a type that can appear in a struct or
    /// array. Panics for types with no layout; callers gate on storability
    /// first.
    pub(crate) fn default_align_and_size(
        &mut self,
        ty: TypeId,
        span: Span,
    ) -> Option<(u32, u32)> {
        let cty = self.canonical(ty);
        match self.types().get(cty) {
            // Also captures booleans; those are rejected separately for
            // host-shareable usages.
            t if t.is_scalar() => Some((4, 4)),
            Type::Vector { size, .. } => {
                assert!((2..=4).contains(&size), "invalid vector size: vec{size}");
                Some((VECTOR_ALIGN[size as usize], VECTOR_SIZE[size as usize]))
            }
            Type::Matrix { columns, rows, .. } => {
                assert!(
                    (2..=4).contains(&columns) && (2..=4).contains(&rows),
                    "invalid matrix size: mat{columns}x{rows}"
                );
                let align = VECTOR_ALIGN[rows as usize];
                Some((align, align * columns))
            }
            Type::Struct(struct_id) => {
                if !self.structure(struct_id) {
                    return None;
                }
                let info = &self.struct_info[&struct_id];
                Some((info.align, info.size))
            }
            Type::Array { .. } => {
                let arr = self.types().unwrap_alias(ty);
                let info = self.array_layout(arr, span)?;
                Some((info.align, info.size))
            }
            other => panic!("type has no memory layout: {other:?}"),
        }
    }

    /// Compute (and memoize) layout for an array type handle.
    pub(crate) fn array_layout(&mut self, arr: TypeId, span: Span) -> Option<SemArray> {
        if let Some(&info) = self.array_info.get(&arr) {
            return Some(info);
        }

        let Type::Array {
            elem,
            count,
            stride,
        } = self.types().get(arr)
        else {
            panic!("array layout requested for a non-array type");
        };

        if !self.is_storable(elem) {
            let message = format!(
                "{} cannot be used as an element type of an array",
                self.friendly(elem)
            );
            self.error(message, span);
            return None;
        }

        let (el_align, el_size) = self.default_align_and_size(elem, span)?;

        let stride = match stride {
            Some(explicit) => {
                let valid = explicit >= el_size
                    && explicit >= el_align
                    && explicit % el_align == 0;
                if !valid {
                    self.error(
                        "arrays decorated with the stride attribute must have a \
                         stride that is at least the size of the element type, \
                         and be a multiple of the element type's alignment value.",
                        span,
                    );
                    return None;
                }
                explicit
            }
            None => round_up(el_align, el_size),
        };

        // A runtime-sized array records an element count of zero but is
        // sized as at least one element.
        let info = SemArray {
            align: el_align,
            size: count.max(1) * stride,
            stride,
        };
        self.array_info.insert(arr, info);
        Some(info)
    }

    fn validate_structure(&mut self, struct_id: StructId) -> bool {
        let decl = self.types().struct_decl(struct_id);
        for (index, member) in decl.members.iter().enumerate() {
            let unwrapped = self.types().unwrap_all(member.ty);
            if let Type::Array { count: 0, .. } = self.types().get(unwrapped) {
                if index + 1 != decl.members.len() {
                    self.error_code(
                        ErrorCode::V0015,
                        "runtime arrays may only appear as the last member of a struct",
                        member.span,
                    );
                    return false;
                }
                if !decl.block_decoration {
                    let message = format!(
                        "a struct containing a runtime-sized array requires the \
                         [[block]] attribute: '{}'",
                        self.name_str(decl.name)
                    );
                    self.error_code(ErrorCode::V0015, message, member.span);
                    return false;
                }
            }
        }
        true
    }

    /// Compute (and memoize) layout and usage records for a struct.
    pub(crate) fn structure(&mut self, struct_id: StructId) -> bool {
        if self.struct_info.contains_key(&struct_id) {
            return true;
        }
        if !self.validate_structure(struct_id) {
            return false;
        }

        // For size and alignment, use the decoration when present and the
        // type's defaults otherwise.
        let decl = self.types().struct_decl(struct_id);
        let mut members = Vec::with_capacity(decl.members.len());
        let mut struct_size = 0u32;
        let mut struct_align = 1u32;

        for member in &decl.members {
            if !self.is_storable(member.ty) {
                let message = format!(
                    "{} cannot be used as the type of a structure member",
                    self.friendly(member.ty)
                );
                self.error(message, member.span);
                return false;
            }

            let Some((mut align, mut size)) = self.default_align_and_size(member.ty, member.span)
            else {
                return false;
            };
            let mut offset = struct_size;

            let mut has_offset_deco = false;
            let mut has_align_deco = false;
            let mut has_size_deco = false;
            for deco in &member.decorations {
                match deco.kind {
                    MemberDecorationKind::Offset(value) => {
                        if value < struct_size {
                            self.error("offsets must be in ascending order", deco.span);
                            return false;
                        }
                        offset = value;
                        align = 1;
                        has_offset_deco = true;
                    }
                    MemberDecorationKind::Align(value) => {
                        if value == 0 || !value.is_power_of_two() {
                            self.error(
                                "align value must be a positive, power-of-two integer",
                                deco.span,
                            );
                            return false;
                        }
                        align = value;
                        has_align_deco = true;
                    }
                    MemberDecorationKind::Size(value) => {
                        if value < size {
                            let message = format!(
                                "size must be at least as big as the type's size ({size})"
                            );
                            self.error(message, deco.span);
                            return false;
                        }
                        size = value;
                        has_size_deco = true;
                    }
                    MemberDecorationKind::Builtin(_) | MemberDecorationKind::Location(_) => {}
                }
            }

            if has_offset_deco && (has_align_deco || has_size_deco) {
                self.error(
                    "offset decorations cannot be used with align or size decorations",
                    member.span,
                );
                return false;
            }

            offset = round_up(align, offset);
            members.push(SemStructMember {
                offset,
                align,
                size,
            });
            struct_size = offset + size;
            struct_align = struct_align.max(align);
        }

        let size_no_padding = struct_size;
        let size = round_up(struct_align, struct_size);
        self.struct_info.insert(
            struct_id,
            SemStruct {
                members,
                align: struct_align,
                size,
                size_no_padding,
                storage_class_usage: StorageClassUsage::empty(),
                pipeline_stage_uses: crate::sem::PipelineStageUsage::empty(),
            },
        );
        true
    }

    pub(crate) fn is_storable(&self, ty: TypeId) -> bool {
        let ty = self.types().unwrap_if_needed(ty);
        match self.types().get(ty) {
            t if t.is_scalar() => true,
            Type::Vector { .. } | Type::Matrix { .. } => true,
            Type::Array { elem, .. } => self.is_storable(elem),
            Type::Struct(struct_id) => {
                let decl = self.types().struct_decl(struct_id);
                decl.members.iter().all(|m| self.is_storable(m.ty))
            }
            _ => false,
        }
    }

    pub(crate) fn is_host_shareable(&self, ty: TypeId) -> bool {
        let ty = self.types().unwrap_if_needed(ty);
        match self.types().get(ty) {
            Type::I32 | Type::U32 | Type::F32 => true,
            Type::Vector { elem, .. }
            | Type::Matrix { elem, .. }
            | Type::Array { elem, .. } => self.is_host_shareable(elem),
            Type::Struct(struct_id) => {
                let decl = self.types().struct_decl(struct_id);
                decl.members.iter().all(|m| self.is_host_shareable(m.ty))
            }
            _ => false,
        }
    }

    /// Record that `ty` is used in storage class `sc`, recursing through
    /// composites, and reject non-host-shareable types in host-shareable
    /// storage classes.
    pub(crate) fn apply_storage_class_usage_to_type(
        &mut self,
        sc: StorageClass,
        ty: TypeId,
        usage: Span,
    ) -> bool {
        let ty = self.types().unwrap_if_needed(ty);

        if let Type::Struct(struct_id) = self.types().get(ty) {
            if !self.structure(struct_id) {
                return false;
            }
            let flag = StorageClassUsage::from(sc);
            let info = self
                .struct_info
                .get_mut(&struct_id)
                .unwrap_or_else(|| panic!("struct layout missing after computation"));
            if info.storage_class_usage.contains(flag) {
                return true; // Already applied
            }
            info.storage_class_usage |= flag;

            let decl = self.types().struct_decl(struct_id);
            for member in &decl.members {
                if !self.apply_storage_class_usage_to_type(sc, member.ty, usage) {
                    let message = format!(
                        "while analysing structure member {}.{}",
                        self.friendly(ty),
                        self.name_str(member.name)
                    );
                    self.note(message, member.span);
                    return false;
                }
            }
            return true;
        }

        if let Type::Array { elem, .. } = self.types().get(ty) {
            return self.apply_storage_class_usage_to_type(sc, elem, usage);
        }

        if sc.is_host_shareable() && !self.is_host_shareable(ty) {
            let message = format!(
                "Type '{}' cannot be used in storage class '{sc}' as it is \
                 non-host-shareable",
                self.friendly(ty)
            );
            self.error(message, usage);
            return false;
        }
        true
    }
}
