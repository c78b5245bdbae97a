//! Variable resolution and module-scope variable validation.

use lume_diagnostic::ErrorCode;
use lume_ir::ast::{DecorationKind, StorageClass, TextureDimension};
use lume_ir::{Span, TypeId, VarId};
use lume_types::Type;

use crate::Capabilities;

use super::{Resolver, VarInfoId, VariableInfo};

impl Resolver<'_> {
    /// Resolve a variable declaration into a [`VariableInfo`], memoized per
    /// declaration. `type_override` supplies the inferred type for local
    /// declarations without one.
    pub(crate) fn variable(
        &mut self,
        var_id: VarId,
        type_override: Option<TypeId>,
    ) -> Option<VarInfoId> {
        if let Some(info) = self.var_to_info[var_id.index()] {
            return Some(info);
        }

        let var = self.module().var(var_id);
        let declared = type_override.or(var.ty).unwrap_or_else(|| {
            panic!(
                "variable '{}' has neither a declared nor an inferred type",
                self.name_str(var.name)
            )
        });
        let ty = self.canonical(declared);

        let info = self.variables.len();
        self.variables.push(VariableInfo {
            decl: var_id,
            ty,
            storage_class: var.storage_class,
            users: Vec::new(),
        });
        self.var_to_info[var_id.index()] = Some(info);

        // Array types carry layout obligations wherever they appear.
        let unwrapped = self.types().unwrap_if_needed(ty);
        if matches!(self.types().get(unwrapped), Type::Array { .. }) {
            self.array_layout(unwrapped, var.span)?;
        }

        Some(info)
    }

    pub(crate) fn global_variable(&mut self, var_id: VarId) -> bool {
        let var = self.module().var(var_id);
        if self.scope.get(var.name).is_some() {
            let message = format!("redeclared global identifier '{}'", self.name_str(var.name));
            self.error_code(ErrorCode::V0011, message, var.span);
            return false;
        }

        let Some(info) = self.variable(var_id, None) else {
            return false;
        };
        self.scope.set_global(var.name, info);

        if !var.is_const && var.storage_class == StorageClass::None {
            self.error_code(
                ErrorCode::V0022,
                "global variables must have a storage class",
                var.span,
            );
            return false;
        }
        if var.is_const && var.storage_class != StorageClass::None {
            self.error_code(
                ErrorCode::GlobalConstStorageClass,
                "global constants shouldn't have a storage class",
                var.span,
            );
            return false;
        }

        for deco in &var.decorations {
            let allowed = matches!(
                deco.kind,
                DecorationKind::Binding(_)
                    | DecorationKind::Builtin(_)
                    | DecorationKind::ConstantId(_)
                    | DecorationKind::Group(_)
                    | DecorationKind::Location(_)
            );
            if !allowed {
                self.error("decoration is not valid for variables", deco.span);
                return false;
            }
        }

        if let Some(ctor) = var.constructor {
            if !self.expression(ctor) {
                return false;
            }
        }

        if !self.validate_global_variable(info) {
            return false;
        }

        let ty = self.variables[info].ty;
        if !self.apply_storage_class_usage_to_type(var.storage_class, ty, var.span) {
            let message = format!(
                "while instantiating variable {}",
                self.name_str(var.name)
            );
            self.note(message, var.span);
            return false;
        }
        true
    }

    fn validate_global_variable(&mut self, info: VarInfoId) -> bool {
        let ty = self.variables[info].ty;
        let decl = self.variables[info].decl;
        let var_span = self.module().var(decl).span;

        if self.variables[info].storage_class == StorageClass::Storage {
            // A storage buffer's store type must be an access-qualified
            // structure carrying the block decoration.
            let inner_struct = match self.types().get(ty) {
                Type::AccessControl { elem, .. } => match self.types().get(elem) {
                    Type::Struct(struct_id) => Some(struct_id),
                    _ => None,
                },
                _ => None,
            };
            let Some(struct_id) = inner_struct else {
                self.error(
                    "variables declared in the <storage> storage class must be \
                     of an [[access]] qualified structure type",
                    var_span,
                );
                return false;
            };

            let struct_decl = self.types().struct_decl(struct_id);
            if !struct_decl.block_decoration {
                self.error(
                    "structure used as a storage buffer must be declared with \
                     the [[block]] decoration",
                    struct_decl.span,
                );
                if !var_span.is_dummy() {
                    self.note("structure used as storage buffer here", var_span);
                }
                return false;
            }
        }

        self.validate_variable(info, var_span)
    }

    /// Checks shared by module-scope variables, locals, and parameters.
    pub(crate) fn validate_variable(&mut self, info: VarInfoId, span: Span) -> bool {
        let ty = self.variables[info].ty;
        let store_type = self.types().unwrap_all(ty);

        if let Type::Array { count: 0, .. } = self.types().get(store_type) {
            self.error_code(
                ErrorCode::V0015,
                "runtime arrays may only appear as the last member of a struct",
                span,
            );
            return false;
        }

        if let Type::MultisampledTexture { dim, elem } = self.types().get(store_type) {
            if !self
                .capabilities()
                .contains(Capabilities::MULTISAMPLED_TEXTURES)
            {
                self.error("multisampled textures are not supported", span);
                return false;
            }
            if dim != TextureDimension::D2 {
                self.error("only 2d multisampled textures are supported", span);
                return false;
            }
            let data_type = self.types().unwrap_all(elem);
            if !self.types().is_numeric_scalar(data_type) {
                self.error(
                    "texture_multisampled_2d<type>: type must be f32, i32 or u32",
                    span,
                );
                return false;
            }
        }

        if let Type::StorageTexture { dim, format, .. } = self.types().get(store_type) {
            if !self.capabilities().contains(Capabilities::STORAGE_TEXTURES) {
                self.error("storage textures are not supported", span);
                return false;
            }
            if matches!(dim, TextureDimension::Cube | TextureDimension::CubeArray) {
                self.error(
                    "cube dimensions for storage textures are not supported",
                    span,
                );
                return false;
            }
            if !format.is_valid_for_storage() {
                self.error(
                    "image format must be one of the texel formats specified \
                     for storage textures",
                    span,
                );
                return false;
            }
        }

        true
    }
}
