//! Function resolution: parameter scoping, body resolution, entry-point I/O
//! validation, and call registration.

use lume_diagnostic::ErrorCode;
use lume_ir::ast::{
    BuiltinValue, Decoration, DecorationKind, MemberDecoration, MemberDecorationKind,
    PipelineStage, StmtKind, StorageClass,
};
use lume_ir::{FunctionId, Span, TypeId};
use lume_types::Type;
use rustc_hash::FxHashSet;
use tracing::trace;

use crate::sem::PipelineStageUsage;

use super::{FuncInfoId, FunctionInfo, Resolver};

#[derive(Copy, Clone, PartialEq, Eq)]
enum IoKind {
    Parameter,
    ReturnType,
}

impl IoKind {
    fn direction(self) -> &'static str {
        match self {
            IoKind::Parameter => "input",
            IoKind::ReturnType => "output",
        }
    }
}

/// Builtins and locations consumed so far, shared across all parameters (and
/// separately across the return type) so that conflicts are caught.
#[derive(Default)]
struct EntryPointIo {
    builtins: FxHashSet<BuiltinValue>,
    locations: FxHashSet<u32>,
}

/// A pipeline IO attribute, lifted out of the two decoration list shapes.
#[derive(Copy, Clone)]
enum IoAttr {
    Builtin(BuiltinValue, Span),
    Location(u32, Span),
}

impl IoAttr {
    fn to_str(self) -> String {
        match self {
            IoAttr::Builtin(value, _) => format!("builtin({value})"),
            IoAttr::Location(value, _) => format!("location({value})"),
        }
    }

    fn span(self) -> Span {
        match self {
            IoAttr::Builtin(_, span) | IoAttr::Location(_, span) => span,
        }
    }
}

fn io_attrs(decos: &[Decoration]) -> Vec<IoAttr> {
    decos
        .iter()
        .filter_map(|deco| match deco.kind {
            DecorationKind::Builtin(value) => Some(IoAttr::Builtin(value, deco.span)),
            DecorationKind::Location(value) => Some(IoAttr::Location(value, deco.span)),
            _ => None,
        })
        .collect()
}

fn member_io_attrs(decos: &[MemberDecoration]) -> Vec<IoAttr> {
    decos
        .iter()
        .filter_map(|deco| match deco.kind {
            MemberDecorationKind::Builtin(value) => Some(IoAttr::Builtin(value, deco.span)),
            MemberDecorationKind::Location(value) => Some(IoAttr::Location(value, deco.span)),
            _ => None,
        })
        .collect()
}

impl Resolver<'_> {
    pub(crate) fn function(&mut self, func_id: FunctionId) -> bool {
        trace!(
            name = self.name_str(self.module().function(func_id).name),
            "resolving function"
        );
        let info = self.functions.len();
        self.functions.push(FunctionInfo::new(func_id));

        let prev = self.current_function.replace(info);
        let ok = self.function_inner(func_id, info);
        self.current_function = prev;
        if !ok {
            return false;
        }

        if !self.validate_function(func_id, info) {
            return false;
        }

        // Register the function only after its body resolved. A function does
        // not exist while still being processed, which is what rejects
        // recursion and forward calls.
        let name = self.module().function(func_id).name;
        self.function_names.insert(name, info);
        self.function_to_info[func_id.index()] = Some(info);
        true
    }

    fn function_inner(&mut self, func_id: FunctionId, info: FuncInfoId) -> bool {
        let func = self.module().function(func_id);
        self.scope.push_scope();

        for &param_id in &func.params {
            let Some(param_info) = self.variable(param_id, None) else {
                return false;
            };
            let param = self.module().var(param_id);
            self.scope.set(param.name, param_info);
            self.functions[info].parameters.push(param_info);

            let declared = match param.ty {
                Some(ty) => ty,
                None => self.variables[param_info].ty,
            };
            if !self.apply_storage_class_usage_to_type(param.storage_class, declared, param.span)
            {
                let message = format!(
                    "while instantiating parameter {}",
                    self.name_str(param.name)
                );
                self.note(message, param.span);
                return false;
            }

            // Structs passed as entry-point parameters carry their pipeline
            // stage on the struct itself.
            if let Type::Struct(struct_id) = self.types().get(self.variables[param_info].ty) {
                if !self.structure(struct_id) {
                    return false;
                }
                let usage = match func.stage() {
                    PipelineStage::Vertex => PipelineStageUsage::VERTEX_INPUT,
                    PipelineStage::Fragment => PipelineStageUsage::FRAGMENT_INPUT,
                    PipelineStage::Compute => PipelineStageUsage::COMPUTE_INPUT,
                    PipelineStage::None => PipelineStageUsage::empty(),
                };
                if let Some(entry) = self.struct_info.get_mut(&struct_id) {
                    entry.pipeline_stage_uses |= usage;
                }
            }
        }

        let return_ty = self.canonical(func.return_ty);
        if let Type::Struct(struct_id) = self.types().get(return_ty) {
            if !self.apply_storage_class_usage_to_type(StorageClass::None, return_ty, func.span)
            {
                let message = format!(
                    "while instantiating return type for {}",
                    self.name_str(func.name)
                );
                self.note(message, func.span);
                return false;
            }
            if !self.structure(struct_id) {
                return false;
            }
            let usage = match func.stage() {
                PipelineStage::Vertex => PipelineStageUsage::VERTEX_OUTPUT,
                PipelineStage::Fragment => PipelineStageUsage::FRAGMENT_OUTPUT,
                PipelineStage::Compute => PipelineStageUsage::COMPUTE_OUTPUT,
                PipelineStage::None => PipelineStageUsage::empty(),
            };
            if let Some(entry) = self.struct_info.get_mut(&struct_id) {
                entry.pipeline_stage_uses |= usage;
            }
        }

        if let Some(body) = func.body {
            if !self.block_statement(body) {
                return false;
            }
        }
        self.scope.pop_scope();
        true
    }

    fn validate_function(&mut self, func_id: FunctionId, info: FuncInfoId) -> bool {
        let func = self.module().function(func_id);
        if self.function_names.contains_key(&func.name) {
            let message = format!(
                "function names must be unique '{}'",
                self.name_str(func.name)
            );
            self.error_code(ErrorCode::V0016, message, func.span);
            return false;
        }

        for i in 0..self.functions[info].parameters.len() {
            let param_info = self.functions[info].parameters[i];
            let span = self.module().var(self.variables[param_info].decl).span;
            if !self.validate_variable(param_info, span) {
                return false;
            }
        }

        if func.return_ty != TypeId::VOID {
            if func.body.is_some() {
                let returns = func
                    .last_statement(&self.module().arena)
                    .is_some_and(|s| {
                        matches!(self.module().stmt(s).kind, StmtKind::Return { .. })
                    });
                if !returns {
                    self.error_code(
                        ErrorCode::V0002,
                        "non-void function must end with a return statement",
                        func.span,
                    );
                    return false;
                }
            } else if !func.is_internal() {
                panic!(
                    "function '{}' has no body and does not carry the internal decoration",
                    self.name_str(func.name)
                );
            }

            for deco in &func.return_decorations {
                let allowed = matches!(
                    deco.kind,
                    DecorationKind::Builtin(_) | DecorationKind::Location(_)
                );
                if !allowed {
                    self.error(
                        "decoration is not valid for function return types",
                        deco.span,
                    );
                    return false;
                }
            }
        }

        if func.is_entry_point() && !self.validate_entry_point(func_id) {
            return false;
        }
        true
    }

    fn validate_entry_point(&mut self, func_id: FunctionId) -> bool {
        let func = self.module().function(func_id);

        let mut stage_deco_count = 0;
        for deco in &func.decorations {
            match deco.kind {
                DecorationKind::Stage(_) => stage_deco_count += 1,
                DecorationKind::WorkgroupSize(..) => {}
                _ => {
                    self.error("decoration is not valid for functions", deco.span);
                    return false;
                }
            }
        }
        if stage_deco_count > 1 {
            self.error_code(
                ErrorCode::V0020,
                "only one stage decoration permitted per entry point",
                func.span,
            );
            return false;
        }

        let mut io = EntryPointIo::default();
        for &param_id in &func.params {
            let param = self.module().var(param_id);
            let declared = match param.ty {
                Some(ty) => ty,
                None => continue,
            };
            let attrs = io_attrs(&param.decorations);
            if !self.validate_io_decorations(
                func_id,
                &attrs,
                declared,
                param.span,
                IoKind::Parameter,
                &mut io,
            ) {
                return false;
            }
        }

        if func.return_ty != TypeId::VOID {
            // Return builtins and locations conflict only among themselves,
            // never with parameter ones.
            io.builtins.clear();
            io.locations.clear();
            if !self.validate_io_decorations(
                func_id,
                &io_attrs(&func.return_decorations),
                func.return_ty,
                func.span,
                IoKind::ReturnType,
                &mut io,
            ) {
                return false;
            }
        }

        true
    }

    /// Validate the pipeline IO attributes attached to an entry-point
    /// parameter or return type, descending into struct members.
    fn validate_io_decorations(
        &mut self,
        func_id: FunctionId,
        attrs: &[IoAttr],
        ty: TypeId,
        source: Span,
        kind: IoKind,
        io: &mut EntryPointIo,
    ) -> bool {
        if !self.check_io_attrs(func_id, attrs, ty, source, kind, false, io) {
            return false;
        }

        let canonical = self.canonical(ty);
        if let Type::Struct(struct_id) = self.types().get(canonical) {
            let decl = self.types().struct_decl(struct_id);
            for member in &decl.members {
                let member_ty = self.canonical(member.ty);
                match self.types().get(member_ty) {
                    Type::Struct(_) => {
                        self.error(
                            "entry point IO types cannot contain nested structures",
                            member.span,
                        );
                        self.note_entry_point(func_id);
                        return false;
                    }
                    Type::Array { count: 0, .. } => {
                        self.error(
                            "entry point IO types cannot contain runtime sized arrays",
                            member.span,
                        );
                        self.note_entry_point(func_id);
                        return false;
                    }
                    _ => {}
                }

                let attrs = member_io_attrs(&member.decorations);
                if !self.check_io_attrs(func_id, &attrs, member_ty, member.span, kind, true, io)
                {
                    self.note_entry_point(func_id);
                    return false;
                }
            }
        }
        true
    }

    #[allow(clippy::too_many_arguments)]
    fn check_io_attrs(
        &mut self,
        func_id: FunctionId,
        attrs: &[IoAttr],
        ty: TypeId,
        source: Span,
        kind: IoKind,
        is_struct_member: bool,
        io: &mut EntryPointIo,
    ) -> bool {
        let func_span = self.module().function(func_id).span;

        let mut pipeline_io: Option<IoAttr> = None;
        for &attr in attrs {
            if let Some(previous) = pipeline_io {
                self.error("multiple entry point IO attributes", attr.span());
                let message = format!("previously consumed {}", previous.to_str());
                self.note(message, previous.span());
                return false;
            }
            pipeline_io = Some(attr);

            let seen = match attr {
                IoAttr::Builtin(value, _) => !io.builtins.insert(value),
                IoAttr::Location(value, _) => !io.locations.insert(value),
            };
            if seen {
                let message = format!(
                    "{} attribute appears multiple times as pipeline {}",
                    attr.to_str(),
                    kind.direction()
                );
                self.error(message, func_span);
                return false;
            }
        }

        // A struct type gets its IO attributes from its members; anything
        // else must carry exactly one directly.
        let canonical = self.canonical(ty);
        if matches!(self.types().get(canonical), Type::Struct(_)) {
            if let Some(attr) = pipeline_io {
                let message = format!(
                    "entry point IO attributes must not be used on structure {}",
                    match kind {
                        IoKind::Parameter => "parameters",
                        IoKind::ReturnType => "return types",
                    }
                );
                self.error(message, attr.span());
                return false;
            }
        } else if pipeline_io.is_none() {
            let mut message = String::from("missing entry point IO attribute");
            if !is_struct_member {
                message += match kind {
                    IoKind::Parameter => " on parameter",
                    IoKind::ReturnType => " on return type",
                };
            }
            self.error(message, source);
            return false;
        }

        true
    }

    fn note_entry_point(&mut self, func_id: FunctionId) {
        let func = self.module().function(func_id);
        let message = format!(
            "while analysing entry point {}",
            self.name_str(func.name)
        );
        self.note(message, func.span);
    }
}
