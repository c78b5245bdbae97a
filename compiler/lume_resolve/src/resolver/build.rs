//! Assembly of the final semantic tables from the resolver's working records.

use lume_ir::FunctionId;
use rustc_hash::FxHashMap;

use crate::sem::{SemFunction, SemVariable, SemanticInfo};

use super::{push_unique, FuncInfoId, Resolver};

impl Resolver<'_> {
    /// Materialize semantic nodes for everything that resolved, including on
    /// failed runs.
    pub(crate) fn build_semantic_info(&mut self) -> SemanticInfo {
        // Invert the call graph: for each function, the entry points that
        // transitively reach it, in module declaration order.
        let mut ancestor_entry_points: FxHashMap<FunctionId, Vec<FunctionId>> =
            FxHashMap::default();
        for func_id in self.module().functions() {
            let Some(info) = self.function_to_info[func_id.index()] else {
                continue;
            };
            if !self.module().function(func_id).is_entry_point() {
                continue;
            }
            for &callee in &self.functions[info].transitive_calls {
                let callee_decl = self.functions[callee].decl;
                push_unique(
                    ancestor_entry_points.entry(callee_decl).or_default(),
                    func_id,
                );
            }
        }

        let mut variables = vec![None; self.var_to_info.len()];
        for (index, slot) in self.var_to_info.iter().enumerate() {
            let Some(info) = *slot else { continue };
            let var = &self.variables[info];
            variables[index] = Some(SemVariable {
                ty: var.ty,
                storage_class: var.storage_class,
                users: var.users.clone(),
            });
        }

        let remap_vars = |ids: &[super::VarInfoId]| {
            ids.iter().map(|&i| self.variables[i].decl).collect()
        };
        let remap_funcs = |ids: &[FuncInfoId]| {
            ids.iter().map(|&i| self.functions[i].decl).collect()
        };

        let mut functions = vec![None; self.function_to_info.len()];
        for slot in &self.function_to_info {
            let Some(info) = *slot else { continue };
            let func = &self.functions[info];
            functions[func.decl.index()] = Some(SemFunction {
                params: remap_vars(&func.parameters),
                referenced_module_vars: remap_vars(&func.referenced_module_vars),
                local_referenced_module_vars: remap_vars(&func.local_referenced_module_vars),
                transitive_calls: remap_funcs(&func.transitive_calls),
                return_statements: func.return_statements.clone(),
                ancestor_entry_points: ancestor_entry_points
                    .remove(&func.decl)
                    .unwrap_or_default(),
            });
        }

        let mut structs = vec![None; self.types().struct_count()];
        for (&struct_id, info) in &self.struct_info {
            structs[struct_id.index()] = Some(info.clone());
        }

        SemanticInfo {
            exprs: std::mem::take(&mut self.expr_info),
            stmts: std::mem::take(&mut self.stmt_info),
            variables,
            functions,
            structs,
            arrays: std::mem::take(&mut self.array_info),
        }
    }
}
