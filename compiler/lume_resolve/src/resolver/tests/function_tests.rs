//! Function, call-graph, and entry-point interface tests.

use lume_diagnostic::ErrorCode;
use lume_ir::ast::{BuiltinValue, PipelineStage, StorageClass};
use lume_ir::{Span, TypeId};
use lume_types::Type;
use pretty_assertions::assert_eq;

use crate::sem::PipelineStageUsage;
use crate::{resolve_program, ProgramBuilder};

use super::{first_error, resolve, resolve_ok, wrap_in_function};

#[test]
fn duplicate_function_names_are_rejected() {
    let mut b = ProgramBuilder::new();
    let first_body = b.block(Vec::new());
    b.func("f", Vec::new(), TypeId::VOID, Some(first_body), Vec::new());
    let second_body = b.block(Vec::new());
    b.func("f", Vec::new(), TypeId::VOID, Some(second_body), Vec::new());

    let res = resolve(b);
    assert!(!res.success);
    assert!(res.diagnostics.has_code(ErrorCode::V0016));
    assert_eq!(first_error(&res), "function names must be unique 'f'");
}

#[test]
fn non_void_function_must_end_with_a_return() {
    let mut b = ProgramBuilder::new();
    let body = b.block(Vec::new());
    b.func("f", Vec::new(), TypeId::F32, Some(body), Vec::new());

    let res = resolve(b);
    assert!(!res.success);
    assert!(res.diagnostics.has_code(ErrorCode::V0002));
    assert_eq!(
        first_error(&res),
        "non-void function must end with a return statement"
    );
}

#[test]
fn parameters_are_usable_in_the_body() {
    let mut b = ProgramBuilder::new();
    let p = b.param("x", TypeId::F32);
    let use_p = b.ident("x");
    let ret = b.ret(Some(use_p));
    let body = b.block(vec![ret]);
    let f = b.func("f", vec![p], TypeId::F32, Some(body), Vec::new());

    let res = resolve_ok(b);
    // Parameters are value bindings, not pointers.
    assert_eq!(res.info.ty_of(use_p), Some(TypeId::F32));
    assert_eq!(res.info.function(f).unwrap().params, vec![p]);
}

#[test]
fn call_graph_and_module_var_references_propagate() {
    let mut b = ProgramBuilder::new();
    let g = b.global_var("g", StorageClass::Private, TypeId::F32, None, Vec::new());

    let use_g = b.ident("g");
    let v = b.var("v", StorageClass::None, None, Some(use_g), Vec::new());
    let decl = b.decl_stmt(v);
    let a_body = b.block(vec![decl]);
    let a = b.func("a", Vec::new(), TypeId::VOID, Some(a_body), Vec::new());

    let call = b.call("a", Vec::new());
    let call_stmt = b.call_stmt(call);
    let main_body = b.block(vec![call_stmt]);
    let main = b.entry_point(
        "main",
        PipelineStage::Compute,
        Vec::new(),
        TypeId::VOID,
        Vec::new(),
        Some(main_body),
    );

    let res = resolve_ok(b);

    let a_sem = res.info.function(a).unwrap();
    assert_eq!(a_sem.local_referenced_module_vars, vec![g]);
    assert_eq!(a_sem.referenced_module_vars, vec![g]);
    assert_eq!(a_sem.ancestor_entry_points, vec![main]);

    let main_sem = res.info.function(main).unwrap();
    assert_eq!(main_sem.transitive_calls, vec![a]);
    // References flow through calls, but not as local references.
    assert_eq!(main_sem.referenced_module_vars, vec![g]);
    assert!(main_sem.local_referenced_module_vars.is_empty());
}

#[test]
fn ancestor_entry_points_collect_every_reaching_entry_point() {
    let mut b = ProgramBuilder::new();

    let inner_body = b.block(Vec::new());
    let inner = b.func("inner", Vec::new(), TypeId::VOID, Some(inner_body), Vec::new());

    let call_inner = b.call("inner", Vec::new());
    let call_inner_stmt = b.call_stmt(call_inner);
    let outer_body = b.block(vec![call_inner_stmt]);
    let outer = b.func("outer", Vec::new(), TypeId::VOID, Some(outer_body), Vec::new());

    let call_outer = b.call("outer", Vec::new());
    let call_outer_stmt = b.call_stmt(call_outer);
    let main_body = b.block(vec![call_outer_stmt]);
    let main = b.entry_point(
        "main",
        PipelineStage::Compute,
        Vec::new(),
        TypeId::VOID,
        Vec::new(),
        Some(main_body),
    );

    let call_inner2 = b.call("inner", Vec::new());
    let call_inner2_stmt = b.call_stmt(call_inner2);
    let main2_body = b.block(vec![call_inner2_stmt]);
    let main2 = b.entry_point(
        "main2",
        PipelineStage::Compute,
        Vec::new(),
        TypeId::VOID,
        Vec::new(),
        Some(main2_body),
    );

    let res = resolve_ok(b);

    // `inner` is reached through `main -> outer -> inner` and directly from
    // `main2`; both entry points appear, in declaration order.
    let inner_sem = res.info.function(inner).unwrap();
    assert_eq!(inner_sem.ancestor_entry_points, vec![main, main2]);

    let outer_sem = res.info.function(outer).unwrap();
    assert_eq!(outer_sem.ancestor_entry_points, vec![main]);

    let main_sem = res.info.function(main).unwrap();
    assert_eq!(main_sem.transitive_calls, vec![outer, inner]);
    assert!(main_sem.ancestor_entry_points.is_empty());
}

#[test]
fn multiple_stage_decorations_are_rejected() {
    let mut b = ProgramBuilder::new();
    let vertex = b.stage_deco(PipelineStage::Vertex);
    let fragment = b.stage_deco(PipelineStage::Fragment);
    let body = b.block(Vec::new());
    b.func("main", Vec::new(), TypeId::VOID, Some(body), vec![vertex, fragment]);

    let res = resolve(b);
    assert!(!res.success);
    assert!(res.diagnostics.has_code(ErrorCode::V0020));
}

#[test]
fn entry_point_parameter_needs_an_io_attribute() {
    let mut b = ProgramBuilder::new();
    let p = b.param("x", TypeId::F32);
    let body = b.block(Vec::new());
    b.entry_point(
        "main",
        PipelineStage::Fragment,
        vec![p],
        TypeId::VOID,
        Vec::new(),
        Some(body),
    );

    let res = resolve(b);
    assert!(!res.success);
    assert_eq!(first_error(&res), "missing entry point IO attribute on parameter");
}

#[test]
fn entry_point_return_type_needs_an_io_attribute() {
    let mut b = ProgramBuilder::new();
    let value = b.lit_f32(1.0);
    let ret = b.ret(Some(value));
    let body = b.block(vec![ret]);
    b.entry_point(
        "main",
        PipelineStage::Fragment,
        Vec::new(),
        TypeId::F32,
        Vec::new(),
        Some(body),
    );

    let res = resolve(b);
    assert!(!res.success);
    assert_eq!(first_error(&res), "missing entry point IO attribute on return type");
}

#[test]
fn decorated_entry_point_interface_resolves() {
    let mut b = ProgramBuilder::new();
    let location = b.location_deco(0);
    let p = b.param_with("x", TypeId::F32, vec![location]);
    let value = b.lit_f32(1.0);
    let ret = b.ret(Some(value));
    let body = b.block(vec![ret]);
    let out_location = b.location_deco(0);
    b.entry_point(
        "main",
        PipelineStage::Fragment,
        vec![p],
        TypeId::F32,
        vec![out_location],
        Some(body),
    );

    // The same location number on an input and an output does not conflict.
    resolve_ok(b);
}

#[test]
fn duplicate_builtin_across_parameters_is_rejected() {
    let mut b = ProgramBuilder::new();
    let vec4f = b.ty_vec(TypeId::F32, 4);
    let first_deco = b.builtin_deco(BuiltinValue::Position);
    let first = b.param_with("a", vec4f, vec![first_deco]);
    let second_deco = b.builtin_deco(BuiltinValue::Position);
    let second = b.param_with("b", vec4f, vec![second_deco]);
    let body = b.block(Vec::new());
    b.entry_point(
        "main",
        PipelineStage::Fragment,
        vec![first, second],
        TypeId::VOID,
        Vec::new(),
        Some(body),
    );

    let res = resolve(b);
    assert!(!res.success);
    assert_eq!(
        first_error(&res),
        "builtin(position) attribute appears multiple times as pipeline input"
    );
}

#[test]
fn multiple_io_attributes_on_one_parameter_are_rejected() {
    let mut b = ProgramBuilder::new();
    let vec4f = b.ty_vec(TypeId::F32, 4);
    let builtin = b.builtin_deco(BuiltinValue::Position);
    let location = b.location_deco(0);
    let p = b.param_with("a", vec4f, vec![builtin, location]);
    let body = b.block(Vec::new());
    b.entry_point(
        "main",
        PipelineStage::Fragment,
        vec![p],
        TypeId::VOID,
        Vec::new(),
        Some(body),
    );

    let res = resolve(b);
    assert!(!res.success);
    assert_eq!(first_error(&res), "multiple entry point IO attributes");
}

#[test]
fn struct_parameter_gets_io_attributes_from_its_members() {
    let mut b = ProgramBuilder::new();
    let location = lume_ir::ast::MemberDecoration::new(
        lume_ir::ast::MemberDecorationKind::Location(0),
        Span::DUMMY,
    );
    let members = vec![b.struct_member("x", TypeId::F32, vec![location])];
    let s_ty = b.struct_decl("Inputs", members, false);
    let p = b.param("inputs", s_ty);
    let body = b.block(Vec::new());
    b.entry_point(
        "main",
        PipelineStage::Fragment,
        vec![p],
        TypeId::VOID,
        Vec::new(),
        Some(body),
    );

    let program = b.build();
    let res = resolve_program(&program);
    assert!(res.success);

    let Type::Struct(struct_id) = program.types.get(s_ty) else {
        panic!("expected a struct type");
    };
    let info = res.info.structure(struct_id).unwrap();
    assert!(info.pipeline_stage_uses.contains(PipelineStageUsage::FRAGMENT_INPUT));
}

#[test]
fn io_attribute_directly_on_a_struct_parameter_is_rejected() {
    let mut b = ProgramBuilder::new();
    let location = lume_ir::ast::MemberDecoration::new(
        lume_ir::ast::MemberDecorationKind::Location(0),
        Span::DUMMY,
    );
    let members = vec![b.struct_member("x", TypeId::F32, vec![location])];
    let s_ty = b.struct_decl("Inputs", members, false);
    let param_location = b.location_deco(1);
    let p = b.param_with("inputs", s_ty, vec![param_location]);
    let body = b.block(Vec::new());
    b.entry_point(
        "main",
        PipelineStage::Fragment,
        vec![p],
        TypeId::VOID,
        Vec::new(),
        Some(body),
    );

    let res = resolve(b);
    assert!(!res.success);
    assert_eq!(
        first_error(&res),
        "entry point IO attributes must not be used on structure parameters"
    );
}

#[test]
fn undecorated_struct_member_in_entry_point_io_is_rejected() {
    let mut b = ProgramBuilder::new();
    let members = vec![b.struct_member("x", TypeId::F32, Vec::new())];
    let s_ty = b.struct_decl("Inputs", members, false);
    let p = b.param("inputs", s_ty);
    let body = b.block(Vec::new());
    b.entry_point(
        "main",
        PipelineStage::Fragment,
        vec![p],
        TypeId::VOID,
        Vec::new(),
        Some(body),
    );

    let res = resolve(b);
    assert!(!res.success);
    assert_eq!(first_error(&res), "missing entry point IO attribute");
}

#[test]
fn nested_structures_in_entry_point_io_are_rejected() {
    let mut b = ProgramBuilder::new();
    let location = lume_ir::ast::MemberDecoration::new(
        lume_ir::ast::MemberDecorationKind::Location(0),
        Span::DUMMY,
    );
    let inner_members = vec![b.struct_member("x", TypeId::F32, vec![location])];
    let inner = b.struct_decl("Inner", inner_members, false);
    let outer_members = vec![b.struct_member("inner", inner, Vec::new())];
    let outer = b.struct_decl("Outer", outer_members, false);
    let p = b.param("inputs", outer);
    let body = b.block(Vec::new());
    b.entry_point(
        "main",
        PipelineStage::Fragment,
        vec![p],
        TypeId::VOID,
        Vec::new(),
        Some(body),
    );

    let res = resolve(b);
    assert!(!res.success);
    assert_eq!(
        first_error(&res),
        "entry point IO types cannot contain nested structures"
    );
}

#[test]
fn struct_return_type_is_tagged_as_stage_output() {
    let mut b = ProgramBuilder::new();
    let location = lume_ir::ast::MemberDecoration::new(
        lume_ir::ast::MemberDecorationKind::Location(0),
        Span::DUMMY,
    );
    let members = vec![b.struct_member("color", TypeId::F32, vec![location])];
    let s_ty = b.struct_decl("Outputs", members, false);
    let value = b.construct(s_ty, Vec::new());
    let ret = b.ret(Some(value));
    let body = b.block(vec![ret]);
    b.entry_point(
        "main",
        PipelineStage::Vertex,
        Vec::new(),
        s_ty,
        Vec::new(),
        Some(body),
    );

    let program = b.build();
    let res = resolve_program(&program);
    assert!(res.success);

    let Type::Struct(struct_id) = program.types.get(s_ty) else {
        panic!("expected a struct type");
    };
    let info = res.info.structure(struct_id).unwrap();
    assert!(info.pipeline_stage_uses.contains(PipelineStageUsage::VERTEX_OUTPUT));
}

#[test]
fn non_entry_decorations_on_entry_points_are_rejected() {
    let mut b = ProgramBuilder::new();
    let stage = b.stage_deco(PipelineStage::Compute);
    let binding = lume_ir::ast::Decoration::new(
        lume_ir::ast::DecorationKind::Binding(0),
        Span::DUMMY,
    );
    let body = b.block(Vec::new());
    b.func("main", Vec::new(), TypeId::VOID, Some(body), vec![stage, binding]);

    let res = resolve(b);
    assert!(!res.success);
    assert_eq!(first_error(&res), "decoration is not valid for functions");
}

#[test]
fn bodiless_void_functions_resolve_and_are_callable() {
    let mut b = ProgramBuilder::new();
    // A bodiless void function resolves; only non-void bodiless functions
    // would be internal errors.
    b.func("stub", Vec::new(), TypeId::VOID, None, Vec::new());
    let call = b.call("stub", Vec::new());
    let call_stmt = b.call_stmt(call);
    let stmts = vec![call_stmt];
    wrap_in_function(&mut b, stmts);

    resolve_ok(b);
}
