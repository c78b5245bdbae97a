//! Statement and control-flow validation tests.

use lume_diagnostic::ErrorCode;
use lume_ir::ast::{Literal, StmtKind, StorageClass};
use lume_ir::TypeId;
use pretty_assertions::assert_eq;

use crate::ProgramBuilder;

use super::{first_error, resolve, resolve_ok, wrap_in_function};

#[test]
fn var_decl_infers_the_type_from_its_constructor() {
    let mut b = ProgramBuilder::new();
    let vec3f = b.ty_vec(TypeId::F32, 3);
    let init = b.construct(vec3f, Vec::new());
    let v = b.var("v", StorageClass::None, None, Some(init), Vec::new());
    let stmts = vec![b.decl_stmt(v)];
    wrap_in_function(&mut b, stmts);

    let res = resolve_ok(b);
    let var = res.info.variable(v).unwrap();
    assert_eq!(var.ty, vec3f);
    assert_eq!(var.storage_class, StorageClass::Function);
}

#[test]
fn incompatible_initializer_is_rejected() {
    let mut b = ProgramBuilder::new();
    let init = b.lit_i32(1);
    let v = b.var("v", StorageClass::None, Some(TypeId::F32), Some(init), Vec::new());
    let stmts = vec![b.decl_stmt(v)];
    wrap_in_function(&mut b, stmts);

    let res = resolve(b);
    assert!(!res.success);
    assert_eq!(
        first_error(&res),
        "variable of type 'f32' cannot be initialized with a value of type 'i32'"
    );
}

#[test]
fn redeclaring_a_local_is_rejected() {
    let mut b = ProgramBuilder::new();
    let first = b.var("v", StorageClass::None, Some(TypeId::F32), None, Vec::new());
    let second = b.var("v", StorageClass::None, Some(TypeId::I32), None, Vec::new());
    let stmts = vec![b.decl_stmt(first), b.decl_stmt(second)];
    wrap_in_function(&mut b, stmts);

    let res = resolve(b);
    assert!(!res.success);
    assert!(res.diagnostics.has_code(ErrorCode::V0014));
    assert_eq!(first_error(&res), "redeclared identifier 'v'");
}

#[test]
fn shadowing_a_module_scope_identifier_is_rejected() {
    let mut b = ProgramBuilder::new();
    let init = b.lit_f32(0.0);
    b.global_const("v", TypeId::F32, Some(init));
    let local = b.var("v", StorageClass::None, Some(TypeId::F32), None, Vec::new());
    let stmts = vec![b.decl_stmt(local)];
    wrap_in_function(&mut b, stmts);

    let res = resolve(b);
    assert!(!res.success);
    assert!(res.diagnostics.has_code(ErrorCode::V0013));
}

#[test]
fn block_declarations_go_out_of_scope() {
    let mut b = ProgramBuilder::new();
    let v = b.var("v", StorageClass::None, Some(TypeId::F32), None, Vec::new());
    let decl = b.decl_stmt(v);
    let inner = b.block(vec![decl]);
    let inner_stmt = b.stmt(StmtKind::Block(inner));

    let use_v = b.ident("v");
    let w = b.var("w", StorageClass::None, None, Some(use_v), Vec::new());
    let stmts = vec![inner_stmt, b.decl_stmt(w)];
    wrap_in_function(&mut b, stmts);

    let res = resolve(b);
    assert!(!res.success);
    assert!(res.diagnostics.has_code(ErrorCode::V0006));
}

#[test]
fn local_storage_class_must_be_function() {
    let mut b = ProgramBuilder::new();
    let v = b.var("v", StorageClass::Private, Some(TypeId::F32), None, Vec::new());
    let stmts = vec![b.decl_stmt(v)];
    wrap_in_function(&mut b, stmts);

    let res = resolve(b);
    assert!(!res.success);
    assert_eq!(
        first_error(&res),
        "function variable has a non-function storage class"
    );
}

#[test]
fn assignment_to_a_variable_resolves() {
    let mut b = ProgramBuilder::new();
    let v = b.var("v", StorageClass::None, Some(TypeId::F32), None, Vec::new());
    let lhs = b.ident("v");
    let rhs = b.lit_f32(2.0);
    let stmts = vec![b.decl_stmt(v), b.assign(lhs, rhs)];
    wrap_in_function(&mut b, stmts);

    resolve_ok(b);
}

#[test]
fn assignment_through_an_alias_type_resolves() {
    let mut b = ProgramBuilder::new();
    let scalar = b.ty_alias("Scalar", TypeId::F32);
    let init = b.lit_f32(0.0);
    let v = b.var("v", StorageClass::None, Some(scalar), Some(init), Vec::new());
    let decl = b.decl_stmt(v);
    let w = b.var("w", StorageClass::None, Some(TypeId::F32), None, Vec::new());
    let w_decl = b.decl_stmt(w);
    // Aliased LHS with a bare RHS, and a bare LHS with an aliased RHS.
    let lhs = b.ident("v");
    let rhs = b.lit_f32(2.0);
    let assign = b.assign(lhs, rhs);
    let w_lhs = b.ident("w");
    let w_rhs = b.ident("v");
    let w_assign = b.assign(w_lhs, w_rhs);
    wrap_in_function(&mut b, vec![decl, w_decl, assign, w_assign]);

    resolve_ok(b);
}

#[test]
fn assignment_type_mismatch_is_rejected() {
    let mut b = ProgramBuilder::new();
    let v = b.var("v", StorageClass::None, Some(TypeId::F32), None, Vec::new());
    let lhs = b.ident("v");
    let rhs = b.lit_i32(2);
    let stmts = vec![b.decl_stmt(v), b.assign(lhs, rhs)];
    wrap_in_function(&mut b, stmts);

    let res = resolve(b);
    assert!(!res.success);
    assert_eq!(
        first_error(&res),
        "invalid assignment: cannot assign value of type 'i32' to a variable of type 'f32'"
    );
}

#[test]
fn assignment_to_a_constant_is_rejected() {
    let mut b = ProgramBuilder::new();
    let init = b.lit_f32(1.0);
    b.global_const("c", TypeId::F32, Some(init));
    let lhs = b.ident("c");
    let rhs = b.lit_f32(2.0);
    let stmts = vec![b.assign(lhs, rhs)];
    wrap_in_function(&mut b, stmts);

    let res = resolve(b);
    assert!(!res.success);
    assert!(res.diagnostics.has_code(ErrorCode::V0021));
    assert_eq!(first_error(&res), "cannot re-assign a constant: 'c'");
}

#[test]
fn assignment_to_a_value_is_rejected() {
    let mut b = ProgramBuilder::new();
    let lhs = b.lit_f32(1.0);
    let rhs = b.lit_f32(2.0);
    let stmts = vec![b.assign(lhs, rhs)];
    wrap_in_function(&mut b, stmts);

    let res = resolve(b);
    assert!(!res.success);
    assert!(res.diagnostics.has_code(ErrorCode::InvalidAssignment));
    assert_eq!(
        first_error(&res),
        "invalid assignment: left-hand-side does not reference storage: f32"
    );
}

#[test]
fn if_condition_must_be_bool() {
    let mut b = ProgramBuilder::new();
    let cond = b.lit_i32(1);
    let body = b.block(Vec::new());
    let stmts = vec![b.if_stmt(cond, body, Vec::new())];
    wrap_in_function(&mut b, stmts);

    let res = resolve(b);
    assert!(!res.success);
    assert_eq!(first_error(&res), "if statement condition must be bool, got i32");
}

#[test]
fn if_with_else_clauses_resolves() {
    let mut b = ProgramBuilder::new();
    let cond = b.lit_bool(true);
    let body = b.block(Vec::new());
    let elseif_cond = b.lit_bool(false);
    let elseif_body = b.block(Vec::new());
    let elseif = b.else_stmt(Some(elseif_cond), elseif_body);
    let else_body = b.block(Vec::new());
    let final_else = b.else_stmt(None, else_body);
    let stmts = vec![b.if_stmt(cond, body, vec![elseif, final_else])];
    wrap_in_function(&mut b, stmts);

    resolve_ok(b);
}

#[test]
fn return_type_must_match_the_function() {
    let mut b = ProgramBuilder::new();
    let value = b.lit_i32(1);
    let ret = b.ret(Some(value));
    let body = b.block(vec![ret]);
    b.func("f", Vec::new(), TypeId::F32, Some(body), Vec::new());

    let res = resolve(b);
    assert!(!res.success);
    assert!(res.diagnostics.has_code(ErrorCode::ReturnTypeMismatch));
    assert_eq!(
        first_error(&res),
        "return statement type must match its function return type, \
         returned 'i32', expected 'f32'"
    );
}

#[test]
fn return_statements_are_recorded_on_the_function() {
    let mut b = ProgramBuilder::new();
    let value = b.lit_f32(1.0);
    let ret = b.ret(Some(value));
    let body = b.block(vec![ret]);
    let f = b.func("f", Vec::new(), TypeId::F32, Some(body), Vec::new());

    let res = resolve_ok(b);
    let func = res.info.function(f).unwrap();
    assert_eq!(func.return_statements, vec![ret]);
}

#[test]
fn switch_selector_must_be_an_integer_scalar() {
    let mut b = ProgramBuilder::new();
    let selector = b.lit_f32(1.0);
    let default_body = b.block(Vec::new());
    let default = b.default_case(default_body);
    let stmts = vec![b.switch_stmt(selector, vec![default])];
    wrap_in_function(&mut b, stmts);

    let res = resolve(b);
    assert!(!res.success);
    assert!(res.diagnostics.has_code(ErrorCode::V0025));
}

#[test]
fn case_selector_type_must_match_the_switch_selector() {
    let mut b = ProgramBuilder::new();
    let selector = b.lit_i32(1);
    let case_body = b.block(Vec::new());
    let case = b.case(vec![Literal::U32(1)], case_body);
    let default_body = b.block(Vec::new());
    let default = b.default_case(default_body);
    let stmts = vec![b.switch_stmt(selector, vec![case, default])];
    wrap_in_function(&mut b, stmts);

    let res = resolve(b);
    assert!(!res.success);
    assert!(res.diagnostics.has_code(ErrorCode::V0026));
}

#[test]
fn duplicate_case_selector_values_are_rejected() {
    let mut b = ProgramBuilder::new();
    let selector = b.lit_i32(1);
    let first_body = b.block(Vec::new());
    let first = b.case(vec![Literal::I32(2)], first_body);
    let second_body = b.block(Vec::new());
    let second = b.case(vec![Literal::I32(2)], second_body);
    let default_body = b.block(Vec::new());
    let default = b.default_case(default_body);
    let stmts = vec![b.switch_stmt(selector, vec![first, second, default])];
    wrap_in_function(&mut b, stmts);

    let res = resolve(b);
    assert!(!res.success);
    assert!(res.diagnostics.has_code(ErrorCode::V0027));
}

#[test]
fn multiple_default_clauses_are_rejected() {
    let mut b = ProgramBuilder::new();
    let selector = b.lit_i32(1);
    let first_body = b.block(Vec::new());
    let first = b.default_case(first_body);
    let second_body = b.block(Vec::new());
    let second = b.default_case(second_body);
    let stmts = vec![b.switch_stmt(selector, vec![first, second])];
    wrap_in_function(&mut b, stmts);

    let res = resolve(b);
    assert!(!res.success);
    assert!(res.diagnostics.has_code(ErrorCode::V0008));
}

#[test]
fn missing_default_clause_is_rejected() {
    let mut b = ProgramBuilder::new();
    let selector = b.lit_i32(1);
    let case_body = b.block(Vec::new());
    let case = b.case(vec![Literal::I32(0)], case_body);
    let stmts = vec![b.switch_stmt(selector, vec![case])];
    wrap_in_function(&mut b, stmts);

    let res = resolve(b);
    assert!(!res.success);
    assert_eq!(first_error(&res), "switch statement must have a default clause");
}

#[test]
fn trailing_fallthrough_in_the_last_case_is_rejected() {
    let mut b = ProgramBuilder::new();
    let selector = b.lit_i32(1);
    let case_body = b.block(Vec::new());
    let case = b.case(vec![Literal::I32(0)], case_body);
    let fallthrough = b.fallthrough_stmt();
    let default_body = b.block(vec![fallthrough]);
    let default = b.default_case(default_body);
    let stmts = vec![b.switch_stmt(selector, vec![case, default])];
    wrap_in_function(&mut b, stmts);

    let res = resolve(b);
    assert!(!res.success);
    assert!(res.diagnostics.has_code(ErrorCode::V0028));
}

#[test]
fn switch_with_cases_and_default_resolves() {
    let mut b = ProgramBuilder::new();
    let selector = b.lit_u32(1);
    let fallthrough = b.fallthrough_stmt();
    let first_body = b.block(vec![fallthrough]);
    let first = b.case(vec![Literal::U32(0), Literal::U32(1)], first_body);
    let break_stmt = b.break_stmt();
    let default_body = b.block(vec![break_stmt]);
    let default = b.default_case(default_body);
    let stmts = vec![b.switch_stmt(selector, vec![first, default])];
    wrap_in_function(&mut b, stmts);

    resolve_ok(b);
}

#[test]
fn break_outside_a_loop_or_switch_is_rejected() {
    let mut b = ProgramBuilder::new();
    let stmts = vec![b.break_stmt()];
    wrap_in_function(&mut b, stmts);

    let res = resolve(b);
    assert!(!res.success);
    assert_eq!(first_error(&res), "break statement must be in a loop or switch case");
}

#[test]
fn continue_outside_a_loop_is_rejected() {
    let mut b = ProgramBuilder::new();
    let stmts = vec![b.continue_stmt()];
    wrap_in_function(&mut b, stmts);

    let res = resolve(b);
    assert!(!res.success);
    assert_eq!(first_error(&res), "continue statement must be in a loop");
}

#[test]
fn loop_with_break_and_continuing_resolves() {
    let mut b = ProgramBuilder::new();
    let v = b.var("v", StorageClass::None, Some(TypeId::I32), None, Vec::new());
    let decl = b.decl_stmt(v);
    let break_stmt = b.break_stmt();
    let body = b.block(vec![decl, break_stmt]);

    // Declarations in the loop body stay visible in the continuing block.
    let lhs = b.ident("v");
    let rhs = b.lit_i32(1);
    let assign = b.assign(lhs, rhs);
    let continuing = b.block(vec![assign]);
    let stmts = vec![b.loop_stmt(body, Some(continuing))];
    wrap_in_function(&mut b, stmts);

    resolve_ok(b);
}

#[test]
fn continue_bypassing_a_declaration_used_in_continuing_is_rejected() {
    let mut b = ProgramBuilder::new();
    let continue_stmt = b.continue_stmt();
    let z = b.var("z", StorageClass::None, Some(TypeId::I32), None, Vec::new());
    let decl = b.decl_stmt(z);
    let body = b.block(vec![continue_stmt, decl]);

    let lhs = b.ident("z");
    let rhs = b.lit_i32(1);
    let assign = b.assign(lhs, rhs);
    let continuing = b.block(vec![assign]);
    let stmts = vec![b.loop_stmt(body, Some(continuing))];
    wrap_in_function(&mut b, stmts);

    let res = resolve(b);
    assert!(!res.success);
    assert_eq!(
        first_error(&res),
        "continue statement bypasses declaration of 'z' in continuing block"
    );
}

#[test]
fn statements_record_their_enclosing_block() {
    let mut b = ProgramBuilder::new();
    let v = b.var("v", StorageClass::None, Some(TypeId::F32), None, Vec::new());
    let decl = b.decl_stmt(v);
    let body = b.block(vec![decl]);
    b.func("f", Vec::new(), TypeId::VOID, Some(body), Vec::new());

    let res = resolve_ok(b);
    assert_eq!(res.info.statement(decl).unwrap().block, Some(body));
}
