//! Resolver tests, split by concern.
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod function_tests;
mod layout_tests;
mod stmt_tests;

use lume_ir::TypeId;

use crate::{resolve_program, ProgramBuilder, Resolution};

/// Build and resolve with default options.
fn resolve(builder: ProgramBuilder) -> Resolution {
    resolve_program(&builder.build())
}

fn resolve_ok(builder: ProgramBuilder) -> Resolution {
    let resolution = resolve(builder);
    let first = resolution
        .diagnostics
        .first_error()
        .map(|d| d.to_string())
        .unwrap_or_default();
    assert!(resolution.success, "unexpected resolution failure: {first}");
    resolution
}

fn first_error(resolution: &Resolution) -> String {
    resolution
        .diagnostics
        .first_error()
        .map(|d| d.message.clone())
        .unwrap_or_else(|| panic!("expected a resolution error"))
}

/// Wrap statements in the body of a void function named `test_fn`.
fn wrap_in_function(builder: &mut ProgramBuilder, stmts: Vec<lume_ir::StmtId>) {
    let body = builder.block(stmts);
    builder.func("test_fn", Vec::new(), TypeId::VOID, Some(body), Vec::new());
}
