//! Struct and array layout tests.

use lume_diagnostic::ErrorCode;
use lume_ir::ast::{AccessMode, MemberDecoration, MemberDecorationKind, StorageClass};
use lume_ir::{Span, StructId, TypeId};
use lume_types::Type;
use pretty_assertions::assert_eq;

use crate::sem::StorageClassUsage;
use crate::{resolve_program, Program, Resolution, ProgramBuilder};

use super::{first_error, resolve};

fn offset_deco(value: u32) -> MemberDecoration {
    MemberDecoration::new(MemberDecorationKind::Offset(value), Span::DUMMY)
}

fn align_deco(value: u32) -> MemberDecoration {
    MemberDecoration::new(MemberDecorationKind::Align(value), Span::DUMMY)
}

fn size_deco(value: u32) -> MemberDecoration {
    MemberDecoration::new(MemberDecorationKind::Size(value), Span::DUMMY)
}

fn struct_id(program: &Program, ty: TypeId) -> StructId {
    match program.types.get(ty) {
        Type::Struct(id) => id,
        other => panic!("expected a struct type, got {other:?}"),
    }
}

fn resolve_built(b: ProgramBuilder) -> (Program, Resolution) {
    let program = b.build();
    let res = resolve_program(&program);
    (program, res)
}

#[test]
fn members_are_aligned_to_their_natural_alignment() {
    let mut b = ProgramBuilder::new();
    let vec3f = b.ty_vec(TypeId::F32, 3);
    let members = vec![
        b.struct_member("a", TypeId::F32, Vec::new()),
        b.struct_member("b", vec3f, Vec::new()),
        b.struct_member("c", TypeId::F32, Vec::new()),
    ];
    let s_ty = b.struct_decl("S", members, false);

    let (program, res) = resolve_built(b);
    assert!(res.success);

    let info = res.info.structure(struct_id(&program, s_ty)).unwrap();
    let offsets: Vec<u32> = info.members.iter().map(|m| m.offset).collect();
    assert_eq!(offsets, vec![0, 16, 28]);
    assert_eq!(info.align, 16);
    assert_eq!(info.size, 32);
    assert_eq!(info.size_no_padding, 32);
}

#[test]
fn trailing_padding_rounds_the_size_up() {
    let mut b = ProgramBuilder::new();
    let vec3f = b.ty_vec(TypeId::F32, 3);
    let members = vec![
        b.struct_member("a", TypeId::F32, Vec::new()),
        b.struct_member("b", vec3f, Vec::new()),
    ];
    let s_ty = b.struct_decl("S", members, false);

    let (program, res) = resolve_built(b);
    assert!(res.success);

    let info = res.info.structure(struct_id(&program, s_ty)).unwrap();
    assert_eq!(info.size_no_padding, 28);
    assert_eq!(info.size, 32);
}

#[test]
fn explicit_offsets_override_natural_layout() {
    let mut b = ProgramBuilder::new();
    let members = vec![
        b.struct_member("a", TypeId::F32, vec![offset_deco(0)]),
        b.struct_member("b", TypeId::F32, vec![offset_deco(8)]),
    ];
    let s_ty = b.struct_decl("S", members, false);

    let (program, res) = resolve_built(b);
    assert!(res.success);

    let info = res.info.structure(struct_id(&program, s_ty)).unwrap();
    let offsets: Vec<u32> = info.members.iter().map(|m| m.offset).collect();
    assert_eq!(offsets, vec![0, 8]);
    assert_eq!(info.size, 12);
}

#[test]
fn descending_offsets_are_rejected() {
    let mut b = ProgramBuilder::new();
    let members = vec![
        b.struct_member("a", TypeId::F32, vec![offset_deco(8)]),
        b.struct_member("b", TypeId::F32, vec![offset_deco(4)]),
    ];
    b.struct_decl("S", members, false);

    let res = resolve(b);
    assert!(!res.success);
    assert_eq!(first_error(&res), "offsets must be in ascending order");
}

#[test]
fn align_decorations_must_be_powers_of_two() {
    let mut b = ProgramBuilder::new();
    let members = vec![b.struct_member("a", TypeId::F32, vec![align_deco(3)])];
    b.struct_decl("S", members, false);

    let res = resolve(b);
    assert!(!res.success);
    assert_eq!(
        first_error(&res),
        "align value must be a positive, power-of-two integer"
    );
}

#[test]
fn align_decoration_widens_the_member_slot() {
    let mut b = ProgramBuilder::new();
    let members = vec![
        b.struct_member("a", TypeId::F32, Vec::new()),
        b.struct_member("b", TypeId::F32, vec![align_deco(16)]),
    ];
    let s_ty = b.struct_decl("S", members, false);

    let (program, res) = resolve_built(b);
    assert!(res.success);

    let info = res.info.structure(struct_id(&program, s_ty)).unwrap();
    assert_eq!(info.members[1].offset, 16);
    assert_eq!(info.align, 16);
    assert_eq!(info.size, 32);
}

#[test]
fn size_decoration_must_cover_the_type() {
    let mut b = ProgramBuilder::new();
    let members = vec![b.struct_member("a", TypeId::F32, vec![size_deco(2)])];
    b.struct_decl("S", members, false);

    let res = resolve(b);
    assert!(!res.success);
    assert_eq!(
        first_error(&res),
        "size must be at least as big as the type's size (4)"
    );
}

#[test]
fn offset_cannot_be_combined_with_align_or_size() {
    let mut b = ProgramBuilder::new();
    let members = vec![b.struct_member(
        "a",
        TypeId::F32,
        vec![offset_deco(0), align_deco(4)],
    )];
    b.struct_decl("S", members, false);

    let res = resolve(b);
    assert!(!res.success);
    assert_eq!(
        first_error(&res),
        "offset decorations cannot be used with align or size decorations"
    );
}

#[test]
fn array_stride_defaults_to_the_rounded_element_size() {
    let mut b = ProgramBuilder::new();
    let vec3f = b.ty_vec(TypeId::F32, 3);
    let arr = b.ty_array(vec3f, 2);
    b.type_decl(arr);

    let (_, res) = resolve_built(b);
    assert!(res.success);

    let info = res.info.array(arr).unwrap();
    assert_eq!(info.stride, 16);
    assert_eq!(info.size, 32);
    assert_eq!(info.align, 16);
}

#[test]
fn explicit_array_strides_are_honored() {
    let mut b = ProgramBuilder::new();
    let arr = b.ty_array_with_stride(TypeId::F32, 4, 8);
    b.type_decl(arr);

    let (_, res) = resolve_built(b);
    assert!(res.success);

    let info = res.info.array(arr).unwrap();
    assert_eq!(info.stride, 8);
    assert_eq!(info.size, 32);
}

#[test]
fn undersized_array_strides_are_rejected() {
    let mut b = ProgramBuilder::new();
    let arr = b.ty_array_with_stride(TypeId::F32, 4, 2);
    b.type_decl(arr);

    let res = resolve(b);
    assert!(!res.success);
    assert_eq!(
        first_error(&res),
        "arrays decorated with the stride attribute must have a stride that \
         is at least the size of the element type, and be a multiple of the \
         element type's alignment value."
    );
}

#[test]
fn runtime_array_must_be_the_last_member() {
    let mut b = ProgramBuilder::new();
    let runtime = b.ty_runtime_array(TypeId::F32);
    let members = vec![
        b.struct_member("data", runtime, Vec::new()),
        b.struct_member("len", TypeId::U32, Vec::new()),
    ];
    b.struct_decl("S", members, true);

    let res = resolve(b);
    assert!(!res.success);
    assert!(res.diagnostics.has_code(ErrorCode::V0015));
    assert_eq!(
        first_error(&res),
        "runtime arrays may only appear as the last member of a struct"
    );
}

#[test]
fn runtime_array_requires_the_block_decoration() {
    let mut b = ProgramBuilder::new();
    let runtime = b.ty_runtime_array(TypeId::F32);
    let members = vec![b.struct_member("data", runtime, Vec::new())];
    b.struct_decl("S", members, false);

    let res = resolve(b);
    assert!(!res.success);
    assert!(res.diagnostics.has_code(ErrorCode::V0015));
    assert_eq!(
        first_error(&res),
        "a struct containing a runtime-sized array requires the [[block]] attribute: 'S'"
    );
}

#[test]
fn trailing_runtime_array_in_a_block_struct_resolves() {
    let mut b = ProgramBuilder::new();
    let runtime = b.ty_runtime_array(TypeId::F32);
    let members = vec![
        b.struct_member("len", TypeId::U32, Vec::new()),
        b.struct_member("data", runtime, Vec::new()),
    ];
    let s_ty = b.struct_decl("S", members, true);

    let (program, res) = resolve_built(b);
    assert!(res.success);

    let info = res.info.structure(struct_id(&program, s_ty)).unwrap();
    // A runtime-sized array is sized as one element.
    assert_eq!(info.members[1].offset, 4);
    assert_eq!(info.members[1].size, 4);
}

#[test]
fn nested_struct_layout_uses_the_inner_size() {
    let mut b = ProgramBuilder::new();
    let vec3f = b.ty_vec(TypeId::F32, 3);
    let inner_members = vec![b.struct_member("v", vec3f, Vec::new())];
    let inner = b.struct_decl("Inner", inner_members, false);
    let outer_members = vec![
        b.struct_member("first", inner, Vec::new()),
        b.struct_member("second", TypeId::F32, Vec::new()),
    ];
    let outer = b.struct_decl("Outer", outer_members, false);

    let (program, res) = resolve_built(b);
    assert!(res.success);

    let inner_info = res.info.structure(struct_id(&program, inner)).unwrap();
    assert_eq!(inner_info.size, 16);

    let outer_info = res.info.structure(struct_id(&program, outer)).unwrap();
    assert_eq!(outer_info.members[1].offset, 16);
    assert_eq!(outer_info.align, 16);
}

#[test]
fn storage_usage_is_recorded_on_the_struct() {
    let mut b = ProgramBuilder::new();
    let members = vec![b.struct_member("x", TypeId::F32, Vec::new())];
    let s_ty = b.struct_decl("S", members, true);
    let access = b.ty_access(AccessMode::ReadWrite, s_ty);
    b.global_var("buf", StorageClass::Storage, access, None, Vec::new());

    let (program, res) = resolve_built(b);
    assert!(res.success);

    let info = res.info.structure(struct_id(&program, s_ty)).unwrap();
    assert!(info.storage_class_usage.contains(StorageClassUsage::STORAGE));
}

#[test]
fn non_host_shareable_members_are_rejected_in_storage_buffers() {
    let mut b = ProgramBuilder::new();
    let inner_members = vec![b.struct_member("flag", TypeId::BOOL, Vec::new())];
    let inner = b.struct_decl("Inner", inner_members, false);
    let outer_members = vec![b.struct_member("inner", inner, Vec::new())];
    let outer = b.struct_decl("Outer", outer_members, true);
    let access = b.ty_access(AccessMode::ReadWrite, outer);
    b.global_var("buf", StorageClass::Storage, access, None, Vec::new());

    let res = resolve(b);
    assert!(!res.success);
    assert_eq!(
        first_error(&res),
        "Type 'bool' cannot be used in storage class 'storage' as it is non-host-shareable"
    );
}
