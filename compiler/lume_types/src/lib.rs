//! Lume Types - the type system of the Lume shader compiler.
//!
//! Types form a closed variant set ([`Type`]) and are identity-uniqued by the
//! [`TypeInterner`]: interning the same structural type twice yields the same
//! [`TypeId`](lume_ir::TypeId), so handle equality is structural equality.
//! Aliases and access qualifiers wrap other types nominally; the resolver's
//! canonicalizer strips them when structural comparison is required.
//!
//! Struct declarations are registered separately ([`StructDecl`],
//! `StructId`): structs are nominal, so each declaration is a distinct type
//! regardless of its member list.

mod interner;
mod ty;

pub use interner::TypeInterner;
pub use ty::{StructDecl, StructMember, Type};
