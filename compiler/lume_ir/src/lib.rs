//! Lume IR - AST and interning primitives for the Lume shader compiler.
//!
//! This crate provides the data the rest of the compiler operates on:
//!
//! - [`Span`]: compact source locations
//! - [`Name`] / [`StringInterner`]: interned identifiers
//! - [`TypeId`] / [`StructId`]: handles into the type interner (the type data
//!   itself lives in `lume_types`)
//! - `ast`: the flat, arena-allocated AST
//!
//! # Design Notes
//!
//! AST nodes reference each other by `u32` index handles (`ExprId`, `StmtId`,
//! `BlockId`, `VarId`, `FunctionId`), never by boxed pointers. All semantic
//! information produced by the resolver is keyed by these same handles, which
//! keeps the AST immutable and the semantic tree's lifetime independent.

pub mod ast;
mod ids;
mod interner;
mod name;
mod span;

pub use ids::{BlockId, ExprId, FunctionId, StmtId, StructId, TypeId, VarId};
pub use interner::StringInterner;
pub use name::Name;
pub use span::Span;
