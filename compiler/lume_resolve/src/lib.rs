//! Lume Resolve - the semantic resolver for the Lume shader compiler.
//!
//! The resolver walks a parsed module, assigns a type to every expression,
//! validates language rules (storage classes, entry-point I/O, struct layout,
//! operator compatibility, scoping, control flow), and produces a
//! [`SemanticInfo`] table mirroring the AST with resolved type and scope
//! information attached.
//!
//! # Main Entry Points
//!
//! - [`Resolver`]: one-shot resolver over one [`Program`]
//! - [`resolve_program`]: convenience wrapper with default options
//!
//! # Module Organization
//!
//! - `program`: [`Program`] and [`ProgramBuilder`], the AST/type construction
//!   service the resolver consumes
//! - `resolver`: the resolution pass itself
//! - `sem`: the immutable semantic output tables
//!
//! # Contract
//!
//! A `Resolver` is used for exactly one pass over one program; semantic info
//! is materialized even when resolution fails, so downstream diagnostics can
//! inspect whatever was produced. Validation failures are reported through
//! [`Resolution::diagnostics`]; internal invariant violations (resolving one
//! expression twice, layout queries on non-layout types) panic, as they
//! indicate integration bugs rather than malformed input.

mod options;
pub mod program;
pub mod resolver;
pub mod sem;
mod stack;

pub use options::{Capabilities, ResolverOptions};
pub use program::{Program, ProgramBuilder};
pub use resolver::{Resolution, Resolver};
pub use sem::{
    CallTarget, SemArray, SemExprKind, SemExpression, SemFunction, SemStatement, SemStruct,
    SemStructMember, SemVariable, SemanticInfo,
};
pub use stack::ensure_sufficient_stack;

/// Resolve a program with default options.
pub fn resolve_program(program: &Program) -> Resolution {
    Resolver::new(program, ResolverOptions::default()).resolve()
}
