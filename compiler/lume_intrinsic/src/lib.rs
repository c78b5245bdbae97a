//! Lume Intrinsic - built-in function table and overload resolution.
//!
//! The resolver treats intrinsic calls like any other call expression: it
//! resolves the argument types, then asks this crate's [`lookup`] to pick an
//! overload. Lookup either yields an [`IntrinsicOverload`] carrying the
//! resolved return type, or a [`NoMatchingOverload`] error that the resolver
//! surfaces as a diagnostic.
//!
//! The table is keyed by [`IntrinsicKind`]; [`parse_intrinsic`] maps source
//! identifiers onto kinds, and is also used to distinguish "unknown function"
//! from "intrinsic missing its call parens" in identifier resolution.

mod table;

pub use table::{lookup, parse_intrinsic, IntrinsicKind, IntrinsicOverload, NoMatchingOverload};
