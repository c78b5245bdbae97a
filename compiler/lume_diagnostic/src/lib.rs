//! Structured diagnostics for the Lume compiler.
//!
//! A [`Diagnostic`] is an error or note record: severity, message, source
//! span, and an optional stable [`ErrorCode`] used by tests and tooling.
//! Rendering diagnostics to a terminal is a driver concern and lives outside
//! this crate.

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Diagnostics, Severity};
pub use error_code::ErrorCode;
