//! Stable validation error codes.

use std::fmt;

/// Stable short codes for validation diagnostics.
///
/// Codes render as `v-00xx` and are cross-referenced by tests and tooling;
/// not every diagnostic carries one. The numbering is historical and sparse.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// Non-void function missing a final return statement.
    V0002,
    /// Direct recursion.
    V0004,
    /// Function called before its declaration.
    V0005,
    /// Undeclared identifier or unknown called function.
    V0006,
    /// Switch statement with zero or multiple default clauses.
    V0008,
    /// Redeclared global identifier.
    V0011,
    /// Local declaration collides with a module-scope identifier.
    V0013,
    /// Local declaration collides with a local identifier still in scope.
    V0014,
    /// Runtime array used outside the last member of a block struct.
    V0015,
    /// Duplicate function name.
    V0016,
    /// Multiple stage decorations on one entry point.
    V0020,
    /// Assignment to a constant.
    V0021,
    /// Module-scope variable without a storage class.
    V0022,
    /// Switch selector is not an integer scalar.
    V0025,
    /// Case selector type differs from the switch selector type.
    V0026,
    /// Duplicate case selector value.
    V0027,
    /// Fallthrough as the final statement of the final case.
    V0028,
    /// Return value type does not match the function return type.
    ReturnTypeMismatch,
    /// Invalid assignment operands.
    InvalidAssignment,
    /// Module-scope constant with a storage class.
    GlobalConstStorageClass,
}

impl ErrorCode {
    /// The stable textual form of the code.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::V0002 => "v-0002",
            ErrorCode::V0004 => "v-0004",
            ErrorCode::V0005 => "v-0005",
            ErrorCode::V0006 => "v-0006",
            ErrorCode::V0008 => "v-0008",
            ErrorCode::V0011 => "v-0011",
            ErrorCode::V0013 => "v-0013",
            ErrorCode::V0014 => "v-0014",
            ErrorCode::V0015 => "v-0015",
            ErrorCode::V0016 => "v-0016",
            ErrorCode::V0020 => "v-0020",
            ErrorCode::V0021 => "v-0021",
            ErrorCode::V0022 => "v-0022",
            ErrorCode::V0025 => "v-0025",
            ErrorCode::V0026 => "v-0026",
            ErrorCode::V0027 => "v-0027",
            ErrorCode::V0028 => "v-0028",
            ErrorCode::ReturnTypeMismatch => "v-000y",
            ErrorCode::InvalidAssignment => "v-000x",
            ErrorCode::GlobalConstStorageClass => "v-global01",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
