//! Arena index handles.
//!
//! Every AST node category and the type interner hand out `u32` index
//! handles. Handles are only meaningful together with the arena or interner
//! that created them; equality is O(1) identity comparison.

use std::fmt;

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn from_raw(raw: u32) -> Self {
                $name(raw)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

define_id! {
    /// Handle to an expression in the AST arena.
    ExprId
}

define_id! {
    /// Handle to a statement in the AST arena.
    StmtId
}

define_id! {
    /// Handle to a block (ordered statement list) in the AST arena.
    BlockId
}

define_id! {
    /// Handle to a variable declaration (global, parameter, or local).
    VarId
}

define_id! {
    /// Handle to a function declaration.
    FunctionId
}

define_id! {
    /// Handle to an interned type in the type interner.
    ///
    /// Two `TypeId`s from the same interner are equal iff the types are
    /// structurally identical, so identity comparison is structural equality
    /// for everything except aliases and access qualifiers (which the
    /// resolver canonicalizes away first).
    TypeId
}

impl TypeId {
    // Pre-interned primitive types. The type interner guarantees these
    // indices; see `lume_types`.
    pub const VOID: TypeId = TypeId(0);
    pub const BOOL: TypeId = TypeId(1);
    pub const I32: TypeId = TypeId(2);
    pub const U32: TypeId = TypeId(3);
    pub const F32: TypeId = TypeId(4);

    /// First index handed out for compound types.
    pub const FIRST_COMPOUND: u32 = 5;
}

define_id! {
    /// Handle to a struct declaration registered with the type interner.
    ///
    /// Structs are nominal: two declarations with identical members are
    /// distinct types.
    StructId
}
