//! Structural canonicalization.
//!
//! Canonicalization strips alias chains at every nesting level and rebuilds
//! vectors, matrices, and access qualifiers around canonical element types.
//! Pointers and arrays are left as declared. Because canonical types are
//! interned, canonical equality is handle equality; this is what binary
//! operator validation, assignment compatibility, and entry-point interface
//! checks compare.

use lume_ir::TypeId;
use lume_types::Type;

use super::Resolver;

impl Resolver<'_> {
    /// The canonical form of a type. Memoized per input handle.
    pub(crate) fn canonical(&mut self, ty: TypeId) -> TypeId {
        if let Some(&cached) = self.canonical_memo.get(&ty) {
            return cached;
        }
        let unaliased = self.types().unwrap_alias(ty);
        let result = match self.types().get(unaliased) {
            Type::Vector { elem, size } => {
                let elem = self.canonical(elem);
                self.types().vector(elem, size)
            }
            Type::Matrix {
                elem,
                columns,
                rows,
            } => {
                let elem = self.canonical(elem);
                self.types().matrix(elem, columns, rows)
            }
            Type::AccessControl { access, elem } => {
                let elem = self.canonical(elem);
                self.types().access(access, elem)
            }
            _ => unaliased,
        };
        self.canonical_memo.insert(ty, result);
        result
    }
}
