//! Guard against stack exhaustion in the recursive expression walk.

/// Run `f`, growing the stack first when the remaining headroom is low.
///
/// Expression resolution recurses once per AST nesting level, so a
/// pathologically nested input could otherwise blow the native stack. The
/// 256KB red zone and 2MB growth increment match what the walk needs per
/// level with plenty of margin.
pub fn ensure_sufficient_stack<R, F: FnOnce() -> R>(f: F) -> R {
    stacker::maybe_grow(256 * 1024, 2 * 1024 * 1024, f)
}
