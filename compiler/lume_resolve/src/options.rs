//! Resolver options and capability flags.

use bitflags::bitflags;

bitflags! {
    /// Extension-gated features the surrounding driver has enabled.
    ///
    /// The resolver does not parse extension declarations; it only verifies
    /// that usage of a gated feature is permitted.
    #[derive(Copy, Clone, Eq, PartialEq, Debug)]
    pub struct Capabilities: u8 {
        const MULTISAMPLED_TEXTURES = 1 << 0;
        const STORAGE_TEXTURES = 1 << 1;
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities::all()
    }
}

/// Options for one resolution pass.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct ResolverOptions {
    pub capabilities: Capabilities,
}
