//! Closed tag sets shared between the AST and the type system.

use std::fmt;

/// Memory space / visibility domain of a variable.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum StorageClass {
    /// No storage class declared.
    #[default]
    None,
    Function,
    Private,
    Workgroup,
    Uniform,
    UniformConstant,
    Storage,
    Input,
    Output,
}

impl StorageClass {
    /// Whether buffers in this storage class are visible to both host and
    /// device, requiring host-shareable store types.
    pub fn is_host_shareable(self) -> bool {
        matches!(self, StorageClass::Uniform | StorageClass::Storage)
    }
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StorageClass::None => "none",
            StorageClass::Function => "function",
            StorageClass::Private => "private",
            StorageClass::Workgroup => "workgroup",
            StorageClass::Uniform => "uniform",
            StorageClass::UniformConstant => "uniform_constant",
            StorageClass::Storage => "storage",
            StorageClass::Input => "in",
            StorageClass::Output => "out",
        };
        f.write_str(s)
    }
}

/// Pipeline stage of an entry point.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum PipelineStage {
    #[default]
    None,
    Vertex,
    Fragment,
    Compute,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PipelineStage::None => "none",
            PipelineStage::Vertex => "vertex",
            PipelineStage::Fragment => "fragment",
            PipelineStage::Compute => "compute",
        };
        f.write_str(s)
    }
}

/// Builtin pipeline inputs and outputs.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BuiltinValue {
    Position,
    VertexIndex,
    InstanceIndex,
    FrontFacing,
    FragDepth,
    LocalInvocationId,
    LocalInvocationIndex,
    GlobalInvocationId,
    WorkgroupId,
    SampleIndex,
    SampleMask,
}

impl fmt::Display for BuiltinValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BuiltinValue::Position => "position",
            BuiltinValue::VertexIndex => "vertex_index",
            BuiltinValue::InstanceIndex => "instance_index",
            BuiltinValue::FrontFacing => "front_facing",
            BuiltinValue::FragDepth => "frag_depth",
            BuiltinValue::LocalInvocationId => "local_invocation_id",
            BuiltinValue::LocalInvocationIndex => "local_invocation_index",
            BuiltinValue::GlobalInvocationId => "global_invocation_id",
            BuiltinValue::WorkgroupId => "workgroup_id",
            BuiltinValue::SampleIndex => "sample_index",
            BuiltinValue::SampleMask => "sample_mask",
        };
        f.write_str(s)
    }
}

/// Access qualifier mode.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AccessMode {
    Read,
    Write,
    ReadWrite,
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AccessMode::Read => "read",
            AccessMode::Write => "write",
            AccessMode::ReadWrite => "read_write",
        };
        f.write_str(s)
    }
}

/// Texture dimensionality.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TextureDimension {
    D1,
    D2,
    D2Array,
    D3,
    Cube,
    CubeArray,
}

impl fmt::Display for TextureDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TextureDimension::D1 => "1d",
            TextureDimension::D2 => "2d",
            TextureDimension::D2Array => "2d_array",
            TextureDimension::D3 => "3d",
            TextureDimension::Cube => "cube",
            TextureDimension::CubeArray => "cube_array",
        };
        f.write_str(s)
    }
}

/// Texel format of a storage texture.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ImageFormat {
    R8Unorm,
    R8Snorm,
    R32Uint,
    R32Sint,
    R32Float,
    Rg32Uint,
    Rg32Sint,
    Rg32Float,
    Rgba8Unorm,
    Rgba8Snorm,
    Rgba8Uint,
    Rgba8Sint,
    Rgba16Uint,
    Rgba16Sint,
    Rgba16Float,
    Rgba32Uint,
    Rgba32Sint,
    Rgba32Float,
}

impl ImageFormat {
    /// Whether this format is one of the texel formats permitted for storage
    /// textures.
    pub fn is_valid_for_storage(self) -> bool {
        !matches!(self, ImageFormat::R8Unorm | ImageFormat::R8Snorm)
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImageFormat::R8Unorm => "r8unorm",
            ImageFormat::R8Snorm => "r8snorm",
            ImageFormat::R32Uint => "r32uint",
            ImageFormat::R32Sint => "r32sint",
            ImageFormat::R32Float => "r32float",
            ImageFormat::Rg32Uint => "rg32uint",
            ImageFormat::Rg32Sint => "rg32sint",
            ImageFormat::Rg32Float => "rg32float",
            ImageFormat::Rgba8Unorm => "rgba8unorm",
            ImageFormat::Rgba8Snorm => "rgba8snorm",
            ImageFormat::Rgba8Uint => "rgba8uint",
            ImageFormat::Rgba8Sint => "rgba8sint",
            ImageFormat::Rgba16Uint => "rgba16uint",
            ImageFormat::Rgba16Sint => "rgba16sint",
            ImageFormat::Rgba16Float => "rgba16float",
            ImageFormat::Rgba32Uint => "rgba32uint",
            ImageFormat::Rgba32Sint => "rgba32sint",
            ImageFormat::Rgba32Float => "rgba32float",
        };
        f.write_str(s)
    }
}

/// Sampler kind.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SamplerKind {
    Sampler,
    Comparison,
}

impl fmt::Display for SamplerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SamplerKind::Sampler => "sampler",
            SamplerKind::Comparison => "sampler_comparison",
        };
        f.write_str(s)
    }
}
