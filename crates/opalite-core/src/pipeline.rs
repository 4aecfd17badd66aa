// Copyright 2025 opalite contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Immutable pipeline state descriptions.
//!
//! A pipeline description is plain data; backends capture it at pipeline
//! construction and never read it again afterwards.

use std::collections::BTreeMap;

use crate::vertex::VertexInputState;

/// A comparison function for depth tests, stencil tests, and samplers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompareOp {
    /// Never passes.
    Never,
    /// Passes if the new value is less than the stored value.
    Less,
    /// Passes if the values are equal.
    Equal,
    /// Passes if the new value is less than or equal to the stored value.
    LessOrEqual,
    /// Passes if the new value is greater than the stored value.
    Greater,
    /// Passes if the values differ.
    NotEqual,
    /// Passes if the new value is greater than or equal to the stored value.
    GreaterOrEqual,
    /// Always passes.
    #[default]
    Always,
}

/// An operation applied to a stencil value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StencilOp {
    /// Keep the current value.
    #[default]
    Keep,
    /// Set the value to zero.
    Zero,
    /// Replace the value with the reference.
    Replace,
    /// Increment, clamping at the maximum.
    IncrementClamp,
    /// Decrement, clamping at zero.
    DecrementClamp,
    /// Bitwise invert the value.
    Invert,
    /// Increment, wrapping to zero.
    IncrementWrap,
    /// Decrement, wrapping to the maximum.
    DecrementWrap,
}

/// A multiplier applied to a blend input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendFactor {
    /// Multiply by zero.
    Zero,
    /// Multiply by one.
    #[default]
    One,
    /// Multiply by the source color.
    SrcColor,
    /// Multiply by one minus the source color.
    OneMinusSrcColor,
    /// Multiply by the source alpha.
    SrcAlpha,
    /// Multiply by one minus the source alpha.
    OneMinusSrcAlpha,
    /// Multiply by the destination color.
    DstColor,
    /// Multiply by one minus the destination color.
    OneMinusDstColor,
    /// Multiply by the destination alpha.
    DstAlpha,
    /// Multiply by one minus the destination alpha.
    OneMinusDstAlpha,
}

/// The operation that combines the blend inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendOp {
    /// `src + dst`.
    #[default]
    Add,
    /// `src - dst`.
    Subtract,
    /// `dst - src`.
    ReverseSubtract,
    /// `min(src, dst)`.
    Min,
    /// `max(src, dst)`.
    Max,
}

/// Which triangle faces are discarded by culling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullMode {
    /// No culling.
    #[default]
    None,
    /// Discard front-facing triangles.
    Front,
    /// Discard back-facing triangles.
    Back,
}

/// The vertex winding that makes a triangle front-facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindingOrder {
    /// Counter-clockwise winding is front-facing.
    #[default]
    CounterClockwise,
    /// Clockwise winding is front-facing.
    Clockwise,
}

/// How polygons are rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolygonFillMode {
    /// Fill the polygon interior.
    #[default]
    Fill,
    /// Draw polygon edges as lines.
    Line,
}

/// The blend configuration of one color attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorBlendAttachment {
    /// Whether blending is enabled for the attachment.
    pub blend_enabled: bool,
    /// Source factor for the color channels.
    pub src_color_factor: BlendFactor,
    /// Destination factor for the color channels.
    pub dst_color_factor: BlendFactor,
    /// Blend operation for the color channels.
    pub color_op: BlendOp,
    /// Source factor for the alpha channel.
    pub src_alpha_factor: BlendFactor,
    /// Destination factor for the alpha channel.
    pub dst_alpha_factor: BlendFactor,
    /// Blend operation for the alpha channel.
    pub alpha_op: BlendOp,
}

/// Fixed-function rasterizer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RasterizationState {
    /// Face culling mode.
    pub cull_mode: CullMode,
    /// Front-face winding order.
    pub winding: WindingOrder,
    /// Polygon fill mode.
    pub fill_mode: PolygonFillMode,
}

/// Depth test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DepthDesc {
    /// Whether depth writes are enabled.
    pub write_enabled: bool,
    /// The depth comparison function.
    pub compare_op: CompareOp,
}

/// Stencil configuration for one face orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StencilDesc {
    /// The stencil comparison function.
    pub compare_op: CompareOp,
    /// Applied when the stencil test fails.
    pub fail_op: StencilOp,
    /// Applied when the stencil test passes but the depth test fails.
    pub depth_fail_op: StencilOp,
    /// Applied when both tests pass.
    pub pass_op: StencilOp,
    /// Mask ANDed with values before comparison.
    pub read_mask: u32,
    /// Mask controlling which bits are written.
    pub write_mask: u32,
}

impl Default for StencilDesc {
    fn default() -> Self {
        Self {
            compare_op: CompareOp::Always,
            fail_op: StencilOp::Keep,
            depth_fail_op: StencilOp::Keep,
            pass_op: StencilOp::Keep,
            read_mask: 0xFF,
            write_mask: 0xFF,
        }
    }
}

/// Combined depth and stencil state description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DepthStencilDesc {
    /// Depth test configuration.
    pub depth: DepthDesc,
    /// Stencil configuration for front-facing primitives.
    pub stencil_front: StencilDesc,
    /// Stencil configuration for back-facing primitives.
    pub stencil_back: StencilDesc,
}

/// Describes an immutable graphics pipeline.
///
/// The unit/sampler maps associate texture units (0-based slots) with the
/// names of sampler uniforms in the linked program; the backend resolves
/// them to native locations once, at pipeline construction.
#[derive(Debug, Clone, Default)]
pub struct GraphicsPipelineDesc {
    /// Vertex input layout.
    pub vertex_input: VertexInputState,
    /// Per-attachment blend state.
    pub color_blend_attachments: Vec<ColorBlendAttachment>,
    /// Fixed-function rasterizer state.
    pub rasterization: RasterizationState,
    /// Vertex-stage texture unit to sampler uniform name.
    pub vertex_unit_sampler_map: BTreeMap<usize, String>,
    /// Fragment-stage texture unit to sampler uniform name.
    pub fragment_unit_sampler_map: BTreeMap<usize, String>,
}

/// Describes an immutable compute pipeline.
#[derive(Debug, Clone, Default)]
pub struct ComputePipelineDesc {
    /// Image unit to image uniform name.
    pub images_map: BTreeMap<usize, String>,
    /// Buffer unit to uniform or storage block name.
    pub buffers_map: BTreeMap<usize, String>,
}
