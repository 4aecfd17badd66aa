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

//! Conversions from the core descriptor enums to native enum values.

use opalite_core::common::{ImageAccess, IndexFormat, PrimitiveType};
use opalite_core::pipeline::{
    BlendFactor, BlendOp, CompareOp, PolygonFillMode, StencilOp, WindingOrder,
};
use opalite_core::sampler::SamplerAddressMode;
use opalite_core::vertex::VertexAttributeFormat;

use crate::gl;

/// Converts a core descriptor value into its native representation.
pub trait IntoGl<T> {
    /// Performs the conversion.
    fn into_gl(self) -> T;
}

impl IntoGl<u32> for PrimitiveType {
    fn into_gl(self) -> u32 {
        match self {
            PrimitiveType::Point => gl::POINTS,
            PrimitiveType::Line => gl::LINES,
            PrimitiveType::LineStrip => gl::LINE_STRIP,
            PrimitiveType::Triangle => gl::TRIANGLES,
            PrimitiveType::TriangleStrip => gl::TRIANGLE_STRIP,
        }
    }
}

impl IntoGl<u32> for IndexFormat {
    fn into_gl(self) -> u32 {
        match self {
            IndexFormat::U16 => gl::UNSIGNED_SHORT,
            IndexFormat::U32 => gl::UNSIGNED_INT,
        }
    }
}

/// Byte width of one index of the given format.
pub fn index_size(format: IndexFormat) -> usize {
    match format {
        IndexFormat::U16 => 2,
        IndexFormat::U32 => 4,
    }
}

impl IntoGl<u32> for CompareOp {
    fn into_gl(self) -> u32 {
        match self {
            CompareOp::Never => gl::NEVER,
            CompareOp::Less => gl::LESS,
            CompareOp::Equal => gl::EQUAL,
            CompareOp::LessOrEqual => gl::LEQUAL,
            CompareOp::Greater => gl::GREATER,
            CompareOp::NotEqual => gl::NOTEQUAL,
            CompareOp::GreaterOrEqual => gl::GEQUAL,
            CompareOp::Always => gl::ALWAYS,
        }
    }
}

impl IntoGl<u32> for StencilOp {
    fn into_gl(self) -> u32 {
        match self {
            StencilOp::Keep => gl::KEEP,
            StencilOp::Zero => gl::ZERO,
            StencilOp::Replace => gl::REPLACE,
            StencilOp::IncrementClamp => gl::INCR,
            StencilOp::DecrementClamp => gl::DECR,
            StencilOp::Invert => gl::INVERT,
            StencilOp::IncrementWrap => gl::INCR_WRAP,
            StencilOp::DecrementWrap => gl::DECR_WRAP,
        }
    }
}

impl IntoGl<u32> for BlendFactor {
    fn into_gl(self) -> u32 {
        match self {
            BlendFactor::Zero => gl::ZERO,
            BlendFactor::One => gl::ONE,
            BlendFactor::SrcColor => gl::SRC_COLOR,
            BlendFactor::OneMinusSrcColor => gl::ONE_MINUS_SRC_COLOR,
            BlendFactor::SrcAlpha => gl::SRC_ALPHA,
            BlendFactor::OneMinusSrcAlpha => gl::ONE_MINUS_SRC_ALPHA,
            BlendFactor::DstColor => gl::DST_COLOR,
            BlendFactor::OneMinusDstColor => gl::ONE_MINUS_DST_COLOR,
            BlendFactor::DstAlpha => gl::DST_ALPHA,
            BlendFactor::OneMinusDstAlpha => gl::ONE_MINUS_DST_ALPHA,
        }
    }
}

impl IntoGl<u32> for BlendOp {
    fn into_gl(self) -> u32 {
        match self {
            BlendOp::Add => gl::FUNC_ADD,
            BlendOp::Subtract => gl::FUNC_SUBTRACT,
            BlendOp::ReverseSubtract => gl::FUNC_REVERSE_SUBTRACT,
            BlendOp::Min => gl::MIN,
            BlendOp::Max => gl::MAX,
        }
    }
}

impl IntoGl<u32> for WindingOrder {
    fn into_gl(self) -> u32 {
        match self {
            WindingOrder::CounterClockwise => gl::CCW,
            WindingOrder::Clockwise => gl::CW,
        }
    }
}

impl IntoGl<u32> for PolygonFillMode {
    fn into_gl(self) -> u32 {
        match self {
            PolygonFillMode::Fill => gl::FILL,
            PolygonFillMode::Line => gl::LINE,
        }
    }
}

impl IntoGl<u32> for SamplerAddressMode {
    fn into_gl(self) -> u32 {
        match self {
            SamplerAddressMode::Repeat => gl::REPEAT,
            SamplerAddressMode::Clamp => gl::CLAMP_TO_EDGE,
            SamplerAddressMode::MirrorRepeat => gl::MIRRORED_REPEAT,
        }
    }
}

impl IntoGl<u32> for ImageAccess {
    fn into_gl(self) -> u32 {
        let read = self.contains(ImageAccess::READ);
        let write = self.contains(ImageAccess::WRITE);
        match (read, write) {
            (_, false) => gl::READ_ONLY,
            (false, true) => gl::WRITE_ONLY,
            (true, true) => gl::READ_WRITE,
        }
    }
}

/// The native layout of one vertex attribute format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlVertexFormat {
    /// Component count per vertex.
    pub components: i32,
    /// Native scalar type.
    pub data_type: u32,
    /// Whether fixed-point data is normalized when fetched.
    pub normalized: bool,
    /// Whether the attribute is fetched through the integer path.
    pub integer: bool,
}

impl IntoGl<GlVertexFormat> for VertexAttributeFormat {
    fn into_gl(self) -> GlVertexFormat {
        use VertexAttributeFormat::*;
        let components = self.components() as i32;
        let (data_type, normalized, integer) = match self {
            Float | Float2 | Float3 | Float4 => (gl::FLOAT, false, false),
            Int | Int2 | Int3 | Int4 => (gl::INT, false, true),
            UInt | UInt2 | UInt3 | UInt4 => (gl::UNSIGNED_INT, false, true),
            Byte4Norm => (gl::BYTE, true, false),
            UByte4Norm => (gl::UNSIGNED_BYTE, true, false),
            Short2Norm => (gl::SHORT, true, false),
            UShort2Norm => (gl::UNSIGNED_SHORT, true, false),
            HalfFloat2 | HalfFloat4 => (gl::HALF_FLOAT, false, false),
        };
        GlVertexFormat {
            components,
            data_type,
            normalized,
            integer,
        }
    }
}
