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

//! Shared primitive types and binding-table limits.

use crate::opalite_bitflags;

/// Maximum number of texture/sampler slots per shader stage.
pub const MAX_TEXTURE_SAMPLERS: usize = 16;
/// Maximum number of vertex buffer slots (also used for compute buffer units).
pub const MAX_VERTEX_BUFFERS: usize = 16;
/// Maximum number of uniform buffer binding points.
pub const MAX_UNIFORM_BUFFERS: usize = 16;

/// The primitive topology used to assemble vertices for drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimitiveType {
    /// A list of independent points.
    Point,
    /// A list of independent line segments.
    Line,
    /// A connected strip of line segments.
    LineStrip,
    /// A list of independent triangles.
    #[default]
    Triangle,
    /// A connected strip of triangles.
    TriangleStrip,
}

/// The element width of an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    /// 16-bit unsigned indices.
    U16,
    /// 32-bit unsigned indices.
    U32,
}

/// Where a resource's memory lives and how the host may access it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResourceStorage {
    /// Unspecified placement.
    #[default]
    Invalid,
    /// Device-local memory, not host-visible.
    Private,
    /// Host-visible memory intended for frequent updates.
    Shared,
    /// Host-updateable memory mirrored on the device.
    Managed,
    /// Transient contents that never leave the device.
    Memoryless,
}

impl ResourceStorage {
    /// Whether the host is allowed to rewrite the resource after creation.
    pub fn is_host_writable(&self) -> bool {
        matches!(self, ResourceStorage::Shared)
    }
}

opalite_bitflags! {
    /// The shader stages a binding applies to.
    pub struct StageFlags: u8 {
        /// The vertex stage.
        const VERTEX = 1 << 0;
        /// The fragment stage.
        const FRAGMENT = 1 << 1;
    }
}

opalite_bitflags! {
    /// How a compute image binding may be accessed by the shader.
    pub struct ImageAccess: u8 {
        /// The shader reads from the image.
        const READ = 1 << 0;
        /// The shader writes to the image.
        const WRITE = 1 << 1;
    }
}

/// An RGBA color with floating point channels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    /// Red channel, in `[0, 1]`.
    pub r: f32,
    /// Green channel, in `[0, 1]`.
    pub g: f32,
    /// Blue channel, in `[0, 1]`.
    pub b: f32,
    /// Alpha channel, in `[0, 1]`.
    pub a: f32,
}

impl Color {
    /// Creates a color from its four channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// A viewport rectangle in framebuffer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Left edge.
    pub x: f32,
    /// Bottom edge.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Viewport {
    /// Creates a viewport covering the given rectangle.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

/// A scissor rectangle in framebuffer coordinates.
///
/// The all-zero rectangle is the "null" scissor and disables scissoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScissorRect {
    /// Left edge.
    pub x: u32,
    /// Bottom edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ScissorRect {
    /// Creates a scissor rectangle.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Whether this is the null rectangle that disables scissoring.
    pub const fn is_null(&self) -> bool {
        self.x == 0 && self.y == 0 && self.width == 0 && self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_scissor_rect() {
        assert!(ScissorRect::default().is_null());
        assert!(!ScissorRect::new(0, 0, 640, 480).is_null());
    }

    #[test]
    fn shared_storage_is_host_writable() {
        assert!(ResourceStorage::Shared.is_host_writable());
        assert!(!ResourceStorage::Private.is_host_writable());
        assert!(!ResourceStorage::Memoryless.is_host_writable());
    }
}
