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

//! Texture resource descriptors.

use crate::common::ResourceStorage;
use crate::format::TextureFormat;
use crate::opalite_bitflags;

/// The dimensionality of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureType {
    /// Unspecified.
    #[default]
    Invalid,
    /// A two-dimensional texture.
    Two,
    /// An array of two-dimensional textures.
    TwoArray,
    /// A three-dimensional texture.
    Three,
    /// A cube map with six faces.
    Cube,
}

/// One face of a cube map, in native attachment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureCubeFace {
    /// +X face.
    PosX,
    /// -X face.
    NegX,
    /// +Y face.
    PosY,
    /// -Y face.
    NegY,
    /// +Z face.
    PosZ,
    /// -Z face.
    NegZ,
}

impl TextureCubeFace {
    /// All six faces in native attachment order.
    pub const ALL: [TextureCubeFace; 6] = [
        TextureCubeFace::PosX,
        TextureCubeFace::NegX,
        TextureCubeFace::PosY,
        TextureCubeFace::NegY,
        TextureCubeFace::PosZ,
        TextureCubeFace::NegZ,
    ];

    /// The face's index in native attachment order.
    pub const fn index(self) -> usize {
        self as usize
    }
}

opalite_bitflags! {
    /// How a texture may be used.
    pub struct TextureUsage: u8 {
        /// The texture can be sampled from shaders.
        const SAMPLED = 1 << 0;
        /// The texture can be bound as a shader storage image.
        const STORAGE = 1 << 1;
        /// The texture can be attached to a framebuffer.
        const ATTACHMENT = 1 << 2;
    }
}

/// Describes a texture to be created by a device.
///
/// Dimensions, layer, sample, and mip counts are fixed for the lifetime of
/// the created texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDesc {
    /// Width in texels.
    pub width: usize,
    /// Height in texels.
    pub height: usize,
    /// Depth in texels (3D textures only).
    pub depth: usize,
    /// Number of array layers.
    pub num_layers: usize,
    /// Number of samples per texel.
    pub num_samples: usize,
    /// Number of mip levels.
    pub num_mip_levels: usize,
    /// The texture's dimensionality.
    pub texture_type: TextureType,
    /// The texel format.
    pub format: TextureFormat,
    /// Where the texture's memory lives.
    pub storage: ResourceStorage,
    /// Allowed usages.
    pub usage: TextureUsage,
}

impl Default for TextureDesc {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            depth: 1,
            num_layers: 1,
            num_samples: 1,
            num_mip_levels: 1,
            texture_type: TextureType::Invalid,
            format: TextureFormat::Invalid,
            storage: ResourceStorage::Invalid,
            usage: TextureUsage::EMPTY,
        }
    }
}

impl TextureDesc {
    /// Describes a two-dimensional texture.
    pub fn new_2d(format: TextureFormat, width: usize, height: usize, usage: TextureUsage) -> Self {
        Self {
            width,
            height,
            texture_type: TextureType::Two,
            format,
            usage,
            ..Self::default()
        }
    }

    /// Describes a two-dimensional texture array.
    pub fn new_2d_array(
        format: TextureFormat,
        width: usize,
        height: usize,
        num_layers: usize,
        usage: TextureUsage,
    ) -> Self {
        Self {
            width,
            height,
            num_layers,
            texture_type: TextureType::TwoArray,
            format,
            usage,
            ..Self::default()
        }
    }

    /// Describes a three-dimensional texture.
    pub fn new_3d(
        format: TextureFormat,
        width: usize,
        height: usize,
        depth: usize,
        usage: TextureUsage,
    ) -> Self {
        Self {
            width,
            height,
            depth,
            texture_type: TextureType::Three,
            format,
            usage,
            ..Self::default()
        }
    }

    /// Describes a cube map texture.
    pub fn new_cube(format: TextureFormat, size: usize, usage: TextureUsage) -> Self {
        Self {
            width: size,
            height: size,
            texture_type: TextureType::Cube,
            format,
            usage,
            ..Self::default()
        }
    }

    /// Number of mip levels in a full chain for the given extent.
    pub fn calc_num_mip_levels(width: usize, height: usize) -> usize {
        let mut levels = 1;
        let mut size = width.max(height);
        while size > 1 {
            levels += 1;
            size >>= 1;
        }
        levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_mip_chain_length() {
        assert_eq!(TextureDesc::calc_num_mip_levels(1, 1), 1);
        assert_eq!(TextureDesc::calc_num_mip_levels(256, 256), 9);
        assert_eq!(TextureDesc::calc_num_mip_levels(640, 480), 10);
    }

    #[test]
    fn cube_face_order() {
        assert_eq!(TextureCubeFace::PosX.index(), 0);
        assert_eq!(TextureCubeFace::NegZ.index(), 5);
        assert_eq!(TextureCubeFace::ALL.len(), 6);
    }
}
