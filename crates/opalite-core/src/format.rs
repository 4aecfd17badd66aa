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

//! Texture formats and block-aware byte layout arithmetic.
//!
//! Every format maps to a constant [`FormatProperties`] record. The layout
//! helpers treat uncompressed formats as 1x1 "blocks", so row, layer, and
//! range sizes are computed uniformly for linear and block-compressed data.

use crate::opalite_bitflags;

opalite_bitflags! {
    /// Classification flags of a texture format.
    pub struct FormatFlags: u8 {
        /// The format holds depth data.
        const DEPTH = 1 << 0;
        /// The format holds stencil data.
        const STENCIL = 1 << 1;
        /// The format is block-compressed.
        const COMPRESSED = 1 << 2;
        /// Sampling decodes from the sRGB transfer function.
        const SRGB = 1 << 3;
    }
}

/// The pixel (or block) format of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(missing_docs)]
pub enum TextureFormat {
    /// Unspecified format.
    #[default]
    Invalid,

    // 8-bit
    A8Unorm,
    R8Unorm,

    // 16-bit
    R16Float,
    R16Uint,
    R16Unorm,
    Rg8Unorm,
    B5G5R5A1Unorm,
    B5G6R5Unorm,
    Abgr4Unorm,

    // 32-bit
    Rgba8Unorm,
    Bgra8Unorm,
    Rgba8UnormSrgb,
    Bgra8UnormSrgb,
    Rg16Float,
    Rg16Uint,
    Rg16Unorm,
    Rgb10A2Unorm,
    R32Float,

    // 64-bit and wider
    Rgba16Float,
    Rgba32Uint,
    Rgba32Float,

    // ASTC (all 16 bytes per block)
    Astc4x4Unorm,
    Astc4x4Srgb,
    Astc5x4Unorm,
    Astc5x4Srgb,
    Astc5x5Unorm,
    Astc5x5Srgb,
    Astc6x5Unorm,
    Astc6x5Srgb,
    Astc6x6Unorm,
    Astc6x6Srgb,
    Astc8x5Unorm,
    Astc8x5Srgb,
    Astc8x6Unorm,
    Astc8x6Srgb,
    Astc8x8Unorm,
    Astc8x8Srgb,
    Astc10x5Unorm,
    Astc10x5Srgb,
    Astc10x6Unorm,
    Astc10x6Srgb,
    Astc10x8Unorm,
    Astc10x8Srgb,
    Astc10x10Unorm,
    Astc10x10Srgb,
    Astc12x10Unorm,
    Astc12x10Srgb,
    Astc12x12Unorm,
    Astc12x12Srgb,

    // PVRTC (surfaces are padded to at least 2x2 blocks)
    Pvrtc2BppRgb,
    Pvrtc2BppRgba,
    Pvrtc4BppRgb,
    Pvrtc4BppRgba,

    // ETC2 / EAC
    Etc2Rgb8,
    Etc2Rgb8Srgb,
    Etc2Rgb8A1,
    Etc2Rgb8A1Srgb,
    Etc2Rgba8,
    Etc2Rgba8Srgb,
    EacR11Unorm,
    EacR11Snorm,
    EacRg11Unorm,
    EacRg11Snorm,

    // BC
    Bc7Unorm,

    // Depth / stencil
    Depth16Unorm,
    Depth24Unorm,
    Depth32Float,
    Depth24UnormStencil8,
    Depth32FloatStencil8,
    Stencil8,
}

impl TextureFormat {
    /// Returns the constant layout record of this format.
    pub const fn properties(self) -> FormatProperties {
        use TextureFormat::*;
        match self {
            Invalid => FormatProperties::color(self, 1, 1, FormatFlags::EMPTY),

            A8Unorm | R8Unorm => FormatProperties::color(self, 1, 1, FormatFlags::EMPTY),
            R16Float | R16Uint | R16Unorm => {
                FormatProperties::color(self, 1, 2, FormatFlags::EMPTY)
            }
            Rg8Unorm => FormatProperties::color(self, 2, 2, FormatFlags::EMPTY),
            B5G5R5A1Unorm | Abgr4Unorm => FormatProperties::color(self, 4, 2, FormatFlags::EMPTY),
            B5G6R5Unorm => FormatProperties::color(self, 3, 2, FormatFlags::EMPTY),

            Rgba8Unorm | Bgra8Unorm | Rgb10A2Unorm => {
                FormatProperties::color(self, 4, 4, FormatFlags::EMPTY)
            }
            Rgba8UnormSrgb | Bgra8UnormSrgb => {
                FormatProperties::color(self, 4, 4, FormatFlags::SRGB)
            }
            Rg16Float | Rg16Uint | Rg16Unorm => {
                FormatProperties::color(self, 2, 4, FormatFlags::EMPTY)
            }
            R32Float => FormatProperties::color(self, 1, 4, FormatFlags::EMPTY),
            Rgba16Float => FormatProperties::color(self, 4, 8, FormatFlags::EMPTY),
            Rgba32Uint | Rgba32Float => FormatProperties::color(self, 4, 16, FormatFlags::EMPTY),

            Astc4x4Unorm => FormatProperties::compressed(self, 4, 16, 4, 4, FormatFlags::EMPTY),
            Astc4x4Srgb => FormatProperties::compressed(self, 4, 16, 4, 4, FormatFlags::SRGB),
            Astc5x4Unorm => FormatProperties::compressed(self, 4, 16, 5, 4, FormatFlags::EMPTY),
            Astc5x4Srgb => FormatProperties::compressed(self, 4, 16, 5, 4, FormatFlags::SRGB),
            Astc5x5Unorm => FormatProperties::compressed(self, 4, 16, 5, 5, FormatFlags::EMPTY),
            Astc5x5Srgb => FormatProperties::compressed(self, 4, 16, 5, 5, FormatFlags::SRGB),
            Astc6x5Unorm => FormatProperties::compressed(self, 4, 16, 6, 5, FormatFlags::EMPTY),
            Astc6x5Srgb => FormatProperties::compressed(self, 4, 16, 6, 5, FormatFlags::SRGB),
            Astc6x6Unorm => FormatProperties::compressed(self, 4, 16, 6, 6, FormatFlags::EMPTY),
            Astc6x6Srgb => FormatProperties::compressed(self, 4, 16, 6, 6, FormatFlags::SRGB),
            Astc8x5Unorm => FormatProperties::compressed(self, 4, 16, 8, 5, FormatFlags::EMPTY),
            Astc8x5Srgb => FormatProperties::compressed(self, 4, 16, 8, 5, FormatFlags::SRGB),
            Astc8x6Unorm => FormatProperties::compressed(self, 4, 16, 8, 6, FormatFlags::EMPTY),
            Astc8x6Srgb => FormatProperties::compressed(self, 4, 16, 8, 6, FormatFlags::SRGB),
            Astc8x8Unorm => FormatProperties::compressed(self, 4, 16, 8, 8, FormatFlags::EMPTY),
            Astc8x8Srgb => FormatProperties::compressed(self, 4, 16, 8, 8, FormatFlags::SRGB),
            Astc10x5Unorm => FormatProperties::compressed(self, 4, 16, 10, 5, FormatFlags::EMPTY),
            Astc10x5Srgb => FormatProperties::compressed(self, 4, 16, 10, 5, FormatFlags::SRGB),
            Astc10x6Unorm => FormatProperties::compressed(self, 4, 16, 10, 6, FormatFlags::EMPTY),
            Astc10x6Srgb => FormatProperties::compressed(self, 4, 16, 10, 6, FormatFlags::SRGB),
            Astc10x8Unorm => FormatProperties::compressed(self, 4, 16, 10, 8, FormatFlags::EMPTY),
            Astc10x8Srgb => FormatProperties::compressed(self, 4, 16, 10, 8, FormatFlags::SRGB),
            Astc10x10Unorm => FormatProperties::compressed(self, 4, 16, 10, 10, FormatFlags::EMPTY),
            Astc10x10Srgb => FormatProperties::compressed(self, 4, 16, 10, 10, FormatFlags::SRGB),
            Astc12x10Unorm => FormatProperties::compressed(self, 4, 16, 12, 10, FormatFlags::EMPTY),
            Astc12x10Srgb => FormatProperties::compressed(self, 4, 16, 12, 10, FormatFlags::SRGB),
            Astc12x12Unorm => FormatProperties::compressed(self, 4, 16, 12, 12, FormatFlags::EMPTY),
            Astc12x12Srgb => FormatProperties::compressed(self, 4, 16, 12, 12, FormatFlags::SRGB),

            Pvrtc2BppRgb => FormatProperties::compressed_padded(self, 3, 8, 8, 4, 2, 2),
            Pvrtc2BppRgba => FormatProperties::compressed_padded(self, 4, 8, 8, 4, 2, 2),
            Pvrtc4BppRgb => FormatProperties::compressed_padded(self, 3, 8, 4, 4, 2, 2),
            Pvrtc4BppRgba => FormatProperties::compressed_padded(self, 4, 8, 4, 4, 2, 2),

            Etc2Rgb8 => FormatProperties::compressed(self, 3, 8, 4, 4, FormatFlags::EMPTY),
            Etc2Rgb8Srgb => FormatProperties::compressed(self, 3, 8, 4, 4, FormatFlags::SRGB),
            Etc2Rgb8A1 => FormatProperties::compressed(self, 4, 8, 4, 4, FormatFlags::EMPTY),
            Etc2Rgb8A1Srgb => FormatProperties::compressed(self, 4, 8, 4, 4, FormatFlags::SRGB),
            Etc2Rgba8 => FormatProperties::compressed(self, 4, 16, 4, 4, FormatFlags::EMPTY),
            Etc2Rgba8Srgb => FormatProperties::compressed(self, 4, 16, 4, 4, FormatFlags::SRGB),
            EacR11Unorm | EacR11Snorm => {
                FormatProperties::compressed(self, 1, 8, 4, 4, FormatFlags::EMPTY)
            }
            EacRg11Unorm | EacRg11Snorm => {
                FormatProperties::compressed(self, 2, 16, 4, 4, FormatFlags::EMPTY)
            }

            Bc7Unorm => FormatProperties::compressed(self, 4, 16, 4, 4, FormatFlags::EMPTY),

            Depth16Unorm => FormatProperties::color(self, 1, 2, FormatFlags::DEPTH),
            Depth24Unorm => FormatProperties::color(self, 1, 3, FormatFlags::DEPTH),
            Depth32Float => FormatProperties::color(self, 1, 4, FormatFlags::DEPTH),
            Depth24UnormStencil8 => {
                FormatProperties::color(self, 2, 4, FormatFlags::DEPTH.with(FormatFlags::STENCIL))
            }
            Depth32FloatStencil8 => {
                FormatProperties::color(self, 2, 8, FormatFlags::DEPTH.with(FormatFlags::STENCIL))
            }
            Stencil8 => FormatProperties::color(self, 1, 1, FormatFlags::STENCIL),
        }
    }
}

/// Constant layout record of a [`TextureFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatProperties {
    /// The format this record describes.
    pub format: TextureFormat,
    /// Color components encoded per pixel.
    pub components: u8,
    /// Bytes per pixel for linear formats, bytes per block for compressed.
    pub bytes_per_block: u8,
    /// Block width in pixels (1 for linear formats).
    pub block_width: u8,
    /// Block height in pixels (1 for linear formats).
    pub block_height: u8,
    /// Block depth in pixels (1 for linear formats).
    pub block_depth: u8,
    /// Minimum number of blocks per row a surface must occupy.
    pub min_blocks_x: u8,
    /// Minimum number of block rows a surface must occupy.
    pub min_blocks_y: u8,
    /// Minimum number of block slices a surface must occupy.
    pub min_blocks_z: u8,
    /// Classification flags.
    pub flags: FormatFlags,
}

impl FormatProperties {
    const fn color(format: TextureFormat, components: u8, bytes_per_block: u8, flags: FormatFlags) -> Self {
        Self {
            format,
            components,
            bytes_per_block,
            block_width: 1,
            block_height: 1,
            block_depth: 1,
            min_blocks_x: 1,
            min_blocks_y: 1,
            min_blocks_z: 1,
            flags,
        }
    }

    const fn compressed(
        format: TextureFormat,
        components: u8,
        bytes_per_block: u8,
        block_width: u8,
        block_height: u8,
        flags: FormatFlags,
    ) -> Self {
        Self {
            format,
            components,
            bytes_per_block,
            block_width,
            block_height,
            block_depth: 1,
            min_blocks_x: 1,
            min_blocks_y: 1,
            min_blocks_z: 1,
            flags: flags.with(FormatFlags::COMPRESSED),
        }
    }

    const fn compressed_padded(
        format: TextureFormat,
        components: u8,
        bytes_per_block: u8,
        block_width: u8,
        block_height: u8,
        min_blocks_x: u8,
        min_blocks_y: u8,
    ) -> Self {
        Self {
            format,
            components,
            bytes_per_block,
            block_width,
            block_height,
            block_depth: 1,
            min_blocks_x,
            min_blocks_y,
            min_blocks_z: 1,
            flags: FormatFlags::COMPRESSED,
        }
    }

    /// Whether the format is block-compressed.
    pub const fn is_compressed(&self) -> bool {
        self.flags.contains(FormatFlags::COMPRESSED)
    }

    /// Whether the format holds depth data.
    pub const fn is_depth(&self) -> bool {
        self.flags.contains(FormatFlags::DEPTH)
    }

    /// Whether the format holds stencil data.
    pub const fn is_stencil(&self) -> bool {
        self.flags.contains(FormatFlags::STENCIL)
    }

    /// Whether the format holds depth or stencil data.
    pub const fn is_depth_or_stencil(&self) -> bool {
        self.flags.intersects(FormatFlags::DEPTH.with(FormatFlags::STENCIL))
    }

    /// Whether sampling decodes from the sRGB transfer function.
    pub const fn is_srgb(&self) -> bool {
        self.flags.contains(FormatFlags::SRGB)
    }

    /// Number of addressable rows in a range: texel rows for linear formats,
    /// block rows (clamped to the format minimum) for compressed ones.
    pub fn rows(&self, range: TextureRange) -> usize {
        let height = range.height.max(1);
        if self.is_compressed() {
            let block_height = self.block_height as usize;
            height.div_ceil(block_height).max(self.min_blocks_y as usize)
        } else {
            height
        }
    }

    /// Bytes needed for one row of `width` texels.
    pub fn bytes_per_row(&self, width: usize) -> usize {
        let width = width.max(1);
        if self.is_compressed() {
            let blocks = width
                .div_ceil(self.block_width as usize)
                .max(self.min_blocks_x as usize);
            blocks * self.bytes_per_block as usize
        } else {
            width * self.bytes_per_block as usize
        }
    }

    /// Bytes needed for one layer of `width` x `height` x `depth` texels.
    pub fn bytes_per_layer(&self, width: usize, height: usize, depth: usize) -> usize {
        let (width, height, depth) = (width.max(1), height.max(1), depth.max(1));
        if self.is_compressed() {
            let blocks_x = width
                .div_ceil(self.block_width as usize)
                .max(self.min_blocks_x as usize);
            let blocks_y = height
                .div_ceil(self.block_height as usize)
                .max(self.min_blocks_y as usize);
            let blocks_z = depth
                .div_ceil(self.block_depth as usize)
                .max(self.min_blocks_z as usize);
            blocks_x * blocks_y * blocks_z * self.bytes_per_block as usize
        } else {
            width * height * depth * self.bytes_per_block as usize
        }
    }

    /// Bytes needed for every layer and mip level covered by `range`.
    pub fn bytes_per_range(&self, range: TextureRange) -> usize {
        let mut bytes = 0;
        for i in 0..range.num_mip_levels {
            let mip = range.at_mip_level(range.mip_level + i);
            bytes += self.bytes_per_layer(mip.width, mip.height, mip.depth) * range.num_layers;
        }
        bytes
    }
}

/// A sub-region of a texture: texel box, layer slice, and mip slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureRange {
    /// Left texel of the box.
    pub x: usize,
    /// Bottom texel of the box.
    pub y: usize,
    /// Front texel of the box.
    pub z: usize,
    /// Box width in texels.
    pub width: usize,
    /// Box height in texels.
    pub height: usize,
    /// Box depth in texels.
    pub depth: usize,
    /// First array layer covered.
    pub layer: usize,
    /// Number of array layers covered.
    pub num_layers: usize,
    /// First mip level covered.
    pub mip_level: usize,
    /// Number of mip levels covered.
    pub num_mip_levels: usize,
}

impl Default for TextureRange {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            z: 0,
            width: 1,
            height: 1,
            depth: 1,
            layer: 0,
            num_layers: 1,
            mip_level: 0,
            num_mip_levels: 1,
        }
    }
}

impl TextureRange {
    /// A one-dimensional range of `width` texels starting at `x`.
    pub fn new_1d(x: usize, width: usize) -> Self {
        Self::new_3d(x, 0, 0, width, 1, 1)
    }

    /// A two-dimensional range at mip level 0.
    pub fn new_2d(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self::new_3d(x, y, 0, width, height, 1)
    }

    /// A two-dimensional range covering `num_layers` array layers.
    pub fn new_2d_array(
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        layer: usize,
        num_layers: usize,
    ) -> Self {
        Self {
            layer,
            num_layers,
            ..Self::new_3d(x, y, 0, width, height, 1)
        }
    }

    /// A three-dimensional range at mip level 0.
    pub fn new_3d(x: usize, y: usize, z: usize, width: usize, height: usize, depth: usize) -> Self {
        Self {
            x,
            y,
            z,
            width,
            height,
            depth,
            ..Self::default()
        }
    }

    /// The equivalent single-level range at a higher mip level, with the
    /// texel box halved per level (dimensions never drop below 1).
    pub fn at_mip_level(&self, mip_level: usize) -> Self {
        if mip_level <= self.mip_level {
            return *self;
        }
        let delta = mip_level - self.mip_level;
        Self {
            x: self.x >> delta,
            y: self.y >> delta,
            z: self.z >> delta,
            width: (self.width >> delta).max(1),
            height: (self.height >> delta).max(1),
            depth: (self.depth >> delta).max(1),
            layer: self.layer,
            num_layers: self.num_layers,
            mip_level,
            num_mip_levels: 1,
        }
    }

    /// The equivalent range restricted to a single array layer.
    pub fn at_layer(&self, layer: usize) -> Self {
        Self {
            layer,
            num_layers: 1,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncompressed_rows_and_bytes() {
        let props = TextureFormat::Rgba8Unorm.properties();
        assert!(!props.is_compressed());
        assert_eq!(props.rows(TextureRange::new_2d(0, 0, 16, 7)), 7);
        assert_eq!(props.bytes_per_row(7), 28);
        assert_eq!(props.bytes_per_layer(4, 4, 1), 64);
    }

    #[test]
    fn block_rounding_rounds_partial_blocks_up() {
        let props = TextureFormat::Astc4x4Unorm.properties();
        // Width 4 is exactly one block, width 5 spills into a second one.
        assert_eq!(props.bytes_per_row(4), 16);
        assert_eq!(props.bytes_per_row(5), 32);
        assert_eq!(props.rows(TextureRange::new_2d(0, 0, 4, 8)), 2);
        assert_eq!(props.rows(TextureRange::new_2d(0, 0, 4, 9)), 3);
    }

    #[test]
    fn bytes_per_layer_is_block_product() {
        let props = TextureFormat::Etc2Rgb8.properties();
        // 10x10 with 4x4 blocks -> 3x3 blocks of 8 bytes.
        assert_eq!(props.bytes_per_layer(10, 10, 1), 3 * 3 * 8);
    }

    #[test]
    fn pvrtc_minimum_block_padding() {
        let props = TextureFormat::Pvrtc4BppRgba.properties();
        // A 4x4 surface is a single block but PVRTC pads to 2x2 blocks.
        assert_eq!(props.bytes_per_row(4), 2 * 8);
        assert_eq!(props.bytes_per_layer(4, 4, 1), 2 * 2 * 8);
    }

    #[test]
    fn bytes_per_range_sums_mip_chain() {
        let props = TextureFormat::Astc4x4Unorm.properties();
        let mut range = TextureRange::new_2d(0, 0, 8, 8);
        range.num_mip_levels = 2;
        // Mip 0: 2x2 blocks, mip 1 (4x4 texels): 1 block.
        assert_eq!(props.bytes_per_range(range), 4 * 16 + 16);
    }

    #[test]
    fn bytes_per_range_multiplies_layers() {
        let props = TextureFormat::Rgba8Unorm.properties();
        let range = TextureRange::new_2d_array(0, 0, 4, 4, 0, 6);
        assert_eq!(props.bytes_per_range(range), 64 * 6);
    }

    #[test]
    fn mip_dimensions_floor_at_one() {
        let range = TextureRange::new_3d(0, 0, 0, 8, 2, 1);
        let mip = range.at_mip_level(3);
        assert_eq!((mip.width, mip.height, mip.depth), (1, 1, 1));
        assert_eq!(mip.num_mip_levels, 1);

        // Requesting a lower mip returns the range unchanged.
        assert_eq!(range.at_mip_level(0), range);
    }

    #[test]
    fn depth_stencil_classification() {
        assert!(TextureFormat::Depth24UnormStencil8.properties().is_depth());
        assert!(TextureFormat::Depth24UnormStencil8.properties().is_stencil());
        assert!(TextureFormat::Depth32Float.properties().is_depth_or_stencil());
        assert!(!TextureFormat::Depth32Float.properties().is_stencil());
        assert!(TextureFormat::Stencil8.properties().is_depth_or_stencil());
        assert!(!TextureFormat::Rgba8Unorm.properties().is_depth_or_stencil());
        assert!(TextureFormat::Rgba8UnormSrgb.properties().is_srgb());
    }
}
