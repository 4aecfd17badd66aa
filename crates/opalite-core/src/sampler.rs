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

//! Sampler state descriptors.

use crate::pipeline::CompareOp;

/// Filtering applied when minifying or magnifying a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplerMinMagFilter {
    /// Nearest-texel filtering.
    #[default]
    Nearest,
    /// Linear interpolation between texels.
    Linear,
}

/// Filtering applied between mip levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplerMipFilter {
    /// Mipmapping disabled.
    #[default]
    Disabled,
    /// Sample the nearest mip level.
    Nearest,
    /// Interpolate between mip levels.
    Linear,
}

/// How texture coordinates outside `[0, 1]` are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplerAddressMode {
    /// Tile the texture.
    #[default]
    Repeat,
    /// Clamp to the edge texel.
    Clamp,
    /// Tile with every other repetition mirrored.
    MirrorRepeat,
}

/// Describes a sampler state.
///
/// The descriptor is hashable so that backends can skip redundant native
/// sampler parameter updates when a texture already carries the same
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerDesc {
    /// Minification filter.
    pub min_filter: SamplerMinMagFilter,
    /// Magnification filter.
    pub mag_filter: SamplerMinMagFilter,
    /// Mip level filter.
    pub mip_filter: SamplerMipFilter,
    /// Lowest mip level to sample.
    pub mip_lod_min: i32,
    /// Highest mip level to sample.
    pub mip_lod_max: i32,
    /// Addressing along U.
    pub address_mode_u: SamplerAddressMode,
    /// Addressing along V.
    pub address_mode_v: SamplerAddressMode,
    /// Addressing along W.
    pub address_mode_w: SamplerAddressMode,
    /// Whether depth comparison sampling is enabled.
    pub depth_compare_enabled: bool,
    /// Comparison function used when depth comparison is enabled.
    pub depth_compare_op: CompareOp,
}

impl Default for SamplerDesc {
    fn default() -> Self {
        Self {
            min_filter: SamplerMinMagFilter::Nearest,
            mag_filter: SamplerMinMagFilter::Nearest,
            mip_filter: SamplerMipFilter::Disabled,
            mip_lod_min: 0,
            mip_lod_max: 1000,
            address_mode_u: SamplerAddressMode::Repeat,
            address_mode_v: SamplerAddressMode::Repeat,
            address_mode_w: SamplerAddressMode::Repeat,
            depth_compare_enabled: false,
            depth_compare_op: CompareOp::LessOrEqual,
        }
    }
}

impl SamplerDesc {
    /// A linearly filtered sampler with mipmapping disabled.
    pub fn linear() -> Self {
        Self {
            min_filter: SamplerMinMagFilter::Linear,
            mag_filter: SamplerMinMagFilter::Linear,
            ..Self::default()
        }
    }
}
