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

//! Sampler state applied through per-texture parameters.
//!
//! The driver has no separate sampler object in this backend's model;
//! sampler state is written into the bound texture object. Each texture
//! remembers the hash of the parameters last written to it, so re-binding
//! the same sampler is free.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use opalite_core::sampler::{SamplerDesc, SamplerMinMagFilter, SamplerMipFilter};
use opalite_core::texture::TextureType;

use crate::context::Context;
use crate::conversions::IntoGl;
use crate::gl;
use crate::texture::Texture;

/// An immutable sampler state with its native parameters precomputed.
#[derive(Debug)]
pub struct SamplerState {
    ctx: Rc<Context>,
    desc: SamplerDesc,
    hash: u64,
    min_filter: u32,
    mag_filter: u32,
    wrap_u: u32,
    wrap_v: u32,
    wrap_w: u32,
}

impl SamplerState {
    /// Creates a sampler state from a descriptor.
    pub fn new(ctx: Rc<Context>, desc: &SamplerDesc) -> Self {
        let mut hasher = DefaultHasher::new();
        desc.hash(&mut hasher);
        Self {
            ctx,
            desc: *desc,
            hash: hasher.finish(),
            min_filter: min_filter_gl(desc.min_filter, desc.mip_filter),
            mag_filter: mag_filter_gl(desc.mag_filter),
            wrap_u: desc.address_mode_u.into_gl(),
            wrap_v: desc.address_mode_v.into_gl(),
            wrap_w: desc.address_mode_w.into_gl(),
        }
    }

    /// The descriptor the sampler was created from.
    pub fn desc(&self) -> &SamplerDesc {
        &self.desc
    }

    /// Applies the sampler parameters to the currently bound `texture`.
    ///
    /// Skipped entirely when the texture already carries these parameters.
    pub fn bind(&self, texture: &Texture) {
        let Some(target) = texture.target() else {
            log::warn!("Cannot apply sampler parameters to a renderbuffer-backed texture.");
            return;
        };
        if texture.sampler_hash() == self.hash {
            return;
        }

        let (mut min_filter, mut mag_filter) = (self.min_filter, self.mag_filter);
        if texture.properties().is_depth_or_stencil() && !self.desc.depth_compare_enabled {
            // Depth data filters texel-exact unless comparison sampling
            // turns the fetch into a compare-and-filter.
            min_filter = if self.desc.mip_filter == SamplerMipFilter::Disabled {
                gl::NEAREST
            } else {
                gl::NEAREST_MIPMAP_NEAREST
            };
            mag_filter = gl::NEAREST;
        }

        let (wrap_u, wrap_v, wrap_w) = if texture.is_npot() {
            (gl::CLAMP_TO_EDGE, gl::CLAMP_TO_EDGE, gl::CLAMP_TO_EDGE)
        } else {
            (self.wrap_u, self.wrap_v, self.wrap_w)
        };

        self.ctx
            .tex_parameter_i32(target, gl::TEXTURE_MIN_FILTER, min_filter as i32);
        self.ctx
            .tex_parameter_i32(target, gl::TEXTURE_MAG_FILTER, mag_filter as i32);
        self.ctx
            .tex_parameter_i32(target, gl::TEXTURE_WRAP_S, wrap_u as i32);
        self.ctx
            .tex_parameter_i32(target, gl::TEXTURE_WRAP_T, wrap_v as i32);
        if matches!(
            texture.desc().texture_type,
            TextureType::TwoArray | TextureType::Three
        ) {
            self.ctx
                .tex_parameter_i32(target, gl::TEXTURE_WRAP_R, wrap_w as i32);
        }
        self.ctx
            .tex_parameter_i32(target, gl::TEXTURE_MIN_LOD, self.desc.mip_lod_min);
        self.ctx
            .tex_parameter_i32(target, gl::TEXTURE_MAX_LOD, self.desc.mip_lod_max);

        if self.desc.depth_compare_enabled {
            self.ctx.tex_parameter_i32(
                target,
                gl::TEXTURE_COMPARE_MODE,
                gl::COMPARE_REF_TO_TEXTURE as i32,
            );
            let func: u32 = self.desc.depth_compare_op.into_gl();
            self.ctx
                .tex_parameter_i32(target, gl::TEXTURE_COMPARE_FUNC, func as i32);
        } else {
            self.ctx
                .tex_parameter_i32(target, gl::TEXTURE_COMPARE_MODE, gl::NONE as i32);
        }

        texture.set_sampler_hash(self.hash);
    }
}

fn mag_filter_gl(filter: SamplerMinMagFilter) -> u32 {
    match filter {
        SamplerMinMagFilter::Nearest => gl::NEAREST,
        SamplerMinMagFilter::Linear => gl::LINEAR,
    }
}

fn min_filter_gl(filter: SamplerMinMagFilter, mip: SamplerMipFilter) -> u32 {
    match (filter, mip) {
        (SamplerMinMagFilter::Nearest, SamplerMipFilter::Disabled) => gl::NEAREST,
        (SamplerMinMagFilter::Linear, SamplerMipFilter::Disabled) => gl::LINEAR,
        (SamplerMinMagFilter::Nearest, SamplerMipFilter::Nearest) => gl::NEAREST_MIPMAP_NEAREST,
        (SamplerMinMagFilter::Linear, SamplerMipFilter::Nearest) => gl::LINEAR_MIPMAP_NEAREST,
        (SamplerMinMagFilter::Nearest, SamplerMipFilter::Linear) => gl::NEAREST_MIPMAP_LINEAR,
        (SamplerMinMagFilter::Linear, SamplerMipFilter::Linear) => gl::LINEAR_MIPMAP_LINEAR,
    }
}

#[cfg(test)]
mod tests {
    use opalite_core::format::TextureFormat;
    use opalite_core::texture::{TextureDesc, TextureUsage};

    use super::*;
    use crate::testing::RecordingApi;

    fn texture(api: &RecordingApi, desc: &TextureDesc) -> Texture {
        let ctx = Context::new(Box::new(api.clone()));
        Texture::new(ctx, desc).unwrap()
    }

    fn sampler(api: &RecordingApi, desc: &SamplerDesc) -> SamplerState {
        let ctx = Context::new(Box::new(api.clone()));
        SamplerState::new(ctx, desc)
    }

    #[test]
    fn rebinding_the_same_sampler_is_skipped() {
        let api = RecordingApi::new();
        let tex_desc =
            TextureDesc::new_2d(TextureFormat::Rgba8Unorm, 64, 64, TextureUsage::SAMPLED);
        let tex = texture(&api, &tex_desc);
        let state = sampler(&api, &SamplerDesc::linear());

        api.clear();
        state.bind(&tex);
        assert!(!api.calls().is_empty());

        api.clear();
        state.bind(&tex);
        assert!(api.calls().is_empty());

        // A different sampler with different parameters is applied again.
        let other = sampler(&api, &SamplerDesc::default());
        other.bind(&tex);
        assert!(!api.calls().is_empty());
    }

    #[test]
    fn depth_texture_without_compare_falls_back_to_nearest() {
        let api = RecordingApi::new();
        let tex_desc = TextureDesc::new_2d(
            TextureFormat::Depth32Float,
            64,
            64,
            TextureUsage::SAMPLED | TextureUsage::ATTACHMENT,
        );
        let tex = texture(&api, &tex_desc);
        let state = sampler(&api, &SamplerDesc::linear());
        api.clear();
        state.bind(&tex);
        let calls = api.calls();
        let min = calls
            .iter()
            .find(|c| c.contains(&format!("pname: {:#06x}", gl::TEXTURE_MIN_FILTER)))
            .unwrap();
        assert!(min.ends_with(&format!("value: {})", gl::NEAREST as i32)), "{min}");
    }

    #[test]
    fn npot_textures_clamp_to_edge() {
        let api = RecordingApi::new();
        let tex_desc =
            TextureDesc::new_2d(TextureFormat::Rgba8Unorm, 100, 64, TextureUsage::SAMPLED);
        let tex = texture(&api, &tex_desc);
        let state = sampler(&api, &SamplerDesc::default());
        api.clear();
        state.bind(&tex);
        let calls = api.calls();
        let wrap_s = calls
            .iter()
            .find(|c| c.contains(&format!("pname: {:#06x}", gl::TEXTURE_WRAP_S)))
            .unwrap();
        assert!(wrap_s.ends_with(&format!("value: {})", gl::CLAMP_TO_EDGE as i32)), "{wrap_s}");
    }

    #[test]
    fn wrap_r_is_only_set_for_volumetric_textures() {
        let api = RecordingApi::new();
        let flat = texture(
            &api,
            &TextureDesc::new_2d(TextureFormat::Rgba8Unorm, 64, 64, TextureUsage::SAMPLED),
        );
        let state = sampler(&api, &SamplerDesc::default());
        api.clear();
        state.bind(&flat);
        assert!(!api
            .calls()
            .iter()
            .any(|c| c.contains(&format!("pname: {:#06x}", gl::TEXTURE_WRAP_R))));

        let volume = texture(
            &api,
            &TextureDesc::new_3d(TextureFormat::Rgba8Unorm, 16, 16, 16, TextureUsage::SAMPLED),
        );
        api.clear();
        state.bind(&volume);
        assert!(api
            .calls()
            .iter()
            .any(|c| c.contains(&format!("pname: {:#06x}", gl::TEXTURE_WRAP_R))));
    }
}
