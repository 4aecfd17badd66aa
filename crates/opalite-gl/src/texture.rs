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

//! Native texture and renderbuffer resources.
//!
//! A texture that is only ever a framebuffer attachment is backed by a
//! renderbuffer; everything else gets an immutable-storage texture object.
//! The backing is a closed enum, so attachment code can match on it without
//! a fallthrough case.

use std::cell::Cell;
use std::rc::Rc;

use opalite_core::error::TextureError;
use opalite_core::format::{FormatProperties, TextureFormat, TextureRange};
use opalite_core::texture::{TextureCubeFace, TextureDesc, TextureType, TextureUsage};

use crate::context::Context;
use crate::gl;

/// The native layout of a texture format: sized internal format plus the
/// pixel transfer format and type used for uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescGl {
    /// Sized internal format.
    pub internal: u32,
    /// Pixel transfer format (unused for compressed formats).
    pub format: u32,
    /// Pixel transfer type (unused for compressed formats).
    pub data_type: u32,
}

impl FormatDescGl {
    const fn new(internal: u32, format: u32, data_type: u32) -> Self {
        Self { internal, format, data_type }
    }

    const fn compressed(internal: u32) -> Self {
        Self { internal, format: 0, data_type: 0 }
    }
}

/// Resolves a format to its native layout, or `None` when the driver has no
/// representation for it (packed 16-bit color and PVRTC, notably).
pub fn format_desc_gl(format: TextureFormat) -> Option<FormatDescGl> {
    use TextureFormat::*;
    let desc = match format {
        Invalid | B5G5R5A1Unorm | B5G6R5Unorm | Abgr4Unorm | Pvrtc2BppRgb | Pvrtc2BppRgba
        | Pvrtc4BppRgb | Pvrtc4BppRgba => return None,

        A8Unorm | R8Unorm => FormatDescGl::new(gl::R8, gl::RED, gl::UNSIGNED_BYTE),
        R16Float => FormatDescGl::new(gl::R16F, gl::RED, gl::HALF_FLOAT),
        R16Uint => FormatDescGl::new(gl::R16UI, gl::RED_INTEGER, gl::UNSIGNED_SHORT),
        R16Unorm => FormatDescGl::new(gl::R16, gl::RED, gl::UNSIGNED_SHORT),
        Rg8Unorm => FormatDescGl::new(gl::RG8, gl::RG, gl::UNSIGNED_BYTE),

        Rgba8Unorm => FormatDescGl::new(gl::RGBA8, gl::RGBA, gl::UNSIGNED_BYTE),
        Bgra8Unorm => FormatDescGl::new(gl::RGBA8, gl::BGRA, gl::UNSIGNED_BYTE),
        Rgba8UnormSrgb => FormatDescGl::new(gl::SRGB8_ALPHA8, gl::RGBA, gl::UNSIGNED_BYTE),
        Bgra8UnormSrgb => FormatDescGl::new(gl::SRGB8_ALPHA8, gl::BGRA, gl::UNSIGNED_BYTE),
        Rg16Float => FormatDescGl::new(gl::RG16F, gl::RG, gl::HALF_FLOAT),
        Rg16Uint => FormatDescGl::new(gl::RG16UI, gl::RG_INTEGER, gl::UNSIGNED_SHORT),
        Rg16Unorm => FormatDescGl::new(gl::RG16, gl::RG, gl::UNSIGNED_SHORT),
        Rgb10A2Unorm => {
            FormatDescGl::new(gl::RGB10_A2, gl::RGBA, gl::UNSIGNED_INT_2_10_10_10_REV)
        }
        R32Float => FormatDescGl::new(gl::R32F, gl::RED, gl::FLOAT),
        Rgba16Float => FormatDescGl::new(gl::RGBA16F, gl::RGBA, gl::HALF_FLOAT),
        Rgba32Uint => FormatDescGl::new(gl::RGBA32UI, gl::RGBA_INTEGER, gl::UNSIGNED_INT),
        Rgba32Float => FormatDescGl::new(gl::RGBA32F, gl::RGBA, gl::FLOAT),

        Astc4x4Unorm | Astc5x4Unorm | Astc5x5Unorm | Astc6x5Unorm | Astc6x6Unorm
        | Astc8x5Unorm | Astc8x6Unorm | Astc8x8Unorm | Astc10x5Unorm | Astc10x6Unorm
        | Astc10x8Unorm | Astc10x10Unorm | Astc12x10Unorm | Astc12x12Unorm => {
            FormatDescGl::compressed(gl::COMPRESSED_RGBA_ASTC_4X4 + astc_index(format))
        }
        Astc4x4Srgb | Astc5x4Srgb | Astc5x5Srgb | Astc6x5Srgb | Astc6x6Srgb | Astc8x5Srgb
        | Astc8x6Srgb | Astc8x8Srgb | Astc10x5Srgb | Astc10x6Srgb | Astc10x8Srgb
        | Astc10x10Srgb | Astc12x10Srgb | Astc12x12Srgb => {
            FormatDescGl::compressed(gl::COMPRESSED_SRGB8_ALPHA8_ASTC_4X4 + astc_index(format))
        }

        Etc2Rgb8 => FormatDescGl::compressed(gl::COMPRESSED_RGB8_ETC2),
        Etc2Rgb8Srgb => FormatDescGl::compressed(gl::COMPRESSED_SRGB8_ETC2),
        Etc2Rgb8A1 => FormatDescGl::compressed(gl::COMPRESSED_RGB8_PUNCHTHROUGH_ALPHA1_ETC2),
        Etc2Rgb8A1Srgb => {
            FormatDescGl::compressed(gl::COMPRESSED_SRGB8_PUNCHTHROUGH_ALPHA1_ETC2)
        }
        Etc2Rgba8 => FormatDescGl::compressed(gl::COMPRESSED_RGBA8_ETC2_EAC),
        Etc2Rgba8Srgb => FormatDescGl::compressed(gl::COMPRESSED_SRGB8_ALPHA8_ETC2_EAC),
        EacR11Unorm => FormatDescGl::compressed(gl::COMPRESSED_R11_EAC),
        EacR11Snorm => FormatDescGl::compressed(gl::COMPRESSED_SIGNED_R11_EAC),
        EacRg11Unorm => FormatDescGl::compressed(gl::COMPRESSED_RG11_EAC),
        EacRg11Snorm => FormatDescGl::compressed(gl::COMPRESSED_SIGNED_RG11_EAC),
        Bc7Unorm => FormatDescGl::compressed(gl::COMPRESSED_RGBA_BPTC_UNORM),

        Depth16Unorm => {
            FormatDescGl::new(gl::DEPTH_COMPONENT16, gl::DEPTH_COMPONENT, gl::UNSIGNED_SHORT)
        }
        Depth24Unorm => {
            FormatDescGl::new(gl::DEPTH_COMPONENT24, gl::DEPTH_COMPONENT, gl::UNSIGNED_INT)
        }
        Depth32Float => FormatDescGl::new(gl::DEPTH_COMPONENT32F, gl::DEPTH_COMPONENT, gl::FLOAT),
        Depth24UnormStencil8 => {
            FormatDescGl::new(gl::DEPTH24_STENCIL8, gl::DEPTH_STENCIL, gl::UNSIGNED_INT_24_8)
        }
        Depth32FloatStencil8 => FormatDescGl::new(
            gl::DEPTH32F_STENCIL8,
            gl::DEPTH_STENCIL,
            gl::FLOAT_32_UNSIGNED_INT_24_8_REV,
        ),
        Stencil8 => FormatDescGl::new(gl::STENCIL_INDEX8, gl::STENCIL_INDEX, gl::UNSIGNED_BYTE),
    };
    Some(desc)
}

/// The offset of an ASTC block size within the native enum run, which lists
/// the block sizes in a fixed order shared by the LDR and sRGB ranges.
fn astc_index(format: TextureFormat) -> u32 {
    use TextureFormat::*;
    match format {
        Astc4x4Unorm | Astc4x4Srgb => 0,
        Astc5x4Unorm | Astc5x4Srgb => 1,
        Astc5x5Unorm | Astc5x5Srgb => 2,
        Astc6x5Unorm | Astc6x5Srgb => 3,
        Astc6x6Unorm | Astc6x6Srgb => 4,
        Astc8x5Unorm | Astc8x5Srgb => 5,
        Astc8x6Unorm | Astc8x6Srgb => 6,
        Astc8x8Unorm | Astc8x8Srgb => 7,
        Astc10x5Unorm | Astc10x5Srgb => 8,
        Astc10x6Unorm | Astc10x6Srgb => 9,
        Astc10x8Unorm | Astc10x8Srgb => 10,
        Astc10x10Unorm | Astc10x10Srgb => 11,
        Astc12x10Unorm | Astc12x10Srgb => 12,
        _ => 13,
    }
}

/// The native object backing a texture resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureBacking {
    /// A texture object with a native target.
    Texture {
        /// Native handle.
        handle: u32,
        /// Native texture target.
        target: u32,
    },
    /// A renderbuffer object.
    Renderbuffer {
        /// Native handle.
        handle: u32,
    },
}

/// Sentinel meaning "no sampler parameters applied yet".
const NO_SAMPLER: u64 = u64::MAX;

/// A texture resource.
#[derive(Debug)]
pub struct Texture {
    ctx: Rc<Context>,
    desc: TextureDesc,
    props: FormatProperties,
    gl_desc: FormatDescGl,
    backing: TextureBacking,
    // Hash of the sampler parameters last applied to this texture object.
    sampler_hash: Cell<u64>,
}

impl Texture {
    /// Creates a texture with immutable storage for its full mip chain.
    pub fn new(ctx: Rc<Context>, desc: &TextureDesc) -> Result<Self, TextureError> {
        if desc.texture_type == TextureType::Invalid {
            return Err(TextureError::InvalidType);
        }
        let gl_desc =
            format_desc_gl(desc.format).ok_or(TextureError::UnsupportedFormat(desc.format))?;
        let props = desc.format.properties();

        let attachment_only = desc.usage.contains(TextureUsage::ATTACHMENT)
            && !desc.usage.contains(TextureUsage::SAMPLED)
            && !desc.usage.contains(TextureUsage::STORAGE);
        let backing = if attachment_only && desc.texture_type == TextureType::Two {
            let handle = ctx.create_renderbuffer();
            ctx.bind_renderbuffer(gl::RENDERBUFFER, handle);
            if desc.num_samples > 1 {
                ctx.renderbuffer_storage_multisample(
                    gl::RENDERBUFFER,
                    desc.num_samples as i32,
                    gl_desc.internal,
                    desc.width as i32,
                    desc.height as i32,
                );
            } else {
                ctx.renderbuffer_storage(
                    gl::RENDERBUFFER,
                    gl_desc.internal,
                    desc.width as i32,
                    desc.height as i32,
                );
            }
            ctx.bind_renderbuffer(gl::RENDERBUFFER, 0);
            TextureBacking::Renderbuffer { handle }
        } else {
            let target = native_target(desc);
            let handle = ctx.create_texture();
            ctx.bind_texture(target, handle);
            if desc.num_samples == 1 {
                ctx.tex_parameter_i32(
                    target,
                    gl::TEXTURE_MAX_LEVEL,
                    desc.num_mip_levels as i32 - 1,
                );
            }
            match desc.texture_type {
                TextureType::TwoArray => ctx.tex_storage_3d(
                    target,
                    desc.num_mip_levels as i32,
                    gl_desc.internal,
                    desc.width as i32,
                    desc.height as i32,
                    desc.num_layers as i32,
                ),
                TextureType::Three => ctx.tex_storage_3d(
                    target,
                    desc.num_mip_levels as i32,
                    gl_desc.internal,
                    desc.width as i32,
                    desc.height as i32,
                    desc.depth as i32,
                ),
                _ => ctx.tex_storage_2d(
                    target,
                    desc.num_mip_levels as i32,
                    gl_desc.internal,
                    desc.width as i32,
                    desc.height as i32,
                ),
            }
            ctx.bind_texture(target, 0);
            TextureBacking::Texture { handle, target }
        };

        Ok(Self {
            ctx,
            desc: *desc,
            props,
            gl_desc,
            backing,
            sampler_hash: Cell::new(NO_SAMPLER),
        })
    }

    /// The descriptor the texture was created from.
    pub fn desc(&self) -> &TextureDesc {
        &self.desc
    }

    /// The format's constant layout record.
    pub fn properties(&self) -> &FormatProperties {
        &self.props
    }

    /// The native format layout.
    pub fn gl_desc(&self) -> FormatDescGl {
        self.gl_desc
    }

    /// The native object backing the texture.
    pub fn backing(&self) -> TextureBacking {
        self.backing
    }

    /// Whether the texture is backed by a renderbuffer.
    pub fn is_renderbuffer(&self) -> bool {
        matches!(self.backing, TextureBacking::Renderbuffer { .. })
    }

    /// The native texture target, or `None` for renderbuffers.
    pub fn target(&self) -> Option<u32> {
        match self.backing {
            TextureBacking::Texture { target, .. } => Some(target),
            TextureBacking::Renderbuffer { .. } => None,
        }
    }

    /// The native handle of whichever object backs the texture.
    pub fn handle(&self) -> u32 {
        match self.backing {
            TextureBacking::Texture { handle, .. } => handle,
            TextureBacking::Renderbuffer { handle } => handle,
        }
    }

    /// Whether either extent is not a power of two.
    pub fn is_npot(&self) -> bool {
        !self.desc.width.is_power_of_two() || !self.desc.height.is_power_of_two()
    }

    /// Hash of the sampler parameters last applied, or `u64::MAX` if none.
    pub(crate) fn sampler_hash(&self) -> u64 {
        self.sampler_hash.get()
    }

    pub(crate) fn set_sampler_hash(&self, hash: u64) {
        self.sampler_hash.set(hash);
    }

    /// Makes the texture current on its native target.
    ///
    /// Renderbuffer-backed textures cannot be bound for sampling; the call
    /// degrades to a warning.
    pub fn bind(&self) {
        match self.backing {
            TextureBacking::Texture { handle, target } => self.ctx.bind_texture(target, handle),
            TextureBacking::Renderbuffer { .. } => {
                log::warn!("Cannot bind a renderbuffer-backed texture for sampling.");
            }
        }
    }

    /// Uploads texel data covering `range` at its mip level.
    pub fn upload(&self, data: &[u8], range: TextureRange) {
        let TextureBacking::Texture { handle, target } = self.backing else {
            log::warn!("Cannot upload to a renderbuffer-backed texture.");
            return;
        };
        if self.desc.texture_type == TextureType::Cube {
            log::warn!("Cube texture uploads go through upload_cube.");
            return;
        }
        self.ctx.bind_texture(target, handle);
        self.ctx.pixel_store_i32(gl::UNPACK_ALIGNMENT, 1);
        self.upload_to_target(target, data, range);
        self.ctx.pixel_store_i32(gl::UNPACK_ALIGNMENT, 4);
        self.ctx.bind_texture(target, 0);
    }

    /// Uploads texel data for one cube face.
    pub fn upload_cube(&self, face: TextureCubeFace, data: &[u8], range: TextureRange) {
        let TextureBacking::Texture { handle, target } = self.backing else {
            log::warn!("Cannot upload to a renderbuffer-backed texture.");
            return;
        };
        if self.desc.texture_type != TextureType::Cube {
            log::warn!("upload_cube requires a cube texture.");
            return;
        }
        let face_target = gl::TEXTURE_CUBE_MAP_POSITIVE_X + face.index() as u32;
        self.ctx.bind_texture(target, handle);
        self.ctx.pixel_store_i32(gl::UNPACK_ALIGNMENT, 1);
        self.upload_to_target(face_target, data, range);
        self.ctx.pixel_store_i32(gl::UNPACK_ALIGNMENT, 4);
        self.ctx.bind_texture(target, 0);
    }

    fn upload_to_target(&self, target: u32, data: &[u8], range: TextureRange) {
        let level = range.mip_level as i32;
        let volumetric = matches!(
            self.desc.texture_type,
            TextureType::TwoArray | TextureType::Three
        );
        // Array textures address layers through the depth dimension.
        let (z, depth) = if self.desc.texture_type == TextureType::TwoArray {
            (range.layer as i32, range.num_layers as i32)
        } else {
            (range.z as i32, range.depth as i32)
        };
        if self.props.is_compressed() {
            if volumetric {
                self.ctx.compressed_tex_sub_image_3d(
                    target,
                    level,
                    range.x as i32,
                    range.y as i32,
                    z,
                    range.width as i32,
                    range.height as i32,
                    depth,
                    self.gl_desc.internal,
                    data,
                );
            } else {
                self.ctx.compressed_tex_sub_image_2d(
                    target,
                    level,
                    range.x as i32,
                    range.y as i32,
                    range.width as i32,
                    range.height as i32,
                    self.gl_desc.internal,
                    data,
                );
            }
        } else if volumetric {
            self.ctx.tex_sub_image_3d(
                target,
                level,
                range.x as i32,
                range.y as i32,
                z,
                range.width as i32,
                range.height as i32,
                depth,
                self.gl_desc.format,
                self.gl_desc.data_type,
                data,
            );
        } else {
            self.ctx.tex_sub_image_2d(
                target,
                level,
                range.x as i32,
                range.y as i32,
                range.width as i32,
                range.height as i32,
                self.gl_desc.format,
                self.gl_desc.data_type,
                data,
            );
        }
    }

    /// Regenerates the mip chain from level 0.
    pub fn generate_mipmaps(&self) {
        let TextureBacking::Texture { handle, target } = self.backing else {
            log::warn!("Cannot generate mipmaps for a renderbuffer-backed texture.");
            return;
        };
        self.ctx.bind_texture(target, handle);
        self.ctx.generate_mipmap(target);
        self.ctx.bind_texture(target, 0);
    }

    /// Binds one mip/layer as a shader storage image.
    pub fn bind_image(&self, unit: u32, access: u32, mip_level: usize, layer: usize) {
        let TextureBacking::Texture { handle, .. } = self.backing else {
            log::warn!("Cannot bind a renderbuffer-backed texture as an image.");
            return;
        };
        self.ctx.bind_image_texture(
            unit,
            handle,
            mip_level as i32,
            false,
            layer as i32,
            access,
            self.gl_desc.internal,
        );
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        match self.backing {
            TextureBacking::Texture { handle, .. } => self.ctx.delete_texture(handle),
            TextureBacking::Renderbuffer { handle } => self.ctx.delete_renderbuffer(handle),
        }
    }
}

fn native_target(desc: &TextureDesc) -> u32 {
    match desc.texture_type {
        TextureType::TwoArray => {
            if desc.num_samples > 1 {
                gl::TEXTURE_2D_MULTISAMPLE_ARRAY
            } else {
                gl::TEXTURE_2D_ARRAY
            }
        }
        TextureType::Three => gl::TEXTURE_3D,
        TextureType::Cube => gl::TEXTURE_CUBE_MAP,
        _ => {
            if desc.num_samples > 1 {
                gl::TEXTURE_2D_MULTISAMPLE
            } else {
                gl::TEXTURE_2D
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingApi;

    fn make(api: &RecordingApi, desc: &TextureDesc) -> Texture {
        let ctx = Context::new(Box::new(api.clone()));
        Texture::new(ctx, desc).unwrap()
    }

    #[test]
    fn attachment_only_2d_uses_a_renderbuffer() {
        let api = RecordingApi::new();
        let desc = TextureDesc::new_2d(TextureFormat::Rgba8Unorm, 64, 64, TextureUsage::ATTACHMENT);
        let texture = make(&api, &desc);
        assert!(texture.is_renderbuffer());
        assert!(api.calls().iter().any(|c| c.starts_with("renderbuffer_storage(")));
    }

    #[test]
    fn sampled_attachment_uses_a_texture_object() {
        let api = RecordingApi::new();
        let desc = TextureDesc::new_2d(
            TextureFormat::Rgba8Unorm,
            64,
            64,
            TextureUsage::ATTACHMENT | TextureUsage::SAMPLED,
        );
        let texture = make(&api, &desc);
        assert!(!texture.is_renderbuffer());
        assert_eq!(texture.target(), Some(gl::TEXTURE_2D));
        assert!(api.calls().iter().any(|c| c.starts_with("tex_storage_2d")));
    }

    #[test]
    fn invalid_type_and_unsupported_format_fail_construction() {
        let api = RecordingApi::new();
        let ctx = Context::new(Box::new(api.clone()));
        let mut desc = TextureDesc::new_2d(TextureFormat::Rgba8Unorm, 4, 4, TextureUsage::SAMPLED);
        desc.texture_type = TextureType::Invalid;
        assert!(matches!(
            Texture::new(ctx.clone(), &desc),
            Err(TextureError::InvalidType)
        ));

        let desc = TextureDesc::new_2d(TextureFormat::Pvrtc4BppRgba, 4, 4, TextureUsage::SAMPLED);
        assert!(matches!(
            Texture::new(ctx, &desc),
            Err(TextureError::UnsupportedFormat(TextureFormat::Pvrtc4BppRgba))
        ));
    }

    #[test]
    fn array_layers_upload_through_the_depth_dimension() {
        let api = RecordingApi::new();
        let desc = TextureDesc::new_2d_array(TextureFormat::R8Unorm, 8, 8, 4, TextureUsage::SAMPLED);
        let texture = make(&api, &desc);
        api.clear();
        let range = TextureRange::new_2d_array(0, 0, 8, 8, 2, 1);
        texture.upload(&[0u8; 64], range);
        let calls = api.calls();
        let sub = calls
            .iter()
            .find(|c| c.starts_with("tex_sub_image_3d"))
            .unwrap();
        // z = layer 2, depth = 1 layer.
        assert!(sub.contains("z: 2"), "{sub}");
        assert!(sub.contains("depth: 1"), "{sub}");
    }

    #[test]
    fn compressed_uploads_take_the_compressed_path() {
        let api = RecordingApi::new();
        let desc = TextureDesc::new_2d(TextureFormat::Etc2Rgb8, 8, 8, TextureUsage::SAMPLED);
        let texture = make(&api, &desc);
        api.clear();
        texture.upload(&[0u8; 32], TextureRange::new_2d(0, 0, 8, 8));
        assert!(api
            .calls()
            .iter()
            .any(|c| c.starts_with("compressed_tex_sub_image_2d")));
    }

    #[test]
    fn cube_faces_map_to_consecutive_targets() {
        let api = RecordingApi::new();
        let desc = TextureDesc::new_cube(TextureFormat::Rgba8Unorm, 16, TextureUsage::SAMPLED);
        let texture = make(&api, &desc);
        api.clear();
        texture.upload_cube(
            TextureCubeFace::NegY,
            &[0u8; 16 * 16 * 4],
            TextureRange::new_2d(0, 0, 16, 16),
        );
        let calls = api.calls();
        let sub = calls
            .iter()
            .find(|c| c.starts_with("tex_sub_image_2d"))
            .unwrap();
        let face_target = gl::TEXTURE_CUBE_MAP_POSITIVE_X + 3;
        assert!(sub.contains(&format!("target: {face_target:#06x}")), "{sub}");
    }

    #[test]
    fn astc_variants_step_through_the_enum_run() {
        let desc = format_desc_gl(TextureFormat::Astc8x8Unorm).unwrap();
        assert_eq!(desc.internal, gl::COMPRESSED_RGBA_ASTC_4X4 + 7);
        let desc = format_desc_gl(TextureFormat::Astc12x12Srgb).unwrap();
        assert_eq!(desc.internal, gl::COMPRESSED_SRGB8_ALPHA8_ASTC_4X4 + 13);
    }
}
