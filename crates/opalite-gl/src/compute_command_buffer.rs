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

//! The compute command buffer.
//!
//! Mirrors the graphics command buffer's dirty-tracking model for dispatch:
//! binds land in caches, a dispatch resolves buffer units, the pipeline,
//! uniform buffers, image units, then sampled texture units, and finally
//! issues the work plus the memory barriers later reads need.

use std::rc::Rc;

use opalite_core::common::{
    ImageAccess, MAX_TEXTURE_SAMPLERS, MAX_UNIFORM_BUFFERS, MAX_VERTEX_BUFFERS,
};

use crate::buffer::{Buffer, BufferKind};
use crate::compute_pipeline::ComputePipeline;
use crate::context::Context;
use crate::gl;
use crate::sampler::SamplerState;
use crate::texture::Texture;
use crate::uniform_binder::UniformBinder;

#[derive(Clone)]
struct ImageBinding {
    texture: Rc<Texture>,
    access: ImageAccess,
    mip_level: usize,
    layer: usize,
}

#[derive(Default, Clone)]
struct TextureSlot {
    texture: Option<Rc<Texture>>,
    sampler: Option<Rc<SamplerState>>,
}

/// Records compute work between `begin` and `end`.
pub struct ComputeCommandBuffer {
    ctx: Rc<Context>,
    uniform_binder: UniformBinder,
    pipeline: Option<Rc<ComputePipeline>>,
    pipeline_dirty: bool,
    buffer_units: [Option<Rc<Buffer>>; MAX_VERTEX_BUFFERS],
    dirty_buffers: u32,
    image_units: [Option<ImageBinding>; MAX_TEXTURE_SAMPLERS],
    dirty_images: u32,
    texture_units: [TextureSlot; MAX_TEXTURE_SAMPLERS],
    dirty_textures: u32,
    recording: bool,
}

impl ComputeCommandBuffer {
    /// Creates an empty command buffer.
    pub fn new(ctx: Rc<Context>) -> Self {
        Self {
            ctx,
            uniform_binder: UniformBinder::new(),
            pipeline: None,
            pipeline_dirty: false,
            buffer_units: Default::default(),
            dirty_buffers: 0,
            image_units: Default::default(),
            dirty_images: 0,
            texture_units: Default::default(),
            dirty_textures: 0,
            recording: false,
        }
    }

    /// Whether the buffer is open for recording.
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Opens the buffer for recording.
    pub fn begin(&mut self) {
        if self.recording {
            log::warn!("Compute command buffer is already recording.");
            return;
        }
        self.recording = true;
    }

    /// Closes the buffer and drops every cached binding.
    pub fn end(&mut self) {
        if !self.recording {
            log::warn!("Compute command buffer is not recording.");
            return;
        }
        self.pipeline = None;
        self.pipeline_dirty = false;
        self.buffer_units = Default::default();
        self.dirty_buffers = 0;
        self.image_units = Default::default();
        self.dirty_images = 0;
        self.texture_units = Default::default();
        self.dirty_textures = 0;
        self.uniform_binder.reset();
        self.recording = false;
    }

    /// Selects the pipeline used by subsequent dispatches.
    ///
    /// Re-binding the pipeline that is already current is free.
    pub fn bind_compute_pipeline(&mut self, pipeline: Rc<ComputePipeline>) {
        if !self.recording {
            log::warn!("Cannot bind a pipeline outside recording.");
            return;
        }
        if let Some(current) = &self.pipeline {
            if Rc::ptr_eq(current, &pipeline) {
                return;
            }
        }
        self.pipeline = Some(pipeline);
        self.pipeline_dirty = true;
    }

    /// Binds a buffer: storage buffers go to buffer unit `index`, uniform
    /// buffers to uniform binding point `index`.
    pub fn bind_buffer(&mut self, index: usize, buffer: Rc<Buffer>, offset: usize) {
        if !self.recording {
            log::warn!("Cannot bind a buffer outside recording.");
            return;
        }
        match buffer.kind() {
            BufferKind::Storage => {
                if index >= MAX_VERTEX_BUFFERS {
                    log::warn!("Storage buffer unit {index} out of range.");
                    return;
                }
                if offset != 0 {
                    log::warn!("Storage buffer offsets are not supported; binding whole buffer.");
                }
                self.buffer_units[index] = Some(buffer);
                self.dirty_buffers |= 1 << index;
            }
            BufferKind::Uniform => {
                if index >= MAX_UNIFORM_BUFFERS {
                    log::warn!("Uniform buffer unit {index} out of range.");
                    return;
                }
                self.uniform_binder.set_buffer(index, buffer, offset);
            }
            _ => log::warn!(
                "Buffer kind {:?} cannot be bound for compute.",
                buffer.kind()
            ),
        }
    }

    /// Binds one mip/layer of a texture as the image at `index`.
    pub fn bind_image(
        &mut self,
        index: usize,
        texture: Rc<Texture>,
        access: ImageAccess,
        mip_level: usize,
        layer: usize,
    ) {
        if !self.recording {
            log::warn!("Cannot bind an image outside recording.");
            return;
        }
        if index >= MAX_TEXTURE_SAMPLERS {
            log::warn!("Image unit {index} out of range.");
            return;
        }
        self.image_units[index] = Some(ImageBinding {
            texture,
            access,
            mip_level,
            layer,
        });
        self.dirty_images |= 1 << index;
    }

    /// Binds a texture for sampled reads at unit `index`.
    pub fn bind_texture(&mut self, index: usize, texture: Rc<Texture>) {
        if !self.recording {
            log::warn!("Cannot bind a texture outside recording.");
            return;
        }
        if index >= MAX_TEXTURE_SAMPLERS {
            log::warn!("Texture unit {index} out of range.");
            return;
        }
        self.texture_units[index].texture = Some(texture);
        self.dirty_textures |= 1 << index;
    }

    /// Binds a sampler state for the texture already bound at `index`.
    pub fn bind_sampler_state(&mut self, index: usize, sampler: Rc<SamplerState>) {
        if !self.recording {
            log::warn!("Cannot bind a sampler outside recording.");
            return;
        }
        if index >= MAX_TEXTURE_SAMPLERS {
            log::warn!("Sampler unit {index} out of range.");
            return;
        }
        if self.texture_units[index].texture.is_none() {
            log::warn!("No texture bound at unit {index}; sampler ignored.");
            return;
        }
        self.texture_units[index].sampler = Some(sampler);
        self.dirty_textures |= 1 << index;
    }

    /// Resolves dirty state, dispatches `x * y * z` workgroups, and inserts
    /// barriers covering the pipeline's writes.
    pub fn dispatch(&mut self, x: u32, y: u32, z: u32) {
        if !self.recording {
            log::warn!("Cannot dispatch outside recording.");
            return;
        }
        let Some(pipeline) = self.pipeline.clone() else {
            log::warn!("Cannot dispatch without a compute pipeline.");
            return;
        };

        for index in 0..MAX_VERTEX_BUFFERS {
            if self.dirty_buffers & (1 << index) == 0 {
                continue;
            }
            if let Some(buffer) = &self.buffer_units[index] {
                pipeline.bind_buffer(index, buffer);
            }
            self.dirty_buffers &= !(1 << index);
        }

        if self.pipeline_dirty {
            pipeline.bind();
            self.pipeline_dirty = false;
        }

        self.uniform_binder.bind_buffers();

        for index in 0..MAX_TEXTURE_SAMPLERS {
            if self.dirty_images & (1 << index) != 0 {
                if let Some(binding) = &self.image_units[index] {
                    pipeline.bind_image_unit(
                        index,
                        &binding.texture,
                        binding.access,
                        binding.mip_level,
                        binding.layer,
                    );
                }
                self.dirty_images &= !(1 << index);
            }

            if self.dirty_textures & (1 << index) != 0 {
                let slot = &self.texture_units[index];
                if let Some(texture) = &slot.texture {
                    let location = pipeline.texture_unit_location(index);
                    if location >= 0 {
                        self.ctx.uniform_1_i32(location, index as i32);
                        self.ctx.active_texture(gl::TEXTURE0 + index as u32);
                        texture.bind();
                        if let Some(sampler) = &slot.sampler {
                            sampler.bind(texture);
                        }
                    } else {
                        log::warn!("No sampler uniform resolved for texture unit {index}.");
                    }
                }
                self.dirty_textures &= !(1 << index);
            }
        }

        self.ctx.dispatch_compute(x, y, z);

        self.ctx
            .memory_barrier(gl::TEXTURE_FETCH_BARRIER_BIT | gl::SHADER_IMAGE_ACCESS_BARRIER_BIT);
        if pipeline.uses_storage_buffers() {
            self.ctx.memory_barrier(
                gl::VERTEX_ATTRIB_ARRAY_BARRIER_BIT
                    | gl::ELEMENT_ARRAY_BARRIER_BIT
                    | gl::SHADER_STORAGE_BARRIER_BIT
                    | gl::BUFFER_UPDATE_BARRIER_BIT,
            );
        }
    }
}
