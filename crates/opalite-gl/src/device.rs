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

//! The resource factory.
//!
//! All resource construction goes through here, so a `Device` plus its
//! command pool is the whole public entry surface: descriptors in,
//! shareable resources (or construction errors) out.

use std::rc::Rc;

use opalite_core::buffer::BufferDesc;
use opalite_core::error::{BufferError, FramebufferError, PipelineError, ShaderError, TextureError};
use opalite_core::pipeline::{ComputePipelineDesc, DepthStencilDesc, GraphicsPipelineDesc};
use opalite_core::sampler::SamplerDesc;
use opalite_core::texture::TextureDesc;

use crate::buffer::Buffer;
use crate::command_pool::CommandPool;
use crate::compute_pipeline::ComputePipeline;
use crate::context::Context;
use crate::depth_stencil::DepthStencilState;
use crate::framebuffer::{Framebuffer, FramebufferDesc};
use crate::pipeline::GraphicsPipeline;
use crate::sampler::SamplerState;
use crate::shader::{ShaderModule, ShaderStages};
use crate::texture::Texture;

/// Creates resources against one context.
#[derive(Debug)]
pub struct Device {
    ctx: Rc<Context>,
}

impl Device {
    /// Wraps a context as a device.
    pub fn new(ctx: Rc<Context>) -> Self {
        Self { ctx }
    }

    /// The underlying context.
    pub fn context(&self) -> &Rc<Context> {
        &self.ctx
    }

    /// Creates a buffer, optionally filled with `data`.
    pub fn create_buffer(
        &self,
        desc: &BufferDesc,
        data: Option<&[u8]>,
    ) -> Result<Rc<Buffer>, BufferError> {
        Ok(Rc::new(Buffer::new(self.ctx.clone(), desc, data)?))
    }

    /// Creates a texture with storage allocated for every mip and layer.
    pub fn create_texture(&self, desc: &TextureDesc) -> Result<Rc<Texture>, TextureError> {
        Ok(Rc::new(Texture::new(self.ctx.clone(), desc)?))
    }

    /// Creates an immutable sampler state.
    pub fn create_sampler_state(&self, desc: &SamplerDesc) -> Rc<SamplerState> {
        Rc::new(SamplerState::new(self.ctx.clone(), desc))
    }

    /// Creates an immutable depth/stencil state.
    pub fn create_depth_stencil_state(&self, desc: &DepthStencilDesc) -> Rc<DepthStencilState> {
        Rc::new(DepthStencilState::new(self.ctx.clone(), desc))
    }

    /// Links precompiled graphics shader modules into one program.
    pub fn create_graphics_shader_stages(
        &self,
        modules: &[ShaderModule],
        label: &str,
    ) -> Result<Rc<ShaderStages>, ShaderError> {
        Ok(Rc::new(ShaderStages::new_graphics(
            self.ctx.clone(),
            modules,
            label,
        )?))
    }

    /// Links a precompiled compute shader module into a program.
    pub fn create_compute_shader_stages(
        &self,
        module: ShaderModule,
        label: &str,
    ) -> Result<Rc<ShaderStages>, ShaderError> {
        Ok(Rc::new(ShaderStages::new_compute(
            self.ctx.clone(),
            module,
            label,
        )?))
    }

    /// Creates a graphics pipeline, resolving its names up front.
    pub fn create_graphics_pipeline(
        &self,
        stages: Rc<ShaderStages>,
        desc: &GraphicsPipelineDesc,
    ) -> Result<Rc<GraphicsPipeline>, PipelineError> {
        Ok(Rc::new(GraphicsPipeline::new(
            self.ctx.clone(),
            stages,
            desc,
        )?))
    }

    /// Creates a compute pipeline, resolving its unit tables up front.
    pub fn create_compute_pipeline(
        &self,
        stages: Rc<ShaderStages>,
        desc: &ComputePipelineDesc,
    ) -> Result<Rc<ComputePipeline>, PipelineError> {
        Ok(Rc::new(ComputePipeline::new(self.ctx.clone(), stages, desc)?))
    }

    /// Creates and validates a framebuffer in one step.
    pub fn create_framebuffer(
        &self,
        desc: FramebufferDesc,
    ) -> Result<Rc<Framebuffer>, FramebufferError> {
        Ok(Rc::new(Framebuffer::new(self.ctx.clone(), desc)?))
    }

    /// Creates a command pool bound to this device's context.
    pub fn create_command_pool(&self) -> Rc<CommandPool> {
        Rc::new(CommandPool::new(self.ctx.clone()))
    }
}
