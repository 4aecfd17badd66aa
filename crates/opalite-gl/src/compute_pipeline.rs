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

//! Immutable compute pipelines.
//!
//! Construction resolves the descriptor's buffer names to block bindings:
//! storage blocks and uniform blocks both get their binding point assigned
//! to the descriptor's unit number, so dispatch-time buffer binds reduce to
//! an indexed bind at that unit. Image and texture names resolve to uniform
//! locations through reflection, like graphics sampler units.

use std::rc::Rc;

use opalite_core::common::{ImageAccess, MAX_TEXTURE_SAMPLERS, MAX_VERTEX_BUFFERS};
use opalite_core::error::PipelineError;
use opalite_core::pipeline::ComputePipelineDesc;

use crate::buffer::Buffer;
use crate::context::Context;
use crate::conversions::IntoGl;
use crate::reflection::PipelineReflection;
use crate::shader::{ShaderStages, ShaderStagesKind};
use crate::texture::Texture;

const UNRESOLVED: i32 = -1;

/// An immutable compute pipeline with resolved unit tables.
#[derive(Debug)]
pub struct ComputePipeline {
    stages: Rc<ShaderStages>,
    image_unit_locations: [i32; MAX_TEXTURE_SAMPLERS],
    buffer_unit_resolved: [bool; MAX_VERTEX_BUFFERS],
    uses_storage_buffers: bool,
}

impl ComputePipeline {
    /// Builds a pipeline around linked compute stages.
    pub fn new(
        ctx: Rc<Context>,
        stages: Rc<ShaderStages>,
        desc: &ComputePipelineDesc,
    ) -> Result<Self, PipelineError> {
        if stages.kind() != ShaderStagesKind::Compute {
            return Err(PipelineError::WrongStageKind { expected: "compute" });
        }
        let program = stages.program();
        let reflection = PipelineReflection::new(&ctx, program);

        let mut image_unit_locations = [UNRESOLVED; MAX_TEXTURE_SAMPLERS];
        for (&unit, name) in &desc.images_map {
            if unit >= MAX_TEXTURE_SAMPLERS {
                log::warn!("Image unit {unit} for '{name}' is out of range.");
                continue;
            }
            match reflection.location(name) {
                Some(location) => image_unit_locations[unit] = location,
                None => log::warn!("Image uniform '{name}' not found in program."),
            }
        }

        let mut buffer_unit_resolved = [false; MAX_VERTEX_BUFFERS];
        let mut uses_storage_buffers = false;
        for (&unit, name) in &desc.buffers_map {
            if unit >= MAX_VERTEX_BUFFERS {
                log::warn!("Buffer unit {unit} for '{name}' is out of range.");
                continue;
            }
            if let Some(index) = ctx.shader_storage_block_index(program, name) {
                ctx.shader_storage_block_binding(program, index, unit as u32);
                buffer_unit_resolved[unit] = true;
                uses_storage_buffers = true;
            } else if let Some(index) = ctx.uniform_block_index(program, name) {
                ctx.uniform_block_binding(program, index, unit as u32);
                buffer_unit_resolved[unit] = true;
            } else {
                log::warn!("Buffer block '{name}' not found in program.");
            }
        }

        Ok(Self {
            stages,
            image_unit_locations,
            buffer_unit_resolved,
            uses_storage_buffers,
        })
    }

    /// The linked program stages.
    pub fn stages(&self) -> &Rc<ShaderStages> {
        &self.stages
    }

    /// Whether any buffer unit resolved to a storage block.
    pub fn uses_storage_buffers(&self) -> bool {
        self.uses_storage_buffers
    }

    /// Makes the program current.
    pub fn bind(&self) {
        self.stages.bind();
    }

    /// Clears the current program.
    pub fn unbind(&self) {
        self.stages.unbind();
    }

    /// Binds a buffer at its unit's block binding point.
    ///
    /// Ignored with a warning for units the descriptor never resolved.
    pub fn bind_buffer(&self, unit: usize, buffer: &Buffer) {
        if unit >= MAX_VERTEX_BUFFERS || !self.buffer_unit_resolved[unit] {
            log::warn!("No buffer block resolved for unit {unit}.");
            return;
        }
        buffer.bind_base(unit as u32);
    }

    /// Binds one mip/layer of a texture as the image at `unit`.
    pub fn bind_image_unit(
        &self,
        unit: usize,
        texture: &Texture,
        access: ImageAccess,
        mip_level: usize,
        layer: usize,
    ) {
        if unit >= MAX_TEXTURE_SAMPLERS || self.image_unit_locations[unit] == UNRESOLVED {
            log::warn!("No image uniform resolved for unit {unit}.");
            return;
        }
        texture.bind_image(unit as u32, access.into_gl(), mip_level, layer);
    }

    /// The uniform location routing sampled textures to `unit`, or -1.
    pub fn texture_unit_location(&self, unit: usize) -> i32 {
        if unit >= MAX_TEXTURE_SAMPLERS {
            return UNRESOLVED;
        }
        self.image_unit_locations[unit]
    }
}

#[cfg(test)]
mod tests {
    use opalite_core::buffer::BufferDesc;
    use opalite_core::common::ResourceStorage;

    use super::*;
    use crate::gl;
    use crate::shader::{ShaderModule, ShaderStage};
    use crate::testing::RecordingApi;

    fn compute_stages(ctx: &Rc<Context>) -> Rc<ShaderStages> {
        let module = ShaderModule::from_raw(3, ShaderStage::Compute);
        Rc::new(ShaderStages::new_compute(ctx.clone(), module, "test").unwrap())
    }

    #[test]
    fn graphics_stages_are_rejected() {
        let api = RecordingApi::new();
        let ctx = Context::new(Box::new(api.clone()));
        let modules = [
            ShaderModule::from_raw(1, ShaderStage::Vertex),
            ShaderModule::from_raw(2, ShaderStage::Fragment),
        ];
        let stages = Rc::new(ShaderStages::new_graphics(ctx.clone(), &modules, "test").unwrap());
        let err = ComputePipeline::new(ctx, stages, &ComputePipelineDesc::default()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::WrongStageKind { expected: "compute" }
        ));
    }

    #[test]
    fn storage_blocks_get_their_binding_assigned() {
        let api = RecordingApi::new();
        api.add_storage_block("Particles", 2);
        let ctx = Context::new(Box::new(api.clone()));
        let stages = compute_stages(&ctx);
        let mut desc = ComputePipelineDesc::default();
        desc.buffers_map.insert(3, "Particles".to_string());
        let pipeline = ComputePipeline::new(ctx.clone(), stages, &desc).unwrap();
        assert!(pipeline.uses_storage_buffers());
        assert!(api
            .calls()
            .iter()
            .any(|c| c == "shader_storage_block_binding(program: 1, block_index: 2, binding: 3)"));

        // Binding a buffer at the resolved unit is an indexed bind there.
        let buffer = Buffer::new(
            ctx,
            &BufferDesc::storage(64, ResourceStorage::Shared),
            None,
        )
        .unwrap();
        api.clear();
        pipeline.bind_buffer(3, &buffer);
        assert!(api.calls().iter().any(|c| c.starts_with(&format!(
            "bind_buffer_base(target: {:#06x}, index: 3",
            gl::SHADER_STORAGE_BUFFER
        ))));
    }

    #[test]
    fn uniform_blocks_resolve_without_marking_storage_use() {
        let api = RecordingApi::new();
        api.add_uniform_block("Globals", 0);
        let ctx = Context::new(Box::new(api.clone()));
        let stages = compute_stages(&ctx);
        let mut desc = ComputePipelineDesc::default();
        desc.buffers_map.insert(0, "Globals".to_string());
        let pipeline = ComputePipeline::new(ctx, stages, &desc).unwrap();
        assert!(!pipeline.uses_storage_buffers());
        assert!(api
            .calls()
            .iter()
            .any(|c| c == "uniform_block_binding(program: 1, block_index: 0, binding: 0)"));
    }

    #[test]
    fn unresolved_units_are_inert() {
        let api = RecordingApi::new();
        let ctx = Context::new(Box::new(api.clone()));
        let stages = compute_stages(&ctx);
        let mut desc = ComputePipelineDesc::default();
        desc.buffers_map.insert(0, "Nowhere".to_string());
        desc.images_map.insert(0, "u_missing".to_string());
        let pipeline = ComputePipeline::new(ctx.clone(), stages, &desc).unwrap();

        let buffer = Buffer::new(
            ctx,
            &BufferDesc::storage(64, ResourceStorage::Shared),
            None,
        )
        .unwrap();
        api.clear();
        pipeline.bind_buffer(0, &buffer);
        assert!(api.calls().is_empty());
        assert_eq!(pipeline.texture_unit_location(0), -1);
    }
}
