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

//! Immutable graphics pipelines.
//!
//! Construction resolves every name in the descriptor — sampler uniforms
//! and vertex attributes — to native locations through one reflection pass.
//! Names that the linked program does not expose resolve to an inert slot
//! that warns once at construction and silently skips binds afterwards.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use opalite_core::common::MAX_TEXTURE_SAMPLERS;
use opalite_core::error::PipelineError;
use opalite_core::pipeline::{CullMode, GraphicsPipelineDesc};

use crate::context::Context;
use crate::conversions::{GlVertexFormat, IntoGl};
use crate::gl;
use crate::reflection::PipelineReflection;
use crate::shader::{ShaderStages, ShaderStagesKind};

/// Location of a sampler uniform that the program does not expose.
const UNRESOLVED: i32 = -1;

#[derive(Debug, Clone, Copy)]
struct ResolvedAttribute {
    location: u32,
    format: GlVertexFormat,
    offset: usize,
}

#[derive(Debug, Clone, Default)]
struct BindingAttributes {
    stride: usize,
    attributes: Vec<ResolvedAttribute>,
}

/// An immutable graphics pipeline: linked program, resolved binding tables,
/// and captured fixed-function state.
#[derive(Debug)]
pub struct GraphicsPipeline {
    ctx: Rc<Context>,
    desc: GraphicsPipelineDesc,
    stages: Rc<ShaderStages>,
    vertex_texture_locations: [i32; MAX_TEXTURE_SAMPLERS],
    fragment_texture_locations: [i32; MAX_TEXTURE_SAMPLERS],
    bindings: BTreeMap<u32, BindingAttributes>,
    enabled_locations: RefCell<Vec<u32>>,
}

impl GraphicsPipeline {
    /// Builds a pipeline around linked graphics stages.
    pub fn new(
        ctx: Rc<Context>,
        stages: Rc<ShaderStages>,
        desc: &GraphicsPipelineDesc,
    ) -> Result<Self, PipelineError> {
        if stages.kind() != ShaderStagesKind::Graphics {
            return Err(PipelineError::WrongStageKind { expected: "graphics" });
        }
        let reflection = PipelineReflection::new(&ctx, stages.program());

        let vertex_texture_locations =
            resolve_sampler_units(&reflection, &desc.vertex_unit_sampler_map, "vertex");
        let fragment_texture_locations =
            resolve_sampler_units(&reflection, &desc.fragment_unit_sampler_map, "fragment");

        let mut bindings: BTreeMap<u32, BindingAttributes> = BTreeMap::new();
        for binding in &desc.vertex_input.bindings {
            bindings.insert(
                binding.binding,
                BindingAttributes {
                    stride: binding.stride,
                    attributes: Vec::new(),
                },
            );
        }
        for attribute in &desc.vertex_input.attributes {
            let location = attribute
                .location
                .or_else(|| reflection.attribute_location(&attribute.name));
            let Some(location) = location else {
                log::warn!(
                    "Vertex attribute '{}' not found in program; it will not be bound.",
                    attribute.name
                );
                continue;
            };
            let entry = bindings.entry(attribute.binding).or_default();
            entry.attributes.push(ResolvedAttribute {
                location,
                format: attribute.format.into_gl(),
                offset: attribute.offset,
            });
        }

        Ok(Self {
            ctx,
            desc: desc.clone(),
            stages,
            vertex_texture_locations,
            fragment_texture_locations,
            bindings,
            enabled_locations: RefCell::new(Vec::new()),
        })
    }

    /// The descriptor the pipeline was created from.
    pub fn desc(&self) -> &GraphicsPipelineDesc {
        &self.desc
    }

    /// The linked program stages.
    pub fn stages(&self) -> &Rc<ShaderStages> {
        &self.stages
    }

    /// Makes the pipeline current: program plus blend, cull, winding, and
    /// fill state.
    pub fn bind(&self) {
        self.stages.bind();

        let blend = self
            .desc
            .color_blend_attachments
            .first()
            .copied()
            .unwrap_or_default();
        if blend.blend_enabled {
            self.ctx.enable(gl::BLEND);
            self.ctx.blend_func_separate(
                blend.src_color_factor.into_gl(),
                blend.dst_color_factor.into_gl(),
                blend.src_alpha_factor.into_gl(),
                blend.dst_alpha_factor.into_gl(),
            );
            self.ctx
                .blend_equation_separate(blend.color_op.into_gl(), blend.alpha_op.into_gl());
        } else {
            self.ctx.disable(gl::BLEND);
        }

        match self.desc.rasterization.cull_mode {
            CullMode::None => self.ctx.disable(gl::CULL_FACE),
            CullMode::Front => {
                self.ctx.enable(gl::CULL_FACE);
                self.ctx.cull_face(gl::FRONT);
            }
            CullMode::Back => {
                self.ctx.enable(gl::CULL_FACE);
                self.ctx.cull_face(gl::BACK);
            }
        }
        self.ctx.front_face(self.desc.rasterization.winding.into_gl());
        self.ctx
            .polygon_mode(gl::FRONT_AND_BACK, self.desc.rasterization.fill_mode.into_gl());
    }

    /// Clears the current program.
    pub fn unbind(&self) {
        self.stages.unbind();
    }

    /// Routes a vertex-stage sampler uniform to `unit` and selects that
    /// texture unit. Returns `false` for units with no resolved uniform.
    pub fn bind_vertex_texture_unit(&self, unit: usize) -> bool {
        self.bind_texture_unit(&self.vertex_texture_locations, unit)
    }

    /// Routes a fragment-stage sampler uniform to `unit` and selects that
    /// texture unit. Returns `false` for units with no resolved uniform.
    pub fn bind_fragment_texture_unit(&self, unit: usize) -> bool {
        self.bind_texture_unit(&self.fragment_texture_locations, unit)
    }

    fn bind_texture_unit(&self, table: &[i32; MAX_TEXTURE_SAMPLERS], unit: usize) -> bool {
        if unit >= MAX_TEXTURE_SAMPLERS {
            return false;
        }
        let location = table[unit];
        if location == UNRESOLVED {
            return false;
        }
        self.ctx.uniform_1_i32(location, unit as i32);
        self.ctx.active_texture(gl::TEXTURE0 + unit as u32);
        true
    }

    /// Sets up attribute pointers for one vertex buffer binding, with
    /// `base_offset` added to every attribute offset.
    ///
    /// The buffer must currently be bound to the array target.
    pub fn bind_vertex_attributes(&self, binding: u32, base_offset: usize) {
        let Some(entry) = self.bindings.get(&binding) else {
            return;
        };
        let mut enabled = self.enabled_locations.borrow_mut();
        for attribute in &entry.attributes {
            self.ctx.enable_vertex_attrib_array(attribute.location);
            let offset = (attribute.offset + base_offset) as i32;
            if attribute.format.integer {
                self.ctx.vertex_attrib_pointer_i32(
                    attribute.location,
                    attribute.format.components,
                    attribute.format.data_type,
                    entry.stride as i32,
                    offset,
                );
            } else {
                self.ctx.vertex_attrib_pointer_f32(
                    attribute.location,
                    attribute.format.components,
                    attribute.format.data_type,
                    attribute.format.normalized,
                    entry.stride as i32,
                    offset,
                );
            }
            if !enabled.contains(&attribute.location) {
                enabled.push(attribute.location);
            }
        }
    }

    /// Disables every attribute array enabled through
    /// [`bind_vertex_attributes`](Self::bind_vertex_attributes).
    pub fn unbind_vertex_attributes(&self) {
        let mut enabled = self.enabled_locations.borrow_mut();
        for location in enabled.drain(..) {
            self.ctx.disable_vertex_attrib_array(location);
        }
    }
}

fn resolve_sampler_units(
    reflection: &PipelineReflection,
    map: &BTreeMap<usize, String>,
    stage: &str,
) -> [i32; MAX_TEXTURE_SAMPLERS] {
    let mut table = [UNRESOLVED; MAX_TEXTURE_SAMPLERS];
    for (&unit, name) in map {
        if unit >= MAX_TEXTURE_SAMPLERS {
            log::warn!("Sampler unit {unit} for '{name}' is out of range.");
            continue;
        }
        match reflection.location(name) {
            Some(location) => table[unit] = location,
            None => {
                log::warn!("{stage} sampler uniform '{name}' not found in program.");
            }
        }
    }
    table
}
