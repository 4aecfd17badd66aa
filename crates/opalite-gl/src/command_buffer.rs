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

//! The graphics command buffer.
//!
//! Binds are recorded into caches and marked dirty; nothing reaches the
//! driver until a draw, which resolves the dirty state in a fixed order:
//! vertex buffers, pipeline, depth/stencil state, uniform buffers, then
//! vertex- and fragment-stage texture slots. A draw leaves no dirty bits
//! behind, so back-to-back draws with unchanged state cost one native call.
//!
//! Misuse after construction — binding outside a pass, out-of-range slots,
//! drawing with no pipeline — degrades to a logged no-op.

use std::collections::BTreeMap;
use std::rc::Rc;

use opalite_core::common::{
    IndexFormat, PrimitiveType, ScissorRect, StageFlags, Viewport, MAX_TEXTURE_SAMPLERS,
    MAX_VERTEX_BUFFERS,
};
use opalite_core::opalite_bitflags;
use opalite_core::pass::{LoadAction, RenderPassDesc};

use crate::buffer::{Buffer, BufferKind};
use crate::context::Context;
use crate::conversions::IntoGl;
use crate::depth_stencil::DepthStencilState;
use crate::framebuffer::Framebuffer;
use crate::gl;
use crate::pipeline::GraphicsPipeline;
use crate::sampler::SamplerState;
use crate::texture::Texture;
use crate::uniform_binder::UniformBinder;
use crate::vao::VertexArrayObject;

/// Where a render pass draws: a framebuffer, or the default drawable.
#[derive(Debug, Clone, Default)]
pub struct RenderPassBegin {
    /// The target framebuffer; `None` selects the default drawable.
    pub framebuffer: Option<Rc<Framebuffer>>,
    /// The pass's load/store actions and clear values.
    pub render_pass: RenderPassDesc,
}

opalite_bitflags! {
    struct DirtyFlags: u8 {
        const GRAPHICS_PIPELINE = 1 << 0;
        const DEPTH_STENCIL = 1 << 1;
    }
}

#[derive(Default, Clone)]
struct TextureSlot {
    texture: Option<Rc<Texture>>,
    sampler: Option<Rc<SamplerState>>,
}

/// Records graphics work between `begin_render_pass` and
/// `end_render_pass`, diffing bound state against the driver.
pub struct GraphicsCommandBuffer {
    ctx: Rc<Context>,
    vao: VertexArrayObject,
    uniform_binder: UniformBinder,
    vertex_buffers: BTreeMap<usize, (Rc<Buffer>, usize)>,
    dirty_vertex_buffers: u32,
    vertex_slots: [TextureSlot; MAX_TEXTURE_SAMPLERS],
    dirty_vertex_slots: u32,
    fragment_slots: [TextureSlot; MAX_TEXTURE_SAMPLERS],
    dirty_fragment_slots: u32,
    pipeline: Option<Rc<GraphicsPipeline>>,
    depth_stencil: Option<Rc<DepthStencilState>>,
    dirty: DirtyFlags,
    framebuffer: Option<Rc<Framebuffer>>,
    scissor_was_enabled: bool,
    recording: bool,
}

impl GraphicsCommandBuffer {
    /// Creates a command buffer with its own vertex array object.
    pub fn new(ctx: Rc<Context>) -> Self {
        let vao = VertexArrayObject::new(ctx.clone());
        Self {
            ctx,
            vao,
            uniform_binder: UniformBinder::new(),
            vertex_buffers: BTreeMap::new(),
            dirty_vertex_buffers: 0,
            vertex_slots: Default::default(),
            dirty_vertex_slots: 0,
            fragment_slots: Default::default(),
            dirty_fragment_slots: 0,
            pipeline: None,
            depth_stencil: None,
            dirty: DirtyFlags::EMPTY,
            framebuffer: None,
            scissor_was_enabled: false,
            recording: false,
        }
    }

    /// Whether a render pass is open.
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Opens a render pass, performing the target's begin work.
    ///
    /// Scissoring is suspended for the pass (clears are not scissored) and
    /// restored when the pass ends.
    pub fn begin_render_pass(&mut self, begin: &RenderPassBegin) {
        if self.recording {
            log::warn!("Render pass is already open.");
            return;
        }

        self.scissor_was_enabled = self.ctx.is_enabled(gl::SCISSOR_TEST);
        self.ctx.disable(gl::SCISSOR_TEST);

        self.vao.bind();

        match &begin.framebuffer {
            Some(framebuffer) => {
                framebuffer.bind_for_render_pass(&begin.render_pass);
                self.bind_viewport_internal(&framebuffer.viewport());
                self.framebuffer = Some(framebuffer.clone());
            }
            None => {
                self.ctx.bind_framebuffer(gl::FRAMEBUFFER, 0);
                self.clear_default_framebuffer(&begin.render_pass);
            }
        }

        self.recording = true;
    }

    fn clear_default_framebuffer(&self, render_pass: &RenderPassDesc) {
        let mut clear_mask = 0;
        let color0 = render_pass.color_attachment(0);
        if color0.load_action == LoadAction::Clear {
            clear_mask |= gl::COLOR_BUFFER_BIT;
            self.ctx.color_mask(true, true, true, true);
            let c = color0.clear_color;
            self.ctx.clear_color(c.r, c.g, c.b, c.a);
        }
        if render_pass.depth_attachment.load_action == LoadAction::Clear {
            clear_mask |= gl::DEPTH_BUFFER_BIT;
            self.ctx.depth_mask(true);
            self.ctx.clear_depth(render_pass.depth_attachment.clear_depth);
        }
        if render_pass.stencil_attachment.load_action == LoadAction::Clear {
            clear_mask |= gl::STENCIL_BUFFER_BIT;
            self.ctx.stencil_mask(0xFF);
            self.ctx
                .clear_stencil(render_pass.stencil_attachment.clear_stencil as i32);
        }
        if clear_mask != 0 {
            self.ctx.clear(clear_mask);
        }
    }

    /// Closes the pass: restores scissor state, releases attribute arrays,
    /// invalidates discarded attachments, and drops every cached binding.
    pub fn end_render_pass(&mut self) {
        if !self.recording {
            log::warn!("No render pass is open.");
            return;
        }

        if self.scissor_was_enabled {
            self.ctx.enable(gl::SCISSOR_TEST);
        }

        if let Some(pipeline) = &self.pipeline {
            pipeline.unbind_vertex_attributes();
        }
        if let Some(framebuffer) = self.framebuffer.take() {
            framebuffer.unbind();
        }

        self.pipeline = None;
        self.depth_stencil = None;
        self.vertex_buffers.clear();
        self.dirty_vertex_buffers = 0;
        self.vertex_slots = Default::default();
        self.fragment_slots = Default::default();
        self.dirty_vertex_slots = 0;
        self.dirty_fragment_slots = 0;
        self.dirty = DirtyFlags::EMPTY;
        self.uniform_binder.reset();

        self.recording = false;
    }

    /// Selects the pipeline used by subsequent draws.
    ///
    /// Occupied vertex buffer slots are re-marked dirty so the new
    /// pipeline's attribute layout is established before the next draw.
    pub fn bind_graphics_pipeline(&mut self, pipeline: Rc<GraphicsPipeline>) {
        if !self.recording {
            log::warn!("Cannot bind a pipeline outside a render pass.");
            return;
        }
        self.pipeline = Some(pipeline);
        self.dirty.insert(DirtyFlags::GRAPHICS_PIPELINE);
        for &index in self.vertex_buffers.keys() {
            self.dirty_vertex_buffers |= 1 << index;
        }
    }

    /// Selects the depth/stencil state used by subsequent draws.
    pub fn bind_depth_stencil_state(&mut self, state: Rc<DepthStencilState>) {
        if !self.recording {
            log::warn!("Cannot bind depth/stencil state outside a render pass.");
            return;
        }
        self.depth_stencil = Some(state);
        self.dirty.insert(DirtyFlags::DEPTH_STENCIL);
    }

    /// Binds a buffer: vertex buffers go to slot `index`, uniform buffers
    /// to uniform binding point `index`.
    pub fn bind_buffer(&mut self, index: usize, buffer: Rc<Buffer>, offset: usize) {
        if !self.recording {
            log::warn!("Cannot bind a buffer outside a render pass.");
            return;
        }
        match buffer.kind() {
            BufferKind::Vertex => {
                if index >= MAX_VERTEX_BUFFERS {
                    log::warn!("Vertex buffer slot {index} out of range.");
                    return;
                }
                self.vertex_buffers.insert(index, (buffer, offset));
                self.dirty_vertex_buffers |= 1 << index;
            }
            BufferKind::Uniform => self.uniform_binder.set_buffer(index, buffer, offset),
            _ => log::warn!("Buffer kind {:?} cannot be bound to a draw slot.", buffer.kind()),
        }
    }

    /// Binds a texture to slot `index` for the given stages.
    pub fn bind_texture(&mut self, index: usize, stages: StageFlags, texture: Rc<Texture>) {
        if !self.recording {
            log::warn!("Cannot bind a texture outside a render pass.");
            return;
        }
        if index >= MAX_TEXTURE_SAMPLERS {
            log::warn!("Texture slot {index} out of range.");
            return;
        }
        if stages.contains(StageFlags::VERTEX) {
            self.vertex_slots[index].texture = Some(texture.clone());
            self.dirty_vertex_slots |= 1 << index;
        }
        if stages.contains(StageFlags::FRAGMENT) {
            self.fragment_slots[index].texture = Some(texture);
            self.dirty_fragment_slots |= 1 << index;
        }
    }

    /// Binds a sampler state to slot `index` for the given stages.
    pub fn bind_sampler_state(&mut self, index: usize, stages: StageFlags, sampler: Rc<SamplerState>) {
        if !self.recording {
            log::warn!("Cannot bind a sampler outside a render pass.");
            return;
        }
        if index >= MAX_TEXTURE_SAMPLERS {
            log::warn!("Sampler slot {index} out of range.");
            return;
        }
        if stages.contains(StageFlags::VERTEX) {
            self.vertex_slots[index].sampler = Some(sampler.clone());
            self.dirty_vertex_slots |= 1 << index;
        }
        if stages.contains(StageFlags::FRAGMENT) {
            self.fragment_slots[index].sampler = Some(sampler);
            self.dirty_fragment_slots |= 1 << index;
        }
    }

    /// Sets the viewport rectangle.
    pub fn bind_viewport(&mut self, viewport: &Viewport) {
        if !self.recording {
            log::warn!("Cannot set a viewport outside a render pass.");
            return;
        }
        self.bind_viewport_internal(viewport);
    }

    fn bind_viewport_internal(&self, viewport: &Viewport) {
        self.ctx.viewport(
            viewport.x as i32,
            viewport.y as i32,
            viewport.width as i32,
            viewport.height as i32,
        );
    }

    /// Sets the scissor rectangle; the null rectangle disables scissoring.
    pub fn bind_scissor(&mut self, scissor: &ScissorRect) {
        if !self.recording {
            log::warn!("Cannot set a scissor outside a render pass.");
            return;
        }
        if scissor.is_null() {
            self.ctx.disable(gl::SCISSOR_TEST);
            return;
        }
        self.ctx.enable(gl::SCISSOR_TEST);
        self.ctx.scissor(
            scissor.x as i32,
            scissor.y as i32,
            scissor.width as i32,
            scissor.height as i32,
        );
    }

    /// Draws `vertex_count` vertices starting at `vertex_start`.
    pub fn draw(&mut self, primitive_type: PrimitiveType, vertex_start: usize, vertex_count: usize) {
        if !self.recording {
            log::warn!("Cannot draw outside a render pass.");
            return;
        }
        self.prepare_for_draw();
        self.ctx.draw_arrays(
            primitive_type.into_gl(),
            vertex_start as i32,
            vertex_count as i32,
        );
    }

    /// Draws `index_count` indices read from `index_buffer`.
    pub fn draw_indexed(
        &mut self,
        primitive_type: PrimitiveType,
        index_count: usize,
        index_format: IndexFormat,
        index_buffer: &Buffer,
        index_buffer_offset: usize,
    ) {
        if !self.recording {
            log::warn!("Cannot draw outside a render pass.");
            return;
        }
        if index_buffer.kind() != BufferKind::Index {
            log::warn!("draw_indexed requires an index buffer.");
            return;
        }
        self.prepare_for_draw();
        index_buffer.bind();
        self.ctx.draw_elements(
            primitive_type.into_gl(),
            index_count as i32,
            index_format.into_gl(),
            index_buffer_offset as i32,
        );
    }

    // Resolves all dirty state, in a fixed order so interdependent pieces
    // (attribute pointers need their buffer bound, sampler binds need the
    // right active unit) always land correctly.
    fn prepare_for_draw(&mut self) {
        if let Some(pipeline) = &self.pipeline {
            for (&index, (buffer, offset)) in &self.vertex_buffers {
                if self.dirty_vertex_buffers & (1 << index) == 0 {
                    continue;
                }
                buffer.bind();
                pipeline.bind_vertex_attributes(index as u32, *offset);
                self.dirty_vertex_buffers &= !(1 << index);
            }

            if self.dirty.contains(DirtyFlags::GRAPHICS_PIPELINE) {
                pipeline.bind();
                self.dirty.remove(DirtyFlags::GRAPHICS_PIPELINE);
            }
        }

        if let Some(depth_stencil) = &self.depth_stencil {
            if self.dirty.contains(DirtyFlags::DEPTH_STENCIL) {
                depth_stencil.bind();
                self.dirty.remove(DirtyFlags::DEPTH_STENCIL);
            }
        }

        if let Some(pipeline) = &self.pipeline {
            self.uniform_binder.bind_buffers();

            for index in 0..MAX_TEXTURE_SAMPLERS {
                if self.dirty_vertex_slots & (1 << index) != 0 {
                    let slot = &self.vertex_slots[index];
                    if let Some(texture) = &slot.texture {
                        if pipeline.bind_vertex_texture_unit(index) {
                            texture.bind();
                            if let Some(sampler) = &slot.sampler {
                                sampler.bind(texture);
                            }
                        }
                    }
                    self.dirty_vertex_slots &= !(1 << index);
                }
                if self.dirty_fragment_slots & (1 << index) != 0 {
                    let slot = &self.fragment_slots[index];
                    if let Some(texture) = &slot.texture {
                        if pipeline.bind_fragment_texture_unit(index) {
                            texture.bind();
                            if let Some(sampler) = &slot.sampler {
                                sampler.bind(texture);
                            }
                        }
                    }
                    self.dirty_fragment_slots &= !(1 << index);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use opalite_core::buffer::BufferDesc;
    use opalite_core::common::{Color, ResourceStorage};
    use opalite_core::format::TextureFormat;
    use opalite_core::pipeline::GraphicsPipelineDesc;
    use opalite_core::sampler::SamplerDesc;
    use opalite_core::texture::{TextureDesc, TextureUsage};
    use opalite_core::vertex::{VertexAttributeFormat, VertexInputState};

    use super::*;
    use crate::shader::{ShaderModule, ShaderStage, ShaderStages};
    use crate::testing::RecordingApi;

    struct Harness {
        api: RecordingApi,
        ctx: Rc<Context>,
    }

    impl Harness {
        fn new() -> Self {
            let api = RecordingApi::new();
            api.add_attribute("a_position", 0);
            api.add_uniform("u_albedo", 3, 1, 0x8B5E);
            let ctx = Context::new(Box::new(api.clone()));
            Self { api, ctx }
        }

        fn pipeline(&self) -> Rc<GraphicsPipeline> {
            let modules = [
                ShaderModule::from_raw(1, ShaderStage::Vertex),
                ShaderModule::from_raw(2, ShaderStage::Fragment),
            ];
            let stages =
                Rc::new(ShaderStages::new_graphics(self.ctx.clone(), &modules, "test").unwrap());
            let mut desc = GraphicsPipelineDesc {
                vertex_input: VertexInputState::builder()
                    .begin_binding(0)
                    .attribute(VertexAttributeFormat::Float3, "a_position")
                    .end_binding()
                    .build(),
                ..Default::default()
            };
            desc.fragment_unit_sampler_map.insert(0, "u_albedo".to_string());
            Rc::new(GraphicsPipeline::new(self.ctx.clone(), stages, &desc).unwrap())
        }

        fn vertex_buffer(&self) -> Rc<Buffer> {
            Rc::new(
                Buffer::new(
                    self.ctx.clone(),
                    &BufferDesc::vertex(1024, ResourceStorage::Shared),
                    None,
                )
                .unwrap(),
            )
        }

        fn texture(&self) -> Rc<Texture> {
            Rc::new(
                Texture::new(
                    self.ctx.clone(),
                    &TextureDesc::new_2d(TextureFormat::Rgba8Unorm, 64, 64, TextureUsage::SAMPLED),
                )
                .unwrap(),
            )
        }

        fn begin(&self, cmd: &mut GraphicsCommandBuffer) {
            cmd.begin_render_pass(&RenderPassBegin::default());
        }

        fn position(&self, prefix: &str) -> usize {
            self.api
                .calls()
                .iter()
                .position(|c| c.starts_with(prefix))
                .unwrap_or_else(|| panic!("no call starting with {prefix}"))
        }
    }

    #[test]
    fn draw_resolves_state_in_the_fixed_order() {
        let h = Harness::new();
        let mut cmd = GraphicsCommandBuffer::new(h.ctx.clone());
        h.begin(&mut cmd);
        cmd.bind_graphics_pipeline(h.pipeline());
        cmd.bind_buffer(0, h.vertex_buffer(), 0);
        cmd.bind_texture(0, StageFlags::FRAGMENT, h.texture());
        cmd.bind_sampler_state(0, StageFlags::FRAGMENT, Rc::new(SamplerState::new(
            h.ctx.clone(),
            &SamplerDesc::linear(),
        )));

        h.api.clear();
        cmd.draw(PrimitiveType::Triangle, 0, 3);

        let vertex_bind = h.position(&format!("bind_buffer(target: {:#06x}", gl::ARRAY_BUFFER));
        let attributes = h.position("vertex_attrib_pointer_f32");
        let program = h.position("use_program");
        let sampler_route = h.position("uniform_1_i32(location: 3");
        let texture_bind = h.position(&format!("bind_texture(target: {:#06x}", gl::TEXTURE_2D));
        let draw = h.position("draw_arrays");

        assert!(vertex_bind < attributes);
        assert!(attributes < program);
        assert!(program < sampler_route);
        assert!(sampler_route < texture_bind);
        assert!(texture_bind < draw);
    }

    #[test]
    fn clean_state_costs_only_the_draw_call() {
        let h = Harness::new();
        let mut cmd = GraphicsCommandBuffer::new(h.ctx.clone());
        h.begin(&mut cmd);
        cmd.bind_graphics_pipeline(h.pipeline());
        cmd.bind_buffer(0, h.vertex_buffer(), 0);
        cmd.draw(PrimitiveType::Triangle, 0, 3);

        h.api.clear();
        cmd.draw(PrimitiveType::Triangle, 3, 3);
        let calls = h.api.calls();
        assert_eq!(calls.len(), 1, "{calls:?}");
        assert!(calls[0].starts_with("draw_arrays"));
    }

    #[test]
    fn pipeline_rebind_re_establishes_vertex_buffers() {
        let h = Harness::new();
        let mut cmd = GraphicsCommandBuffer::new(h.ctx.clone());
        h.begin(&mut cmd);
        cmd.bind_graphics_pipeline(h.pipeline());
        cmd.bind_buffer(0, h.vertex_buffer(), 0);
        cmd.draw(PrimitiveType::Triangle, 0, 3);

        cmd.bind_graphics_pipeline(h.pipeline());
        h.api.clear();
        cmd.draw(PrimitiveType::Triangle, 0, 3);
        let calls = h.api.calls();
        // The occupied slot was re-marked dirty, so its attribute layout
        // is set up again under the new pipeline.
        assert!(calls.iter().any(|c| c.starts_with("vertex_attrib_pointer_f32")));
        assert!(calls.iter().any(|c| c.starts_with("use_program")));
    }

    #[test]
    fn scissor_state_is_saved_and_restored_around_the_pass() {
        let h = Harness::new();
        h.api.force_enable(gl::SCISSOR_TEST);
        let mut cmd = GraphicsCommandBuffer::new(h.ctx.clone());
        h.begin(&mut cmd);
        assert!(h
            .api
            .calls()
            .contains(&format!("disable(cap: {:#06x})", gl::SCISSOR_TEST)));

        h.api.clear();
        cmd.end_render_pass();
        assert!(h
            .api
            .calls()
            .contains(&format!("enable(cap: {:#06x})", gl::SCISSOR_TEST)));
    }

    #[test]
    fn null_scissor_rect_disables_the_test() {
        let h = Harness::new();
        let mut cmd = GraphicsCommandBuffer::new(h.ctx.clone());
        h.begin(&mut cmd);
        h.api.clear();
        cmd.bind_scissor(&ScissorRect::new(10, 10, 100, 100));
        assert!(h.api.calls().contains(&"scissor(x: 10, y: 10, width: 100, height: 100)".to_string()));
        h.api.clear();
        cmd.bind_scissor(&ScissorRect::default());
        assert!(h
            .api
            .calls()
            .contains(&format!("disable(cap: {:#06x})", gl::SCISSOR_TEST)));
    }

    #[test]
    fn binds_outside_a_pass_are_no_ops() {
        let h = Harness::new();
        let mut cmd = GraphicsCommandBuffer::new(h.ctx.clone());
        let pipeline = h.pipeline();
        h.api.clear();
        cmd.bind_graphics_pipeline(pipeline.clone());
        cmd.draw(PrimitiveType::Triangle, 0, 3);
        assert!(h.api.calls().is_empty());
    }

    #[test]
    fn default_framebuffer_pass_clears_with_masks_open() {
        let h = Harness::new();
        let mut cmd = GraphicsCommandBuffer::new(h.ctx.clone());
        let begin = RenderPassBegin {
            framebuffer: None,
            render_pass: RenderPassDesc::clear_color(Color::new(1.0, 0.0, 0.0, 1.0)),
        };
        h.api.clear();
        cmd.begin_render_pass(&begin);
        let calls = h.api.calls();
        assert!(calls.contains(&format!("bind_framebuffer(target: {:#06x}, framebuffer: 0)", gl::FRAMEBUFFER)));
        assert!(calls.contains(&"color_mask(r: true, g: true, b: true, a: true)".to_string()));
        assert!(calls.contains(&format!("clear(mask: {:#06x})", gl::COLOR_BUFFER_BIT)));
    }

    #[test]
    fn draw_indexed_binds_the_index_buffer() {
        let h = Harness::new();
        let mut cmd = GraphicsCommandBuffer::new(h.ctx.clone());
        h.begin(&mut cmd);
        cmd.bind_graphics_pipeline(h.pipeline());
        let index_buffer = Buffer::new(
            h.ctx.clone(),
            &BufferDesc::index(256, ResourceStorage::Shared),
            None,
        )
        .unwrap();
        h.api.clear();
        cmd.draw_indexed(PrimitiveType::Triangle, 36, IndexFormat::U16, &index_buffer, 12);
        let calls = h.api.calls();
        let bind = h.position(&format!("bind_buffer(target: {:#06x}", gl::ELEMENT_ARRAY_BUFFER));
        let draw = h.position("draw_elements");
        assert!(bind < draw);
        assert!(calls[draw].contains(&format!("element_type: {:#06x}", gl::UNSIGNED_SHORT)));
        assert!(calls[draw].contains("offset: 12"));

        // A vertex buffer in the index slot is rejected.
        let wrong = h.vertex_buffer();
        h.api.clear();
        cmd.draw_indexed(PrimitiveType::Triangle, 3, IndexFormat::U32, &wrong, 0);
        assert!(h.api.calls().is_empty());
    }

    #[test]
    fn rebinding_a_slot_replaces_the_cached_buffer() {
        let h = Harness::new();
        let mut cmd = GraphicsCommandBuffer::new(h.ctx.clone());
        h.begin(&mut cmd);
        cmd.bind_graphics_pipeline(h.pipeline());
        let first = h.vertex_buffer();
        let second = h.vertex_buffer();
        cmd.bind_buffer(0, first.clone(), 0);
        cmd.bind_buffer(0, second.clone(), 0);

        h.api.clear();
        cmd.draw(PrimitiveType::Triangle, 0, 3);
        let binds: Vec<_> = h
            .api
            .calls()
            .iter()
            .filter(|c| c.starts_with(&format!("bind_buffer(target: {:#06x}", gl::ARRAY_BUFFER)))
            .cloned()
            .collect();
        // Only the replacement reaches the driver.
        assert_eq!(binds.len(), 1, "{binds:?}");
        assert!(binds[0].ends_with(&format!("buffer: {})", second.handle())));
    }

    #[test]
    fn ending_the_pass_drops_every_cached_binding() {
        let h = Harness::new();
        let mut cmd = GraphicsCommandBuffer::new(h.ctx.clone());
        h.begin(&mut cmd);
        cmd.bind_graphics_pipeline(h.pipeline());
        cmd.bind_buffer(0, h.vertex_buffer(), 0);
        cmd.bind_texture(0, StageFlags::FRAGMENT, h.texture());
        cmd.end_render_pass();
        assert!(!cmd.is_recording());

        // A fresh pass starts from nothing: drawing without a pipeline
        // resolves no state.
        h.begin(&mut cmd);
        h.api.clear();
        cmd.draw(PrimitiveType::Triangle, 0, 3);
        let calls = h.api.calls();
        assert_eq!(calls.len(), 1, "{calls:?}");
        assert!(calls[0].starts_with("draw_arrays"));
    }
}
