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

//! A recording [`GlApi`] double for tests.
//!
//! Every state-changing call is logged as one readable line; tests assert on
//! the log instead of a live driver. Queries answer from a small scripted
//! model: capability state tracks `enable`/`disable`, handles count up per
//! object class, and program introspection reports whatever the test seeded
//! with the `add_*` helpers.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::api::{ActiveAttribute, ActiveUniform, GlApi};
use crate::gl;

#[derive(Default)]
struct SeededUniform {
    name: String,
    location: Option<i32>,
    size: i32,
    utype: u32,
}

#[derive(Default)]
struct Inner {
    calls: Vec<String>,
    enabled: HashSet<u32>,
    next_buffer: u32,
    next_vertex_array: u32,
    next_texture: u32,
    next_renderbuffer: u32,
    next_framebuffer: u32,
    next_program: u32,
    pending_link_failure: Option<String>,
    failed_links: HashMap<u32, String>,
    uniforms: Vec<SeededUniform>,
    attributes: Vec<(String, u32)>,
    uniform_blocks: HashMap<String, u32>,
    storage_blocks: HashMap<String, u32>,
    framebuffer_status: Option<u32>,
}

/// Shared-state recording double; clones observe the same log.
#[derive(Clone, Default)]
pub(crate) struct RecordingApi {
    inner: Rc<RefCell<Inner>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// The log of state-changing calls so far.
    pub fn calls(&self) -> Vec<String> {
        self.inner.borrow().calls.clone()
    }

    /// Empties the call log.
    pub fn clear(&self) {
        self.inner.borrow_mut().calls.clear();
    }

    /// Marks a capability enabled without logging anything.
    pub fn force_enable(&self, cap: u32) {
        self.inner.borrow_mut().enabled.insert(cap);
    }

    /// Makes the next `link_program` fail with `info_log`.
    pub fn fail_next_link(&self, info_log: &str) {
        self.inner.borrow_mut().pending_link_failure = Some(info_log.to_string());
    }

    /// Seeds an active uniform with a resolvable location.
    pub fn add_uniform(&self, name: &str, location: i32, size: i32, utype: u32) {
        self.inner.borrow_mut().uniforms.push(SeededUniform {
            name: name.to_string(),
            location: Some(location),
            size,
            utype,
        });
    }

    /// Seeds an active uniform that is a block member (no location).
    pub fn add_block_member(&self, name: &str) {
        self.inner.borrow_mut().uniforms.push(SeededUniform {
            name: name.to_string(),
            location: None,
            size: 1,
            utype: 0,
        });
    }

    /// Seeds an active vertex attribute.
    pub fn add_attribute(&self, name: &str, location: u32) {
        self.inner
            .borrow_mut()
            .attributes
            .push((name.to_string(), location));
    }

    /// Seeds a uniform block at a block index.
    pub fn add_uniform_block(&self, name: &str, index: u32) {
        self.inner
            .borrow_mut()
            .uniform_blocks
            .insert(name.to_string(), index);
    }

    /// Seeds a shader storage block at a block index.
    pub fn add_storage_block(&self, name: &str, index: u32) {
        self.inner
            .borrow_mut()
            .storage_blocks
            .insert(name.to_string(), index);
    }

    /// Scripts the result of `check_framebuffer_status`.
    pub fn set_framebuffer_status(&self, status: u32) {
        self.inner.borrow_mut().framebuffer_status = Some(status);
    }

    fn record(&self, call: String) {
        self.inner.borrow_mut().calls.push(call);
    }
}

fn hex_list(values: &[u32]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v:#06x}")).collect();
    format!("[{}]", parts.join(", "))
}

impl GlApi for RecordingApi {
    fn enable(&self, cap: u32) {
        self.inner.borrow_mut().enabled.insert(cap);
        self.record(format!("enable(cap: {cap:#06x})"));
    }

    fn disable(&self, cap: u32) {
        self.inner.borrow_mut().enabled.remove(&cap);
        self.record(format!("disable(cap: {cap:#06x})"));
    }

    fn is_enabled(&self, cap: u32) -> bool {
        self.inner.borrow().enabled.contains(&cap)
    }

    fn color_mask(&self, r: bool, g: bool, b: bool, a: bool) {
        self.record(format!("color_mask(r: {r}, g: {g}, b: {b}, a: {a})"));
    }

    fn depth_mask(&self, enabled: bool) {
        self.record(format!("depth_mask(enabled: {enabled})"));
    }

    fn stencil_mask(&self, mask: u32) {
        self.record(format!("stencil_mask(mask: {mask:#06x})"));
    }

    fn stencil_mask_separate(&self, face: u32, mask: u32) {
        self.record(format!(
            "stencil_mask_separate(face: {face:#06x}, mask: {mask:#06x})"
        ));
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(format!("clear_color(r: {r}, g: {g}, b: {b}, a: {a})"));
    }

    fn clear_depth(&self, depth: f32) {
        self.record(format!("clear_depth(depth: {depth})"));
    }

    fn clear_stencil(&self, value: i32) {
        self.record(format!("clear_stencil(value: {value})"));
    }

    fn clear(&self, mask: u32) {
        self.record(format!("clear(mask: {mask:#06x})"));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(format!(
            "viewport(x: {x}, y: {y}, width: {width}, height: {height})"
        ));
    }

    fn scissor(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(format!(
            "scissor(x: {x}, y: {y}, width: {width}, height: {height})"
        ));
    }

    fn blend_func_separate(&self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32) {
        self.record(format!(
            "blend_func_separate(src_rgb: {src_rgb:#06x}, dst_rgb: {dst_rgb:#06x}, src_alpha: {src_alpha:#06x}, dst_alpha: {dst_alpha:#06x})"
        ));
    }

    fn blend_equation_separate(&self, mode_rgb: u32, mode_alpha: u32) {
        self.record(format!(
            "blend_equation_separate(mode_rgb: {mode_rgb:#06x}, mode_alpha: {mode_alpha:#06x})"
        ));
    }

    fn cull_face(&self, mode: u32) {
        self.record(format!("cull_face(mode: {mode:#06x})"));
    }

    fn front_face(&self, mode: u32) {
        self.record(format!("front_face(mode: {mode:#06x})"));
    }

    fn polygon_mode(&self, face: u32, mode: u32) {
        self.record(format!("polygon_mode(face: {face:#06x}, mode: {mode:#06x})"));
    }

    fn depth_func(&self, func: u32) {
        self.record(format!("depth_func(func: {func:#06x})"));
    }

    fn stencil_func_separate(&self, face: u32, func: u32, reference: i32, mask: u32) {
        self.record(format!(
            "stencil_func_separate(face: {face:#06x}, func: {func:#06x}, reference: {reference}, mask: {mask:#06x})"
        ));
    }

    fn stencil_op_separate(&self, face: u32, fail: u32, depth_fail: u32, depth_pass: u32) {
        self.record(format!(
            "stencil_op_separate(face: {face:#06x}, fail: {fail:#06x}, depth_fail: {depth_fail:#06x}, depth_pass: {depth_pass:#06x})"
        ));
    }

    fn create_buffer(&self) -> u32 {
        let mut inner = self.inner.borrow_mut();
        inner.next_buffer += 1;
        let handle = inner.next_buffer;
        inner.calls.push(format!("create_buffer() = {handle}"));
        handle
    }

    fn delete_buffer(&self, buffer: u32) {
        self.record(format!("delete_buffer(buffer: {buffer})"));
    }

    fn bind_buffer(&self, target: u32, buffer: u32) {
        self.record(format!("bind_buffer(target: {target:#06x}, buffer: {buffer})"));
    }

    fn bind_buffer_base(&self, target: u32, index: u32, buffer: u32) {
        self.record(format!(
            "bind_buffer_base(target: {target:#06x}, index: {index}, buffer: {buffer})"
        ));
    }

    fn bind_buffer_range(&self, target: u32, index: u32, buffer: u32, offset: i32, size: i32) {
        self.record(format!(
            "bind_buffer_range(target: {target:#06x}, index: {index}, buffer: {buffer}, offset: {offset}, size: {size})"
        ));
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        self.record(format!(
            "buffer_data(target: {target:#06x}, len: {}, usage: {usage:#06x})",
            data.len()
        ));
    }

    fn buffer_data_size(&self, target: u32, size: i32, usage: u32) {
        self.record(format!(
            "buffer_data_size(target: {target:#06x}, size: {size}, usage: {usage:#06x})"
        ));
    }

    fn buffer_sub_data(&self, target: u32, offset: i32, data: &[u8]) {
        self.record(format!(
            "buffer_sub_data(target: {target:#06x}, offset: {offset}, len: {})",
            data.len()
        ));
    }

    fn create_vertex_array(&self) -> u32 {
        let mut inner = self.inner.borrow_mut();
        inner.next_vertex_array += 1;
        let handle = inner.next_vertex_array;
        inner.calls.push(format!("create_vertex_array() = {handle}"));
        handle
    }

    fn delete_vertex_array(&self, vao: u32) {
        self.record(format!("delete_vertex_array(vao: {vao})"));
    }

    fn bind_vertex_array(&self, vao: u32) {
        self.record(format!("bind_vertex_array(vao: {vao})"));
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        self.record(format!("enable_vertex_attrib_array(location: {location})"));
    }

    fn disable_vertex_attrib_array(&self, location: u32) {
        self.record(format!("disable_vertex_attrib_array(location: {location})"));
    }

    fn vertex_attrib_pointer_f32(
        &self,
        location: u32,
        components: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        self.record(format!(
            "vertex_attrib_pointer_f32(location: {location}, components: {components}, data_type: {data_type:#06x}, normalized: {normalized}, stride: {stride}, offset: {offset})"
        ));
    }

    fn vertex_attrib_pointer_i32(
        &self,
        location: u32,
        components: i32,
        data_type: u32,
        stride: i32,
        offset: i32,
    ) {
        self.record(format!(
            "vertex_attrib_pointer_i32(location: {location}, components: {components}, data_type: {data_type:#06x}, stride: {stride}, offset: {offset})"
        ));
    }

    fn create_texture(&self) -> u32 {
        let mut inner = self.inner.borrow_mut();
        inner.next_texture += 1;
        let handle = inner.next_texture;
        inner.calls.push(format!("create_texture() = {handle}"));
        handle
    }

    fn delete_texture(&self, texture: u32) {
        self.record(format!("delete_texture(texture: {texture})"));
    }

    fn bind_texture(&self, target: u32, texture: u32) {
        self.record(format!(
            "bind_texture(target: {target:#06x}, texture: {texture})"
        ));
    }

    fn active_texture(&self, unit: u32) {
        self.record(format!("active_texture(unit: {unit:#06x})"));
    }

    fn tex_parameter_i32(&self, target: u32, pname: u32, value: i32) {
        self.record(format!(
            "tex_parameter_i32(target: {target:#06x}, pname: {pname:#06x}, value: {value})"
        ));
    }

    fn pixel_store_i32(&self, pname: u32, value: i32) {
        self.record(format!("pixel_store_i32(pname: {pname:#06x}, value: {value})"));
    }

    fn tex_storage_2d(&self, target: u32, levels: i32, internal_format: u32, width: i32, height: i32) {
        self.record(format!(
            "tex_storage_2d(target: {target:#06x}, levels: {levels}, internal_format: {internal_format:#06x}, width: {width}, height: {height})"
        ));
    }

    fn tex_storage_3d(
        &self,
        target: u32,
        levels: i32,
        internal_format: u32,
        width: i32,
        height: i32,
        depth: i32,
    ) {
        self.record(format!(
            "tex_storage_3d(target: {target:#06x}, levels: {levels}, internal_format: {internal_format:#06x}, width: {width}, height: {height}, depth: {depth})"
        ));
    }

    fn tex_sub_image_2d(
        &self,
        target: u32,
        level: i32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        format: u32,
        data_type: u32,
        data: &[u8],
    ) {
        self.record(format!(
            "tex_sub_image_2d(target: {target:#06x}, level: {level}, x: {x}, y: {y}, width: {width}, height: {height}, format: {format:#06x}, data_type: {data_type:#06x}, len: {})",
            data.len()
        ));
    }

    fn tex_sub_image_3d(
        &self,
        target: u32,
        level: i32,
        x: i32,
        y: i32,
        z: i32,
        width: i32,
        height: i32,
        depth: i32,
        format: u32,
        data_type: u32,
        data: &[u8],
    ) {
        self.record(format!(
            "tex_sub_image_3d(target: {target:#06x}, level: {level}, x: {x}, y: {y}, z: {z}, width: {width}, height: {height}, depth: {depth}, format: {format:#06x}, data_type: {data_type:#06x}, len: {})",
            data.len()
        ));
    }

    fn compressed_tex_sub_image_2d(
        &self,
        target: u32,
        level: i32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        format: u32,
        data: &[u8],
    ) {
        self.record(format!(
            "compressed_tex_sub_image_2d(target: {target:#06x}, level: {level}, x: {x}, y: {y}, width: {width}, height: {height}, format: {format:#06x}, len: {})",
            data.len()
        ));
    }

    fn compressed_tex_sub_image_3d(
        &self,
        target: u32,
        level: i32,
        x: i32,
        y: i32,
        z: i32,
        width: i32,
        height: i32,
        depth: i32,
        format: u32,
        data: &[u8],
    ) {
        self.record(format!(
            "compressed_tex_sub_image_3d(target: {target:#06x}, level: {level}, x: {x}, y: {y}, z: {z}, width: {width}, height: {height}, depth: {depth}, format: {format:#06x}, len: {})",
            data.len()
        ));
    }

    fn generate_mipmap(&self, target: u32) {
        self.record(format!("generate_mipmap(target: {target:#06x})"));
    }

    fn bind_image_texture(
        &self,
        unit: u32,
        texture: u32,
        level: i32,
        layered: bool,
        layer: i32,
        access: u32,
        format: u32,
    ) {
        self.record(format!(
            "bind_image_texture(unit: {unit}, texture: {texture}, level: {level}, layered: {layered}, layer: {layer}, access: {access:#06x}, format: {format:#06x})"
        ));
    }

    fn create_renderbuffer(&self) -> u32 {
        let mut inner = self.inner.borrow_mut();
        inner.next_renderbuffer += 1;
        let handle = inner.next_renderbuffer;
        inner.calls.push(format!("create_renderbuffer() = {handle}"));
        handle
    }

    fn delete_renderbuffer(&self, renderbuffer: u32) {
        self.record(format!("delete_renderbuffer(renderbuffer: {renderbuffer})"));
    }

    fn bind_renderbuffer(&self, target: u32, renderbuffer: u32) {
        self.record(format!(
            "bind_renderbuffer(target: {target:#06x}, renderbuffer: {renderbuffer})"
        ));
    }

    fn renderbuffer_storage(&self, target: u32, internal_format: u32, width: i32, height: i32) {
        self.record(format!(
            "renderbuffer_storage(target: {target:#06x}, internal_format: {internal_format:#06x}, width: {width}, height: {height})"
        ));
    }

    fn renderbuffer_storage_multisample(
        &self,
        target: u32,
        samples: i32,
        internal_format: u32,
        width: i32,
        height: i32,
    ) {
        self.record(format!(
            "renderbuffer_storage_multisample(target: {target:#06x}, samples: {samples}, internal_format: {internal_format:#06x}, width: {width}, height: {height})"
        ));
    }

    fn create_framebuffer(&self) -> u32 {
        let mut inner = self.inner.borrow_mut();
        inner.next_framebuffer += 1;
        let handle = inner.next_framebuffer;
        inner.calls.push(format!("create_framebuffer() = {handle}"));
        handle
    }

    fn delete_framebuffer(&self, framebuffer: u32) {
        self.record(format!("delete_framebuffer(framebuffer: {framebuffer})"));
    }

    fn bind_framebuffer(&self, target: u32, framebuffer: u32) {
        self.record(format!(
            "bind_framebuffer(target: {target:#06x}, framebuffer: {framebuffer})"
        ));
    }

    fn framebuffer_texture_2d(
        &self,
        target: u32,
        attachment: u32,
        tex_target: u32,
        texture: u32,
        level: i32,
    ) {
        self.record(format!(
            "framebuffer_texture_2d(target: {target:#06x}, attachment: {attachment:#06x}, tex_target: {tex_target:#06x}, texture: {texture}, level: {level})"
        ));
    }

    fn framebuffer_renderbuffer(&self, target: u32, attachment: u32, rb_target: u32, renderbuffer: u32) {
        self.record(format!(
            "framebuffer_renderbuffer(target: {target:#06x}, attachment: {attachment:#06x}, rb_target: {rb_target:#06x}, renderbuffer: {renderbuffer})"
        ));
    }

    fn check_framebuffer_status(&self, _target: u32) -> u32 {
        self.inner
            .borrow()
            .framebuffer_status
            .unwrap_or(gl::FRAMEBUFFER_COMPLETE)
    }

    fn draw_buffers(&self, buffers: &[u32]) {
        self.record(format!("draw_buffers(buffers: {})", hex_list(buffers)));
    }

    fn invalidate_framebuffer(&self, target: u32, attachments: &[u32]) {
        self.record(format!(
            "invalidate_framebuffer(target: {target:#06x}, attachments: {})",
            hex_list(attachments)
        ));
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        self.record(format!(
            "draw_arrays(mode: {mode:#06x}, first: {first}, count: {count})"
        ));
    }

    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32) {
        self.record(format!(
            "draw_elements(mode: {mode:#06x}, count: {count}, element_type: {element_type:#06x}, offset: {offset})"
        ));
    }

    fn dispatch_compute(&self, x: u32, y: u32, z: u32) {
        self.record(format!("dispatch_compute(x: {x}, y: {y}, z: {z})"));
    }

    fn memory_barrier(&self, barriers: u32) {
        self.record(format!("memory_barrier(barriers: {barriers:#06x})"));
    }

    fn create_program(&self) -> u32 {
        let mut inner = self.inner.borrow_mut();
        inner.next_program += 1;
        let handle = inner.next_program;
        inner.calls.push(format!("create_program() = {handle}"));
        handle
    }

    fn delete_program(&self, program: u32) {
        self.record(format!("delete_program(program: {program})"));
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.record(format!("attach_shader(program: {program}, shader: {shader})"));
    }

    fn link_program(&self, program: u32) {
        let mut inner = self.inner.borrow_mut();
        if let Some(info_log) = inner.pending_link_failure.take() {
            inner.failed_links.insert(program, info_log);
        }
        inner.calls.push(format!("link_program(program: {program})"));
    }

    fn get_link_status(&self, program: u32) -> bool {
        !self.inner.borrow().failed_links.contains_key(&program)
    }

    fn get_program_info_log(&self, program: u32) -> String {
        self.inner
            .borrow()
            .failed_links
            .get(&program)
            .cloned()
            .unwrap_or_default()
    }

    fn use_program(&self, program: u32) {
        self.record(format!("use_program(program: {program})"));
    }

    fn uniform_1_i32(&self, location: i32, value: i32) {
        self.record(format!("uniform_1_i32(location: {location}, value: {value})"));
    }

    fn get_uniform_location(&self, _program: u32, name: &str) -> Option<i32> {
        self.inner
            .borrow()
            .uniforms
            .iter()
            .find(|u| u.name == name)
            .and_then(|u| u.location)
    }

    fn num_active_uniforms(&self, _program: u32) -> u32 {
        self.inner.borrow().uniforms.len() as u32
    }

    fn get_active_uniform(&self, _program: u32, index: u32) -> Option<ActiveUniform> {
        self.inner
            .borrow()
            .uniforms
            .get(index as usize)
            .map(|u| ActiveUniform {
                name: u.name.clone(),
                size: u.size,
                utype: u.utype,
            })
    }

    fn num_active_attributes(&self, _program: u32) -> u32 {
        self.inner.borrow().attributes.len() as u32
    }

    fn get_active_attribute(&self, _program: u32, index: u32) -> Option<ActiveAttribute> {
        self.inner
            .borrow()
            .attributes
            .get(index as usize)
            .map(|(name, _)| ActiveAttribute {
                name: name.clone(),
                size: 1,
                atype: 0,
            })
    }

    fn get_attrib_location(&self, _program: u32, name: &str) -> Option<u32> {
        self.inner
            .borrow()
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, location)| *location)
    }

    fn uniform_block_index(&self, _program: u32, name: &str) -> Option<u32> {
        self.inner.borrow().uniform_blocks.get(name).copied()
    }

    fn uniform_block_binding(&self, program: u32, block_index: u32, binding: u32) {
        self.record(format!(
            "uniform_block_binding(program: {program}, block_index: {block_index}, binding: {binding})"
        ));
    }

    fn shader_storage_block_index(&self, _program: u32, name: &str) -> Option<u32> {
        self.inner.borrow().storage_blocks.get(name).copied()
    }

    fn shader_storage_block_binding(&self, program: u32, block_index: u32, binding: u32) {
        self.record(format!(
            "shader_storage_block_binding(program: {program}, block_index: {block_index}, binding: {binding})"
        ));
    }
}
