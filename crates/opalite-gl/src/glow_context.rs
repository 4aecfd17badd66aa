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

//! [`GlApi`] over a live `glow` context.
//!
//! Translates the backend's plain `u32` handle model (0 means "no object")
//! into `glow`'s typed non-zero handles. Object creation failures are logged
//! and surface as handle 0, which downstream calls treat as "no object".

use std::num::NonZeroU32;

use glow::HasContext;

use crate::api::{ActiveAttribute, ActiveUniform, GlApi};

/// Owns a `glow::Context` and dispatches driver calls to it.
pub struct GlowContext {
    gl: glow::Context,
}

impl GlowContext {
    /// Wraps an already-current `glow` context.
    pub fn new(gl: glow::Context) -> Self {
        Self { gl }
    }
}

impl std::fmt::Debug for GlowContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlowContext").finish_non_exhaustive()
    }
}

fn buffer(handle: u32) -> Option<glow::NativeBuffer> {
    NonZeroU32::new(handle).map(glow::NativeBuffer)
}

fn vertex_array(handle: u32) -> Option<glow::NativeVertexArray> {
    NonZeroU32::new(handle).map(glow::NativeVertexArray)
}

fn texture(handle: u32) -> Option<glow::NativeTexture> {
    NonZeroU32::new(handle).map(glow::NativeTexture)
}

fn renderbuffer(handle: u32) -> Option<glow::NativeRenderbuffer> {
    NonZeroU32::new(handle).map(glow::NativeRenderbuffer)
}

fn framebuffer(handle: u32) -> Option<glow::NativeFramebuffer> {
    NonZeroU32::new(handle).map(glow::NativeFramebuffer)
}

fn program(handle: u32) -> Option<glow::NativeProgram> {
    NonZeroU32::new(handle).map(glow::NativeProgram)
}

fn shader(handle: u32) -> Option<glow::NativeShader> {
    NonZeroU32::new(handle).map(glow::NativeShader)
}

impl GlApi for GlowContext {
    fn enable(&self, cap: u32) {
        unsafe { self.gl.enable(cap) }
    }

    fn disable(&self, cap: u32) {
        unsafe { self.gl.disable(cap) }
    }

    fn is_enabled(&self, cap: u32) -> bool {
        unsafe { self.gl.is_enabled(cap) }
    }

    fn color_mask(&self, r: bool, g: bool, b: bool, a: bool) {
        unsafe { self.gl.color_mask(r, g, b, a) }
    }

    fn depth_mask(&self, enabled: bool) {
        unsafe { self.gl.depth_mask(enabled) }
    }

    fn stencil_mask(&self, mask: u32) {
        unsafe { self.gl.stencil_mask(mask) }
    }

    fn stencil_mask_separate(&self, face: u32, mask: u32) {
        unsafe { self.gl.stencil_mask_separate(face, mask) }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { self.gl.clear_color(r, g, b, a) }
    }

    fn clear_depth(&self, depth: f32) {
        unsafe { self.gl.clear_depth_f32(depth) }
    }

    fn clear_stencil(&self, value: i32) {
        unsafe { self.gl.clear_stencil(value) }
    }

    fn clear(&self, mask: u32) {
        unsafe { self.gl.clear(mask) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn scissor(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.scissor(x, y, width, height) }
    }

    fn blend_func_separate(&self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32) {
        unsafe {
            self.gl
                .blend_func_separate(src_rgb, dst_rgb, src_alpha, dst_alpha)
        }
    }

    fn blend_equation_separate(&self, mode_rgb: u32, mode_alpha: u32) {
        unsafe { self.gl.blend_equation_separate(mode_rgb, mode_alpha) }
    }

    fn cull_face(&self, mode: u32) {
        unsafe { self.gl.cull_face(mode) }
    }

    fn front_face(&self, mode: u32) {
        unsafe { self.gl.front_face(mode) }
    }

    fn polygon_mode(&self, face: u32, mode: u32) {
        unsafe { self.gl.polygon_mode(face, mode) }
    }

    fn depth_func(&self, func: u32) {
        unsafe { self.gl.depth_func(func) }
    }

    fn stencil_func_separate(&self, face: u32, func: u32, reference: i32, mask: u32) {
        unsafe { self.gl.stencil_func_separate(face, func, reference, mask) }
    }

    fn stencil_op_separate(&self, face: u32, fail: u32, depth_fail: u32, depth_pass: u32) {
        unsafe {
            self.gl
                .stencil_op_separate(face, fail, depth_fail, depth_pass)
        }
    }

    fn create_buffer(&self) -> u32 {
        match unsafe { self.gl.create_buffer() } {
            Ok(handle) => handle.0.get(),
            Err(err) => {
                log::error!("create_buffer failed: {err}");
                0
            }
        }
    }

    fn delete_buffer(&self, handle: u32) {
        if let Some(handle) = buffer(handle) {
            unsafe { self.gl.delete_buffer(handle) }
        }
    }

    fn bind_buffer(&self, target: u32, handle: u32) {
        unsafe { self.gl.bind_buffer(target, buffer(handle)) }
    }

    fn bind_buffer_base(&self, target: u32, index: u32, handle: u32) {
        unsafe { self.gl.bind_buffer_base(target, index, buffer(handle)) }
    }

    fn bind_buffer_range(&self, target: u32, index: u32, handle: u32, offset: i32, size: i32) {
        unsafe {
            self.gl
                .bind_buffer_range(target, index, buffer(handle), offset, size)
        }
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        unsafe { self.gl.buffer_data_u8_slice(target, data, usage) }
    }

    fn buffer_data_size(&self, target: u32, size: i32, usage: u32) {
        unsafe { self.gl.buffer_data_size(target, size, usage) }
    }

    fn buffer_sub_data(&self, target: u32, offset: i32, data: &[u8]) {
        unsafe { self.gl.buffer_sub_data_u8_slice(target, offset, data) }
    }

    fn create_vertex_array(&self) -> u32 {
        match unsafe { self.gl.create_vertex_array() } {
            Ok(handle) => handle.0.get(),
            Err(err) => {
                log::error!("create_vertex_array failed: {err}");
                0
            }
        }
    }

    fn delete_vertex_array(&self, handle: u32) {
        if let Some(handle) = vertex_array(handle) {
            unsafe { self.gl.delete_vertex_array(handle) }
        }
    }

    fn bind_vertex_array(&self, handle: u32) {
        unsafe { self.gl.bind_vertex_array(vertex_array(handle)) }
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(location) }
    }

    fn disable_vertex_attrib_array(&self, location: u32) {
        unsafe { self.gl.disable_vertex_attrib_array(location) }
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
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                location, components, data_type, normalized, stride, offset,
            )
        }
    }

    fn vertex_attrib_pointer_i32(
        &self,
        location: u32,
        components: i32,
        data_type: u32,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_i32(location, components, data_type, stride, offset)
        }
    }

    fn create_texture(&self) -> u32 {
        match unsafe { self.gl.create_texture() } {
            Ok(handle) => handle.0.get(),
            Err(err) => {
                log::error!("create_texture failed: {err}");
                0
            }
        }
    }

    fn delete_texture(&self, handle: u32) {
        if let Some(handle) = texture(handle) {
            unsafe { self.gl.delete_texture(handle) }
        }
    }

    fn bind_texture(&self, target: u32, handle: u32) {
        unsafe { self.gl.bind_texture(target, texture(handle)) }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { self.gl.active_texture(unit) }
    }

    fn tex_parameter_i32(&self, target: u32, pname: u32, value: i32) {
        unsafe { self.gl.tex_parameter_i32(target, pname, value) }
    }

    fn pixel_store_i32(&self, pname: u32, value: i32) {
        unsafe { self.gl.pixel_store_i32(pname, value) }
    }

    fn tex_storage_2d(&self, target: u32, levels: i32, internal_format: u32, width: i32, height: i32) {
        unsafe {
            self.gl
                .tex_storage_2d(target, levels, internal_format, width, height)
        }
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
        unsafe {
            self.gl
                .tex_storage_3d(target, levels, internal_format, width, height, depth)
        }
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
        unsafe {
            self.gl.tex_sub_image_2d(
                target,
                level,
                x,
                y,
                width,
                height,
                format,
                data_type,
                glow::PixelUnpackData::Slice(Some(data)),
            )
        }
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
        unsafe {
            self.gl.tex_sub_image_3d(
                target,
                level,
                x,
                y,
                z,
                width,
                height,
                depth,
                format,
                data_type,
                glow::PixelUnpackData::Slice(Some(data)),
            )
        }
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
        unsafe {
            self.gl.compressed_tex_sub_image_2d(
                target,
                level,
                x,
                y,
                width,
                height,
                format,
                glow::CompressedPixelUnpackData::Slice(data),
            )
        }
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
        unsafe {
            self.gl.compressed_tex_sub_image_3d(
                target,
                level,
                x,
                y,
                z,
                width,
                height,
                depth,
                format,
                glow::CompressedPixelUnpackData::Slice(data),
            )
        }
    }

    fn generate_mipmap(&self, target: u32) {
        unsafe { self.gl.generate_mipmap(target) }
    }

    fn bind_image_texture(
        &self,
        unit: u32,
        handle: u32,
        level: i32,
        layered: bool,
        layer: i32,
        access: u32,
        format: u32,
    ) {
        unsafe {
            self.gl
                .bind_image_texture(unit, texture(handle), level, layered, layer, access, format)
        }
    }

    fn create_renderbuffer(&self) -> u32 {
        match unsafe { self.gl.create_renderbuffer() } {
            Ok(handle) => handle.0.get(),
            Err(err) => {
                log::error!("create_renderbuffer failed: {err}");
                0
            }
        }
    }

    fn delete_renderbuffer(&self, handle: u32) {
        if let Some(handle) = renderbuffer(handle) {
            unsafe { self.gl.delete_renderbuffer(handle) }
        }
    }

    fn bind_renderbuffer(&self, target: u32, handle: u32) {
        unsafe { self.gl.bind_renderbuffer(target, renderbuffer(handle)) }
    }

    fn renderbuffer_storage(&self, target: u32, internal_format: u32, width: i32, height: i32) {
        unsafe {
            self.gl
                .renderbuffer_storage(target, internal_format, width, height)
        }
    }

    fn renderbuffer_storage_multisample(
        &self,
        target: u32,
        samples: i32,
        internal_format: u32,
        width: i32,
        height: i32,
    ) {
        unsafe {
            self.gl
                .renderbuffer_storage_multisample(target, samples, internal_format, width, height)
        }
    }

    fn create_framebuffer(&self) -> u32 {
        match unsafe { self.gl.create_framebuffer() } {
            Ok(handle) => handle.0.get(),
            Err(err) => {
                log::error!("create_framebuffer failed: {err}");
                0
            }
        }
    }

    fn delete_framebuffer(&self, handle: u32) {
        if let Some(handle) = framebuffer(handle) {
            unsafe { self.gl.delete_framebuffer(handle) }
        }
    }

    fn bind_framebuffer(&self, target: u32, handle: u32) {
        unsafe { self.gl.bind_framebuffer(target, framebuffer(handle)) }
    }

    fn framebuffer_texture_2d(
        &self,
        target: u32,
        attachment: u32,
        tex_target: u32,
        handle: u32,
        level: i32,
    ) {
        unsafe {
            self.gl
                .framebuffer_texture_2d(target, attachment, tex_target, texture(handle), level)
        }
    }

    fn framebuffer_renderbuffer(&self, target: u32, attachment: u32, rb_target: u32, handle: u32) {
        unsafe {
            self.gl
                .framebuffer_renderbuffer(target, attachment, rb_target, renderbuffer(handle))
        }
    }

    fn check_framebuffer_status(&self, target: u32) -> u32 {
        unsafe { self.gl.check_framebuffer_status(target) }
    }

    fn draw_buffers(&self, buffers: &[u32]) {
        unsafe { self.gl.draw_buffers(buffers) }
    }

    fn invalidate_framebuffer(&self, target: u32, attachments: &[u32]) {
        unsafe { self.gl.invalidate_framebuffer(target, attachments) }
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(mode, first, count) }
    }

    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32) {
        unsafe { self.gl.draw_elements(mode, count, element_type, offset) }
    }

    fn dispatch_compute(&self, x: u32, y: u32, z: u32) {
        unsafe { self.gl.dispatch_compute(x, y, z) }
    }

    fn memory_barrier(&self, barriers: u32) {
        unsafe { self.gl.memory_barrier(barriers) }
    }

    fn create_program(&self) -> u32 {
        match unsafe { self.gl.create_program() } {
            Ok(handle) => handle.0.get(),
            Err(err) => {
                log::error!("create_program failed: {err}");
                0
            }
        }
    }

    fn delete_program(&self, handle: u32) {
        if let Some(handle) = program(handle) {
            unsafe { self.gl.delete_program(handle) }
        }
    }

    fn attach_shader(&self, program_handle: u32, shader_handle: u32) {
        if let (Some(program), Some(shader)) = (program(program_handle), shader(shader_handle)) {
            unsafe { self.gl.attach_shader(program, shader) }
        }
    }

    fn link_program(&self, handle: u32) {
        if let Some(handle) = program(handle) {
            unsafe { self.gl.link_program(handle) }
        }
    }

    fn get_link_status(&self, handle: u32) -> bool {
        match program(handle) {
            Some(handle) => unsafe { self.gl.get_program_link_status(handle) },
            None => false,
        }
    }

    fn get_program_info_log(&self, handle: u32) -> String {
        match program(handle) {
            Some(handle) => unsafe { self.gl.get_program_info_log(handle) },
            None => String::new(),
        }
    }

    fn use_program(&self, handle: u32) {
        unsafe { self.gl.use_program(program(handle)) }
    }

    fn uniform_1_i32(&self, location: i32, value: i32) {
        if location < 0 {
            return;
        }
        let location = glow::NativeUniformLocation(location as u32);
        unsafe { self.gl.uniform_1_i32(Some(&location), value) }
    }

    fn get_uniform_location(&self, handle: u32, name: &str) -> Option<i32> {
        let handle = program(handle)?;
        unsafe { self.gl.get_uniform_location(handle, name) }.map(|loc| loc.0 as i32)
    }

    fn num_active_uniforms(&self, handle: u32) -> u32 {
        match program(handle) {
            Some(handle) => unsafe { self.gl.get_active_uniforms(handle) },
            None => 0,
        }
    }

    fn get_active_uniform(&self, handle: u32, index: u32) -> Option<ActiveUniform> {
        let handle = program(handle)?;
        unsafe { self.gl.get_active_uniform(handle, index) }.map(|u| ActiveUniform {
            name: u.name,
            size: u.size,
            utype: u.utype,
        })
    }

    fn num_active_attributes(&self, handle: u32) -> u32 {
        match program(handle) {
            Some(handle) => unsafe { self.gl.get_active_attributes(handle) },
            None => 0,
        }
    }

    fn get_active_attribute(&self, handle: u32, index: u32) -> Option<ActiveAttribute> {
        let handle = program(handle)?;
        unsafe { self.gl.get_active_attribute(handle, index) }.map(|a| ActiveAttribute {
            name: a.name,
            size: a.size,
            atype: a.atype,
        })
    }

    fn get_attrib_location(&self, handle: u32, name: &str) -> Option<u32> {
        let handle = program(handle)?;
        unsafe { self.gl.get_attrib_location(handle, name) }
    }

    fn uniform_block_index(&self, handle: u32, name: &str) -> Option<u32> {
        let handle = program(handle)?;
        unsafe { self.gl.get_uniform_block_index(handle, name) }
    }

    fn uniform_block_binding(&self, handle: u32, block_index: u32, binding: u32) {
        if let Some(handle) = program(handle) {
            unsafe { self.gl.uniform_block_binding(handle, block_index, binding) }
        }
    }

    fn shader_storage_block_index(&self, handle: u32, name: &str) -> Option<u32> {
        let handle = program(handle)?;
        unsafe { self.gl.get_shader_storage_block_index(handle, name) }
    }

    fn shader_storage_block_binding(&self, handle: u32, block_index: u32, binding: u32) {
        if let Some(handle) = program(handle) {
            unsafe {
                self.gl
                    .shader_storage_block_binding(handle, block_index, binding)
            }
        }
    }
}
