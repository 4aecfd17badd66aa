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

//! The native call surface of the backend.
//!
//! Every driver call the backend ever issues goes through [`GlApi`].
//! Object handles are plain `u32` values, with 0 meaning "no object", as in
//! the native object model. Enum-typed parameters take the values from
//! [`crate::gl`].

/// One active uniform reported by program introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveUniform {
    /// The uniform's name as spelled in the shader.
    pub name: String,
    /// Array size (1 for non-arrays).
    pub size: i32,
    /// The native type enum of the uniform.
    pub utype: u32,
}

/// One active vertex attribute reported by program introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveAttribute {
    /// The attribute's name as spelled in the shader.
    pub name: String,
    /// Array size (1 for non-arrays).
    pub size: i32,
    /// The native type enum of the attribute.
    pub atype: u32,
}

/// The driver dispatch trait.
///
/// Implementations forward to a live context (see `glow_context` behind the
/// `backend-glow` feature); tests substitute a recording double.
#[allow(missing_docs)]
pub trait GlApi {
    // Capability and global state
    fn enable(&self, cap: u32);
    fn disable(&self, cap: u32);
    fn is_enabled(&self, cap: u32) -> bool;
    fn color_mask(&self, r: bool, g: bool, b: bool, a: bool);
    fn depth_mask(&self, enabled: bool);
    fn stencil_mask(&self, mask: u32);
    fn stencil_mask_separate(&self, face: u32, mask: u32);
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear_depth(&self, depth: f32);
    fn clear_stencil(&self, value: i32);
    fn clear(&self, mask: u32);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn scissor(&self, x: i32, y: i32, width: i32, height: i32);

    // Blend, raster, depth, stencil state
    fn blend_func_separate(&self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32);
    fn blend_equation_separate(&self, mode_rgb: u32, mode_alpha: u32);
    fn cull_face(&self, mode: u32);
    fn front_face(&self, mode: u32);
    fn polygon_mode(&self, face: u32, mode: u32);
    fn depth_func(&self, func: u32);
    fn stencil_func_separate(&self, face: u32, func: u32, reference: i32, mask: u32);
    fn stencil_op_separate(&self, face: u32, fail: u32, depth_fail: u32, depth_pass: u32);

    // Buffer objects
    fn create_buffer(&self) -> u32;
    fn delete_buffer(&self, buffer: u32);
    fn bind_buffer(&self, target: u32, buffer: u32);
    fn bind_buffer_base(&self, target: u32, index: u32, buffer: u32);
    fn bind_buffer_range(&self, target: u32, index: u32, buffer: u32, offset: i32, size: i32);
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32);
    fn buffer_data_size(&self, target: u32, size: i32, usage: u32);
    fn buffer_sub_data(&self, target: u32, offset: i32, data: &[u8]);

    // Vertex arrays and attributes
    fn create_vertex_array(&self) -> u32;
    fn delete_vertex_array(&self, vao: u32);
    fn bind_vertex_array(&self, vao: u32);
    fn enable_vertex_attrib_array(&self, location: u32);
    fn disable_vertex_attrib_array(&self, location: u32);
    fn vertex_attrib_pointer_f32(
        &self,
        location: u32,
        components: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );
    fn vertex_attrib_pointer_i32(
        &self,
        location: u32,
        components: i32,
        data_type: u32,
        stride: i32,
        offset: i32,
    );

    // Texture objects
    fn create_texture(&self) -> u32;
    fn delete_texture(&self, texture: u32);
    fn bind_texture(&self, target: u32, texture: u32);
    fn active_texture(&self, unit: u32);
    fn tex_parameter_i32(&self, target: u32, pname: u32, value: i32);
    fn pixel_store_i32(&self, pname: u32, value: i32);
    fn tex_storage_2d(&self, target: u32, levels: i32, internal_format: u32, width: i32, height: i32);
    fn tex_storage_3d(
        &self,
        target: u32,
        levels: i32,
        internal_format: u32,
        width: i32,
        height: i32,
        depth: i32,
    );
    #[allow(clippy::too_many_arguments)]
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
    );
    #[allow(clippy::too_many_arguments)]
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
    );
    #[allow(clippy::too_many_arguments)]
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
    );
    #[allow(clippy::too_many_arguments)]
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
    );
    fn generate_mipmap(&self, target: u32);
    #[allow(clippy::too_many_arguments)]
    fn bind_image_texture(
        &self,
        unit: u32,
        texture: u32,
        level: i32,
        layered: bool,
        layer: i32,
        access: u32,
        format: u32,
    );

    // Renderbuffer objects
    fn create_renderbuffer(&self) -> u32;
    fn delete_renderbuffer(&self, renderbuffer: u32);
    fn bind_renderbuffer(&self, target: u32, renderbuffer: u32);
    fn renderbuffer_storage(&self, target: u32, internal_format: u32, width: i32, height: i32);
    fn renderbuffer_storage_multisample(
        &self,
        target: u32,
        samples: i32,
        internal_format: u32,
        width: i32,
        height: i32,
    );

    // Framebuffer objects
    fn create_framebuffer(&self) -> u32;
    fn delete_framebuffer(&self, framebuffer: u32);
    fn bind_framebuffer(&self, target: u32, framebuffer: u32);
    fn framebuffer_texture_2d(
        &self,
        target: u32,
        attachment: u32,
        tex_target: u32,
        texture: u32,
        level: i32,
    );
    fn framebuffer_renderbuffer(&self, target: u32, attachment: u32, rb_target: u32, renderbuffer: u32);
    fn check_framebuffer_status(&self, target: u32) -> u32;
    fn draw_buffers(&self, buffers: &[u32]);
    fn invalidate_framebuffer(&self, target: u32, attachments: &[u32]);

    // Draw and dispatch
    fn draw_arrays(&self, mode: u32, first: i32, count: i32);
    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32);
    fn dispatch_compute(&self, x: u32, y: u32, z: u32);
    fn memory_barrier(&self, barriers: u32);

    // Programs and introspection
    fn create_program(&self) -> u32;
    fn delete_program(&self, program: u32);
    fn attach_shader(&self, program: u32, shader: u32);
    fn link_program(&self, program: u32);
    fn get_link_status(&self, program: u32) -> bool;
    fn get_program_info_log(&self, program: u32) -> String;
    fn use_program(&self, program: u32);
    fn uniform_1_i32(&self, location: i32, value: i32);
    fn get_uniform_location(&self, program: u32, name: &str) -> Option<i32>;
    fn num_active_uniforms(&self, program: u32) -> u32;
    fn get_active_uniform(&self, program: u32, index: u32) -> Option<ActiveUniform>;
    fn num_active_attributes(&self, program: u32) -> u32;
    fn get_active_attribute(&self, program: u32, index: u32) -> Option<ActiveAttribute>;
    fn get_attrib_location(&self, program: u32, name: &str) -> Option<u32>;
    fn uniform_block_index(&self, program: u32, name: &str) -> Option<u32>;
    fn uniform_block_binding(&self, program: u32, block_index: u32, binding: u32);
    fn shader_storage_block_index(&self, program: u32, name: &str) -> Option<u32>;
    fn shader_storage_block_binding(&self, program: u32, block_index: u32, binding: u32);
}
