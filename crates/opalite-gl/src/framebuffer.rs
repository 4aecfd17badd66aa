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

//! Framebuffer objects.
//!
//! A framebuffer is assembled once at construction: attachments are bound,
//! the draw buffer list is set, and completeness is validated. Construction
//! fails with a distinct error per driver incompleteness status. Per-pass
//! work is limited to sRGB toggling, cube face re-attachment, and clears.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use opalite_core::common::Viewport;
use opalite_core::error::FramebufferError;
use opalite_core::pass::{LoadAction, RenderPassDesc, StoreAction};
use opalite_core::texture::TextureType;

use crate::context::Context;
use crate::gl;
use crate::texture::{Texture, TextureBacking};

/// The attachments of a framebuffer.
#[derive(Debug, Clone, Default)]
pub struct FramebufferDesc {
    /// Color attachments by slot index.
    pub color_attachments: BTreeMap<usize, Rc<Texture>>,
    /// The depth attachment, if any.
    pub depth_attachment: Option<Rc<Texture>>,
    /// The stencil attachment, if any.
    pub stencil_attachment: Option<Rc<Texture>>,
}

/// A validated framebuffer object.
pub struct Framebuffer {
    ctx: Rc<Context>,
    handle: u32,
    color_attachments: RefCell<BTreeMap<usize, Rc<Texture>>>,
    depth_attachment: Option<Rc<Texture>>,
    stencil_attachment: Option<Rc<Texture>>,
    active_pass: RefCell<RenderPassDesc>,
}

impl Framebuffer {
    /// Assembles and validates a framebuffer from its attachments.
    pub fn new(ctx: Rc<Context>, desc: FramebufferDesc) -> Result<Self, FramebufferError> {
        let handle = ctx.create_framebuffer();
        ctx.bind_framebuffer(gl::FRAMEBUFFER, handle);

        let mut draw_buffers = Vec::with_capacity(desc.color_attachments.len());
        for (&index, texture) in &desc.color_attachments {
            attach_color(&ctx, index, texture, 0, 0);
            draw_buffers.push(gl::COLOR_ATTACHMENT0 + index as u32);
        }
        ctx.draw_buffers(&draw_buffers);

        if let Some(texture) = &desc.depth_attachment {
            attach_non_color(&ctx, gl::DEPTH_ATTACHMENT, texture);
        }
        if let Some(texture) = &desc.stencil_attachment {
            attach_non_color(&ctx, gl::STENCIL_ATTACHMENT, texture);
        }

        let status = ctx.check_framebuffer_status(gl::FRAMEBUFFER);
        if status != gl::FRAMEBUFFER_COMPLETE {
            ctx.bind_framebuffer(gl::FRAMEBUFFER, 0);
            ctx.delete_framebuffer(handle);
            return Err(status_error(status));
        }

        Ok(Self {
            ctx,
            handle,
            color_attachments: RefCell::new(desc.color_attachments),
            depth_attachment: desc.depth_attachment,
            stencil_attachment: desc.stencil_attachment,
            active_pass: RefCell::new(RenderPassDesc::default()),
        })
    }

    /// The native handle.
    pub fn handle(&self) -> u32 {
        self.handle
    }

    /// The color attachment at `index`, if any.
    pub fn color_attachment(&self, index: usize) -> Option<Rc<Texture>> {
        self.color_attachments.borrow().get(&index).cloned()
    }

    /// The depth attachment, if any.
    pub fn depth_attachment(&self) -> Option<&Rc<Texture>> {
        self.depth_attachment.as_ref()
    }

    /// The stencil attachment, if any.
    pub fn stencil_attachment(&self) -> Option<&Rc<Texture>> {
        self.stencil_attachment.as_ref()
    }

    /// A viewport covering color attachment 0, or the empty viewport.
    pub fn viewport(&self) -> Viewport {
        match self.color_attachment(0) {
            Some(texture) => Viewport::new(
                0.0,
                0.0,
                texture.desc().width as f32,
                texture.desc().height as f32,
            ),
            None => Viewport::default(),
        }
    }

    /// Replaces (or detaches) color attachment 0.
    ///
    /// Used by presentation layers that rotate the drawable each frame;
    /// other attachments are untouched and completeness is unchanged by
    /// swapping same-shape drawables.
    pub fn update_drawable(&self, drawable: Option<Rc<Texture>>) {
        let mut colors = self.color_attachments.borrow_mut();
        match drawable {
            None => {
                if let Some(current) = colors.remove(&0) {
                    self.ctx.bind_framebuffer(gl::FRAMEBUFFER, self.handle);
                    detach_color(&self.ctx, 0, &current);
                }
            }
            Some(texture) => {
                self.ctx.bind_framebuffer(gl::FRAMEBUFFER, self.handle);
                attach_color(&self.ctx, 0, &texture, 0, 0);
                colors.insert(0, texture);
            }
        }
    }

    /// Binds the framebuffer and performs the pass's begin work: sRGB
    /// state, cube face re-attachment, and load-action clears.
    pub fn bind_for_render_pass(&self, render_pass: &RenderPassDesc) {
        *self.active_pass.borrow_mut() = render_pass.clone();

        self.ctx.bind_framebuffer(gl::FRAMEBUFFER, self.handle);

        let colors = self.color_attachments.borrow();
        for (&index, texture) in colors.iter() {
            if texture.properties().is_srgb() {
                self.ctx.enable(gl::FRAMEBUFFER_SRGB);
            } else {
                self.ctx.disable(gl::FRAMEBUFFER_SRGB);
            }
            if texture.desc().texture_type == TextureType::Cube {
                let attachment = render_pass.color_attachment(index);
                attach_color(&self.ctx, index, texture, attachment.layer, attachment.mip_level);
            }
        }

        // Clears only land while the matching write masks are open.
        let mut clear_mask = 0;
        let color0 = render_pass.color_attachment(0);
        if colors.contains_key(&0) && color0.load_action == LoadAction::Clear {
            clear_mask |= gl::COLOR_BUFFER_BIT;
            self.ctx.color_mask(true, true, true, true);
            let c = color0.clear_color;
            self.ctx.clear_color(c.r, c.g, c.b, c.a);
        }
        if self.depth_attachment.is_some()
            && render_pass.depth_attachment.load_action == LoadAction::Clear
        {
            clear_mask |= gl::DEPTH_BUFFER_BIT;
            self.ctx.depth_mask(true);
            self.ctx.clear_depth(render_pass.depth_attachment.clear_depth);
        }
        if self.stencil_attachment.is_some()
            && render_pass.stencil_attachment.load_action == LoadAction::Clear
        {
            clear_mask |= gl::STENCIL_BUFFER_BIT;
            self.ctx.stencil_mask(0xFF);
            self.ctx
                .clear_stencil(render_pass.stencil_attachment.clear_stencil as i32);
        }
        if clear_mask != 0 {
            self.ctx.clear(clear_mask);
        }
    }

    /// Ends the active pass: attachments whose store action discards their
    /// contents are invalidated so tiled drivers can skip the writeback.
    pub fn unbind(&self) {
        let pass = self.active_pass.borrow();
        let mut attachments: Vec<u32> = Vec::with_capacity(3);

        if self.color_attachments.borrow().contains_key(&0)
            && pass.color_attachment(0).store_action != StoreAction::Store
        {
            attachments.push(gl::COLOR_ATTACHMENT0);
        }
        if self.depth_attachment.is_some()
            && pass.depth_attachment.store_action != StoreAction::Store
        {
            attachments.push(gl::DEPTH_ATTACHMENT);
        }
        if self.stencil_attachment.is_some() {
            self.ctx.disable(gl::STENCIL_TEST);
            if pass.stencil_attachment.store_action != StoreAction::Store {
                attachments.push(gl::STENCIL_ATTACHMENT);
            }
        }

        if !attachments.is_empty() {
            self.ctx.invalidate_framebuffer(gl::FRAMEBUFFER, &attachments);
        }
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        self.ctx.delete_framebuffer(self.handle);
    }
}

impl std::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Framebuffer")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

fn attach_color(ctx: &Context, index: usize, texture: &Texture, face: usize, mip_level: usize) {
    let attachment = gl::COLOR_ATTACHMENT0 + index as u32;
    match texture.backing() {
        TextureBacking::Renderbuffer { handle } => {
            ctx.framebuffer_renderbuffer(gl::FRAMEBUFFER, attachment, gl::RENDERBUFFER, handle);
        }
        TextureBacking::Texture { handle, target } => {
            let target = if target == gl::TEXTURE_CUBE_MAP {
                gl::TEXTURE_CUBE_MAP_POSITIVE_X + face as u32
            } else {
                target
            };
            ctx.framebuffer_texture_2d(
                gl::FRAMEBUFFER,
                attachment,
                target,
                handle,
                mip_level as i32,
            );
        }
    }
}

fn detach_color(ctx: &Context, index: usize, texture: &Texture) {
    let attachment = gl::COLOR_ATTACHMENT0 + index as u32;
    match texture.backing() {
        TextureBacking::Renderbuffer { .. } => {
            ctx.framebuffer_renderbuffer(gl::FRAMEBUFFER, attachment, gl::RENDERBUFFER, 0);
        }
        TextureBacking::Texture { .. } => {
            ctx.framebuffer_texture_2d(gl::FRAMEBUFFER, attachment, gl::TEXTURE_2D, 0, 0);
        }
    }
}

fn attach_non_color(ctx: &Context, attachment: u32, texture: &Texture) {
    match texture.backing() {
        TextureBacking::Renderbuffer { handle } => {
            ctx.framebuffer_renderbuffer(gl::FRAMEBUFFER, attachment, gl::RENDERBUFFER, handle);
        }
        TextureBacking::Texture { handle, target } => {
            let target = if target == gl::TEXTURE_CUBE_MAP {
                gl::TEXTURE_2D
            } else {
                target
            };
            ctx.framebuffer_texture_2d(gl::FRAMEBUFFER, attachment, target, handle, 0);
        }
    }
}

fn status_error(status: u32) -> FramebufferError {
    match status {
        gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => FramebufferError::IncompleteAttachment,
        gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => FramebufferError::MissingAttachment,
        gl::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => FramebufferError::IncompleteDrawBuffer,
        gl::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => FramebufferError::IncompleteReadBuffer,
        gl::FRAMEBUFFER_UNSUPPORTED => FramebufferError::Unsupported,
        gl::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => FramebufferError::IncompleteMultisample,
        gl::FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS => FramebufferError::IncompleteLayerTargets,
        other => FramebufferError::Unknown(other),
    }
}
