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

//! Native buffer objects.

use std::rc::Rc;

use opalite_core::buffer::{BufferDesc, BufferType};
use opalite_core::error::BufferError;

use crate::context::Context;
use crate::gl;

/// The single native role a buffer was created for.
///
/// A descriptor may name several roles through its type mask; the backend
/// picks one target, preferring the most specific binding semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    /// Vertex attribute data.
    Vertex,
    /// Index data.
    Index,
    /// Uniform block data.
    Uniform,
    /// Shader storage data.
    Storage,
}

/// A buffer resource backed by a native buffer object.
#[derive(Debug)]
pub struct Buffer {
    ctx: Rc<Context>,
    handle: u32,
    target: u32,
    kind: BufferKind,
    size: usize,
    dynamic: bool,
}

impl Buffer {
    /// Creates a buffer, optionally filled with initial data.
    ///
    /// Buffers whose storage is not host-writable are immutable after
    /// creation and therefore require initial data.
    pub fn new(
        ctx: Rc<Context>,
        desc: &BufferDesc,
        data: Option<&[u8]>,
    ) -> Result<Self, BufferError> {
        let kind = if desc.buffer_type.contains(BufferType::STORAGE) {
            BufferKind::Storage
        } else if desc.buffer_type.contains(BufferType::UNIFORM) {
            BufferKind::Uniform
        } else if desc.buffer_type.contains(BufferType::VERTEX) {
            BufferKind::Vertex
        } else if desc.buffer_type.contains(BufferType::INDEX) {
            BufferKind::Index
        } else {
            return Err(BufferError::UnknownType);
        };

        let dynamic = desc.storage.is_host_writable();
        if !dynamic && data.is_none() {
            return Err(BufferError::MissingInitialData);
        }

        let target = match kind {
            BufferKind::Vertex => gl::ARRAY_BUFFER,
            BufferKind::Index => gl::ELEMENT_ARRAY_BUFFER,
            BufferKind::Uniform => gl::UNIFORM_BUFFER,
            BufferKind::Storage => gl::SHADER_STORAGE_BUFFER,
        };
        let usage = if dynamic { gl::DYNAMIC_DRAW } else { gl::STATIC_DRAW };

        let handle = ctx.create_buffer();
        ctx.bind_buffer(target, handle);
        match data {
            Some(data) => ctx.buffer_data(target, data, usage),
            None => ctx.buffer_data_size(target, desc.size as i32, usage),
        }
        ctx.bind_buffer(target, 0);

        Ok(Self {
            ctx,
            handle,
            target,
            kind,
            size: desc.size,
            dynamic,
        })
    }

    /// The role the buffer was created for.
    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    /// The native binding target.
    pub fn target(&self) -> u32 {
        self.target
    }

    /// The buffer's size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The native handle.
    pub fn handle(&self) -> u32 {
        self.handle
    }

    /// Rewrites buffer contents starting at `offset`.
    ///
    /// Ignored with a warning for buffers that are not host-writable.
    pub fn upload(&self, data: &[u8], offset: usize) {
        if !self.dynamic {
            log::warn!("Ignoring upload to non-host-writable buffer.");
            return;
        }
        self.ctx.bind_buffer(self.target, self.handle);
        if offset == 0 && data.len() >= self.size {
            // Full rewrite; orphan the old storage instead of waiting on it.
            self.ctx.buffer_data(self.target, data, gl::DYNAMIC_DRAW);
        } else {
            self.ctx.buffer_sub_data(self.target, offset as i32, data);
        }
        self.ctx.bind_buffer(self.target, 0);
    }

    /// Binds the buffer to its native target.
    pub fn bind(&self) {
        self.ctx.bind_buffer(self.target, self.handle);
    }

    /// Unbinds the buffer's native target.
    pub fn unbind(&self) {
        self.ctx.bind_buffer(self.target, 0);
    }

    /// Binds the whole buffer to an indexed binding point.
    ///
    /// Only uniform and storage buffers have indexed binding points; other
    /// kinds are ignored with a warning.
    pub fn bind_base(&self, index: u32) {
        if !self.has_indexed_target() {
            log::warn!("Buffer target {:#06x} has no indexed binding points.", self.target);
            return;
        }
        self.ctx.bind_buffer_base(self.target, index, self.handle);
    }

    /// Binds a byte range of the buffer to an indexed binding point.
    pub fn bind_range(&self, index: u32, offset: usize, size: usize) {
        if !self.has_indexed_target() {
            log::warn!("Buffer target {:#06x} has no indexed binding points.", self.target);
            return;
        }
        self.ctx
            .bind_buffer_range(self.target, index, self.handle, offset as i32, size as i32);
    }

    fn has_indexed_target(&self) -> bool {
        matches!(self.target, gl::UNIFORM_BUFFER | gl::SHADER_STORAGE_BUFFER)
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        self.ctx.delete_buffer(self.handle);
    }
}
