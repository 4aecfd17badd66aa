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

//! A minimal vertex array object wrapper.
//!
//! Core-profile drivers require a bound vertex array before any attribute
//! pointer call; each graphics command buffer owns one and binds it when a
//! render pass begins.

use std::rc::Rc;

use crate::context::Context;

/// A native vertex array object.
#[derive(Debug)]
pub struct VertexArrayObject {
    ctx: Rc<Context>,
    handle: u32,
}

impl VertexArrayObject {
    /// Creates a new vertex array object.
    pub fn new(ctx: Rc<Context>) -> Self {
        let handle = ctx.create_vertex_array();
        Self { ctx, handle }
    }

    /// Makes this vertex array current.
    pub fn bind(&self) {
        self.ctx.bind_vertex_array(self.handle);
    }

    /// The native handle.
    pub fn handle(&self) -> u32 {
        self.handle
    }
}

impl Drop for VertexArrayObject {
    fn drop(&mut self) {
        self.ctx.delete_vertex_array(self.handle);
    }
}
