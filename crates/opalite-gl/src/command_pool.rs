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

//! Command buffer recycling.
//!
//! Command buffers execute eagerly against the context, so "submission" is
//! only a recycling point: the pool hands out idle buffers and takes them
//! back once their recording is finished.

use std::cell::RefCell;
use std::rc::Rc;

use crate::command_buffer::GraphicsCommandBuffer;
use crate::compute_command_buffer::ComputeCommandBuffer;
use crate::context::Context;

/// Hands out and recycles command buffers for one context.
pub struct CommandPool {
    ctx: Rc<Context>,
    graphics: RefCell<Vec<GraphicsCommandBuffer>>,
    compute: RefCell<Vec<ComputeCommandBuffer>>,
}

impl CommandPool {
    /// Creates an empty pool.
    pub fn new(ctx: Rc<Context>) -> Self {
        Self {
            ctx,
            graphics: RefCell::new(Vec::new()),
            compute: RefCell::new(Vec::new()),
        }
    }

    /// Takes an idle graphics command buffer, creating one if none is free.
    pub fn acquire_graphics(&self) -> GraphicsCommandBuffer {
        self.graphics
            .borrow_mut()
            .pop()
            .unwrap_or_else(|| GraphicsCommandBuffer::new(self.ctx.clone()))
    }

    /// Returns a graphics command buffer to the pool.
    ///
    /// Buffers still inside a render pass are dropped instead of recycled.
    pub fn submit_graphics(&self, command_buffer: GraphicsCommandBuffer) {
        if command_buffer.is_recording() {
            log::warn!("Submitted a graphics command buffer with an open render pass.");
            return;
        }
        self.graphics.borrow_mut().push(command_buffer);
    }

    /// Takes an idle compute command buffer, creating one if none is free.
    pub fn acquire_compute(&self) -> ComputeCommandBuffer {
        self.compute
            .borrow_mut()
            .pop()
            .unwrap_or_else(|| ComputeCommandBuffer::new(self.ctx.clone()))
    }

    /// Returns a compute command buffer to the pool.
    pub fn submit_compute(&self, command_buffer: ComputeCommandBuffer) {
        if command_buffer.is_recording() {
            log::warn!("Submitted a compute command buffer that is still recording.");
            return;
        }
        self.compute.borrow_mut().push(command_buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingApi;

    #[test]
    fn submitted_buffers_are_recycled() {
        let api = RecordingApi::new();
        let ctx = Context::new(Box::new(api.clone()));
        let pool = CommandPool::new(ctx);

        let cmd = pool.acquire_graphics();
        pool.submit_graphics(cmd);
        api.clear();
        let _again = pool.acquire_graphics();
        // The recycled buffer keeps its vertex array object.
        assert!(api.calls().is_empty());
    }

    #[test]
    fn open_buffers_are_not_recycled() {
        let api = RecordingApi::new();
        let ctx = Context::new(Box::new(api.clone()));
        let pool = CommandPool::new(ctx);

        let mut cmd = pool.acquire_graphics();
        cmd.begin_render_pass(&crate::command_buffer::RenderPassBegin::default());
        pool.submit_graphics(cmd);
        assert!(pool.graphics.borrow().is_empty());
    }
}
