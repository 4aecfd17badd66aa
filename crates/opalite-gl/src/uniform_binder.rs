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

//! Deferred uniform buffer binding.
//!
//! Command buffers stage uniform buffer binds here; the binder flushes only
//! the binding points that changed since the last draw or dispatch.

use std::rc::Rc;

use opalite_core::common::MAX_UNIFORM_BUFFERS;

use crate::buffer::Buffer;

/// Caches uniform buffer bindings and flushes the dirty ones.
#[derive(Default)]
pub struct UniformBinder {
    buffers: [Option<(Rc<Buffer>, usize)>; MAX_UNIFORM_BUFFERS],
    dirty: u32,
}

impl UniformBinder {
    /// Creates an empty binder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages `buffer` at `index` with a byte offset into it.
    pub fn set_buffer(&mut self, index: usize, buffer: Rc<Buffer>, offset: usize) {
        if index >= MAX_UNIFORM_BUFFERS {
            log::warn!("Uniform buffer index {index} out of range.");
            return;
        }
        self.buffers[index] = Some((buffer, offset));
        self.dirty |= 1 << index;
    }

    /// Flushes every staged binding that changed since the last flush.
    pub fn bind_buffers(&mut self) {
        if self.dirty == 0 {
            return;
        }
        for index in 0..MAX_UNIFORM_BUFFERS {
            if self.dirty & (1 << index) == 0 {
                continue;
            }
            if let Some((buffer, offset)) = &self.buffers[index] {
                if *offset > 0 {
                    buffer.bind_range(index as u32, *offset, buffer.size() - offset);
                } else {
                    buffer.bind_base(index as u32);
                }
            }
        }
        self.dirty = 0;
    }

    /// Drops every staged binding and dirty bit.
    pub fn reset(&mut self) {
        self.buffers = Default::default();
        self.dirty = 0;
    }

    /// The mask of binding points staged but not yet flushed.
    pub fn dirty_mask(&self) -> u32 {
        self.dirty
    }
}

#[cfg(test)]
mod tests {
    use opalite_core::buffer::BufferDesc;
    use opalite_core::common::ResourceStorage;

    use super::*;
    use crate::context::Context;
    use crate::gl;
    use crate::testing::RecordingApi;

    fn uniform_buffer(api: &RecordingApi, size: usize) -> Rc<Buffer> {
        let ctx = Context::new(Box::new(api.clone()));
        Rc::new(Buffer::new(ctx, &BufferDesc::uniform(size, ResourceStorage::Shared), None).unwrap())
    }

    #[test]
    fn only_dirty_bindings_are_flushed() {
        let api = RecordingApi::new();
        let buffer = uniform_buffer(&api, 256);
        let mut binder = UniformBinder::new();
        binder.set_buffer(2, buffer.clone(), 0);
        assert_eq!(binder.dirty_mask(), 1 << 2);

        api.clear();
        binder.bind_buffers();
        let calls = api.calls();
        assert!(calls.iter().any(|c| c.starts_with(&format!(
            "bind_buffer_base(target: {:#06x}, index: 2",
            gl::UNIFORM_BUFFER
        ))));
        assert_eq!(binder.dirty_mask(), 0);

        // A second flush with nothing staged touches nothing.
        api.clear();
        binder.bind_buffers();
        assert!(api.calls().is_empty());
    }

    #[test]
    fn nonzero_offsets_bind_a_range() {
        let api = RecordingApi::new();
        let buffer = uniform_buffer(&api, 256);
        let mut binder = UniformBinder::new();
        binder.set_buffer(0, buffer, 64);
        api.clear();
        binder.bind_buffers();
        let calls = api.calls();
        let bind = calls
            .iter()
            .find(|c| c.starts_with("bind_buffer_range"))
            .unwrap();
        assert!(bind.contains("offset: 64"), "{bind}");
        assert!(bind.contains("size: 192"), "{bind}");
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let api = RecordingApi::new();
        let buffer = uniform_buffer(&api, 16);
        let mut binder = UniformBinder::new();
        binder.set_buffer(MAX_UNIFORM_BUFFERS, buffer, 0);
        assert_eq!(binder.dirty_mask(), 0);
    }
}
