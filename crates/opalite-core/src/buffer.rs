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

//! Buffer resource descriptors.

use crate::common::ResourceStorage;
use crate::opalite_bitflags;

opalite_bitflags! {
    /// The roles a buffer may be bound for.
    pub struct BufferType: u8 {
        /// Vertex attribute data.
        const VERTEX = 1 << 0;
        /// Index data for indexed draws.
        const INDEX = 1 << 1;
        /// Uniform block data.
        const UNIFORM = 1 << 2;
        /// Shader storage data.
        const STORAGE = 1 << 3;
    }
}

/// Describes a buffer to be created by a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferDesc {
    /// The roles the buffer will be bound for.
    pub buffer_type: BufferType,
    /// Size of the buffer in bytes.
    pub size: usize,
    /// Where the buffer's memory lives.
    pub storage: ResourceStorage,
}

impl BufferDesc {
    /// Describes a vertex buffer.
    pub fn vertex(size: usize, storage: ResourceStorage) -> Self {
        Self { buffer_type: BufferType::VERTEX, size, storage }
    }

    /// Describes an index buffer.
    pub fn index(size: usize, storage: ResourceStorage) -> Self {
        Self { buffer_type: BufferType::INDEX, size, storage }
    }

    /// Describes a uniform buffer.
    pub fn uniform(size: usize, storage: ResourceStorage) -> Self {
        Self { buffer_type: BufferType::UNIFORM, size, storage }
    }

    /// Describes a shader storage buffer.
    pub fn storage(size: usize, storage: ResourceStorage) -> Self {
        Self { buffer_type: BufferType::STORAGE, size, storage }
    }
}
