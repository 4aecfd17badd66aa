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

//! Vertex input layout description and its fluent builder.

/// The data format of one vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum VertexAttributeFormat {
    Float,
    Float2,
    Float3,
    Float4,
    Int,
    Int2,
    Int3,
    Int4,
    UInt,
    UInt2,
    UInt3,
    UInt4,
    Byte4Norm,
    UByte4Norm,
    Short2Norm,
    UShort2Norm,
    HalfFloat2,
    HalfFloat4,
}

impl VertexAttributeFormat {
    /// Size of one attribute of this format, in bytes.
    pub const fn size(self) -> usize {
        use VertexAttributeFormat::*;
        match self {
            Float | Int | UInt | Byte4Norm | UByte4Norm | Short2Norm | UShort2Norm
            | HalfFloat2 => 4,
            Float2 | Int2 | UInt2 | HalfFloat4 => 8,
            Float3 | Int3 | UInt3 => 12,
            Float4 | Int4 | UInt4 => 16,
        }
    }

    /// Number of components per vertex.
    pub const fn components(self) -> usize {
        use VertexAttributeFormat::*;
        match self {
            Float | Int | UInt => 1,
            Float2 | Int2 | UInt2 | Short2Norm | UShort2Norm | HalfFloat2 => 2,
            Float3 | Int3 | UInt3 => 3,
            Float4 | Int4 | UInt4 | Byte4Norm | UByte4Norm | HalfFloat4 => 4,
        }
    }
}

/// One vertex attribute within a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexAttribute {
    /// The attribute's name in the shader.
    pub name: String,
    /// The attribute's location in the shader, if explicitly assigned.
    pub location: Option<u32>,
    /// The vertex buffer binding the attribute reads from.
    pub binding: u32,
    /// The attribute's data format.
    pub format: VertexAttributeFormat,
    /// Byte offset from the start of one vertex.
    pub offset: usize,
    /// Size of the attribute in bytes.
    pub size: usize,
}

/// One vertex buffer binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexInputBinding {
    /// The binding slot.
    pub binding: u32,
    /// Distance in bytes between consecutive vertices.
    pub stride: usize,
}

/// The complete vertex input layout of a graphics pipeline.
#[derive(Debug, Clone, Default)]
pub struct VertexInputState {
    /// All attributes, across every binding.
    pub attributes: Vec<VertexAttribute>,
    /// All vertex buffer bindings.
    pub bindings: Vec<VertexInputBinding>,
}

impl VertexInputState {
    /// Starts building a vertex input layout.
    pub fn builder() -> VertexInputStateBuilder {
        VertexInputStateBuilder::default()
    }

    /// The stride of a binding, or 0 if the binding is unknown.
    pub fn stride_of(&self, binding: u32) -> usize {
        self.bindings
            .iter()
            .find(|b| b.binding == binding)
            .map(|b| b.stride)
            .unwrap_or(0)
    }

    /// The attributes belonging to one binding, in declaration order.
    pub fn attributes_for(&self, binding: u32) -> impl Iterator<Item = &VertexAttribute> {
        self.attributes.iter().filter(move |a| a.binding == binding)
    }
}

/// Builds a [`VertexInputState`] binding by binding, computing offsets and
/// strides from the declared attribute formats.
#[derive(Debug, Default)]
pub struct VertexInputStateBuilder {
    state: VertexInputState,
    current: Option<VertexInputBinding>,
    current_offset: usize,
}

impl VertexInputStateBuilder {
    /// Opens a new binding. Attributes added afterwards belong to it.
    pub fn begin_binding(mut self, binding: u32) -> Self {
        self.current = Some(VertexInputBinding { binding, stride: 0 });
        self.current_offset = 0;
        self
    }

    /// Adds an attribute to the open binding, resolved by shader name.
    ///
    /// Ignored when no binding is open.
    pub fn attribute(mut self, format: VertexAttributeFormat, name: &str) -> Self {
        let Some(binding) = self.current.as_mut() else {
            return self;
        };
        let size = format.size();
        self.state.attributes.push(VertexAttribute {
            name: name.to_owned(),
            location: None,
            binding: binding.binding,
            format,
            offset: self.current_offset,
            size,
        });
        self.current_offset += size;
        binding.stride += size;
        self
    }

    /// Closes the open binding and records it.
    pub fn end_binding(mut self) -> Self {
        if let Some(binding) = self.current.take() {
            self.state.bindings.push(binding);
        }
        self.current_offset = 0;
        self
    }

    /// Finishes the layout. An unclosed binding is recorded as if
    /// [`end_binding`](Self::end_binding) had been called.
    pub fn build(mut self) -> VertexInputState {
        if let Some(binding) = self.current.take() {
            self.state.bindings.push(binding);
        }
        self.state
    }
}
