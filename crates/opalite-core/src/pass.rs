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

//! Render pass descriptions: load/store actions and clear values.

use crate::common::Color;

/// What happens to an attachment's contents when a pass begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadAction {
    /// Previous contents are undefined.
    #[default]
    DontCare,
    /// Previous contents are preserved.
    Load,
    /// The attachment is cleared to the pass's clear value.
    Clear,
}

/// What happens to an attachment's contents when a pass ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreAction {
    /// Contents may be discarded.
    #[default]
    DontCare,
    /// Contents are written out.
    Store,
    /// Multisampled contents are resolved and then discarded.
    MsaaResolve,
}

/// Per-pass configuration of one color attachment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorAttachmentDesc {
    /// Load action at pass begin.
    pub load_action: LoadAction,
    /// Store action at pass end.
    pub store_action: StoreAction,
    /// Clear color used when the load action is [`LoadAction::Clear`].
    pub clear_color: Color,
    /// Array layer (or cube face) rendered into.
    pub layer: usize,
    /// Mip level rendered into.
    pub mip_level: usize,
}

/// Per-pass configuration of the depth attachment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthAttachmentDesc {
    /// Load action at pass begin.
    pub load_action: LoadAction,
    /// Store action at pass end.
    pub store_action: StoreAction,
    /// Clear depth used when the load action is [`LoadAction::Clear`].
    pub clear_depth: f32,
}

impl Default for DepthAttachmentDesc {
    fn default() -> Self {
        Self {
            load_action: LoadAction::DontCare,
            store_action: StoreAction::DontCare,
            clear_depth: 1.0,
        }
    }
}

/// Per-pass configuration of the stencil attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StencilAttachmentDesc {
    /// Load action at pass begin.
    pub load_action: LoadAction,
    /// Store action at pass end.
    pub store_action: StoreAction,
    /// Clear value used when the load action is [`LoadAction::Clear`].
    pub clear_stencil: u32,
}

/// Describes one render pass over a framebuffer (or the default drawable).
#[derive(Debug, Clone, Default)]
pub struct RenderPassDesc {
    /// Color attachment configurations, indexed by attachment slot.
    pub color_attachments: Vec<ColorAttachmentDesc>,
    /// Depth attachment configuration.
    pub depth_attachment: DepthAttachmentDesc,
    /// Stencil attachment configuration.
    pub stencil_attachment: StencilAttachmentDesc,
}

impl RenderPassDesc {
    /// A pass clearing a single color attachment to the given color.
    pub fn clear_color(color: Color) -> Self {
        Self {
            color_attachments: vec![ColorAttachmentDesc {
                load_action: LoadAction::Clear,
                store_action: StoreAction::Store,
                clear_color: color,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    /// The configuration of color attachment `index`, defaulted if absent.
    pub fn color_attachment(&self, index: usize) -> ColorAttachmentDesc {
        self.color_attachments.get(index).copied().unwrap_or_default()
    }
}
