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

//! # Opalite GL
//!
//! The OpenGL backend of the Opalite graphics API. It translates the
//! explicit, descriptor-driven model of `opalite-core` — immutable
//! pipelines, recorded command buffers, one-shot framebuffers — onto the
//! stateful immediate-mode driver interface.
//!
//! All native calls funnel through the [`api::GlApi`] trait held by a
//! single [`context::Context`]; command buffers cache bindings and only
//! touch the driver when state actually changed.

pub mod api;
pub mod buffer;
pub mod command_buffer;
pub mod command_pool;
pub mod compute_command_buffer;
pub mod compute_pipeline;
pub mod context;
pub mod conversions;
pub mod depth_stencil;
pub mod device;
pub mod framebuffer;
pub mod gl;
pub mod pipeline;
pub mod reflection;
pub mod sampler;
pub mod shader;
pub mod texture;
pub mod uniform_binder;
pub mod vao;

#[cfg(feature = "backend-glow")]
pub mod glow_context;

#[cfg(test)]
pub(crate) mod testing;
