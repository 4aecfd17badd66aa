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

//! # Opalite Core
//!
//! Backend-agnostic building blocks of the Opalite graphics API: resource
//! descriptors, immutable pipeline state descriptions, render pass
//! descriptions, texture format layout arithmetic, and the error hierarchy.
//!
//! Everything in this crate is plain data. Backends (such as `opalite-gl`)
//! consume these types and translate them into native driver calls.

#![warn(missing_docs)]

pub mod bitflags;
pub mod buffer;
pub mod common;
pub mod error;
pub mod format;
pub mod pass;
pub mod pipeline;
pub mod sampler;
pub mod texture;
pub mod vertex;
