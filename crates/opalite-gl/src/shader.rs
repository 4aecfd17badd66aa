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

//! Shader modules and linked program stages.
//!
//! Shader source compilation happens outside the backend; a module wraps a
//! native shader handle that is already compiled. Linking the modules into
//! a program is the backend's job and the only step that can fail here.

use std::rc::Rc;

use opalite_core::error::ShaderError;

use crate::context::Context;

/// The pipeline stage a shader module targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex processing.
    Vertex,
    /// Fragment shading.
    Fragment,
    /// Geometry amplification.
    Geometry,
    /// Compute dispatch.
    Compute,
}

/// A compiled shader for one stage.
#[derive(Debug, Clone, Copy)]
pub struct ShaderModule {
    handle: u32,
    stage: ShaderStage,
}

impl ShaderModule {
    /// Wraps a native handle to an already-compiled shader.
    pub fn from_raw(handle: u32, stage: ShaderStage) -> Self {
        Self { handle, stage }
    }

    /// The stage the module targets.
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// The native handle.
    pub fn handle(&self) -> u32 {
        self.handle
    }
}

/// Which kind of pipeline a linked program serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStagesKind {
    /// Vertex/fragment (and optionally geometry) stages.
    Graphics,
    /// A single compute stage.
    Compute,
}

/// A linked native program.
#[derive(Debug)]
pub struct ShaderStages {
    ctx: Rc<Context>,
    program: u32,
    kind: ShaderStagesKind,
}

impl ShaderStages {
    /// Links graphics stage modules into a program.
    pub fn new_graphics(
        ctx: Rc<Context>,
        modules: &[ShaderModule],
        label: &str,
    ) -> Result<Self, ShaderError> {
        Self::link(ctx, modules, label, ShaderStagesKind::Graphics)
    }

    /// Links a compute module into a program.
    pub fn new_compute(
        ctx: Rc<Context>,
        module: ShaderModule,
        label: &str,
    ) -> Result<Self, ShaderError> {
        Self::link(ctx, &[module], label, ShaderStagesKind::Compute)
    }

    fn link(
        ctx: Rc<Context>,
        modules: &[ShaderModule],
        label: &str,
        kind: ShaderStagesKind,
    ) -> Result<Self, ShaderError> {
        let program = ctx.create_program();
        for module in modules {
            ctx.attach_shader(program, module.handle());
        }
        ctx.link_program(program);
        if !ctx.get_link_status(program) {
            let details = ctx.get_program_info_log(program);
            ctx.delete_program(program);
            return Err(ShaderError::LinkFailed {
                label: label.to_owned(),
                details,
            });
        }
        Ok(Self { ctx, program, kind })
    }

    /// The native program handle.
    pub fn program(&self) -> u32 {
        self.program
    }

    /// Which kind of pipeline the program serves.
    pub fn kind(&self) -> ShaderStagesKind {
        self.kind
    }

    /// Makes the program current.
    pub fn bind(&self) {
        self.ctx.use_program(self.program);
    }

    /// Clears the current program.
    pub fn unbind(&self) {
        self.ctx.use_program(0);
    }
}

impl Drop for ShaderStages {
    fn drop(&mut self) {
        self.ctx.delete_program(self.program);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingApi;

    #[test]
    fn linking_attaches_every_module() {
        let api = RecordingApi::new();
        let ctx = Context::new(Box::new(api.clone()));
        let modules = [
            ShaderModule::from_raw(11, ShaderStage::Vertex),
            ShaderModule::from_raw(12, ShaderStage::Fragment),
        ];
        let stages = ShaderStages::new_graphics(ctx, &modules, "forward").unwrap();
        assert_eq!(stages.kind(), ShaderStagesKind::Graphics);
        let calls = api.calls();
        assert!(calls.iter().any(|c| c.contains("shader: 11")));
        assert!(calls.iter().any(|c| c.contains("shader: 12")));
        assert!(calls.iter().any(|c| c.starts_with("link_program")));
    }

    #[test]
    fn link_failure_reports_the_label_and_log() {
        let api = RecordingApi::new();
        api.fail_next_link("floating point suffix");
        let ctx = Context::new(Box::new(api.clone()));
        let module = ShaderModule::from_raw(7, ShaderStage::Compute);
        let err = ShaderStages::new_compute(ctx, module, "particles").unwrap_err();
        match err {
            ShaderError::LinkFailed { label, details } => {
                assert_eq!(label, "particles");
                assert_eq!(details, "floating point suffix");
            }
        }
        // The failed program is not leaked.
        assert!(api.calls().iter().any(|c| c.starts_with("delete_program")));
    }
}
