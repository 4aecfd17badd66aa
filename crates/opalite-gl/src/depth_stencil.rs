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

//! Immutable depth/stencil state objects.

use std::rc::Rc;

use opalite_core::pipeline::{CompareOp, DepthStencilDesc, StencilDesc};

use crate::context::Context;
use crate::conversions::IntoGl;
use crate::gl;

/// Captured depth/stencil configuration, applied as one unit.
#[derive(Debug)]
pub struct DepthStencilState {
    ctx: Rc<Context>,
    desc: DepthStencilDesc,
}

impl DepthStencilState {
    /// Captures a depth/stencil descriptor.
    pub fn new(ctx: Rc<Context>, desc: &DepthStencilDesc) -> Self {
        Self { ctx, desc: *desc }
    }

    /// The descriptor the state was created from.
    pub fn desc(&self) -> &DepthStencilDesc {
        &self.desc
    }

    /// Applies the captured state to the driver.
    ///
    /// The depth test stays enabled while writes are on even if the compare
    /// function always passes, because disabling the test would also
    /// discard the writes. Stencil configuration is only written while the
    /// stencil test is enabled; enabling it belongs to render pass setup.
    pub fn bind(&self) {
        let depth = &self.desc.depth;
        self.ctx.depth_mask(depth.write_enabled);
        if depth.write_enabled || depth.compare_op != CompareOp::Always {
            self.ctx.enable(gl::DEPTH_TEST);
            let func: u32 = depth.compare_op.into_gl();
            self.ctx.depth_func(func);
        } else {
            self.ctx.disable(gl::DEPTH_TEST);
        }

        if self.ctx.is_enabled(gl::STENCIL_TEST) {
            self.apply_stencil_face(gl::FRONT, &self.desc.stencil_front);
            self.apply_stencil_face(gl::BACK, &self.desc.stencil_back);
        }
    }

    fn apply_stencil_face(&self, face: u32, stencil: &StencilDesc) {
        let func: u32 = stencil.compare_op.into_gl();
        self.ctx
            .stencil_func_separate(face, func, 0, stencil.read_mask);
        let fail: u32 = stencil.fail_op.into_gl();
        let depth_fail: u32 = stencil.depth_fail_op.into_gl();
        let pass: u32 = stencil.pass_op.into_gl();
        self.ctx.stencil_op_separate(face, fail, depth_fail, pass);
        self.ctx.stencil_mask_separate(face, stencil.write_mask);
    }
}
