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

//! Program introspection, performed once per pipeline.
//!
//! The active uniform and attribute tables are enumerated at pipeline
//! construction and resolved to locations; after that no name lookup ever
//! reaches the driver again.

use std::collections::HashMap;

use crate::context::Context;

/// The resolved location and type of one active uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformInfo {
    /// The uniform's location.
    pub location: i32,
    /// Array size (1 for non-arrays).
    pub size: i32,
    /// The native type enum.
    pub utype: u32,
}

/// The name-to-location tables of a linked program.
#[derive(Debug, Default)]
pub struct PipelineReflection {
    uniforms: HashMap<String, UniformInfo>,
    attributes: HashMap<String, u32>,
}

impl PipelineReflection {
    /// Enumerates the active uniforms and attributes of `program`.
    pub fn new(ctx: &Context, program: u32) -> Self {
        let mut uniforms = HashMap::new();
        for index in 0..ctx.num_active_uniforms(program) {
            let Some(uniform) = ctx.get_active_uniform(program, index) else {
                continue;
            };
            // Uniform block members are active but have no location; they
            // are addressed through their block binding instead.
            let Some(location) = ctx.get_uniform_location(program, &uniform.name) else {
                continue;
            };
            let name = uniform
                .name
                .strip_suffix("[0]")
                .unwrap_or(&uniform.name)
                .to_owned();
            uniforms.insert(
                name,
                UniformInfo {
                    location,
                    size: uniform.size,
                    utype: uniform.utype,
                },
            );
        }

        let mut attributes = HashMap::new();
        for index in 0..ctx.num_active_attributes(program) {
            let Some(attribute) = ctx.get_active_attribute(program, index) else {
                continue;
            };
            // Built-in attributes report no bindable location.
            let Some(location) = ctx.get_attrib_location(program, &attribute.name) else {
                continue;
            };
            attributes.insert(attribute.name, location);
        }

        Self { uniforms, attributes }
    }

    /// The location of a uniform, if the program has it.
    pub fn location(&self, name: &str) -> Option<i32> {
        self.uniforms.get(name).map(|info| info.location)
    }

    /// Full info of a uniform, if the program has it.
    pub fn uniform(&self, name: &str) -> Option<&UniformInfo> {
        self.uniforms.get(name)
    }

    /// The location of a vertex attribute, if the program has it.
    pub fn attribute_location(&self, name: &str) -> Option<u32> {
        self.attributes.get(name).copied()
    }

    /// Number of resolved uniforms.
    pub fn num_uniforms(&self) -> usize {
        self.uniforms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingApi;

    #[test]
    fn block_members_are_skipped() {
        let api = RecordingApi::new();
        api.add_uniform("u_albedo", 0, 1, 0x8B5E);
        api.add_block_member("Lights.color");
        let ctx = Context::new(Box::new(api.clone()));
        let reflection = PipelineReflection::new(&ctx, 1);
        assert_eq!(reflection.location("u_albedo"), Some(0));
        assert_eq!(reflection.location("Lights.color"), None);
        assert_eq!(reflection.num_uniforms(), 1);
    }

    #[test]
    fn array_suffix_is_stripped() {
        let api = RecordingApi::new();
        api.add_uniform("u_bones[0]", 4, 16, 0x8B5C);
        let ctx = Context::new(Box::new(api.clone()));
        let reflection = PipelineReflection::new(&ctx, 1);
        let info = reflection.uniform("u_bones").unwrap();
        assert_eq!(info.location, 4);
        assert_eq!(info.size, 16);
        assert_eq!(reflection.location("u_bones[0]"), None);
    }

    #[test]
    fn attributes_resolve_to_locations() {
        let api = RecordingApi::new();
        api.add_attribute("a_position", 0);
        api.add_attribute("a_uv", 2);
        let ctx = Context::new(Box::new(api.clone()));
        let reflection = PipelineReflection::new(&ctx, 1);
        assert_eq!(reflection.attribute_location("a_position"), Some(0));
        assert_eq!(reflection.attribute_location("a_uv"), Some(2));
        assert_eq!(reflection.attribute_location("a_missing"), None);
    }
}
