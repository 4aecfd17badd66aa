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

//! The backend context: the single owner of the driver dispatch table.

use std::ops::Deref;
use std::rc::Rc;

use crate::api::GlApi;

/// Owns the driver dispatch table for one native context.
///
/// Every backend object holds an `Rc<Context>` and issues its driver calls
/// through it. The context is not `Send`; a native context is only current
/// on the thread that created it, and the whole backend inherits that model.
pub struct Context {
    api: Box<dyn GlApi>,
}

impl Context {
    /// Wraps a driver dispatch implementation.
    pub fn new(api: Box<dyn GlApi>) -> Rc<Self> {
        Rc::new(Self { api })
    }
}

impl Deref for Context {
    type Target = dyn GlApi;

    fn deref(&self) -> &Self::Target {
        self.api.as_ref()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context").finish_non_exhaustive()
    }
}
