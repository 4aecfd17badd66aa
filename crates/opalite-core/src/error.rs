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

//! Defines the hierarchy of error types for resource construction.
//!
//! Construction of a resource either succeeds fully or fails with one of
//! these errors; binding and drawing misuse after construction degrades to
//! a logged no-op instead and is never reported through this hierarchy.

use std::fmt;

use crate::format::TextureFormat;

/// An error related to shader program linking.
#[derive(Debug)]
pub enum ShaderError {
    /// The driver failed to link the program.
    LinkFailed {
        /// A descriptive label for the program, if available.
        label: String,
        /// The driver's link log.
        details: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::LinkFailed { label, details } => {
                write!(f, "Program link failed for '{label}': {details}")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error related to the construction of a pipeline.
#[derive(Debug)]
pub enum PipelineError {
    /// No shader stages were supplied.
    MissingShaderStages,
    /// The supplied shader stages are of the wrong kind for the pipeline.
    WrongStageKind {
        /// The kind of stages the pipeline requires.
        expected: &'static str,
    },
    /// A shader error occurred while building the pipeline.
    Shader(ShaderError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::MissingShaderStages => {
                write!(f, "Pipeline requires shader stages.")
            }
            PipelineError::WrongStageKind { expected } => {
                write!(f, "Pipeline requires {expected} shader stages.")
            }
            PipelineError::Shader(err) => write!(f, "Pipeline shader error: {err}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Shader(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for PipelineError {
    fn from(err: ShaderError) -> Self {
        PipelineError::Shader(err)
    }
}

/// A framebuffer completeness failure, one variant per driver status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramebufferError {
    /// An attachment is incomplete.
    IncompleteAttachment,
    /// No image is attached.
    MissingAttachment,
    /// A draw buffer references an empty attachment point.
    IncompleteDrawBuffer,
    /// The read buffer references an empty attachment point.
    IncompleteReadBuffer,
    /// The attachment combination is unsupported by the driver.
    Unsupported,
    /// Attachments disagree on sample counts.
    IncompleteMultisample,
    /// Attachments disagree on layering.
    IncompleteLayerTargets,
    /// An unrecognized driver status code.
    Unknown(u32),
}

impl fmt::Display for FramebufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramebufferError::IncompleteAttachment => {
                write!(f, "Framebuffer incomplete: attachment is not complete.")
            }
            FramebufferError::MissingAttachment => {
                write!(f, "Framebuffer incomplete: no image is attached.")
            }
            FramebufferError::IncompleteDrawBuffer => {
                write!(f, "Framebuffer incomplete: draw buffer.")
            }
            FramebufferError::IncompleteReadBuffer => {
                write!(f, "Framebuffer incomplete: read buffer.")
            }
            FramebufferError::Unsupported => {
                write!(f, "Framebuffer incomplete: unsupported attachment combination.")
            }
            FramebufferError::IncompleteMultisample => {
                write!(f, "Framebuffer incomplete: multisample mismatch.")
            }
            FramebufferError::IncompleteLayerTargets => {
                write!(f, "Framebuffer incomplete: layer targets mismatch.")
            }
            FramebufferError::Unknown(code) => {
                write!(f, "Framebuffer incomplete: unknown status {code:#06x}.")
            }
        }
    }
}

impl std::error::Error for FramebufferError {}

/// An error related to buffer construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// A non-host-writable buffer was created without initial data.
    MissingInitialData,
    /// The buffer type mask names no known role.
    UnknownType,
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::MissingInitialData => {
                write!(f, "Static buffers require initial data at creation.")
            }
            BufferError::UnknownType => write!(f, "Buffer type mask names no known role."),
        }
    }
}

impl std::error::Error for BufferError {}

/// An error related to texture construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureError {
    /// The format has no native representation on this backend.
    UnsupportedFormat(TextureFormat),
    /// The texture type is invalid or unsupported.
    InvalidType,
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::UnsupportedFormat(format) => {
                write!(f, "Texture format {format:?} has no native representation.")
            }
            TextureError::InvalidType => write!(f, "Invalid texture type."),
        }
    }
}

impl std::error::Error for TextureError {}
