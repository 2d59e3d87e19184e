// Copyright 2025 eraflo
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

//! Defines the hierarchy of error types for the GPU subsystem.

use std::fmt;

/// An error related to obtaining a compute pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// No shader with the requested name is known to the backend.
    ShaderNotFound {
        /// The shader name that was requested.
        name: String,
    },
    /// The shader exists but the backend failed to build a pipeline from it.
    CompilationFailed {
        /// The shader name.
        name: String,
        /// Detailed error messages from the backend.
        details: String,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::ShaderNotFound { name } => {
                write!(f, "Compute shader '{name}' is not available")
            }
            PipelineError::CompilationFailed { name, details } => {
                write!(f, "Pipeline compilation failed for '{name}': {details}")
            }
        }
    }
}

impl std::error::Error for PipelineError {}

/// An error raised by a compute kernel while it accesses its bound resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// Nothing is bound at the requested slot.
    UnboundSlot(u32),
    /// The resource at the slot cannot be accessed the requested way.
    WrongBindingKind {
        /// The slot.
        binding: u32,
        /// What the kernel expected to find there.
        expected: &'static str,
    },
    /// A texel access fell outside the bound image.
    OutOfBounds {
        /// The slot.
        binding: u32,
        /// The accessed texel, `[x, y, layer]`.
        texel: [u32; 3],
    },
    /// The parameter block or a buffer did not have the expected layout.
    InvalidParameters(String),
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::UnboundSlot(slot) => write!(f, "Nothing is bound at slot {slot}"),
            KernelError::WrongBindingKind { binding, expected } => {
                write!(f, "Slot {binding} does not hold a {expected}")
            }
            KernelError::OutOfBounds { binding, texel } => write!(
                f,
                "Texel ({}, {}, layer {}) is outside the image at slot {binding}",
                texel[0], texel[1], texel[2]
            ),
            KernelError::InvalidParameters(msg) => write!(f, "Invalid kernel parameters: {msg}"),
        }
    }
}

impl std::error::Error for KernelError {}

/// An error related to the creation or use of a GPU resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// A pipeline-specific error occurred.
    Pipeline(PipelineError),
    /// A kernel failed while a submitted command list executed.
    Kernel(KernelError),
    /// The handle does not name a live resource.
    NotFound,
    /// The backend could not allocate the resource.
    OutOfMemory {
        /// A description of what was being allocated.
        requested: String,
    },
    /// The supplied data does not match the resource's shape.
    SizeMismatch {
        /// The expected size in bytes.
        expected: u64,
        /// The provided size in bytes.
        actual: u64,
    },
    /// An attempt was made to access a resource out of its bounds.
    OutOfBounds,
    /// An error originating from the specific backend implementation.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Pipeline(err) => write!(f, "Pipeline resource error: {err}"),
            ResourceError::Kernel(err) => write!(f, "Kernel execution error: {err}"),
            ResourceError::NotFound => write!(f, "Resource not found with ID."),
            ResourceError::OutOfMemory { requested } => {
                write!(f, "Out of GPU memory while allocating {requested}")
            }
            ResourceError::SizeMismatch { expected, actual } => {
                write!(f, "Data size mismatch: expected {expected} bytes, got {actual}")
            }
            ResourceError::OutOfBounds => write!(f, "Resource access out of bounds."),
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Pipeline(err) => Some(err),
            ResourceError::Kernel(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PipelineError> for ResourceError {
    fn from(err: PipelineError) -> Self {
        ResourceError::Pipeline(err)
    }
}

impl From<KernelError> for ResourceError {
    fn from(err: KernelError) -> Self {
        ResourceError::Kernel(err)
    }
}
