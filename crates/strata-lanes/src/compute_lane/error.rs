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

use super::PARAMETER_ALIGNMENT;
use strata_core::gpu::{PipelineError, ResourceError};
use thiserror::Error;

/// Why a compute dispatch could not be built.
///
/// A failed build never leaves resources behind: everything the builder had
/// allocated is destroyed before the error is returned.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The shader failed to load or its pipeline failed to build.
    #[error("Compute pipeline '{shader}' is unavailable: {source}")]
    PipelineUnavailable {
        /// The requested shader.
        shader: String,
        /// The backend's reason.
        #[source]
        source: PipelineError,
    },
    /// A buffer, sampler, or the bind group could not be allocated.
    #[error("Failed to allocate the {what} of '{shader}': {source}")]
    Allocation {
        /// The requested shader.
        shader: String,
        /// What was being allocated.
        what: String,
        /// The backend's reason.
        #[source]
        source: ResourceError,
    },
    /// The parameter block size is not a multiple of the required alignment.
    #[error("Parameter block of {len} bytes is not a multiple of {align} bytes", align = PARAMETER_ALIGNMENT)]
    MisalignedParameters {
        /// The block size in bytes.
        len: usize,
    },
    /// The same slot was bound twice.
    #[error("Binding slot {0} was bound twice")]
    DuplicateBinding(u32),
    /// `dispatch_extent` was never called.
    #[error("No dispatch extent was set for '{0}'")]
    MissingDispatchExtent(String),
}
