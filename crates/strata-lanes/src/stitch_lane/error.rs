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

use strata_core::gpu::ResourceError;
use strata_core::terrain::RegionCoord;
use thiserror::Error;

/// Why a staged height context could not be produced or consumed.
#[derive(Debug, Error)]
pub enum StageError {
    /// A planned region was unloaded before the staging task ran.
    #[error("Region {0} was unloaded before staging")]
    RegionUnloaded(RegionCoord),
    /// A region's textures do not have the planned size.
    #[error("Region {coord} is {actual} pixels wide, expected {expected}")]
    RegionSizeMismatch {
        /// The region.
        coord: RegionCoord,
        /// The planned side length.
        expected: u32,
        /// The region's side length.
        actual: u32,
    },
    /// The height array or the metadata buffer could not be allocated.
    #[error("Failed to allocate the {what}: {source}")]
    Allocation {
        /// What was being allocated.
        what: &'static str,
        /// The backend's reason.
        #[source]
        source: ResourceError,
    },
    /// The context was never staged, or another consumer already took it.
    #[error("The height context is not available")]
    ContextUnavailable,
}
