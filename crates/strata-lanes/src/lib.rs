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

//! # Strata Lanes
//!
//! Hot-path building blocks that planning code uses to turn edits into GPU work.
//!
//! - **[`compute_lane`]**: [`ComputeOperationBuilder`], which binds resources,
//!   packs parameters, and produces a recordable dispatch.
//! - **[`stitch_lane`]**: [`HeightContextStager`], which gathers the heights of
//!   every region under a layer into one texture array, and the companion
//!   stitch dispatch that samples across region boundaries.
//! - **[`shaders`]**: the kernel names and binding slots shared with backends.

#![warn(missing_docs)]

pub mod compute_lane;
pub mod shaders;
pub mod stitch_lane;

pub use compute_lane::{BuildError, ComputeOperation, ComputeOperationBuilder, ParameterBlock};
pub use stitch_lane::{
    sample_height_stitched, HeightContext, HeightContextHandle, HeightContextStager, StageError,
    StagePlan, StitchHeightKernel, StitchMetadata, StitchOperation, StitchParams,
};
