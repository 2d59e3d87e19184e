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

//! Cross-region height stitching.
//!
//! Staging copies every loaded region under a layer into one texture array
//! and describes how the slices touch each other. The stitch dispatch then
//! samples that array as if it were one seamless height field.

mod context;
mod error;
mod kernel;
mod metadata;
mod operation;
mod sampling;
mod stager;

pub use self::context::{HeightContext, HeightContextHandle};
pub use self::error::StageError;
pub use self::kernel::StitchHeightKernel;
pub use self::metadata::{StitchMetadata, StitchParams};
pub use self::operation::StitchOperation;
pub use self::sampling::sample_height_stitched;
pub use self::stager::{HeightContextStager, StagePlan};
