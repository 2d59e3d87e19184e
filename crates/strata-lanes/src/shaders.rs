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

//! Names and binding layouts of the compute kernels used by the lanes.
//!
//! Backends build pipelines by name; the binding constants are the slots the
//! corresponding kernel expects its resources at.

/// Samples a staged height array across region boundaries into one output image.
///
/// Bindings: [`STITCH_HEIGHT_ARRAY_BINDING`], [`STITCH_METADATA_BINDING`],
/// [`STITCH_OUTPUT_BINDING`]. Parameters: [`StitchParams`](crate::stitch_lane::StitchParams).
pub const STITCH_HEIGHT_KERNEL: &str = "sample_height_stitched";

/// The staged `R32Float` height array, one slice per region.
pub const STITCH_HEIGHT_ARRAY_BINDING: u32 = 0;
/// The storage buffer of per-slice [`StitchMetadata`](crate::stitch_lane::StitchMetadata).
pub const STITCH_METADATA_BINDING: u32 = 1;
/// The `R32Float` output image covering the layer bounds.
pub const STITCH_OUTPUT_BINDING: u32 = 2;
