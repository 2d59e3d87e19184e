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

//! Terrain region identity, the world-to-pixel geometry, and the contracts
//! planning code uses to reach region data.
//!
//! - **[`coord`]**: [`RegionCoord`], neighbor directions, and the [`RegionGrid`] mapping.
//! - **[`overlap`]**: [`compute_region_overlap`], the world-rectangle to region-pixel mapping.
//! - **[`provider`]**: the [`RegionProvider`] lookup consumed by the height stager.
//! - **[`bake`]**: immutable snapshots of editable objects for deferred planning.

pub mod bake;
pub mod coord;
pub mod overlap;
pub mod provider;

pub use self::bake::{Bake, LayerBakeState};
pub use self::coord::{NeighborDirection, RegionCoord, RegionGrid, NO_NEIGHBOR};
pub use self::overlap::{compute_region_overlap, RegionOverlap};
pub use self::provider::{RegionData, RegionProvider, RegionSnapshot};
