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

//! The read-only view of loaded regions.

use super::coord::RegionCoord;
use crate::gpu::TextureId;
use std::collections::BTreeMap;

/// The live GPU resources of one loaded region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionData {
    /// The region's grid coordinate.
    pub coord: RegionCoord,
    /// The `R32Float` height texture, `size × size`.
    pub height: TextureId,
    /// The `R32Uint` control texture, `size × size`.
    pub control: TextureId,
    /// The side length of both textures, in pixels.
    pub size: u32,
}

/// Looks up loaded regions by coordinate.
///
/// Lookups never create a region: a coordinate nobody has acquired yields `None`.
pub trait RegionProvider: Send + Sync {
    /// The side length of every region, in pixels.
    fn region_size(&self) -> u32;

    /// Returns the live data of the region at `coord`, if it is loaded.
    fn get_region(&self, coord: RegionCoord) -> Option<RegionData>;

    /// Returns `true` if the region at `coord` is loaded.
    fn contains(&self, coord: RegionCoord) -> bool {
        self.get_region(coord).is_some()
    }
}

/// A frozen copy of which regions were loaded, and with which textures.
///
/// Planning code on a worker thread uses a snapshot instead of the live store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionSnapshot {
    region_size: u32,
    regions: BTreeMap<RegionCoord, RegionData>,
}

impl RegionSnapshot {
    /// Creates a snapshot from the given regions.
    pub fn new(region_size: u32, regions: impl IntoIterator<Item = RegionData>) -> Self {
        Self {
            region_size,
            regions: regions.into_iter().map(|r| (r.coord, r)).collect(),
        }
    }

    /// The number of regions in the snapshot.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns `true` if the snapshot holds no region.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl RegionProvider for RegionSnapshot {
    fn region_size(&self) -> u32 {
        self.region_size
    }

    fn get_region(&self, coord: RegionCoord) -> Option<RegionData> {
        self.regions.get(&coord).copied()
    }
}
