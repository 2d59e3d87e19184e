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

use bytemuck::{Pod, Zeroable};
use strata_core::math::PixelRect;
use strata_core::terrain::{NeighborDirection, NO_NEIGHBOR};

/// Per-slice description of a staged height array, as read by the stitch kernel.
///
/// Rectangles are packed as `[x, y, width, height]`. Neighbor slots follow
/// [`NeighborDirection`] order and hold [`NO_NEIGHBOR`] when the adjacent
/// region was not staged.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct StitchMetadata {
    /// The world pixel of the region's top-left texel.
    pub world_pixel_offset: [i32; 2],
    /// The overlapped pixels, relative to the region.
    pub source_rect: [i32; 4],
    /// The same pixels, relative to the stitched output image.
    pub dest_rect: [i32; 4],
    /// This slice's index in the array.
    pub slice_index: i32,
    /// Slice indices of the eight neighbors.
    pub neighbors: [i32; 8],
    /// Keeps the record a multiple of 16 bytes.
    pub _padding: i32,
}

impl StitchMetadata {
    /// The slice of the neighbor in `direction`, if it was staged.
    pub fn neighbor(&self, direction: NeighborDirection) -> Option<u32> {
        let slice = self.neighbors[direction.index()];
        (slice != NO_NEIGHBOR && slice >= 0).then_some(slice as u32)
    }

    /// The overlapped pixels, relative to the region.
    pub fn source(&self) -> PixelRect {
        let [x, y, w, h] = self.source_rect;
        PixelRect::new(x, y, w, h)
    }

    /// The overlapped pixels, relative to the output image.
    pub fn dest(&self) -> PixelRect {
        let [x, y, w, h] = self.dest_rect;
        PixelRect::new(x, y, w, h)
    }
}

/// The parameter block of the stitch kernel.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct StitchParams {
    /// The side length of every slice.
    pub region_size: u32,
    /// The number of staged slices.
    pub slice_count: u32,
    /// Added to every source pixel before sampling.
    pub sample_offset: [i32; 2],
    /// The size of the output image.
    pub output_extent: [u32; 2],
    /// Pads the block to 32 bytes.
    pub _padding: [u32; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_match_the_kernel_layout() {
        assert_eq!(std::mem::size_of::<StitchMetadata>(), 80);
        assert_eq!(std::mem::size_of::<StitchParams>(), 32);
    }

    #[test]
    fn sentinel_neighbor_reads_as_none() {
        let mut meta = StitchMetadata::zeroed();
        meta.neighbors = [NO_NEIGHBOR; 8];
        meta.neighbors[NeighborDirection::East.index()] = 4;
        assert_eq!(meta.neighbor(NeighborDirection::East), Some(4));
        assert_eq!(meta.neighbor(NeighborDirection::West), None);
    }
}
