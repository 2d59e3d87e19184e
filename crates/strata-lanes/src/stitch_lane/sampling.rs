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

use super::StitchMetadata;
use strata_core::terrain::NeighborDirection;

/// Samples a staged height array at a slice-local pixel that may lie outside
/// the slice.
///
/// A coordinate inside `[0, region_size)` on both axes reads the slice
/// itself. Otherwise the axis signs select one of eight zones around the
/// slice: if that neighbor was staged the coordinate is shifted by
/// `region_size` into the neighbor's space and read there, else the current
/// slice is read clamped to its edge. `fetch(slice, x, y)` reads one texel.
///
/// This is the reference of what the stitch kernel computes per invocation.
pub fn sample_height_stitched<E>(
    metadata: &StitchMetadata,
    coord: [i32; 2],
    region_size: u32,
    mut fetch: impl FnMut(u32, u32, u32) -> Result<f32, E>,
) -> Result<f32, E> {
    let size = i32::try_from(region_size).unwrap_or(i32::MAX);
    let [x, y] = coord;
    let zone = |v: i32| {
        if v < 0 {
            -1
        } else if v >= size {
            1
        } else {
            0
        }
    };
    let clamp = |v: i32| v.clamp(0, (size - 1).max(0)) as u32;
    let (dx, dy) = (zone(x), zone(y));
    let slice = metadata.slice_index.max(0) as u32;

    match NeighborDirection::from_offset(dx, dy).and_then(|d| metadata.neighbor(d)) {
        Some(neighbor) => fetch(
            neighbor,
            clamp(x.saturating_sub(dx * size)),
            clamp(y.saturating_sub(dy * size)),
        ),
        None => fetch(slice, clamp(x), clamp(y)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::Zeroable;
    use strata_core::terrain::NO_NEIGHBOR;

    const SIZE: u32 = 4;

    // Slice s holds s * 100 + y * 10 + x.
    fn fetch(slice: u32, x: u32, y: u32) -> Result<f32, ()> {
        assert!(x < SIZE && y < SIZE, "fetch outside the slice");
        Ok((slice * 100 + y * 10 + x) as f32)
    }

    fn metadata(east: i32) -> StitchMetadata {
        let mut meta = StitchMetadata::zeroed();
        meta.neighbors = [NO_NEIGHBOR; 8];
        meta.neighbors[NeighborDirection::East.index()] = east;
        meta
    }

    #[test]
    fn inside_reads_the_current_slice() {
        assert_eq!(sample_height_stitched(&metadata(1), [2, 3], SIZE, fetch), Ok(32.0));
    }

    #[test]
    fn east_of_the_edge_reads_the_neighbor_first_column() {
        assert_eq!(
            sample_height_stitched(&metadata(1), [4, 2], SIZE, fetch),
            Ok(120.0)
        );
    }

    #[test]
    fn missing_neighbor_clamps_to_the_edge() {
        assert_eq!(
            sample_height_stitched(&metadata(NO_NEIGHBOR), [4, 2], SIZE, fetch),
            Ok(23.0)
        );
        assert_eq!(
            sample_height_stitched(&metadata(NO_NEIGHBOR), [-3, -1], SIZE, fetch),
            Ok(0.0)
        );
    }

    #[test]
    fn extreme_coordinates_clamp_instead_of_overflowing() {
        assert_eq!(
            sample_height_stitched(&metadata(1), [i32::MAX, 2], SIZE, fetch),
            Ok(123.0)
        );
        assert_eq!(
            sample_height_stitched(&metadata(1), [i32::MIN, i32::MAX], SIZE, fetch),
            Ok(30.0)
        );
    }

    #[test]
    fn corner_zone_uses_the_diagonal_neighbor() {
        let mut meta = metadata(1);
        meta.neighbors[NeighborDirection::SouthEast.index()] = 2;
        // (4, 4) lies south-east; the east neighbor must not be used.
        assert_eq!(sample_height_stitched(&meta, [4, 4], SIZE, fetch), Ok(200.0));
    }
}
