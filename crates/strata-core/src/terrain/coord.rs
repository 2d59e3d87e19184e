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

//! Region identity and the world-to-grid mapping.

use crate::math::{Extent2D, WorldRect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The value stored in place of a neighbor slice index when no neighbor is available.
pub const NO_NEIGHBOR: i32 = -1;

/// The integer grid coordinate of one terrain region.
///
/// Region `(x, y)` covers the world rectangle
/// `[x * extent, (x + 1) * extent) × [y * extent, (y + 1) * extent)`, where
/// `extent` is the region's side length in world units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct RegionCoord {
    /// Column, growing eastward.
    pub x: i32,
    /// Row, growing southward.
    pub y: i32,
}

impl RegionCoord {
    /// Creates a new region coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The coordinate of the adjacent region in the given direction.
    pub fn neighbor(self, direction: NeighborDirection) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for RegionCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the eight directions in which a region can have a neighbor.
///
/// The discriminant is the position of the direction in the neighbor table
/// of the stitch metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NeighborDirection {
    /// `y - 1`.
    North = 0,
    /// `y + 1`.
    South = 1,
    /// `x + 1`.
    East = 2,
    /// `x - 1`.
    West = 3,
    /// `x + 1, y - 1`.
    NorthEast = 4,
    /// `x - 1, y - 1`.
    NorthWest = 5,
    /// `x + 1, y + 1`.
    SouthEast = 6,
    /// `x - 1, y + 1`.
    SouthWest = 7,
}

impl NeighborDirection {
    /// All directions, in neighbor-table order.
    pub const ALL: [NeighborDirection; 8] = [
        NeighborDirection::North,
        NeighborDirection::South,
        NeighborDirection::East,
        NeighborDirection::West,
        NeighborDirection::NorthEast,
        NeighborDirection::NorthWest,
        NeighborDirection::SouthEast,
        NeighborDirection::SouthWest,
    ];

    /// The slot of this direction in the neighbor table.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The grid step `(dx, dy)` toward the neighbor.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            NeighborDirection::North => (0, -1),
            NeighborDirection::South => (0, 1),
            NeighborDirection::East => (1, 0),
            NeighborDirection::West => (-1, 0),
            NeighborDirection::NorthEast => (1, -1),
            NeighborDirection::NorthWest => (-1, -1),
            NeighborDirection::SouthEast => (1, 1),
            NeighborDirection::SouthWest => (-1, 1),
        }
    }

    /// The direction whose grid step is `(dx, dy)`, each component in `-1..=1`.
    /// Returns `None` for `(0, 0)` and for any other step.
    pub const fn from_offset(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(NeighborDirection::North),
            (0, 1) => Some(NeighborDirection::South),
            (1, 0) => Some(NeighborDirection::East),
            (-1, 0) => Some(NeighborDirection::West),
            (1, -1) => Some(NeighborDirection::NorthEast),
            (-1, -1) => Some(NeighborDirection::NorthWest),
            (1, 1) => Some(NeighborDirection::SouthEast),
            (-1, 1) => Some(NeighborDirection::SouthWest),
            _ => None,
        }
    }
}

/// Maps world space onto the region grid and its pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionGrid {
    /// The side length of a region, in pixels.
    pub region_size: u32,
    /// The world-space distance between two adjacent pixels.
    pub vertex_spacing: f32,
}

impl RegionGrid {
    /// Creates a new grid description.
    pub const fn new(region_size: u32, vertex_spacing: f32) -> Self {
        Self {
            region_size,
            vertex_spacing,
        }
    }

    /// The side length of a region in world units.
    pub fn region_world_extent(&self) -> f32 {
        self.region_size as f32 * self.vertex_spacing
    }

    /// Converts a world-space coordinate to the nearest world pixel index.
    pub fn world_to_pixel(&self, v: f32) -> i64 {
        (v / self.vertex_spacing).round() as i64
    }

    /// The world-space rectangle covered by a region.
    pub fn region_world_rect(&self, coord: RegionCoord) -> WorldRect {
        let extent = self.region_world_extent();
        let min = crate::math::Vec2::new(coord.x as f32 * extent, coord.y as f32 * extent);
        WorldRect {
            min,
            max: min + crate::math::Vec2::splat(extent),
        }
    }

    /// The world pixel of a region's top-left texel.
    pub fn region_pixel_origin(&self, coord: RegionCoord) -> (i64, i64) {
        let size = self.region_size as i64;
        (coord.x as i64 * size, coord.y as i64 * size)
    }

    /// Every region whose world rectangle overlaps `bounds` with positive area,
    /// in row-major order (north to south, then west to east).
    pub fn regions_overlapping(&self, bounds: &WorldRect) -> Vec<RegionCoord> {
        let extent = self.region_world_extent();
        if bounds.is_empty() || extent <= 0.0 {
            return Vec::new();
        }
        let x0 = (bounds.min.x / extent).floor() as i32;
        let x1 = (bounds.max.x / extent).ceil() as i32;
        let y0 = (bounds.min.y / extent).floor() as i32;
        let y1 = (bounds.max.y / extent).ceil() as i32;

        let mut coords = Vec::new();
        for y in y0..y1 {
            for x in x0..x1 {
                let coord = RegionCoord::new(x, y);
                if self.region_world_rect(coord).intersects(bounds) {
                    coords.push(coord);
                }
            }
        }
        coords
    }

    /// The pixel size of the image that covers `bounds`.
    pub fn bounds_pixel_extent(&self, bounds: &WorldRect) -> Extent2D {
        let w = self.world_to_pixel(bounds.max.x) - self.world_to_pixel(bounds.min.x);
        let h = self.world_to_pixel(bounds.max.y) - self.world_to_pixel(bounds.min.y);
        Extent2D::new(w.clamp(0, u32::MAX as i64) as u32, h.clamp(0, u32::MAX as i64) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;
    use approx::assert_relative_eq;

    #[test]
    fn directions_round_trip_through_offsets() {
        for (slot, dir) in NeighborDirection::ALL.iter().enumerate() {
            assert_eq!(dir.index(), slot);
            let (dx, dy) = dir.offset();
            assert_eq!(NeighborDirection::from_offset(dx, dy), Some(*dir));
        }
        assert_eq!(NeighborDirection::from_offset(0, 0), None);
    }

    #[test]
    fn north_is_negative_y() {
        let c = RegionCoord::new(2, 2);
        assert_eq!(c.neighbor(NeighborDirection::North), RegionCoord::new(2, 1));
        assert_eq!(c.neighbor(NeighborDirection::SouthWest), RegionCoord::new(1, 3));
    }

    #[test]
    fn region_world_rect_uses_spacing() {
        let grid = RegionGrid::new(64, 0.5);
        let rect = grid.region_world_rect(RegionCoord::new(-1, 2));
        assert_relative_eq!(rect.min.x, -32.0);
        assert_relative_eq!(rect.min.y, 64.0);
        assert_relative_eq!(rect.max.x, 0.0);
        assert_relative_eq!(rect.max.y, 96.0);
    }

    #[test]
    fn regions_overlapping_is_row_major_and_skips_touching() {
        let grid = RegionGrid::new(16, 1.0);
        let bounds = WorldRect::from_min_max(Vec2::new(8.0, 8.0), Vec2::new(32.0, 24.0));
        let coords = grid.regions_overlapping(&bounds);
        // x = 2 only touches at 32.0 and must not appear.
        assert_eq!(
            coords,
            vec![
                RegionCoord::new(0, 0),
                RegionCoord::new(1, 0),
                RegionCoord::new(0, 1),
                RegionCoord::new(1, 1),
            ]
        );
    }

    #[test]
    fn bounds_pixel_extent_rounds() {
        let grid = RegionGrid::new(16, 0.5);
        let bounds = WorldRect::from_min_max(Vec2::new(0.0, 0.0), Vec2::new(10.1, 4.0));
        assert_eq!(grid.bounds_pixel_extent(&bounds), Extent2D::new(20, 8));
    }
}
