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

//! Mapping of a world-space influence area onto one region's pixel grid.

use super::coord::{RegionCoord, RegionGrid};
use crate::math::{PixelRect, WorldRect};

/// The part of a world rectangle that falls inside one region, in pixels.
///
/// `region_rect` and `bounds_rect` always have the same width and height; they
/// name the same pixels from two origins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionOverlap {
    /// The overlapping pixels relative to the region's top-left texel,
    /// inside `[0, region_size]` on both axes.
    pub region_rect: PixelRect,
    /// The same pixels relative to the rectangle's own top-left pixel.
    pub bounds_rect: PixelRect,
    /// The world-space intersection the pixels were derived from.
    pub world: WorldRect,
}

impl RegionOverlap {
    /// Returns `true` if the overlap covers no whole pixel.
    ///
    /// A positive world-space intersection narrower than half a pixel rounds
    /// to an empty pixel rectangle.
    pub fn is_empty(&self) -> bool {
        self.region_rect.is_empty()
    }
}

/// Computes where `bounds` lands on the pixel grid of the region at `coord`.
///
/// Returns `None` exactly when `bounds` and the region's world rectangle do not
/// share any area. Pixel coordinates are rounded to the nearest pixel and then
/// clamped into the valid range, so rounding can never produce a rectangle
/// reaching outside the region or outside the bounds image.
pub fn compute_region_overlap(
    grid: &RegionGrid,
    coord: RegionCoord,
    bounds: &WorldRect,
) -> Option<RegionOverlap> {
    let world = grid.region_world_rect(coord).intersection(bounds)?;

    let size = grid.region_size as i64;
    let (origin_x, origin_y) = grid.region_pixel_origin(coord);

    let x0 = (grid.world_to_pixel(world.min.x) - origin_x).clamp(0, size);
    let x1 = (grid.world_to_pixel(world.max.x) - origin_x).clamp(x0, size);
    let y0 = (grid.world_to_pixel(world.min.y) - origin_y).clamp(0, size);
    let y1 = (grid.world_to_pixel(world.max.y) - origin_y).clamp(y0, size);
    let width = x1 - x0;
    let height = y1 - y0;

    let extent = grid.bounds_pixel_extent(bounds);
    let bx = (origin_x + x0 - grid.world_to_pixel(bounds.min.x))
        .clamp(0, (extent.width as i64 - width).max(0));
    let by = (origin_y + y0 - grid.world_to_pixel(bounds.min.y))
        .clamp(0, (extent.height as i64 - height).max(0));

    Some(RegionOverlap {
        region_rect: PixelRect::new(x0 as i32, y0 as i32, width as i32, height as i32),
        bounds_rect: PixelRect::new(bx as i32, by as i32, width as i32, height as i32),
        world,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;

    fn grid() -> RegionGrid {
        RegionGrid::new(16, 1.0)
    }

    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> WorldRect {
        WorldRect::from_min_max(Vec2::new(x0, y0), Vec2::new(x1, y1))
    }

    #[test]
    fn full_region_maps_to_whole_grid() {
        let g = grid();
        let coord = RegionCoord::new(3, -2);
        let bounds = g.region_world_rect(coord);
        let overlap = compute_region_overlap(&g, coord, &bounds).unwrap();
        assert_eq!(overlap.region_rect, PixelRect::new(0, 0, 16, 16));
        assert_eq!(overlap.bounds_rect, PixelRect::new(0, 0, 16, 16));
    }

    #[test]
    fn touching_edges_are_disjoint() {
        let g = grid();
        assert!(compute_region_overlap(&g, RegionCoord::new(0, 0), &rect(16.0, 0.0, 32.0, 16.0))
            .is_none());
        assert!(compute_region_overlap(&g, RegionCoord::new(0, 0), &rect(-8.0, 16.0, 8.0, 20.0))
            .is_none());
    }

    #[test]
    fn partial_overlap_in_both_frames() {
        let g = grid();
        // Bounds start at world pixel (10, 4) and span into region (1, 0).
        let bounds = rect(10.0, 4.0, 22.0, 12.0);

        let west = compute_region_overlap(&g, RegionCoord::new(0, 0), &bounds).unwrap();
        assert_eq!(west.region_rect, PixelRect::new(10, 4, 6, 8));
        assert_eq!(west.bounds_rect, PixelRect::new(0, 0, 6, 8));

        let east = compute_region_overlap(&g, RegionCoord::new(1, 0), &bounds).unwrap();
        assert_eq!(east.region_rect, PixelRect::new(0, 4, 6, 8));
        assert_eq!(east.bounds_rect, PixelRect::new(6, 0, 6, 8));
    }

    #[test]
    fn negative_coordinates() {
        let g = grid();
        let bounds = rect(-4.0, -4.0, 4.0, 4.0);
        let nw = compute_region_overlap(&g, RegionCoord::new(-1, -1), &bounds).unwrap();
        assert_eq!(nw.region_rect, PixelRect::new(12, 12, 4, 4));
        assert_eq!(nw.bounds_rect, PixelRect::new(0, 0, 4, 4));
        let se = compute_region_overlap(&g, RegionCoord::new(0, 0), &bounds).unwrap();
        assert_eq!(se.region_rect, PixelRect::new(0, 0, 4, 4));
        assert_eq!(se.bounds_rect, PixelRect::new(4, 4, 4, 4));
    }

    #[test]
    fn sub_pixel_overlap_is_some_but_empty() {
        let g = grid();
        let bounds = rect(15.8, 0.0, 17.0, 16.0);
        let overlap = compute_region_overlap(&g, RegionCoord::new(0, 0), &bounds).unwrap();
        assert!(overlap.is_empty());
        assert!(overlap.region_rect.fits_within(16, 16));
    }

    #[test]
    fn exhaustive_boundary_sweep() {
        // Sweep bounds edges across the region in quarter-pixel steps, including
        // positions just outside each edge.
        let g = RegionGrid::new(8, 1.0);
        let coord = RegionCoord::new(0, 0);
        let region = g.region_world_rect(coord);
        let steps: Vec<f32> = (-12..=44).map(|i| i as f32 * 0.25).collect();

        for &x0 in &steps {
            for &x1 in steps.iter().filter(|&&v| v > x0).step_by(3) {
                let bounds = rect(x0, 2.0, x1, 5.5);
                let overlap = compute_region_overlap(&g, coord, &bounds);
                assert_eq!(
                    overlap.is_none(),
                    !region.intersects(&bounds),
                    "x0={x0} x1={x1}"
                );
                if let Some(o) = overlap {
                    assert_eq!(o.region_rect.width, o.bounds_rect.width);
                    assert_eq!(o.region_rect.height, o.bounds_rect.height);
                    assert!(o.region_rect.fits_within(8, 8), "{:?}", o.region_rect);
                    let ext = g.bounds_pixel_extent(&bounds);
                    assert!(
                        o.bounds_rect
                            .fits_within(ext.width as i32, ext.height as i32),
                        "{:?} in {:?}",
                        o.bounds_rect,
                        ext
                    );
                }
            }
        }
    }
}
