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

//! Axis-aligned rectangles in world space and in pixel space.

use super::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle on the terrain plane, in world units.
///
/// The rectangle is half-open: it covers `[min, max)` on both axes. Two
/// rectangles that only share an edge therefore do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldRect {
    /// The corner with the smallest coordinates.
    pub min: Vec2,
    /// The corner with the largest coordinates.
    pub max: Vec2,
}

impl WorldRect {
    /// Creates a rectangle from two corners, in any order.
    pub fn from_min_max(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a rectangle from its center and its full size.
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Returns the full size of the rectangle.
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Returns the center of the rectangle.
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Returns `true` if the rectangle covers no area.
    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    /// Returns `true` if both rectangles share a region of positive area.
    pub fn intersects(&self, other: &WorldRect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Computes the overlapping rectangle, or `None` if the rectangles are disjoint.
    pub fn intersection(&self, other: &WorldRect) -> Option<WorldRect> {
        if !self.intersects(other) {
            return None;
        }
        Some(WorldRect {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        })
    }
}

/// An axis-aligned rectangle of whole pixels, `[x, x + width) × [y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl PixelRect {
    /// Creates a new pixel rectangle.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the right-most pixel column.
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// One past the bottom-most pixel row.
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Returns `true` if the rectangle covers no pixel.
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Returns `true` if the pixel `(px, py)` lies inside the rectangle.
    pub const fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Returns `true` if the rectangle lies within `[0, width] × [0, height]`.
    pub const fn fits_within(&self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.y >= 0 && self.right() <= width && self.bottom() <= height
    }

    /// Packs the rectangle as `[x, y, width, height]`, the layout used by GPU-side metadata.
    pub const fn to_array(&self) -> [i32; 4] {
        [self.x, self.y, self.width, self.height]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn center_size_round_trips() {
        let rect = WorldRect::from_center_size(Vec2::new(10.0, -4.0), Vec2::new(6.0, 2.0));
        assert_relative_eq!(rect.min.x, 7.0);
        assert_relative_eq!(rect.max.y, -3.0);
        assert_relative_eq!(rect.center().x, 10.0);
        assert_relative_eq!(rect.size().y, 2.0);
    }

    #[test]
    fn from_min_max_normalizes_corner_order() {
        let rect = WorldRect::from_min_max(Vec2::new(5.0, 1.0), Vec2::new(-1.0, 3.0));
        assert_eq!(rect.min, Vec2::new(-1.0, 1.0));
        assert_eq!(rect.max, Vec2::new(5.0, 3.0));
    }

    #[test]
    fn touching_rectangles_do_not_intersect() {
        let a = WorldRect::from_min_max(Vec2::new(0.0, 0.0), Vec2::new(4.0, 4.0));
        let b = WorldRect::from_min_max(Vec2::new(4.0, 0.0), Vec2::new(8.0, 4.0));
        assert!(!a.intersects(&b));
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn intersection_is_the_shared_area() {
        let a = WorldRect::from_min_max(Vec2::new(0.0, 0.0), Vec2::new(4.0, 4.0));
        let b = WorldRect::from_min_max(Vec2::new(2.0, -1.0), Vec2::new(8.0, 3.0));
        let i = a.intersection(&b).unwrap();
        assert_eq!(i.min, Vec2::new(2.0, 0.0));
        assert_eq!(i.max, Vec2::new(4.0, 3.0));
    }

    #[test]
    fn pixel_rect_edges_and_containment() {
        let r = PixelRect::new(2, 3, 4, 5);
        assert_eq!(r.right(), 6);
        assert_eq!(r.bottom(), 8);
        assert!(r.contains(2, 3));
        assert!(!r.contains(6, 3));
        assert!(r.fits_within(6, 8));
        assert!(!r.fits_within(5, 8));
        assert_eq!(r.to_array(), [2, 3, 4, 5]);
    }
}
