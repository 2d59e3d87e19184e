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

//! Provides structs for representing extents (sizes) and origins (offsets) in 2D and 3D.
//!
//! These types describe the dimensions of textures, texture arrays, and copy
//! regions within them. They use integer (`u32`) components, making them suitable
//! for pixel-based coordinates and sizes.

/// A two-dimensional extent, typically representing width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent2D {
    /// The width component of the extent.
    pub width: u32,
    /// The height component of the extent.
    pub height: u32,
}

impl Extent2D {
    /// Creates a new extent.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either dimension is zero.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The number of texels covered by this extent.
    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// The component-wise maximum of two extents.
    pub fn max(self, other: Self) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }
}

/// A three-dimensional extent, representing width, height, and depth.
///
/// For texture arrays the third component counts array layers (slices).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent3D {
    /// The width component of the extent.
    pub width: u32,
    /// The height component of the extent.
    pub height: u32,
    /// The depth or number of array layers.
    pub depth_or_array_layers: u32,
}

impl Extent3D {
    /// Creates a new extent.
    pub const fn new(width: u32, height: u32, depth_or_array_layers: u32) -> Self {
        Self {
            width,
            height,
            depth_or_array_layers,
        }
    }

    /// The width and height of a single layer.
    pub const fn layer_extent(&self) -> Extent2D {
        Extent2D::new(self.width, self.height)
    }

    /// The number of texels in a single layer.
    pub const fn texels_per_layer(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// A two-dimensional origin, typically representing an (x, y) offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Origin2D {
    /// The x-coordinate of the origin.
    pub x: u32,
    /// The y-coordinate of the origin.
    pub y: u32,
}

impl Origin2D {
    /// The origin at `(0, 0)`.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Creates a new origin.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_area_and_emptiness() {
        assert_eq!(Extent2D::new(4, 3).area(), 12);
        assert!(Extent2D::new(0, 3).is_empty());
        assert!(!Extent2D::new(1, 1).is_empty());
    }

    #[test]
    fn extent_max_is_component_wise() {
        let a = Extent2D::new(4, 10);
        let b = Extent2D::new(7, 2);
        assert_eq!(a.max(b), Extent2D::new(7, 10));
    }

    #[test]
    fn layer_extent_drops_depth() {
        let e = Extent3D::new(64, 32, 9);
        assert_eq!(e.layer_extent(), Extent2D::new(64, 32));
        assert_eq!(e.texels_per_layer(), 64 * 32);
    }
}
