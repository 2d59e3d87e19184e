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

//! Immutable snapshots of editable objects.
//!
//! Planning may run on a worker thread or in a later tick while the source
//! object keeps changing on the main thread. Planning code therefore only ever
//! sees a baked copy, moved into its closures by value.

use super::coord::{RegionCoord, RegionGrid};
use crate::gpu::TextureId;
use crate::math::WorldRect;
use crate::task::OwnerId;

/// An object that can produce an immutable snapshot of its planning-relevant state.
pub trait Bake {
    /// The snapshot type.
    type State: Clone + Send + 'static;

    /// Captures the current state.
    fn bake(&self) -> Self::State;
}

/// The snapshot of one terrain layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerBakeState {
    /// The layer's identity in borrow sets.
    pub owner: OwnerId,
    /// The world-space area the layer influences.
    pub bounds: WorldRect,
    /// Numeric parameters, in the order the layer's shader consumes them.
    pub parameters: Vec<f32>,
    /// Resources the layer owns (masks, brush stamps).
    pub textures: Vec<TextureId>,
    /// The layer's edit counter at the moment of baking.
    pub revision: u64,
}

impl LayerBakeState {
    /// Every region the layer's bounds overlap.
    pub fn regions(&self, grid: &RegionGrid) -> Vec<RegionCoord> {
        grid.regions_overlapping(&self.bounds)
    }

    /// The owners a task planned from this snapshot reads: the layer itself
    /// and every overlapped region.
    pub fn borrows(&self, grid: &RegionGrid) -> Vec<OwnerId> {
        std::iter::once(self.owner)
            .chain(self.regions(grid).into_iter().map(OwnerId::Region))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;

    struct Brush {
        id: u64,
        center: Vec2,
        radius: f32,
        strength: f32,
        edits: u64,
    }

    impl Bake for Brush {
        type State = LayerBakeState;

        fn bake(&self) -> LayerBakeState {
            LayerBakeState {
                owner: OwnerId::Layer(self.id),
                bounds: WorldRect::from_center_size(self.center, Vec2::splat(self.radius * 2.0)),
                parameters: vec![self.radius, self.strength],
                textures: Vec::new(),
                revision: self.edits,
            }
        }
    }

    #[test]
    fn snapshot_is_independent_of_later_edits() {
        let mut brush = Brush {
            id: 7,
            center: Vec2::new(16.0, 16.0),
            radius: 4.0,
            strength: 0.5,
            edits: 1,
        };
        let baked = brush.bake();
        brush.strength = 1.0;
        brush.edits += 1;

        assert_eq!(baked.parameters, vec![4.0, 0.5]);
        assert_eq!(baked.revision, 1);
    }

    #[test]
    fn borrows_cover_layer_and_regions() {
        let grid = RegionGrid::new(16, 1.0);
        let state = LayerBakeState {
            owner: OwnerId::Layer(3),
            bounds: WorldRect::from_min_max(Vec2::new(12.0, 2.0), Vec2::new(20.0, 6.0)),
            parameters: Vec::new(),
            textures: Vec::new(),
            revision: 0,
        };
        assert_eq!(
            state.borrows(&grid),
            vec![
                OwnerId::Layer(3),
                OwnerId::Region(RegionCoord::new(0, 0)),
                OwnerId::Region(RegionCoord::new(1, 0)),
            ]
        );
    }
}
