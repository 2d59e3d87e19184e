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

use std::sync::Arc;
use strata_core::gpu::{GpuResource, ResourceError};
use strata_core::math::{Vec2, WorldRect};
use strata_core::terrain::{Bake, RegionCoord, RegionProvider};
use strata_core::TerrainSettings;
use strata_data::RegionStore;
use strata_infra::SoftwareDevice;

fn store(device: &SoftwareDevice) -> RegionStore {
    RegionStore::new(
        Arc::new(device.clone()),
        TerrainSettings {
            region_size: 4,
            vertex_spacing: 1.0,
        },
    )
}

#[test]
fn test_regions_are_created_lazily_and_released_on_last_reference() {
    // --- 1. ARRANGE ---
    let device = SoftwareDevice::new();
    let mut regions = store(&device);
    let coord = RegionCoord::new(2, -1);
    assert!(
        regions.get_region(coord).is_none(),
        "Lookups must not create regions"
    );

    // --- 2. ACT ---
    let first = regions.acquire(coord).unwrap();
    let second = regions.acquire(coord).unwrap();
    let released_once = regions.release(coord);
    let released_twice = regions.release(coord);

    // --- 3. ASSERT ---
    assert_eq!(first, second, "A second acquire must reuse the same textures");
    assert!(released_once.is_empty());
    assert_eq!(
        released_twice,
        vec![
            GpuResource::Texture(first.height),
            GpuResource::Texture(first.control)
        ]
    );
    assert!(regions.is_empty());
    // The store never destroys textures itself.
    assert!(device.is_alive(GpuResource::Texture(first.height)));
}

#[test]
fn test_failed_acquire_rolls_back_partial_region() {
    // --- 1. ARRANGE ---
    let device = SoftwareDevice::new();
    let mut regions = store(&device);
    // Room for the height texture but not the control texture.
    device.set_resource_limit(Some(1));

    // --- 2. ACT ---
    let result = regions.acquire(RegionCoord::new(0, 0));

    // --- 3. ASSERT ---
    assert!(matches!(result, Err(ResourceError::OutOfMemory { .. })));
    assert_eq!(device.live_resource_count(), 0, "No texture may leak");
    assert!(regions.is_empty());
}

#[test]
fn test_write_heights_uploads_tile() {
    // --- 1. ARRANGE ---
    let device = SoftwareDevice::new();
    let mut regions = store(&device);
    let data = regions.acquire(RegionCoord::new(0, 0)).unwrap();
    let heights: Vec<f32> = (0..16).map(|i| i as f32 * 0.5).collect();

    // --- 2. ACT ---
    regions.write_heights(data.coord, &heights).unwrap();
    let short = regions.write_heights(data.coord, &heights[..4]);
    let missing = regions.write_heights(RegionCoord::new(9, 9), &heights);

    // --- 3. ASSERT ---
    assert_eq!(device.read_texture_f32(data.height, 0).unwrap(), heights);
    assert!(matches!(short, Err(ResourceError::SizeMismatch { .. })));
    assert_eq!(missing, Err(ResourceError::NotFound));
}

#[test]
fn test_acquire_bounds_covers_overlapped_regions() {
    // --- 1. ARRANGE ---
    let device = SoftwareDevice::new();
    let mut regions = store(&device);
    let bounds = WorldRect::from_min_max(Vec2::new(2.0, 2.0), Vec2::new(10.0, 6.0));

    // --- 2. ACT ---
    let acquired = regions.acquire_bounds(&bounds).unwrap();

    // --- 3. ASSERT ---
    let coords: Vec<_> = acquired.iter().map(|r| r.coord).collect();
    assert_eq!(
        coords,
        vec![
            RegionCoord::new(0, 0),
            RegionCoord::new(1, 0),
            RegionCoord::new(2, 0),
            RegionCoord::new(0, 1),
            RegionCoord::new(1, 1),
            RegionCoord::new(2, 1),
        ]
    );
    assert_eq!(regions.len(), 6);
    assert_eq!(device.live_resource_count(), 12);
}

#[test]
fn test_baked_snapshot_outlives_later_releases() {
    // --- 1. ARRANGE ---
    let device = SoftwareDevice::new();
    let mut regions = store(&device);
    let kept = RegionCoord::new(0, 0);
    let dropped = RegionCoord::new(1, 0);
    regions.acquire(kept).unwrap();
    let dropped_data = regions.acquire(dropped).unwrap();

    // --- 2. ACT ---
    let snapshot = regions.bake();
    let released = regions.release(dropped);

    // --- 3. ASSERT ---
    assert_eq!(released.len(), 2);
    assert!(regions.get_region(dropped).is_none());
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.get_region(dropped), Some(dropped_data));
    assert_eq!(snapshot.region_size(), 4);
}
