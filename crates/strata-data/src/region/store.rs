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

use std::collections::HashMap;
use std::sync::Arc;
use strata_core::gpu::{
    GpuBackend, GpuResource, ResourceError, TextureDescriptor, TextureDimension, TextureFormat,
    TextureId, TextureUsage,
};
use strata_core::math::{Extent3D, WorldRect};
use strata_core::terrain::{
    Bake, RegionCoord, RegionData, RegionGrid, RegionProvider, RegionSnapshot,
};
use strata_core::TerrainSettings;

#[derive(Debug)]
struct RegionEntry {
    data: RegionData,
    references: usize,
}

/// Stores the GPU textures of every loaded region.
///
/// Each layer or mask that touches a coordinate holds one reference on it.
/// The first [`acquire`](Self::acquire) creates the region's textures; the
/// last [`release`](Self::release) hands them back for deferred destruction.
#[derive(Debug)]
pub struct RegionStore {
    backend: Arc<dyn GpuBackend>,
    settings: TerrainSettings,
    regions: HashMap<RegionCoord, RegionEntry>,
}

impl RegionStore {
    /// Creates an empty store.
    pub fn new(backend: Arc<dyn GpuBackend>, settings: TerrainSettings) -> Self {
        Self {
            backend,
            settings,
            regions: HashMap::new(),
        }
    }

    /// The terrain settings the store was created with.
    pub fn settings(&self) -> &TerrainSettings {
        &self.settings
    }

    /// The grid mapping of the stored regions.
    pub fn grid(&self) -> RegionGrid {
        self.settings.grid()
    }

    /// Adds a reference to the region at `coord`, creating it if needed.
    /// ## Errors
    /// Texture allocation failures are returned unchanged; nothing created for
    /// the region survives a failed first acquisition.
    pub fn acquire(&mut self, coord: RegionCoord) -> Result<RegionData, ResourceError> {
        if let Some(entry) = self.regions.get_mut(&coord) {
            entry.references += 1;
            return Ok(entry.data);
        }

        let size = self.settings.region_size;
        let height = self.create_texture(coord, "height", TextureFormat::R32Float)?;
        let control = match self.create_texture(coord, "control", TextureFormat::R32Uint) {
            Ok(id) => id,
            Err(e) => {
                if let Err(cleanup) = self.backend.destroy_texture(height) {
                    log::error!(
                        "RegionStore: Failed to roll back height texture of region {coord}: {cleanup}"
                    );
                }
                return Err(e);
            }
        };

        let data = RegionData {
            coord,
            height,
            control,
            size,
        };
        self.regions.insert(
            coord,
            RegionEntry {
                data,
                references: 1,
            },
        );
        log::debug!("RegionStore: Created region {coord} ({size}x{size})");
        Ok(data)
    }

    /// Acquires every region overlapped by `bounds`, in row-major order.
    ///
    /// On failure every region acquired by this call is released again, and
    /// the regions it created are destroyed immediately.
    pub fn acquire_bounds(&mut self, bounds: &WorldRect) -> Result<Vec<RegionData>, ResourceError> {
        let coords = self.grid().regions_overlapping(bounds);
        let mut acquired = Vec::with_capacity(coords.len());
        for coord in coords {
            match self.acquire(coord) {
                Ok(data) => acquired.push(data),
                Err(e) => {
                    for data in &acquired {
                        for resource in self.release(data.coord) {
                            if let Err(cleanup) = self.backend.destroy_resource(resource) {
                                log::error!("RegionStore: Failed to destroy {resource}: {cleanup}");
                            }
                        }
                    }
                    return Err(e);
                }
            }
        }
        Ok(acquired)
    }

    /// Drops one reference to the region at `coord`.
    ///
    /// When the last reference goes away the region is forgotten and its
    /// textures are returned. The caller hands them to the scheduler's
    /// graveyard; in-flight work may still read them.
    pub fn release(&mut self, coord: RegionCoord) -> Vec<GpuResource> {
        let Some(entry) = self.regions.get_mut(&coord) else {
            log::warn!("RegionStore: Release of unknown region {coord} ignored");
            return Vec::new();
        };
        entry.references -= 1;
        if entry.references > 0 {
            return Vec::new();
        }
        match self.regions.remove(&coord) {
            Some(entry) => {
                log::debug!("RegionStore: Region {coord} is no longer referenced");
                vec![
                    GpuResource::Texture(entry.data.height),
                    GpuResource::Texture(entry.data.control),
                ]
            }
            None => Vec::new(),
        }
    }

    /// Uploads a full `size × size` height tile, row-major, north to south.
    pub fn write_heights(&self, coord: RegionCoord, heights: &[f32]) -> Result<(), ResourceError> {
        let entry = self.regions.get(&coord).ok_or(ResourceError::NotFound)?;
        let size = entry.data.size as usize;
        if heights.len() != size * size {
            return Err(ResourceError::SizeMismatch {
                expected: (size * size * std::mem::size_of::<f32>()) as u64,
                actual: std::mem::size_of_val(heights) as u64,
            });
        }
        self.backend
            .write_texture(entry.data.height, 0, bytemuck::cast_slice(heights))
    }

    /// The number of references held on `coord`.
    pub fn references(&self, coord: RegionCoord) -> usize {
        self.regions.get(&coord).map_or(0, |e| e.references)
    }

    /// The coordinates of every loaded region, sorted.
    pub fn coords(&self) -> Vec<RegionCoord> {
        let mut coords: Vec<_> = self.regions.keys().copied().collect();
        coords.sort();
        coords
    }

    /// The number of loaded regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns `true` if no region is loaded.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    fn create_texture(
        &self,
        coord: RegionCoord,
        kind: &str,
        format: TextureFormat,
    ) -> Result<TextureId, ResourceError> {
        let size = self.settings.region_size;
        self.backend.create_texture(&TextureDescriptor {
            label: Some(format!("region {coord} {kind}").into()),
            size: Extent3D::new(size, size, 1),
            dimension: TextureDimension::D2,
            format,
            usage: TextureUsage::COPY_SRC
                | TextureUsage::COPY_DST
                | TextureUsage::TEXTURE_BINDING
                | TextureUsage::STORAGE_BINDING,
        })
    }
}

impl RegionProvider for RegionStore {
    fn region_size(&self) -> u32 {
        self.settings.region_size
    }

    fn get_region(&self, coord: RegionCoord) -> Option<RegionData> {
        self.regions.get(&coord).map(|e| e.data)
    }
}

impl Bake for RegionStore {
    type State = RegionSnapshot;

    fn bake(&self) -> RegionSnapshot {
        RegionSnapshot::new(
            self.settings.region_size,
            self.regions.values().map(|e| e.data),
        )
    }
}
