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

use super::{HeightContext, HeightContextHandle, StageError, StitchMetadata};
use std::collections::BTreeMap;
use strata_core::gpu::{
    BufferDescriptor, BufferUsage, TextureCopy, TextureDescriptor, TextureDimension,
    TextureFormat, TextureUsage,
};
use strata_core::math::{Extent2D, Extent3D, Origin2D, WorldRect};
use strata_core::task::{GpuTask, OwnerId, PreparedWork};
use strata_core::terrain::{
    compute_region_overlap, NeighborDirection, RegionCoord, RegionGrid, RegionOverlap,
    RegionProvider, NO_NEIGHBOR,
};

/// The slices and metadata of one staging pass, computed without touching the GPU.
#[derive(Debug, Clone, PartialEq)]
pub struct StagePlan {
    /// The staged world bounds.
    pub bounds: WorldRect,
    /// The pixel size of the image covering `bounds`.
    pub output_extent: Extent2D,
    /// The staged regions in slice order, with their overlap.
    pub slices: Vec<(RegionCoord, RegionOverlap)>,
    /// One record per slice.
    pub metadata: Vec<StitchMetadata>,
    /// The largest overlap of any slice.
    pub max_slice_extent: Extent2D,
}

impl StagePlan {
    /// The number of slices.
    pub fn slice_count(&self) -> u32 {
        self.slices.len() as u32
    }

    /// The region owners the staging copies read.
    pub fn borrows(&self) -> impl Iterator<Item = OwnerId> + '_ {
        self.slices.iter().map(|(coord, _)| OwnerId::Region(*coord))
    }
}

/// Gathers the heights of every loaded region under a world rectangle.
#[derive(Debug, Clone, Copy)]
pub struct HeightContextStager {
    grid: RegionGrid,
}

impl HeightContextStager {
    /// Creates a stager for regions laid out on `grid`.
    pub fn new(grid: RegionGrid) -> Self {
        Self { grid }
    }

    /// The grid the stager plans on.
    pub fn grid(&self) -> &RegionGrid {
        &self.grid
    }

    /// Plans the slices for `bounds`.
    ///
    /// Regions are visited in row-major order; regions that are not loaded,
    /// and regions whose overlap rounds to no pixel, are skipped. Returns
    /// `None` when no slice survives.
    pub fn plan(&self, bounds: &WorldRect, regions: &dyn RegionProvider) -> Option<StagePlan> {
        let slices: Vec<(RegionCoord, RegionOverlap)> = self
            .grid
            .regions_overlapping(bounds)
            .into_iter()
            .filter(|coord| regions.contains(*coord))
            .filter_map(|coord| {
                compute_region_overlap(&self.grid, coord, bounds)
                    .filter(|overlap| !overlap.is_empty())
                    .map(|overlap| (coord, overlap))
            })
            .collect();
        if slices.is_empty() {
            log::debug!("HeightContextStager: No loaded region under {bounds:?}");
            return None;
        }

        let index: BTreeMap<RegionCoord, i32> = slices
            .iter()
            .enumerate()
            .map(|(i, (coord, _))| (*coord, i as i32))
            .collect();

        let mut max_slice_extent = Extent2D::default();
        let metadata = slices
            .iter()
            .enumerate()
            .map(|(i, (coord, overlap))| {
                max_slice_extent = max_slice_extent.max(Extent2D::new(
                    overlap.region_rect.width as u32,
                    overlap.region_rect.height as u32,
                ));
                let mut neighbors = [NO_NEIGHBOR; 8];
                for direction in NeighborDirection::ALL {
                    if let Some(&slice) = index.get(&coord.neighbor(direction)) {
                        neighbors[direction.index()] = slice;
                    }
                }
                let (ox, oy) = self.grid.region_pixel_origin(*coord);
                StitchMetadata {
                    world_pixel_offset: [ox as i32, oy as i32],
                    source_rect: overlap.region_rect.to_array(),
                    dest_rect: overlap.bounds_rect.to_array(),
                    slice_index: i as i32,
                    neighbors,
                    _padding: 0,
                }
            })
            .collect();

        Some(StagePlan {
            bounds: *bounds,
            output_extent: self.grid.bounds_pixel_extent(bounds),
            slices,
            metadata,
            max_slice_extent,
        })
    }

    /// Builds the staging task for `bounds`.
    ///
    /// `regions` is only used to plan; it may be a snapshot taken on another
    /// thread. The task looks the regions up again when it is prepared and
    /// fails if one of them was unloaded in between. On success the returned
    /// handle receives the context; it owns the array and the metadata buffer
    /// from then on. Failing either the staging task or its consumer releases
    /// a context nobody took.
    pub fn stage(
        &self,
        bounds: &WorldRect,
        regions: &dyn RegionProvider,
    ) -> Option<(GpuTask, HeightContextHandle)> {
        let plan = self.plan(bounds, regions)?;
        let handle = HeightContextHandle::new();
        let publish = handle.clone();
        let unclaimed = handle.clone();
        let region_size = self.grid.region_size;
        let borrows: Vec<OwnerId> = plan.borrows().collect();
        let label = format!("stage heights ({} regions)", plan.slices.len());
        log::trace!(
            "HeightContextStager: Planned {} slices for {:?}",
            plan.slices.len(),
            plan.bounds
        );

        let task = GpuTask::new(label, move |ctx| {
            let backend = ctx.backend();
            let live = ctx.regions();

            let mut sources = Vec::with_capacity(plan.slices.len());
            for (coord, _) in &plan.slices {
                let data = live
                    .get_region(*coord)
                    .ok_or(StageError::RegionUnloaded(*coord))?;
                if data.size != region_size {
                    return Err(StageError::RegionSizeMismatch {
                        coord: *coord,
                        expected: region_size,
                        actual: data.size,
                    }
                    .into());
                }
                sources.push(data.height);
            }

            let slice_count = plan.slice_count();
            let array = backend
                .create_texture(&TextureDescriptor {
                    label: Some("height context array".into()),
                    size: Extent3D::new(region_size, region_size, slice_count),
                    dimension: TextureDimension::D2Array,
                    format: TextureFormat::R32Float,
                    usage: TextureUsage::COPY_DST | TextureUsage::TEXTURE_BINDING,
                })
                .map_err(|source| StageError::Allocation {
                    what: "height array",
                    source,
                })?;
            let metadata_bytes: &[u8] = bytemuck::cast_slice(&plan.metadata);
            let metadata = match backend.create_buffer_with_data(
                &BufferDescriptor {
                    label: Some("height context metadata".into()),
                    size: metadata_bytes.len() as u64,
                    usage: BufferUsage::STORAGE | BufferUsage::COPY_DST,
                },
                metadata_bytes,
            ) {
                Ok(id) => id,
                Err(source) => {
                    if let Err(e) = backend.destroy_texture(array) {
                        log::error!("HeightContextStager: Failed to roll back the height array: {e}");
                    }
                    return Err(StageError::Allocation {
                        what: "metadata buffer",
                        source,
                    }
                    .into());
                }
            };

            publish.fill(HeightContext {
                array,
                metadata,
                slice_count,
                region_size,
                output_extent: plan.output_extent,
                max_slice_extent: plan.max_slice_extent,
            });

            let copies: Vec<TextureCopy> = sources
                .into_iter()
                .enumerate()
                .map(|(slice, height)| TextureCopy {
                    source: height,
                    source_layer: 0,
                    source_origin: Origin2D::ZERO,
                    destination: array,
                    destination_layer: slice as u32,
                    destination_origin: Origin2D::ZERO,
                    extent: Extent2D::new(region_size, region_size),
                })
                .collect();
            Ok(PreparedWork::new(move |commands| {
                for copy in &copies {
                    commands.copy_texture_to_texture(copy);
                }
            }))
        })
        .with_borrows(borrows)
        .with_on_fail(move || unclaimed.release());

        Some((task, handle))
    }
}
