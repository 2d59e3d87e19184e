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

use anyhow::{Context, Result};
use std::sync::Arc;
use strata_agents::TaskScheduler;
use strata_core::gpu::{
    GpuBackend, GpuResource, TextureDescriptor, TextureDimension, TextureFormat, TextureUsage,
};
use strata_core::math::{Extent3D, Vec2, WorldRect};
use strata_core::telemetry::TelemetryEvent;
use strata_core::terrain::{Bake, LayerBakeState};
use strata_core::{OwnerId, SchedulerSettings, TerrainSettings};
use strata_data::RegionStore;
use strata_infra::SoftwareDevice;
use strata_lanes::{HeightContextStager, StitchHeightKernel, StitchOperation};

const TERRAIN_SETTINGS: &str = "(region_size: 32, vertex_spacing: 1.0)";
const SCHEDULER_SETTINGS: &str = "(max_batch_size: 16, reclaim_delay_ticks: 3)";

fn main() -> Result<()> {
    use env_logger::{Builder, Env};
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let terrain = TerrainSettings::from_ron_str(TERRAIN_SETTINGS)?;
    let scheduling = SchedulerSettings::from_ron_str(SCHEDULER_SETTINGS)?;
    let grid = terrain.grid();

    let device = SoftwareDevice::new();
    device.register_kernel(Arc::new(StitchHeightKernel));
    let backend: Arc<dyn GpuBackend> = Arc::new(device.clone());

    // A brush straddling the corner of four regions.
    let layer = LayerBakeState {
        owner: OwnerId::Layer(1),
        bounds: WorldRect::from_center_size(Vec2::new(32.0, 32.0), Vec2::splat(40.0)),
        parameters: vec![0.5],
        textures: Vec::new(),
        revision: 1,
    };

    let mut store = RegionStore::new(backend.clone(), terrain.clone());
    let regions = store
        .acquire_bounds(&layer.bounds)
        .context("Failed to load the regions under the brush")?;
    let size = terrain.region_size;
    for region in &regions {
        let (ox, oy) = grid.region_pixel_origin(region.coord);
        let heights: Vec<f32> = (0..size * size)
            .map(|i| {
                let x = ox + i64::from(i % size);
                let y = oy + i64::from(i / size);
                (x + y) as f32 * 0.25
            })
            .collect();
        store.write_heights(region.coord, &heights)?;
    }
    log::info!("Loaded {} regions around the brush", regions.len());

    let extent = grid.bounds_pixel_extent(&layer.bounds);
    let output = backend.create_texture(&TextureDescriptor {
        label: Some("brush heights".into()),
        size: Extent3D::new(extent.width, extent.height, 1),
        dimension: TextureDimension::D2,
        format: TextureFormat::R32Float,
        usage: TextureUsage::STORAGE_BINDING | TextureUsage::COPY_SRC,
    })?;

    let (telemetry_tx, telemetry_rx) = crossbeam_channel::unbounded();
    let mut scheduler =
        TaskScheduler::new(backend.clone(), scheduling).with_telemetry_sender(telemetry_tx);

    // Plan on a worker thread from baked snapshots only.
    let submitter = scheduler.submitter();
    let snapshot = store.bake();
    let planner = std::thread::spawn(move || -> Result<bool> {
        let stager = HeightContextStager::new(grid);
        let Some((staging, handle)) = stager.stage(&layer.bounds, &snapshot) else {
            return Ok(false);
        };
        let stitch = StitchOperation::new(handle, output)
            .with_label("brush stitch")
            .with_borrows(layer.borrows(&grid))
            .into_task(staging.id());
        submitter.submit(staging)?;
        submitter.submit(stitch)?;
        Ok(true)
    });
    let planned = planner
        .join()
        .map_err(|_| anyhow::anyhow!("Planner thread panicked"))??;
    if !planned {
        log::warn!("Nothing to stitch under the brush");
    }

    let reports = scheduler.run_until_idle(&store, 16)?;
    for report in &reports {
        log::info!(
            "Tick {}: {} prepared, {} completed, {} failed, {} barriers, {} reclaimed",
            report.tick,
            report.prepared.len(),
            report.completed.len(),
            report.failed.len(),
            report.barriers,
            report.reclaimed
        );
        for failure in &report.failed {
            log::error!("Task '{}' failed: {}", failure.label, failure.error);
        }
    }

    let pixels = device.read_texture_f32(output, 0)?;
    let (low, high) = pixels
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    log::info!(
        "Stitched {}x{} heights, range [{low}, {high}]",
        extent.width,
        extent.height
    );

    for region in &regions {
        scheduler.retire(store.release(region.coord));
    }
    scheduler.retire([GpuResource::Texture(output)]);

    let status = scheduler.status();
    log::info!("{}", status.message);
    let destroyed = scheduler.shutdown();
    log::info!("Shutdown destroyed {destroyed} resources");

    for event in telemetry_rx.try_iter() {
        match event {
            TelemetryEvent::MetricUpdate { id, value } => log::debug!("{id:?} = {value:?}"),
            TelemetryEvent::Diagnostic { category, message } => {
                log::warn!("[{category}] {message}")
            }
        }
    }
    Ok(())
}
