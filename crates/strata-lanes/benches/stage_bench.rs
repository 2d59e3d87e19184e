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

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use strata_core::gpu::TextureId;
use strata_core::math::{Vec2, WorldRect};
use strata_core::terrain::{compute_region_overlap, RegionCoord, RegionData, RegionGrid, RegionSnapshot};
use strata_lanes::HeightContextStager;

fn bench_staging(c: &mut Criterion) {
    let grid = RegionGrid::new(256, 0.5);
    let extent = grid.region_world_extent();

    // A 16x16 block of loaded regions.
    let snapshot = RegionSnapshot::new(
        grid.region_size,
        (0..16 * 16).map(|i| RegionData {
            coord: RegionCoord::new(i % 16, i / 16),
            height: TextureId(i as usize * 2),
            control: TextureId(i as usize * 2 + 1),
            size: grid.region_size,
        }),
    );
    let bounds = WorldRect::from_center_size(
        Vec2::splat(8.0 * extent),
        Vec2::splat(5.3 * extent),
    );

    let mut group = c.benchmark_group("Height Staging");

    group.bench_function("Overlap sweep (16x16)", |b| {
        b.iter(|| {
            let mut covered = 0i64;
            for y in 0..16 {
                for x in 0..16 {
                    if let Some(overlap) =
                        compute_region_overlap(&grid, RegionCoord::new(x, y), black_box(&bounds))
                    {
                        covered += (overlap.region_rect.width * overlap.region_rect.height) as i64;
                    }
                }
            }
            black_box(covered);
        });
    });

    let stager = HeightContextStager::new(grid);
    group.bench_function("Plan (36 slices)", |b| {
        b.iter(|| black_box(stager.plan(black_box(&bounds), &snapshot)));
    });

    group.finish();
}

criterion_group!(benches, bench_staging);
criterion_main!(benches);
