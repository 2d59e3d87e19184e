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
use strata_core::gpu::*;
use strata_core::math::Extent3D;
use strata_infra::SoftwareDevice;

// --- DUMMY KERNEL FOR THIS TEST ---
// Writes `source + layer * 100` into the output image, one texel per invocation.
#[derive(Debug)]
struct OffsetKernel;

impl ComputeKernel for OffsetKernel {
    fn name(&self) -> &str {
        "offset"
    }

    fn invoke(
        &self,
        invocation: KernelInvocation,
        _parameters: &[u8],
        resources: &mut dyn KernelResources,
    ) -> Result<(), KernelError> {
        let [x, y, z] = invocation.global_id;
        let extent = resources.image_extent(1)?;
        if x >= extent.width || y >= extent.height {
            return Ok(());
        }
        let value = resources.load_f32(0, x, y, 0)?;
        resources.store_f32(1, x, y, z, value + z as f32 * 100.0)
    }
}

fn texture(device: &SoftwareDevice, w: u32, h: u32, layers: u32) -> TextureId {
    device
        .create_texture(&TextureDescriptor {
            label: None,
            size: Extent3D::new(w, h, layers),
            dimension: TextureDimension::D2Array,
            format: TextureFormat::R32Float,
            usage: TextureUsage::STORAGE_BINDING | TextureUsage::TEXTURE_BINDING,
        })
        .unwrap()
}

#[test]
fn test_dispatch_runs_kernel_over_every_layer() {
    // --- 1. ARRANGE ---
    let device = SoftwareDevice::new();
    device.register_kernel(Arc::new(OffsetKernel));
    let input = texture(&device, 3, 2, 1);
    let output = texture(&device, 3, 2, 2);
    let values: Vec<f32> = (0..6).map(|v| v as f32).collect();
    device
        .write_texture(input, 0, bytemuck::cast_slice(&values))
        .unwrap();

    let pipeline = device.compute_pipeline("offset").unwrap();
    let entries = [
        BindGroupEntry {
            binding: 0,
            resource: BindingResource::SampledImage {
                texture: input,
                sampler: None,
            },
        },
        BindGroupEntry {
            binding: 1,
            resource: BindingResource::StorageImage(output),
        },
    ];
    let bind_group = device
        .create_bind_group(&BindGroupDescriptor {
            label: None,
            pipeline,
            entries: &entries,
        })
        .unwrap();

    // --- 2. ACT ---
    let mut list = device.create_command_list(Some("offset pass"));
    list.dispatch(&DispatchCommand {
        label: None,
        pipeline,
        bind_group,
        parameters: Vec::new(),
        workgroups: [workgroup_count(3), workgroup_count(2), 2],
    });
    let submission = device.submit(list).unwrap();
    device.wait(submission).unwrap();

    // --- 3. ASSERT ---
    assert_eq!(device.read_texture_f32(output, 0).unwrap(), values);
    assert_eq!(
        device.read_texture_f32(output, 1).unwrap(),
        values.iter().map(|v| v + 100.0).collect::<Vec<_>>()
    );
    assert!(
        device.is_alive(GpuResource::Texture(input)),
        "Bound textures must be returned to the device after the dispatch"
    );
    assert_eq!(device.submissions()[0].dispatch_count(), 1);
}

#[test]
fn test_storing_into_sampled_image_fails_the_submission() {
    // --- 1. ARRANGE ---
    let device = SoftwareDevice::new();
    device.register_kernel(Arc::new(OffsetKernel));
    let input = texture(&device, 2, 2, 1);
    let read_only_output = texture(&device, 2, 2, 1);
    let pipeline = device.compute_pipeline("offset").unwrap();
    let entries = [
        BindGroupEntry {
            binding: 0,
            resource: BindingResource::SampledImage {
                texture: input,
                sampler: None,
            },
        },
        BindGroupEntry {
            binding: 1,
            resource: BindingResource::SampledImage {
                texture: read_only_output,
                sampler: None,
            },
        },
    ];
    let bind_group = device
        .create_bind_group(&BindGroupDescriptor {
            label: None,
            pipeline,
            entries: &entries,
        })
        .unwrap();
    let mut list = device.create_command_list(None);
    list.dispatch(&DispatchCommand {
        label: None,
        pipeline,
        bind_group,
        parameters: Vec::new(),
        workgroups: [1, 1, 1],
    });

    // --- 2. ACT ---
    let result = device.submit(list);

    // --- 3. ASSERT ---
    assert!(matches!(
        result,
        Err(ResourceError::Kernel(KernelError::WrongBindingKind { binding: 1, .. }))
    ));
    assert!(device.is_alive(GpuResource::Texture(read_only_output)));
}

#[test]
fn test_bind_group_rejects_missing_resources() {
    // --- 1. ARRANGE ---
    let device = SoftwareDevice::new();
    device.register_kernel(Arc::new(OffsetKernel));
    let pipeline = device.compute_pipeline("offset").unwrap();
    let gone = texture(&device, 1, 1, 1);
    device.destroy_texture(gone).unwrap();
    let entries = [BindGroupEntry {
        binding: 1,
        resource: BindingResource::StorageImage(gone),
    }];

    // --- 2. ACT ---
    let result = device.create_bind_group(&BindGroupDescriptor {
        label: Some("stale".into()),
        pipeline,
        entries: &entries,
    });

    // --- 3. ASSERT ---
    assert_eq!(result, Err(ResourceError::NotFound));
    assert_eq!(device.live_resource_count(), 0);
}
