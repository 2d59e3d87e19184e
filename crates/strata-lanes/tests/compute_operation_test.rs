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
use strata_lanes::{BuildError, ComputeOperationBuilder};

// --- DUMMY KERNEL FOR THIS TEST ---
// Fills the storage image at slot 0 with the first parameter.
#[derive(Debug)]
struct FillKernel;

impl ComputeKernel for FillKernel {
    fn name(&self) -> &str {
        "fill"
    }

    fn invoke(
        &self,
        invocation: KernelInvocation,
        parameters: &[u8],
        resources: &mut dyn KernelResources,
    ) -> Result<(), KernelError> {
        let [x, y, z] = invocation.global_id;
        let extent = resources.image_extent(0)?;
        if x >= extent.width || y >= extent.height || z >= extent.depth_or_array_layers {
            return Ok(());
        }
        let value: f32 = bytemuck::pod_read_unaligned(&parameters[..4]);
        resources.store_f32(0, x, y, z, value)
    }
}

fn device_with_fill() -> SoftwareDevice {
    let device = SoftwareDevice::new();
    device.register_kernel(Arc::new(FillKernel));
    device
}

fn storage_texture(device: &SoftwareDevice, w: u32, h: u32, layers: u32) -> TextureId {
    device
        .create_texture(&TextureDescriptor {
            label: None,
            size: Extent3D::new(w, h, layers),
            dimension: TextureDimension::D2Array,
            format: TextureFormat::R32Float,
            usage: TextureUsage::STORAGE_BINDING,
        })
        .unwrap()
}

#[test]
fn test_built_operation_dispatches_over_the_extent() {
    // --- 1. ARRANGE ---
    let device = device_with_fill();
    let target = storage_texture(&device, 17, 8, 3);

    // --- 2. ACT ---
    let operation = ComputeOperationBuilder::new(&device, "fill")
        .with_label("fill test")
        .bind_storage_image(0, target)
        .push_parameter(7.5f32)
        .add_padding(12)
        .dispatch_extent(17, 8)
        .dispatch_layers(3)
        .build()
        .unwrap();
    let mut list = device.create_command_list(None);
    operation.record(list.as_mut());
    let submission = device.submit(list).unwrap();
    device.wait(submission).unwrap();

    // --- 3. ASSERT ---
    assert_eq!(operation.command().workgroups, [3, 1, 3]);
    assert_eq!(operation.command().parameters.len(), 16);
    assert_eq!(
        operation.resources().len(),
        1,
        "Only the bind group is allocated"
    );
    for layer in 0..3 {
        assert!(device
            .read_texture_f32(target, layer)
            .unwrap()
            .iter()
            .all(|&v| v == 7.5));
    }
}

#[test]
fn test_uploaded_buffers_and_samplers_are_reported() {
    // --- 1. ARRANGE ---
    let device = device_with_fill();
    let target = storage_texture(&device, 8, 8, 1);
    let sampled = storage_texture(&device, 8, 8, 1);
    let baseline = device.live_resource_count();

    // --- 2. ACT ---
    let operation = ComputeOperationBuilder::new(&device, "fill")
        .bind_storage_image(0, target)
        .bind_sampled_image(1, sampled, Some(SamplerDescriptor::default()))
        .bind_uniform_buffer(2, &[0u8; 16])
        .push_parameter([1.0f32; 4])
        .dispatch_extent(8, 8)
        .build()
        .unwrap();

    // --- 3. ASSERT ---
    assert_eq!(operation.resources().len(), 3);
    assert_eq!(device.live_resource_count(), baseline + 3);
    for resource in operation.resources() {
        device.destroy_resource(*resource).unwrap();
    }
    assert_eq!(device.live_resource_count(), baseline);
}

#[test]
fn test_missing_shader_allocates_nothing() {
    // --- 1. ARRANGE ---
    let device = SoftwareDevice::new();
    let target = storage_texture(&device, 8, 8, 1);
    let baseline = device.live_resource_count();

    // --- 2. ACT ---
    let result = ComputeOperationBuilder::new(&device, "erode")
        .bind_storage_image(0, target)
        .bind_storage_buffer(1, &[0u8; 64])
        .dispatch_extent(8, 8)
        .build();

    // --- 3. ASSERT ---
    assert!(matches!(
        result,
        Err(BuildError::PipelineUnavailable {
            source: PipelineError::ShaderNotFound { .. },
            ..
        })
    ));
    assert_eq!(device.live_resource_count(), baseline);
}

#[test]
fn test_broken_pipeline_is_reported() {
    // --- 1. ARRANGE ---
    let device = device_with_fill();
    device.mark_pipeline_broken("fill", "binding 0 has no layout");
    let target = storage_texture(&device, 8, 8, 1);

    // --- 2. ACT ---
    let result = ComputeOperationBuilder::new(&device, "fill")
        .bind_storage_image(0, target)
        .dispatch_extent(8, 8)
        .build();

    // --- 3. ASSERT ---
    match result {
        Err(BuildError::PipelineUnavailable { shader, source }) => {
            assert_eq!(shader, "fill");
            assert!(matches!(source, PipelineError::CompilationFailed { .. }));
        }
        other => panic!("expected a pipeline failure, got {other:?}"),
    }
}

#[test]
fn test_allocation_failure_rolls_back_earlier_allocations() {
    // --- 1. ARRANGE ---
    let device = device_with_fill();
    let target = storage_texture(&device, 8, 8, 1);
    let baseline = device.live_resource_count();
    // Room for the first buffer only.
    device.set_resource_limit(Some(baseline + 1));

    // --- 2. ACT ---
    let result = ComputeOperationBuilder::new(&device, "fill")
        .bind_storage_image(0, target)
        .bind_storage_buffer(1, &[0u8; 32])
        .bind_uniform_buffer(2, &[0u8; 16])
        .dispatch_extent(8, 8)
        .build();

    // --- 3. ASSERT ---
    match result {
        Err(BuildError::Allocation { what, source, .. }) => {
            assert_eq!(what, "buffer at slot 2");
            assert!(matches!(source, ResourceError::OutOfMemory { .. }));
        }
        other => panic!("expected an allocation failure, got {other:?}"),
    }
    assert_eq!(
        device.live_resource_count(),
        baseline,
        "The first buffer must be destroyed again"
    );
}
