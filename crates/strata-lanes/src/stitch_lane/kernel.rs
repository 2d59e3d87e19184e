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

use super::{sample_height_stitched, StitchMetadata, StitchParams};
use crate::shaders::{
    STITCH_HEIGHT_ARRAY_BINDING, STITCH_HEIGHT_KERNEL, STITCH_METADATA_BINDING,
    STITCH_OUTPUT_BINDING,
};
use strata_core::gpu::{ComputeKernel, KernelError, KernelInvocation, KernelResources};

/// CPU implementation of the `sample_height_stitched` kernel.
///
/// Invocation `(x, y, z)` handles pixel `(x, y)` of slice `z`'s overlapped
/// rectangle: it samples the array at that source pixel plus the sample
/// offset and writes the result to the matching output pixel.
#[derive(Debug, Clone, Copy, Default)]
pub struct StitchHeightKernel;

impl StitchHeightKernel {
    fn metadata(resources: &dyn KernelResources, slice: u32) -> Result<StitchMetadata, KernelError> {
        let bytes = resources.buffer(STITCH_METADATA_BINDING)?;
        let record = std::mem::size_of::<StitchMetadata>();
        let start = slice as usize * record;
        let raw = bytes.get(start..start + record).ok_or_else(|| {
            KernelError::InvalidParameters(format!("no metadata record for slice {slice}"))
        })?;
        bytemuck::try_pod_read_unaligned(raw)
            .map_err(|e| KernelError::InvalidParameters(format!("metadata record: {e}")))
    }
}

impl ComputeKernel for StitchHeightKernel {
    fn name(&self) -> &str {
        STITCH_HEIGHT_KERNEL
    }

    fn invoke(
        &self,
        invocation: KernelInvocation,
        parameters: &[u8],
        resources: &mut dyn KernelResources,
    ) -> Result<(), KernelError> {
        let params: StitchParams = parameters
            .get(..std::mem::size_of::<StitchParams>())
            .and_then(|raw| bytemuck::try_pod_read_unaligned(raw).ok())
            .ok_or_else(|| {
                KernelError::InvalidParameters(format!(
                    "expected {} parameter bytes, got {}",
                    std::mem::size_of::<StitchParams>(),
                    parameters.len()
                ))
            })?;

        let [x, y, slice] = invocation.global_id;
        if slice >= params.slice_count {
            return Ok(());
        }
        let meta = Self::metadata(resources, slice)?;
        let source = meta.source();
        let dest = meta.dest();
        if x as i32 >= source.width || y as i32 >= source.height {
            return Ok(());
        }

        // Offsets are caller-supplied; anything past the slice clamps anyway.
        let coord = [
            source
                .x
                .saturating_add(x as i32)
                .saturating_add(params.sample_offset[0]),
            source
                .y
                .saturating_add(y as i32)
                .saturating_add(params.sample_offset[1]),
        ];
        let height = sample_height_stitched(&meta, coord, params.region_size, |layer, sx, sy| {
            resources.load_f32(STITCH_HEIGHT_ARRAY_BINDING, sx, sy, layer)
        })?;

        let (ox, oy) = (dest.x + x as i32, dest.y + y as i32);
        if ox < 0 || oy < 0 {
            return Err(KernelError::OutOfBounds {
                binding: STITCH_OUTPUT_BINDING,
                texel: [0, 0, 0],
            });
        }
        resources.store_f32(STITCH_OUTPUT_BINDING, ox as u32, oy as u32, 0, height)
    }
}
