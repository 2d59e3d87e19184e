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

use super::{HeightContextHandle, StitchParams};
use crate::compute_lane::ComputeOperationBuilder;
use crate::shaders::{
    STITCH_HEIGHT_ARRAY_BINDING, STITCH_HEIGHT_KERNEL, STITCH_METADATA_BINDING,
    STITCH_OUTPUT_BINDING,
};
use strata_core::gpu::{BufferBindingKind, TextureId};
use strata_core::task::{GpuTask, OwnerId, TaskId};

/// The stitch dispatch that consumes a staged height context.
///
/// The output texture is caller-owned and must be an `R32Float` storage image
/// at least as large as the staged bounds.
#[derive(Debug, Clone)]
pub struct StitchOperation {
    context: HeightContextHandle,
    output: TextureId,
    sample_offset: [i32; 2],
    label: String,
    borrows: Vec<OwnerId>,
}

impl StitchOperation {
    /// Stitches `context` into `output`.
    pub fn new(context: HeightContextHandle, output: TextureId) -> Self {
        Self {
            context,
            output,
            sample_offset: [0, 0],
            label: "stitch heights".to_string(),
            borrows: Vec::new(),
        }
    }

    /// Shifts every sample by `offset` pixels; `[1, 0]` reads one pixel east.
    /// Coordinates saturate, so an offset beyond the staged area reads its edge.
    pub fn with_sample_offset(mut self, offset: [i32; 2]) -> Self {
        self.sample_offset = offset;
        self
    }

    /// Overrides the task label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Declares the owner of the output texture.
    pub fn with_borrows(mut self, owners: impl IntoIterator<Item = OwnerId>) -> Self {
        self.borrows.extend(owners);
        self
    }

    /// Builds the task. It runs after `staging` and takes over the staged
    /// context's resources as its own temporaries. If the task fails before
    /// taking them, failing it hands them back instead.
    pub fn into_task(self, staging: TaskId) -> GpuTask {
        let Self {
            context,
            output,
            sample_offset,
            label,
            borrows,
        } = self;
        let dispatch_label = label.clone();
        let unclaimed = context.clone();

        GpuTask::new(label, move |ctx| {
            let staged = context.take()?;
            let params = StitchParams {
                region_size: staged.region_size,
                slice_count: staged.slice_count,
                sample_offset,
                output_extent: [staged.output_extent.width, staged.output_extent.height],
                _padding: [0; 2],
            };
            let built = ComputeOperationBuilder::new(ctx.backend(), STITCH_HEIGHT_KERNEL)
                .with_label(dispatch_label)
                .bind_sampled_image(STITCH_HEIGHT_ARRAY_BINDING, staged.array, None)
                .bind_buffer(
                    STITCH_METADATA_BINDING,
                    staged.metadata,
                    BufferBindingKind::Storage,
                )
                .bind_storage_image(STITCH_OUTPUT_BINDING, output)
                .push_parameter(params)
                .dispatch_extent(staged.max_slice_extent.width, staged.max_slice_extent.height)
                .dispatch_layers(staged.slice_count)
                .build();

            match built {
                Ok(operation) => Ok(operation
                    .into_prepared_work()
                    .with_temporaries(staged.resources())),
                Err(e) => {
                    ctx.retire(staged.resources());
                    Err(e.into())
                }
            }
        })
        .with_dependencies([staging])
        .with_borrows(borrows)
        .with_on_fail(move || unclaimed.release())
    }
}
