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

//! Bind groups, dispatch commands, copies, and work-group math.
//!
//! Every compute shader in the pipeline runs with a fixed local work-group size
//! of `8 × 8 × 1`; [`workgroup_count`] converts a pixel extent into the number
//! of groups to dispatch along one axis.

use crate::gpu::api::resource::{BindGroupId, BufferId, ComputePipelineId, SamplerId, TextureId};
use crate::math::{Extent2D, Origin2D};
use std::borrow::Cow;

/// The fixed local work-group size along x and y.
pub const WORKGROUP_SIZE: u32 = 8;

/// Number of work groups needed to cover `extent` invocations along one axis.
#[inline]
pub const fn workgroup_count(extent: u32) -> u32 {
    extent.div_ceil(WORKGROUP_SIZE)
}

/// How a buffer is exposed to a shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferBindingKind {
    /// Read-only uniform data.
    Uniform,
    /// Structured storage data.
    Storage,
}

/// The resource bound at one numbered slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingResource {
    /// An image the shader reads and writes texel by texel.
    StorageImage(TextureId),
    /// An image the shader samples, optionally through an explicit sampler.
    SampledImage {
        /// The sampled texture.
        texture: TextureId,
        /// The sampler, or `None` for the backend's nearest/clamp default.
        sampler: Option<SamplerId>,
    },
    /// A uniform or storage buffer.
    Buffer {
        /// The bound buffer.
        buffer: BufferId,
        /// How the shader sees it.
        kind: BufferBindingKind,
    },
}

impl BindingResource {
    /// The texture behind this binding, if it is an image.
    pub fn texture(&self) -> Option<TextureId> {
        match self {
            BindingResource::StorageImage(t) => Some(*t),
            BindingResource::SampledImage { texture, .. } => Some(*texture),
            BindingResource::Buffer { .. } => None,
        }
    }
}

/// A single entry in a bind group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindGroupEntry {
    /// The binding slot (`@binding(n)` in the shader).
    pub binding: u32,
    /// The resource to bind.
    pub resource: BindingResource,
}

/// Describes a bind group to be created for a compute pipeline.
#[derive(Debug, Clone)]
pub struct BindGroupDescriptor<'a> {
    /// Optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The pipeline whose layout the entries must satisfy.
    pub pipeline: ComputePipelineId,
    /// The resources to bind at each slot.
    pub entries: &'a [BindGroupEntry],
}

/// Everything needed to issue one compute dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchCommand {
    /// Optional debug label.
    pub label: Option<String>,
    /// The compute pipeline to run.
    pub pipeline: ComputePipelineId,
    /// The resources bound for this dispatch.
    pub bind_group: BindGroupId,
    /// The tightly-packed parameter block (push constants).
    pub parameters: Vec<u8>,
    /// Work-group counts along x, y, and z.
    pub workgroups: [u32; 3],
}

/// A texture-to-texture copy of one 2D region between (possibly layered) textures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureCopy {
    /// The texture to read from.
    pub source: TextureId,
    /// The array layer to read from.
    pub source_layer: u32,
    /// The top-left texel of the copied region in the source.
    pub source_origin: Origin2D,
    /// The texture to write to.
    pub destination: TextureId,
    /// The array layer to write to.
    pub destination_layer: u32,
    /// The top-left texel of the written region in the destination.
    pub destination_origin: Origin2D,
    /// The size of the copied region.
    pub extent: Extent2D,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workgroup_count_rounds_up() {
        assert_eq!(workgroup_count(0), 0);
        assert_eq!(workgroup_count(1), 1);
        assert_eq!(workgroup_count(8), 1);
        assert_eq!(workgroup_count(9), 2);
        assert_eq!(workgroup_count(256), 32);
        assert_eq!(workgroup_count(257), 33);
    }

    #[test]
    fn binding_resource_exposes_texture() {
        let sampled = BindingResource::SampledImage {
            texture: TextureId(4),
            sampler: None,
        };
        assert_eq!(sampled.texture(), Some(TextureId(4)));
        let buffer = BindingResource::Buffer {
            buffer: BufferId(1),
            kind: BufferBindingKind::Storage,
        };
        assert_eq!(buffer.texture(), None);
    }
}
