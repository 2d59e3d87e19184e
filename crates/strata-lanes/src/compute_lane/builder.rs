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

use super::{BuildError, ComputeOperation, ParameterBlock};
use bytemuck::Pod;
use std::borrow::Cow;
use strata_core::gpu::{
    workgroup_count, BindGroupDescriptor, BindGroupEntry, BindingResource, BufferBindingKind,
    BufferDescriptor, BufferId, BufferUsage, DispatchCommand, GpuBackend, GpuResource,
    SamplerDescriptor, TextureId,
};
use strata_core::math::Extent2D;

#[derive(Debug)]
enum PendingResource {
    Ready(BindingResource),
    SampledWith {
        texture: TextureId,
        sampler: SamplerDescriptor<'static>,
    },
    Upload {
        bytes: Vec<u8>,
        kind: BufferBindingKind,
    },
}

/// Builds one compute dispatch.
///
/// Bindings and parameters are collected first; nothing is allocated until
/// [`build`](Self::build). If the pipeline is unavailable the build fails
/// before touching the backend's allocators, and if any later allocation
/// fails everything allocated so far is destroyed again.
///
/// ```ignore
/// let op = ComputeOperationBuilder::new(backend, "erode")
///     .bind_storage_image(0, heights)
///     .bind_uniform_buffer(1, bytemuck::bytes_of(&settings))
///     .push_parameter(strength)
///     .add_padding(12)
///     .dispatch_extent(256, 256)
///     .build()?;
/// ```
#[derive(Debug)]
pub struct ComputeOperationBuilder<'a> {
    backend: &'a dyn GpuBackend,
    shader: String,
    label: Option<String>,
    bindings: Vec<(u32, PendingResource)>,
    parameters: ParameterBlock,
    extent: Option<Extent2D>,
    layers: u32,
    error: Option<BuildError>,
}

impl<'a> ComputeOperationBuilder<'a> {
    /// Starts a dispatch of the named shader.
    pub fn new(backend: &'a dyn GpuBackend, shader: impl Into<String>) -> Self {
        Self {
            backend,
            shader: shader.into(),
            label: None,
            bindings: Vec::new(),
            parameters: ParameterBlock::new(),
            extent: None,
            layers: 1,
            error: None,
        }
    }

    /// Sets the debug label of the dispatch and its resources.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Binds an image the shader reads and writes texel by texel.
    pub fn bind_storage_image(self, slot: u32, texture: TextureId) -> Self {
        self.bind(slot, PendingResource::Ready(BindingResource::StorageImage(texture)))
    }

    /// Binds an image the shader samples. With `sampler` set, a dedicated
    /// sampler is created with that filter and wrap mode.
    pub fn bind_sampled_image(
        self,
        slot: u32,
        texture: TextureId,
        sampler: Option<SamplerDescriptor<'static>>,
    ) -> Self {
        let pending = match sampler {
            Some(sampler) => PendingResource::SampledWith { texture, sampler },
            None => PendingResource::Ready(BindingResource::SampledImage {
                texture,
                sampler: None,
            }),
        };
        self.bind(slot, pending)
    }

    /// Uploads `bytes` into a new storage buffer and binds it.
    pub fn bind_storage_buffer(self, slot: u32, bytes: &[u8]) -> Self {
        self.bind(
            slot,
            PendingResource::Upload {
                bytes: bytes.to_vec(),
                kind: BufferBindingKind::Storage,
            },
        )
    }

    /// Uploads `bytes` into a new uniform buffer and binds it.
    pub fn bind_uniform_buffer(self, slot: u32, bytes: &[u8]) -> Self {
        self.bind(
            slot,
            PendingResource::Upload {
                bytes: bytes.to_vec(),
                kind: BufferBindingKind::Uniform,
            },
        )
    }

    /// Binds an existing buffer the caller owns.
    pub fn bind_buffer(self, slot: u32, buffer: BufferId, kind: BufferBindingKind) -> Self {
        self.bind(
            slot,
            PendingResource::Ready(BindingResource::Buffer { buffer, kind }),
        )
    }

    /// Appends a value to the parameter block.
    pub fn push_parameter<T: Pod>(mut self, value: T) -> Self {
        self.parameters.push(value);
        self
    }

    /// Appends `bytes` zero bytes to the parameter block.
    pub fn add_padding(mut self, bytes: usize) -> Self {
        self.parameters.add_padding(bytes);
        self
    }

    /// Sets the number of invocations along x and y; work groups are `8 × 8`.
    pub fn dispatch_extent(mut self, width: u32, height: u32) -> Self {
        self.extent = Some(Extent2D::new(width, height));
        self
    }

    /// Sets the number of work groups along z, one per array slice.
    pub fn dispatch_layers(mut self, layers: u32) -> Self {
        self.layers = layers;
        self
    }

    fn bind(mut self, slot: u32, pending: PendingResource) -> Self {
        if self.error.is_none() && self.bindings.iter().any(|(bound, _)| *bound == slot) {
            self.error = Some(BuildError::DuplicateBinding(slot));
        }
        self.bindings.push((slot, pending));
        self
    }

    /// Resolves the pipeline, allocates the pending resources and the bind
    /// group, and returns the finished operation.
    /// ## Errors
    /// See [`BuildError`]. No resource outlives a failed build.
    pub fn build(mut self) -> Result<ComputeOperation, BuildError> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        let extent = self
            .extent
            .ok_or_else(|| BuildError::MissingDispatchExtent(self.shader.clone()))?;
        if !self.parameters.is_aligned() {
            return Err(BuildError::MisalignedParameters {
                len: self.parameters.len(),
            });
        }

        let pipeline = self.backend.compute_pipeline(&self.shader).map_err(|source| {
            log::error!(
                "ComputeOperationBuilder: Pipeline '{}' unavailable: {source}",
                self.shader
            );
            BuildError::PipelineUnavailable {
                shader: self.shader.clone(),
                source,
            }
        })?;

        let mut allocated = Vec::new();
        let mut entries = Vec::with_capacity(self.bindings.len());
        for (slot, pending) in &self.bindings {
            match self.resolve(*slot, pending, &mut allocated) {
                Ok(resource) => entries.push(BindGroupEntry {
                    binding: *slot,
                    resource,
                }),
                Err(error) => {
                    self.roll_back(&allocated);
                    return Err(error);
                }
            }
        }

        let bind_group = match self.backend.create_bind_group(&BindGroupDescriptor {
            label: self.label.as_deref().map(Cow::Borrowed),
            pipeline,
            entries: &entries,
        }) {
            Ok(id) => id,
            Err(source) => {
                self.roll_back(&allocated);
                return Err(self.allocation_error("bind group", source));
            }
        };
        allocated.push(GpuResource::BindGroup(bind_group));

        let command = DispatchCommand {
            label: self.label.clone(),
            pipeline,
            bind_group,
            parameters: self.parameters.into_bytes(),
            workgroups: [
                workgroup_count(extent.width),
                workgroup_count(extent.height),
                self.layers,
            ],
        };
        log::trace!(
            "ComputeOperationBuilder: Built '{}' with {:?} work groups",
            self.shader,
            command.workgroups
        );
        Ok(ComputeOperation::new(command, allocated))
    }

    fn resolve(
        &self,
        slot: u32,
        pending: &PendingResource,
        allocated: &mut Vec<GpuResource>,
    ) -> Result<BindingResource, BuildError> {
        match pending {
            PendingResource::Ready(resource) => Ok(*resource),
            PendingResource::SampledWith { texture, sampler } => {
                let sampler = self
                    .backend
                    .create_sampler(sampler)
                    .map_err(|source| self.allocation_error(&format!("sampler at slot {slot}"), source))?;
                allocated.push(GpuResource::Sampler(sampler));
                Ok(BindingResource::SampledImage {
                    texture: *texture,
                    sampler: Some(sampler),
                })
            }
            PendingResource::Upload { bytes, kind } => {
                let usage = match kind {
                    BufferBindingKind::Storage => BufferUsage::STORAGE,
                    BufferBindingKind::Uniform => BufferUsage::UNIFORM,
                };
                let label = self
                    .label
                    .as_ref()
                    .map(|l| Cow::Owned(format!("{l} slot {slot}")));
                let buffer = self
                    .backend
                    .create_buffer_with_data(
                        &BufferDescriptor {
                            label,
                            size: bytes.len() as u64,
                            usage: usage | BufferUsage::COPY_DST,
                        },
                        bytes,
                    )
                    .map_err(|source| self.allocation_error(&format!("buffer at slot {slot}"), source))?;
                allocated.push(GpuResource::Buffer(buffer));
                Ok(BindingResource::Buffer {
                    buffer,
                    kind: *kind,
                })
            }
        }
    }

    fn allocation_error(&self, what: &str, source: strata_core::gpu::ResourceError) -> BuildError {
        log::error!(
            "ComputeOperationBuilder: Failed to allocate the {what} of '{}': {source}",
            self.shader
        );
        BuildError::Allocation {
            shader: self.shader.clone(),
            what: what.to_string(),
            source,
        }
    }

    fn roll_back(&self, allocated: &[GpuResource]) {
        for resource in allocated.iter().rev() {
            if let Err(e) = self.backend.destroy_resource(*resource) {
                log::warn!("ComputeOperationBuilder: Failed to roll back {resource}: {e}");
            }
        }
    }
}
