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

use crate::gpu::api::*;
use crate::gpu::error::{PipelineError, ResourceError};
use crate::gpu::traits::CommandList;
use std::fmt::Debug;

/// The handle-based GPU backend the scheduler and the dispatch builders talk to.
///
/// Every method takes `&self`: implementations are shared behind an `Arc` and
/// synchronize internally, so planning code on a worker thread and the
/// submission thread can both hold the backend.
pub trait GpuBackend: Send + Sync + Debug + 'static {
    /// Creates a new texture (2D or layered).
    /// ## Arguments
    /// * `descriptor` - The texture configuration.
    /// ## Errors
    /// * `ResourceError::OutOfMemory` - If the backend cannot allocate it.
    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<TextureId, ResourceError>;

    /// Destroys a texture.
    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError>;

    /// Uploads a full layer of texel data.
    /// ## Arguments
    /// * `id` - The texture to write to.
    /// * `layer` - The array layer (0 for plain 2D textures).
    /// * `data` - Tightly packed texel bytes for the whole layer.
    fn write_texture(&self, id: TextureId, layer: u32, data: &[u8]) -> Result<(), ResourceError>;

    /// Creates a new buffer and initializes it with the provided data.
    /// ## Arguments
    /// * `descriptor` - The buffer configuration. `size` must equal `data.len()`.
    /// * `data` - The initial contents.
    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError>;

    /// Destroys a buffer.
    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError>;

    /// Creates a new sampler.
    fn create_sampler(&self, descriptor: &SamplerDescriptor) -> Result<SamplerId, ResourceError>;

    /// Destroys a sampler.
    fn destroy_sampler(&self, id: SamplerId) -> Result<(), ResourceError>;

    /// Returns the compute pipeline built from the named shader, building it on first use.
    /// ## Errors
    /// * `PipelineError::ShaderNotFound` - The shader resource failed to load.
    /// * `PipelineError::CompilationFailed` - The pipeline object failed to build.
    fn compute_pipeline(&self, shader: &str) -> Result<ComputePipelineId, PipelineError>;

    /// Creates a bind group for a compute pipeline.
    fn create_bind_group(
        &self,
        descriptor: &BindGroupDescriptor,
    ) -> Result<BindGroupId, ResourceError>;

    /// Destroys a bind group.
    fn destroy_bind_group(&self, id: BindGroupId) -> Result<(), ResourceError>;

    /// Creates a new command list to record GPU commands into.
    fn create_command_list(&self, label: Option<&str>) -> Box<dyn CommandList>;

    /// Submits a recorded command list for execution.
    fn submit(&self, commands: Box<dyn CommandList>) -> Result<SubmissionId, ResourceError>;

    /// Blocks until the given submission has finished executing.
    fn wait(&self, submission: SubmissionId) -> Result<(), ResourceError>;

    /// Destroys any kind of resource.
    fn destroy_resource(&self, resource: GpuResource) -> Result<(), ResourceError> {
        match resource {
            GpuResource::Texture(id) => self.destroy_texture(id),
            GpuResource::Buffer(id) => self.destroy_buffer(id),
            GpuResource::Sampler(id) => self.destroy_sampler(id),
            GpuResource::BindGroup(id) => self.destroy_bind_group(id),
        }
    }
}
