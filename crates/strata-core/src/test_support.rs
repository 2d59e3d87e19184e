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

//! Minimal stand-ins for the backend and the region lookup in unit tests.

use crate::gpu::*;
use crate::terrain::{RegionCoord, RegionData, RegionProvider};
use std::any::Any;

#[derive(Debug)]
pub(crate) struct NullBackend;

impl GpuBackend for NullBackend {
    fn create_texture(&self, _: &TextureDescriptor) -> Result<TextureId, ResourceError> {
        Ok(TextureId(1))
    }
    fn destroy_texture(&self, _: TextureId) -> Result<(), ResourceError> {
        Ok(())
    }
    fn write_texture(&self, _: TextureId, _: u32, _: &[u8]) -> Result<(), ResourceError> {
        Ok(())
    }
    fn create_buffer_with_data(
        &self,
        _: &BufferDescriptor,
        _: &[u8],
    ) -> Result<BufferId, ResourceError> {
        Ok(BufferId(1))
    }
    fn destroy_buffer(&self, _: BufferId) -> Result<(), ResourceError> {
        Ok(())
    }
    fn create_sampler(&self, _: &SamplerDescriptor) -> Result<SamplerId, ResourceError> {
        Ok(SamplerId(1))
    }
    fn destroy_sampler(&self, _: SamplerId) -> Result<(), ResourceError> {
        Ok(())
    }
    fn compute_pipeline(&self, shader: &str) -> Result<ComputePipelineId, PipelineError> {
        Err(PipelineError::ShaderNotFound {
            name: shader.to_string(),
        })
    }
    fn create_bind_group(&self, _: &BindGroupDescriptor) -> Result<BindGroupId, ResourceError> {
        Ok(BindGroupId(1))
    }
    fn destroy_bind_group(&self, _: BindGroupId) -> Result<(), ResourceError> {
        Ok(())
    }
    fn create_command_list(&self, _: Option<&str>) -> Box<dyn CommandList> {
        Box::new(NullCommandList::default())
    }
    fn submit(&self, _: Box<dyn CommandList>) -> Result<SubmissionId, ResourceError> {
        Ok(SubmissionId(1))
    }
    fn wait(&self, _: SubmissionId) -> Result<(), ResourceError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(crate) struct NullCommandList {
    pub(crate) commands: usize,
}

impl CommandList for NullCommandList {
    fn id(&self) -> CommandListId {
        CommandListId(0)
    }
    fn dispatch(&mut self, _: &DispatchCommand) {
        self.commands += 1;
    }
    fn copy_texture_to_texture(&mut self, _: &TextureCopy) {
        self.commands += 1;
    }
    fn barrier(&mut self) {
        self.commands += 1;
    }
    fn command_count(&self) -> usize {
        self.commands
    }
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

pub(crate) struct NullRegions;

impl RegionProvider for NullRegions {
    fn region_size(&self) -> u32 {
        16
    }
    fn get_region(&self, _: RegionCoord) -> Option<RegionData> {
        None
    }
}
