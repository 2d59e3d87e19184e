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

//! Opaque GPU resource handles.

use std::fmt;

/// An opaque handle to a GPU texture resource (2D or layered).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub usize);

/// An opaque handle to a GPU buffer resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub usize);

/// An opaque handle to a GPU sampler resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SamplerId(pub usize);

/// An opaque handle to a set of resources bound to a compute pipeline's slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindGroupId(pub usize);

/// An opaque handle to a compiled compute pipeline state object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComputePipelineId(pub u64);

/// An opaque handle to a command list while it is being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandListId(pub u64);

/// Identifies one submission of a command list, used as a synchronization point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmissionId(pub u64);

/// Any destroyable GPU resource.
///
/// Tasks report their temporaries as `GpuResource`s so the scheduler can hold
/// them in its graveyard without knowing what they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GpuResource {
    /// A texture or texture array.
    Texture(TextureId),
    /// A storage or uniform buffer.
    Buffer(BufferId),
    /// A sampler.
    Sampler(SamplerId),
    /// A bind group.
    BindGroup(BindGroupId),
}

impl fmt::Display for GpuResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuResource::Texture(id) => write!(f, "texture#{}", id.0),
            GpuResource::Buffer(id) => write!(f, "buffer#{}", id.0),
            GpuResource::Sampler(id) => write!(f, "sampler#{}", id.0),
            GpuResource::BindGroup(id) => write!(f, "bind_group#{}", id.0),
        }
    }
}

impl From<TextureId> for GpuResource {
    fn from(id: TextureId) -> Self {
        GpuResource::Texture(id)
    }
}

impl From<BufferId> for GpuResource {
    fn from(id: BufferId) -> Self {
        GpuResource::Buffer(id)
    }
}

impl From<SamplerId> for GpuResource {
    fn from(id: SamplerId) -> Self {
        GpuResource::Sampler(id)
    }
}

impl From<BindGroupId> for GpuResource {
    fn from(id: BindGroupId) -> Self {
        GpuResource::BindGroup(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_display_names_the_kind() {
        assert_eq!(GpuResource::from(TextureId(3)).to_string(), "texture#3");
        assert_eq!(GpuResource::from(BufferId(7)).to_string(), "buffer#7");
        assert_eq!(GpuResource::from(BindGroupId(1)).to_string(), "bind_group#1");
    }
}
