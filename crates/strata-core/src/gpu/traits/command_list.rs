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

use crate::gpu::api::{CommandListId, DispatchCommand, TextureCopy};
use std::any::Any;

/// A trait for an object that records a sequence of GPU commands.
///
/// A `CommandList` is obtained from [`GpuBackend::create_command_list`](super::GpuBackend::create_command_list),
/// filled by the tasks of one batch, and handed back to the backend through
/// [`GpuBackend::submit`](super::GpuBackend::submit).
pub trait CommandList: Send {
    /// The identifier of this list.
    fn id(&self) -> CommandListId;

    /// Records a compute dispatch.
    fn dispatch(&mut self, command: &DispatchCommand);

    /// Records a texture-to-texture copy.
    fn copy_texture_to_texture(&mut self, copy: &TextureCopy);

    /// Records a full execution and memory barrier: every command recorded
    /// after it observes the effects of every command recorded before it.
    fn barrier(&mut self);

    /// The number of commands recorded so far.
    fn command_count(&self) -> usize;

    /// Converts the list into `Any` so the backend that created it can recover its concrete type.
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}
