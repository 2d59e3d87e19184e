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

use crate::gpu::error::KernelError;
use crate::math::Extent3D;
use std::fmt::Debug;

/// The position of one invocation inside a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelInvocation {
    /// The global invocation id, `group * local_size + local_id` on each axis.
    pub global_id: [u32; 3],
}

/// Texel- and byte-level access to the resources bound for one dispatch.
///
/// Texels are exchanged as raw 32-bit patterns; the `_f32` helpers reinterpret
/// them for float formats.
pub trait KernelResources {
    /// The size of the image bound at `binding`.
    fn image_extent(&self, binding: u32) -> Result<Extent3D, KernelError>;

    /// Reads one texel from the image bound at `binding`.
    fn load(&self, binding: u32, x: u32, y: u32, layer: u32) -> Result<u32, KernelError>;

    /// Writes one texel to the storage image bound at `binding`.
    fn store(&mut self, binding: u32, x: u32, y: u32, layer: u32, bits: u32)
        -> Result<(), KernelError>;

    /// The contents of the buffer bound at `binding`.
    fn buffer(&self, binding: u32) -> Result<&[u8], KernelError>;

    /// Reads one float texel.
    fn load_f32(&self, binding: u32, x: u32, y: u32, layer: u32) -> Result<f32, KernelError> {
        self.load(binding, x, y, layer).map(f32::from_bits)
    }

    /// Writes one float texel.
    fn store_f32(
        &mut self,
        binding: u32,
        x: u32,
        y: u32,
        layer: u32,
        value: f32,
    ) -> Result<(), KernelError> {
        self.store(binding, x, y, layer, value.to_bits())
    }
}

/// A compute program a backend can execute.
///
/// Hardware backends compile shader text; the software backend runs
/// implementations of this trait once per invocation instead.
pub trait ComputeKernel: Send + Sync + Debug {
    /// The name pipelines are requested under.
    fn name(&self) -> &str;

    /// Runs one invocation. Invocations outside the useful range must return early,
    /// exactly as a shader would.
    fn invoke(
        &self,
        invocation: KernelInvocation,
        parameters: &[u8],
        resources: &mut dyn KernelResources,
    ) -> Result<(), KernelError>;
}
