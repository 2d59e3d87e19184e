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

use super::StageError;
use std::sync::{Arc, Mutex, MutexGuard};
use strata_core::gpu::{BufferId, GpuResource, TextureId};
use strata_core::math::Extent2D;

/// The GPU resources of one staged height context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightContext {
    /// The `R32Float` array, one `region_size × region_size` slice per region.
    pub array: TextureId,
    /// The storage buffer of per-slice [`StitchMetadata`](super::StitchMetadata).
    pub metadata: BufferId,
    /// The number of slices.
    pub slice_count: u32,
    /// The side length of every slice.
    pub region_size: u32,
    /// The pixel size of the image covering the staged bounds.
    pub output_extent: Extent2D,
    /// The largest overlapped rectangle of any slice.
    pub max_slice_extent: Extent2D,
}

impl HeightContext {
    /// Both handles, for release.
    pub fn resources(&self) -> [GpuResource; 2] {
        [
            GpuResource::Texture(self.array),
            GpuResource::Buffer(self.metadata),
        ]
    }

    /// Returns `true` if the context holds at least one slice.
    pub fn is_valid(&self) -> bool {
        self.slice_count > 0 && !self.max_slice_extent.is_empty()
    }
}

#[derive(Debug, Default)]
enum Slot {
    #[default]
    Unprepared,
    Ready(HeightContext),
    Consumed,
}

/// Where the staging task publishes its [`HeightContext`].
///
/// The handle owns the context's resources from the moment the staging task
/// is prepared until a consumer [`take`](Self::take)s them, or until
/// [`release`](Self::release) hands them back for reclamation.
#[derive(Debug, Clone, Default)]
pub struct HeightContextHandle {
    slot: Arc<Mutex<Slot>>,
}

impl HeightContextHandle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the slot half-written.
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn fill(&self, context: HeightContext) {
        *self.lock() = Slot::Ready(context);
    }

    /// The staged context, if it is ready and not yet taken.
    pub fn get(&self) -> Option<HeightContext> {
        match *self.lock() {
            Slot::Ready(context) => Some(context),
            Slot::Unprepared | Slot::Consumed => None,
        }
    }

    /// Returns `true` if a valid context is ready.
    pub fn is_valid(&self) -> bool {
        self.get().is_some_and(|c| c.is_valid())
    }

    /// Takes ownership of the context's resources.
    /// ## Errors
    /// `StageError::ContextUnavailable` if nothing was staged yet or the
    /// context was already taken.
    pub fn take(&self) -> Result<HeightContext, StageError> {
        let mut slot = self.lock();
        match std::mem::replace(&mut *slot, Slot::Consumed) {
            Slot::Ready(context) => Ok(context),
            previous => {
                *slot = previous;
                Err(StageError::ContextUnavailable)
            }
        }
    }

    /// Gives up a context no consumer will take. The returned handles belong
    /// in the scheduler's graveyard.
    pub fn release(&self) -> Vec<GpuResource> {
        match self.take() {
            Ok(context) => context.resources().to_vec(),
            Err(_) => Vec::new(),
        }
    }
}
