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

use super::OwnerId;
use crate::gpu::{CommandList, GpuBackend, GpuResource};
use crate::terrain::RegionProvider;
use std::collections::BTreeSet;
use std::fmt;

/// A closure that records a task's commands into a command list.
pub type RecordFn = Box<dyn Fn(&mut dyn CommandList) + Send>;

/// The output of a task's generator.
pub struct PreparedWork {
    record: RecordFn,
    temporaries: Vec<GpuResource>,
    borrows: BTreeSet<OwnerId>,
}

impl PreparedWork {
    /// Creates prepared work that records with `record` and owns no resources.
    pub fn new(record: impl Fn(&mut dyn CommandList) + Send + 'static) -> Self {
        Self {
            record: Box::new(record),
            temporaries: Vec::new(),
            borrows: BTreeSet::new(),
        }
    }

    /// Prepared work that records nothing.
    pub fn empty() -> Self {
        Self::new(|_| {})
    }

    /// Sets the resources to reclaim once the commands have executed.
    pub fn with_temporaries(mut self, temporaries: impl IntoIterator<Item = GpuResource>) -> Self {
        self.temporaries.extend(temporaries);
        self
    }

    /// Adds owners whose live resources the commands access.
    pub fn with_borrows(mut self, owners: impl IntoIterator<Item = OwnerId>) -> Self {
        self.borrows.extend(owners);
        self
    }

    /// Adds one resource to reclaim.
    pub fn push_temporary(&mut self, resource: GpuResource) {
        self.temporaries.push(resource);
    }

    /// Records the commands.
    pub fn record(&self, commands: &mut dyn CommandList) {
        (self.record)(commands);
    }

    /// The resources to reclaim.
    pub fn temporaries(&self) -> &[GpuResource] {
        &self.temporaries
    }

    /// The owners the commands access.
    pub fn borrows(&self) -> &BTreeSet<OwnerId> {
        &self.borrows
    }

    pub(crate) fn into_parts(self) -> (Vec<GpuResource>, BTreeSet<OwnerId>) {
        (self.temporaries, self.borrows)
    }
}

impl fmt::Debug for PreparedWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedWork")
            .field("temporaries", &self.temporaries)
            .field("borrows", &self.borrows)
            .finish_non_exhaustive()
    }
}

/// What a generator can reach while it runs.
pub struct PrepareContext<'a> {
    backend: &'a dyn GpuBackend,
    regions: &'a dyn RegionProvider,
    tick: u64,
    retired: Vec<GpuResource>,
}

impl<'a> PrepareContext<'a> {
    /// Creates a context for the preparations of one tick.
    pub fn new(backend: &'a dyn GpuBackend, regions: &'a dyn RegionProvider, tick: u64) -> Self {
        Self {
            backend,
            regions,
            tick,
            retired: Vec::new(),
        }
    }

    /// The GPU backend to allocate from.
    pub fn backend(&self) -> &'a dyn GpuBackend {
        self.backend
    }

    /// The live region lookup.
    pub fn regions(&self) -> &'a dyn RegionProvider {
        self.regions
    }

    /// The scheduler tick the preparation runs in.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Hands resources the generator will not reference to the graveyard,
    /// whether or not the generator succeeds.
    pub fn retire(&mut self, resources: impl IntoIterator<Item = GpuResource>) {
        self.retired.extend(resources);
    }

    /// Removes and returns everything retired so far.
    pub fn take_retired(&mut self) -> Vec<GpuResource> {
        std::mem::take(&mut self.retired)
    }
}
