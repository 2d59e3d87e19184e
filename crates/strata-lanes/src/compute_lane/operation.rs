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

use std::sync::Arc;
use strata_core::gpu::{CommandList, DispatchCommand, GpuResource};
use strata_core::task::{PreparedWork, RecordFn};

/// A fully-built compute dispatch.
///
/// Recording is repeatable: the same operation can be recorded into any
/// number of command lists. The resources it allocated are listed by
/// [`resources`](Self::resources) and must be released by the caller once the
/// last recorded list has executed.
#[derive(Debug, Clone)]
pub struct ComputeOperation {
    command: Arc<DispatchCommand>,
    resources: Vec<GpuResource>,
}

impl ComputeOperation {
    pub(crate) fn new(command: DispatchCommand, resources: Vec<GpuResource>) -> Self {
        Self {
            command: Arc::new(command),
            resources,
        }
    }

    /// The dispatch this operation records.
    pub fn command(&self) -> &DispatchCommand {
        &self.command
    }

    /// The resources the builder allocated for this operation.
    pub fn resources(&self) -> &[GpuResource] {
        &self.resources
    }

    /// Records the dispatch into a command list.
    pub fn record(&self, commands: &mut dyn CommandList) {
        commands.dispatch(&self.command);
    }

    /// Splits the operation into its recording closure and its resource list.
    pub fn into_parts(self) -> (RecordFn, Vec<GpuResource>) {
        let command = self.command;
        (
            Box::new(move |commands: &mut dyn CommandList| commands.dispatch(&command)),
            self.resources,
        )
    }

    /// Wraps the operation as the output of a task generator; the allocated
    /// resources become the task's temporaries.
    pub fn into_prepared_work(self) -> PreparedWork {
        let (record, resources) = self.into_parts();
        PreparedWork::new(record).with_temporaries(resources)
    }
}
