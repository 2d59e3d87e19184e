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

use super::SchedulerError;
use crossbeam_channel::Sender;
use strata_core::task::{GpuTask, TaskId};

/// Hands tasks to a [`TaskScheduler`](super::TaskScheduler) from any thread.
///
/// Tasks sent here join the scheduler's queue at the start of its next tick.
#[derive(Debug, Clone)]
pub struct TaskSubmitter {
    sender: Sender<GpuTask>,
}

impl TaskSubmitter {
    pub(crate) fn new(sender: Sender<GpuTask>) -> Self {
        Self { sender }
    }

    /// Sends a task to the scheduler and returns its id.
    /// ## Errors
    /// `SchedulerError::Disconnected` if the scheduler was dropped; the task
    /// is dropped with its generator unrun.
    pub fn submit(&self, task: GpuTask) -> Result<TaskId, SchedulerError> {
        let id = task.id();
        self.sender.send(task).map_err(|_| {
            log::warn!("TaskSubmitter: Scheduler is gone, task {id} dropped");
            SchedulerError::Disconnected { task: id }
        })?;
        Ok(id)
    }
}
