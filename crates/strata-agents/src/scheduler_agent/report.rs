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

use strata_core::task::{TaskError, TaskId};
use thiserror::Error;

/// A task that failed during a tick.
#[derive(Debug)]
pub struct TaskFailure {
    /// The failed task.
    pub task: TaskId,
    /// Its label.
    pub label: String,
    /// Why it failed.
    pub error: TaskError,
}

/// What one scheduler tick did.
#[derive(Debug, Default)]
pub struct TickReport {
    /// The tick index.
    pub tick: u64,
    /// Tasks whose generator ran this tick.
    pub prepared: Vec<TaskId>,
    /// Tasks that completed this tick.
    pub completed: Vec<TaskId>,
    /// Tasks that failed this tick, including cascaded failures.
    pub failed: Vec<TaskFailure>,
    /// Barriers recorded into the batch.
    pub barriers: usize,
    /// Graveyard entries destroyed at the start of the tick.
    pub reclaimed: usize,
}

impl TickReport {
    pub(crate) fn new(tick: u64) -> Self {
        Self {
            tick,
            ..Default::default()
        }
    }

    /// Returns `true` if the task failed this tick.
    pub fn has_failed(&self, task: TaskId) -> bool {
        self.failed.iter().any(|f| f.task == task)
    }
}

/// A summary of the scheduler's health.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerStatus {
    /// The next tick index.
    pub tick: u64,
    /// Tasks waiting in the queue.
    pub pending: usize,
    /// Resources waiting in the graveyard.
    pub graveyard_entries: usize,
    /// Health score (0.0 to 1.0): the share of finished tasks that completed.
    pub health_score: f32,
    /// True if a queued task waits on a task the scheduler never saw.
    pub is_stalled: bool,
    /// Human-readable status message for telemetry.
    pub message: String,
}

/// Errors surfaced by the scheduler's own API.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The scheduler behind a submitter was dropped.
    #[error("Scheduler dropped before task {task} could be submitted")]
    Disconnected {
        /// The task that was dropped.
        task: TaskId,
    },
    /// `run_until_idle` ran out of ticks.
    #[error("{pending} tasks still pending after {ticks} ticks")]
    Stalled {
        /// Ticks that were run.
        ticks: u64,
        /// Tasks still queued.
        pending: usize,
    },
}
