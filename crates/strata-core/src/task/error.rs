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

use super::{TaskId, TaskState};
use crate::gpu::ResourceError;
use thiserror::Error;

/// Errors raised while driving a task through its lifecycle.
#[derive(Debug, Error)]
pub enum TaskError {
    /// `prepare` was called on a task whose generator already ran.
    #[error("Task {task} ('{label}') was already prepared")]
    AlreadyPrepared {
        /// The offending task.
        task: TaskId,
        /// Its label.
        label: String,
    },
    /// `prepare` was called while a dependency had not completed.
    #[error("Task {task} was prepared before its dependency {dependency} completed")]
    DependencyNotComplete {
        /// The offending task.
        task: TaskId,
        /// The first dependency that is not complete.
        dependency: TaskId,
    },
    /// A lifecycle method was called in the wrong state.
    #[error("Task {task} expected to be {expected} but was {found}")]
    InvalidTransition {
        /// The offending task.
        task: TaskId,
        /// The state the method requires.
        expected: TaskState,
        /// The state the task was in.
        found: TaskState,
    },
    /// The generator returned an error.
    #[error("Generator of task {task} ('{label}') failed: {cause:#}")]
    GeneratorFailed {
        /// The failed task.
        task: TaskId,
        /// Its label.
        label: String,
        /// The generator's error.
        cause: anyhow::Error,
    },
    /// A dependency failed, so the task was never prepared.
    #[error("Task {task} failed because its dependency {dependency} failed")]
    DependencyFailed {
        /// The failed task.
        task: TaskId,
        /// The dependency that failed first.
        dependency: TaskId,
    },
    /// The batch the task was recorded in could not be submitted or waited on.
    #[error("Batch submission failed: {0}")]
    Submission(#[from] ResourceError),
}

impl TaskError {
    /// Returns `true` for errors caused by calling the task API out of order.
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            TaskError::AlreadyPrepared { .. }
                | TaskError::DependencyNotComplete { .. }
                | TaskError::InvalidTransition { .. }
        )
    }
}
