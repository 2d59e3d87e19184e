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

use super::{OwnerId, PrepareContext, PreparedWork, TaskError, TaskId};
use crate::gpu::{CommandList, GpuResource};
use std::collections::BTreeSet;
use std::fmt;

/// The lifecycle of a [`GpuTask`].
///
/// `Pending → Prepared → InFlight → Complete`, or `Failed` from any state
/// before `Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    /// Queued; the generator has not run.
    Pending,
    /// The generator ran; commands are ready to record.
    Prepared,
    /// Recorded into a submitted command list.
    InFlight,
    /// The backend finished executing the commands.
    Complete,
    /// Preparation, a dependency, or the submission failed.
    Failed,
}

impl TaskState {
    /// Returns `true` for `Complete` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Complete | TaskState::Failed)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskState::Pending => "pending",
            TaskState::Prepared => "prepared",
            TaskState::InFlight => "in flight",
            TaskState::Complete => "complete",
            TaskState::Failed => "failed",
        };
        f.write_str(name)
    }
}

type Generator = Box<dyn FnOnce(&mut PrepareContext<'_>) -> anyhow::Result<PreparedWork> + Send>;
type FailureCleanup = Box<dyn FnOnce() -> Vec<GpuResource> + Send>;

// The captured inputs and the produced outputs never coexist.
enum TaskBody {
    Pending(Generator),
    Prepared(PreparedWork),
    Retired,
}

/// A deferred unit of GPU work.
///
/// The generator captures everything it needs when the task is built and runs
/// exactly once, when the scheduler prepares the task. Nothing is allocated on
/// the GPU before that moment.
pub struct GpuTask {
    id: TaskId,
    label: String,
    state: TaskState,
    dependencies: Vec<TaskId>,
    borrows: BTreeSet<OwnerId>,
    body: TaskBody,
    on_fail: Option<FailureCleanup>,
}

impl GpuTask {
    /// Creates a pending task.
    /// ## Arguments
    /// * `label` - A human-readable name used in diagnostics.
    /// * `generator` - Produces the task's commands, temporaries, and borrows.
    pub fn new<F>(label: impl Into<String>, generator: F) -> Self
    where
        F: FnOnce(&mut PrepareContext<'_>) -> anyhow::Result<PreparedWork> + Send + 'static,
    {
        Self {
            id: TaskId::next(),
            label: label.into(),
            state: TaskState::Pending,
            dependencies: Vec::new(),
            borrows: BTreeSet::new(),
            body: TaskBody::Pending(Box::new(generator)),
            on_fail: None,
        }
    }

    /// Adds dependencies that must complete before this task is prepared.
    pub fn with_dependencies(mut self, dependencies: impl IntoIterator<Item = TaskId>) -> Self {
        for dep in dependencies {
            self.depends_on(dep);
        }
        self
    }

    /// Adds one dependency.
    pub fn depends_on(&mut self, dependency: TaskId) {
        if dependency != self.id && !self.dependencies.contains(&dependency) {
            self.dependencies.push(dependency);
        }
    }

    /// Declares an owner the task accesses, known before preparation.
    pub fn with_borrow(mut self, owner: OwnerId) -> Self {
        self.borrows.insert(owner);
        self
    }

    /// Declares several owners the task accesses.
    pub fn with_borrows(mut self, owners: impl IntoIterator<Item = OwnerId>) -> Self {
        self.borrows.extend(owners);
        self
    }

    /// Registers resources the task is responsible for that live outside its
    /// temporaries, such as a context another task staged for it.
    ///
    /// `cleanup` runs once if the task fails, including when it fails
    /// without ever being prepared; its result is returned by
    /// [`fail`](Self::fail). It is dropped unrun when the task completes.
    pub fn with_on_fail<F>(mut self, cleanup: F) -> Self
    where
        F: FnOnce() -> Vec<GpuResource> + Send + 'static,
    {
        self.on_fail = Some(Box::new(cleanup));
        self
    }

    /// The task's identifier.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// The task's label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The current lifecycle state.
    pub fn state(&self) -> TaskState {
        self.state
    }

    /// The tasks that must complete first.
    pub fn dependencies(&self) -> &[TaskId] {
        &self.dependencies
    }

    /// The declared owners, plus the generator's once prepared.
    pub fn borrows(&self) -> &BTreeSet<OwnerId> {
        &self.borrows
    }

    /// Runs the generator and moves the task to `Prepared`.
    ///
    /// `dependency_state` reports the state of each dependency; every one must
    /// be `Complete`. A second call is rejected without touching the task.
    /// ## Errors
    /// * `TaskError::AlreadyPrepared` - The generator already ran.
    /// * `TaskError::DependencyNotComplete` - A dependency has not completed.
    /// * `TaskError::GeneratorFailed` - The generator failed; the task is now `Failed`.
    pub fn prepare(
        &mut self,
        context: &mut PrepareContext<'_>,
        dependency_state: impl Fn(TaskId) -> Option<TaskState>,
    ) -> Result<(), TaskError> {
        if self.state != TaskState::Pending {
            return Err(TaskError::AlreadyPrepared {
                task: self.id,
                label: self.label.clone(),
            });
        }
        if let Some(&dependency) = self
            .dependencies
            .iter()
            .find(|&&dep| dependency_state(dep) != Some(TaskState::Complete))
        {
            return Err(TaskError::DependencyNotComplete {
                task: self.id,
                dependency,
            });
        }

        let TaskBody::Pending(generator) = std::mem::replace(&mut self.body, TaskBody::Retired)
        else {
            return Err(TaskError::AlreadyPrepared {
                task: self.id,
                label: self.label.clone(),
            });
        };

        match generator(context) {
            Ok(work) => {
                self.borrows.extend(work.borrows().iter().copied());
                self.body = TaskBody::Prepared(work);
                self.state = TaskState::Prepared;
                Ok(())
            }
            Err(cause) => {
                self.state = TaskState::Failed;
                Err(TaskError::GeneratorFailed {
                    task: self.id,
                    label: self.label.clone(),
                    cause,
                })
            }
        }
    }

    /// Records the prepared commands and moves the task to `InFlight`.
    pub fn record(&mut self, commands: &mut dyn CommandList) -> Result<(), TaskError> {
        match (&self.body, self.state) {
            (TaskBody::Prepared(work), TaskState::Prepared) => {
                work.record(commands);
                self.state = TaskState::InFlight;
                Ok(())
            }
            _ => Err(self.invalid(TaskState::Prepared)),
        }
    }

    /// Marks the task `Complete` and hands back its temporaries for the graveyard.
    pub fn on_complete(&mut self) -> Result<Vec<GpuResource>, TaskError> {
        if self.state != TaskState::InFlight {
            return Err(self.invalid(TaskState::InFlight));
        }
        self.state = TaskState::Complete;
        self.on_fail = None;
        Ok(self.take_temporaries())
    }

    /// Marks the task `Failed` and hands back whatever temporaries it owns,
    /// plus the result of its failure cleanup.
    ///
    /// A task that never prepared owns no temporaries; its generator is
    /// dropped unrun. A `Complete` task is left untouched.
    pub fn fail(&mut self) -> Vec<GpuResource> {
        if self.state == TaskState::Complete {
            return Vec::new();
        }
        self.state = TaskState::Failed;
        let mut leftovers = self.take_temporaries();
        if let Some(cleanup) = self.on_fail.take() {
            leftovers.extend(cleanup());
        }
        leftovers
    }

    fn take_temporaries(&mut self) -> Vec<GpuResource> {
        match std::mem::replace(&mut self.body, TaskBody::Retired) {
            TaskBody::Prepared(work) => work.into_parts().0,
            TaskBody::Pending(_) | TaskBody::Retired => Vec::new(),
        }
    }

    fn invalid(&self, expected: TaskState) -> TaskError {
        TaskError::InvalidTransition {
            task: self.id,
            expected,
            found: self.state,
        }
    }
}

impl fmt::Debug for GpuTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpuTask")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("state", &self.state)
            .field("dependencies", &self.dependencies)
            .field("borrows", &self.borrows)
            .field("has_failure_cleanup", &self.on_fail.is_some())
            .finish()
    }
}
