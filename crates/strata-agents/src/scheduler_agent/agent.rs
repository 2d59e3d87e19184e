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

use super::{Graveyard, SchedulerError, SchedulerStatus, TaskFailure, TaskSubmitter, TickReport};
use crossbeam_channel::{Receiver, Sender};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Arc;
use strata_core::gpu::{GpuBackend, GpuResource, SubmissionId};
use strata_core::task::{GpuTask, OwnerId, PrepareContext, TaskError, TaskId, TaskState};
use strata_core::telemetry::{MetricId, MetricValue, TelemetryEvent};
use strata_core::terrain::RegionProvider;
use strata_core::SchedulerSettings;

const METRIC_NAMESPACE: &str = "scheduler";

/// The orchestrator of all deferred GPU work.
///
/// One instance is created by the application and passed to every planning
/// call site. It is driven from the submission thread by calling
/// [`tick`](Self::tick) once per frame; other threads reach it through a
/// [`TaskSubmitter`].
#[derive(Debug)]
pub struct TaskScheduler {
    backend: Arc<dyn GpuBackend>,
    settings: SchedulerSettings,
    queue: VecDeque<GpuTask>,
    states: HashMap<TaskId, TaskState>,
    // Terminal tasks in the order they finished, with the tick they finished in.
    finished: VecDeque<(u64, TaskId)>,
    graveyard: Graveyard,
    inbox: Receiver<GpuTask>,
    outbox: Sender<GpuTask>,
    tick: u64,
    last_submission: Option<SubmissionId>,
    completed_total: u64,
    failed_total: u64,
    reclaimed_total: u64,
    telemetry_sender: Option<Sender<TelemetryEvent>>,
}

impl TaskScheduler {
    /// Creates a scheduler submitting to `backend`.
    pub fn new(backend: Arc<dyn GpuBackend>, settings: SchedulerSettings) -> Self {
        if let Err(e) = settings.validate() {
            log::warn!("TaskScheduler: {e}; batches are limited to one task");
        }
        let (outbox, inbox) = crossbeam_channel::unbounded();
        log::info!(
            "TaskScheduler: Created (batch size {}, reclaim delay {} ticks)",
            settings.max_batch_size,
            settings.reclaim_delay_ticks
        );
        Self {
            backend,
            graveyard: Graveyard::new(settings.reclaim_delay_ticks),
            settings,
            queue: VecDeque::new(),
            states: HashMap::new(),
            finished: VecDeque::new(),
            inbox,
            outbox,
            tick: 0,
            last_submission: None,
            completed_total: 0,
            failed_total: 0,
            reclaimed_total: 0,
            telemetry_sender: None,
        }
    }

    /// Attaches a sender for metric and diagnostic events.
    pub fn with_telemetry_sender(mut self, sender: Sender<TelemetryEvent>) -> Self {
        self.telemetry_sender = Some(sender);
        self
    }

    /// The settings the scheduler runs with.
    pub fn settings(&self) -> &SchedulerSettings {
        &self.settings
    }

    /// A handle for queueing tasks from other threads.
    pub fn submitter(&self) -> TaskSubmitter {
        TaskSubmitter::new(self.outbox.clone())
    }

    /// Appends a task to the queue. The task is not prepared until a later tick
    /// selects it.
    pub fn add_task(&mut self, task: GpuTask) -> TaskId {
        let id = task.id();
        if self.states.insert(id, TaskState::Pending).is_some() {
            log::warn!("TaskScheduler: Task {id} was added twice");
        }
        log::trace!("TaskScheduler: Queued task {id} ('{}')", task.label());
        self.queue.push_back(task);
        id
    }

    /// Hands resources to the graveyard.
    ///
    /// No later batch can have recorded them, so they count as retired by the
    /// last tick that ran, or before the first tick if none ran yet. They
    /// survive `reclaim_delay_ticks - 1` further ticks and are destroyed by the
    /// next one.
    pub fn retire(&mut self, resources: impl IntoIterator<Item = GpuResource>) {
        self.graveyard.bury(self.tick, resources);
    }

    /// Advances the scheduler by one tick.
    pub fn tick(&mut self, regions: &dyn RegionProvider) -> TickReport {
        let tick = self.tick;
        let mut report = TickReport::new(tick);

        let due = self.graveyard.collect(Self::epoch(tick));
        report.reclaimed = self.destroy(due);
        self.reclaimed_total += report.reclaimed as u64;

        while let Ok(task) = self.inbox.try_recv() {
            self.add_task(task);
        }
        self.prune_finished();
        self.cascade_failures(&mut report);

        let batch = self.select_batch();
        if !batch.is_empty() {
            let prepared = self.prepare_batch(batch, regions, &mut report);
            if !prepared.is_empty() {
                self.dispatch(prepared, &mut report);
            }
        }

        self.cascade_failures(&mut report);
        self.emit_telemetry(&report);
        log::trace!(
            "TaskScheduler: Tick {tick} prepared {}, completed {}, failed {}, reclaimed {}",
            report.prepared.len(),
            report.completed.len(),
            report.failed.len(),
            report.reclaimed
        );
        self.tick += 1;
        report
    }

    /// Ticks until no task is pending.
    /// ## Errors
    /// `SchedulerError::Stalled` if tasks are still pending after `max_ticks`.
    pub fn run_until_idle(
        &mut self,
        regions: &dyn RegionProvider,
        max_ticks: u64,
    ) -> Result<Vec<TickReport>, SchedulerError> {
        let mut reports = Vec::new();
        while self.pending_count() > 0 {
            if reports.len() as u64 >= max_ticks {
                return Err(SchedulerError::Stalled {
                    ticks: max_ticks,
                    pending: self.pending_count(),
                });
            }
            reports.push(self.tick(regions));
        }
        Ok(reports)
    }

    /// The state of a task the scheduler has seen.
    ///
    /// Returns `None` for unknown tasks and for finished tasks whose state was
    /// dropped after `state_retention_ticks`. A task that depends on a dropped
    /// id is treated like one depending on an unknown task: it stays pending.
    pub fn task_state(&self, id: TaskId) -> Option<TaskState> {
        self.states.get(&id).copied()
    }

    /// Tasks queued or waiting in the submitter channel.
    pub fn pending_count(&self) -> usize {
        self.queue.len() + self.inbox.len()
    }

    /// Tasks whose state is still tracked, finished ones included.
    pub fn tracked_task_count(&self) -> usize {
        self.states.len()
    }

    /// Resources waiting in the graveyard.
    pub fn graveyard_len(&self) -> usize {
        self.graveyard.len()
    }

    /// The index of the next tick.
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Summarizes the scheduler's health.
    pub fn status(&self) -> SchedulerStatus {
        let waiting_on_unknown = self
            .queue
            .iter()
            .filter(|task| {
                task.dependencies()
                    .iter()
                    .any(|dep| !self.states.contains_key(dep))
            })
            .count();
        let finished = self.completed_total + self.failed_total;
        let health_score = if finished == 0 {
            1.0
        } else {
            self.completed_total as f32 / finished as f32
        };

        SchedulerStatus {
            tick: self.tick,
            pending: self.pending_count(),
            graveyard_entries: self.graveyard.len(),
            health_score,
            is_stalled: waiting_on_unknown > 0,
            message: format!(
                "pending={} waiting_on_unknown={} completed={} failed={} graveyard={} reclaimed={}",
                self.pending_count(),
                waiting_on_unknown,
                self.completed_total,
                self.failed_total,
                self.graveyard.len(),
                self.reclaimed_total,
            ),
        }
    }

    /// Waits for the last batch and destroys the whole graveyard immediately.
    /// Queued tasks are dropped unprepared, after their failure cleanup ran.
    /// Returns the number of destroyed resources.
    pub fn shutdown(&mut self) -> usize {
        if let Some(submission) = self.last_submission.take() {
            if let Err(e) = self.backend.wait(submission) {
                log::warn!("TaskScheduler: Wait on {submission:?} failed at shutdown: {e}");
            }
        }

        while let Ok(task) = self.inbox.try_recv() {
            self.queue.push_back(task);
        }
        let mut buried = self.graveyard.drain_all();
        if !self.queue.is_empty() {
            log::warn!(
                "TaskScheduler: Dropping {} pending tasks at shutdown",
                self.queue.len()
            );
            for mut task in self.queue.drain(..) {
                buried.extend(task.fail());
                self.states.remove(&task.id());
            }
        }

        let destroyed = self.destroy(buried);
        log::info!("TaskScheduler: Shut down, destroyed {destroyed} resources");
        destroyed
    }

    // Graveyard stamps count completed ticks: work finishing in tick `t` is
    // stamped `t + 1`, and stamp 0 means retired before any tick ran.
    fn epoch(tick: u64) -> u64 {
        tick + 1
    }

    fn destroy(&self, resources: Vec<GpuResource>) -> usize {
        let count = resources.len();
        for resource in resources {
            if let Err(e) = self.backend.destroy_resource(resource) {
                log::warn!("TaskScheduler: Failed to destroy {resource}: {e}");
            }
        }
        count
    }

    fn is_ready(&self, task: &GpuTask) -> bool {
        task.dependencies()
            .iter()
            .all(|dep| self.states.get(dep) == Some(&TaskState::Complete))
    }

    // FIFO among ready tasks; a dependency is only ever complete if it ran in
    // an earlier tick, so a task never shares a batch with its dependencies.
    fn select_batch(&mut self) -> Vec<GpuTask> {
        let limit = self.settings.max_batch_size.max(1);
        let mut batch = Vec::new();
        let mut waiting = VecDeque::with_capacity(self.queue.len());
        while let Some(task) = self.queue.pop_front() {
            if batch.len() < limit && self.is_ready(&task) {
                batch.push(task);
            } else {
                waiting.push_back(task);
            }
        }
        self.queue = waiting;
        batch
    }

    fn prepare_batch(
        &mut self,
        batch: Vec<GpuTask>,
        regions: &dyn RegionProvider,
        report: &mut TickReport,
    ) -> Vec<GpuTask> {
        let tick = self.tick;
        let mut prepared = Vec::with_capacity(batch.len());
        let mut failures = Vec::new();
        let mut retired = Vec::new();
        {
            let states = &self.states;
            let mut ctx = PrepareContext::new(self.backend.as_ref(), regions, tick);
            for mut task in batch {
                let result = task.prepare(&mut ctx, |id| states.get(&id).copied());
                retired.extend(ctx.take_retired());
                match result {
                    Ok(()) => prepared.push(task),
                    Err(error) => failures.push((task, error)),
                }
            }
        }
        self.graveyard.bury(Self::epoch(tick), retired);

        for (mut task, error) in failures {
            let leftovers = task.fail();
            self.graveyard.bury(Self::epoch(tick), leftovers);
            self.record_failure(&task, error, report);
        }
        for task in &prepared {
            self.states.insert(task.id(), TaskState::Prepared);
            report.prepared.push(task.id());
        }
        prepared
    }

    fn dispatch(&mut self, tasks: Vec<GpuTask>, report: &mut TickReport) {
        let tick = self.tick;
        let label = format!("scheduler batch {tick}");
        let mut commands = self.backend.create_command_list(Some(&label));
        let mut touched: BTreeSet<OwnerId> = BTreeSet::new();
        let mut recorded = Vec::with_capacity(tasks.len());

        for mut task in tasks {
            if self.settings.barrier_on_shared_owner && !touched.is_disjoint(task.borrows()) {
                commands.barrier();
                report.barriers += 1;
                touched.clear();
            }
            touched.extend(task.borrows().iter().copied());
            match task.record(commands.as_mut()) {
                Ok(()) => {
                    self.states.insert(task.id(), TaskState::InFlight);
                    recorded.push(task);
                }
                Err(error) => {
                    let leftovers = task.fail();
                    self.graveyard.bury(Self::epoch(tick), leftovers);
                    self.record_failure(&task, error, report);
                }
            }
        }
        if recorded.is_empty() {
            return;
        }

        let outcome = match self.backend.submit(commands) {
            Ok(submission) => {
                self.last_submission = Some(submission);
                self.backend.wait(submission)
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                for mut task in recorded {
                    match task.on_complete() {
                        Ok(temporaries) => {
                            self.graveyard.bury(Self::epoch(tick), temporaries);
                            self.finish(task.id(), TaskState::Complete);
                            self.completed_total += 1;
                            report.completed.push(task.id());
                        }
                        Err(error) => {
                            let leftovers = task.fail();
                            self.graveyard.bury(Self::epoch(tick), leftovers);
                            self.record_failure(&task, error, report);
                        }
                    }
                }
            }
            Err(error) => {
                log::error!(
                    "TaskScheduler: Batch of tick {tick} ({} tasks) failed: {error}",
                    recorded.len()
                );
                for mut task in recorded {
                    let leftovers = task.fail();
                    self.graveyard.bury(Self::epoch(tick), leftovers);
                    self.record_failure(&task, TaskError::Submission(error.clone()), report);
                }
            }
        }
    }

    fn finish(&mut self, id: TaskId, state: TaskState) {
        self.states.insert(id, state);
        self.finished.push_back((self.tick, id));
    }

    // Drops finished states older than the retention window unless a queued
    // task still lists them as a dependency.
    fn prune_finished(&mut self) {
        let retention = self.settings.state_retention_ticks;
        let tick = self.tick;
        let expired = |stamp: u64| tick.saturating_sub(stamp) >= retention;
        if !self.finished.front().is_some_and(|&(stamp, _)| expired(stamp)) {
            return;
        }

        let referenced: HashSet<TaskId> = self
            .queue
            .iter()
            .flat_map(|task| task.dependencies().iter().copied())
            .collect();
        let states = &mut self.states;
        let before = self.finished.len();
        self.finished.retain(|&(stamp, id)| {
            if expired(stamp) && !referenced.contains(&id) {
                states.remove(&id);
                false
            } else {
                true
            }
        });
        log::trace!(
            "TaskScheduler: Dropped {} finished task states",
            before - self.finished.len()
        );
    }

    fn cascade_failures(&mut self, report: &mut TickReport) {
        loop {
            let mut failed_any = false;
            let mut kept = VecDeque::with_capacity(self.queue.len());
            while let Some(mut task) = self.queue.pop_front() {
                let failed_dependency = task
                    .dependencies()
                    .iter()
                    .copied()
                    .find(|dep| self.states.get(dep) == Some(&TaskState::Failed));
                match failed_dependency {
                    Some(dependency) => {
                        let leftovers = task.fail();
                        self.graveyard.bury(Self::epoch(self.tick), leftovers);
                        let error = TaskError::DependencyFailed {
                            task: task.id(),
                            dependency,
                        };
                        self.record_failure(&task, error, report);
                        failed_any = true;
                    }
                    None => kept.push_back(task),
                }
            }
            self.queue = kept;
            if !failed_any {
                break;
            }
        }
    }

    fn record_failure(&mut self, task: &GpuTask, error: TaskError, report: &mut TickReport) {
        if error.is_misuse() {
            log::error!("TaskScheduler: Task lifecycle violated: {error}");
        } else if matches!(error, TaskError::DependencyFailed { .. }) {
            log::warn!("TaskScheduler: {error}");
        } else {
            log::error!("TaskScheduler: Task {} ('{}') failed: {error}", task.id(), task.label());
        }
        if let Some(sender) = &self.telemetry_sender {
            let _ = sender.send(TelemetryEvent::diagnostic(METRIC_NAMESPACE, error.to_string()));
        }

        self.finish(task.id(), TaskState::Failed);
        self.failed_total += 1;
        report.failed.push(TaskFailure {
            task: task.id(),
            label: task.label().to_string(),
            error,
        });
    }

    fn emit_telemetry(&self, report: &TickReport) {
        let Some(sender) = &self.telemetry_sender else {
            return;
        };
        let metric = |name: &str, value: MetricValue| TelemetryEvent::MetricUpdate {
            id: MetricId::new(METRIC_NAMESPACE, name),
            value,
        };
        let events = [
            metric("tasks_completed", MetricValue::Counter(self.completed_total)),
            metric("tasks_failed", MetricValue::Counter(self.failed_total)),
            metric("batch_size", MetricValue::Gauge(report.prepared.len() as f64)),
            metric(
                "graveyard_entries",
                MetricValue::Gauge(self.graveyard.len() as f64),
            ),
            metric(
                "resources_reclaimed",
                MetricValue::Counter(self.reclaimed_total),
            ),
        ];
        for event in events {
            let _ = sender.send(event);
        }
    }
}
