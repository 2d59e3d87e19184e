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

//! # Strata Agents
//!
//! The tactical layer of the terrain compute pipeline.
//!
//! Planning code builds [`GpuTask`](strata_core::GpuTask)s with the lanes and
//! hands them to the [`TaskScheduler`], which owns everything that happens
//! afterwards: dependency ordering, just-in-time preparation, batching with
//! hazard barriers, submission, and the delayed reclamation of every GPU
//! resource the tasks leave behind.

#![warn(missing_docs)]

pub mod scheduler_agent;

pub use scheduler_agent::{
    Graveyard, SchedulerError, SchedulerStatus, TaskFailure, TaskScheduler, TaskSubmitter,
    TickReport,
};
