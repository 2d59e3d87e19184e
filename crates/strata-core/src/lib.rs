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

//! # Strata Core
//!
//! Foundational crate containing traits, core types, and interface contracts
//! shared by every part of the terrain compute pipeline: the handle-based GPU
//! backend contract, world/pixel geometry, region identity, and the deferred
//! [`task::GpuTask`] abstraction that planning code hands to the scheduler.

#![warn(missing_docs)]

pub mod gpu;
pub mod math;
pub mod settings;
pub mod task;
pub mod telemetry;
pub mod terrain;

#[cfg(test)]
mod test_support;

pub use settings::{SchedulerSettings, SettingsError, TerrainSettings};
pub use task::{GpuTask, OwnerId, PrepareContext, PreparedWork, TaskError, TaskId, TaskState};
