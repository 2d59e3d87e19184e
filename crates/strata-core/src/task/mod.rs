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

//! The deferred unit of GPU work.
//!
//! A [`GpuTask`] carries a generator closure that captures its inputs when the
//! task is planned and only runs when the scheduler prepares the task. Running
//! it yields [`PreparedWork`]: the commands to record, the temporary resources
//! to reclaim afterwards, and the owners the commands read.

mod error;
mod gpu_task;
mod id;
mod work;

pub use self::error::TaskError;
pub use self::gpu_task::{GpuTask, TaskState};
pub use self::id::{OwnerId, TaskId};
pub use self::work::{PrepareContext, PreparedWork, RecordFn};
