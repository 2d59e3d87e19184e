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

//! Acts as the **[A]gent** that owns GPU submission for the terrain pipeline.
//!
//! The scheduler runs on the submission thread and advances once per tick:
//!
//! 1. **Reclaim**: graveyard entries older than the configured delay are destroyed.
//! 2. **CollectReady**: tasks sent through a [`TaskSubmitter`] join the queue,
//!    and tasks depending on a failed task are failed in turn.
//! 3. **SubmitBatch**: up to `max_batch_size` tasks whose dependencies have
//!    completed are prepared, in submission order.
//! 4. **Dispatch**: the prepared tasks are recorded into one command list,
//!    with a barrier wherever a task borrows an owner an earlier task of the
//!    batch touched, then submitted and waited on.
//! 5. **CompleteAndReclaim**: completed tasks hand their temporaries to the
//!    graveyard, stamped with the current tick.

mod agent;
mod graveyard;
mod report;
mod submitter;

pub use self::agent::TaskScheduler;
pub use self::graveyard::Graveyard;
pub use self::report::{SchedulerError, SchedulerStatus, TaskFailure, TickReport};
pub use self::submitter::TaskSubmitter;
