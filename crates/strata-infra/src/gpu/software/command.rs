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

use strata_core::gpu::{CommandList, CommandListId, DispatchCommand, TextureCopy};
use std::any::Any;

/// One command captured by a [`SoftwareCommandList`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCommand {
    /// A compute dispatch.
    Dispatch(DispatchCommand),
    /// A texture-to-texture copy.
    Copy(TextureCopy),
    /// A full barrier.
    Barrier,
}

/// A command list that stores its commands for the device to replay on submit.
#[derive(Debug)]
pub struct SoftwareCommandList {
    pub(crate) id: CommandListId,
    pub(crate) label: Option<String>,
    pub(crate) commands: Vec<RecordedCommand>,
}

impl SoftwareCommandList {
    pub(crate) fn new(id: CommandListId, label: Option<&str>) -> Self {
        Self {
            id,
            label: label.map(str::to_string),
            commands: Vec::new(),
        }
    }

    /// The commands recorded so far.
    pub fn commands(&self) -> &[RecordedCommand] {
        &self.commands
    }
}

impl CommandList for SoftwareCommandList {
    fn id(&self) -> CommandListId {
        self.id
    }

    fn dispatch(&mut self, command: &DispatchCommand) {
        self.commands.push(RecordedCommand::Dispatch(command.clone()));
    }

    fn copy_texture_to_texture(&mut self, copy: &TextureCopy) {
        self.commands.push(RecordedCommand::Copy(*copy));
    }

    fn barrier(&mut self) {
        self.commands.push(RecordedCommand::Barrier);
    }

    fn command_count(&self) -> usize {
        self.commands.len()
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

/// A submitted command list, kept by the device for inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRecord {
    /// The submission's identifier.
    pub id: strata_core::gpu::SubmissionId,
    /// The command list's label.
    pub label: Option<String>,
    /// The commands, in recording order.
    pub commands: Vec<RecordedCommand>,
}

impl SubmissionRecord {
    /// The number of dispatches in the submission.
    pub fn dispatch_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RecordedCommand::Dispatch(_)))
            .count()
    }

    /// The number of barriers in the submission.
    pub fn barrier_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RecordedCommand::Barrier))
            .count()
    }
}
