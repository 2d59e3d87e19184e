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

//! Event types for scheduler telemetry.

use crate::telemetry::metrics::{MetricId, MetricValue};

/// A telemetry event produced on the submission thread.
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryEvent {
    /// A single metric sample update.
    MetricUpdate {
        /// The metric identifier.
        id: MetricId,
        /// The new value.
        value: MetricValue,
    },
    /// A categorized, human-readable diagnostic.
    Diagnostic {
        /// The subsystem the message concerns (e.g. "scheduler").
        category: String,
        /// The message.
        message: String,
    },
}

impl TelemetryEvent {
    /// Creates a diagnostic event.
    pub fn diagnostic(category: impl Into<String>, message: impl Into<String>) -> Self {
        TelemetryEvent::Diagnostic {
            category: category.into(),
            message: message.into(),
        }
    }
}
