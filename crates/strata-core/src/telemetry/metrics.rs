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

//! Metric identifiers and values.

use std::fmt::{self, Display};

/// A structured identifier for a metric.
///
/// A `MetricId` is composed of a namespace, a name, and a set of key-value labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricId {
    /// The broad category of the metric (e.g., "scheduler").
    pub namespace: String,
    /// The specific name of the metric (e.g., "tasks_completed").
    pub name: String,
    /// Optional key-value pairs, sorted by key.
    pub labels: Vec<(String, String)>,
}

impl MetricId {
    /// Creates a new `MetricId` with a namespace and a name.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            labels: Vec::new(),
        }
    }

    /// Adds a dimensional label, keeping labels sorted by key.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push((key.into(), value.into()));
        self.labels.sort_by(|a, b| a.0.cmp(&b.0));
        self
    }
}

impl Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)?;
        if !self.labels.is_empty() {
            let labels = self
                .labels
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(",");
            write!(f, "[{labels}]")?;
        }
        Ok(())
    }
}

/// A metric sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    /// A monotonically increasing count.
    Counter(u64),
    /// A value that can go up or down.
    Gauge(f64),
}

impl MetricValue {
    /// Returns the value as an `f64`.
    pub fn as_f64(&self) -> f64 {
        match self {
            MetricValue::Counter(v) => *v as f64,
            MetricValue::Gauge(v) => *v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_id_formats_sorted_labels() {
        let id = MetricId::new("scheduler", "batch_size")
            .with_label("tick", "4")
            .with_label("backend", "software");
        assert_eq!(id.to_string(), "scheduler:batch_size[backend=software,tick=4]");
        assert_eq!(
            MetricId::new("scheduler", "tasks_failed").to_string(),
            "scheduler:tasks_failed"
        );
    }
}
