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

//! # Strata Infra
//!
//! Concrete implementations of the contracts defined in `strata-core`.
//!
//! The only backend shipped today is the [`SoftwareDevice`], a CPU
//! implementation of [`GpuBackend`](strata_core::gpu::GpuBackend) that executes
//! registered [`ComputeKernel`](strata_core::gpu::ComputeKernel)s invocation by
//! invocation. It records every submission, which makes it the backend of
//! choice for tests and for the sandbox.

#![warn(missing_docs)]

pub mod gpu;

pub use gpu::software::SoftwareDevice;
