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

//! Provides the public, backend-agnostic GPU contracts used by the terrain pipeline.
//!
//! This module defines the "common language" for every GPU operation the
//! scheduler and the planning code perform. It contains the abstract `traits`
//! (like [`GpuBackend`]), data structures (like [`TextureDescriptor`]), and error
//! types. The 'how' is handled by a concrete backend in the `strata-infra` crate,
//! which implements these traits; `strata-lanes` and `strata-agents` only ever
//! see opaque handles.

pub mod api;
pub mod error;
pub mod traits;

pub use self::api::*;
pub use self::error::{KernelError, PipelineError, ResourceError};
pub use self::traits::{ComputeKernel, CommandList, GpuBackend, KernelInvocation, KernelResources};
