// Copyright 2025 John Brosnihan
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
//! Error types
//!
//! The simulation hot path favors silent degradation (clamping, fallback
//! normals, skipped entries) over errors. The one condition that fails
//! loudly is a caller contract violation: mutating a body that is not
//! registered with the world, which indicates a lifecycle bug in the
//! caller rather than a numerical edge case.

use crate::handle::BodyHandle;
use thiserror::Error;

/// Errors surfaced by world mutation APIs
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsError {
    /// The handle refers to a body that was destroyed or never registered
    /// with this world
    #[error("invalid state: {0} is not registered with this world")]
    InvalidState(BodyHandle),
}
