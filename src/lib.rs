// Copyright (c) 2026 Amunchain
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Amunchain incentive engine: rewards for bonded collateral.
//!
//! This crate provides:
//! - Canonical types, denoms and fixed-point money math
//! - Persistent sled state with atomic write batches and a Merkle state root
//! - The incentive engine: bonds, unbonding, reward programs and sponsorship
//! - A block driver that distributes rewards and advances program lifecycles
//! - An HTTP query surface, Prometheus metrics and structured logging

/// Core protocol primitives (types, math, state, incentive engine).
pub mod core;
/// Observability (metrics).
pub mod monitoring;
/// HTTP query and message surface.
pub mod rpc;
