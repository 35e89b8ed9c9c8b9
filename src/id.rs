// Copyright 2026 The Matrix.org Foundation C.I.C.
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

//! Monotonic node identity allocation.
//!
//! Mirrors the teacher crate's test-only transaction counters: production
//! code only ever calls [`next_id`], and [`reset_ids_for_test`] exists
//! solely so fixtures in tests can assert on predictable ids.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A globally unique node identity, stable for the lifetime of the node
/// (surviving persistent-update structural sharing).
pub type NodeId = u64;

pub fn next_id() -> NodeId {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

#[cfg(any(test, feature = "test-utils"))]
pub fn reset_ids_for_test() {
    NEXT_ID.store(1, Ordering::Relaxed);
}
