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

//! Editor construction configuration (SPEC_FULL.md §9a).
//!
//! Passed to [`crate::editor::Editor::new`], mirroring the teacher's own
//! convention of configuring a composer entirely through constructor
//! arguments rather than a file or environment layer.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Maximum number of undo entries retained (§4.3).
    pub history_limit: usize,
    pub read_only: bool,
    /// Default `numId`s used by the bullet/numbered list toggles (§4.4.3).
    pub default_list_num_ids: (u32, u32),
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            history_limit: 100,
            read_only: false,
            default_list_num_ids: (1, 2),
        }
    }
}
