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

//! Editing plugins: pure functions operating on an [`crate::editor::Editor`]
//! through its `apply`/`batch` surface only (SPEC_FULL.md §4.4).

pub mod clipboard;
pub mod formatting;
#[cfg(feature = "clipboard-html")]
pub mod html_import;
pub mod list;
pub mod notes;
pub mod styles;
pub mod table;
pub mod text;
