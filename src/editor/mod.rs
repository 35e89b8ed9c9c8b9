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

//! The editor: selection, batching, undo/redo, command dispatch.

pub mod command;
pub mod config;
#[allow(clippy::module_inception)]
pub mod editor;
pub mod events;
pub mod history;
pub mod selection;

pub use command::{CommandArgs, CommandSpec};
pub use config::EditorConfig;
pub use editor::Editor;
pub use events::EditorEvent;
pub use selection::Selection;
