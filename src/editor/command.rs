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

//! Command registration (SPEC_FULL.md §4.3).
//!
//! Grounded on the `Command` trait in `other_examples/59238dc7_tyrchen-md-
//! editor_..editor-command.rs.rs` (`execute`/`undo`), adapted to the
//! teacher's higher-level entry-point shape (`ComposerModel` methods take
//! an `&mut self` and the args they need) by threading the `Editor` itself
//! through instead of a boxed trait object per command instance.

use crate::editor::editor::Editor;
use crate::error::ModelError;

/// Arguments passed to a command; intentionally loose since commands vary
/// widely (insert-text takes a string, toggle-bold takes nothing, paste
/// takes HTML+plain-text).
#[derive(Debug, Clone, PartialEq)]
pub enum CommandArgs {
    None,
    Text(String),
    Html { html: String, plain: String },
    NumId(u32),
    StyleId(String),
    Dimensions { rows: usize, cols: usize },
}

pub type CommandFn = fn(&mut Editor, &CommandArgs) -> Result<(), ModelError>;
pub type CanExecuteFn = fn(&Editor, &CommandArgs) -> bool;

#[derive(Clone)]
pub struct CommandSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub can_execute: CanExecuteFn,
    pub execute: CommandFn,
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec").field("id", &self.id).finish()
    }
}
