// Copyright 2022 The Matrix.org Foundation C.I.C.
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

pub mod codec;
pub mod editor;
pub mod error;
pub mod id;
pub mod model;
pub mod operations;
pub mod plugins;

pub use codec::{export_docx, import_docx};
pub use editor::{CommandArgs, CommandSpec, Editor, EditorConfig, EditorEvent, Selection};
pub use error::{CodecError, CodecResult, ModelError, ModelResult};
pub use id::NodeId;
pub use model::{Document, Node, Path, Point, Tag};
pub use operations::{apply, apply_batch, invert, invert_batch, Batch, Op};

/// Construct an editor over a fresh, empty document, mirroring the
/// teacher's `ComposerModel::new` entry point.
pub fn create_editor() -> Editor {
    Editor::new(Document::empty(), EditorConfig::default())
}
