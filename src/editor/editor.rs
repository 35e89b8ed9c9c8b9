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

//! The editor: document + selection + history, driving registered commands.
//!
//! Grounded on `ComposerModel` (`composer_model.rs`) for the overall
//! document+selection+update shape, and on `automerge_model/undo_redo.rs`
//! for the undo/redo call shape, replaced with the linear [`History`].

use std::collections::HashMap;

use crate::editor::command::{CommandArgs, CommandSpec};
use crate::editor::config::EditorConfig;
use crate::editor::events::{EditorEvent, EventBus, Listener};
use crate::editor::history::{History, HistoryAction, HistoryEntry, Replay};
use crate::editor::selection::Selection;
use crate::error::ModelError;
use crate::model::{Document, Path};
use crate::operations::{apply_batch, Batch, Op};

pub struct Editor {
    document: Document,
    selection: Selection,
    history: History,
    config: EditorConfig,
    commands: HashMap<&'static str, CommandSpec>,
    events: EventBus,
    in_batch: Option<Vec<Op>>,
}

impl Editor {
    pub fn new(document: Document, config: EditorConfig) -> Self {
        let first_text = document
            .first_text_path_under(&Path::root())
            .unwrap_or_else(|_| Path::root());
        Editor {
            document,
            selection: Selection::collapse(first_text, 0),
            history: History::new(config.history_limit),
            config,
            commands: HashMap::new(),
            events: EventBus::new(),
            in_batch: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn is_read_only(&self) -> bool {
        self.config.read_only
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
        self.events.emit(EditorEvent::SelectionChanged);
    }

    pub fn on(&mut self, listener: Listener) {
        self.events.on(listener);
    }

    pub fn register_command(&mut self, spec: CommandSpec) {
        self.commands.insert(spec.id, spec);
    }

    pub fn can_execute_command(&self, id: &str, args: &CommandArgs) -> bool {
        if self.config.read_only {
            return false;
        }
        match self.commands.get(id) {
            Some(spec) => (spec.can_execute)(self, args),
            None => false,
        }
    }

    pub fn execute_command(&mut self, id: &str, args: CommandArgs) -> Result<(), ModelError> {
        if self.config.read_only {
            return Ok(());
        }
        let spec = match self.commands.get(id) {
            Some(s) => s.clone(),
            None => return Ok(()),
        };
        if !(spec.can_execute)(self, &args) {
            return Ok(());
        }
        (spec.execute)(self, &args)
    }

    /// Apply a single operation outside of a batch: pushed as its own
    /// history entry.
    pub fn apply(&mut self, op: Op) -> Result<(), ModelError> {
        if let Some(pending) = &mut self.in_batch {
            let selection_before = self.selection.clone();
            self.document = crate::operations::apply(&self.document, &op)?;
            pending.push(op);
            let _ = selection_before;
            return Ok(());
        }
        let selection_before = self.selection.clone();
        self.document = crate::operations::apply(&self.document, &op)?;
        let batch = Batch::single(op);
        self.history.push(HistoryEntry {
            action: HistoryAction::Ops(batch),
            selection_before: Some(selection_before),
            selection_after: Some(self.selection.clone()),
        });
        self.events.emit(EditorEvent::DocumentChanged);
        Ok(())
    }

    /// Replace the document and registries wholesale, recording `before`
    /// (a snapshot taken by the caller prior to mutating) as one undoable
    /// history entry. Used for registry-level edits — comment, footnote,
    /// and endnote definitions — that fall outside the closed `Op` set
    /// (SPEC_FULL.md §9a).
    pub(crate) fn commit_registry_change(&mut self, before: Document) {
        let selection_before = self.selection.clone();
        self.history.push(HistoryEntry {
            action: HistoryAction::RegistrySnapshot {
                before: Box::new(before),
                after: Box::new(self.document.clone()),
            },
            selection_before: Some(selection_before),
            selection_after: Some(self.selection.clone()),
        });
        self.events.emit(EditorEvent::DocumentChanged);
    }

    pub(crate) fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Run `f`, collecting every `apply` call into one history entry.
    /// If `f` returns `Err`, every collected operation is reverted in
    /// reverse order and no history entry is recorded. Nested `batch()`
    /// calls merge into the enclosing one instead of pushing their own
    /// history entry, so e.g. `text::insert_text` calling `delete_selection`
    /// (itself a `batch`) still produces exactly one undo step (§4.3).
    pub fn batch<F>(&mut self, f: F) -> Result<(), ModelError>
    where
        F: FnOnce(&mut Editor) -> Result<(), ModelError>,
    {
        let nested = self.in_batch.is_some();
        let selection_before = self.selection.clone();
        let outer = self.in_batch.replace(Vec::new());
        let result = f(self);
        let collected = self.in_batch.take().unwrap_or_default();
        self.in_batch = outer;

        if nested {
            return match result {
                Ok(()) => {
                    self.in_batch.as_mut().expect("nested implies Some").extend(collected);
                    Ok(())
                }
                Err(e) => {
                    for op in collected.into_iter().rev() {
                        let inv = crate::operations::invert(&op);
                        if let Ok(reverted) = crate::operations::apply(&self.document, &inv) {
                            self.document = reverted;
                        }
                    }
                    self.selection = selection_before;
                    Err(e)
                }
            };
        }

        match result {
            Ok(()) if !collected.is_empty() => {
                let batch = Batch::new(collected).expect("checked non-empty");
                self.history.push(HistoryEntry {
                    action: HistoryAction::Ops(batch),
                    selection_before: Some(selection_before),
                    selection_after: Some(self.selection.clone()),
                });
                self.events.emit(EditorEvent::DocumentChanged);
                Ok(())
            }
            Ok(()) => Ok(()),
            Err(e) => {
                // Roll back: invert what was collected, in reverse order,
                // directly against the current document.
                for op in collected.into_iter().rev() {
                    let inv = crate::operations::invert(&op);
                    if let Ok(reverted) = crate::operations::apply(&self.document, &inv) {
                        self.document = reverted;
                    }
                }
                self.selection = selection_before;
                Err(e)
            }
        }
    }

    pub fn undo(&mut self) -> Result<bool, ModelError> {
        let Some((replay, selection)) = self.history.undo() else {
            return Ok(false);
        };
        match replay {
            Replay::ApplyBatch(batch) => self.document = apply_batch(&self.document, &batch)?,
            Replay::ReplaceDocument(doc) => self.document = doc,
        }
        if let Some(sel) = selection {
            self.selection = sel;
        }
        self.events.emit(EditorEvent::DocumentChanged);
        Ok(true)
    }

    pub fn redo(&mut self) -> Result<bool, ModelError> {
        let Some((replay, selection)) = self.history.redo() else {
            return Ok(false);
        };
        match replay {
            Replay::ApplyBatch(batch) => self.document = apply_batch(&self.document, &batch)?,
            Replay::ReplaceDocument(doc) => self.document = doc,
        }
        if let Some(sel) = selection {
            self.selection = sel;
        }
        self.events.emit(EditorEvent::DocumentChanged);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::node::new;

    fn editor_with_text(text: &str) -> Editor {
        let section = new::section(
            vec![new::paragraph(vec![new::plain_run(text)], Default::default())],
            Default::default(),
        );
        let doc = Document::with_root(new::document(new::body(vec![section])));
        Editor::new(doc, EditorConfig::default())
    }

    #[test]
    fn undo_redo_identity_over_insert_then_delete() {
        let mut editor = editor_with_text("");
        let path = editor.selection.anchor.path.clone();
        editor
            .apply(Op::InsertText {
                path: path.clone(),
                offset: 0,
                text: "abc".into(),
            })
            .unwrap();
        editor
            .apply(Op::DeleteText {
                path,
                offset: 0,
                text: "abc".into(),
            })
            .unwrap();
        let final_doc = editor.document().clone();

        assert!(editor.undo().unwrap());
        assert!(editor.undo().unwrap());
        assert_eq!(editor.document().body().children()[0].raw_text(), "");

        assert!(editor.redo().unwrap());
        assert!(editor.redo().unwrap());
        assert_eq!(editor.document(), &final_doc);
    }

    #[test]
    fn batch_rolls_back_on_error() {
        let mut editor = editor_with_text("hi");
        let before = editor.document().clone();
        let bad_path = Path::from_indices(vec![9, 9, 9, 9, 9]);
        let result = editor.batch(|e| {
            e.apply(Op::InsertText {
                path: bad_path,
                offset: 0,
                text: "x".into(),
            })
        });
        assert!(result.is_err());
        assert_eq!(editor.document(), &before);
        assert!(!editor.can_undo());
    }

    #[test]
    fn read_only_blocks_execute_command() {
        let mut editor = editor_with_text("hi");
        editor.config.read_only = true;
        assert!(!editor.can_execute_command("anything", &CommandArgs::None));
    }
}
