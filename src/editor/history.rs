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

//! Linear undo/redo history (SPEC_FULL.md §4.3).
//!
//! Grounded on the two-stack shape of `automerge_model/undo_redo.rs`
//! (`undo_stack`/`redo_stack`, pop-and-push-to-the-other-stack, a new edit
//! clears redo) but replacing its CRDT-heads snapshot with a linear batch
//! of operations, per spec §1's no-CRDT non-goal.

use crate::editor::selection::Selection;
use crate::model::Document;
use crate::operations::{invert_batch, Batch};

/// What a history entry replays on undo/redo: either the ordinary operation
/// algebra, or a whole-document snapshot swap for registry-level edits that
/// fall outside the closed `Op` set (comment/footnote/endnote definitions,
/// SPEC_FULL.md §9a).
#[derive(Debug, Clone)]
pub enum HistoryAction {
    Ops(Batch),
    RegistrySnapshot { before: Box<Document>, after: Box<Document> },
}

/// What the editor should do to restore state for one direction of undo/redo.
#[derive(Debug, Clone)]
pub enum Replay {
    ApplyBatch(Batch),
    ReplaceDocument(Document),
}

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub action: HistoryAction,
    pub selection_before: Option<Selection>,
    pub selection_after: Option<Selection>,
}

#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        History {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit,
        }
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);
        if self.undo_stack.len() > self.limit {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Pop the last undo entry, returning how to replay it (already
    /// inverted) and the selection to restore.
    pub fn undo(&mut self) -> Option<(Replay, Option<Selection>)> {
        let entry = self.undo_stack.pop()?;
        let replay = match &entry.action {
            HistoryAction::Ops(batch) => Replay::ApplyBatch(invert_batch(batch)),
            HistoryAction::RegistrySnapshot { before, .. } => Replay::ReplaceDocument((**before).clone()),
        };
        let selection_before = entry.selection_before.clone();
        self.redo_stack.push(entry);
        Some((replay, selection_before))
    }

    /// Pop the last redo entry, returning how to replay it and the
    /// selection to restore.
    pub fn redo(&mut self) -> Option<(Replay, Option<Selection>)> {
        let entry = self.redo_stack.pop()?;
        let replay = match &entry.action {
            HistoryAction::Ops(batch) => Replay::ApplyBatch(batch.clone()),
            HistoryAction::RegistrySnapshot { after, .. } => Replay::ReplaceDocument((**after).clone()),
        };
        let selection_after = entry.selection_after.clone();
        self.undo_stack.push(entry);
        Some((replay, selection_after))
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::Path;
    use crate::operations::Op;

    fn text_op(s: &str) -> HistoryAction {
        HistoryAction::Ops(Batch::single(Op::InsertText {
            path: Path::root(),
            offset: 0,
            text: s.into(),
        }))
    }

    #[test]
    fn undo_on_empty_history_is_none() {
        let mut h = History::new(10);
        assert!(h.undo().is_none());
    }

    #[test]
    fn push_then_undo_pops_entry() {
        let mut h = History::new(10);
        h.push(HistoryEntry {
            action: text_op("a"),
            selection_before: None,
            selection_after: None,
        });
        assert!(h.can_undo());
        assert!(h.undo().is_some());
        assert!(!h.can_undo());
        assert!(h.can_redo());
    }

    #[test]
    fn new_push_after_undo_clears_redo() {
        let mut h = History::new(10);
        h.push(HistoryEntry {
            action: text_op("a"),
            selection_before: None,
            selection_after: None,
        });
        h.undo();
        assert!(h.can_redo());
        h.push(HistoryEntry {
            action: text_op("b"),
            selection_before: None,
            selection_after: None,
        });
        assert!(!h.can_redo());
    }

    #[test]
    fn history_respects_limit() {
        let mut h = History::new(2);
        for s in ["a", "b", "c"] {
            h.push(HistoryEntry {
                action: text_op(s),
                selection_before: None,
                selection_after: None,
            });
        }
        assert_eq!(h.undo_depth(), 2);
    }
}
