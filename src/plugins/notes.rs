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

//! Comment, footnote, and endnote insertion (SPEC_FULL.md §9a — the
//! distilled spec names the `comment-range-start`/`comment-range-end`/
//! `footnote-ref`/`endnote-ref` leaf tags and their registries but gives
//! the editor no way to populate them). Range markers are inserted around
//! the run holding the selection's start rather than splitting it at a
//! character offset, matching the paragraph-granularity the rest of the
//! plugin set uses for structural edits.

use crate::editor::selection::Selection;
use crate::editor::Editor;
use crate::error::ModelError;
use crate::model::node::new;
use crate::model::registries::{Comment, Note};

pub type CommentId = u32;
pub type NoteId = i32;

fn run_slot(editor: &Editor, selection: &Selection) -> Result<(crate::model::Path, usize), ModelError> {
    let run_path = selection
        .start()
        .path
        .parent()
        .ok_or_else(|| ModelError::PathInvalid(selection.start().path.clone()))?;
    editor.document().parent_and_index(&run_path)
}

/// Wrap the run at the selection start with comment range markers and
/// record `text` under a fresh comment id.
pub fn insert_comment_range(
    editor: &mut Editor,
    selection: &Selection,
    author: &str,
    text: &str,
) -> Result<CommentId, ModelError> {
    let before = editor.document().clone();
    let comment_id = before.comments.next_id();
    let (parent_path, index) = run_slot(editor, selection)?;

    {
        let doc = editor.document_mut();
        let parent = doc.lookup_element_mut(&parent_path)?;
        parent.children.insert(index, new::comment_range_start(comment_id));
        parent.children.insert(index + 2, new::comment_range_end(comment_id));
        doc.comments.insert(Comment {
            id: comment_id,
            author: author.to_string(),
            date: String::new(),
            text: text.to_string(),
        });
    }
    editor.commit_registry_change(before);
    Ok(comment_id)
}

/// Drop a comment from the registry, leaving any range markers already in
/// the tree in place (mirroring `w:commentReference` runs surviving a
/// deleted `word/comments.xml` entry on degraded import, per §7).
pub fn resolve_comment(editor: &mut Editor, id: CommentId) -> Option<Comment> {
    let before = editor.document().clone();
    let removed = editor.document_mut().comments.remove(id);
    if removed.is_some() {
        editor.commit_registry_change(before);
    }
    removed
}

/// Insert a footnote reference after the run at the selection start and
/// record `body_text` as the note's content under a fresh note id.
pub fn insert_footnote(editor: &mut Editor, selection: &Selection, body_text: &str) -> Result<NoteId, ModelError> {
    insert_note(editor, selection, body_text, true)
}

/// Insert an endnote reference after the run at the selection start and
/// record `body_text` as the note's content under a fresh note id.
pub fn insert_endnote(editor: &mut Editor, selection: &Selection, body_text: &str) -> Result<NoteId, ModelError> {
    insert_note(editor, selection, body_text, false)
}

fn insert_note(editor: &mut Editor, selection: &Selection, body_text: &str, is_footnote: bool) -> Result<NoteId, ModelError> {
    let before = editor.document().clone();
    let registry = if is_footnote { &before.footnotes } else { &before.endnotes };
    let note_id = registry.next_id();
    let (parent_path, index) = run_slot(editor, selection)?;
    let content = new::paragraph(vec![new::plain_run(body_text)], Default::default());
    let reference = if is_footnote { new::footnote_ref(note_id) } else { new::endnote_ref(note_id) };

    {
        let doc = editor.document_mut();
        let parent = doc.lookup_element_mut(&parent_path)?;
        parent.children.insert(index + 1, reference);
        let registry_mut = if is_footnote { &mut doc.footnotes } else { &mut doc.endnotes };
        registry_mut.insert(Note { id: note_id, content });
    }
    editor.commit_registry_change(before);
    Ok(note_id)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::editor::EditorConfig;
    use crate::model::{Document, Path};

    fn editor_with_text(text: &str) -> Editor {
        let section = new::section(
            vec![new::paragraph(vec![new::plain_run(text)], Default::default())],
            Default::default(),
        );
        let doc = Document::with_root(new::document(new::body(vec![section])));
        Editor::new(doc, EditorConfig::default())
    }

    #[test]
    fn insert_comment_range_wraps_the_run_and_records_text() {
        let mut editor = editor_with_text("hello");
        let path = Path::from_indices(vec![0, 0, 0, 0, 0]);
        let selection = Selection::collapse(path, 0);
        let id = insert_comment_range(&mut editor, &selection, "alice", "needs review").unwrap();

        let paragraph = editor.document().lookup_element(&Path::from_indices(vec![0, 0, 0])).unwrap();
        assert_eq!(paragraph.children.len(), 3);
        assert_eq!(paragraph.children[0].tag(), crate::model::Tag::CommentRangeStart);
        assert_eq!(paragraph.children[2].tag(), crate::model::Tag::CommentRangeEnd);
        assert_eq!(editor.document().comments.get(id).unwrap().text, "needs review");
    }

    #[test]
    fn insert_comment_range_is_undoable() {
        let mut editor = editor_with_text("hello");
        let path = Path::from_indices(vec![0, 0, 0, 0, 0]);
        let selection = Selection::collapse(path, 0);
        let before = editor.document().clone();
        insert_comment_range(&mut editor, &selection, "alice", "note").unwrap();
        assert!(editor.undo().unwrap());
        assert_eq!(editor.document(), &before);
    }

    #[test]
    fn resolve_comment_removes_registry_entry() {
        let mut editor = editor_with_text("hello");
        let path = Path::from_indices(vec![0, 0, 0, 0, 0]);
        let selection = Selection::collapse(path, 0);
        let id = insert_comment_range(&mut editor, &selection, "alice", "note").unwrap();
        assert!(resolve_comment(&mut editor, id).is_some());
        assert!(editor.document().comments.get(id).is_none());
    }

    #[test]
    fn insert_footnote_adds_reference_and_note_body() {
        let mut editor = editor_with_text("hello");
        let path = Path::from_indices(vec![0, 0, 0, 0, 0]);
        let selection = Selection::collapse(path, 0);
        let id = insert_footnote(&mut editor, &selection, "see appendix").unwrap();

        let paragraph = editor.document().lookup_element(&Path::from_indices(vec![0, 0, 0])).unwrap();
        assert_eq!(paragraph.children.len(), 2);
        assert_eq!(paragraph.children[1].tag(), crate::model::Tag::FootnoteRef);
        assert_eq!(editor.document().footnotes.get(id).unwrap().content.raw_text(), "see appendix");
    }
}
