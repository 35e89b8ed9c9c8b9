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

//! Text editing commands (SPEC_FULL.md §4.4.1).
//!
//! Grounded on `composer_model/selection.rs` + `dom/insert_node_at_cursor.rs`
//! for cursor-split/insert mechanics, and on the `tyrchen-md-editor`
//! `DeleteTextCommand` for the three-case delete algorithm.

use crate::editor::selection::{paragraph_path, run_path, Selection};
use crate::editor::Editor;
use crate::error::ModelError;
use crate::model::node::new;
use crate::model::properties::ParagraphProperties;
use crate::model::{Path, Point, Properties};
use crate::operations::Op;

/// Insert `text` at the cursor, deleting the current selection first if it
/// is not collapsed.
pub fn insert_text(editor: &mut Editor, text: &str) -> Result<(), ModelError> {
    editor.batch(|editor| {
        if !editor.selection().is_collapsed() {
            delete_selection(editor)?;
        }
        let point = editor.selection().anchor.clone();
        editor.apply(Op::InsertText {
            path: point.path.clone(),
            offset: point.offset,
            text: text.to_string(),
        })?;
        let new_point = Point::new(point.path, point.offset + text.chars().count());
        editor.set_selection(Selection::collapse(new_point.path, new_point.offset));
        Ok(())
    })
}

/// Delete the current selection, collapsing the cursor to its start.
/// No-op if the selection is already collapsed.
pub fn delete_selection(editor: &mut Editor) -> Result<(), ModelError> {
    if editor.selection().is_collapsed() {
        return Ok(());
    }
    let sel = editor.selection().normalize();
    let start_para = paragraph_path(&sel.anchor);
    let end_para = paragraph_path(&sel.focus);

    if sel.anchor.path == sel.focus.path {
        return delete_within_same_leaf(editor, &sel);
    }
    if start_para == end_para {
        return delete_within_same_paragraph(editor, &sel);
    }
    delete_across_paragraphs(editor, &sel)
}

fn delete_within_same_leaf(editor: &mut Editor, sel: &Selection) -> Result<(), ModelError> {
    editor.batch(|editor| {
        let path = sel.anchor.path.clone();
        let text = editor.document().lookup_text(&path)?.to_string();
        let start = sel.anchor.offset.min(sel.focus.offset);
        let end = sel.anchor.offset.max(sel.focus.offset);
        let removed: String = text.chars().skip(start).take(end - start).collect();
        editor.apply(Op::DeleteText {
            path: path.clone(),
            offset: start,
            text: removed,
        })?;
        editor.set_selection(Selection::collapse(path, start));
        Ok(())
    })
}

fn delete_within_same_paragraph(editor: &mut Editor, sel: &Selection) -> Result<(), ModelError> {
    editor.batch(|editor| {
        let anchor_run = run_path(&sel.anchor);
        let focus_run = run_path(&sel.focus);

        let anchor_text = editor.document().lookup_text(&sel.anchor.path)?.to_string();
        let tail: String = anchor_text.chars().skip(sel.anchor.offset).collect();
        if !tail.is_empty() {
            editor.apply(Op::DeleteText {
                path: sel.anchor.path.clone(),
                offset: sel.anchor.offset,
                text: tail,
            })?;
        }

        if anchor_run != focus_run {
            let anchor_run_idx = anchor_run.index_in_parent().unwrap_or(0);
            let focus_run_idx = focus_run.index_in_parent().unwrap_or(0);
            let paragraph = anchor_run.parent().ok_or(ModelError::PathInvalid(anchor_run.clone()))?;
            for idx in ((anchor_run_idx + 1)..focus_run_idx).rev() {
                let run_p = paragraph.child(idx);
                let node = editor.document().lookup_node(&run_p)?.clone();
                editor.apply(Op::RemoveNode {
                    path: run_p,
                    node,
                })?;
            }
        }

        let focus_text = editor.document().lookup_text(&sel.focus.path)?.to_string();
        let head: String = focus_text.chars().take(sel.focus.offset).collect();
        if !head.is_empty() {
            let focus_path_after = recompute_focus_text_path(sel);
            editor.apply(Op::DeleteText {
                path: focus_path_after,
                offset: 0,
                text: head,
            })?;
        }

        editor.set_selection(Selection::collapse(sel.anchor.path.clone(), sel.anchor.offset));
        Ok(())
    })
}

fn recompute_focus_text_path(sel: &Selection) -> Path {
    // Same-paragraph case: removing runs strictly between anchor and focus
    // shifts focus's run index down to `anchor_run_idx + 1`, but the text
    // leaf index within that run is unaffected.
    let anchor_run = run_path(&sel.anchor);
    let focus_run = run_path(&sel.focus);
    if anchor_run == focus_run {
        return sel.focus.path.clone();
    }
    let anchor_run_idx = anchor_run.index_in_parent().unwrap_or(0);
    let paragraph = anchor_run.parent().unwrap_or_else(Path::root);
    let new_run = paragraph.child(anchor_run_idx + 1);
    let text_idx = sel.focus.path.index_in_parent().unwrap_or(0);
    new_run.child(text_idx)
}

fn delete_across_paragraphs(editor: &mut Editor, sel: &Selection) -> Result<(), ModelError> {
    editor.batch(|editor| {
        let anchor_para = paragraph_path(&sel.anchor);
        let focus_para = paragraph_path(&sel.focus);
        let section = anchor_para.parent().ok_or(ModelError::PathInvalid(anchor_para.clone()))?;
        let anchor_para_idx = anchor_para.index_in_parent().unwrap_or(0);
        let focus_para_idx = focus_para.index_in_parent().unwrap_or(0);

        // Trim the anchor paragraph's anchor run's text to the right.
        let anchor_text = editor.document().lookup_text(&sel.anchor.path)?.to_string();
        let tail: String = anchor_text.chars().skip(sel.anchor.offset).collect();
        if !tail.is_empty() {
            editor.apply(Op::DeleteText {
                path: sel.anchor.path.clone(),
                offset: sel.anchor.offset,
                text: tail,
            })?;
        }

        // Remove any runs after the anchor run in the anchor paragraph.
        let anchor_run = run_path(&sel.anchor);
        let anchor_run_idx = anchor_run.index_in_parent().unwrap_or(0);
        let anchor_para_children = editor.document().lookup_element(&anchor_para)?.children.len();
        for idx in (anchor_run_idx + 1..anchor_para_children).rev() {
            let run_p = anchor_para.child(idx);
            let node = editor.document().lookup_node(&run_p)?.clone();
            editor.apply(Op::RemoveNode { path: run_p, node })?;
        }

        // Remove whole paragraphs strictly between anchor and focus.
        for idx in ((anchor_para_idx + 1)..focus_para_idx).rev() {
            let p = section.child(idx);
            let node = editor.document().lookup_node(&p)?.clone();
            editor.apply(Op::RemoveNode { path: p, node })?;
        }

        // The focus paragraph now sits at index anchor_para_idx + 1.
        let shifted_focus_para = section.child(anchor_para_idx + 1);

        // Trim the focus run's text to the left.
        let focus_run_idx = run_path(&sel.focus).index_in_parent().unwrap_or(0);
        let focus_text_idx = sel.focus.path.index_in_parent().unwrap_or(0);
        let focus_text_path = shifted_focus_para.child(focus_run_idx).child(focus_text_idx);
        let focus_text = editor.document().lookup_text(&focus_text_path)?.to_string();
        let head: String = focus_text.chars().take(sel.focus.offset).collect();
        if !head.is_empty() {
            editor.apply(Op::DeleteText {
                path: focus_text_path,
                offset: 0,
                text: head,
            })?;
        }

        // Remove runs before the focus run in the focus paragraph.
        for idx in (0..focus_run_idx).rev() {
            let run_p = shifted_focus_para.child(idx);
            let node = editor.document().lookup_node(&run_p)?.clone();
            editor.apply(Op::RemoveNode { path: run_p, node })?;
        }

        // Merge the (now run-0-starting) focus paragraph into the anchor
        // paragraph, at the position right after the anchor run.
        let merge_position = anchor_run_idx + 1;
        let anchor_para_props = editor
            .document()
            .lookup_node(&anchor_para)?
            .properties()
            .clone();
        editor.apply(Op::MergeNode {
            path: shifted_focus_para,
            position: merge_position,
            properties: anchor_para_props,
        })?;

        editor.set_selection(Selection::collapse(sel.anchor.path.clone(), sel.anchor.offset));
        Ok(())
    })
}

/// Split the paragraph at the cursor (Enter), per §4.4.1: three nested
/// `split_node` operations (text, run, paragraph).
pub fn split_paragraph(editor: &mut Editor) -> Result<(), ModelError> {
    editor.batch(|editor| {
        if !editor.selection().is_collapsed() {
            delete_selection(editor)?;
        }
        let point = editor.selection().anchor.clone();
        let text = editor.document().lookup_text(&point.path)?.to_string();
        let tail: String = text.chars().skip(point.offset).collect();

        // Split the text leaf: the tail characters move to a new sibling
        // text node; the run and paragraph containers are then split at
        // the boundary between the old and new leaf.
        if !tail.is_empty() {
            editor.apply(Op::DeleteText {
                path: point.path.clone(),
                offset: point.offset,
                text: tail.clone(),
            })?;
        }
        let run_p = run_path(&point);
        let text_idx = point.path.index_in_parent().unwrap_or(0);
        editor.apply(Op::InsertNode {
            path: run_p.child(text_idx + 1),
            node: new::text(tail),
        })?;
        editor.apply(Op::SplitNode {
            path: run_p.clone(),
            position: text_idx + 1,
            properties: editor.document().lookup_node(&run_p)?.properties().clone(),
        })?;
        let paragraph_p = run_p.parent().ok_or(ModelError::PathInvalid(run_p.clone()))?;
        let run_idx = run_p.index_in_parent().unwrap_or(0);
        editor.apply(Op::SplitNode {
            path: paragraph_p.clone(),
            position: run_idx + 1,
            properties: Properties::Paragraph(
                editor
                    .document()
                    .lookup_node(&paragraph_p)?
                    .properties()
                    .as_paragraph()
                    .cloned()
                    .unwrap_or_else(ParagraphProperties::default),
            ),
        })?;

        let new_para_idx = paragraph_p.index_in_parent().unwrap_or(0) + 1;
        let new_para = paragraph_p.parent().unwrap_or_else(Path::root).child(new_para_idx);
        let new_text = editor.document().first_text_path_under(&new_para)?;
        editor.set_selection(Selection::collapse(new_text, 0));
        Ok(())
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::editor::EditorConfig;
    use crate::model::{node::new, Document};

    fn two_paragraph_editor(a: &str, b: &str) -> Editor {
        let section = new::section(
            vec![
                new::paragraph(vec![new::plain_run(a)], Default::default()),
                new::paragraph(vec![new::plain_run(b)], Default::default()),
            ],
            Default::default(),
        );
        let doc = Document::with_root(new::document(new::body(vec![section])));
        Editor::new(doc, EditorConfig::default())
    }

    #[test]
    fn insert_text_at_collapsed_cursor() {
        let mut editor = two_paragraph_editor("Hello", "");
        let path = Path::from_indices(vec![0, 0, 0, 0, 0]);
        editor.set_selection(Selection::collapse(path, 5));
        insert_text(&mut editor, "!").unwrap();
        assert_eq!(
            editor.document().body().children()[0].children()[0].raw_text(),
            "Hello!"
        );
    }

    #[test]
    fn delete_across_paragraphs_merges_and_collapses() {
        let mut editor = two_paragraph_editor("Hello", "World");
        let anchor = Path::from_indices(vec![0, 0, 0, 0, 0]);
        let focus = Path::from_indices(vec![0, 0, 1, 0, 0]);
        editor.set_selection(Selection::create(anchor, 2, focus, 3));
        delete_selection(&mut editor).unwrap();

        let section = &editor.document().body().children()[0];
        assert_eq!(section.children().len(), 1);
        assert_eq!(section.children()[0].raw_text(), "Held");
        assert!(editor.selection().is_collapsed());
        assert_eq!(editor.selection().anchor.offset, 2);
    }

    #[test]
    fn delete_within_same_leaf_collapses_to_start() {
        let mut editor = two_paragraph_editor("Hello", "");
        let path = Path::from_indices(vec![0, 0, 0, 0, 0]);
        editor.set_selection(Selection::create(path.clone(), 1, path, 3));
        delete_selection(&mut editor).unwrap();
        assert_eq!(
            editor.document().body().children()[0].children()[0].raw_text(),
            "Hlo"
        );
        assert_eq!(editor.selection().anchor.offset, 1);
    }
}
