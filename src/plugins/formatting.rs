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

//! Character formatting toggles (SPEC_FULL.md §4.4.2).
//!
//! Grounded on the majority-rule toggle pattern in
//! `automerge_model/formatting.rs`, with the "split partial runs first"
//! step following the capture-then-mutate style of the `tyrchen-md-editor`
//! `Command` implementations.

use crate::editor::selection::{paragraph_path, run_path, Selection};
use crate::editor::Editor;
use crate::error::ModelError;
use crate::model::node::new;
use crate::model::properties::RunProperties;
use crate::model::{Path, Point, Properties};
use crate::operations::Op;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleFlag {
    Bold,
    Italic,
    Underline,
    Strikethrough,
}

fn get_flag(p: &RunProperties, flag: ToggleFlag) -> bool {
    match flag {
        ToggleFlag::Bold => p.bold.unwrap_or(false),
        ToggleFlag::Italic => p.italic.unwrap_or(false),
        ToggleFlag::Underline => {
            !matches!(p.underline, None | Some(crate::model::properties::UnderlineStyle::None))
        }
        ToggleFlag::Strikethrough => p.strikethrough.unwrap_or(false),
    }
}

fn set_flag(p: &mut RunProperties, flag: ToggleFlag, value: bool) {
    match flag {
        ToggleFlag::Bold => p.bold = Some(value),
        ToggleFlag::Italic => p.italic = Some(value),
        ToggleFlag::Underline => {
            p.underline = Some(if value {
                crate::model::properties::UnderlineStyle::Single
            } else {
                crate::model::properties::UnderlineStyle::None
            })
        }
        ToggleFlag::Strikethrough => p.strikethrough = Some(value),
    }
}

/// Collect the paths of every run touching the current selection (or the
/// cursor's own run if collapsed).
pub(crate) fn selected_run_paths(editor: &Editor) -> Result<Vec<Path>, ModelError> {
    let sel = editor.selection().normalize();
    if sel.is_collapsed() {
        return Ok(vec![run_path(&sel.anchor)]);
    }
    let start_para = paragraph_path(&sel.anchor);
    let end_para = paragraph_path(&sel.focus);
    let mut out = Vec::new();
    if start_para == end_para {
        let start_idx = run_path(&sel.anchor).index_in_parent().unwrap_or(0);
        let end_idx = run_path(&sel.focus).index_in_parent().unwrap_or(0);
        for idx in start_idx..=end_idx {
            out.push(start_para.child(idx));
        }
        return Ok(out);
    }
    let section = start_para.parent().ok_or(ModelError::PathInvalid(start_para.clone()))?;
    let start_para_idx = start_para.index_in_parent().unwrap_or(0);
    let end_para_idx = end_para.index_in_parent().unwrap_or(0);
    for para_idx in start_para_idx..=end_para_idx {
        let para_path = section.child(para_idx);
        let para = editor.document().lookup_element(&para_path)?;
        let (from, to) = if para_idx == start_para_idx {
            (run_path(&sel.anchor).index_in_parent().unwrap_or(0), para.children.len() - 1)
        } else if para_idx == end_para_idx {
            (0, run_path(&sel.focus).index_in_parent().unwrap_or(0))
        } else {
            (0, para.children.len().saturating_sub(1))
        };
        for idx in from..=to {
            out.push(para_path.child(idx));
        }
    }
    Ok(out)
}

/// Split the run containing `point` at its character offset, if that offset
/// falls strictly inside the run rather than already at one of its
/// boundaries. Returns whether a split was actually performed.
fn split_run_at(editor: &mut Editor, point: &Point) -> Result<bool, ModelError> {
    let run_p = run_path(point);
    let text_idx = point.path.index_in_parent().unwrap_or(0);
    let text = editor.document().lookup_text(&point.path)?.to_string();
    let text_len = text.chars().count();

    let split_position = if point.offset == 0 {
        text_idx
    } else if point.offset == text_len {
        text_idx + 1
    } else {
        let tail: String = text.chars().skip(point.offset).collect();
        editor.apply(Op::DeleteText {
            path: point.path.clone(),
            offset: point.offset,
            text: tail.clone(),
        })?;
        editor.apply(Op::InsertNode {
            path: run_p.child(text_idx + 1),
            node: new::text(tail),
        })?;
        text_idx + 1
    };

    let run_len = editor.document().lookup_node(&run_p)?.children().len();
    if split_position == 0 || split_position == run_len {
        return Ok(false);
    }
    editor.apply(Op::SplitNode {
        path: run_p.clone(),
        position: split_position,
        properties: editor.document().lookup_node(&run_p)?.properties().clone(),
    })?;
    Ok(true)
}

/// Split the runs at the selection's exact character boundaries, per
/// §4.4.2 ("partial runs are `split_node`-ed first so the flag applies to
/// exactly the selected characters"), then return the paths of exactly the
/// runs the selection now covers. A collapsed selection's own run is
/// returned unsplit.
pub(crate) fn split_selected_runs(editor: &mut Editor) -> Result<Vec<Path>, ModelError> {
    let sel = editor.selection().normalize();
    if sel.is_collapsed() {
        return Ok(vec![run_path(&sel.anchor)]);
    }

    let anchor_para = paragraph_path(&sel.anchor);
    let focus_para = paragraph_path(&sel.focus);
    let anchor_run_idx = run_path(&sel.anchor).index_in_parent().unwrap_or(0);
    let focus_run_idx = run_path(&sel.focus).index_in_parent().unwrap_or(0);
    let same_paragraph = anchor_para == focus_para;

    editor.batch(|editor| {
        // Split at focus first: it sits later in document order, so
        // splitting it can't shift the anchor's still-unvisited path.
        split_run_at(editor, &sel.focus)?;
        let did_anchor_split = split_run_at(editor, &sel.anchor)?;

        let start_idx = anchor_run_idx + usize::from(did_anchor_split);
        let end_idx = if same_paragraph && did_anchor_split && anchor_run_idx <= focus_run_idx {
            // The anchor split inserted a new run before this position.
            focus_run_idx + 1
        } else {
            focus_run_idx
        };

        let new_anchor = anchor_para.child(start_idx).child(0).child(0);
        let new_focus = focus_para.child(end_idx).child(0).child(0);
        editor.set_selection(Selection::create(new_anchor, 0, new_focus, 0));
        Ok(())
    })?;

    selected_run_paths(editor)
}

/// Toggle `flag` across every run touching the selection: majority rule —
/// if every touched run already has it set, clear all; otherwise set all.
pub fn toggle(editor: &mut Editor, flag: ToggleFlag) -> Result<(), ModelError> {
    editor.batch(|editor| {
        let run_paths = split_selected_runs(editor)?;
        if run_paths.is_empty() {
            return Ok(());
        }
        let all_set = run_paths.iter().all(|p| {
            editor
                .document()
                .lookup_node(p)
                .ok()
                .and_then(|n| n.properties().as_run())
                .map(|rp| get_flag(rp, flag))
                .unwrap_or(false)
        });
        let new_value = !all_set;

        for run_path in run_paths {
            let node = editor.document().lookup_node(&run_path)?;
            let old = node.properties().clone();
            let mut new_rp = old.as_run().cloned().unwrap_or_default();
            set_flag(&mut new_rp, flag, new_value);
            editor.apply(Op::SetProperties {
                path: run_path,
                properties: Properties::Run(new_rp),
                old_properties: old,
            })?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::editor::selection::Selection;
    use crate::editor::EditorConfig;
    use crate::model::node::new;
    use crate::model::Document;

    fn one_run_editor(text: &str) -> Editor {
        let section = new::section(
            vec![new::paragraph(vec![new::plain_run(text)], Default::default())],
            Default::default(),
        );
        let doc = Document::with_root(new::document(new::body(vec![section])));
        Editor::new(doc, EditorConfig::default())
    }

    #[test]
    fn toggle_bold_sets_then_clears() {
        let mut editor = one_run_editor("Bold");
        let path = Path::from_indices(vec![0, 0, 0, 0, 0]);
        editor.set_selection(Selection::create(path.clone(), 0, path.clone(), 4));
        toggle(&mut editor, ToggleFlag::Bold).unwrap();
        let run = editor
            .document()
            .lookup_node(&Path::from_indices(vec![0, 0, 0, 0]))
            .unwrap();
        assert_eq!(run.properties().as_run().unwrap().bold, Some(true));

        toggle(&mut editor, ToggleFlag::Bold).unwrap();
        let run = editor
            .document()
            .lookup_node(&Path::from_indices(vec![0, 0, 0, 0]))
            .unwrap();
        assert_eq!(run.properties().as_run().unwrap().bold, Some(false));
    }

    #[test]
    fn toggle_bold_splits_partial_run() {
        let mut editor = one_run_editor("abcdef");
        let path = Path::from_indices(vec![0, 0, 0, 0, 0]);
        editor.set_selection(Selection::create(path.clone(), 1, path, 3));
        toggle(&mut editor, ToggleFlag::Bold).unwrap();

        let paragraph = &editor.document().body().children()[0].children()[0];
        assert_eq!(paragraph.children().len(), 3);
        assert_eq!(paragraph.children()[0].raw_text(), "a");
        assert_eq!(paragraph.children()[1].raw_text(), "bc");
        assert_eq!(paragraph.children()[2].raw_text(), "def");
        assert_eq!(paragraph.children()[0].properties().as_run().unwrap().bold, None);
        assert_eq!(paragraph.children()[1].properties().as_run().unwrap().bold, Some(true));
        assert_eq!(paragraph.children()[2].properties().as_run().unwrap().bold, None);
    }
}
