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

//! List toggling and indent/outdent (SPEC_FULL.md §4.4.3).
//!
//! Grounded on `composer_model/quotes.rs`'s pattern: inspect the current
//! block state, then decide set-vs-clear in one pass before mutating.

use crate::editor::selection::paragraph_path;
use crate::editor::Editor;
use crate::error::ModelError;
use crate::model::properties::Numbering;
use crate::model::{Path, Properties};
use crate::operations::Op;

pub(crate) fn touched_paragraph_paths(editor: &Editor) -> Result<Vec<Path>, ModelError> {
    let sel = editor.selection().normalize();
    let start_para = paragraph_path(&sel.anchor);
    let end_para = paragraph_path(&sel.focus);
    if start_para == end_para {
        return Ok(vec![start_para]);
    }
    let section = start_para.parent().ok_or(ModelError::PathInvalid(start_para.clone()))?;
    let from = start_para.index_in_parent().unwrap_or(0);
    let to = end_para.index_in_parent().unwrap_or(0);
    Ok((from..=to).map(|i| section.child(i)).collect())
}

fn toggle_numbering(editor: &mut Editor, num_id: u32) -> Result<(), ModelError> {
    let paragraphs = touched_paragraph_paths(editor)?;
    if paragraphs.is_empty() {
        return Ok(());
    }
    let all_already = paragraphs.iter().all(|p| {
        editor
            .document()
            .lookup_node(p)
            .ok()
            .and_then(|n| n.properties().as_paragraph())
            .and_then(|pp| pp.numbering)
            .map(|n| n.num_id == num_id)
            .unwrap_or(false)
    });

    editor.batch(|editor| {
        for path in paragraphs {
            let node = editor.document().lookup_node(&path)?;
            let old = node.properties().clone();
            let mut pp = old.as_paragraph().cloned().unwrap_or_default();
            if all_already {
                pp.numbering = None;
            } else {
                let level = pp.numbering.map(|n| n.level).unwrap_or(0);
                pp.numbering = Some(Numbering { num_id, level });
                pp.style_id = Some("ListParagraph".to_string());
            }
            editor.apply(Op::SetProperties {
                path,
                properties: Properties::Paragraph(pp),
                old_properties: old,
            })?;
        }
        Ok(())
    })
}

pub fn toggle_bullet(editor: &mut Editor) -> Result<(), ModelError> {
    let num_id = editor.config().default_list_num_ids.0;
    toggle_numbering(editor, num_id)
}

pub fn toggle_numbered(editor: &mut Editor) -> Result<(), ModelError> {
    let num_id = editor.config().default_list_num_ids.1;
    toggle_numbering(editor, num_id)
}

fn bump_level(editor: &mut Editor, delta: i8) -> Result<(), ModelError> {
    let paragraphs = touched_paragraph_paths(editor)?;
    editor.batch(|editor| {
        for path in paragraphs {
            let node = editor.document().lookup_node(&path)?;
            let old = node.properties().clone();
            let mut pp = old.as_paragraph().cloned().unwrap_or_default();
            if let Some(mut numbering) = pp.numbering {
                let new_level = numbering.level as i16 + delta as i16;
                if new_level < 0 {
                    pp.numbering = None;
                } else {
                    numbering.level = new_level.min(8) as u8;
                    pp.numbering = Some(numbering);
                }
                editor.apply(Op::SetProperties {
                    path,
                    properties: Properties::Paragraph(pp),
                    old_properties: old,
                })?;
            }
        }
        Ok(())
    })
}

pub fn indent(editor: &mut Editor) -> Result<(), ModelError> {
    bump_level(editor, 1)
}

pub fn outdent(editor: &mut Editor) -> Result<(), ModelError> {
    bump_level(editor, -1)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::editor::selection::Selection;
    use crate::editor::EditorConfig;
    use crate::model::node::new;
    use crate::model::Document;

    fn editor_with_paragraph() -> Editor {
        let section = new::section(
            vec![new::paragraph(vec![new::plain_run("item")], Default::default())],
            Default::default(),
        );
        let doc = Document::with_root(new::document(new::body(vec![section])));
        Editor::new(doc, EditorConfig::default())
    }

    #[test]
    fn toggle_bullet_sets_then_clears() {
        let mut editor = editor_with_paragraph();
        let path = Path::from_indices(vec![0, 0, 0, 0, 0]);
        editor.set_selection(Selection::collapse(path, 0));
        toggle_bullet(&mut editor).unwrap();
        let para = editor
            .document()
            .lookup_node(&Path::from_indices(vec![0, 0, 0]))
            .unwrap();
        assert_eq!(
            para.properties().as_paragraph().unwrap().numbering,
            Some(Numbering { num_id: 1, level: 0 })
        );
        toggle_bullet(&mut editor).unwrap();
        let para = editor
            .document()
            .lookup_node(&Path::from_indices(vec![0, 0, 0]))
            .unwrap();
        assert_eq!(para.properties().as_paragraph().unwrap().numbering, None);
    }

    #[test]
    fn outdent_below_zero_clears_numbering() {
        let mut editor = editor_with_paragraph();
        let path = Path::from_indices(vec![0, 0, 0, 0, 0]);
        editor.set_selection(Selection::collapse(path, 0));
        toggle_bullet(&mut editor).unwrap();
        outdent(&mut editor).unwrap();
        let para = editor
            .document()
            .lookup_node(&Path::from_indices(vec![0, 0, 0]))
            .unwrap();
        assert_eq!(para.properties().as_paragraph().unwrap().numbering, None);
    }
}
