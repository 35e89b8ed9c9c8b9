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

//! Paragraph/character style application (SPEC_FULL.md §4.4.6 — added to
//! supplement the distilled spec's styles registry with an operation
//! surface). Grounded on the same split-then-set pattern as
//! `plugins::formatting`.

use crate::editor::Editor;
use crate::error::ModelError;
use crate::model::Properties;
use crate::operations::Op;
use crate::plugins::formatting::split_selected_runs;
use crate::plugins::list::touched_paragraph_paths;

pub fn apply_paragraph_style(editor: &mut Editor, style_id: &str) -> Result<(), ModelError> {
    let paragraphs = touched_paragraph_paths(editor)?;
    editor.batch(|editor| {
        for path in paragraphs {
            let node = editor.document().lookup_node(&path)?;
            let old = node.properties().clone();
            let mut pp = old.as_paragraph().cloned().unwrap_or_default();
            pp.style_id = Some(style_id.to_string());
            editor.apply(Op::SetProperties {
                path,
                properties: Properties::Paragraph(pp),
                old_properties: old,
            })?;
        }
        Ok(())
    })
}

/// Apply `style_id` to every run touching the selection. Per §4.4.6, this
/// first performs the same run-splitting as §4.4.2 so the style applies to
/// exactly the selected characters, not whole runs it merely overlaps.
pub fn apply_character_style(editor: &mut Editor, style_id: &str) -> Result<(), ModelError> {
    editor.batch(|editor| {
        let runs = split_selected_runs(editor)?;
        for path in runs {
            let node = editor.document().lookup_node(&path)?;
            let old = node.properties().clone();
            let mut rp = old.as_run().cloned().unwrap_or_default();
            rp.style_id = Some(style_id.to_string());
            editor.apply(Op::SetProperties {
                path,
                properties: Properties::Run(rp),
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
    use crate::model::{Document, Path};

    #[test]
    fn apply_paragraph_style_sets_style_id() {
        let section = new::section(
            vec![new::paragraph(vec![new::plain_run("x")], Default::default())],
            Default::default(),
        );
        let doc = Document::with_root(new::document(new::body(vec![section])));
        let mut editor = Editor::new(doc, EditorConfig::default());
        let path = Path::from_indices(vec![0, 0, 0, 0, 0]);
        editor.set_selection(Selection::collapse(path, 0));
        apply_paragraph_style(&mut editor, "Heading1").unwrap();
        let para = editor
            .document()
            .lookup_node(&Path::from_indices(vec![0, 0, 0]))
            .unwrap();
        assert_eq!(
            para.properties().as_paragraph().unwrap().style_id.as_deref(),
            Some("Heading1")
        );
    }

    #[test]
    fn apply_character_style_splits_partial_run() {
        let section = new::section(
            vec![new::paragraph(vec![new::plain_run("abcdef")], Default::default())],
            Default::default(),
        );
        let doc = Document::with_root(new::document(new::body(vec![section])));
        let mut editor = Editor::new(doc, EditorConfig::default());
        let path = Path::from_indices(vec![0, 0, 0, 0, 0]);
        editor.set_selection(Selection::create(path.clone(), 1, path, 3));
        apply_character_style(&mut editor, "Emphasis").unwrap();

        let paragraph = &editor.document().body().children()[0].children()[0];
        assert_eq!(paragraph.children().len(), 3);
        assert_eq!(paragraph.children()[1].raw_text(), "bc");
        assert_eq!(
            paragraph.children()[1].properties().as_run().unwrap().style_id.as_deref(),
            Some("Emphasis")
        );
        assert_eq!(paragraph.children()[0].properties().as_run().unwrap().style_id, None);
        assert_eq!(paragraph.children()[2].properties().as_run().unwrap().style_id, None);
    }
}
