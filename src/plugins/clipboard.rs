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

//! Clipboard copy/paste (SPEC_FULL.md §4.4.5).
//!
//! Grounded on `dom/parser/parse.rs`'s `HtmlParser`: a stack-based
//! recursive descent over an `html5ever` tree, dispatching per tag name,
//! degrading unknown tags rather than failing. Every pasted subtree is
//! deep-cloned with fresh identities before insertion, per §4.4.5.

use crate::editor::selection::{paragraph_path, run_path, Selection};
use crate::editor::Editor;
use crate::error::ModelError;
use crate::model::node::new;
use crate::model::{Node, Path, Properties};
use crate::operations::Op;
use crate::plugins::text::delete_selection;

/// Serialize the current selection as `(plain_text, html)`, per §4.4.5.
pub fn copy(editor: &Editor) -> (String, String) {
    let sel = editor.selection().normalize();
    let plain = sel.get_selected_text(editor.document());
    let html = html_for_selection(editor);
    (plain, html)
}

fn html_for_selection(editor: &Editor) -> String {
    let sel = editor.selection().normalize();
    let start_para = paragraph_path(&sel.anchor);
    let end_para = paragraph_path(&sel.focus);
    let section = match start_para.parent() {
        Some(p) => p,
        None => return String::new(),
    };
    let from = start_para.index_in_parent().unwrap_or(0);
    let to = end_para.index_in_parent().unwrap_or(0);
    let mut out = String::new();
    for idx in from..=to {
        let path = section.child(idx);
        if let Ok(node) = editor.document().lookup_node(&path) {
            out.push_str("<p>");
            write_inline_html(node, &mut out);
            out.push_str("</p>");
        }
    }
    out
}

fn write_inline_html(node: &Node, out: &mut String) {
    for child in node.children() {
        match child.tag() {
            crate::model::Tag::Run => {
                let rp = child.properties().as_run().cloned().unwrap_or_default();
                let text = child.raw_text();
                let escaped = html_escape::encode_text(&text);
                let mut open = String::new();
                let mut close = String::new();
                if rp.bold.unwrap_or(false) {
                    open.push_str("<strong>");
                    close.insert_str(0, "</strong>");
                }
                if rp.italic.unwrap_or(false) {
                    open.push_str("<em>");
                    close.insert_str(0, "</em>");
                }
                if rp.underline.is_some()
                    && rp.underline != Some(crate::model::properties::UnderlineStyle::None)
                {
                    open.push_str("<u>");
                    close.insert_str(0, "</u>");
                }
                if rp.strikethrough.unwrap_or(false) {
                    open.push_str("<s>");
                    close.insert_str(0, "</s>");
                }
                out.push_str(&open);
                out.push_str(&escaped);
                out.push_str(&close);
            }
            crate::model::Tag::Hyperlink => {
                if let crate::model::properties::Properties::Hyperlink { target, .. } =
                    child.properties()
                {
                    out.push_str(&format!("<a href=\"{}\">", html_escape::encode_double_quoted_attribute(target)));
                    write_inline_html(child, out);
                    out.push_str("</a>");
                }
            }
            _ => write_inline_html(child, out),
        }
    }
}

/// Parsed clipboard content: either a single run of inline text (pasted
/// inline at the cursor) or a sequence of block nodes (spliced as whole
/// paragraphs), per §4.4.5.
pub enum PastedFragment {
    Inline(Vec<Node>),
    Blocks(Vec<Node>),
}

/// Parse plain text into a fragment, splitting on `\n` into paragraphs.
pub fn parse_plain_text(text: &str) -> PastedFragment {
    if !text.contains('\n') {
        return PastedFragment::Inline(vec![new::plain_run(text)]);
    }
    let blocks = text
        .split('\n')
        .map(|line| new::paragraph(vec![new::plain_run(line)], Default::default()))
        .collect();
    PastedFragment::Blocks(blocks)
}

#[cfg(feature = "clipboard-html")]
pub fn parse_html(html: &str) -> PastedFragment {
    crate::plugins::html_import::parse_fragment(html)
}

/// Paste `fragment` at the cursor, deleting the current selection first.
pub fn paste(editor: &mut Editor, fragment: PastedFragment) -> Result<(), ModelError> {
    match fragment {
        PastedFragment::Inline(runs) => paste_inline(editor, runs),
        // A single paragraph of runs splices inline rather than opening a
        // new block, matching how a one-line plain-text paste behaves.
        PastedFragment::Blocks(mut blocks) if blocks.len() == 1 => {
            let runs = blocks.remove(0).children().to_vec();
            paste_inline(editor, runs)
        }
        PastedFragment::Blocks(blocks) => paste_blocks(editor, blocks),
    }
}

/// Splice `runs` into the paragraph at the cursor, preserving each run's own
/// formatting, per §4.4.5 step 3. The current text leaf is split at the
/// cursor offset (and its run split alongside it, if the cursor isn't
/// already at a run boundary) so the pasted runs land between the
/// surrounding text without disturbing its formatting.
fn paste_inline(editor: &mut Editor, runs: Vec<Node>) -> Result<(), ModelError> {
    editor.batch(|editor| {
        if !editor.selection().is_collapsed() {
            delete_selection(editor)?;
        }
        if runs.is_empty() {
            return Ok(());
        }
        let point = editor.selection().anchor.clone();
        let text = editor.document().lookup_text(&point.path)?.to_string();
        let tail: String = text.chars().skip(point.offset).collect();
        if !tail.is_empty() {
            editor.apply(Op::DeleteText {
                path: point.path.clone(),
                offset: point.offset,
                text: tail.clone(),
            })?;
        }
        let run_p = run_path(&point);
        let run_idx = run_p.index_in_parent().unwrap_or(0);
        let paragraph_p = run_p.parent().ok_or(ModelError::PathInvalid(run_p.clone()))?;
        if !tail.is_empty() {
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
        }

        let run_count = runs.len();
        let (last_text_idx, last_offset) = {
            let last = runs.last().expect("checked non-empty");
            let text_idx = last.children().len().saturating_sub(1);
            let offset = last
                .children()
                .get(text_idx)
                .map(|t| t.raw_text().chars().count())
                .unwrap_or(0);
            (text_idx, offset)
        };
        for (i, run) in runs.into_iter().enumerate() {
            editor.apply(Op::InsertNode {
                path: paragraph_p.child(run_idx + 1 + i),
                node: run,
            })?;
        }

        let cursor_path = paragraph_p.child(run_idx + run_count).child(last_text_idx);
        editor.set_selection(Selection::collapse(cursor_path, last_offset));
        Ok(())
    })
}

/// The (run index, text-leaf index, character length) of the last text leaf
/// under a freshly-built fragment paragraph, used to place the cursor right
/// after a pasted fragment's own content once it is spliced into the tree.
fn rightmost_text_slot(block: &Node) -> (usize, usize, usize) {
    let run_idx = block.children().len().saturating_sub(1);
    let run = block.children().get(run_idx);
    let text_idx = run.map(|r| r.children().len().saturating_sub(1)).unwrap_or(0);
    let len = run
        .and_then(|r| r.children().get(text_idx))
        .map(|t| t.raw_text().chars().count())
        .unwrap_or(0);
    (run_idx, text_idx, len)
}

/// Paste `blocks` (at least two paragraphs) at the cursor: the paragraph
/// holding the cursor is split into a head half and a tail half, the first
/// fragment paragraph is appended onto the head half, any interior
/// fragments become whole new paragraphs, and the last fragment paragraph
/// is prepended onto the tail half. Per §4.4.5 step 4 / scenario 4, pasting
/// `"x\ny"` at the end of `"hello"` yields `["hellox", "y"]`, cursor at the
/// end of the pasted `"y"`.
fn paste_blocks(editor: &mut Editor, blocks: Vec<Node>) -> Result<(), ModelError> {
    editor.batch(|editor| {
        if !editor.selection().is_collapsed() {
            delete_selection(editor)?;
        }
        let point = editor.selection().anchor.clone();

        // Split the cursor's paragraph into head/tail halves, mirroring
        // `text::split_paragraph`'s three nested `split_node`s.
        let text = editor.document().lookup_text(&point.path)?.to_string();
        let tail_text: String = text.chars().skip(point.offset).collect();
        if !tail_text.is_empty() {
            editor.apply(Op::DeleteText {
                path: point.path.clone(),
                offset: point.offset,
                text: tail_text.clone(),
            })?;
        }
        let run_p = run_path(&point);
        if !tail_text.is_empty() {
            let text_idx = point.path.index_in_parent().unwrap_or(0);
            editor.apply(Op::InsertNode {
                path: run_p.child(text_idx + 1),
                node: new::text(tail_text),
            })?;
            editor.apply(Op::SplitNode {
                path: run_p.clone(),
                position: text_idx + 1,
                properties: editor.document().lookup_node(&run_p)?.properties().clone(),
            })?;
        }
        let paragraph_p = run_p.parent().ok_or(ModelError::PathInvalid(run_p.clone()))?;
        let run_idx = run_p.index_in_parent().unwrap_or(0);
        let tail_properties = Properties::Paragraph(
            editor
                .document()
                .lookup_node(&paragraph_p)?
                .properties()
                .as_paragraph()
                .cloned()
                .unwrap_or_default(),
        );
        editor.apply(Op::SplitNode {
            path: paragraph_p.clone(),
            position: run_idx + 1,
            properties: tail_properties.clone(),
        })?;

        let section = paragraph_p.parent().ok_or(ModelError::PathInvalid(paragraph_p.clone()))?;
        let head_idx = paragraph_p.index_in_parent().unwrap_or(0);

        let mut fragments = blocks.into_iter();
        let first = fragments.next().expect("paste_blocks requires at least one block");
        let last = fragments.next_back().expect("paste_blocks requires at least two blocks");
        let middle: Vec<Node> = fragments.collect();

        // Append the first fragment onto the head half: insert it right
        // after the head, then merge it into the head (now its previous
        // sibling), so the head's own runs are followed by the fragment's.
        let first_properties = first.properties().clone();
        let head_run_count = run_idx + 1;
        editor.apply(Op::InsertNode {
            path: section.child(head_idx + 1),
            node: first,
        })?;
        editor.apply(Op::MergeNode {
            path: section.child(head_idx + 1),
            position: head_run_count,
            properties: first_properties,
        })?;

        // Insert any interior fragments as whole new paragraphs between the
        // head and the tail.
        let mut insert_idx = head_idx + 1;
        for block in middle {
            editor.apply(Op::InsertNode {
                path: section.child(insert_idx),
                node: block,
            })?;
            insert_idx += 1;
        }

        // Prepend the last fragment onto the tail half: insert it just
        // before the tail, then merge the tail into it so the fragment's
        // runs are followed by the tail's original runs.
        let (cursor_run_idx, cursor_text_idx, cursor_offset) = rightmost_text_slot(&last);
        let last_run_count = last.children().len();
        let last_para = section.child(insert_idx);
        editor.apply(Op::InsertNode {
            path: last_para.clone(),
            node: last,
        })?;
        editor.apply(Op::MergeNode {
            path: section.child(insert_idx + 1),
            position: last_run_count,
            properties: tail_properties,
        })?;

        let cursor_path = last_para.child(cursor_run_idx).child(cursor_text_idx);
        editor.set_selection(Selection::collapse(cursor_path, cursor_offset));
        Ok(())
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::editor::EditorConfig;
    use crate::model::node::new as mknew;
    use crate::model::Document;

    fn editor_with(text: &str) -> Editor {
        let section = mknew::section(
            vec![mknew::paragraph(vec![mknew::plain_run(text)], Default::default())],
            Default::default(),
        );
        let doc = Document::with_root(mknew::document(mknew::body(vec![section])));
        Editor::new(doc, EditorConfig::default())
    }

    #[test]
    fn paste_multiline_plain_text_splits_paragraphs() {
        let mut editor = editor_with("hello");
        let path = Path::from_indices(vec![0, 0, 0, 0, 0]);
        editor.set_selection(crate::editor::Selection::collapse(path, 5));
        let fragment = parse_plain_text("x\ny");
        paste(&mut editor, fragment).unwrap();

        let section = &editor.document().body().children()[0];
        assert_eq!(section.children().len(), 2);
        assert_eq!(section.children()[0].raw_text(), "hellox");
        assert_eq!(section.children()[1].raw_text(), "y");
    }

    #[test]
    fn paste_at_paragraph_end_leaves_no_dangling_empty_run() {
        let mut editor = editor_with("hello");
        let path = Path::from_indices(vec![0, 0, 0, 0, 0]);
        editor.set_selection(crate::editor::Selection::collapse(path, 5));
        let fragment = parse_plain_text("x\ny");
        paste(&mut editor, fragment).unwrap();

        let section = &editor.document().body().children()[0];
        assert_eq!(section.children()[1].children().len(), 1);
        assert_eq!(section.children()[1].raw_text(), "y");
    }

    #[test]
    fn copy_collapsed_selection_is_empty() {
        let editor = editor_with("abc");
        let (plain, _) = copy(&editor);
        assert_eq!(plain, "");
    }
}

