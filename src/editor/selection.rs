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

//! Selection management (SPEC_FULL.md §4.2).
//!
//! Grounded on `composer_model/selection.rs` and `dom/find_range.rs`: a
//! selection is an anchor/focus pair of `Point`s, normalized so the anchor
//! precedes the focus in document order.

use crate::model::{Document, Path, Point};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
}

impl Selection {
    pub fn collapse(path: Path, offset: usize) -> Self {
        let point = Point::new(path, offset);
        Selection {
            anchor: point.clone(),
            focus: point,
        }
    }

    pub fn create(anchor_path: Path, anchor_offset: usize, focus_path: Path, focus_offset: usize) -> Self {
        Selection {
            anchor: Point::new(anchor_path, anchor_offset),
            focus: Point::new(focus_path, focus_offset),
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Swap endpoints if the selection runs backward in document order.
    pub fn normalize(&self) -> Selection {
        if self.anchor <= self.focus {
            self.clone()
        } else {
            Selection {
                anchor: self.focus.clone(),
                focus: self.anchor.clone(),
            }
        }
    }

    pub fn start(&self) -> &Point {
        if self.anchor <= self.focus {
            &self.anchor
        } else {
            &self.focus
        }
    }

    pub fn end(&self) -> &Point {
        if self.anchor <= self.focus {
            &self.focus
        } else {
            &self.anchor
        }
    }

    /// Text across paragraphs between `start` and `end`, joined with `\n`
    /// at each paragraph boundary crossed.
    pub fn get_selected_text(&self, doc: &Document) -> String {
        if self.is_collapsed() {
            return String::new();
        }
        let norm = self.normalize();
        collect_text_between(doc, norm.start(), norm.end())
    }
}

fn collect_text_between(doc: &Document, start: &Point, end: &Point) -> String {
    let start_para = paragraph_path(start);
    let end_para = paragraph_path(end);

    if start_para == end_para {
        let text = doc.lookup_text(&start.path).unwrap_or("");
        if start.path == end.path {
            return slice_chars(text, start.offset, end.offset);
        }
        // different runs within the same paragraph: walk the paragraph's
        // text leaves between the two paths.
        return collect_within_paragraph(doc, &start_para, start, end);
    }

    let mut out = String::new();
    out.push_str(&collect_within_paragraph(
        doc,
        &start_para,
        start,
        &paragraph_end_point(doc, &start_para),
    ));
    out.push('\n');

    if let (Some(s0), Some(e0)) = (start_para.index_in_parent(), end_para.index_in_parent()) {
        if let Some(section_path) = start_para.parent() {
            if let Ok(section) = doc.lookup_element(&section_path) {
                for i in (s0 + 1)..e0 {
                    if let Some(block) = section.children.get(i) {
                        out.push_str(&block.raw_text());
                        out.push('\n');
                    }
                }
            }
        }
    }

    out.push_str(&collect_within_paragraph(
        doc,
        &end_para,
        &paragraph_start_point(doc, &end_para),
        end,
    ));
    out
}

/// The path to the paragraph owning the run/text leaf addressed by `point`:
/// strip the trailing (run, text) indices.
pub fn paragraph_path(point: &Point) -> Path {
    let indices = point.path.indices();
    let cut = indices.len().saturating_sub(2);
    Path::from_indices(indices[..cut].to_vec())
}

/// The path to the run owning the text leaf addressed by `point`.
pub fn run_path(point: &Point) -> Path {
    let indices = point.path.indices();
    let cut = indices.len().saturating_sub(1);
    Path::from_indices(indices[..cut].to_vec())
}

fn paragraph_start_point(doc: &Document, paragraph: &Path) -> Point {
    let first_text = doc
        .first_text_path_under(paragraph)
        .unwrap_or_else(|_| paragraph.clone());
    Point::new(first_text, 0)
}

fn paragraph_end_point(doc: &Document, paragraph: &Path) -> Point {
    if let Ok(node) = doc.lookup_element(paragraph) {
        if let Some(last_run_idx) = node.children.len().checked_sub(1) {
            let run_path = paragraph.child(last_run_idx);
            if let Ok(run) = doc.lookup_element(&run_path) {
                if let Some(last_text_idx) = run.children.len().checked_sub(1) {
                    let text_path = run_path.child(last_text_idx);
                    let len = doc.lookup_text(&text_path).map(|s| s.chars().count()).unwrap_or(0);
                    return Point::new(text_path, len);
                }
            }
        }
    }
    Point::new(paragraph.clone(), 0)
}

fn collect_within_paragraph(doc: &Document, paragraph: &Path, start: &Point, end: &Point) -> String {
    let node = match doc.lookup_element(paragraph) {
        Ok(n) => n,
        Err(_) => return String::new(),
    };
    let mut out = String::new();
    for (run_idx, run) in node.children.iter().enumerate() {
        let run_path = paragraph.child(run_idx);
        for (text_idx, text_node) in run.children().iter().enumerate() {
            let text_path = run_path.child(text_idx);
            if let Some(text) = text_node.text() {
                let len = text.chars().count();
                let s = if text_path == start.path {
                    start.offset
                } else if text_path < start.path {
                    continue;
                } else {
                    0
                };
                let e = if text_path == end.path {
                    end.offset
                } else if text_path > end.path {
                    continue;
                } else {
                    len
                };
                out.push_str(&slice_chars(text, s, e.min(len)));
            }
        }
    }
    out
}

fn slice_chars(s: &str, start: usize, end: usize) -> String {
    s.chars().skip(start).take(end.saturating_sub(start)).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::node::new;

    fn doc_with_two_paragraphs(a: &str, b: &str) -> Document {
        let section = new::section(
            vec![
                new::paragraph(vec![new::plain_run(a)], Default::default()),
                new::paragraph(vec![new::plain_run(b)], Default::default()),
            ],
            Default::default(),
        );
        Document::with_root(new::document(new::body(vec![section])))
    }

    #[test]
    fn collapsed_selection_has_no_text() {
        let doc = doc_with_two_paragraphs("Hello", "World");
        let p = Point::new(Path::from_indices(vec![0, 0, 0, 0, 0]), 2);
        let sel = Selection::collapse(p.path.clone(), p.offset);
        assert_eq!(sel.get_selected_text(&doc), "");
    }

    #[test]
    fn cross_paragraph_selection_joins_with_newline() {
        let doc = doc_with_two_paragraphs("Hello", "World");
        let anchor = Path::from_indices(vec![0, 0, 0, 0, 0]);
        let focus = Path::from_indices(vec![0, 0, 1, 0, 0]);
        let sel = Selection::create(anchor, 2, focus, 3);
        assert_eq!(sel.get_selected_text(&doc), "llo\nWor");
    }

    #[test]
    fn normalize_swaps_backward_selection() {
        let a = Point::new(Path::from_indices(vec![0, 0, 1, 0, 0]), 0);
        let b = Point::new(Path::from_indices(vec![0, 0, 0, 0, 0]), 0);
        let sel = Selection {
            anchor: a.clone(),
            focus: b.clone(),
        };
        let norm = sel.normalize();
        assert_eq!(norm.anchor, b);
        assert_eq!(norm.focus, a);
    }
}
