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

//! The document value: a root node plus its registries.
//!
//! Grounded on `Dom<S>` in the teacher's `dom/dom_struct.rs`: a thin wrapper
//! around a root container with handle-based lookup helpers. `lookup_node`
//! here returns a `Result` at the public boundary rather than the teacher's
//! internal panic-on-invalid-handle, since paths in this crate can be
//! supplied by a caller rather than only ever constructed internally.

use crate::error::{ModelError, ModelResult};
use crate::model::node::{new, ElementNode, Node};
use crate::model::path::Path;
use crate::model::registries::{
    CommentsRegistry, HeadersFootersRegistry, MediaRegistry, Metadata, NotesRegistry,
    NumberingRegistry, StylesRegistry,
};
use crate::model::tag::Tag;

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Node,
    pub styles: StylesRegistry,
    pub numbering: NumberingRegistry,
    pub headers_footers: HeadersFootersRegistry,
    pub media: MediaRegistry,
    pub comments: CommentsRegistry,
    pub footnotes: NotesRegistry,
    pub endnotes: NotesRegistry,
    pub metadata: Metadata,
}

impl Document {
    /// A document with a single section and a single empty paragraph.
    pub fn empty() -> Self {
        let section = new::section(
            vec![new::empty_paragraph()],
            crate::model::properties::SectionProperties::default(),
        );
        Document {
            root: new::document(new::body(vec![section])),
            styles: StylesRegistry::new(),
            numbering: NumberingRegistry::new(),
            headers_footers: HeadersFootersRegistry::default(),
            media: MediaRegistry::default(),
            comments: CommentsRegistry::default(),
            footnotes: NotesRegistry::default(),
            endnotes: NotesRegistry::default(),
            metadata: Metadata::default(),
        }
    }

    pub fn with_root(root: Node) -> Self {
        let mut doc = Document::empty();
        doc.root = root;
        doc
    }

    pub fn body(&self) -> &Node {
        &self.root.children()[0]
    }

    /// Resolve `path` to a node reference, per §3's path-addressing model.
    pub fn lookup_node(&self, path: &Path) -> ModelResult<&Node> {
        let mut node = &self.root;
        for &index in path.indices() {
            let children = node.children();
            node = children
                .get(index)
                .ok_or_else(|| ModelError::PathInvalid(path.clone()))?;
        }
        Ok(node)
    }

    pub fn lookup_node_mut(&mut self, path: &Path) -> ModelResult<&mut Node> {
        let mut node = &mut self.root;
        for &index in path.indices() {
            node = match node {
                Node::Element(e) => e
                    .children
                    .get_mut(index)
                    .ok_or_else(|| ModelError::PathInvalid(path.clone()))?,
                Node::Leaf(_) => return Err(ModelError::PathInvalid(path.clone())),
            };
        }
        Ok(node)
    }

    pub fn lookup_element(&self, path: &Path) -> ModelResult<&ElementNode> {
        self.lookup_node(path)?
            .as_element()
            .ok_or_else(|| ModelError::TypeMismatch {
                path: path.clone(),
                expected: "element",
                actual: "leaf",
            })
    }

    pub fn lookup_element_mut(&mut self, path: &Path) -> ModelResult<&mut ElementNode> {
        let tag_name = {
            let n = self.lookup_node(path)?;
            n.tag()
        };
        self.lookup_node_mut(path)?
            .as_element_mut()
            .ok_or(ModelError::TypeMismatch {
                path: path.clone(),
                expected: "element",
                actual: tag_name_str(tag_name),
            })
    }

    /// Resolve a `Point` to the text content and length it addresses.
    pub fn lookup_text(&self, path: &Path) -> ModelResult<&str> {
        let node = self.lookup_node(path)?;
        node.text().ok_or_else(|| ModelError::TypeMismatch {
            path: path.clone(),
            expected: "text",
            actual: tag_name_str(node.tag()),
        })
    }

    /// Path to the parent element and the index of `path` within it.
    pub fn parent_and_index(&self, path: &Path) -> ModelResult<(Path, usize)> {
        let parent = path
            .parent()
            .ok_or_else(|| ModelError::PathInvalid(path.clone()))?;
        let index = path
            .index_in_parent()
            .ok_or_else(|| ModelError::PathInvalid(path.clone()))?;
        Ok((parent, index))
    }

    /// The first paragraph path reachable under `path` (including `path`
    /// itself if it is already a paragraph), used to seed a fresh cursor.
    pub fn first_text_path_under(&self, path: &Path) -> ModelResult<Path> {
        let node = self.lookup_node(path)?;
        if node.is_text() {
            return Ok(path.clone());
        }
        for (i, child) in node.children().iter().enumerate() {
            let child_path = path.child(i);
            if let Ok(p) = self.first_text_path_under(&child_path) {
                return Ok(p);
            }
            let _ = child;
        }
        Err(ModelError::PathInvalid(path.clone()))
    }

    pub fn sections(&self) -> Vec<&Node> {
        self.body().children().iter().collect()
    }

    pub fn document_tag(&self) -> Tag {
        self.root.tag()
    }
}

fn tag_name_str(tag: Tag) -> &'static str {
    match tag {
        Tag::Document => "document",
        Tag::Body => "body",
        Tag::Section => "section",
        Tag::Paragraph => "paragraph",
        Tag::Table => "table",
        Tag::TableRow => "table-row",
        Tag::TableCell => "table-cell",
        Tag::Run => "run",
        Tag::Hyperlink => "hyperlink",
        Tag::Drawing => "drawing",
        Tag::ShapeGroup => "shape-group",
        Tag::Text => "text",
        Tag::LineBreak => "line-break",
        Tag::ColumnBreak => "column-break",
        Tag::Tab => "tab",
        Tag::BookmarkStart => "bookmark-start",
        Tag::BookmarkEnd => "bookmark-end",
        Tag::CommentRangeStart => "comment-range-start",
        Tag::CommentRangeEnd => "comment-range-end",
        Tag::FootnoteRef => "footnote-ref",
        Tag::EndnoteRef => "endnote-ref",
        Tag::Field => "field",
        Tag::Shape => "shape",
        Tag::Equation => "equation",
        Tag::ImageLeaf => "image-leaf",
        Tag::PageBreak => "page-break",
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_document_has_one_section_one_paragraph() {
        let doc = Document::empty();
        assert_eq!(doc.sections().len(), 1);
        let section = doc.sections()[0];
        assert_eq!(section.children().len(), 1);
        assert_eq!(section.children()[0].tag(), Tag::Paragraph);
    }

    #[test]
    fn lookup_node_invalid_path_errs() {
        let doc = Document::empty();
        let bad = Path::from_indices(vec![0, 99]);
        assert!(matches!(
            doc.lookup_node(&bad),
            Err(ModelError::PathInvalid(_))
        ));
    }

    #[test]
    fn lookup_node_resolves_nested_path() {
        let doc = Document::empty();
        // document/body/section0/paragraph0
        let path = Path::from_indices(vec![0, 0, 0]);
        let node = doc.lookup_node(&path).unwrap();
        assert_eq!(node.tag(), Tag::Paragraph);
    }
}
