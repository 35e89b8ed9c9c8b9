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

//! Tree nodes.
//!
//! Grounded on `DomNode<S>` in the teacher's `dom/dom_struct.rs`: a small
//! closed enum distinguishing containers from leaves, each carrying an
//! identity. Widened here to the OOXML tag set and a typed properties
//! record instead of the teacher's chat-message-specific fields.

use crate::id::{next_id, NodeId};
use crate::model::properties::Properties;
use crate::model::tag::Tag;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(ElementNode),
    Leaf(LeafNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub id: NodeId,
    pub tag: Tag,
    pub properties: Properties,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeafNode {
    pub id: NodeId,
    pub tag: Tag,
    pub properties: Properties,
}

impl Node {
    pub fn id(&self) -> NodeId {
        match self {
            Node::Element(e) => e.id,
            Node::Leaf(l) => l.id,
        }
    }

    pub fn tag(&self) -> Tag {
        match self {
            Node::Element(e) => e.tag,
            Node::Leaf(l) => l.tag,
        }
    }

    pub fn properties(&self) -> &Properties {
        match self {
            Node::Element(e) => &e.properties,
            Node::Leaf(l) => &l.properties,
        }
    }

    pub fn properties_mut(&mut self) -> &mut Properties {
        match self {
            Node::Element(e) => &mut e.properties,
            Node::Leaf(l) => &mut l.properties,
        }
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Node::Element(e) => Some(e),
            Node::Leaf(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementNode> {
        match self {
            Node::Element(e) => Some(e),
            Node::Leaf(_) => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(e) => &e.children,
            Node::Leaf(_) => &[],
        }
    }

    pub fn is_text(&self) -> bool {
        self.tag() == Tag::Text
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Node::Leaf(l) if l.tag == Tag::Text => l.properties.as_text(),
            _ => None,
        }
    }

    pub fn text_len(&self) -> usize {
        match self {
            Node::Leaf(l) if l.tag == Tag::Text => {
                l.properties.as_text().map(|s| s.chars().count()).unwrap_or(0)
            }
            Node::Element(e) => e.children.iter().map(Node::text_len).sum(),
            _ => 0,
        }
    }

    /// Depth-first, left-to-right concatenation of every text leaf's text.
    pub fn raw_text(&self) -> String {
        let mut out = String::new();
        self.collect_raw_text(&mut out);
        out
    }

    fn collect_raw_text(&self, out: &mut String) {
        match self {
            Node::Leaf(l) if l.tag == Tag::Text => {
                if let Some(s) = l.properties.as_text() {
                    out.push_str(s);
                }
            }
            Node::Leaf(l) if l.tag == Tag::LineBreak || l.tag == Tag::Tab => {
                out.push(if l.tag == Tag::Tab { '\t' } else { '\n' });
            }
            Node::Element(e) => {
                for c in &e.children {
                    c.collect_raw_text(out);
                }
            }
            _ => {}
        }
    }
}

/// Factory helpers assigning a fresh identity, mirroring the teacher's
/// `DomNode::new_*` constructors in `dom_block_nodes.rs`.
pub mod new {
    use super::*;
    use crate::model::properties::*;

    pub fn text(content: impl Into<String>) -> Node {
        Node::Leaf(LeafNode {
            id: next_id(),
            tag: Tag::Text,
            properties: Properties::Text(content.into()),
        })
    }

    pub fn run(children: Vec<Node>, properties: RunProperties) -> Node {
        Node::Element(ElementNode {
            id: next_id(),
            tag: Tag::Run,
            properties: Properties::Run(properties),
            children,
        })
    }

    pub fn plain_run(content: impl Into<String>) -> Node {
        run(vec![text(content)], RunProperties::default())
    }

    pub fn paragraph(children: Vec<Node>, properties: ParagraphProperties) -> Node {
        Node::Element(ElementNode {
            id: next_id(),
            tag: Tag::Paragraph,
            properties: Properties::Paragraph(properties),
            children,
        })
    }

    pub fn empty_paragraph() -> Node {
        paragraph(vec![plain_run("")], ParagraphProperties::default())
    }

    pub fn section(children: Vec<Node>, properties: SectionProperties) -> Node {
        Node::Element(ElementNode {
            id: next_id(),
            tag: Tag::Section,
            properties: Properties::Section(properties),
            children,
        })
    }

    pub fn body(children: Vec<Node>) -> Node {
        Node::Element(ElementNode {
            id: next_id(),
            tag: Tag::Body,
            properties: Properties::None,
            children,
        })
    }

    pub fn document(body: Node) -> Node {
        Node::Element(ElementNode {
            id: next_id(),
            tag: Tag::Document,
            properties: Properties::None,
            children: vec![body],
        })
    }

    pub fn table_cell(children: Vec<Node>, properties: TableCellProperties) -> Node {
        Node::Element(ElementNode {
            id: next_id(),
            tag: Tag::TableCell,
            properties: Properties::TableCell(properties),
            children,
        })
    }

    pub fn table_row(cells: Vec<Node>) -> Node {
        Node::Element(ElementNode {
            id: next_id(),
            tag: Tag::TableRow,
            properties: Properties::None,
            children: cells,
        })
    }

    pub fn table(rows: Vec<Node>, properties: TableProperties) -> Node {
        Node::Element(ElementNode {
            id: next_id(),
            tag: Tag::Table,
            properties: Properties::Table(properties),
            children: rows,
        })
    }

    pub fn hyperlink(children: Vec<Node>, target: impl Into<String>, is_external: bool) -> Node {
        Node::Element(ElementNode {
            id: next_id(),
            tag: Tag::Hyperlink,
            properties: Properties::Hyperlink {
                target: target.into(),
                is_external,
            },
            children,
        })
    }

    pub fn line_break() -> Node {
        Node::Leaf(LeafNode {
            id: next_id(),
            tag: Tag::LineBreak,
            properties: Properties::None,
        })
    }

    pub fn tab() -> Node {
        Node::Leaf(LeafNode {
            id: next_id(),
            tag: Tag::Tab,
            properties: Properties::None,
        })
    }

    pub fn drawing(properties: DrawingProperties) -> Node {
        Node::Leaf(LeafNode {
            id: next_id(),
            tag: Tag::Drawing,
            properties: Properties::Drawing(properties),
        })
    }

    fn extra_leaf(tag: Tag, key: &str, value: String) -> Node {
        let mut extra = std::collections::BTreeMap::new();
        extra.insert(key.to_string(), value);
        Node::Leaf(LeafNode {
            id: next_id(),
            tag,
            properties: Properties::Extra(extra),
        })
    }

    pub fn comment_range_start(comment_id: u32) -> Node {
        extra_leaf(Tag::CommentRangeStart, "id", comment_id.to_string())
    }

    pub fn comment_range_end(comment_id: u32) -> Node {
        extra_leaf(Tag::CommentRangeEnd, "id", comment_id.to_string())
    }

    pub fn footnote_ref(note_id: i32) -> Node {
        extra_leaf(Tag::FootnoteRef, "id", note_id.to_string())
    }

    pub fn endnote_ref(note_id: i32) -> Node {
        extra_leaf(Tag::EndnoteRef, "id", note_id.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn raw_text_concatenates_runs() {
        let p = new::paragraph(
            vec![new::plain_run("Hello "), new::plain_run("World")],
            Default::default(),
        );
        assert_eq!(p.raw_text(), "Hello World");
    }

    #[test]
    fn text_len_counts_chars_not_bytes() {
        let t = new::text("héllo");
        assert_eq!(t.text_len(), 5);
    }
}
