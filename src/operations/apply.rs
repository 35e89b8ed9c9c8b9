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

//! Pure `apply` semantics: `(doc, op) -> doc'`.
//!
//! Grounded on `insert_into_text` in the teacher's `dom/dom_struct.rs` for
//! the text-splice behavior and on the `tyrchen-md-editor` `Command::execute`
//! pattern for node insert/remove/split/merge. The document is cloned before
//! mutation rather than path-copied node-by-node: correctness first, matching
//! the "document values are immutable" contract at the type level (the
//! caller's `&Document` is never touched) without the bookkeeping of partial
//! structural sharing.

use crate::error::{ModelError, ModelResult};
use crate::model::node::{ElementNode, LeafNode, Node};
use crate::model::{Document, Path, Properties};
use crate::operations::op::{Batch, Op};

pub fn apply(doc: &Document, op: &Op) -> ModelResult<Document> {
    let mut next = doc.clone();
    apply_in_place(&mut next, op)?;
    Ok(next)
}

pub fn apply_batch(doc: &Document, batch: &Batch) -> ModelResult<Document> {
    let mut next = doc.clone();
    for op in batch.ops() {
        apply_in_place(&mut next, op)?;
    }
    Ok(next)
}

fn apply_in_place(doc: &mut Document, op: &Op) -> ModelResult<()> {
    match op {
        Op::InsertText { path, offset, text } => insert_text(doc, path, *offset, text),
        Op::DeleteText { path, offset, text } => delete_text(doc, path, *offset, text),
        Op::InsertNode { path, node } => insert_node(doc, path, node.clone()),
        Op::RemoveNode { path, node } => remove_node(doc, path, node),
        Op::SplitNode {
            path,
            position,
            properties,
        } => split_node(doc, path, *position, properties),
        Op::MergeNode {
            path,
            position,
            properties,
        } => merge_node(doc, path, *position, properties),
        Op::SetProperties {
            path, properties, ..
        } => set_properties(doc, path, properties),
    }
}

fn text_leaf_mut<'a>(doc: &'a mut Document, path: &Path) -> ModelResult<&'a mut String> {
    let node = doc.lookup_node_mut(path)?;
    match node {
        Node::Leaf(LeafNode {
            properties: Properties::Text(s),
            ..
        }) => Ok(s),
        other => Err(ModelError::TypeMismatch {
            path: path.clone(),
            expected: "text",
            actual: tag_str(other),
        }),
    }
}

fn tag_str(node: &Node) -> &'static str {
    if node.is_text() {
        "text"
    } else {
        "non-text"
    }
}

fn char_boundary(s: &str, char_offset: usize) -> usize {
    s.char_indices()
        .map(|(b, _)| b)
        .chain(std::iter::once(s.len()))
        .nth(char_offset)
        .unwrap_or(s.len())
}

fn insert_text(doc: &mut Document, path: &Path, offset: usize, text: &str) -> ModelResult<()> {
    let leaf = text_leaf_mut(doc, path)?;
    let len = leaf.chars().count();
    if offset > len {
        return Err(ModelError::OffsetOutOfRange {
            path: path.clone(),
            offset,
            len,
        });
    }
    let byte_offset = char_boundary(leaf, offset);
    leaf.insert_str(byte_offset, text);
    Ok(())
}

fn delete_text(doc: &mut Document, path: &Path, offset: usize, text: &str) -> ModelResult<()> {
    let leaf = text_leaf_mut(doc, path)?;
    let len = leaf.chars().count();
    let del_len = text.chars().count();
    if offset + del_len > len {
        return Err(ModelError::OffsetOutOfRange {
            path: path.clone(),
            offset,
            len,
        });
    }
    let start = char_boundary(leaf, offset);
    let end = char_boundary(leaf, offset + del_len);
    leaf.replace_range(start..end, "");
    Ok(())
}

fn insert_node(doc: &mut Document, path: &Path, node: Node) -> ModelResult<()> {
    let (parent_path, index) = doc.parent_and_index(path)?;
    let parent = doc.lookup_element_mut(&parent_path)?;
    if index > parent.children.len() {
        return Err(ModelError::PathInvalid(path.clone()));
    }
    parent.children.insert(index, node);
    Ok(())
}

fn remove_node(doc: &mut Document, path: &Path, expected: &Node) -> ModelResult<()> {
    let (parent_path, index) = doc.parent_and_index(path)?;
    let parent = doc.lookup_element_mut(&parent_path)?;
    if index >= parent.children.len() {
        return Err(ModelError::PathInvalid(path.clone()));
    }
    if parent.children[index].id() != expected.id() {
        return Err(ModelError::TypeMismatch {
            path: path.clone(),
            expected: "matching node id",
            actual: "different node",
        });
    }
    parent.children.remove(index);
    Ok(())
}

/// Split the element at `path` into two siblings at child-index `position`:
/// children `[position..]` move into a freshly-identified sibling carrying
/// `properties` (the second half's properties — usually a clone of the
/// original, e.g. splitting a paragraph keeps both halves' paragraph
/// properties identical until a later `set_properties` diverges them).
fn split_node(
    doc: &mut Document,
    path: &Path,
    position: usize,
    properties: &Properties,
) -> ModelResult<()> {
    let (parent_path, index) = doc.parent_and_index(path)?;
    let (tag, mut tail) = {
        let node = doc.lookup_element_mut(path)?;
        if position > node.children.len() {
            return Err(ModelError::PathInvalid(path.clone()));
        }
        let tail = node.children.split_off(position);
        (node.tag, tail)
    };
    let new_node = Node::Element(ElementNode {
        id: crate::id::next_id(),
        tag,
        properties: properties.clone(),
        children: std::mem::take(&mut tail),
    });
    let parent = doc.lookup_element_mut(&parent_path)?;
    parent.children.insert(index + 1, new_node);
    Ok(())
}

/// Merge the element at `path` into its previous sibling: the sibling's
/// children are extended with `path`'s children, and `path`'s element is
/// removed. `properties` is unused on apply (the merged node keeps the
/// previous sibling's own properties) but is required so `invert` can
/// restore the removed sibling's properties on undo.
fn merge_node(
    doc: &mut Document,
    path: &Path,
    position: usize,
    _properties: &Properties,
) -> ModelResult<()> {
    let (parent_path, index) = doc.parent_and_index(path)?;
    if index == 0 {
        return Err(ModelError::PathInvalid(path.clone()));
    }
    let removed = {
        let parent = doc.lookup_element_mut(&parent_path)?;
        if index >= parent.children.len() {
            return Err(ModelError::PathInvalid(path.clone()));
        }
        parent.children.remove(index)
    };
    let removed_children = match removed {
        Node::Element(e) => e.children,
        Node::Leaf(_) => {
            return Err(ModelError::TypeMismatch {
                path: path.clone(),
                expected: "element",
                actual: "leaf",
            })
        }
    };
    let parent = doc.lookup_element_mut(&parent_path)?;
    let prev = parent
        .children
        .get_mut(index - 1)
        .ok_or_else(|| ModelError::PathInvalid(path.clone()))?;
    match prev {
        Node::Element(e) => {
            debug_assert!(position <= e.children.len());
            e.children.extend(removed_children);
        }
        Node::Leaf(_) => {
            return Err(ModelError::TypeMismatch {
                path: path.clone(),
                expected: "element",
                actual: "leaf",
            })
        }
    }
    Ok(())
}

fn set_properties(doc: &mut Document, path: &Path, properties: &Properties) -> ModelResult<()> {
    let node = doc.lookup_node_mut(path)?;
    *node.properties_mut() = properties.clone();
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::node::new;
    use crate::model::properties::ParagraphProperties;
    use crate::model::Tag;

    #[test]
    fn insert_text_splices_at_offset() {
        let doc = Document::empty();
        let path = Path::from_indices(vec![0, 0, 0, 0, 0]); // first text leaf
        let op = Op::InsertText {
            path: path.clone(),
            offset: 0,
            text: "hi".into(),
        };
        let doc2 = apply(&doc, &op).unwrap();
        assert_eq!(doc2.lookup_text(&path).unwrap(), "hi");
        // original untouched
        assert_eq!(doc.lookup_text(&path).unwrap(), "");
    }

    #[test]
    fn delete_text_out_of_range_errors() {
        let doc = Document::empty();
        let path = Path::from_indices(vec![0, 0, 0, 0, 0]);
        let op = Op::DeleteText {
            path,
            offset: 0,
            text: "x".into(),
        };
        assert!(apply(&doc, &op).is_err());
    }

    #[test]
    fn insert_node_then_remove_node_round_trips() {
        let doc = Document::empty();
        let section_path = Path::from_indices(vec![0, 0]);
        let section = doc.lookup_element(&section_path).unwrap();
        let insert_index = section.children.len();
        let new_para = new::empty_paragraph();
        let insert_path = section_path.child(insert_index);
        let op = Op::InsertNode {
            path: insert_path.clone(),
            node: new_para.clone(),
        };
        let doc2 = apply(&doc, &op).unwrap();
        assert_eq!(doc2.lookup_element(&section_path).unwrap().children.len(), 2);

        let remove_op = Op::RemoveNode {
            path: insert_path,
            node: new_para,
        };
        let doc3 = apply(&doc2, &remove_op).unwrap();
        assert_eq!(doc3, doc);
    }

    #[test]
    fn split_and_merge_are_inverse_shapes() {
        let doc = Document::empty();
        let para_path = Path::from_indices(vec![0, 0, 0]);
        let split_op = Op::SplitNode {
            path: para_path.clone(),
            position: 1,
            properties: Properties::Paragraph(ParagraphProperties::default()),
        };
        let doc2 = apply(&doc, &split_op).unwrap();
        let section = doc2.lookup_element(&Path::from_indices(vec![0, 0])).unwrap();
        assert_eq!(section.children.len(), 2);
        assert_eq!(section.children[1].tag(), Tag::Paragraph);
    }
}
