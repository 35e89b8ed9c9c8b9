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

//! `invert(op) -> op'` such that `apply(apply(d, op), invert(op)) == d`.
//!
//! Grounded on the `tyrchen-md-editor` `Command::undo` implementations,
//! which capture exactly the state needed to reverse a mutation
//! (`deleted_text`, `original_second_node`) rather than diffing the tree.

use crate::operations::op::{Batch, Op};

pub fn invert(op: &Op) -> Op {
    match op.clone() {
        Op::InsertText { path, offset, text } => Op::DeleteText { path, offset, text },
        Op::DeleteText { path, offset, text } => Op::InsertText { path, offset, text },
        Op::InsertNode { path, node } => Op::RemoveNode { path, node },
        Op::RemoveNode { path, node } => Op::InsertNode { path, node },
        Op::SplitNode {
            path,
            position,
            properties,
        } => {
            // The merge that undoes a split targets the *new* sibling
            // created at `path`'s next index.
            let merge_path = path.with_last_index(path.index_in_parent().unwrap_or(0) + 1);
            Op::MergeNode {
                path: merge_path,
                position,
                properties,
            }
        }
        Op::MergeNode {
            path,
            position,
            properties,
        } => {
            let split_path = path.with_last_index(path.index_in_parent().unwrap_or(1) - 1);
            Op::SplitNode {
                path: split_path,
                position,
                properties,
            }
        }
        Op::SetProperties {
            path,
            properties,
            old_properties,
        } => Op::SetProperties {
            path,
            properties: old_properties,
            old_properties: properties,
        },
    }
}

/// Invert a batch: reverse order, invert each operation.
pub fn invert_batch(batch: &Batch) -> Batch {
    let ops: Vec<Op> = batch.ops().iter().rev().map(invert).collect();
    Batch::new(ops).expect("batch is non-empty by construction")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::Document;
    use crate::model::Path;
    use crate::operations::apply::apply_batch;

    #[test]
    fn invert_insert_text_is_delete_text() {
        let op = Op::InsertText {
            path: Path::root(),
            offset: 0,
            text: "x".into(),
        };
        assert_eq!(
            invert(&op),
            Op::DeleteText {
                path: Path::root(),
                offset: 0,
                text: "x".into(),
            }
        );
    }

    #[test]
    fn apply_then_invert_restores_document() {
        let doc = Document::empty();
        let path = Path::from_indices(vec![0, 0, 0, 0, 0]);
        let op = Op::InsertText {
            path,
            offset: 0,
            text: "hello".into(),
        };
        let batch = Batch::single(op);
        let doc2 = apply_batch(&doc, &batch).unwrap();
        assert_ne!(doc2, doc);
        let inv = invert_batch(&batch);
        let doc3 = apply_batch(&doc2, &inv).unwrap();
        assert_eq!(doc3, doc);
    }

    #[test]
    fn invert_batch_reverses_order() {
        let a = Op::InsertText {
            path: Path::root(),
            offset: 0,
            text: "a".into(),
        };
        let b = Op::InsertText {
            path: Path::root(),
            offset: 1,
            text: "b".into(),
        };
        let batch = Batch::new(vec![a.clone(), b.clone()]).unwrap();
        let inv = invert_batch(&batch);
        assert_eq!(inv.ops()[0], invert(&b));
        assert_eq!(inv.ops()[1], invert(&a));
    }
}
