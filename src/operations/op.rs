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

//! The closed operation algebra (SPEC_FULL.md §4.1).

use crate::model::{Node, Path, Properties};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    InsertText {
        path: Path,
        offset: usize,
        text: String,
    },
    DeleteText {
        path: Path,
        offset: usize,
        text: String,
    },
    InsertNode {
        path: Path,
        node: Node,
    },
    RemoveNode {
        path: Path,
        node: Node,
    },
    SplitNode {
        path: Path,
        position: usize,
        properties: Properties,
    },
    MergeNode {
        path: Path,
        position: usize,
        properties: Properties,
    },
    SetProperties {
        path: Path,
        properties: Properties,
        old_properties: Properties,
    },
}

impl Op {
    pub fn path(&self) -> &Path {
        match self {
            Op::InsertText { path, .. }
            | Op::DeleteText { path, .. }
            | Op::InsertNode { path, .. }
            | Op::RemoveNode { path, .. }
            | Op::SplitNode { path, .. }
            | Op::MergeNode { path, .. }
            | Op::SetProperties { path, .. } => path,
        }
    }
}

/// A non-empty ordered sequence of operations applied and inverted as one
/// unit (SPEC_FULL.md §4.1 "Batch").
#[derive(Debug, Clone, PartialEq)]
pub struct Batch(Vec<Op>);

impl Batch {
    pub fn new(ops: Vec<Op>) -> Option<Self> {
        if ops.is_empty() {
            None
        } else {
            Some(Batch(ops))
        }
    }

    pub fn single(op: Op) -> Self {
        Batch(vec![op])
    }

    pub fn ops(&self) -> &[Op] {
        &self.0
    }

    pub fn into_ops(self) -> Vec<Op> {
        self.0
    }
}
