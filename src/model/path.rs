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

//! Path-based addressing into the document tree.
//!
//! Mirrors `DomHandle` from the teacher crate's `dom/dom_struct.rs`: a path
//! is the sequence of child indices from the root, and paths compare
//! lexicographically with shorter prefixes sorting first.

use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<usize>);

impl Path {
    pub fn root() -> Self {
        Path(Vec::new())
    }

    pub fn from_indices(indices: impl Into<Vec<usize>>) -> Self {
        Path(indices.into())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The path of this node's parent, or `None` at the root.
    pub fn parent(&self) -> Option<Path> {
        if self.0.is_empty() {
            None
        } else {
            Some(Path(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// This node's index within its parent's children.
    pub fn index_in_parent(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// The path to the `index`th child of this node.
    pub fn child(&self, index: usize) -> Path {
        let mut v = self.0.clone();
        v.push(index);
        Path(v)
    }

    /// A copy of this path with its final index replaced.
    pub fn with_last_index(&self, index: usize) -> Path {
        let mut v = self.0.clone();
        if let Some(last) = v.last_mut() {
            *last = index;
        } else {
            v.push(index);
        }
        Path(v)
    }

    /// True if `self` addresses an ancestor of (or is equal to) `other`.
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        other.0.len() >= self.0.len() && other.0[..self.0.len()] == self.0[..]
    }
}

impl PartialOrd for Path {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Path {
    fn cmp(&self, other: &Self) -> Ordering {
        let min_len = self.0.len().min(other.0.len());
        for i in 0..min_len {
            match self.0[i].cmp(&other.0[i]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        self.0.len().cmp(&other.0.len())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/")?;
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", parts.join("/"))
    }
}

/// A cursor position: a path to a text leaf plus a character offset into it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Point {
    pub path: Path,
    pub offset: usize,
}

impl Point {
    pub fn new(path: Path, offset: usize) -> Self {
        Point { path, offset }
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.path.cmp(&other.path) {
            Ordering::Equal => self.offset.cmp(&other.offset),
            ord => ord,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn shorter_prefix_sorts_first() {
        let a = Path::from_indices(vec![0]);
        let b = Path::from_indices(vec![0, 1]);
        assert!(a < b);
    }

    #[test]
    fn lexicographic_ordering() {
        let a = Path::from_indices(vec![0, 5]);
        let b = Path::from_indices(vec![1, 0]);
        assert!(a < b);
    }

    #[test]
    fn is_ancestor_of() {
        let a = Path::from_indices(vec![0]);
        let b = Path::from_indices(vec![0, 2, 1]);
        assert!(a.is_ancestor_of(&b));
        assert!(!b.is_ancestor_of(&a));
    }

    #[test]
    fn point_ordering_uses_offset_as_tiebreak() {
        let p1 = Point::new(Path::from_indices(vec![0, 0]), 2);
        let p2 = Point::new(Path::from_indices(vec![0, 0]), 5);
        assert!(p1 < p2);
    }
}
