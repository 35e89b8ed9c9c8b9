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

use strum_macros::{Display, EnumIter};

/// The closed set of node tags, per the document-tree schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Tag {
    Document,
    Body,
    Section,
    Paragraph,
    Table,
    TableRow,
    TableCell,
    Run,
    Hyperlink,
    Drawing,
    ShapeGroup,

    Text,
    LineBreak,
    ColumnBreak,
    Tab,
    BookmarkStart,
    BookmarkEnd,
    CommentRangeStart,
    CommentRangeEnd,
    FootnoteRef,
    EndnoteRef,
    Field,
    Shape,
    Equation,
    ImageLeaf,
    PageBreak,
}

impl Tag {
    /// Element tags carry an ordered list of children; leaf tags carry a
    /// payload and no children.
    pub fn is_element(self) -> bool {
        matches!(
            self,
            Tag::Document
                | Tag::Body
                | Tag::Section
                | Tag::Paragraph
                | Tag::Table
                | Tag::TableRow
                | Tag::TableCell
                | Tag::Run
                | Tag::Hyperlink
                | Tag::Drawing
                | Tag::ShapeGroup
        )
    }

    pub fn is_leaf(self) -> bool {
        !self.is_element()
    }
}
