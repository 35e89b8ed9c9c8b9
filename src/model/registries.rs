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

//! Document-level registries living alongside the node tree rather than in
//! it: styles, numbering, headers/footers, media, comments, footnotes,
//! endnotes and metadata. Grounded on the package layout surfaced by
//! `read_package_snapshot` in the doco example.

use std::collections::BTreeMap;

use crate::model::properties::{ParagraphProperties, RunProperties};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleType {
    Paragraph,
    Character,
    Table,
    Numbering,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub id: String,
    pub name: String,
    pub style_type: StyleType,
    pub based_on: Option<String>,
    pub next: Option<String>,
    pub is_default: bool,
    pub paragraph_properties: Option<ParagraphProperties>,
    pub run_properties: Option<RunProperties>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StylesRegistry {
    styles: Vec<Style>,
}

impl StylesRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, style: Style) {
        if let Some(existing) = self.styles.iter_mut().find(|s| s.id == style.id) {
            *existing = style;
        } else {
            self.styles.push(style);
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Style> {
        let idx = self.styles.iter().position(|s| s.id == id)?;
        Some(self.styles.remove(idx))
    }

    pub fn get(&self, id: &str) -> Option<&Style> {
        self.styles.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Style> {
        self.styles.iter()
    }

    pub fn default_for(&self, style_type: StyleType) -> Option<&Style> {
        self.styles
            .iter()
            .find(|s| s.style_type == style_type && s.is_default)
    }

    /// Resolve a run's effective formatting by walking `styleId -> basedOn`
    /// to the registry's default style, per SPEC_FULL.md §4.4.6.
    pub fn resolve_effective_run_properties(&self, direct: &RunProperties) -> RunProperties {
        let mut chain = Vec::new();
        let mut current = direct.style_id.as_deref();
        let mut seen = std::collections::HashSet::new();
        while let Some(id) = current {
            if !seen.insert(id.to_string()) {
                break;
            }
            if let Some(style) = self.get(id) {
                chain.push(style);
                current = style.based_on.as_deref();
            } else {
                break;
            }
        }
        let mut effective = self
            .default_for(StyleType::Character)
            .and_then(|s| s.run_properties.clone())
            .unwrap_or_default();
        for style in chain.into_iter().rev() {
            if let Some(rp) = &style.run_properties {
                effective = effective.merged_with(rp);
            }
        }
        effective.merged_with(direct)
    }

    pub fn resolve_effective_paragraph_properties(
        &self,
        direct: &ParagraphProperties,
    ) -> ParagraphProperties {
        let mut chain = Vec::new();
        let mut current = direct.style_id.as_deref();
        let mut seen = std::collections::HashSet::new();
        while let Some(id) = current {
            if !seen.insert(id.to_string()) {
                break;
            }
            if let Some(style) = self.get(id) {
                chain.push(style);
                current = style.based_on.as_deref();
            } else {
                break;
            }
        }
        let mut effective = self
            .default_for(StyleType::Paragraph)
            .and_then(|s| s.paragraph_properties.clone())
            .unwrap_or_default();
        for style in chain.into_iter().rev() {
            if let Some(pp) = &style.paragraph_properties {
                effective = effective.merged_with(pp);
            }
        }
        effective.merged_with(direct)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberingFormat {
    Decimal,
    LowerLetter,
    UpperLetter,
    LowerRoman,
    UpperRoman,
    Bullet,
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberingLevel {
    pub level: u8,
    pub start: u32,
    pub format: NumberingFormat,
    pub text: String,
    pub alignment: crate::model::properties::Alignment,
    pub indent: crate::model::properties::Indent,
    pub hanging_indent: Option<i32>,
    pub font: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AbstractNumbering {
    pub abstract_num_id: u32,
    pub levels: Vec<NumberingLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberingInstance {
    pub num_id: u32,
    pub abstract_num_id: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberingRegistry {
    pub abstract_numberings: Vec<AbstractNumbering>,
    pub instances: Vec<NumberingInstance>,
}

impl NumberingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&self, num_id: u32) -> Option<&AbstractNumbering> {
        let instance = self.instances.iter().find(|i| i.num_id == num_id)?;
        self.abstract_numberings
            .iter()
            .find(|a| a.abstract_num_id == instance.abstract_num_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadersFootersRegistry {
    headers: BTreeMap<String, crate::model::node::Node>,
    footers: BTreeMap<String, crate::model::node::Node>,
}

impl HeadersFootersRegistry {
    pub fn insert_header(&mut self, id: impl Into<String>, node: crate::model::node::Node) {
        self.headers.insert(id.into(), node);
    }

    pub fn insert_footer(&mut self, id: impl Into<String>, node: crate::model::node::Node) {
        self.footers.insert(id.into(), node);
    }

    pub fn header(&self, id: &str) -> Option<&crate::model::node::Node> {
        self.headers.get(id)
    }

    pub fn footer(&self, id: &str) -> Option<&crate::model::node::Node> {
        self.footers.get(id)
    }

    pub fn headers(&self) -> impl Iterator<Item = (&String, &crate::model::node::Node)> {
        self.headers.iter()
    }

    pub fn footers(&self) -> impl Iterator<Item = (&String, &crate::model::node::Node)> {
        self.footers.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaAsset {
    pub content_type: String,
    pub data: Vec<u8>,
    pub file_name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaRegistry {
    assets: BTreeMap<String, MediaAsset>,
}

impl MediaRegistry {
    pub fn insert(&mut self, id: impl Into<String>, asset: MediaAsset) {
        self.assets.insert(id.into(), asset);
    }

    pub fn get(&self, id: &str) -> Option<&MediaAsset> {
        self.assets.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MediaAsset)> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: u32,
    pub author: String,
    pub date: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentsRegistry {
    comments: Vec<Comment>,
}

impl CommentsRegistry {
    pub fn insert(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    pub fn get(&self, id: u32) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    pub fn remove(&mut self, id: u32) -> Option<Comment> {
        let index = self.comments.iter().position(|c| c.id == id)?;
        Some(self.comments.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Comment> {
        self.comments.iter()
    }

    pub fn next_id(&self) -> u32 {
        self.comments.iter().map(|c| c.id).max().map(|m| m + 1).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: i32,
    pub content: crate::model::node::Node,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotesRegistry {
    notes: Vec<Note>,
}

impl NotesRegistry {
    pub fn insert(&mut self, note: Note) {
        self.notes.push(note);
    }

    pub fn get(&self, id: i32) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn remove(&mut self, id: i32) -> Option<Note> {
        let index = self.notes.iter().position(|n| n.id == id)?;
        Some(self.notes.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter()
    }

    pub fn next_id(&self) -> i32 {
        self.notes.iter().map(|n| n.id).max().map(|m| m + 1).unwrap_or(1)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub keywords: Option<String>,
    pub description: Option<String>,
    pub last_modified_by: Option<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
}
