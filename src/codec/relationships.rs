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

//! Relationship (`rId`) bookkeeping, grounded on the doco example's
//! `image_rel_map`/`rel_id` assignment in `write_package` and its
//! `document_rels_xml` generator, generalized to every relationship type
//! named in SPEC_FULL.md §4.5.2.

use crate::codec::xml::{parse_xml, XmlWriter};
use crate::error::CodecResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetMode {
    Internal,
    External,
}

#[derive(Debug, Clone)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub target_mode: TargetMode,
}

/// Assigns sequential `rId1, rId2, …` as targets are referenced, per
/// §4.5.2's "relationship tracker" collaborator. Also used on import to
/// hold the parsed `word/_rels/document.xml.rels` map.
#[derive(Debug, Clone, Default)]
pub struct RelationshipTracker {
    relationships: Vec<Relationship>,
    next: u32,
}

pub fn rel_type_uri(role: &str) -> String {
    format!("http://schemas.openxmlformats.org/officeDocument/2006/relationships/{role}")
}

pub const CORE_PROPERTIES_TYPE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";

impl RelationshipTracker {
    pub fn new() -> Self {
        RelationshipTracker { relationships: Vec::new(), next: 1 }
    }

    /// Register a relationship, reusing an existing id if the same
    /// `(type, target)` pair was already registered.
    pub fn register(&mut self, rel_type: &str, target: &str, target_mode: TargetMode) -> String {
        if let Some(existing) = self
            .relationships
            .iter()
            .find(|r| r.rel_type == rel_type && r.target == target)
        {
            return existing.id.clone();
        }
        let id = format!("rId{}", self.next);
        self.next += 1;
        self.relationships.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            target_mode,
        });
        id
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    pub fn to_xml(&self) -> CodecResult<Vec<u8>> {
        let mut w = XmlWriter::new()?;
        w.start(
            "Relationships",
            &[("xmlns", "http://schemas.openxmlformats.org/package/2006/relationships".to_string())],
        )?;
        for rel in &self.relationships {
            let mode = match rel.target_mode {
                TargetMode::External => "External",
                TargetMode::Internal => "Internal",
            };
            let mut attrs = vec![
                ("Id", rel.id.clone()),
                ("Type", rel.rel_type.clone()),
                ("Target", rel.target.clone()),
            ];
            if rel.target_mode == TargetMode::External {
                attrs.push(("TargetMode", mode.to_string()));
            }
            w.empty("Relationship", &attrs)?;
        }
        w.end("Relationships")?;
        Ok(w.into_bytes())
    }

    pub fn from_xml(bytes: &[u8]) -> CodecResult<Self> {
        let root = parse_xml(bytes)?;
        let mut tracker = RelationshipTracker::new();
        for rel in root.children_elements().filter(|e| e.name == "Relationship") {
            let id = rel.attr("Id").unwrap_or_default().to_string();
            let rel_type = rel.attr("Type").unwrap_or_default().to_string();
            let target = rel.attr("Target").unwrap_or_default().to_string();
            let target_mode = if rel.attr("TargetMode") == Some("External") {
                TargetMode::External
            } else {
                TargetMode::Internal
            };
            tracker.relationships.push(Relationship { id, rel_type, target, target_mode });
        }
        Ok(tracker)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn register_reuses_id_for_same_target() {
        let mut t = RelationshipTracker::new();
        let a = t.register(&rel_type_uri("styles"), "styles.xml", TargetMode::Internal);
        let b = t.register(&rel_type_uri("styles"), "styles.xml", TargetMode::Internal);
        assert_eq!(a, b);
        assert_eq!(a, "rId1");
    }

    #[test]
    fn xml_round_trips() {
        let mut t = RelationshipTracker::new();
        t.register(&rel_type_uri("styles"), "styles.xml", TargetMode::Internal);
        t.register(&rel_type_uri("hyperlink"), "https://example.com", TargetMode::External);
        let bytes = t.to_xml().unwrap();
        let parsed = RelationshipTracker::from_xml(&bytes).unwrap();
        assert_eq!(parsed.iter().count(), 2);
        assert_eq!(parsed.get("rId2").unwrap().target_mode, TargetMode::External);
    }
}
