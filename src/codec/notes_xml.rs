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

//! `word/comments.xml`, `word/footnotes.xml`, `word/endnotes.xml`
//! import/export (§4.5.1 step 6, §4.5.2 step 2).

use crate::codec::relationships::RelationshipTracker;
use crate::codec::xml::{parse_xml, XmlWriter};
use crate::error::CodecResult;
use crate::model::node::new;
use crate::model::registries::{Comment, CommentsRegistry, Note, NotesRegistry};

pub fn parse_comments(bytes: &[u8]) -> CodecResult<CommentsRegistry> {
    let root = parse_xml(bytes)?;
    let mut registry = CommentsRegistry::default();
    for el in root.children_elements().filter(|e| e.name == "comment") {
        if let Some(id) = el.attr("id").and_then(|v| v.parse().ok()) {
            registry.insert(Comment {
                id,
                author: el.attr("author").unwrap_or_default().to_string(),
                date: el.attr("date").unwrap_or_default().to_string(),
                text: el.text(),
            });
        }
    }
    Ok(registry)
}

pub fn write_comments(registry: &CommentsRegistry) -> CodecResult<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start("w:comments", &[("xmlns:w", crate::codec::WORD_NS.to_string())])?;
    for comment in registry.iter() {
        w.start(
            "w:comment",
            &[
                ("w:id", comment.id.to_string()),
                ("w:author", comment.author.clone()),
                ("w:date", comment.date.clone()),
            ],
        )?;
        w.start("w:p", &[])?;
        w.start("w:r", &[])?;
        w.start("w:t", &[])?;
        w.text(&comment.text)?;
        w.end("w:t")?;
        w.end("w:r")?;
        w.end("w:p")?;
        w.end("w:comment")?;
    }
    w.end("w:comments")?;
    Ok(w.into_bytes())
}

/// Parse a `footnotes.xml`/`endnotes.xml` part. Entries with id `-1`/`0`
/// or of type `separator`/`continuationSeparator` are dropped, per §4.5.1
/// step 6.
pub fn parse_notes(bytes: &[u8], rels: &RelationshipTracker) -> CodecResult<NotesRegistry> {
    let root = parse_xml(bytes)?;
    let mut registry = NotesRegistry::default();
    for el in root.children_elements().filter(|e| e.name == "footnote" || e.name == "endnote") {
        let id: i32 = match el.attr("id").and_then(|v| v.parse().ok()) {
            Some(id) => id,
            None => continue,
        };
        if id == -1 || id == 0 {
            continue;
        }
        if matches!(el.attr("type"), Some("separator") | Some("continuationSeparator")) {
            continue;
        }
        let paragraphs: Vec<_> = el
            .children_elements()
            .filter(|e| e.name == "p")
            .map(|p| crate::codec::document_xml::parse_paragraph_public(p, rels, &Default::default()))
            .collect();
        let content = if paragraphs.is_empty() { new::empty_paragraph() } else { paragraphs.into_iter().next().unwrap() };
        registry.insert(Note { id, content });
    }
    Ok(registry)
}

pub fn write_notes(registry: &NotesRegistry, root_tag: &str, item_tag: &str) -> CodecResult<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start(root_tag, &[("xmlns:w", crate::codec::WORD_NS.to_string())])?;
    for note in registry.iter() {
        w.start(item_tag, &[("w:id", note.id.to_string())])?;
        w.start("w:p", &[])?;
        w.start("w:r", &[])?;
        w.start("w:t", &[])?;
        w.text(&note.content.raw_text())?;
        w.end("w:t")?;
        w.end("w:r")?;
        w.end("w:p")?;
        w.end(item_tag)?;
    }
    w.end(root_tag)?;
    Ok(w.into_bytes())
}
