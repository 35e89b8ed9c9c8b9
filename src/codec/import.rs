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

//! Top-level `importDocx` orchestration (§4.5.1's ten steps).

use std::collections::BTreeMap;

use crate::codec::content_types::mime_for_extension;
use crate::codec::document_xml::parse_body;
use crate::codec::metadata_xml::parse_metadata;
use crate::codec::notes_xml::{parse_comments, parse_notes};
use crate::codec::numbering_xml::parse_numbering;
use crate::codec::relationships::RelationshipTracker;
use crate::codec::styles_xml::parse_styles;
use crate::codec::xml::parse_xml;
use crate::codec::zip_io::unpack;
use crate::error::{CodecError, CodecResult};
use crate::model::node::{new, Node};
use crate::model::registries::MediaAsset;
use crate::model::Document;

pub fn import_docx(bytes: &[u8]) -> CodecResult<Document> {
    // Step 1: unzip.
    let parts = unpack(bytes)?;

    // Step 2: document relationships.
    let rels = parts
        .get("word/_rels/document.xml.rels")
        .map(|b| RelationshipTracker::from_xml(b))
        .transpose()?
        .unwrap_or_default();

    // Step 3: styles.
    let styles = match parts.get("word/styles.xml") {
        Some(b) => parse_styles(b)?,
        None => Default::default(),
    };

    // Step 4: numbering.
    let numbering = match parts.get("word/numbering.xml") {
        Some(b) => parse_numbering(b)?,
        None => Default::default(),
    };

    // Step 5: theme is parsed for validation only; this model has no
    // dedicated named-color-scheme registry (CodecUnsupportedFeature,
    // degrades silently per §7).
    if let Some(theme) = parts.get("word/theme/theme1.xml") {
        if parse_xml(theme).is_err() {
            log::debug!("import: ignoring malformed theme1.xml");
        }
    }

    // Step 6: comments / footnotes / endnotes.
    let comments = match parts.get("word/comments.xml") {
        Some(b) => parse_comments(b)?,
        None => Default::default(),
    };
    let footnotes = match parts.get("word/footnotes.xml") {
        Some(b) => parse_notes(b, &rels)?,
        None => Default::default(),
    };
    let endnotes = match parts.get("word/endnotes.xml") {
        Some(b) => parse_notes(b, &rels)?,
        None => Default::default(),
    };

    // Step 7: harvest media.
    let mut media_by_path: BTreeMap<String, MediaAsset> = BTreeMap::new();
    for (path, data) in &parts {
        if let Some(name) = path.strip_prefix("word/media/") {
            let ext = name.rsplit_once('.').map(|(_, e)| e).unwrap_or("");
            media_by_path.insert(
                path.clone(),
                MediaAsset {
                    content_type: mime_for_extension(ext).to_string(),
                    data: data.clone(),
                    file_name: name.to_string(),
                },
            );
        }
    }

    // Step 8: document.xml body.
    let document_xml = parts
        .get("word/document.xml")
        .ok_or_else(|| CodecError::Malformed("missing word/document.xml".to_string()))?;
    let doc_root = parse_xml(document_xml)?;
    if doc_root.name != "document" {
        return Err(CodecError::Malformed(format!(
            "expected top-level <w:document>, found <{}>",
            doc_root.name
        )));
    }
    let body_el = doc_root
        .child("body")
        .ok_or_else(|| CodecError::Malformed("missing w:body".to_string()))?;
    let parsed = parse_body(body_el, &rels, &media_by_path);

    // Step 9: headers and footers referenced by sections. `header_ref`
    // etc. already hold the relationship target (e.g. `header1.xml`),
    // resolved in `section_properties_from_xml`.
    let mut headers_footers = crate::model::registries::HeadersFootersRegistry::default();
    for section in &parsed.sections {
        if let Some(props) = section.properties().as_section() {
            for target in [&props.header_ref, &props.first_header_ref, &props.even_header_ref] {
                if let Some(target) = target {
                    load_header_footer(target, &parts, &rels, &media_by_path, &mut headers_footers, true);
                }
            }
            for target in [&props.footer_ref, &props.first_footer_ref, &props.even_footer_ref] {
                if let Some(target) = target {
                    load_header_footer(target, &parts, &rels, &media_by_path, &mut headers_footers, false);
                }
            }
        }
    }

    // Step 10: metadata.
    let metadata = match parts.get("docProps/core.xml") {
        Some(b) => parse_metadata(b)?,
        None => Default::default(),
    };

    let media = {
        let mut registry = crate::model::registries::MediaRegistry::default();
        for (path, asset) in media_by_path {
            registry.insert(path, asset);
        }
        registry
    };

    let body: Node = new::body(parsed.sections);
    let root = new::document(body);

    Ok(Document {
        root,
        styles,
        numbering,
        headers_footers,
        media,
        comments,
        footnotes,
        endnotes,
        metadata,
    })
}

fn load_header_footer(
    target: &str,
    parts: &BTreeMap<String, Vec<u8>>,
    rels: &RelationshipTracker,
    media: &BTreeMap<String, MediaAsset>,
    registry: &mut crate::model::registries::HeadersFootersRegistry,
    is_header: bool,
) {
    let path = format!("word/{}", target.trim_start_matches('/').trim_start_matches("word/"));
    let Some(bytes) = parts.get(&path) else {
        return;
    };
    let Ok(root) = parse_xml(bytes) else {
        log::debug!("import: malformed header/footer part {path}");
        return;
    };
    let paragraphs: Vec<Node> = root
        .children_elements()
        .filter(|e| e.name == "p")
        .map(|p| crate::codec::document_xml::parse_paragraph_public(p, rels, media))
        .collect();
    let node = new::body(paragraphs);
    if is_header {
        registry.insert_header(target.to_string(), node);
    } else {
        registry.insert_footer(target.to_string(), node);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codec::export::export_docx;

    #[test]
    fn import_of_export_preserves_bold_text() {
        let mut doc = Document::empty();
        doc.root = new::document(new::body(vec![new::section(
            vec![new::paragraph(
                vec![new::run(
                    vec![new::text("Bold")],
                    crate::model::properties::RunProperties { bold: Some(true), ..Default::default() },
                )],
                Default::default(),
            )],
            Default::default(),
        )]));
        let bytes = export_docx(&doc).unwrap();
        assert_eq!(&bytes[0..4], &[0x50, 0x4B, 0x03, 0x04]);
        let reimported = import_docx(&bytes).unwrap();
        let section = &reimported.body().children()[0];
        let paragraph = &section.children()[0];
        assert_eq!(paragraph.tag(), crate::model::Tag::Paragraph);
        let run = &paragraph.children()[0];
        assert_eq!(run.properties().as_run().unwrap().bold, Some(true));
        assert_eq!(paragraph.raw_text(), "Bold");
    }

    #[test]
    fn import_of_export_preserves_table_structure() {
        let mut doc = Document::empty();
        let row = new::table_row(vec![
            new::table_cell(vec![new::paragraph(vec![new::plain_run("A1")], Default::default())], Default::default()),
            new::table_cell(vec![new::paragraph(vec![new::plain_run("B1")], Default::default())], Default::default()),
        ]);
        let table = new::table(vec![row], Default::default());
        doc.root = new::document(new::body(vec![new::section(vec![table], Default::default())]));
        let bytes = export_docx(&doc).unwrap();
        let reimported = import_docx(&bytes).unwrap();
        let section = &reimported.body().children()[0];
        let table = &section.children()[0];
        assert_eq!(table.tag(), crate::model::Tag::Table);
        assert_eq!(table.children().len(), 1);
        let row = &table.children()[0];
        assert_eq!(row.children().len(), 2);
        assert_eq!(row.children()[0].raw_text(), "A1");
        assert_eq!(row.children()[1].raw_text(), "B1");
    }

    #[test]
    fn import_of_export_normalizes_justify_alignment() {
        let mut doc = Document::empty();
        let props = crate::model::properties::ParagraphProperties {
            alignment: Some(crate::model::properties::Alignment::Justify),
            ..Default::default()
        };
        doc.root = new::document(new::body(vec![new::section(
            vec![new::paragraph(vec![new::plain_run("x")], props)],
            Default::default(),
        )]));
        let bytes = export_docx(&doc).unwrap();
        let reimported = import_docx(&bytes).unwrap();
        let section = &reimported.body().children()[0];
        let paragraph = &section.children()[0];
        assert_eq!(
            paragraph.properties().as_paragraph().unwrap().alignment,
            Some(crate::model::properties::Alignment::Justify)
        );
    }
}
