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

//! Top-level `exportDocx` orchestration (§4.5.2's six steps).

use std::collections::BTreeSet;

use crate::codec::content_types::ContentTypesBuilder;
use crate::codec::document_xml::{write_body, DocumentXmlContext};
use crate::codec::metadata_xml::write_metadata;
use crate::codec::notes_xml::{write_comments, write_notes};
use crate::codec::numbering_xml::write_numbering;
use crate::codec::relationships::{rel_type_uri, RelationshipTracker, TargetMode, CORE_PROPERTIES_TYPE};
use crate::codec::styles_xml::write_styles;
use crate::codec::xml::XmlWriter;
use crate::codec::zip_io::{pack, PackPart};
use crate::error::CodecResult;
use crate::model::node::Node;
use crate::model::registries::{Metadata, NotesRegistry};
use crate::model::Document;

const DOCUMENT_NAMESPACES: &[(&str, &str)] = &[
    ("xmlns:w", crate::codec::WORD_NS),
    ("xmlns:r", crate::codec::RELATIONSHIPS_NS),
    ("xmlns:wp", crate::codec::WORDPROCESSING_DRAWING_NS),
    ("xmlns:a", crate::codec::DRAWING_MAIN_NS),
    ("xmlns:pic", crate::codec::PICTURE_NS),
    ("xmlns:mc", crate::codec::MC_NS),
];

pub fn export_docx(doc: &Document) -> CodecResult<Vec<u8>> {
    let mut rels = RelationshipTracker::new();
    let mut media: Vec<(String, crate::model::registries::MediaAsset)> = Vec::new();

    let sections: Vec<Node> = doc.sections().into_iter().cloned().collect();

    let mut body_writer = XmlWriter::new()?;
    let ns: Vec<(&str, String)> = DOCUMENT_NAMESPACES.iter().map(|(k, v)| (*k, v.to_string())).collect();
    body_writer.start("w:document", &ns)?;
    {
        let mut ctx = DocumentXmlContext { rels: &mut rels, media: &mut media };
        write_body(&mut body_writer, &sections, &mut ctx)?;
    }
    body_writer.end("w:document")?;
    let document_xml = body_writer.into_bytes();

    let mut content_types = ContentTypesBuilder::new();
    let mut parts = Vec::new();
    content_types.add_override("word/document.xml", "document");
    parts.push(PackPart { path: "word/document.xml".to_string(), data: document_xml, store_uncompressed: false });

    // styles.xml is always present: every document has at least an implicit
    // default style set, per §4.5.2 step 2.
    let styles_xml = write_styles(&doc.styles)?;
    rels.register(&rel_type_uri("styles"), "styles.xml", TargetMode::Internal);
    content_types.add_override("word/styles.xml", "styles");
    parts.push(PackPart { path: "word/styles.xml".to_string(), data: styles_xml, store_uncompressed: false });

    if !doc.numbering.abstract_numberings.is_empty() || !doc.numbering.instances.is_empty() {
        let numbering_xml = write_numbering(&doc.numbering)?;
        rels.register(&rel_type_uri("numbering"), "numbering.xml", TargetMode::Internal);
        content_types.add_override("word/numbering.xml", "numbering");
        parts.push(PackPart { path: "word/numbering.xml".to_string(), data: numbering_xml, store_uncompressed: false });
    }

    if doc.comments.iter().next().is_some() {
        let comments_xml = write_comments(&doc.comments)?;
        rels.register(&rel_type_uri("comments"), "comments.xml", TargetMode::Internal);
        content_types.add_override("word/comments.xml", "comments");
        parts.push(PackPart { path: "word/comments.xml".to_string(), data: comments_xml, store_uncompressed: false });
    }

    write_optional_notes(&doc.footnotes, "footnotes", &mut rels, &mut content_types, &mut parts)?;
    write_optional_notes(&doc.endnotes, "endnotes", &mut rels, &mut content_types, &mut parts)?;

    // Headers and footers referenced by any section get their own part,
    // keyed by the relationship target already embedded in each
    // `SectionProperties` field.
    let mut header_footer_targets: BTreeSet<(String, bool)> = BTreeSet::new();
    for section in &sections {
        if let Some(props) = section.properties().as_section() {
            for target in [&props.header_ref, &props.first_header_ref, &props.even_header_ref] {
                if let Some(target) = target {
                    header_footer_targets.insert((target.clone(), true));
                }
            }
            for target in [&props.footer_ref, &props.first_footer_ref, &props.even_footer_ref] {
                if let Some(target) = target {
                    header_footer_targets.insert((target.clone(), false));
                }
            }
        }
    }
    for (target, is_header) in header_footer_targets {
        let content = if is_header { doc.headers_footers.header(&target) } else { doc.headers_footers.footer(&target) };
        let Some(content) = content else { continue };
        let xml = write_header_footer(content, is_header)?;
        let path = format!("word/{}", target.trim_start_matches('/').trim_start_matches("word/"));
        content_types.add_override(&path, if is_header { "header" } else { "footer" });
        parts.push(PackPart { path, data: xml, store_uncompressed: false });
    }

    if doc.metadata != Metadata::default() {
        // The core-properties relationship lives in the package-level
        // `_rels/.rels`, not `word/_rels/document.xml.rels` (registered below).
        let metadata_xml = write_metadata(&doc.metadata)?;
        content_types.add_override("docProps/core.xml", "core-properties");
        parts.push(PackPart { path: "docProps/core.xml".to_string(), data: metadata_xml, store_uncompressed: false });
    }

    for (file_name, asset) in &media {
        let ext = file_name.rsplit_once('.').map(|(_, e)| e).unwrap_or("");
        content_types.add_media_extension(ext, &asset.content_type);
        parts.push(PackPart {
            path: format!("word/media/{file_name}"),
            data: asset.data.clone(),
            store_uncompressed: true,
        });
    }

    parts.push(PackPart {
        path: "word/_rels/document.xml.rels".to_string(),
        data: rels.to_xml()?,
        store_uncompressed: false,
    });

    let mut root_rels = RelationshipTracker::new();
    root_rels.register(
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument",
        "word/document.xml",
        TargetMode::Internal,
    );
    if doc.metadata != Metadata::default() {
        root_rels.register(CORE_PROPERTIES_TYPE, "docProps/core.xml", TargetMode::Internal);
    }
    parts.push(PackPart { path: "_rels/.rels".to_string(), data: root_rels.to_xml()?, store_uncompressed: false });

    parts.push(PackPart {
        path: "[Content_Types].xml".to_string(),
        data: content_types.to_xml()?,
        store_uncompressed: false,
    });

    pack(parts)
}

fn write_optional_notes(
    registry: &NotesRegistry,
    kind: &str,
    rels: &mut RelationshipTracker,
    content_types: &mut ContentTypesBuilder,
    parts: &mut Vec<PackPart>,
) -> CodecResult<()> {
    if registry.iter().next().is_none() {
        return Ok(());
    }
    let (root_tag, item_tag) = if kind == "footnotes" { ("w:footnotes", "w:footnote") } else { ("w:endnotes", "w:endnote") };
    let xml = write_notes(registry, root_tag, item_tag)?;
    rels.register(&rel_type_uri(kind), &format!("{kind}.xml"), TargetMode::Internal);
    content_types.add_override(&format!("word/{kind}.xml"), kind);
    parts.push(PackPart { path: format!("word/{kind}.xml"), data: xml, store_uncompressed: false });
    Ok(())
}

fn write_header_footer(content: &Node, is_header: bool) -> CodecResult<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    let ns: Vec<(&str, String)> = DOCUMENT_NAMESPACES.iter().map(|(k, v)| (*k, v.to_string())).collect();
    let root_tag = if is_header { "w:hdr" } else { "w:ftr" };
    w.start(root_tag, &ns)?;
    let mut rels = RelationshipTracker::new();
    let mut media = Vec::new();
    let mut ctx = DocumentXmlContext { rels: &mut rels, media: &mut media };
    for block in content.children() {
        crate::codec::document_xml::write_block_pub(&mut w, block, &mut ctx)?;
    }
    w.end(root_tag)?;
    Ok(w.into_bytes())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn export_produces_a_valid_zip() {
        let doc = Document::empty();
        let bytes = export_docx(&doc).unwrap();
        assert_eq!(&bytes[0..4], &[0x50, 0x4B, 0x03, 0x04]);
        let unpacked = crate::codec::zip_io::unpack(&bytes).unwrap();
        assert!(unpacked.contains_key("word/document.xml"));
        assert!(unpacked.contains_key("[Content_Types].xml"));
        assert!(unpacked.contains_key("word/styles.xml"));
    }

    #[test]
    fn export_registers_styles_relationship() {
        let doc = Document::empty();
        let bytes = export_docx(&doc).unwrap();
        let unpacked = crate::codec::zip_io::unpack(&bytes).unwrap();
        let rels_xml = unpacked.get("word/_rels/document.xml.rels").unwrap();
        let rels = RelationshipTracker::from_xml(rels_xml).unwrap();
        assert!(rels.iter().any(|r| r.target == "styles.xml"));
    }

    #[test]
    fn export_skips_absent_numbering_and_comments() {
        let doc = Document::empty();
        let bytes = export_docx(&doc).unwrap();
        let unpacked = crate::codec::zip_io::unpack(&bytes).unwrap();
        assert!(!unpacked.contains_key("word/numbering.xml"));
        assert!(!unpacked.contains_key("word/comments.xml"));
    }

    #[test]
    fn export_includes_metadata_when_present() {
        let mut doc = Document::empty();
        doc.metadata.title = Some("Report".to_string());
        let bytes = export_docx(&doc).unwrap();
        let unpacked = crate::codec::zip_io::unpack(&bytes).unwrap();
        assert!(unpacked.contains_key("docProps/core.xml"));
    }
}
