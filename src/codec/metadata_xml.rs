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

//! `docProps/core.xml` import/export (§4.5.1 step 10, §4.5.2 step 2).

use crate::codec::xml::{parse_xml, XmlWriter};
use crate::error::CodecResult;
use crate::model::registries::Metadata;

pub const CORE_PROPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
pub const DC_NS: &str = "http://purl.org/dc/elements/1.1/";
pub const DCTERMS_NS: &str = "http://purl.org/dc/terms/";

pub fn parse_metadata(bytes: &[u8]) -> CodecResult<Metadata> {
    let root = parse_xml(bytes)?;
    Ok(Metadata {
        title: root.child("title").map(|e| e.text()),
        subject: root.child("subject").map(|e| e.text()),
        creator: root.child("creator").map(|e| e.text()),
        keywords: root.child("keywords").map(|e| e.text()),
        description: root.child("description").map(|e| e.text()),
        last_modified_by: root.child("lastModifiedBy").map(|e| e.text()),
        created: root.child("created").map(|e| e.text()),
        modified: root.child("modified").map(|e| e.text()),
    })
}

pub fn write_metadata(metadata: &Metadata) -> CodecResult<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start(
        "cp:coreProperties",
        &[
            ("xmlns:cp", CORE_PROPS_NS.to_string()),
            ("xmlns:dc", DC_NS.to_string()),
            ("xmlns:dcterms", DCTERMS_NS.to_string()),
        ],
    )?;
    write_opt(&mut w, "dc:title", &metadata.title)?;
    write_opt(&mut w, "dc:subject", &metadata.subject)?;
    write_opt(&mut w, "dc:creator", &metadata.creator)?;
    write_opt(&mut w, "cp:keywords", &metadata.keywords)?;
    write_opt(&mut w, "dc:description", &metadata.description)?;
    write_opt(&mut w, "cp:lastModifiedBy", &metadata.last_modified_by)?;
    write_opt(&mut w, "dcterms:created", &metadata.created)?;
    write_opt(&mut w, "dcterms:modified", &metadata.modified)?;
    w.end("cp:coreProperties")?;
    Ok(w.into_bytes())
}

fn write_opt(w: &mut XmlWriter, tag: &str, value: &Option<String>) -> CodecResult<()> {
    if let Some(v) = value {
        w.start(tag, &[])?;
        w.text(v)?;
        w.end(tag)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn metadata_round_trips_present_fields() {
        let metadata = Metadata { title: Some("Report".to_string()), creator: Some("A".to_string()), ..Default::default() };
        let bytes = write_metadata(&metadata).unwrap();
        let parsed = parse_metadata(&bytes).unwrap();
        assert_eq!(parsed.title.as_deref(), Some("Report"));
        assert_eq!(parsed.subject, None);
    }
}
