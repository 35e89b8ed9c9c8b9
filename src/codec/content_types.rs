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

//! `[Content_Types].xml` builder, per §4.5.2 step 4: defaults for `rels`,
//! `xml`, and every distinct media extension; overrides for each part that
//! is actually present.

use std::collections::BTreeSet;

use crate::codec::xml::XmlWriter;
use crate::error::CodecResult;

pub struct ContentTypesBuilder {
    media_extensions: BTreeSet<String>,
    overrides: Vec<(String, String)>,
}

const NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

fn content_type_for(part: &str) -> &'static str {
    match part {
        "document" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
        "styles" => "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml",
        "numbering" => "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml",
        "comments" => "application/vnd.openxmlformats-officedocument.wordprocessingml.comments+xml",
        "footnotes" => "application/vnd.openxmlformats-officedocument.wordprocessingml.footnotes+xml",
        "endnotes" => "application/vnd.openxmlformats-officedocument.wordprocessingml.endnotes+xml",
        "header" => "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml",
        "footer" => "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml",
        "theme" => "application/vnd.openxmlformats-officedocument.theme+xml",
        "core-properties" => "application/vnd.openxmlformats-package.core-properties+xml",
        _ => "application/octet-stream",
    }
}

impl ContentTypesBuilder {
    pub fn new() -> Self {
        ContentTypesBuilder { media_extensions: BTreeSet::new(), overrides: Vec::new() }
    }

    pub fn add_override(&mut self, part_path: &str, kind: &str) {
        self.overrides.push((format!("/{part_path}"), content_type_for(kind).to_string()));
    }

    pub fn add_media_extension(&mut self, ext: &str, mime: &str) {
        self.media_extensions.insert(format!("{}\u{0}{}", ext.to_lowercase(), mime));
    }

    pub fn to_xml(&self) -> CodecResult<Vec<u8>> {
        let mut w = XmlWriter::new()?;
        w.start("Types", &[("xmlns", NS.to_string())])?;
        w.empty("Default", &[("Extension", "rels".to_string()), ("ContentType", "application/vnd.openxmlformats-package.relationships+xml".to_string())])?;
        w.empty("Default", &[("Extension", "xml".to_string()), ("ContentType", "application/xml".to_string())])?;
        for entry in &self.media_extensions {
            let (ext, mime) = entry.split_once('\u{0}').unwrap();
            w.empty("Default", &[("Extension", ext.to_string()), ("ContentType", mime.to_string())])?;
        }
        for (part, content_type) in &self.overrides {
            w.empty("Override", &[("PartName", part.clone()), ("ContentType", content_type.clone())])?;
        }
        w.end("Types")?;
        Ok(w.into_bytes())
    }
}

impl Default for ContentTypesBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codec::xml::parse_xml;

    #[test]
    fn emits_default_and_override_entries() {
        let mut b = ContentTypesBuilder::new();
        b.add_override("word/document.xml", "document");
        b.add_media_extension("png", mime_for_extension("png"));
        let xml = b.to_xml().unwrap();
        let root = parse_xml(&xml).unwrap();
        let overrides: Vec<_> = root.children_elements().filter(|e| e.name == "Override").collect();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides[0].attr("PartName"), Some("/word/document.xml"));
    }
}
