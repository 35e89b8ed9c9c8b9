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

//! `word/styles.xml` import/export (§4.5.1 step 3, §4.5.2 step 2).

use crate::codec::document_xml::{
    paragraph_properties_from_xml, paragraph_properties_to_xml, run_properties_from_xml,
    run_properties_to_xml,
};
use crate::codec::xml::{parse_xml, XmlElement, XmlWriter};
use crate::error::CodecResult;
use crate::model::registries::{Style, StyleType, StylesRegistry};

fn style_type_from_str(s: &str) -> Option<StyleType> {
    match s {
        "paragraph" => Some(StyleType::Paragraph),
        "character" => Some(StyleType::Character),
        "table" => Some(StyleType::Table),
        "numbering" => Some(StyleType::Numbering),
        _ => None,
    }
}

fn style_type_to_str(t: StyleType) -> &'static str {
    match t {
        StyleType::Paragraph => "paragraph",
        StyleType::Character => "character",
        StyleType::Table => "table",
        StyleType::Numbering => "numbering",
    }
}

/// Parse a `styles.xml` document. Styles without an id or a recognized
/// type are dropped, per §4.5.1 step 3.
pub fn parse_styles(bytes: &[u8]) -> CodecResult<StylesRegistry> {
    let root = parse_xml(bytes)?;
    let mut registry = StylesRegistry::new();
    for style_el in root.children_elements().filter(|e| e.name == "style") {
        if let Some(style) = parse_style(style_el) {
            registry.insert(style);
        }
    }
    Ok(registry)
}

fn parse_style(el: &XmlElement) -> Option<Style> {
    let id = el.attr("styleId")?.to_string();
    let style_type = style_type_from_str(el.attr("type").unwrap_or("paragraph"))?;
    let is_default = el.attr("default") == Some("1") || el.attr("default") == Some("true");
    let name = el.child("name").and_then(|n| n.attr("val")).unwrap_or(&id).to_string();
    let based_on = el.child("basedOn").and_then(|n| n.attr("val")).map(str::to_string);
    let next = el.child("next").and_then(|n| n.attr("val")).map(str::to_string);
    let paragraph_properties = el.child("pPr").map(paragraph_properties_from_xml);
    let run_properties = el.child("rPr").map(run_properties_from_xml);
    Some(Style {
        id,
        name,
        style_type,
        based_on,
        next,
        is_default,
        paragraph_properties,
        run_properties,
    })
}

pub fn write_styles(registry: &StylesRegistry) -> CodecResult<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start("w:styles", &[("xmlns:w", crate::codec::WORD_NS.to_string())])?;
    for style in registry.iter() {
        let mut attrs = vec![
            ("w:type", style_type_to_str(style.style_type).to_string()),
            ("w:styleId", style.id.clone()),
        ];
        if style.is_default {
            attrs.push(("w:default", "1".to_string()));
        }
        w.start("w:style", &attrs)?;
        w.empty("w:name", &[("w:val", style.name.clone())])?;
        if let Some(based_on) = &style.based_on {
            w.empty("w:basedOn", &[("w:val", based_on.clone())])?;
        }
        if let Some(next) = &style.next {
            w.empty("w:next", &[("w:val", next.clone())])?;
        }
        if let Some(pp) = &style.paragraph_properties {
            paragraph_properties_to_xml(&mut w, pp)?;
        }
        if let Some(rp) = &style.run_properties {
            run_properties_to_xml(&mut w, rp)?;
        }
        w.end("w:style")?;
    }
    w.end("w:styles")?;
    Ok(w.into_bytes())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::properties::RunProperties;

    #[test]
    fn style_round_trips() {
        let mut registry = StylesRegistry::new();
        registry.insert(Style {
            id: "Heading1".to_string(),
            name: "Heading 1".to_string(),
            style_type: StyleType::Paragraph,
            based_on: Some("Normal".to_string()),
            next: Some("Normal".to_string()),
            is_default: false,
            paragraph_properties: None,
            run_properties: Some(RunProperties { bold: Some(true), ..Default::default() }),
        });
        let bytes = write_styles(&registry).unwrap();
        let parsed = parse_styles(&bytes).unwrap();
        let style = parsed.get("Heading1").unwrap();
        assert_eq!(style.based_on.as_deref(), Some("Normal"));
        assert_eq!(style.run_properties.as_ref().unwrap().bold, Some(true));
    }
}
