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

//! `word/numbering.xml` import/export (§4.5.1 step 4).

use crate::codec::document_xml::run_properties_from_xml;
use crate::codec::xml::{parse_xml, XmlElement, XmlWriter};
use crate::error::CodecResult;
use crate::model::properties::{Alignment, Indent};
use crate::model::registries::{
    AbstractNumbering, NumberingFormat, NumberingInstance, NumberingLevel, NumberingRegistry,
};

fn format_from_str(s: &str) -> NumberingFormat {
    match s {
        "lowerLetter" => NumberingFormat::LowerLetter,
        "upperLetter" => NumberingFormat::UpperLetter,
        "lowerRoman" => NumberingFormat::LowerRoman,
        "upperRoman" => NumberingFormat::UpperRoman,
        "bullet" => NumberingFormat::Bullet,
        "none" => NumberingFormat::None,
        // Unknown formats map to `decimal`, per §4.5.1 step 4.
        _ => NumberingFormat::Decimal,
    }
}

fn format_to_str(f: NumberingFormat) -> &'static str {
    match f {
        NumberingFormat::Decimal => "decimal",
        NumberingFormat::LowerLetter => "lowerLetter",
        NumberingFormat::UpperLetter => "upperLetter",
        NumberingFormat::LowerRoman => "lowerRoman",
        NumberingFormat::UpperRoman => "upperRoman",
        NumberingFormat::Bullet => "bullet",
        NumberingFormat::None => "none",
    }
}

pub fn parse_numbering(bytes: &[u8]) -> CodecResult<NumberingRegistry> {
    let root = parse_xml(bytes)?;
    let mut registry = NumberingRegistry::new();
    for abstract_el in root.children_elements().filter(|e| e.name == "abstractNum") {
        if let Some(id) = abstract_el.attr("abstractNumId").and_then(|v| v.parse().ok()) {
            let levels = abstract_el
                .children_elements()
                .filter(|e| e.name == "lvl")
                .filter_map(parse_level)
                .collect();
            registry.abstract_numberings.push(AbstractNumbering { abstract_num_id: id, levels });
        }
    }
    for num_el in root.children_elements().filter(|e| e.name == "num") {
        let num_id = num_el.attr("numId").and_then(|v| v.parse().ok());
        let abstract_num_id = num_el
            .child("abstractNumId")
            .and_then(|e| e.attr("val"))
            .and_then(|v| v.parse().ok());
        if let (Some(num_id), Some(abstract_num_id)) = (num_id, abstract_num_id) {
            registry.instances.push(NumberingInstance { num_id, abstract_num_id });
        }
    }
    Ok(registry)
}

fn parse_level(lvl: &XmlElement) -> Option<NumberingLevel> {
    let level = lvl.attr("ilvl")?.parse().ok()?;
    let start = lvl.child("start").and_then(|e| e.attr("val")).and_then(|v| v.parse().ok()).unwrap_or(1);
    let format = lvl.child("numFmt").and_then(|e| e.attr("val")).map(format_from_str).unwrap_or(NumberingFormat::Decimal);
    let text = lvl.child("lvlText").and_then(|e| e.attr("val")).unwrap_or("%1.").to_string();
    let alignment = lvl.child("lvlJc").and_then(|e| e.attr("val")).map(|v| match v {
        "center" => Alignment::Center,
        "right" => Alignment::Right,
        _ => Alignment::Left,
    }).unwrap_or(Alignment::Left);
    let ind = lvl.child("pPr").and_then(|p| p.child("ind"));
    let indent = Indent {
        left: ind.and_then(|i| i.attr("left")).and_then(|v| v.parse().ok()),
        right: None,
        first_line: ind.and_then(|i| i.attr("firstLine")).and_then(|v| v.parse().ok()),
        hanging: ind.and_then(|i| i.attr("hanging")).and_then(|v| v.parse().ok()),
    };
    let hanging_indent = indent.hanging;
    let font = lvl
        .child("rPr")
        .map(run_properties_from_xml)
        .and_then(|rp| rp.font_family);
    Some(NumberingLevel { level, start, format, text, alignment, indent, hanging_indent, font })
}

pub fn write_numbering(registry: &NumberingRegistry) -> CodecResult<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start("w:numbering", &[("xmlns:w", crate::codec::WORD_NS.to_string())])?;
    for abs in &registry.abstract_numberings {
        w.start("w:abstractNum", &[("w:abstractNumId", abs.abstract_num_id.to_string())])?;
        for level in &abs.levels {
            w.start("w:lvl", &[("w:ilvl", level.level.to_string())])?;
            w.empty("w:start", &[("w:val", level.start.to_string())])?;
            w.empty("w:numFmt", &[("w:val", format_to_str(level.format).to_string())])?;
            w.empty("w:lvlText", &[("w:val", level.text.clone())])?;
            w.end("w:lvl")?;
        }
        w.end("w:abstractNum")?;
    }
    for instance in &registry.instances {
        w.start("w:num", &[("w:numId", instance.num_id.to_string())])?;
        w.empty("w:abstractNumId", &[("w:val", instance.abstract_num_id.to_string())])?;
        w.end("w:num")?;
    }
    w.end("w:numbering")?;
    Ok(w.into_bytes())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unknown_format_maps_to_decimal() {
        assert_eq!(format_from_str("chicago"), NumberingFormat::Decimal);
    }

    #[test]
    fn numbering_round_trips() {
        let mut registry = NumberingRegistry::new();
        registry.abstract_numberings.push(AbstractNumbering {
            abstract_num_id: 0,
            levels: vec![NumberingLevel {
                level: 0,
                start: 1,
                format: NumberingFormat::Bullet,
                text: "\u{f0b7}".to_string(),
                alignment: Alignment::Left,
                indent: Indent::default(),
                hanging_indent: None,
                font: None,
            }],
        });
        registry.instances.push(NumberingInstance { num_id: 1, abstract_num_id: 0 });
        let bytes = write_numbering(&registry).unwrap();
        let parsed = parse_numbering(&bytes).unwrap();
        assert_eq!(parsed.resolve(1).unwrap().abstract_num_id, 0);
    }
}
