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

//! `word/document.xml` body import/export (§4.5.1 step 8, §4.5.2 step 1),
//! plus the `rPr`/`pPr` converters shared with `styles_xml.rs`.
//!
//! Grounded on `dom/parser/parse.rs`'s `HtmlParser`: dispatch per tag name
//! over a stack of in-progress block children, degrading unrecognized
//! elements by skipping them (§7's `CodecUnsupportedFeature`).

use crate::codec::relationships::{RelationshipTracker, TargetMode};
use crate::codec::xml::{XmlElement, XmlWriter};
use crate::codec::WORD_NS;
use crate::error::CodecResult;
use crate::model::node::new;
use crate::model::properties::*;
use crate::model::registries::MediaAsset;
use crate::model::Node;

// ---------------------------------------------------------------------
// Run properties
// ---------------------------------------------------------------------

pub fn run_properties_from_xml(rpr: &XmlElement) -> RunProperties {
    let mut p = RunProperties::default();
    if rpr.has_child("b") {
        p.bold = Some(bool_val(rpr.child("b")));
    }
    if rpr.has_child("i") {
        p.italic = Some(bool_val(rpr.child("i")));
    }
    if let Some(u) = rpr.child("u") {
        p.underline = Some(match u.attr("val") {
            Some("none") => UnderlineStyle::None,
            Some("double") => UnderlineStyle::Double,
            Some("thick") => UnderlineStyle::Thick,
            _ => UnderlineStyle::Single,
        });
    }
    if rpr.has_child("strike") {
        p.strikethrough = Some(bool_val(rpr.child("strike")));
    }
    if let Some(v) = rpr.child("vertAlign").and_then(|e| e.attr("val")) {
        p.superscript = Some(v == "superscript");
        p.subscript = Some(v == "subscript");
    }
    if let Some(fonts) = rpr.child("rFonts") {
        let family = fonts
            .attr("ascii")
            .or_else(|| fonts.attr("hAnsi"))
            .or_else(|| fonts.attr("cs"));
        p.font_family = family.map(str::to_string);
    }
    if let Some(sz) = rpr.child("sz").and_then(|e| e.attr("val")).and_then(|v| v.parse().ok()) {
        p.font_size_half_points = Some(sz);
    }
    if let Some(color) = rpr.child("color").and_then(|e| e.attr("val")) {
        p.color = Some(color.to_string());
    }
    if let Some(shd) = rpr.child("highlight").and_then(|e| e.attr("val")) {
        p.highlight = Some(shd.to_string());
    }
    if rpr.has_child("caps") {
        p.all_caps = Some(bool_val(rpr.child("caps")));
    }
    if rpr.has_child("smallCaps") {
        p.small_caps = Some(bool_val(rpr.child("smallCaps")));
    }
    if let Some(spacing) = rpr.child("spacing").and_then(|e| e.attr("val")).and_then(|v| v.parse().ok()) {
        p.letter_spacing = Some(spacing);
    }
    if let Some(lang) = rpr.child("lang").and_then(|e| e.attr("val")) {
        p.language = Some(lang.to_string());
    }
    if let Some(style_id) = rpr.child("rStyle").and_then(|e| e.attr("val")) {
        p.style_id = Some(style_id.to_string());
    }
    if let Some(change) = rpr.child("rPrChange") {
        p.revision = Some(Revision {
            kind: RevisionKind::FormatChange,
            author: change.attr("author").unwrap_or_default().to_string(),
            date: change.attr("date").unwrap_or_default().to_string(),
            id: change.attr("id").and_then(|v| v.parse().ok()).unwrap_or(0),
        });
    }
    p
}

pub fn run_properties_to_xml(w: &mut XmlWriter, p: &RunProperties) -> CodecResult<()> {
    w.start("w:rPr", &[])?;
    run_properties_body_to_xml(w, p)?;
    if let Some(rev) = &p.revision {
        if rev.kind == RevisionKind::FormatChange {
            w.start("w:rPrChange", &revision_attrs(rev))?;
            w.empty("w:rPr", &[])?;
            w.end("w:rPrChange")?;
        }
    }
    w.end("w:rPr")?;
    Ok(())
}

fn revision_attrs(rev: &Revision) -> Vec<(&'static str, String)> {
    vec![("w:id", rev.id.to_string()), ("w:author", rev.author.clone()), ("w:date", rev.date.clone())]
}

fn run_properties_body_to_xml(w: &mut XmlWriter, p: &RunProperties) -> CodecResult<()> {
    if let Some(style_id) = &p.style_id {
        w.empty("w:rStyle", &[("w:val", style_id.clone())])?;
    }
    if let Some(fonts) = &p.font_family {
        w.empty("w:rFonts", &[("w:ascii", fonts.clone()), ("w:hAnsi", fonts.clone())])?;
    }
    if p.bold == Some(true) {
        w.empty("w:b", &[])?;
    }
    if p.italic == Some(true) {
        w.empty("w:i", &[])?;
    }
    if p.strikethrough == Some(true) {
        w.empty("w:strike", &[])?;
    }
    if let Some(u) = p.underline {
        if u != UnderlineStyle::None {
            w.empty("w:u", &[("w:val", underline_val(u).to_string())])?;
        }
    }
    match (p.superscript, p.subscript) {
        (Some(true), _) => w.empty("w:vertAlign", &[("w:val", "superscript".to_string())])?,
        (_, Some(true)) => w.empty("w:vertAlign", &[("w:val", "subscript".to_string())])?,
        _ => {}
    }
    if let Some(sz) = p.font_size_half_points {
        w.empty("w:sz", &[("w:val", sz.to_string())])?;
    }
    if let Some(color) = &p.color {
        w.empty("w:color", &[("w:val", color.clone())])?;
    }
    if let Some(highlight) = &p.highlight {
        w.empty("w:highlight", &[("w:val", highlight.clone())])?;
    }
    if p.all_caps == Some(true) {
        w.empty("w:caps", &[])?;
    }
    if p.small_caps == Some(true) {
        w.empty("w:smallCaps", &[])?;
    }
    if let Some(spacing) = p.letter_spacing {
        w.empty("w:spacing", &[("w:val", spacing.to_string())])?;
    }
    if let Some(lang) = &p.language {
        w.empty("w:lang", &[("w:val", lang.clone())])?;
    }
    Ok(())
}

fn underline_val(u: UnderlineStyle) -> &'static str {
    match u {
        UnderlineStyle::None => "none",
        UnderlineStyle::Single => "single",
        UnderlineStyle::Double => "double",
        UnderlineStyle::Thick => "thick",
    }
}

fn bool_val(el: Option<&XmlElement>) -> bool {
    match el.and_then(|e| e.attr("val")) {
        Some("0") | Some("false") => false,
        _ => true,
    }
}

// ---------------------------------------------------------------------
// Paragraph properties
// ---------------------------------------------------------------------

fn alignment_from_str(s: &str) -> Alignment {
    match s {
        "center" => Alignment::Center,
        "right" | "end" => Alignment::Right,
        "both" => Alignment::Justify,
        "distribute" => Alignment::Distribute,
        _ => Alignment::Left,
    }
}

fn alignment_to_str(a: Alignment) -> &'static str {
    match a {
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
        // `justify` normalizes to OOXML's `both`, per §4.5.1 step 8 /
        // §8 scenario 2.
        Alignment::Justify => "both",
        Alignment::Distribute => "distribute",
    }
}

pub fn paragraph_properties_from_xml(ppr: &XmlElement) -> ParagraphProperties {
    let mut p = ParagraphProperties::default();
    p.style_id = ppr.child("pStyle").and_then(|e| e.attr("val")).map(str::to_string);
    p.alignment = ppr.child("jc").and_then(|e| e.attr("val")).map(alignment_from_str);
    if let Some(num_pr) = ppr.child("numPr") {
        let num_id = num_pr.child("numId").and_then(|e| e.attr("val")).and_then(|v| v.parse().ok());
        let level = num_pr.child("ilvl").and_then(|e| e.attr("val")).and_then(|v| v.parse().ok()).unwrap_or(0);
        if let Some(num_id) = num_id {
            p.numbering = Some(Numbering { num_id, level });
        }
    }
    if let Some(ind) = ppr.child("ind") {
        p.indent = Some(Indent {
            left: attr_i32(ind, "left").or_else(|| attr_i32(ind, "start")),
            right: attr_i32(ind, "right").or_else(|| attr_i32(ind, "end")),
            first_line: attr_i32(ind, "firstLine"),
            hanging: attr_i32(ind, "hanging"),
        });
    }
    if let Some(spacing) = ppr.child("spacing") {
        p.spacing = Some(Spacing {
            before: attr_i32(spacing, "before").map(|v| v as u32),
            after: attr_i32(spacing, "after").map(|v| v as u32),
            line: attr_i32(spacing, "line").map(|v| v as u32),
            line_rule: spacing.attr("lineRule").map(|v| match v {
                "exact" => LineRule::Exact,
                "atLeast" => LineRule::AtLeast,
                _ => LineRule::Auto,
            }),
        });
    }
    p.outline_level = ppr.child("outlineLvl").and_then(|e| e.attr("val")).and_then(|v| v.parse().ok());
    if ppr.has_child("keepNext") {
        p.keep_next = Some(bool_val(ppr.child("keepNext")));
    }
    if ppr.has_child("keepLines") {
        p.keep_lines = Some(bool_val(ppr.child("keepLines")));
    }
    if ppr.has_child("pageBreakBefore") {
        p.page_break_before = Some(bool_val(ppr.child("pageBreakBefore")));
    }
    if ppr.has_child("widowControl") {
        p.widow_control = Some(bool_val(ppr.child("widowControl")));
    }
    if let Some(rpr) = ppr.child("rPr") {
        p.run_properties = Some(run_properties_from_xml(rpr));
    }
    p
}

fn attr_i32(el: &XmlElement, name: &str) -> Option<i32> {
    el.attr(name).and_then(|v| v.parse().ok())
}

pub fn paragraph_properties_to_xml(w: &mut XmlWriter, p: &ParagraphProperties) -> CodecResult<()> {
    w.start("w:pPr", &[])?;
    if let Some(style_id) = &p.style_id {
        w.empty("w:pStyle", &[("w:val", style_id.clone())])?;
    }
    if let Some(numbering) = &p.numbering {
        w.start("w:numPr", &[])?;
        w.empty("w:ilvl", &[("w:val", numbering.level.to_string())])?;
        w.empty("w:numId", &[("w:val", numbering.num_id.to_string())])?;
        w.end("w:numPr")?;
    }
    if p.page_break_before == Some(true) {
        w.empty("w:pageBreakBefore", &[])?;
    }
    if p.keep_next == Some(true) {
        w.empty("w:keepNext", &[])?;
    }
    if p.keep_lines == Some(true) {
        w.empty("w:keepLines", &[])?;
    }
    if p.widow_control == Some(false) {
        w.empty("w:widowControl", &[("w:val", "0".to_string())])?;
    }
    if let Some(ind) = &p.indent {
        let mut attrs = Vec::new();
        if let Some(v) = ind.left {
            attrs.push(("w:left", v.to_string()));
        }
        if let Some(v) = ind.right {
            attrs.push(("w:right", v.to_string()));
        }
        if let Some(v) = ind.first_line {
            attrs.push(("w:firstLine", v.to_string()));
        }
        if let Some(v) = ind.hanging {
            attrs.push(("w:hanging", v.to_string()));
        }
        if !attrs.is_empty() {
            w.empty("w:ind", &attrs)?;
        }
    }
    if let Some(spacing) = &p.spacing {
        let mut attrs = Vec::new();
        if let Some(v) = spacing.before {
            attrs.push(("w:before", v.to_string()));
        }
        if let Some(v) = spacing.after {
            attrs.push(("w:after", v.to_string()));
        }
        if let Some(v) = spacing.line {
            attrs.push(("w:line", v.to_string()));
        }
        if !attrs.is_empty() {
            w.empty("w:spacing", &attrs)?;
        }
    }
    if let Some(level) = p.outline_level {
        w.empty("w:outlineLvl", &[("w:val", level.to_string())])?;
    }
    if let Some(alignment) = p.alignment {
        w.empty("w:jc", &[("w:val", alignment_to_str(alignment).to_string())])?;
    }
    if let Some(rp) = &p.run_properties {
        run_properties_to_xml(w, rp)?;
    }
    w.end("w:pPr")?;
    Ok(())
}

// ---------------------------------------------------------------------
// Section properties
// ---------------------------------------------------------------------

/// `header_ref`/`footer_ref` (and the first/even variants) are resolved
/// through `rels` here so the model stores the relationship *target* (a
/// part-relative path like `header1.xml`) rather than a transient `rId`,
/// which keeps the value stable across re-export.
pub fn section_properties_from_xml(sect_pr: &XmlElement, rels: &RelationshipTracker) -> SectionProperties {
    let mut p = SectionProperties::default();
    if let Some(pg_sz) = sect_pr.child("pgSz") {
        p.page_width = attr_i32(pg_sz, "w").unwrap_or(p.page_width as i32) as u32;
        p.page_height = attr_i32(pg_sz, "h").unwrap_or(p.page_height as i32) as u32;
        if pg_sz.attr("orient") == Some("landscape") {
            p.orientation = Orientation::Landscape;
        }
    }
    if let Some(m) = sect_pr.child("pgMar") {
        p.margins = PageMargins {
            top: attr_i32(m, "top").unwrap_or(p.margins.top),
            right: attr_i32(m, "right").unwrap_or(p.margins.right),
            bottom: attr_i32(m, "bottom").unwrap_or(p.margins.bottom),
            left: attr_i32(m, "left").unwrap_or(p.margins.left),
            header: attr_i32(m, "header").unwrap_or(p.margins.header),
            footer: attr_i32(m, "footer").unwrap_or(p.margins.footer),
            gutter: attr_i32(m, "gutter").unwrap_or(p.margins.gutter),
        };
    }
    if let Some(cols) = sect_pr.child("cols") {
        p.columns = Columns {
            count: attr_i32(cols, "num").unwrap_or(1) as u8,
            space: attr_i32(cols, "space").unwrap_or(720) as u32,
            separator: cols.attr("sep") == Some("1") || cols.attr("sep") == Some("true"),
        };
    }
    for reference in sect_pr.children_elements().filter(|e| e.name == "headerReference") {
        let target = reference.attr("id").and_then(|rid| rels.get(rid)).map(|rel| rel.target.clone());
        match reference.attr("type") {
            Some("first") => p.first_header_ref = target,
            Some("even") => p.even_header_ref = target,
            _ => p.header_ref = target,
        }
    }
    for reference in sect_pr.children_elements().filter(|e| e.name == "footerReference") {
        let target = reference.attr("id").and_then(|rid| rels.get(rid)).map(|rel| rel.target.clone());
        match reference.attr("type") {
            Some("first") => p.first_footer_ref = target,
            Some("even") => p.even_footer_ref = target,
            _ => p.footer_ref = target,
        }
    }
    if sect_pr.has_child("titlePg") {
        p.title_page = true;
    }
    if sect_pr.has_child("lnNumType") {
        p.line_numbering = true;
    }
    p
}

pub fn section_properties_to_xml(
    w: &mut XmlWriter,
    p: &SectionProperties,
    header_rel: Option<&str>,
    footer_rel: Option<&str>,
) -> CodecResult<()> {
    w.start("w:sectPr", &[])?;
    if let Some(rid) = header_rel {
        w.empty("w:headerReference", &[("w:type", "default".to_string()), ("r:id", rid.to_string())])?;
    }
    if let Some(rid) = footer_rel {
        w.empty("w:footerReference", &[("w:type", "default".to_string()), ("r:id", rid.to_string())])?;
    }
    let orient = match p.orientation {
        Orientation::Portrait => None,
        Orientation::Landscape => Some(("w:orient", "landscape".to_string())),
    };
    let mut pg_sz_attrs = vec![("w:w", p.page_width.to_string()), ("w:h", p.page_height.to_string())];
    if let Some(o) = orient {
        pg_sz_attrs.push(o);
    }
    w.empty("w:pgSz", &pg_sz_attrs)?;
    w.empty(
        "w:pgMar",
        &[
            ("w:top", p.margins.top.to_string()),
            ("w:right", p.margins.right.to_string()),
            ("w:bottom", p.margins.bottom.to_string()),
            ("w:left", p.margins.left.to_string()),
            ("w:header", p.margins.header.to_string()),
            ("w:footer", p.margins.footer.to_string()),
            ("w:gutter", p.margins.gutter.to_string()),
        ],
    )?;
    w.empty(
        "w:cols",
        &[("w:num", p.columns.count.to_string()), ("w:space", p.columns.space.to_string())],
    )?;
    if p.title_page {
        w.empty("w:titlePg", &[])?;
    }
    w.end("w:sectPr")?;
    Ok(())
}

// ---------------------------------------------------------------------
// Body walker
// ---------------------------------------------------------------------

/// Output of parsing `word/document.xml`'s body: a list of finished
/// sections, each already bearing its inherited properties, per §4.5.1
/// step 8's block-accumulation algorithm.
pub struct ParsedBody {
    pub sections: Vec<Node>,
}

pub fn parse_body(
    body_el: &XmlElement,
    rels: &RelationshipTracker,
    media: &std::collections::BTreeMap<String, MediaAsset>,
) -> ParsedBody {
    let mut sections = Vec::new();
    let mut current: Vec<Node> = Vec::new();

    for child in body_el.children_elements() {
        match child.name.as_str() {
            "p" => {
                if let Some(ppr) = child.child("pPr") {
                    if let Some(sect_pr) = ppr.child("sectPr") {
                        let props = section_properties_from_xml(sect_pr, rels);
                        let blocks = std::mem::take(&mut current);
                        sections.push(new::section(blocks, props));
                        continue;
                    }
                }
                current.push(parse_paragraph(child, rels, media));
            }
            "tbl" => current.push(parse_table(child, rels, media)),
            "sectPr" => {
                let props = section_properties_from_xml(child, rels);
                let blocks = std::mem::take(&mut current);
                sections.push(new::section(blocks, props));
            }
            _ => log::debug!("document.xml: skipping unsupported body element <{}>", child.name),
        }
    }

    if !current.is_empty() || sections.is_empty() {
        sections.push(new::section(current, SectionProperties::default()));
    }

    ParsedBody { sections }
}

/// Public entry point for parsing a single `w:p`, used by note parsing
/// (`notes_xml.rs`) which has no section-accumulation context of its own.
pub fn parse_paragraph_public(
    p_el: &XmlElement,
    rels: &RelationshipTracker,
    media: &std::collections::BTreeMap<String, MediaAsset>,
) -> Node {
    parse_paragraph(p_el, rels, media)
}

fn parse_paragraph(
    p_el: &XmlElement,
    rels: &RelationshipTracker,
    media: &std::collections::BTreeMap<String, MediaAsset>,
) -> Node {
    let properties = p_el.child("pPr").map(paragraph_properties_from_xml).unwrap_or_default();
    let mut children = Vec::new();
    for child in p_el.children_elements() {
        match child.name.as_str() {
            "r" => children.extend(parse_run(child, rels, media)),
            "hyperlink" => {
                if let Some(node) = parse_hyperlink(child, rels, media) {
                    children.push(node);
                }
            }
            "ins" | "del" => {
                let kind =
                    if child.name == "ins" { RevisionKind::Insertion } else { RevisionKind::Deletion };
                let revision = Revision {
                    kind,
                    author: child.attr("author").unwrap_or_default().to_string(),
                    date: child.attr("date").unwrap_or_default().to_string(),
                    id: child.attr("id").and_then(|v| v.parse().ok()).unwrap_or(0),
                };
                for inner in child.children_elements().filter(|e| e.name == "r") {
                    for mut run in parse_run(inner, rels, media) {
                        if let Some(rp) = run.properties_mut().as_run_mut() {
                            rp.revision = Some(revision.clone());
                        }
                        children.push(run);
                    }
                }
            }
            "bookmarkStart" | "bookmarkEnd" | "commentRangeStart" | "commentRangeEnd" => {}
            "pPr" => {}
            _ => log::debug!("document.xml: skipping unsupported paragraph child <{}>", child.name),
        }
    }
    if children.is_empty() {
        children.push(new::plain_run(""));
    }
    new::paragraph(children, properties)
}

fn parse_run(
    r_el: &XmlElement,
    rels: &RelationshipTracker,
    media: &std::collections::BTreeMap<String, MediaAsset>,
) -> Vec<Node> {
    // A run that contains only a comment reference is discarded (§4.5.1
    // step 8).
    if r_el.has_child("commentReference")
        && !r_el.has_child("t")
        && !r_el.has_child("br")
        && !r_el.has_child("tab")
    {
        return Vec::new();
    }
    let properties = r_el.child("rPr").map(run_properties_from_xml).unwrap_or_default();
    let mut out = Vec::new();
    let mut text_children = Vec::new();
    for child in r_el.children_elements() {
        match child.name.as_str() {
            "t" | "delText" => text_children.push(new::text(child.text())),
            "br" => match child.attr("type") {
                Some("column") => {
                    if !text_children.is_empty() {
                        out.push(new::run(std::mem::take(&mut text_children), properties.clone()));
                    }
                    out.push(Node::Leaf(crate::model::node::LeafNode {
                        id: crate::id::next_id(),
                        tag: crate::model::Tag::ColumnBreak,
                        properties: Properties::None,
                    }));
                }
                Some("page") => {
                    if !text_children.is_empty() {
                        out.push(new::run(std::mem::take(&mut text_children), properties.clone()));
                    }
                    out.push(Node::Leaf(crate::model::node::LeafNode {
                        id: crate::id::next_id(),
                        tag: crate::model::Tag::PageBreak,
                        properties: Properties::None,
                    }));
                }
                _ => text_children.push(new::text("\n")),
            },
            "tab" => {
                if !text_children.is_empty() {
                    out.push(new::run(std::mem::take(&mut text_children), properties.clone()));
                }
                out.push(new::tab());
            }
            "drawing" => {
                if let Some(drawing) = parse_drawing(child, rels, media) {
                    if !text_children.is_empty() {
                        out.push(new::run(std::mem::take(&mut text_children), properties.clone()));
                    }
                    out.push(drawing);
                }
            }
            _ => {}
        }
    }
    if !text_children.is_empty() || out.is_empty() {
        out.push(new::run(text_children, properties));
    }
    out
}

fn parse_hyperlink(
    el: &XmlElement,
    rels: &RelationshipTracker,
    media: &std::collections::BTreeMap<String, MediaAsset>,
) -> Option<Node> {
    let runs: Vec<Node> =
        el.children_elements().filter(|e| e.name == "r").flat_map(|r| parse_run(r, rels, media)).collect();
    let (target, is_external) = if let Some(rid) = el.attr("id") {
        match rels.get(rid) {
            Some(rel) => (rel.target.clone(), true),
            None => return None, // RelationshipMissing (§7): drop the element.
        }
    } else if let Some(anchor) = el.attr("anchor") {
        (format!("#{anchor}"), false)
    } else {
        ("#anchor".to_string(), false)
    };
    Some(new::hyperlink(runs, target, is_external))
}

fn parse_drawing(
    el: &XmlElement,
    rels: &RelationshipTracker,
    media: &std::collections::BTreeMap<String, MediaAsset>,
) -> Option<Node> {
    let inline_or_anchor = el.child("inline").or_else(|| el.child("anchor"))?;
    let extent = inline_or_anchor.child("extent");
    let width_emu = extent.and_then(|e| e.attr("cx")).and_then(|v| v.parse().ok()).unwrap_or(0);
    let height_emu = extent.and_then(|e| e.attr("cy")).and_then(|v| v.parse().ok()).unwrap_or(0);
    let blip = inline_or_anchor
        .child("graphic")
        .and_then(|g| g.child("graphicData"))
        .and_then(|g| g.child("pic"))
        .and_then(|p| p.child("blipFill"))
        .and_then(|b| b.child("blip"));
    let media_id = blip.and_then(|b| b.attr("embed")).and_then(|rid| rels.get(rid)).map(|rel| rel.target.clone());
    if media_id.is_none() {
        log::debug!("document.xml: dropping drawing with unresolved image relationship");
    }
    let _ = media;
    Some(new::drawing(DrawingProperties { media_id, width_emu, height_emu, alt_text: None }))
}

fn parse_table(
    tbl_el: &XmlElement,
    rels: &RelationshipTracker,
    media: &std::collections::BTreeMap<String, MediaAsset>,
) -> Node {
    let mut column_widths = Vec::new();
    if let Some(grid) = tbl_el.child("tblGrid") {
        for col in grid.children_elements().filter(|e| e.name == "gridCol") {
            if let Some(w) = col.attr("w").and_then(|v| v.parse().ok()) {
                column_widths.push(w);
            }
        }
    }
    let style_id = tbl_el.child("tblPr").and_then(|p| p.child("tblStyle")).and_then(|s| s.attr("val")).map(str::to_string);
    let rows: Vec<Node> = tbl_el
        .children_elements()
        .filter(|e| e.name == "tr")
        .map(|tr| parse_table_row(tr, rels, media))
        .collect();
    new::table(rows, TableProperties { style_id, column_widths })
}

fn parse_table_row(
    tr_el: &XmlElement,
    rels: &RelationshipTracker,
    media: &std::collections::BTreeMap<String, MediaAsset>,
) -> Node {
    let cells: Vec<Node> = tr_el
        .children_elements()
        .filter(|e| e.name == "tc")
        .map(|tc| parse_table_cell(tc, rels, media))
        .collect();
    new::table_row(cells)
}

fn parse_table_cell(
    tc_el: &XmlElement,
    rels: &RelationshipTracker,
    media: &std::collections::BTreeMap<String, MediaAsset>,
) -> Node {
    let tc_pr = tc_el.child("tcPr");
    let grid_span = tc_pr
        .and_then(|p| p.child("gridSpan"))
        .and_then(|g| g.attr("val"))
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);
    let width = tc_pr.and_then(|p| p.child("tcW")).and_then(|w| w.attr("w")).and_then(|v| v.parse().ok());
    let mut children: Vec<Node> = tc_el
        .children_elements()
        .filter(|e| e.name == "p")
        .map(|p| parse_paragraph(p, rels, media))
        .collect();
    if children.is_empty() {
        children.push(new::empty_paragraph());
    }
    new::table_cell(children, TableCellProperties { grid_span, width })
}

// ---------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------

pub struct DocumentXmlContext<'a> {
    pub rels: &'a mut RelationshipTracker,
    pub media: &'a mut Vec<(String, MediaAsset)>,
}

pub fn write_body(
    w: &mut XmlWriter,
    sections: &[Node],
    ctx: &mut DocumentXmlContext,
) -> CodecResult<()> {
    w.start("w:body", &[])?;
    for (idx, section) in sections.iter().enumerate() {
        let is_last = idx + 1 == sections.len();
        let props = section.properties().as_section().cloned().unwrap_or_default();
        let header_rel = props
            .header_ref
            .as_ref()
            .map(|target| ctx.rels.register(&crate::codec::relationships::rel_type_uri("header"), target, TargetMode::Internal));
        let footer_rel = props
            .footer_ref
            .as_ref()
            .map(|target| ctx.rels.register(&crate::codec::relationships::rel_type_uri("footer"), target, TargetMode::Internal));

        let blocks = section.children();
        if is_last {
            for block in blocks {
                write_block(w, block, ctx)?;
            }
            section_properties_to_xml(w, &props, header_rel.as_deref(), footer_rel.as_deref())?;
        } else if let Some((last, rest)) = blocks.split_last() {
            for block in rest {
                write_block(w, block, ctx)?;
            }
            if last.tag() == crate::model::Tag::Paragraph {
                write_paragraph(w, last, ctx, Some((&props, header_rel.as_deref(), footer_rel.as_deref())))?;
            } else {
                write_block(w, last, ctx)?;
                w.start("w:p", &[])?;
                w.start("w:pPr", &[])?;
                section_properties_to_xml(w, &props, header_rel.as_deref(), footer_rel.as_deref())?;
                w.end("w:pPr")?;
                w.end("w:p")?;
            }
        }
    }
    w.end("w:body")?;
    Ok(())
}

/// Public entry point for writing a single block (paragraph or table),
/// used by header/footer export which has no section to walk.
pub fn write_block_pub(w: &mut XmlWriter, node: &Node, ctx: &mut DocumentXmlContext) -> CodecResult<()> {
    write_block(w, node, ctx)
}

fn write_block(w: &mut XmlWriter, node: &Node, ctx: &mut DocumentXmlContext) -> CodecResult<()> {
    match node.tag() {
        crate::model::Tag::Paragraph => write_paragraph(w, node, ctx, None),
        crate::model::Tag::Table => write_table(w, node, ctx),
        _ => Ok(()),
    }
}

fn write_paragraph(
    w: &mut XmlWriter,
    node: &Node,
    ctx: &mut DocumentXmlContext,
    embed_section: Option<(&SectionProperties, Option<&str>, Option<&str>)>,
) -> CodecResult<()> {
    let props = node.properties().as_paragraph().cloned().unwrap_or_default();
    w.start("w:p", &[])?;
    let has_ppr = props != ParagraphProperties::default() || embed_section.is_some();
    if has_ppr {
        w.start("w:pPr", &[])?;
        write_ppr_body(w, &props)?;
        if let Some((sect, header_rel, footer_rel)) = embed_section {
            section_properties_to_xml(w, sect, header_rel, footer_rel)?;
        }
        w.end("w:pPr")?;
    }
    for child in node.children() {
        write_inline(w, child, ctx)?;
    }
    w.end("w:p")?;
    Ok(())
}

/// `pPr`'s body without the enclosing tag, so the section-embedding path
/// can splice in a trailing `sectPr` before closing it.
fn write_ppr_body(w: &mut XmlWriter, p: &ParagraphProperties) -> CodecResult<()> {
    if let Some(style_id) = &p.style_id {
        w.empty("w:pStyle", &[("w:val", style_id.clone())])?;
    }
    if let Some(numbering) = &p.numbering {
        w.start("w:numPr", &[])?;
        w.empty("w:ilvl", &[("w:val", numbering.level.to_string())])?;
        w.empty("w:numId", &[("w:val", numbering.num_id.to_string())])?;
        w.end("w:numPr")?;
    }
    if p.page_break_before == Some(true) {
        w.empty("w:pageBreakBefore", &[])?;
    }
    if let Some(alignment) = p.alignment {
        w.empty("w:jc", &[("w:val", alignment_to_str(alignment).to_string())])?;
    }
    if let Some(rp) = &p.run_properties {
        run_properties_to_xml(w, rp)?;
    }
    Ok(())
}

fn write_inline(w: &mut XmlWriter, node: &Node, ctx: &mut DocumentXmlContext) -> CodecResult<()> {
    match node.tag() {
        crate::model::Tag::Run => write_run(w, node),
        crate::model::Tag::Hyperlink => write_hyperlink(w, node, ctx),
        crate::model::Tag::Tab => {
            w.start("w:r", &[])?;
            w.empty("w:tab", &[])?;
            w.end("w:r")
        }
        crate::model::Tag::LineBreak => {
            w.start("w:r", &[])?;
            w.empty("w:br", &[])?;
            w.end("w:r")
        }
        crate::model::Tag::ColumnBreak => {
            w.start("w:r", &[])?;
            w.empty("w:br", &[("w:type", "column".to_string())])?;
            w.end("w:r")
        }
        crate::model::Tag::PageBreak => {
            w.start("w:r", &[])?;
            w.empty("w:br", &[("w:type", "page".to_string())])?;
            w.end("w:r")
        }
        crate::model::Tag::Drawing => write_drawing(w, node, ctx),
        _ => Ok(()),
    }
}

/// Write a run, honoring its revision metadata (§4.5.2 step 1): insertions
/// and deletions are wrapped in `w:ins`/`w:del`, deleted text uses
/// `w:delText` in place of `w:t`, and format-change revisions emit a
/// `w:rPrChange` inside the run's `w:rPr`.
fn write_run(w: &mut XmlWriter, node: &Node) -> CodecResult<()> {
    let props = node.properties().as_run().cloned().unwrap_or_default();
    let text = node.raw_text();
    match &props.revision {
        Some(rev) if rev.kind == RevisionKind::Insertion => {
            w.start("w:ins", &revision_attrs(rev))?;
            write_run_element(w, &props, &text, false)?;
            w.end("w:ins")
        }
        Some(rev) if rev.kind == RevisionKind::Deletion => {
            w.start("w:del", &revision_attrs(rev))?;
            write_run_element(w, &props, &text, true)?;
            w.end("w:del")
        }
        _ => write_run_element(w, &props, &text, false),
    }
}

fn write_run_element(w: &mut XmlWriter, props: &RunProperties, text: &str, is_deletion: bool) -> CodecResult<()> {
    w.start("w:r", &[])?;
    let has_format_change = matches!(&props.revision, Some(r) if r.kind == RevisionKind::FormatChange);
    let formatting_is_default = RunProperties { revision: None, ..props.clone() } == RunProperties::default();
    if !formatting_is_default || has_format_change {
        run_properties_to_xml(w, props)?;
    }
    if !text.is_empty() {
        let preserve = text.starts_with(' ') || text.ends_with(' ');
        let attrs: &[(&str, String)] =
            if preserve { &[("xml:space", "preserve".to_string())] } else { &[] };
        let tag = if is_deletion { "w:delText" } else { "w:t" };
        w.start(tag, attrs)?;
        w.text(text)?;
        w.end(tag)?;
    }
    w.end("w:r")?;
    Ok(())
}

fn write_hyperlink(w: &mut XmlWriter, node: &Node, ctx: &mut DocumentXmlContext) -> CodecResult<()> {
    let (target, is_external) = node.properties().as_hyperlink().unwrap_or(("", false));
    let mut attrs = Vec::new();
    if is_external {
        let rid = ctx.rels.register(
            &crate::codec::relationships::rel_type_uri("hyperlink"),
            target,
            TargetMode::External,
        );
        attrs.push(("r:id", rid));
    } else if let Some(anchor) = target.strip_prefix('#') {
        attrs.push(("w:anchor", anchor.to_string()));
    }
    w.start("w:hyperlink", &attrs)?;
    for child in node.children() {
        write_inline(w, child, ctx)?;
    }
    w.end("w:hyperlink")?;
    Ok(())
}

fn write_drawing(w: &mut XmlWriter, node: &Node, ctx: &mut DocumentXmlContext) -> CodecResult<()> {
    let props = node.properties().as_drawing().cloned().unwrap_or_default();
    let file_name = format!("image{}.png", ctx.media.len() + 1);
    if let Some(media_id) = &props.media_id {
        let target = format!("media/{file_name}");
        let rid = ctx.rels.register(&crate::codec::relationships::rel_type_uri("image"), &target, TargetMode::Internal);
        ctx.media.push((
            file_name.clone(),
            MediaAsset { content_type: "image/png".to_string(), data: decode_data_url(media_id), file_name },
        ));
        w.start("w:r", &[])?;
        w.start("w:drawing", &[])?;
        w.start("wp:inline", &[])?;
        w.empty("wp:extent", &[("cx", props.width_emu.to_string()), ("cy", props.height_emu.to_string())])?;
        w.start("a:graphic", &[("xmlns:a", crate::codec::DRAWING_MAIN_NS.to_string())])?;
        w.start(
            "a:graphicData",
            &[("uri", "http://schemas.openxmlformats.org/drawingml/2006/picture".to_string())],
        )?;
        w.start("pic:pic", &[("xmlns:pic", crate::codec::PICTURE_NS.to_string())])?;
        w.start("pic:blipFill", &[])?;
        w.empty("a:blip", &[("r:embed", rid)])?;
        w.end("pic:blipFill")?;
        w.end("pic:pic")?;
        w.end("a:graphicData")?;
        w.end("a:graphic")?;
        w.end("wp:inline")?;
        w.end("w:drawing")?;
        w.end("w:r")?;
    }
    Ok(())
}

fn decode_data_url(data_url: &str) -> Vec<u8> {
    use base64::Engine;
    data_url
        .split_once(",")
        .and_then(|(_, b64)| base64::engine::general_purpose::STANDARD.decode(b64).ok())
        .unwrap_or_default()
}

fn write_table(w: &mut XmlWriter, node: &Node, ctx: &mut DocumentXmlContext) -> CodecResult<()> {
    let props = node.properties().as_table().cloned().unwrap_or_default();
    w.start("w:tbl", &[])?;
    if let Some(style_id) = &props.style_id {
        w.start("w:tblPr", &[])?;
        w.empty("w:tblStyle", &[("w:val", style_id.clone())])?;
        w.end("w:tblPr")?;
    }
    if !props.column_widths.is_empty() {
        w.start("w:tblGrid", &[])?;
        for width in &props.column_widths {
            w.empty("w:gridCol", &[("w:w", width.to_string())])?;
        }
        w.end("w:tblGrid")?;
    }
    for row in node.children() {
        w.start("w:tr", &[])?;
        for cell in row.children() {
            write_table_cell(w, cell, ctx)?;
        }
        w.end("w:tr")?;
    }
    w.end("w:tbl")?;
    Ok(())
}

fn write_table_cell(w: &mut XmlWriter, node: &Node, ctx: &mut DocumentXmlContext) -> CodecResult<()> {
    let props = node.properties().as_table_cell().cloned().unwrap_or_default();
    w.start("w:tc", &[])?;
    if props.grid_span > 1 || props.width.is_some() {
        w.start("w:tcPr", &[])?;
        if let Some(width) = props.width {
            w.empty("w:tcW", &[("w:w", width.to_string()), ("w:type", "dxa".to_string())])?;
        }
        if props.grid_span > 1 {
            w.empty("w:gridSpan", &[("w:val", props.grid_span.to_string())])?;
        }
        w.end("w:tcPr")?;
    }
    for block in node.children() {
        write_block(w, block, ctx)?;
    }
    w.end("w:tc")?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codec::xml::parse_xml;

    #[test]
    fn alignment_justify_normalizes_to_both_and_back() {
        assert_eq!(alignment_to_str(Alignment::Justify), "both");
        assert_eq!(alignment_from_str("both"), Alignment::Justify);
    }

    #[test]
    fn run_properties_round_trip_bold() {
        let mut w = XmlWriter::new().unwrap();
        let props = RunProperties { bold: Some(true), ..Default::default() };
        run_properties_to_xml(&mut w, &props).unwrap();
        let bytes = w.into_bytes();
        let root = parse_xml(&bytes).unwrap();
        let parsed = run_properties_from_xml(&root);
        assert_eq!(parsed.bold, Some(true));
    }

    #[test]
    fn section_properties_round_trip_page_size() {
        let mut w = XmlWriter::new().unwrap();
        let props = SectionProperties::default();
        section_properties_to_xml(&mut w, &props, None, None).unwrap();
        let bytes = w.into_bytes();
        let root = parse_xml(&bytes).unwrap();
        let parsed = section_properties_from_xml(&root, &RelationshipTracker::new());
        assert_eq!(parsed.page_width, props.page_width);
        assert_eq!(parsed.margins.top, props.margins.top);
    }

}
