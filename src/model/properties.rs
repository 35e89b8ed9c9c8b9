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

//! Tag-specific property records.
//!
//! The source format's polymorphic, string-keyed property bags become flat
//! structs of `Option<T>` fields here: the closed key set per tag is fixed,
//! so there is no need for a dynamic map (see SPEC_FULL.md design notes).

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnderlineStyle {
    None,
    Single,
    Double,
    Thick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionKind {
    Insertion,
    Deletion,
    FormatChange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub kind: RevisionKind,
    pub author: String,
    pub date: String,
    pub id: u32,
}

/// Character-level formatting carried by a `run` node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunProperties {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<UnderlineStyle>,
    pub strikethrough: Option<bool>,
    pub superscript: Option<bool>,
    pub subscript: Option<bool>,
    pub font_family: Option<String>,
    pub font_size_half_points: Option<u32>,
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub highlight: Option<String>,
    pub all_caps: Option<bool>,
    pub small_caps: Option<bool>,
    pub letter_spacing: Option<i32>,
    pub language: Option<String>,
    pub style_id: Option<String>,
    pub revision: Option<Revision>,
}

impl RunProperties {
    /// Merge `patch` onto `self`, per `set_properties`'s shallow-merge
    /// semantics: every `Some` field in `patch` overwrites; `None` leaves
    /// the existing value untouched (there is no separate "delete" sentinel
    /// since every field is already optional).
    pub fn merged_with(&self, patch: &RunProperties) -> RunProperties {
        RunProperties {
            bold: patch.bold.or(self.bold),
            italic: patch.italic.or(self.italic),
            underline: patch.underline.or(self.underline),
            strikethrough: patch.strikethrough.or(self.strikethrough),
            superscript: patch.superscript.or(self.superscript),
            subscript: patch.subscript.or(self.subscript),
            font_family: patch.font_family.clone().or_else(|| self.font_family.clone()),
            font_size_half_points: patch.font_size_half_points.or(self.font_size_half_points),
            color: patch.color.clone().or_else(|| self.color.clone()),
            background_color: patch
                .background_color
                .clone()
                .or_else(|| self.background_color.clone()),
            highlight: patch.highlight.clone().or_else(|| self.highlight.clone()),
            all_caps: patch.all_caps.or(self.all_caps),
            small_caps: patch.small_caps.or(self.small_caps),
            letter_spacing: patch.letter_spacing.or(self.letter_spacing),
            language: patch.language.clone().or_else(|| self.language.clone()),
            style_id: patch.style_id.clone().or_else(|| self.style_id.clone()),
            revision: patch.revision.clone().or_else(|| self.revision.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
    Distribute,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Spacing {
    pub before: Option<u32>,
    pub after: Option<u32>,
    pub line: Option<u32>,
    pub line_rule: Option<LineRule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRule {
    Auto,
    Exact,
    AtLeast,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Indent {
    pub left: Option<i32>,
    pub right: Option<i32>,
    pub first_line: Option<i32>,
    pub hanging: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Numbering {
    pub num_id: u32,
    pub level: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Borders {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
    pub between: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabStop {
    pub position: i32,
    pub alignment: Alignment,
}

/// Block-level formatting carried by a `paragraph` node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphProperties {
    pub style_id: Option<String>,
    pub alignment: Option<Alignment>,
    pub spacing: Option<Spacing>,
    pub indent: Option<Indent>,
    pub numbering: Option<Numbering>,
    pub outline_level: Option<u8>,
    pub keep_next: Option<bool>,
    pub keep_lines: Option<bool>,
    pub page_break_before: Option<bool>,
    pub widow_control: Option<bool>,
    pub borders: Option<Borders>,
    pub shading: Option<String>,
    pub tabs: Vec<TabStop>,
    pub run_properties: Option<RunProperties>,
}

impl ParagraphProperties {
    pub fn merged_with(&self, patch: &ParagraphProperties) -> ParagraphProperties {
        ParagraphProperties {
            style_id: patch.style_id.clone().or_else(|| self.style_id.clone()),
            alignment: patch.alignment.or(self.alignment),
            spacing: patch.spacing.or(self.spacing),
            indent: patch.indent.or(self.indent),
            numbering: patch.numbering.or(self.numbering),
            outline_level: patch.outline_level.or(self.outline_level),
            keep_next: patch.keep_next.or(self.keep_next),
            keep_lines: patch.keep_lines.or(self.keep_lines),
            page_break_before: patch.page_break_before.or(self.page_break_before),
            widow_control: patch.widow_control.or(self.widow_control),
            borders: patch.borders.or(self.borders),
            shading: patch.shading.clone().or_else(|| self.shading.clone()),
            tabs: if patch.tabs.is_empty() {
                self.tabs.clone()
            } else {
                patch.tabs.clone()
            },
            run_properties: patch
                .run_properties
                .clone()
                .or_else(|| self.run_properties.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageMargins {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
    pub header: i32,
    pub footer: i32,
    pub gutter: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    pub count: u8,
    pub space: u32,
    pub separator: bool,
}

/// Page geometry carried by a `section` node.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionProperties {
    pub page_width: u32,
    pub page_height: u32,
    pub margins: PageMargins,
    pub orientation: Orientation,
    pub columns: Columns,
    pub header_ref: Option<String>,
    pub footer_ref: Option<String>,
    pub first_header_ref: Option<String>,
    pub first_footer_ref: Option<String>,
    pub even_header_ref: Option<String>,
    pub even_footer_ref: Option<String>,
    pub title_page: bool,
    pub line_numbering: bool,
}

impl Default for SectionProperties {
    fn default() -> Self {
        // US Letter, 1 inch margins: the teacher has no analog for page
        // geometry, so these defaults follow OOXML's own documented
        // defaults (12240x15840 twips, 1440 twip margins).
        SectionProperties {
            page_width: 12240,
            page_height: 15840,
            margins: PageMargins {
                top: 1440,
                right: 1440,
                bottom: 1440,
                left: 1440,
                header: 720,
                footer: 720,
                gutter: 0,
            },
            orientation: Orientation::Portrait,
            columns: Columns {
                count: 1,
                space: 720,
                separator: false,
            },
            header_ref: None,
            footer_ref: None,
            first_header_ref: None,
            first_footer_ref: None,
            even_header_ref: None,
            even_footer_ref: None,
            title_page: false,
            line_numbering: false,
        }
    }
}

/// Table/row/cell-level properties; kept minimal as the algebra only needs
/// `grid_span` for merge/split (§4.4.4) plus column widths for export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableProperties {
    pub style_id: Option<String>,
    pub column_widths: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableCellProperties {
    pub grid_span: u32,
    pub width: Option<u32>,
}

impl Default for TableCellProperties {
    fn default() -> Self {
        TableCellProperties {
            grid_span: 1,
            width: None,
        }
    }
}

/// Properties attached to a `drawing` leaf.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawingProperties {
    pub media_id: Option<String>,
    pub width_emu: u32,
    pub height_emu: u32,
    pub alt_text: Option<String>,
}

/// Union of every tag's property record. A node only ever populates the
/// variant matching its tag; constructors in `model::node` enforce this.
#[derive(Debug, Clone, PartialEq)]
pub enum Properties {
    None,
    Run(RunProperties),
    Paragraph(ParagraphProperties),
    Section(SectionProperties),
    Table(TableProperties),
    TableCell(TableCellProperties),
    Drawing(DrawingProperties),
    Hyperlink { target: String, is_external: bool },
    Text(String),
    Extra(BTreeMap<String, String>),
}

impl Properties {
    pub fn as_run(&self) -> Option<&RunProperties> {
        match self {
            Properties::Run(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_run_mut(&mut self) -> Option<&mut RunProperties> {
        match self {
            Properties::Run(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_paragraph(&self) -> Option<&ParagraphProperties> {
        match self {
            Properties::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Properties::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_section(&self) -> Option<&SectionProperties> {
        match self {
            Properties::Section(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&TableProperties> {
        match self {
            Properties::Table(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_table_cell(&self) -> Option<&TableCellProperties> {
        match self {
            Properties::TableCell(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_drawing(&self) -> Option<&DrawingProperties> {
        match self {
            Properties::Drawing(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_hyperlink(&self) -> Option<(&str, bool)> {
        match self {
            Properties::Hyperlink { target, is_external } => Some((target.as_str(), *is_external)),
            _ => None,
        }
    }
}
