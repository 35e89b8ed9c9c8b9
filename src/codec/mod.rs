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

//! Bidirectional OOXML (.docx) codec (SPEC_FULL.md §4.5).
//!
//! Grounded on the doco example's `write_package`/`read_package_snapshot`
//! pair for the zip/relationship bookkeeping shape, with XML generation
//! upgraded from its hand-rolled string builder to `quick_xml`.

pub mod content_types;
pub mod document_xml;
pub mod export;
pub mod import;
pub mod metadata_xml;
pub mod notes_xml;
pub mod numbering_xml;
pub mod relationships;
pub mod styles_xml;
pub mod units;
pub mod xml;
pub mod zip_io;

pub use export::export_docx;
pub use import::import_docx;

pub const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const WORDPROCESSING_DRAWING_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
pub const DRAWING_MAIN_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const PICTURE_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
pub const MC_NS: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";
pub const MATH_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/math";
pub const WPS_NS: &str = "http://schemas.microsoft.com/office/word/2010/wordprocessingShape";
