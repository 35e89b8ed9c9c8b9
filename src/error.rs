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

//! Error kinds shared across the document model, operation algebra and codec.

use crate::model::Path;

/// Errors raised while applying an [`crate::operations::Op`] to a document.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("path {0:?} does not resolve to a node")]
    PathInvalid(Path),

    #[error("node at {path:?} has kind {actual}, expected {expected}")]
    TypeMismatch {
        path: Path,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("offset {offset} out of range for text of length {len} at {path:?}")]
    OffsetOutOfRange {
        path: Path,
        offset: usize,
        len: usize,
    },
}

/// Errors raised while importing or exporting an OOXML package.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("malformed package: {0}")]
    Malformed(String),

    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("xml attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("document model error: {0}")]
    Model(#[from] ModelError),
}

pub type ModelResult<T> = Result<T, ModelError>;
pub type CodecResult<T> = Result<T, CodecError>;
