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

//! The immutable, path-addressed document tree plus its side registries.

pub mod document;
pub mod node;
pub mod path;
pub mod properties;
pub mod registries;
pub mod tag;

pub use document::Document;
pub use node::{ElementNode, LeafNode, Node};
pub use path::{Path, Point};
pub use properties::Properties;
pub use tag::Tag;
