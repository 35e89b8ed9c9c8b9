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

//! Zip pack/unpack, grounded on the doco example's `ZipWriter`/`ZipArchive`
//! usage, adapted to operate on in-memory byte buffers rather than files
//! since `importDocx`/`exportDocx` are byte-in, byte-out (§6.3).

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::CodecResult;

/// Unzip `bytes` into a path -> contents map. Directory entries are
/// skipped. A non-zip input is surfaced as `CodecError::Malformed` by the
/// `zip` crate's own error, which maps through `CodecError::Zip`.
pub fn unpack(bytes: &[u8]) -> CodecResult<BTreeMap<String, Vec<u8>>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut out = BTreeMap::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let name = entry.name().to_string();
        if name.ends_with('/') {
            continue;
        }
        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;
        out.insert(name, data);
    }
    Ok(out)
}

pub struct PackPart {
    pub path: String,
    pub data: Vec<u8>,
    pub store_uncompressed: bool,
}

/// Pack `parts` into a zip, deflating XML parts and storing media payloads
/// uncompressed, per §4.5.2 step 5.
pub fn pack(parts: Vec<PackPart>) -> CodecResult<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for part in parts {
        let method = if part.store_uncompressed {
            CompressionMethod::Stored
        } else {
            CompressionMethod::Deflated
        };
        let options = SimpleFileOptions::default()
            .compression_method(method)
            .unix_permissions(0o644);
        zip.start_file(&part.path, options)?;
        zip.write_all(&part.data)?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pack_then_unpack_round_trips() {
        let parts = vec![
            PackPart { path: "a.xml".to_string(), data: b"<a/>".to_vec(), store_uncompressed: false },
            PackPart { path: "media/x.png".to_string(), data: vec![1, 2, 3], store_uncompressed: true },
        ];
        let bytes = pack(parts).unwrap();
        assert_eq!(&bytes[0..4], &[0x50, 0x4B, 0x03, 0x04]);
        let unpacked = unpack(&bytes).unwrap();
        assert_eq!(unpacked.get("a.xml").unwrap(), b"<a/>");
        assert_eq!(unpacked.get("media/x.png").unwrap(), &vec![1, 2, 3]);
    }
}
