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

//! End-to-end OOXML round-trip scenarios exercised through the public
//! crate surface rather than codec internals.

use docx_engine::model::node::new;
use docx_engine::model::properties::{
    Alignment, ParagraphProperties, Revision, RevisionKind, RunProperties, TableCellProperties,
    TableProperties,
};
use docx_engine::{export_docx, import_docx, Document, Tag};

#[test]
fn bold_run_round_trips_through_the_codec() {
    let mut doc = Document::empty();
    doc.root = new::document(new::body(vec![new::section(
        vec![new::paragraph(
            vec![new::run(vec![new::text("Bold")], RunProperties { bold: Some(true), ..Default::default() })],
            ParagraphProperties::default(),
        )],
        Default::default(),
    )]));

    let bytes = export_docx(&doc).expect("export should succeed");
    let reimported = import_docx(&bytes).expect("import should succeed");

    let section = &reimported.body().children()[0];
    let paragraph = &section.children()[0];
    let run = &paragraph.children()[0];
    assert_eq!(run.properties().as_run().unwrap().bold, Some(true));
    assert_eq!(run.raw_text(), "Bold");
}

#[test]
fn justify_alignment_normalizes_to_both_and_back() {
    let mut doc = Document::empty();
    let props = ParagraphProperties { alignment: Some(Alignment::Justify), ..Default::default() };
    doc.root = new::document(new::body(vec![new::section(
        vec![new::paragraph(vec![new::plain_run("x")], props)],
        Default::default(),
    )]));

    let bytes = export_docx(&doc).unwrap();
    let reimported = import_docx(&bytes).unwrap();
    let section = &reimported.body().children()[0];
    let paragraph = &section.children()[0];
    assert_eq!(paragraph.properties().as_paragraph().unwrap().alignment, Some(Alignment::Justify));
}

#[test]
fn table_structure_round_trips() {
    let mut doc = Document::empty();
    let row = new::table_row(vec![
        new::table_cell(
            vec![new::paragraph(vec![new::plain_run("A1")], ParagraphProperties::default())],
            TableCellProperties::default(),
        ),
        new::table_cell(
            vec![new::paragraph(vec![new::plain_run("B1")], ParagraphProperties::default())],
            TableCellProperties::default(),
        ),
    ]);
    let table = new::table(vec![row], TableProperties::default());
    doc.root = new::document(new::body(vec![new::section(vec![table], Default::default())]));

    let bytes = export_docx(&doc).unwrap();
    let reimported = import_docx(&bytes).unwrap();

    let section = &reimported.body().children()[0];
    let table = &section.children()[0];
    assert_eq!(table.tag(), Tag::Table);
    assert_eq!(table.children().len(), 1);
    let row = &table.children()[0];
    assert_eq!(row.children().len(), 2);
    assert_eq!(row.children()[0].raw_text(), "A1");
    assert_eq!(row.children()[1].raw_text(), "B1");
}

#[test]
fn metadata_title_round_trips() {
    let mut doc = Document::empty();
    doc.metadata.title = Some("Quarterly Report".to_string());

    let bytes = export_docx(&doc).unwrap();
    let reimported = import_docx(&bytes).unwrap();

    assert_eq!(reimported.metadata.title.as_deref(), Some("Quarterly Report"));
}

#[test]
fn inserted_run_revision_round_trips_through_the_codec() {
    let mut doc = Document::empty();
    let revision = Revision {
        kind: RevisionKind::Insertion,
        author: "Alice".to_string(),
        date: "2026-08-01T00:00:00Z".to_string(),
        id: 7,
    };
    doc.root = new::document(new::body(vec![new::section(
        vec![new::paragraph(
            vec![new::run(
                vec![new::text("added")],
                RunProperties { revision: Some(revision.clone()), ..Default::default() },
            )],
            ParagraphProperties::default(),
        )],
        Default::default(),
    )]));

    let bytes = export_docx(&doc).expect("export should succeed");
    let reimported = import_docx(&bytes).expect("import should succeed");

    let section = &reimported.body().children()[0];
    let paragraph = &section.children()[0];
    let run = &paragraph.children()[0];
    assert_eq!(run.raw_text(), "added");
    assert_eq!(run.properties().as_run().unwrap().revision, Some(revision));
}

#[test]
fn deleted_run_revision_round_trips_as_del_text() {
    let mut doc = Document::empty();
    let revision = Revision {
        kind: RevisionKind::Deletion,
        author: "Bob".to_string(),
        date: "2026-08-01T00:00:00Z".to_string(),
        id: 3,
    };
    doc.root = new::document(new::body(vec![new::section(
        vec![new::paragraph(
            vec![new::run(
                vec![new::text("removed")],
                RunProperties { revision: Some(revision.clone()), ..Default::default() },
            )],
            ParagraphProperties::default(),
        )],
        Default::default(),
    )]));

    let bytes = export_docx(&doc).expect("export should succeed");
    let reimported = import_docx(&bytes).expect("import should succeed");

    let section = &reimported.body().children()[0];
    let paragraph = &section.children()[0];
    let run = &paragraph.children()[0];
    assert_eq!(run.raw_text(), "removed");
    assert_eq!(run.properties().as_run().unwrap().revision, Some(revision));
}

#[test]
fn format_change_revision_round_trips_via_rpr_change() {
    let mut doc = Document::empty();
    let revision = Revision {
        kind: RevisionKind::FormatChange,
        author: "Carol".to_string(),
        date: "2026-08-01T00:00:00Z".to_string(),
        id: 11,
    };
    doc.root = new::document(new::body(vec![new::section(
        vec![new::paragraph(
            vec![new::run(
                vec![new::text("reformatted")],
                RunProperties {
                    bold: Some(true),
                    revision: Some(revision.clone()),
                    ..Default::default()
                },
            )],
            ParagraphProperties::default(),
        )],
        Default::default(),
    )]));

    let bytes = export_docx(&doc).expect("export should succeed");
    let reimported = import_docx(&bytes).expect("import should succeed");

    let section = &reimported.body().children()[0];
    let paragraph = &section.children()[0];
    let run = &paragraph.children()[0];
    assert_eq!(run.raw_text(), "reformatted");
    let run_props = run.properties().as_run().unwrap();
    assert_eq!(run_props.bold, Some(true));
    assert_eq!(run_props.revision, Some(revision));
}

#[test]
fn an_empty_document_round_trips() {
    let doc = Document::empty();
    let bytes = export_docx(&doc).unwrap();
    let reimported = import_docx(&bytes).unwrap();
    assert_eq!(reimported.sections().len(), 1);
}
