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

//! Table editing (SPEC_FULL.md §4.4.4).
//!
//! No teacher analog exists (the teacher has no tables); grounded in style
//! on the short apply-sequence-in-one-batch pattern used throughout
//! `composer_model/*.rs`.

use crate::editor::selection::Selection;
use crate::editor::Editor;
use crate::error::ModelError;
use crate::model::node::new;
use crate::model::properties::{TableCellProperties, TableProperties};
use crate::model::{Path, Tag};
use crate::operations::Op;

/// Build a fresh `rows x cols` table, each cell seeded with one empty
/// paragraph, and insert it at `at` (a path within a section's children).
pub fn insert_table(editor: &mut Editor, at: Path, rows: usize, cols: usize) -> Result<(), ModelError> {
    let table_node = build_table(rows, cols);
    editor.apply(Op::InsertNode {
        path: at,
        node: table_node,
    })
}

fn build_table(rows: usize, cols: usize) -> crate::model::Node {
    let row_nodes: Vec<_> = (0..rows)
        .map(|_| {
            let cells: Vec<_> = (0..cols)
                .map(|_| new::table_cell(vec![new::empty_paragraph()], TableCellProperties::default()))
                .collect();
            new::table_row(cells)
        })
        .collect();
    new::table(row_nodes, TableProperties::default())
}

fn row_count(editor: &Editor, table_path: &Path) -> Result<usize, ModelError> {
    Ok(editor.document().lookup_element(table_path)?.children.len())
}

fn col_count(editor: &Editor, table_path: &Path, row_idx: usize) -> Result<usize, ModelError> {
    let row_path = table_path.child(row_idx);
    Ok(editor.document().lookup_element(&row_path)?.children.len())
}

pub fn insert_row(editor: &mut Editor, table_path: Path, at_index: usize) -> Result<(), ModelError> {
    let cols = col_count(editor, &table_path, 0)?;
    let cells: Vec<_> = (0..cols)
        .map(|_| new::table_cell(vec![new::empty_paragraph()], TableCellProperties::default()))
        .collect();
    editor.apply(Op::InsertNode {
        path: table_path.child(at_index),
        node: new::table_row(cells),
    })
}

pub fn insert_column(editor: &mut Editor, table_path: Path, at_index: usize) -> Result<(), ModelError> {
    let rows = row_count(editor, &table_path)?;
    editor.batch(|editor| {
        for row_idx in 0..rows {
            editor.apply(Op::InsertNode {
                path: table_path.child(row_idx).child(at_index),
                node: new::table_cell(vec![new::empty_paragraph()], TableCellProperties::default()),
            })?;
        }
        Ok(())
    })
}

/// Remove a row; if it was the last one, remove the whole table.
pub fn delete_row(editor: &mut Editor, table_path: Path, row_index: usize) -> Result<(), ModelError> {
    let rows = row_count(editor, &table_path)?;
    if rows <= 1 {
        let node = editor.document().lookup_node(&table_path)?.clone();
        return editor.apply(Op::RemoveNode {
            path: table_path,
            node,
        });
    }
    let row_path = table_path.child(row_index);
    let node = editor.document().lookup_node(&row_path)?.clone();
    editor.apply(Op::RemoveNode {
        path: row_path,
        node,
    })
}

/// Remove a column; if it was the last one, remove the whole table.
pub fn delete_column(editor: &mut Editor, table_path: Path, col_index: usize) -> Result<(), ModelError> {
    let cols = col_count(editor, &table_path, 0)?;
    if cols <= 1 {
        let node = editor.document().lookup_node(&table_path)?.clone();
        return editor.apply(Op::RemoveNode {
            path: table_path,
            node,
        });
    }
    let rows = row_count(editor, &table_path)?;
    editor.batch(|editor| {
        for row_idx in (0..rows).rev() {
            let cell_path = table_path.child(row_idx).child(col_index);
            let node = editor.document().lookup_node(&cell_path)?.clone();
            editor.apply(Op::RemoveNode {
                path: cell_path,
                node,
            })?;
        }
        Ok(())
    })
}

/// Merge the cell at `(row, col)` with its right neighbour: append the
/// neighbour's blocks, remove it, and grow `gridSpan`.
pub fn merge_horizontal(
    editor: &mut Editor,
    table_path: Path,
    row: usize,
    col: usize,
) -> Result<(), ModelError> {
    editor.batch(|editor| {
        let row_path = table_path.child(row);
        let left_path = row_path.child(col);
        let right_path = row_path.child(col + 1);
        let right = editor.document().lookup_element(&right_path)?.clone();
        let left = editor.document().lookup_element(&left_path)?.clone();

        for (i, block) in right.children.iter().enumerate() {
            editor.apply(Op::InsertNode {
                path: left_path.child(left.children.len() + i),
                node: block.clone(),
            })?;
        }
        editor.apply(Op::RemoveNode {
            path: right_path,
            node: crate::model::Node::Element(right.clone()),
        })?;

        let mut props = left.properties.as_table_cell_or_default();
        props.grid_span += right.properties.as_table_cell_or_default().grid_span;
        editor.apply(Op::SetProperties {
            path: left_path,
            properties: crate::model::Properties::TableCell(props),
            old_properties: left.properties,
        })?;
        Ok(())
    })
}

trait AsTableCellOrDefault {
    fn as_table_cell_or_default(&self) -> TableCellProperties;
}

impl AsTableCellOrDefault for crate::model::Properties {
    fn as_table_cell_or_default(&self) -> TableCellProperties {
        match self {
            crate::model::Properties::TableCell(p) => *p,
            _ => TableCellProperties::default(),
        }
    }
}

/// Split a merged cell back into `gridSpan` single cells.
pub fn split_cell(editor: &mut Editor, cell_path: Path) -> Result<(), ModelError> {
    editor.batch(|editor| {
        let cell = editor.document().lookup_element(&cell_path)?.clone();
        let old_span = cell.properties.as_table_cell_or_default().grid_span;
        if old_span <= 1 {
            return Ok(());
        }
        let mut props = cell.properties.as_table_cell_or_default();
        props.grid_span = 1;
        editor.apply(Op::SetProperties {
            path: cell_path.clone(),
            properties: crate::model::Properties::TableCell(props),
            old_properties: cell.properties,
        })?;
        let index = cell_path.index_in_parent().unwrap_or(0);
        let row_path = cell_path.parent().ok_or(ModelError::PathInvalid(cell_path.clone()))?;
        for i in 1..old_span {
            editor.apply(Op::InsertNode {
                path: row_path.child(index + i as usize),
                node: new::table_cell(vec![new::empty_paragraph()], TableCellProperties::default()),
            })?;
        }
        Ok(())
    })
}

/// Walk up from `path` to the nearest enclosing node tagged `tag`, inclusive
/// of `path` itself.
fn find_ancestor(editor: &Editor, path: &Path, tag: Tag) -> Option<Path> {
    let mut current = path.clone();
    loop {
        if editor.document().lookup_node(&current).map(|n| n.tag()) == Ok(tag) {
            return Some(current);
        }
        current = current.parent()?;
    }
}

/// The `(table_path, row, col)` of the table cell containing the cursor, if
/// any.
fn current_cell(editor: &Editor) -> Option<(Path, usize, usize)> {
    let cursor_path = editor.selection().anchor.path.clone();
    let cell_path = find_ancestor(editor, &cursor_path, Tag::TableCell)?;
    let row_path = cell_path.parent()?;
    let table_path = row_path.parent()?;
    Some((table_path, row_path.index_in_parent()?, cell_path.index_in_parent()?))
}

fn collapse_into_cell(editor: &mut Editor, cell_path: &Path) -> Result<(), ModelError> {
    let text_path = editor.document().first_text_path_under(cell_path)?;
    editor.set_selection(Selection::collapse(text_path, 0));
    Ok(())
}

/// Move the cursor to the next cell (left to right, then down a row), per
/// §4.4.4 ("Tab/Shift+Tab navigates next/previous cell"). Tab past the last
/// cell of the table inserts a fresh row and moves into its first cell.
pub fn next_cell(editor: &mut Editor) -> Result<(), ModelError> {
    let Some((table_path, row, col)) = current_cell(editor) else {
        return Ok(());
    };
    let cols = col_count(editor, &table_path, row)?;
    let rows = row_count(editor, &table_path)?;

    if col + 1 < cols {
        return collapse_into_cell(editor, &table_path.child(row).child(col + 1));
    }
    if row + 1 < rows {
        return collapse_into_cell(editor, &table_path.child(row + 1).child(0));
    }
    editor.batch(|editor| {
        insert_row(editor, table_path.clone(), rows)?;
        collapse_into_cell(editor, &table_path.child(rows).child(0))
    })
}

/// Move the cursor to the previous cell (right to left, then up a row), per
/// §4.4.4. No-op at the first cell of the table.
pub fn previous_cell(editor: &mut Editor) -> Result<(), ModelError> {
    let Some((table_path, row, col)) = current_cell(editor) else {
        return Ok(());
    };

    if col > 0 {
        return collapse_into_cell(editor, &table_path.child(row).child(col - 1));
    }
    if row > 0 {
        let prev_row_cols = col_count(editor, &table_path, row - 1)?;
        return collapse_into_cell(editor, &table_path.child(row - 1).child(prev_row_cols - 1));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::editor::EditorConfig;
    use crate::model::Document;

    fn editor_with_table() -> (Editor, Path) {
        let table = build_table(1, 2);
        let section = new::section(vec![table], Default::default());
        let doc = Document::with_root(new::document(new::body(vec![section])));
        (Editor::new(doc, EditorConfig::default()), Path::from_indices(vec![0, 0, 0]))
    }

    #[test]
    fn table_round_trip_shape() {
        let (editor, table_path) = editor_with_table();
        let table = editor.document().lookup_element(&table_path).unwrap();
        assert_eq!(table.children.len(), 1);
        assert_eq!(table.children[0].children().len(), 2);
    }

    #[test]
    fn delete_last_row_removes_whole_table() {
        let (mut editor, table_path) = editor_with_table();
        delete_row(&mut editor, table_path.clone(), 0).unwrap();
        let section = editor.document().lookup_element(&Path::from_indices(vec![0, 0])).unwrap();
        assert!(section.children.is_empty());
    }

    #[test]
    fn merge_horizontal_grows_span_and_removes_right_cell() {
        let (mut editor, table_path) = editor_with_table();
        merge_horizontal(&mut editor, table_path.clone(), 0, 0).unwrap();
        let row = editor.document().lookup_element(&table_path.child(0)).unwrap();
        assert_eq!(row.children.len(), 1);
        let cell_props = row.children[0].properties().as_table_cell_or_default();
        assert_eq!(cell_props.grid_span, 2);
    }

    #[test]
    fn next_cell_advances_within_row() {
        let (mut editor, table_path) = editor_with_table();
        let cell0 = editor.document().first_text_path_under(&table_path.child(0).child(0)).unwrap();
        editor.set_selection(Selection::collapse(cell0, 0));

        next_cell(&mut editor).unwrap();

        let (found_table, row, col) = current_cell(&editor).unwrap();
        assert_eq!(found_table, table_path);
        assert_eq!((row, col), (0, 1));
    }

    #[test]
    fn next_cell_past_last_inserts_row() {
        let (mut editor, table_path) = editor_with_table();
        let last_cell = editor.document().first_text_path_under(&table_path.child(0).child(1)).unwrap();
        editor.set_selection(Selection::collapse(last_cell, 0));

        next_cell(&mut editor).unwrap();

        assert_eq!(row_count(&editor, &table_path).unwrap(), 2);
        let (found_table, row, col) = current_cell(&editor).unwrap();
        assert_eq!(found_table, table_path);
        assert_eq!((row, col), (1, 0));
    }

    #[test]
    fn previous_cell_is_noop_at_first_cell() {
        let (mut editor, table_path) = editor_with_table();
        let cell0 = editor.document().first_text_path_under(&table_path.child(0).child(0)).unwrap();
        editor.set_selection(Selection::collapse(cell0.clone(), 0));

        previous_cell(&mut editor).unwrap();

        assert_eq!(editor.selection().anchor.path, cell0);
    }
}
