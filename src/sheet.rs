use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Format, Workbook};

use crate::error::ExtractError;
use crate::parser::Record;

pub const HEADERS: [&str; 3] = ["Name", "Phone", "Email"];

/// Write records to a single-sheet workbook, one row per record, under a
/// `Name | Phone | Email` header. An empty slice still produces the header.
pub fn write_records(path: &Path, records: &[Record]) -> Result<(), ExtractError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }

    for (i, r) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, &r.name)?;
        sheet.write_string(row, 1, &r.phone)?;
        sheet.write_string(row, 2, &r.email)?;
    }

    workbook.save(path)?;
    Ok(())
}

/// First worksheet of a workbook, every cell rendered as text.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Resolve every named column or report all the missing ones at once.
    pub fn require_columns(&self, names: &[String]) -> Result<Vec<usize>, ExtractError> {
        let missing: Vec<String> = names
            .iter()
            .filter(|n| self.column(n).is_none())
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ExtractError::MissingColumns { missing });
        }
        Ok(names.iter().filter_map(|n| self.column(n)).collect())
    }

    /// Cell text, empty when the row is shorter than the header.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

pub fn read_table(path: &Path) -> Result<Table, ExtractError> {
    if !path.is_file() {
        return Err(ExtractError::MissingInput(path.to_path_buf()));
    }

    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range_at(0).ok_or(ExtractError::EmptyWorkbook)??;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());
    let headers = rows.next().unwrap_or_default();

    Ok(Table {
        headers,
        rows: rows.collect(),
    })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{:.0}", f),
        other => other.to_string(),
    }
}

// ── Tests ──
