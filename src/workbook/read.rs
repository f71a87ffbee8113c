use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook, Data, Reader, Xlsx};
use std::path::Path;
use tracing::{info, instrument};

use super::{Cell, RawSheet, SheetSelector};

/// Load one sheet of an .xlsx workbook into a [`RawSheet`].
///
/// The sheet's first row becomes the column names; every following row
/// becomes a data row. Fails if the file cannot be opened or the selected
/// sheet does not exist.
#[instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_sheet<P: AsRef<Path>>(path: P, selector: SheetSelector<'_>) -> Result<RawSheet> {
    let path = path.as_ref();
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("failed to open workbook {}", path.display()))?;

    let name = match selector {
        SheetSelector::Index(idx) => {
            let names = workbook.sheet_names();
            names.get(idx).cloned().ok_or_else(|| {
                anyhow!(
                    "workbook {} has {} sheets, none at position {}",
                    path.display(),
                    names.len(),
                    idx
                )
            })?
        }
        SheetSelector::Name(name) => name.to_string(),
    };

    let range = workbook
        .worksheet_range(&name)
        .with_context(|| format!("no readable sheet '{}' in {}", name, path.display()))?;

    let mut rows_iter = range.rows();
    let header_row = rows_iter
        .next()
        .ok_or_else(|| anyhow!("sheet '{}' of {} has no header row", name, path.display()))?;
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| Cell::from(cell).display_string().trim().to_string())
        .collect();

    let rows: Vec<Vec<Cell>> = rows_iter
        .map(|row| row.iter().map(Cell::from).collect())
        .collect();

    info!(sheet = %name, rows = rows.len(), cols = headers.len(), "loaded sheet");
    Ok(RawSheet { name, headers, rows })
}

impl From<&Data> for Cell {
    fn from(value: &Data) -> Self {
        match value {
            Data::Empty | Data::Error(_) => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        }
    }
}
