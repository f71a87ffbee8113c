use anyhow::{anyhow, Result};
use tracing::{debug, instrument, warn};

use crate::movies::columns;
use crate::workbook::{Cell, RawSheet};

/// Drop rows missing a value in any required column and trim the title text.
///
/// Missing-data rows are dropped silently per the source data's convention;
/// the aggregate count is logged so a shrinking dataset stays visible.
/// Never adds rows.
#[instrument(level = "debug", skip(sheet, required), fields(sheet = %sheet.name))]
pub fn clean_sheet(mut sheet: RawSheet, required: &[&str]) -> Result<RawSheet> {
    let required_idx: Vec<usize> = required
        .iter()
        .map(|col| {
            sheet
                .column_index(col)
                .ok_or_else(|| anyhow!("sheet '{}' has no column '{}'", sheet.name, col))
        })
        .collect::<Result<_>>()?;

    let before = sheet.rows.len();
    sheet.rows.retain(|row| {
        required_idx
            .iter()
            .all(|&i| row.get(i).is_some_and(|cell| !cell.is_missing()))
    });
    let dropped = before - sheet.rows.len();
    if dropped > 0 {
        warn!(dropped, kept = sheet.rows.len(), "dropped rows with missing key values");
    }

    if let Some(title_idx) = sheet.column_index(columns::TITLE) {
        for row in &mut sheet.rows {
            if let Some(Cell::Text(s)) = row.get_mut(title_idx) {
                let trimmed = s.trim();
                if trimmed.len() != s.len() {
                    *s = trimmed.to_string();
                }
            }
        }
    }

    debug!(rows = sheet.rows.len(), "cleaned sheet");
    Ok(sheet)
}
