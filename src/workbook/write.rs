use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tracing::{info, instrument};

use crate::merge::MergedTable;
use crate::movies::columns;

/// Persist the merged table as a single-sheet workbook.
///
/// Title and Year lead every row as the explicit label, followed by the
/// text extras in sheet order, then Budget, Gross Earnings, IMDB Score and
/// Net Earnings. Missing values are left as blank cells.
#[instrument(level = "info", skip(table, path), fields(path = %path.as_ref().display()))]
pub fn write_merged<P: AsRef<Path>>(table: &MergedTable, path: P, sheet_name: &str) -> Result<()> {
    let path = path.as_ref();
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name)
        .with_context(|| format!("invalid output sheet name '{sheet_name}'"))?;

    let mut headers: Vec<&str> = vec![columns::TITLE, columns::YEAR];
    headers.extend(table.extra_columns.iter().map(String::as_str));
    headers.extend([
        columns::BUDGET,
        columns::GROSS_EARNINGS,
        columns::IMDB_SCORE,
        columns::NET_EARNINGS,
    ]);
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (i, rec) in table.rows.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_string(row, 0, rec.key.title.as_str())?;
        worksheet.write_number(row, 1, rec.key.year as f64)?;

        let mut col: u16 = 2;
        for extra in &rec.extras {
            if let Some(text) = extra {
                worksheet.write_string(row, col, text)?;
            }
            col += 1;
        }
        for value in [
            rec.budget,
            rec.gross_earnings,
            rec.imdb_score,
            rec.net_earnings,
        ] {
            if let Some(v) = value {
                worksheet.write_number(row, col, v)?;
            }
            col += 1;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("failed to write workbook {}", path.display()))?;

    info!(rows = table.rows.len(), "wrote merged workbook");
    Ok(())
}
