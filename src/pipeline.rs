//! The straight-line merge pass, start to finish.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::movies::{columns, NumberTable, TextTable};
use crate::workbook::SheetSelector;
use crate::{clean, merge, report, workbook};

/// Position of the movie metadata sheet within the text workbook.
pub const TEXT_SHEET_INDEX: usize = 2;
/// Name of the financial-data sheet, reused for the output sheet.
pub const DECADE_SHEET: &str = "2010s";

/// Run the whole pipeline: load both workbooks, clean and type the tables,
/// join and enrich, print the two summaries, and write the sorted merge to
/// `out_path`.
pub fn run(
    text_path: impl AsRef<Path>,
    numbers_path: impl AsRef<Path>,
    out_path: impl AsRef<Path>,
) -> Result<merge::MergedTable> {
    let key_columns = [columns::TITLE, columns::YEAR];

    let text_sheet = workbook::read_sheet(&text_path, SheetSelector::Index(TEXT_SHEET_INDEX))?;
    let text_sheet = clean::clean_sheet(text_sheet, &key_columns)?;
    let text = TextTable::from_sheet(&text_sheet)?;

    let numbers_sheet = workbook::read_sheet(&numbers_path, SheetSelector::Name(DECADE_SHEET))?;
    let numbers_sheet = clean::clean_sheet(numbers_sheet, &key_columns)?;
    let numbers = NumberTable::from_sheet(&numbers_sheet)?;

    let mut merged = merge::join(text, numbers);

    let top = report::top_by_gross(&merged, 5);
    println!("{}", report::render_top_earners(&top));

    let means = report::yearly_mean_score(&merged);
    println!("{}", report::render_yearly_means(&means));

    merged.sort_by_year_title();
    workbook::write_merged(&merged, &out_path, DECADE_SHEET)?;

    info!(rows = merged.rows.len(), "pipeline complete");
    Ok(merged)
}
