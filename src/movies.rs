//! Typed movie records and the sheet-to-record conversions.

use anyhow::{anyhow, bail, Result};
use tracing::{debug, warn};

use crate::workbook::{Cell, RawSheet};

/// Column names shared by the input sheets and the merged output.
pub mod columns {
    pub const TITLE: &str = "Title";
    pub const YEAR: &str = "Year";
    pub const BUDGET: &str = "Budget";
    pub const GROSS_EARNINGS: &str = "Gross Earnings";
    pub const IMDB_SCORE: &str = "IMDB Score";
    pub const NET_EARNINGS: &str = "Net Earnings";
}

/// Composite lookup key: a movie is identified by its title and year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MovieKey {
    pub title: String,
    pub year: i64,
}

impl MovieKey {
    pub fn new(title: impl Into<String>, year: i64) -> Self {
        MovieKey {
            title: title.into(),
            year,
        }
    }
}

/// One row of the text workbook: the key plus its textual attributes.
#[derive(Debug, Clone)]
pub struct TextRecord {
    pub key: MovieKey,
    /// Values for the table's `extra_columns`, one per column, in order.
    pub extras: Vec<Option<String>>,
}

/// The text workbook's movie metadata, keyed by (Title, Year).
#[derive(Debug)]
pub struct TextTable {
    /// Textual attribute columns beyond Title and Year, in sheet order.
    pub extra_columns: Vec<String>,
    pub rows: Vec<TextRecord>,
}

/// One row of the numbers workbook: financial figures and the IMDB score.
#[derive(Debug, Clone)]
pub struct NumberRecord {
    pub key: MovieKey,
    pub budget: Option<f64>,
    pub gross_earnings: Option<f64>,
    pub imdb_score: Option<f64>,
}

/// The numbers workbook's financial data, keyed by (Title, Year).
#[derive(Debug)]
pub struct NumberTable {
    pub rows: Vec<NumberRecord>,
}

impl TextTable {
    /// Convert a cleaned sheet into typed text records.
    ///
    /// Every column other than Title and Year rides along as a textual
    /// attribute. Rows whose year is not a whole number are dropped.
    pub fn from_sheet(sheet: &RawSheet) -> Result<Self> {
        let title_idx = required_column(sheet, columns::TITLE)?;
        let year_idx = required_column(sheet, columns::YEAR)?;

        let extra_indices: Vec<usize> = (0..sheet.headers.len())
            .filter(|&i| i != title_idx && i != year_idx && !sheet.headers[i].is_empty())
            .collect();
        let extra_columns: Vec<String> = extra_indices
            .iter()
            .map(|&i| sheet.headers[i].clone())
            .collect();

        let mut rows = Vec::with_capacity(sheet.rows.len());
        let mut bad_years = 0usize;
        for row in &sheet.rows {
            let Some(key) = record_key(row, title_idx, year_idx) else {
                bad_years += 1;
                continue;
            };
            let extras = extra_indices
                .iter()
                .map(|&i| match row.get(i) {
                    Some(cell) if !cell.is_missing() => Some(cell.display_string()),
                    _ => None,
                })
                .collect();
            rows.push(TextRecord { key, extras });
        }
        warn_bad_years(sheet, bad_years);

        debug!(rows = rows.len(), extras = extra_columns.len(), "typed text table");
        Ok(TextTable {
            extra_columns,
            rows,
        })
    }
}

impl NumberTable {
    /// Convert a cleaned sheet into typed number records.
    ///
    /// Budget, Gross Earnings and IMDB Score must exist as columns; a blank
    /// cell becomes `None`, while non-numeric text in any of them is fatal.
    pub fn from_sheet(sheet: &RawSheet) -> Result<Self> {
        let title_idx = required_column(sheet, columns::TITLE)?;
        let year_idx = required_column(sheet, columns::YEAR)?;
        let budget_idx = required_column(sheet, columns::BUDGET)?;
        let gross_idx = required_column(sheet, columns::GROSS_EARNINGS)?;
        let score_idx = required_column(sheet, columns::IMDB_SCORE)?;

        let mut rows = Vec::with_capacity(sheet.rows.len());
        let mut bad_years = 0usize;
        for (row_no, row) in sheet.rows.iter().enumerate() {
            let Some(key) = record_key(row, title_idx, year_idx) else {
                bad_years += 1;
                continue;
            };
            rows.push(NumberRecord {
                key,
                budget: numeric_cell(sheet, row_no, row, budget_idx)?,
                gross_earnings: numeric_cell(sheet, row_no, row, gross_idx)?,
                imdb_score: numeric_cell(sheet, row_no, row, score_idx)?,
            });
        }
        warn_bad_years(sheet, bad_years);

        debug!(rows = rows.len(), "typed number table");
        Ok(NumberTable { rows })
    }
}

fn required_column(sheet: &RawSheet, header: &str) -> Result<usize> {
    sheet
        .column_index(header)
        .ok_or_else(|| anyhow!("sheet '{}' has no column '{}'", sheet.name, header))
}

/// Build the (Title, Year) key for one row, or `None` when either part is
/// missing or the year is not a whole number.
fn record_key(row: &[Cell], title_idx: usize, year_idx: usize) -> Option<MovieKey> {
    let title = row.get(title_idx)?.display_string();
    let title = title.trim();
    if title.is_empty() {
        return None;
    }
    let year = row.get(year_idx)?.as_year()?;
    Some(MovieKey::new(title, year))
}

fn warn_bad_years(sheet: &RawSheet, count: usize) {
    if count > 0 {
        warn!(sheet = %sheet.name, dropped = count, "dropped rows without a usable (Title, Year) key");
    }
}

/// Numeric column access: blank cells are null, non-numeric text is fatal.
fn numeric_cell(sheet: &RawSheet, row_no: usize, row: &[Cell], idx: usize) -> Result<Option<f64>> {
    let cell = row.get(idx).unwrap_or(&Cell::Empty);
    if cell.is_missing() {
        return Ok(None);
    }
    match cell.as_number() {
        Some(v) => Ok(Some(v)),
        None => bail!(
            "non-numeric value '{}' in column '{}' of sheet '{}' (data row {})",
            cell.display_string(),
            sheet.headers[idx],
            sheet.name,
            row_no + 1
        ),
    }
}
