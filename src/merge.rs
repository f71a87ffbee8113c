//! Left join of the numbers table onto the text table, plus the derived
//! Net Earnings column.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use tracing::{debug, info, instrument, warn};

use crate::movies::{MovieKey, NumberRecord, NumberTable, TextTable};

/// One merged row: a text record with its matching numeric fields attached.
#[derive(Debug, Clone)]
pub struct MergedRecord {
    pub key: MovieKey,
    /// Values for the table's `extra_columns`, one per column, in order.
    pub extras: Vec<Option<String>>,
    pub budget: Option<f64>,
    pub gross_earnings: Option<f64>,
    pub imdb_score: Option<f64>,
    /// Gross Earnings − Budget, `None` when either operand is unknown.
    pub net_earnings: Option<f64>,
}

/// The merged, enriched dataset. The authoritative output of the pipeline.
#[derive(Debug)]
pub struct MergedTable {
    /// Textual attribute columns beyond Title and Year, in sheet order.
    pub extra_columns: Vec<String>,
    pub rows: Vec<MergedRecord>,
}

impl MergedTable {
    /// Sort rows ascending by (Year, Title). Stable, so equal keys keep
    /// their current order.
    pub fn sort_by_year_title(&mut self) {
        self.rows.sort_by(|a, b| {
            a.key
                .year
                .cmp(&b.key.year)
                .then_with(|| a.key.title.cmp(&b.key.title))
        });
    }
}

/// Left-join `numbers` onto `text` by (Title, Year) and derive Net Earnings.
///
/// Every text row survives; rows without a numeric match keep `None` in the
/// numeric fields. Duplicate keys on the numbers side keep the first
/// occurrence. Exact-duplicate merged rows are removed, first occurrence
/// wins.
#[instrument(level = "info", skip(text, numbers))]
pub fn join(text: TextTable, numbers: NumberTable) -> MergedTable {
    let mut by_key: HashMap<MovieKey, NumberRecord> = HashMap::with_capacity(numbers.rows.len());
    for rec in numbers.rows {
        match by_key.entry(rec.key.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(rec);
            }
            Entry::Occupied(_) => {
                warn!(title = %rec.key.title, year = rec.key.year, "duplicate key in numbers data, keeping first");
            }
        }
    }

    let TextTable {
        extra_columns,
        rows: text_rows,
    } = text;

    let mut rows = Vec::with_capacity(text_rows.len());
    let mut matched = 0usize;
    for rec in text_rows {
        let numbers = by_key.get(&rec.key);
        if numbers.is_some() {
            matched += 1;
        }
        let budget = numbers.and_then(|n| n.budget);
        let gross_earnings = numbers.and_then(|n| n.gross_earnings);
        let imdb_score = numbers.and_then(|n| n.imdb_score);
        rows.push(MergedRecord {
            net_earnings: net_earnings(gross_earnings, budget),
            key: rec.key,
            extras: rec.extras,
            budget,
            gross_earnings,
            imdb_score,
        });
    }
    info!(rows = rows.len(), matched, "joined tables");

    MergedTable {
        extra_columns,
        rows: dedup_exact(rows),
    }
}

/// Gross Earnings − Budget, `None` when either side is unknown.
pub fn net_earnings(gross: Option<f64>, budget: Option<f64>) -> Option<f64> {
    match (gross, budget) {
        (Some(g), Some(b)) => Some(g - b),
        _ => None,
    }
}

/// Remove rows that are exact duplicates across every column, keeping the
/// first occurrence and the surrounding order.
fn dedup_exact(rows: Vec<MergedRecord>) -> Vec<MergedRecord> {
    let before = rows.len();
    let mut seen: HashSet<RowFingerprint> = HashSet::with_capacity(rows.len());
    let rows: Vec<MergedRecord> = rows
        .into_iter()
        .filter(|rec| seen.insert(fingerprint(rec)))
        .collect();
    if rows.len() < before {
        debug!(removed = before - rows.len(), "removed exact-duplicate rows");
    }
    rows
}

/// Hashable image of a whole row. Floats compare by bit pattern so equal
/// cells match and NaN never aliases a number.
type RowFingerprint = (MovieKey, Vec<Option<String>>, [Option<u64>; 4]);

fn fingerprint(rec: &MergedRecord) -> RowFingerprint {
    (
        rec.key.clone(),
        rec.extras.clone(),
        [
            rec.budget.map(f64::to_bits),
            rec.gross_earnings.map(f64::to_bits),
            rec.imdb_score.map(f64::to_bits),
            rec.net_earnings.map(f64::to_bits),
        ],
    )
}
