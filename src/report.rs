//! Read-only summaries of the merged table, rendered for the console.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use comfy_table::{presets::UTF8_FULL, Table};

use crate::merge::{MergedRecord, MergedTable};
use crate::movies::{columns, MovieKey};

/// One row of the top-earnings view.
#[derive(Debug, Clone, PartialEq)]
pub struct TopEarner {
    pub key: MovieKey,
    pub gross_earnings: Option<f64>,
    pub net_earnings: Option<f64>,
    pub imdb_score: Option<f64>,
}

/// The `n` highest-grossing rows, descending by Gross Earnings.
///
/// The sort is stable, so ties keep the table's row order; rows without a
/// gross figure sort last. Does not mutate the table.
pub fn top_by_gross(table: &MergedTable, n: usize) -> Vec<TopEarner> {
    let mut view: Vec<&MergedRecord> = table.rows.iter().collect();
    view.sort_by(|a, b| gross_descending(a.gross_earnings, b.gross_earnings));
    view.into_iter()
        .take(n)
        .map(|rec| TopEarner {
            key: rec.key.clone(),
            gross_earnings: rec.gross_earnings,
            net_earnings: rec.net_earnings,
            imdb_score: rec.imdb_score,
        })
        .collect()
}

fn gross_descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Mean IMDB score per year, ascending by year.
///
/// Rows without a score are ignored; years where every score is missing are
/// omitted. Does not mutate the table.
pub fn yearly_mean_score(table: &MergedTable) -> BTreeMap<i64, f64> {
    let mut acc: BTreeMap<i64, (f64, u32)> = BTreeMap::new();
    for rec in &table.rows {
        if let Some(score) = rec.imdb_score {
            let slot = acc.entry(rec.key.year).or_insert((0.0, 0));
            slot.0 += score;
            slot.1 += 1;
        }
    }
    acc.into_iter()
        .map(|(year, (sum, count))| (year, sum / f64::from(count)))
        .collect()
}

/// Render the top-earners view as a console table.
pub fn render_top_earners(rows: &[TopEarner]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        columns::TITLE,
        columns::YEAR,
        columns::GROSS_EARNINGS,
        columns::NET_EARNINGS,
        columns::IMDB_SCORE,
    ]);
    for row in rows {
        table.add_row(vec![
            row.key.title.clone(),
            row.key.year.to_string(),
            fmt_opt(row.gross_earnings),
            fmt_opt(row.net_earnings),
            fmt_opt(row.imdb_score),
        ]);
    }
    table
}

/// Render the per-year mean scores as a console table.
pub fn render_yearly_means(means: &BTreeMap<i64, f64>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![columns::YEAR, columns::IMDB_SCORE]);
    for (year, mean) in means {
        table.add_row(vec![year.to_string(), format!("{mean:.2}")]);
    }
    table
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        Some(v) => format!("{v}"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, year: i64, gross: Option<f64>, score: Option<f64>) -> MergedRecord {
        MergedRecord {
            key: MovieKey::new(title, year),
            extras: vec![],
            budget: None,
            gross_earnings: gross,
            imdb_score: score,
            net_earnings: None,
        }
    }

    fn table(rows: Vec<MergedRecord>) -> MergedTable {
        MergedTable {
            extra_columns: vec![],
            rows,
        }
    }

    #[test]
    fn top_rows_dominate_the_rest() {
        let table = table(vec![
            record("A", 2015, Some(10.0), None),
            record("B", 2015, Some(50.0), None),
            record("C", 2015, Some(30.0), None),
            record("D", 2015, Some(40.0), None),
            record("E", 2015, Some(20.0), None),
            record("F", 2015, Some(25.0), None),
            record("G", 2015, None, None),
        ]);

        let top = top_by_gross(&table, 5);
        assert_eq!(top.len(), 5);
        let floor = top
            .iter()
            .filter_map(|r| r.gross_earnings)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(floor, 25.0);
        assert_eq!(top[0].key.title, "B");
        // excluded rows all gross below the floor
        assert!(table
            .rows
            .iter()
            .filter(|r| !top.iter().any(|t| t.key == r.key))
            .all(|r| r.gross_earnings.unwrap_or(f64::NEG_INFINITY) <= floor));
    }

    #[test]
    fn ties_keep_table_order() {
        let table = table(vec![
            record("First", 2015, Some(10.0), None),
            record("Second", 2016, Some(10.0), None),
            record("Third", 2017, Some(10.0), None),
        ]);

        let top = top_by_gross(&table, 2);
        assert_eq!(top[0].key.title, "First");
        assert_eq!(top[1].key.title, "Second");
    }

    #[test]
    fn missing_gross_sorts_last() {
        let table = table(vec![
            record("Unknown", 2015, None, None),
            record("Known", 2015, Some(1.0), None),
        ]);

        let top = top_by_gross(&table, 2);
        assert_eq!(top[0].key.title, "Known");
        assert_eq!(top[1].key.title, "Unknown");
    }

    #[test]
    fn yearly_mean_is_arithmetic() {
        let table = table(vec![
            record("A", 2015, None, Some(7.0)),
            record("B", 2015, None, Some(8.0)),
            record("C", 2015, None, Some(9.0)),
            record("D", 2014, None, Some(6.5)),
        ]);

        let means = yearly_mean_score(&table);
        assert_eq!(means.get(&2015), Some(&8.0));
        assert_eq!(means.get(&2014), Some(&6.5));
        // ascending by year
        assert_eq!(means.keys().copied().collect::<Vec<_>>(), vec![2014, 2015]);
    }

    #[test]
    fn unscored_rows_and_years_are_ignored() {
        let table = table(vec![
            record("A", 2015, None, Some(8.0)),
            record("B", 2015, None, None),
            record("C", 2013, None, None),
        ]);

        let means = yearly_mean_score(&table);
        assert_eq!(means.get(&2015), Some(&8.0));
        assert!(!means.contains_key(&2013));
    }

    #[test]
    fn views_leave_the_table_untouched() {
        let table = table(vec![
            record("B", 2016, Some(5.0), Some(7.0)),
            record("A", 2015, Some(9.0), Some(6.0)),
        ]);

        let _ = top_by_gross(&table, 5);
        let _ = yearly_mean_score(&table);
        assert_eq!(table.rows[0].key.title, "B");
        assert_eq!(table.rows[1].key.title, "A");
    }

    #[test]
    fn renders_blank_cells_for_missing_values() {
        let top = vec![TopEarner {
            key: MovieKey::new("A", 2015),
            gross_earnings: Some(30.0),
            net_earnings: None,
            imdb_score: Some(7.5),
        }];

        let rendered = render_top_earners(&top).to_string();
        assert!(rendered.contains("A"));
        assert!(rendered.contains("30"));
        assert!(rendered.contains("7.5"));
    }
}
