use chrono::NaiveDate;

use crate::model::DateColumn;
use crate::sheet::{Cell, Grid};

/// Columns 0..=3 hold the player name and row labels.
pub const FIRST_DATE_COLUMN: usize = 4;
pub const HEADER_ROW: usize = 0;

/// Parses `M/D/YY` or `M/D/YYYY` into `YYYY-MM-DD`. Two-digit years are
/// read as 20xx.
pub fn parse_date(raw: &str) -> Option<String> {
    let parts = raw.trim().split('/').collect::<Vec<_>>();
    let [month, day, year] = parts.as_slice() else {
        return None;
    };

    let month = month.trim().parse::<u32>().ok()?;
    let day = day.trim().parse::<u32>().ok()?;

    let year = year.trim();
    if !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year = match year.len() {
        2 => format!("20{year}"),
        4 => year.to_string(),
        _ => return None,
    };

    Some(format!("{year}-{month:02}-{day:02}"))
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn header_cell_date(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Text(raw) => parse_date(raw),
        Cell::Date(date) => Some(format_iso(*date)),
        _ => None,
    }
}

/// Collects the dated columns of the header row. Columns whose header does
/// not read as a date are left out.
pub fn date_columns(grid: &Grid) -> Vec<DateColumn> {
    (FIRST_DATE_COLUMN..grid.width())
        .filter_map(|column| {
            header_cell_date(grid.cell(HEADER_ROW, column))
                .map(|date| DateColumn { column, date })
        })
        .collect()
}
