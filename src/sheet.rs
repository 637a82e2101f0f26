use std::path::Path;

use anyhow::{Context, Result, anyhow};
use calamine::{Data, DataType, Range, Reader, open_workbook_auto};
use chrono::NaiveDate;

pub const DEFAULT_WORKBOOK: &str = "all scores.xlsx";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

static EMPTY: Cell = Cell::Empty;

impl Cell {
    /// Trimmed text form of the cell; `None` for empty or blank cells.
    pub fn text(&self) -> Option<String> {
        let raw = match self {
            Cell::Empty => return None,
            Cell::Text(s) => s.clone(),
            // Keeps the trailing `.0`, so a numeric name cell reads "5.0".
            Cell::Number(v) => format!("{v:?}"),
            Cell::Bool(true) => "True".to_string(),
            Cell::Bool(false) => "False".to_string(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Numeric reading of the cell. Text is accepted when it parses as a
    /// finite float; dates and empty cells are not numbers.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Cell::Number(v) => *v,
            Cell::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Empty | Cell::Date(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Whole sheet addressed from A1, regardless of where the used range starts.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
    width: usize,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self { rows, width }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&EMPTY)
    }
}

pub fn load_first_sheet(path: &Path) -> Result<Grid> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("open workbook {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("workbook {} has no sheets", path.display()))?
        .with_context(|| format!("read first sheet of {}", path.display()))?;
    Ok(grid_from_range(&range))
}

pub fn grid_from_range(range: &Range<Data>) -> Grid {
    let Some((start_row, start_col)) = range.start() else {
        return Grid::default();
    };
    let start_row = start_row as usize;
    let start_col = start_col as usize;

    let mut rows = vec![Vec::new(); start_row];
    for source in range.rows() {
        let mut row = vec![Cell::Empty; start_col];
        row.extend(source.iter().map(convert_cell));
        rows.push(row);
    }
    Grid::from_rows(rows)
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(v) => Cell::Number(*v),
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) => data
            .as_date()
            .map(Cell::Date)
            .unwrap_or_else(|| Cell::Text(data.to_string())),
        other => Cell::Text(other.to_string()),
    }
}
