use std::fmt;

use crate::error::ToolsError;

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    /// Numeric value of the cell, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Parse a raw CSV field: number first, text otherwise.
    pub fn parse(field: &str) -> Cell {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(v) => Cell::Number(v),
            Err(_) => Cell::Text(field.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Empty => Ok(()),
        }
    }
}

/// An ordered grid of cells. Row 0 carries header/category metadata by the
/// abundance convention, but the grid itself is convention-agnostic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rectangular transpose (rows become columns).
    ///
    /// The grid must be rectangular; a ragged row is a
    /// [`ToolsError::LengthMismatch`].
    pub fn transpose(&self) -> Result<Table, ToolsError> {
        let Some(first) = self.rows.first() else {
            return Ok(Table::default());
        };
        let width = first.len();
        for row in &self.rows {
            if row.len() != width {
                return Err(ToolsError::LengthMismatch {
                    expected: width,
                    got: row.len(),
                });
            }
        }
        let mut out = vec![Vec::with_capacity(self.rows.len()); width];
        for row in &self.rows {
            for (j, cell) in row.iter().enumerate() {
                out[j].push(cell.clone());
            }
        }
        Ok(Table::new(out))
    }
}

/// Zip equal-length columns into a row-major grid.
///
/// Columns of unequal length are a [`ToolsError::LengthMismatch`].
pub fn merge(columns: &[Vec<Cell>]) -> Result<Table, ToolsError> {
    let Some(first) = columns.first() else {
        return Ok(Table::default());
    };
    let length = first.len();
    for column in columns {
        if column.len() != length {
            return Err(ToolsError::LengthMismatch {
                expected: length,
                got: column.len(),
            });
        }
    }
    let mut rows = Vec::with_capacity(length);
    for i in 0..length {
        rows.push(columns.iter().map(|c| c[i].clone()).collect());
    }
    Ok(Table::new(rows))
}
