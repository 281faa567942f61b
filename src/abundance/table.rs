use tracing::info;

use crate::error::ToolsError;
use crate::tabular::{Cell, Table};

use super::aggregate::{aggregate, AggregateResult};

/// One sample observation: name plus its abundance values, aligned by
/// column index with the category label rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub name: String,
    pub values: Vec<f64>,
}

/// An abundance spreadsheet parsed into its two category views and the
/// sample matrix. Held immutably for a single aggregation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AbundanceTable {
    /// Contamination category per data column.
    pub contamination: Vec<String>,
    /// Plant category per data column.
    pub plant: Vec<String>,
    pub samples: Vec<SampleRow>,
}

impl AbundanceTable {
    /// Parse a raw grid following the abundance convention: row 0 =
    /// contamination categories, row 1 = plant categories, rows ≥ 2 =
    /// samples, column 0 = sample name.
    ///
    /// A grid without the two category rows, category rows of different
    /// widths, a sample row whose value count differs from the label count,
    /// or a non-numeric value cell is a [`ToolsError::Format`].
    pub fn from_table(table: &Table) -> Result<Self, ToolsError> {
        if table.len() < 2 {
            return Err(ToolsError::Format(
                "abundance table needs two category header rows".to_string(),
            ));
        }

        let contamination = label_row(&table.rows[0]);
        let plant = label_row(&table.rows[1]);
        if plant.len() != contamination.len() {
            return Err(ToolsError::Format(format!(
                "category rows cover {} and {} columns",
                contamination.len(),
                plant.len()
            )));
        }

        let mut samples = Vec::with_capacity(table.len().saturating_sub(2));
        for (offset, row) in table.rows[2..].iter().enumerate() {
            let row_no = offset + 2;
            let Some((name_cell, value_cells)) = row.split_first() else {
                return Err(ToolsError::Format(format!("row {row_no} is empty")));
            };
            if value_cells.len() != contamination.len() {
                return Err(ToolsError::Format(format!(
                    "row {row_no} has {} values, expected {}",
                    value_cells.len(),
                    contamination.len()
                )));
            }
            let mut values = Vec::with_capacity(value_cells.len());
            for (j, cell) in value_cells.iter().enumerate() {
                values.push(cell.as_f64().ok_or_else(|| {
                    ToolsError::Format(format!(
                        "row {row_no}, column {}: '{cell}' is not numeric",
                        j + 1
                    ))
                })?);
            }
            samples.push(SampleRow {
                name: name_cell.to_string(),
                values,
            });
        }

        Ok(Self {
            contamination,
            plant,
            samples,
        })
    }

    /// Select the value rows of samples whose name starts with `prefix`,
    /// preserving row and column order. Zero matches is an empty matrix,
    /// not an error.
    pub fn filter_by_prefix(&self, prefix: &str) -> Vec<Vec<f64>> {
        self.samples
            .iter()
            .filter(|sample| sample.name.starts_with(prefix))
            .map(|sample| sample.values.clone())
            .collect()
    }

    /// Aggregate the prefix-filtered sample matrix under both category
    /// views: `(contamination, plant)`. The views are independent; a column
    /// tagged in both partitions contributes to both.
    pub fn aggregate_by_prefix(
        &self,
        prefix: &str,
    ) -> Result<(AggregateResult, AggregateResult), ToolsError> {
        let matrix = self.filter_by_prefix(prefix);
        info!(
            "Aggregating {} of {} samples with prefix {:?}",
            matrix.len(),
            self.samples.len(),
            prefix
        );
        let contamination = aggregate(&self.contamination, &matrix)?;
        let plant = aggregate(&self.plant, &matrix)?;
        Ok((contamination, plant))
    }
}

fn label_row(row: &[Cell]) -> Vec<String> {
    row.iter().skip(1).map(|cell| cell.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: f64) -> Cell {
        Cell::Number(v)
    }

    fn t(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn sample_grid() -> Table {
        Table::new(vec![
            vec![t("sample"), t("soil"), t("water"), t("soil")],
            vec![t("categories"), t("maize"), t("rice"), t("rice")],
            vec![t("d__Archaea_1"), n(1.0), n(2.0), n(3.0)],
            vec![t("d__Archaea_2"), n(4.0), n(5.0), n(6.0)],
            vec![t("d__Bacteria_1"), n(100.0), n(100.0), n(100.0)],
        ])
    }

    #[test]
    fn test_from_table() {
        let table = AbundanceTable::from_table(&sample_grid()).unwrap();
        assert_eq!(table.contamination, vec!["soil", "water", "soil"]);
        assert_eq!(table.plant, vec!["maize", "rice", "rice"]);
        assert_eq!(table.samples.len(), 3);
        assert_eq!(table.samples[0].name, "d__Archaea_1");
        assert_eq!(table.samples[0].values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_from_table_missing_headers() {
        let grid = Table::new(vec![vec![t("sample"), t("soil")]]);
        assert!(matches!(
            AbundanceTable::from_table(&grid),
            Err(ToolsError::Format(_))
        ));
    }

    #[test]
    fn test_from_table_ragged_sample_row() {
        let mut grid = sample_grid();
        grid.rows[3].pop();
        assert!(matches!(
            AbundanceTable::from_table(&grid),
            Err(ToolsError::Format(_))
        ));
    }

    #[test]
    fn test_from_table_non_numeric_value() {
        let mut grid = sample_grid();
        grid.rows[2][2] = t("n/a");
        assert!(matches!(
            AbundanceTable::from_table(&grid),
            Err(ToolsError::Format(_))
        ));
    }

    #[test]
    fn test_filter_by_prefix() {
        let table = AbundanceTable::from_table(&sample_grid()).unwrap();
        let matrix = table.filter_by_prefix("d__Archaea");
        assert_eq!(matrix, vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    }

    #[test]
    fn test_zero_match_prefix_aggregates_to_zeroes() {
        let table = AbundanceTable::from_table(&sample_grid()).unwrap();
        let (contamination, plant) = table.aggregate_by_prefix("d__Eukaryota").unwrap();
        // Equivalent to aggregating an all-zero matrix of the same width.
        assert_eq!(contamination.get("soil"), Some(0.0));
        assert_eq!(contamination.get("water"), Some(0.0));
        assert_eq!(plant.get("maize"), Some(0.0));
        assert_eq!(plant.get("rice"), Some(0.0));
    }

    #[test]
    fn test_aggregate_by_prefix_views() {
        let table = AbundanceTable::from_table(&sample_grid()).unwrap();
        let (contamination, plant) = table.aggregate_by_prefix("d__Archaea").unwrap();
        // colsum over the two archaeal samples = [5, 7, 9]
        assert_eq!(
            contamination.entries(),
            &[("water".to_string(), 7.0), ("soil".to_string(), 14.0)]
        );
        assert_eq!(
            plant.entries(),
            &[("maize".to_string(), 5.0), ("rice".to_string(), 16.0)]
        );
        // Both views cover all columns, so both conserve the grand total.
        assert!((contamination.total() - 21.0).abs() < 1e-9);
        assert!((plant.total() - 21.0).abs() < 1e-9);
    }
}
