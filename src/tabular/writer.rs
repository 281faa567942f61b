use std::path::Path;

use rust_xlsxwriter::Workbook;
use tracing::debug;

use crate::error::ToolsError;

use super::table::{Cell, Table};

/// Save a table. Dispatch by extension to `{csv, xlsx}`; no header row and
/// no index column in either format.
///
/// Any other extension is a [`ToolsError::UnsupportedFormat`].
pub fn save(table: &Table, path: &Path) -> Result<(), ToolsError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => save_csv(table, path)?,
        "xlsx" => save_xlsx(table, path)?,
        other => {
            return Err(ToolsError::UnsupportedFormat(format!(
                "unsupported filetype: .{other}"
            )))
        }
    }
    debug!("Saved {} rows to {:?}", table.len(), path);
    Ok(())
}

fn save_csv(table: &Table, path: &Path) -> Result<(), ToolsError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

fn save_xlsx(table: &Table, path: &Path) -> Result<(), ToolsError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (i, row) in table.rows.iter().enumerate() {
        for (j, cell) in row.iter().enumerate() {
            match cell {
                Cell::Number(v) => {
                    worksheet
                        .write_number(i as u32, j as u16, *v)
                        .map_err(|e| ToolsError::Workbook(e.to_string()))?;
                }
                Cell::Text(s) => {
                    worksheet
                        .write_string(i as u32, j as u16, s.as_str())
                        .map_err(|e| ToolsError::Workbook(e.to_string()))?;
                }
                Cell::Empty => {}
            }
        }
    }

    workbook
        .save(path)
        .map_err(|e| ToolsError::Workbook(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::load;

    fn sample_table() -> Table {
        Table::new(vec![
            vec![
                Cell::Text("Methanobacteria".to_string()),
                Cell::Number(0.5),
                Cell::Number(12.0),
            ],
            vec![
                Cell::Text("Nitrososphaeria".to_string()),
                Cell::Number(1.25),
                Cell::Number(7.0),
            ],
        ])
    }

    #[test]
    fn test_save_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let err = save(&sample_table(), &dir.path().join("out.parquet")).unwrap_err();
        assert!(matches!(err, ToolsError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let table = sample_table();
        save(&table, &path).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_xlsx_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let table = sample_table();
        save(&table, &path).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_save_then_resave_reproduces_grid() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.xlsx");
        let second = dir.path().join("second.csv");
        save(&sample_table(), &first).unwrap();
        let reloaded = load(&first).unwrap();
        save(&reloaded, &second).unwrap();
        assert_eq!(load(&second).unwrap(), sample_table());
    }
}
