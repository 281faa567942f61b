use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use tracing::debug;

use crate::error::ToolsError;

use super::table::{Cell, Table};

/// Load a tabular file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv` — no header row; fields are coerced to numbers where they parse
/// * `.xlsx` — first worksheet only
///
/// A missing/unreadable file or an unrecognized extension is a
/// [`ToolsError::Format`].
pub fn load(path: &Path) -> Result<Table, ToolsError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path)?,
        "xlsx" => load_xlsx(path)?,
        other => {
            return Err(ToolsError::Format(format!(
                "unrecognized tabular format: .{other}"
            )))
        }
    };
    debug!("Loaded {} rows from {:?}", table.len(), path);
    Ok(table)
}

fn load_csv(path: &Path) -> Result<Table, ToolsError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| ToolsError::Format(format!("failed to open {}: {e}", path.display())))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| ToolsError::Format(format!("failed to read {}: {e}", path.display())))?;
        rows.push(record.iter().map(Cell::parse).collect());
    }
    Ok(Table::new(rows))
}

fn load_xlsx(path: &Path) -> Result<Table, ToolsError> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e| ToolsError::Format(format!("failed to open {}: {e}", path.display())))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ToolsError::Format(format!("{}: workbook has no sheets", path.display())))?
        .map_err(|e| ToolsError::Format(format!("failed to read {}: {e}", path.display())))?;

    let mut rows = Vec::new();
    for row in range.rows() {
        rows.push(row.iter().map(cell_from_xlsx).collect());
    }
    Ok(Table::new(rows))
}

fn cell_from_xlsx(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Float(v) => Cell::Number(*v),
        Data::Int(v) => Cell::Number(*v as f64),
        Data::String(s) => {
            if s.is_empty() {
                Cell::Empty
            } else {
                Cell::Text(s.clone())
            }
        }
        Data::Bool(b) => Cell::Text(b.to_string()),
        // Serial date number, same as the raw cell value.
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_csv_coerces_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abundance.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "sample,soil,water").unwrap();
        writeln!(file, "d__Archaea_1,0.25,3").unwrap();
        writeln!(file, "d__Bacteria_1,,x").unwrap();
        drop(file);

        let table = load(&path).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[0][0], Cell::Text("sample".to_string()));
        assert_eq!(table.rows[1][1], Cell::Number(0.25));
        assert_eq!(table.rows[1][2], Cell::Number(3.0));
        assert_eq!(table.rows[2][1], Cell::Empty);
        assert_eq!(table.rows[2][2], Cell::Text("x".to_string()));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("/nonexistent/abundance.csv")).unwrap_err();
        assert!(matches!(err, ToolsError::Format(_)));
    }

    #[test]
    fn test_load_unrecognized_extension() {
        let err = load(Path::new("data.parquet")).unwrap_err();
        assert!(matches!(err, ToolsError::Format(_)));
    }
}
