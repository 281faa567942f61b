use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::ToolsError;

use super::types::PathwayRecord;

/// Write scraped records, dispatching on extension.
///
/// * `.csv` — header row `id,link,text,state,title,big_title`
/// * `.txt` — tab-separated, no header
///
/// Anything else is a [`ToolsError::UnsupportedFormat`].
pub fn save_records(records: &[PathwayRecord], path: &Path) -> Result<(), ToolsError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let mut writer = csv::Writer::from_path(path)?;
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        "txt" => {
            let mut writer = BufWriter::new(File::create(path)?);
            for r in records {
                writeln!(
                    writer,
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    r.id, r.link, r.text, r.state, r.title, r.big_title
                )?;
            }
            writer.flush()?;
        }
        other => {
            return Err(ToolsError::UnsupportedFormat(format!(
                "unsupported filetype: .{other}"
            )))
        }
    }

    info!("Saved {} records to {:?}", records.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<PathwayRecord> {
        vec![
            PathwayRecord {
                id: "map00010".to_string(),
                link: "https://www.genome.jp/pathway/map00010".to_string(),
                text: "Glycolysis / Gluconeogenesis".to_string(),
                state: "2 / 45)".to_string(),
                title: "Carbohydrate metabolism".to_string(),
                big_title: "Metabolism".to_string(),
            },
            PathwayRecord {
                id: "map00020".to_string(),
                link: "https://www.genome.jp/pathway/map00020".to_string(),
                text: "Citrate cycle (TCA cycle)".to_string(),
                state: "1 / 30)".to_string(),
                title: "Carbohydrate metabolism".to_string(),
                big_title: "Metabolism".to_string(),
            },
        ]
    }

    #[test]
    fn test_save_csv_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapped.csv");
        save_records(&sample_records(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,link,text,state,title,big_title"
        );
        assert!(lines.next().unwrap().starts_with("map00010,"));
        assert!(lines.next().unwrap().starts_with("map00020,"));
    }

    #[test]
    fn test_save_txt_tab_separated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapped.txt");
        save_records(&sample_records(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let first = content.lines().next().unwrap();
        assert_eq!(first.split('\t').count(), 6);
        assert!(first.starts_with("map00010\thttps://www.genome.jp"));
    }

    #[test]
    fn test_save_unsupported_filetype() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_records(&sample_records(), &dir.path().join("mapped.xml")).unwrap_err();
        assert!(matches!(err, ToolsError::UnsupportedFormat(_)));
    }
}
