use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::Dataset;

/// Suggested file name for the filtered download.
pub const EXPORT_FILE_NAME: &str = "vehicles_filtered.csv";

/// Write the rows at `indices` as CSV: header row with every dataset column,
/// nulls as empty fields.
pub fn write_csv<W: Write>(dataset: &Dataset, indices: &[usize], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(&dataset.columns)
        .context("writing CSV header")?;

    for &idx in indices {
        let record = &dataset.records[idx];
        let row = dataset
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| record.cell(i, col).unwrap_or_default());
        writer
            .write_record(row)
            .with_context(|| format!("writing CSV row {idx}"))?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

/// Export the rows at `indices` to a file at `path`.
pub fn export_csv(dataset: &Dataset, indices: &[usize], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(dataset, indices, std::io::BufWriter::new(file))
        .with_context(|| format!("exporting to {}", path.display()))?;
    log::info!("Exported {} records to {}", indices.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;

    const SOURCE: &str = "\
price,model_year,model,condition,odometer,paint_color
9400,2011,bmw x5,good,145000,
25500,2013,ford f-150,excellent,88705,white
-1,2013,ford f-150,excellent,88705,white
5500,2013,hyundai sonata,like new,110000,red
";

    #[test]
    fn test_export_selected_rows() {
        let ds = read_csv(SOURCE.as_bytes()).unwrap();
        let mut out = Vec::new();
        write_csv(&ds, &[0, 2], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "price,model_year,model,condition,odometer,paint_color,manufacturer,fuel,transmission,type",
                "9400,2011,bmw x5,good,145000,,,,,",
                "5500,2013,hyundai sonata,like new,110000,red,,,,",
            ]
        );
    }

    #[test]
    fn test_export_reloads_to_same_rows() {
        let ds = read_csv(SOURCE.as_bytes()).unwrap();
        let all: Vec<usize> = (0..ds.len()).collect();
        let mut out = Vec::new();
        write_csv(&ds, &all, &mut out).unwrap();
        let reloaded = read_csv(out.as_slice()).unwrap();
        assert_eq!(reloaded.records, ds.records);
        assert_eq!(reloaded.columns, ds.columns);
    }

    #[test]
    fn test_export_keeps_columns_with_colliding_headers() {
        let ds = read_csv(
            "price,model_year,odometer,Paint Color,paint_color,Price\n100,2010,5,red,blue,$100\n"
                .as_bytes(),
        )
        .unwrap();
        let mut out = Vec::new();
        write_csv(&ds, &[0], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "price,model_year,odometer,paint_color,paint_color,price,manufacturer,condition,fuel,transmission,type,model",
                "100,2010,5,red,blue,$100,,,,,,",
            ]
        );
    }

    #[test]
    fn test_export_empty_view_writes_header_only() {
        let ds = read_csv(SOURCE.as_bytes()).unwrap();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(EXPORT_FILE_NAME);
        export_csv(&ds, &[], &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("price,model_year"));
    }
}
