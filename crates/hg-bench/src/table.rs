//! Row-oriented tables backing tabular benchmarks.

use hg_types::{HgError, HgResult, ParameterValue};
use std::io::Read;
use std::path::Path;

/// A table of named columns, stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<ParameterValue>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<ParameterValue>>) -> HgResult<Self> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(HgError::Validation(format!(
                    "row {i} has {} values, expected {} columns",
                    row.len(),
                    columns.len()
                )));
            }
        }
        Ok(Self { columns, rows })
    }

    /// Load a table from a CSV file with a header row.
    pub fn from_csv_path<P: AsRef<Path>>(file_path: P) -> HgResult<Self> {
        let path = file_path.as_ref();
        tracing::info!("Loading CSV table from: {}", path.display());

        let file = std::fs::File::open(path)?;
        let table = Self::from_csv_reader(file).map_err(|e| {
            HgError::Csv(format!("Failed to load CSV table {}: {}", path.display(), e))
        })?;

        tracing::info!(
            "Loaded {} rows x {} columns from: {}",
            table.num_rows(),
            table.columns.len(),
            path.display()
        );
        Ok(table)
    }

    /// Read CSV with a header row. Cells parse as int, then float, else string.
    pub fn from_csv_reader<R: Read>(reader: R) -> HgResult<Self> {
        use csv::ReaderBuilder;

        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

        let columns: Vec<String> = rdr
            .headers()
            .map_err(|e| HgError::Csv(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        tracing::debug!("CSV headers: {:?}", columns);

        let mut rows = Vec::new();
        for (line_num, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| {
                HgError::Csv(format!("Failed to read CSV record at line {}: {}", line_num + 2, e))
            })?;
            rows.push(record.iter().map(ParameterValue::parse).collect());
        }

        Self::new(columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<ParameterValue>] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "config_id,lr,epoch,acc\n0,0.1,1,0.5\n0,0.1,2,0.7\n1,0.01,1,0.4\n";

    #[test]
    fn parses_typed_cells() {
        let table = Table::from_csv_reader(CSV.as_bytes()).unwrap();
        assert_eq!(table.columns(), &["config_id", "lr", "epoch", "acc"]);
        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.rows()[0][0], ParameterValue::Int(0));
        assert!(matches!(table.rows()[1][3], ParameterValue::Float(v) if v == 0.7));
        assert_eq!(table.column_index("epoch"), Some(2));
        assert!(!table.has_column("loss"));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        let table = Table::from_csv_path(file.path()).unwrap();
        assert_eq!(table.num_rows(), 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Table::from_csv_path("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, HgError::Io(_)));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = Table::new(
            vec!["a".into(), "b".into()],
            vec![vec![ParameterValue::Int(1)]],
        )
        .unwrap_err();
        assert!(err.to_string().contains("expected 2 columns"));
    }
}
