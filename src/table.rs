use crate::error::ImportError;
use std::path::{Path, PathBuf};

/// A fully read CSV file: header names plus string cells per row.
#[derive(Debug, Clone)]
pub struct Table {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn read_table(path: &Path) -> Result<Table, ImportError> {
    if !path.is_file() {
        return Err(ImportError::MissingInput {
            path: path.to_path_buf(),
        });
    }
    let csv_err = |source: csv::Error| ImportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let headers = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(csv_err)?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    tracing::debug!(path = %path.display(), columns = headers.len(), rows = rows.len(), "read csv");
    Ok(Table {
        path: path.to_path_buf(),
        headers,
        rows,
    })
}

impl Table {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, ImportError> {
        self.column(name).ok_or_else(|| ImportError::MissingColumn {
            path: self.path.clone(),
            column: name.to_string(),
        })
    }

    /// 1-based line number of a data row, counting the header line.
    pub fn line_of(row_index: usize) -> usize {
        row_index + 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_headers_and_trimmed_cells() {
        let dir = tempfile::tempdir().expect("tempdir");
        let p = dir.path().join("roster.csv");
        std::fs::write(&p, "id,name\n1, Asha \n2,\"Lee, Sam\"\n").expect("write");

        let t = read_table(&p).expect("read");
        assert_eq!(t.headers, vec!["id", "name"]);
        assert_eq!(t.rows, vec![vec!["1", "Asha"], vec!["2", "Lee, Sam"]]);
        assert_eq!(t.require_column("name").expect("name"), 1);
        assert!(matches!(
            t.require_column("email"),
            Err(ImportError::MissingColumn { .. })
        ));
    }

    #[test]
    fn missing_file_is_missing_input() {
        let err = read_table(Path::new("/definitely/not/here.csv")).expect_err("missing");
        assert!(matches!(err, ImportError::MissingInput { .. }));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let p = dir.path().join("ragged.csv");
        std::fs::write(&p, "id,name\n1,A,extra\n").expect("write");
        assert!(matches!(read_table(&p), Err(ImportError::Csv { .. })));
    }
}
