use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while reading inputs or persisting the JSON stores.
///
/// Every variant aborts the operation that produced it. Per-row conditions
/// that are recoverable (an unknown student during exam import) are never
/// surfaced through this type.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("input file not found: {}", .path.display())]
    MissingInput { path: PathBuf },

    #[error("failed to read CSV {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("CSV {} has no `{column}` column", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("column `{header}` in {} is not of the form <section>_<metric>", .path.display())]
    MalformedHeader { path: PathBuf, header: String },

    #[error("line {line} of {}: `{column}` value {value:?} is not an integer", .path.display())]
    MalformedScore {
        path: PathBuf,
        line: usize,
        column: String,
        value: String,
    },

    #[error("malformed JSON in {}: {source}", .path.display())]
    MalformedJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode JSON for {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid exam name {0:?}")]
    InvalidExamName(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ImportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Short machine-readable code used by the IPC surface.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingInput { .. } => "not_found",
            Self::InvalidExamName(_) => "bad_params",
            Self::Config(_) => "bad_config",
            _ => "import_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_score_names_line_and_column() {
        let err = ImportError::MalformedScore {
            path: PathBuf::from("mock1.csv"),
            line: 3,
            column: "Math_correct".into(),
            value: "eight".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 3"));
        assert!(msg.contains("Math_correct"));
        assert!(msg.contains("\"eight\""));
        assert_eq!(err.code(), "import_failed");
    }

    #[test]
    fn missing_input_maps_to_not_found() {
        let err = ImportError::MissingInput {
            path: PathBuf::from("students.csv"),
        };
        assert_eq!(err.code(), "not_found");
        assert_eq!(err.to_string(), "input file not found: students.csv");
    }

    #[test]
    fn config_errors_have_their_own_code() {
        let err = ImportError::Config("section name `Math_1` contains `_`".into());
        assert_eq!(err.code(), "bad_config");
        assert!(err.to_string().starts_with("configuration error:"));
    }
}
