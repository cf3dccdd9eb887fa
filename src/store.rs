//! Whole-file JSON persistence for the roster and exam documents.
//!
//! Each store is a read-modify-write unit: callers `load`, mutate in memory,
//! and `save` once. Nothing is written until `save`, so a failed operation
//! leaves the file as it was.

use crate::error::ImportError;
use crate::model::{ExamDocument, Student};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::{Path, PathBuf};

pub const STUDENTS_FILE: &str = "students.json";
pub const EXAMS_DIR: &str = "exams";

/// Parsed document at `path`, or `None` when the file does not exist.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ImportError> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ImportError::io(path, e)),
    };
    let doc = serde_json::from_slice(&bytes).map_err(|source| ImportError::MalformedJson {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded json document");
    Ok(Some(doc))
}

/// Overwrites `path` with `doc` as 4-space indented JSON.
pub fn save_json<T: Serialize>(doc: &T, path: &Path) -> Result<(), ImportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| ImportError::io(parent, e))?;
        }
    }

    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut ser).map_err(|source| ImportError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    buf.push(b'\n');

    std::fs::write(path, &buf).map_err(|e| ImportError::io(path, e))?;
    tracing::debug!(path = %path.display(), bytes = buf.len(), "saved json document");
    Ok(())
}

#[derive(Debug, Clone)]
pub struct StudentStore {
    path: PathBuf,
}

impl StudentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<Vec<Student>>, ImportError> {
        load_json(&self.path)
    }

    pub fn load_or_default(&self) -> Result<Vec<Student>, ImportError> {
        Ok(self.load()?.unwrap_or_default())
    }

    pub fn save(&self, students: &[Student]) -> Result<(), ImportError> {
        save_json(&students, &self.path)
    }
}

/// Directory of `<examName>.json` documents.
#[derive(Debug, Clone)]
pub struct ExamStore {
    dir: PathBuf,
}

impl ExamStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, exam_name: &str) -> Result<PathBuf, ImportError> {
        let name = exam_name.trim();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(ImportError::InvalidExamName(exam_name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }

    pub fn load(&self, exam_name: &str) -> Result<Option<ExamDocument>, ImportError> {
        load_json(&self.path_for(exam_name)?)
    }

    pub fn save(&self, exam_name: &str, doc: &ExamDocument) -> Result<PathBuf, ImportError> {
        let path = self.path_for(exam_name)?;
        save_json(doc, &path)?;
        Ok(path)
    }

    /// Exam names with a document on disk, sorted.
    pub fn list(&self) -> Result<Vec<String>, ImportError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(v) => v,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ImportError::io(&self.dir, e)),
        };
        let mut names = Vec::new();
        for ent in entries {
            let p = ent.map_err(|e| ImportError::io(&self.dir, e))?.path();
            if !p.is_file() || p.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = p.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StudentId;

    #[test]
    fn load_missing_file_is_absent_not_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded: Option<Vec<Student>> =
            load_json(&dir.path().join("nope.json")).expect("load");
        assert!(loaded.is_none());
    }

    #[test]
    fn load_malformed_json_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let p = dir.path().join("students.json");
        std::fs::write(&p, "[{\"id\": 1,").expect("write");
        let err = StudentStore::new(&p).load().expect_err("should fail");
        assert!(matches!(err, ImportError::MalformedJson { .. }));
    }

    #[test]
    fn save_uses_four_space_indent_and_creates_parent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = StudentStore::new(dir.path().join("data").join(STUDENTS_FILE));
        store
            .save(&[Student::new(StudentId::Number(1), "A")])
            .expect("save");
        let text = std::fs::read_to_string(store.path()).expect("read");
        assert_eq!(text, "[\n    {\n        \"id\": 1,\n        \"name\": \"A\"\n    }\n]\n");
    }

    #[test]
    fn exam_names_cannot_escape_the_directory() {
        let store = ExamStore::new("exams");
        assert!(store.path_for("mock1").is_ok());
        for bad in ["", "  ", "..", "a/b", "a\\b"] {
            assert!(
                matches!(store.path_for(bad), Err(ImportError::InvalidExamName(_))),
                "{bad:?} accepted"
            );
        }
    }

    #[test]
    fn list_returns_sorted_exam_names() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ExamStore::new(dir.path());
        for name in ["mock2", "mock1"] {
            store
                .save(name, &ExamDocument::new(name, Vec::new()))
                .expect("save");
        }
        std::fs::write(dir.path().join("notes.txt"), "x").expect("write");
        assert_eq!(store.list().expect("list"), vec!["mock1", "mock2"]);
        assert!(ExamStore::new(dir.path().join("missing"))
            .list()
            .expect("list missing")
            .is_empty());
    }
}
