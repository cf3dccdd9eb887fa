use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::exam::{process_exam, ExamImportSummary};
use crate::roster::{update_students, RosterOutcome};
use crate::store::{ExamStore, StudentStore, EXAMS_DIR, STUDENTS_FILE};
use std::path::{Path, PathBuf};

/// A data directory holding `students.json`, `exams/` and an optional
/// `examd.json` config.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    config: ImportConfig,
}

impl Workspace {
    /// Opens `root` with the config found in it (or defaults).
    pub fn open(root: &Path) -> Result<Self, ImportError> {
        let config = ImportConfig::load_from_dir(root)?;
        Self::open_with_config(root, config)
    }

    /// Creates the data and exams directories if they do not exist yet.
    pub fn open_with_config(root: &Path, config: ImportConfig) -> Result<Self, ImportError> {
        config.validate()?;
        let exams = root.join(EXAMS_DIR);
        std::fs::create_dir_all(&exams).map_err(|e| ImportError::io(&exams, e))?;
        tracing::info!(workspace = %root.display(), "workspace opened");
        Ok(Self {
            root: root.to_path_buf(),
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn students(&self) -> StudentStore {
        StudentStore::new(self.root.join(STUDENTS_FILE))
    }

    pub fn exams(&self) -> ExamStore {
        ExamStore::new(self.root.join(EXAMS_DIR))
    }

    pub fn import_roster(&self, roster_csv: &Path) -> Result<RosterOutcome, ImportError> {
        update_students(roster_csv, &self.students(), &self.config)
    }

    pub fn import_exam(
        &self,
        exam_csv: &Path,
        exam_name: &str,
    ) -> Result<ExamImportSummary, ImportError> {
        process_exam(
            exam_csv,
            exam_name,
            &self.exams(),
            &self.students(),
            &self.config,
        )
    }
}
