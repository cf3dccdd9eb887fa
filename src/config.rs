use crate::error::ImportError;
use crate::model::SectionDefinition;
use crate::store::load_json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number};
use std::path::Path;

pub const CONFIG_FILE: &str = "examd.json";

/// Import policy, read from `examd.json` in the data directory. Every key is
/// optional; an absent file means all defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportConfig {
    /// Section prefixes whose columns are copied into results. Sections
    /// inferred from other prefixes get metadata only.
    pub recognized_sections: Vec<String>,
    pub section_defaults: SectionDefaults,
    pub dedupe_roster_batch: bool,
    pub results_policy: ResultsPolicy,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            recognized_sections: ["Math", "English", "Analytical"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            section_defaults: SectionDefaults::default(),
            dedupe_roster_batch: true,
            results_policy: ResultsPolicy::Append,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultsPolicy {
    /// Every import run adds one result per row, even for students already
    /// present in the document.
    Append,
    /// A row replaces any earlier result for the same student.
    Replace,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionDefaults {
    pub total_questions: u32,
    pub negative_marking: bool,
    pub cutoff: Number,
}

impl Default for SectionDefaults {
    fn default() -> Self {
        Self {
            total_questions: 0,
            negative_marking: true,
            cutoff: Number::from(40),
        }
    }
}

impl SectionDefaults {
    pub fn definition(&self, name: &str) -> SectionDefinition {
        SectionDefinition {
            name: name.to_string(),
            total_questions: self.total_questions,
            negative_marking: self.negative_marking,
            cutoff: self.cutoff.clone(),
            extra: Map::new(),
        }
    }
}

impl ImportConfig {
    /// Reads an explicitly named config file; a missing file is an error.
    pub fn load(path: &Path) -> Result<Self, ImportError> {
        let cfg: Self = load_json(path)?.ok_or_else(|| ImportError::MissingInput {
            path: path.to_path_buf(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads `<data_dir>/examd.json`, falling back to defaults when absent.
    pub fn load_from_dir(data_dir: &Path) -> Result<Self, ImportError> {
        let cfg: Self = load_json(&data_dir.join(CONFIG_FILE))?.unwrap_or_default();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ImportError> {
        for name in &self.recognized_sections {
            if name.trim().is_empty() || name.contains('_') {
                return Err(ImportError::Config(format!(
                    "recognizedSections entry {name:?} must be non-empty and contain no underscore"
                )));
            }
        }
        Ok(())
    }

    pub fn is_recognized(&self, section: &str) -> bool {
        self.recognized_sections.iter().any(|s| s == section)
    }
}
