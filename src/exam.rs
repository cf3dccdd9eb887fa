use crate::config::{ImportConfig, ResultsPolicy, SectionDefaults};
use crate::error::ImportError;
use crate::model::{ExamDocument, ExamResult, Metric, SectionDefinition, SectionScore, StudentId};
use crate::store::{ExamStore, StudentStore};
use crate::table::{read_table, Table};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Map;
use std::collections::HashSet;
use std::path::Path;

const ID_COLUMN: &str = "id";
const NAME_COLUMN: &str = "name";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamImportSummary {
    pub exam_name: String,
    /// True when this run created the exam document (and inferred sections).
    pub created: bool,
    pub section_count: usize,
    pub appended: usize,
    pub replaced: usize,
    pub missing_student_ids: Vec<StudentId>,
}

/// Column that feeds a result: which section it belongs to and which metric
/// it sets. `metric` is `None` for suffixes other than
/// correct/wrong/notAttempted; the section still appears in the result.
struct ScoreColumn<'a> {
    index: usize,
    header: &'a str,
    section: &'a str,
    metric: Option<Metric>,
}

/// Splits `<section>_<metric>` on the first underscore.
fn split_header(header: &str) -> Option<(&str, &str)> {
    let (section, metric) = header.split_once('_')?;
    if section.is_empty() || metric.is_empty() {
        return None;
    }
    Some((section, metric))
}

fn is_identity_column(header: &str) -> bool {
    header == ID_COLUMN || header == NAME_COLUMN
}

/// One placeholder section per distinct prefix, in first-seen column order.
pub fn infer_sections(
    table: &Table,
    defaults: &SectionDefaults,
) -> Result<Vec<SectionDefinition>, ImportError> {
    let mut sections: Vec<SectionDefinition> = Vec::new();
    for header in &table.headers {
        if is_identity_column(header) {
            continue;
        }
        let Some((section, _)) = split_header(header) else {
            return Err(ImportError::MalformedHeader {
                path: table.path.clone(),
                header: header.clone(),
            });
        };
        if !sections.iter().any(|s| s.name == section) {
            sections.push(defaults.definition(section));
        }
    }
    Ok(sections)
}

fn score_columns<'a>(table: &'a Table, config: &ImportConfig) -> Vec<ScoreColumn<'a>> {
    let mut out = Vec::new();
    for (index, header) in table.headers.iter().enumerate() {
        if is_identity_column(header) {
            continue;
        }
        let Some((section, suffix)) = split_header(header) else {
            continue;
        };
        if !config.is_recognized(section) {
            continue;
        }
        let metric = Metric::from_column_suffix(suffix);
        if metric.is_none() {
            tracing::warn!(column = %header, "unknown score metric; column ignored");
        }
        out.push(ScoreColumn {
            index,
            header,
            section,
            metric,
        });
    }
    out
}

fn score_row(
    table: &Table,
    row_index: usize,
    row: &[String],
    columns: &[ScoreColumn<'_>],
) -> Result<IndexMap<String, SectionScore>, ImportError> {
    let mut sections: IndexMap<String, SectionScore> = IndexMap::new();
    for col in columns {
        let entry = sections.entry(col.section.to_string()).or_default();
        let Some(metric) = col.metric else {
            continue;
        };
        let raw = row.get(col.index).map(String::as_str).unwrap_or("");
        let value = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ImportError::MalformedScore {
                path: table.path.clone(),
                line: Table::line_of(row_index),
                column: col.header.to_string(),
                value: raw.to_string(),
            })?;
        entry.set(metric, value);
    }
    Ok(sections)
}

/// Imports one exam CSV into `<exams dir>/<exam_name>.json`.
///
/// Sections are inferred only when the document does not exist yet. Rows
/// whose student is not in the roster are skipped and listed in the
/// summary. Any other failure aborts before the document is written.
pub fn process_exam(
    exam_csv: &Path,
    exam_name: &str,
    exams: &ExamStore,
    students: &StudentStore,
    config: &ImportConfig,
) -> Result<ExamImportSummary, ImportError> {
    let exam_name = exam_name.trim();
    // Validate the name before touching any input.
    exams.path_for(exam_name)?;

    let table = read_table(exam_csv)?;
    let id_col = table.require_column(ID_COLUMN)?;

    let roster = match students.load()? {
        Some(v) => v,
        None => {
            tracing::warn!(
                store = %students.path().display(),
                "student store missing; every row will be skipped"
            );
            Vec::new()
        }
    };
    let known: HashSet<&StudentId> = roster.iter().map(|s| &s.id).collect();

    let (mut doc, created) = match exams.load(exam_name)? {
        Some(doc) => (doc, false),
        None => {
            let sections = infer_sections(&table, &config.section_defaults)?;
            tracing::info!(
                exam = exam_name,
                sections = sections.len(),
                "creating exam document"
            );
            (ExamDocument::new(exam_name, sections), true)
        }
    };

    let columns = score_columns(&table, config);
    let mut summary = ExamImportSummary {
        exam_name: exam_name.to_string(),
        created,
        section_count: doc.sections.len(),
        appended: 0,
        replaced: 0,
        missing_student_ids: Vec::new(),
    };

    let mut carried = doc.results.len();
    for (i, row) in table.rows.iter().enumerate() {
        let Some(student_id) = row.get(id_col).and_then(|s| StudentId::parse(s)) else {
            tracing::warn!(line = Table::line_of(i), "exam row has no student id; skipped");
            continue;
        };
        if !known.contains(&student_id) {
            tracing::warn!(
                student_id = %student_id,
                "Student ID {} not found in {}.",
                student_id,
                students.path().display()
            );
            summary.missing_student_ids.push(student_id);
            continue;
        }

        let sections = score_row(&table, i, row, &columns)?;
        if config.results_policy == ResultsPolicy::Replace {
            // Results loaded from disk always precede the ones pushed below.
            let earlier = doc.results[..carried]
                .iter()
                .filter(|r| r.student_id == student_id)
                .count();
            let before = doc.results.len();
            doc.results.retain(|r| r.student_id != student_id);
            let removed = before - doc.results.len();
            carried -= earlier;
            summary.replaced += earlier;
            // A later row for the same student wins within one CSV.
            summary.appended -= removed - earlier;
        }
        doc.results.push(ExamResult {
            student_id,
            sections,
            extra: Map::new(),
        });
        summary.appended += 1;
    }

    exams.save(exam_name, &doc)?;
    tracing::info!(
        appended = summary.appended,
        replaced = summary.replaced,
        skipped = summary.missing_student_ids.len(),
        "Processed exam data for {exam_name}."
    );
    Ok(summary)
}
