use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::model::{Student, StudentId};
use crate::store::StudentStore;
use crate::table::{read_table, Table};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterOutcome {
    /// Every roster id was already known; the store was not written.
    Unchanged,
    /// New students appended in CSV order.
    Added { ids: Vec<StudentId> },
}

impl RosterOutcome {
    pub fn added_count(&self) -> usize {
        match self {
            RosterOutcome::Unchanged => 0,
            RosterOutcome::Added { ids } => ids.len(),
        }
    }
}

/// Appends roster rows whose id is not yet in `store`.
pub fn update_students(
    roster_csv: &Path,
    store: &StudentStore,
    config: &ImportConfig,
) -> Result<RosterOutcome, ImportError> {
    let table = read_table(roster_csv)?;
    let incoming = roster_rows(&table)?;

    let mut students = store.load_or_default()?;
    let mut known: HashSet<StudentId> = students.iter().map(|s| s.id.clone()).collect();

    let mut new_students = Vec::new();
    for student in incoming {
        if known.contains(&student.id) {
            continue;
        }
        if config.dedupe_roster_batch {
            known.insert(student.id.clone());
        }
        new_students.push(student);
    }

    if new_students.is_empty() {
        tracing::info!(roster = %roster_csv.display(), "No new students to add.");
        return Ok(RosterOutcome::Unchanged);
    }

    let ids = new_students.iter().map(|s| s.id.clone()).collect::<Vec<_>>();
    students.extend(new_students);
    store.save(&students)?;

    tracing::info!(
        added = ids.len(),
        total = students.len(),
        store = %store.path().display(),
        "Added {} new students.",
        ids.len()
    );
    Ok(RosterOutcome::Added { ids })
}

fn roster_rows(table: &Table) -> Result<Vec<Student>, ImportError> {
    let id_col = table.require_column("id")?;
    let name_col = table.require_column("name")?;

    let mut out = Vec::with_capacity(table.rows.len());
    for (i, row) in table.rows.iter().enumerate() {
        let Some(id) = row.get(id_col).and_then(|s| StudentId::parse(s)) else {
            tracing::warn!(line = Table::line_of(i), "roster row has no id; skipped");
            continue;
        };
        let name = row.get(name_col).cloned().unwrap_or_default();
        out.push(Student::new(id, name));
    }
    Ok(out)
}
