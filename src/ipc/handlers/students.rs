use crate::ipc::helpers::{get_required_path, require_workspace, respond, Failure};
use crate::ipc::types::{AppState, Request};
use crate::roster::RosterOutcome;
use serde_json::json;

fn students_import(state: &AppState, req: &Request) -> Result<serde_json::Value, Failure> {
    let ws = require_workspace(state)?;
    let csv_path = get_required_path(&req.params, "csvPath")?;
    let outcome = ws.import_roster(&csv_path)?;
    let ids = match &outcome {
        RosterOutcome::Unchanged => Vec::new(),
        RosterOutcome::Added { ids } => ids.clone(),
    };
    Ok(json!({
        "added": outcome.added_count(),
        "ids": ids,
    }))
}

fn students_list(state: &AppState) -> Result<serde_json::Value, Failure> {
    let ws = require_workspace(state)?;
    let students = ws.students().load_or_default()?;
    Ok(json!({ "students": students }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.import" => Some(respond(req, students_import(state, req))),
        "students.list" => Some(respond(req, students_list(state))),
        _ => None,
    }
}
