use crate::ipc::helpers::{
    get_required_path, get_required_str, require_workspace, respond, Failure, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn exams_import(state: &AppState, req: &Request) -> Result<serde_json::Value, Failure> {
    let ws = require_workspace(state)?;
    let csv_path = get_required_path(&req.params, "csvPath")?;
    let exam_name = get_required_str(&req.params, "examName")?;
    let summary = ws.import_exam(&csv_path, &exam_name)?;
    Ok(json!(summary))
}

fn exams_list(state: &AppState) -> Result<serde_json::Value, Failure> {
    let ws = require_workspace(state)?;
    let names = ws.exams().list()?;
    Ok(json!({ "exams": names }))
}

fn exams_open(state: &AppState, req: &Request) -> Result<serde_json::Value, Failure> {
    let ws = require_workspace(state)?;
    let exam_name = get_required_str(&req.params, "examName")?;
    let Some(doc) = ws.exams().load(&exam_name)? else {
        return Err(HandlerErr {
            code: "not_found",
            message: format!("exam not found: {}", exam_name),
            details: None,
        }
        .into());
    };
    Ok(json!(doc))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "exams.import" => Some(respond(req, exams_import(state, req))),
        "exams.list" => Some(respond(req, exams_list(state))),
        "exams.open" => Some(respond(req, exams_open(state, req))),
        _ => None,
    }
}
