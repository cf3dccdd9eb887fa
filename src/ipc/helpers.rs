use serde_json::Value;
use std::path::PathBuf;

use super::error::{err, import_err};
use super::types::{AppState, Request};
use crate::error::ImportError;
use crate::workspace::Workspace;

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
}

impl HandlerErr {
    pub fn response(self, id: &str) -> Value {
        err(id, self.code, self.message, self.details)
    }
}

pub fn get_required_str(params: &Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| HandlerErr {
            code: "bad_params",
            message: format!("missing params.{}", key),
            details: None,
        })
}

pub fn get_required_path(params: &Value, key: &str) -> Result<PathBuf, HandlerErr> {
    get_required_str(params, key).map(PathBuf::from)
}

pub fn require_workspace(state: &AppState) -> Result<&Workspace, HandlerErr> {
    state.workspace.as_ref().ok_or_else(|| HandlerErr {
        code: "no_workspace",
        message: "select a workspace first".to_string(),
        details: None,
    })
}

/// Turns a handler body's outcome into the wire response.
pub fn respond(req: &Request, out: Result<Value, Failure>) -> Value {
    match out {
        Ok(v) => super::error::ok(&req.id, v),
        Err(Failure::Handler(e)) => e.response(&req.id),
        Err(Failure::Import(e)) => import_err(&req.id, &e),
    }
}

pub enum Failure {
    Handler(HandlerErr),
    Import(ImportError),
}

impl From<HandlerErr> for Failure {
    fn from(e: HandlerErr) -> Self {
        Failure::Handler(e)
    }
}

impl From<ImportError> for Failure {
    fn from(e: ImportError) -> Self {
        Failure::Import(e)
    }
}
