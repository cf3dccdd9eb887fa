use serde_json::json;
use std::error::Error;

use crate::error::ImportError;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

/// Maps a failed import onto an error response; the full cause chain goes
/// into `details.causes`.
pub fn import_err(id: &str, e: &ImportError) -> serde_json::Value {
    tracing::error!(error = %e, "request failed");
    let mut causes = Vec::new();
    let mut source = e.source();
    while let Some(s) = source {
        causes.push(s.to_string());
        source = s.source();
    }
    let details = if causes.is_empty() {
        None
    } else {
        Some(json!({ "causes": causes }))
    };
    err(id, e.code(), e.to_string(), details)
}
