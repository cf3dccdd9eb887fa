use crate::config::ImportConfig;
use crate::ipc::error::ok;
use crate::ipc::helpers::{get_required_path, respond, Failure};
use crate::ipc::types::{AppState, Request};
use crate::workspace::Workspace;
use serde_json::json;
use std::path::PathBuf;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state
                .workspace
                .as_ref()
                .map(|w| w.root().to_string_lossy().to_string())
        }),
    )
}

fn workspace_select(state: &mut AppState, req: &Request) -> Result<serde_json::Value, Failure> {
    let path = get_required_path(&req.params, "path")?;
    // An explicit configPath wins over <path>/examd.json.
    let config_path = req
        .params
        .get("configPath")
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);

    let ws = match config_path {
        Some(cfg) => Workspace::open_with_config(&path, ImportConfig::load(&cfg)?)?,
        None => Workspace::open(&path)?,
    };
    let result = json!({
        "workspacePath": ws.root().to_string_lossy(),
        "config": ws.config(),
    });
    state.workspace = Some(ws);
    Ok(result)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(respond(req, workspace_select(state, req))),
        _ => None,
    }
}
