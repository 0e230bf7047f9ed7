use crate::ipc::error::ok;
use crate::ipc::helpers::{
    optional_semester_status, required_class_status, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::status::check_class_transition;
use serde_json::json;

/// Targets reachable from the current status, for pre-emptive filtering:
/// the selector only ever offers legal moves, so an illegal transition
/// cannot be chosen in the first place.
fn status_options(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let status = required_class_status(params, "status")?;
    let targets: Vec<&str> = status.legal_targets().iter().map(|s| s.as_str()).collect();
    Ok(json!({
        "status": status.as_str(),
        "targets": targets,
        "lockedFields": status.locked_fields(),
        "terminal": status.is_terminal(),
    }))
}

fn status_check(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let current = required_class_status(params, "status")?;
    let target = required_class_status(params, "target")?;
    let semester = optional_semester_status(params, "semesterStatus")?;

    Ok(match check_class_transition(current, target, semester) {
        Ok(()) => json!({ "valid": true }),
        Err(e) => json!({ "valid": false, "error": e.to_json() }),
    })
}

fn respond(
    req: &Request,
    result: Result<serde_json::Value, HandlerErr>,
) -> serde_json::Value {
    match result {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    }
}

pub fn try_handle(_state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "classes.statusOptions" => Some(respond(req, status_options(&req.params))),
        "classes.statusCheck" => Some(respond(req, status_check(&req.params))),
        _ => None,
    }
}
