use crate::ipc::error::ok;
use crate::ipc::helpers::{
    optional_semester_status, optional_str, parse_form, required_str, HandlerErr,
};
use crate::ipc::types::{AppState, FormSession, Request};
use crate::status::{check_class_transition, ClassStatus};
use crate::validate::{locked_field_changes, validate_class_form, ClassForm};
use serde_json::json;
use uuid::Uuid;

fn sessions_open(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let (status, saved) = match params.get("class") {
        None => (ClassStatus::Draft, None),
        Some(v) if v.is_null() => (ClassStatus::Draft, None),
        Some(class) => {
            let status = match optional_str(class, "status")? {
                Some(raw) => ClassStatus::parse(&raw)
                    .ok_or_else(|| HandlerErr::bad_params(format!("unknown class status: {}", raw)))?,
                None => ClassStatus::Draft,
            };
            let saved: ClassForm = parse_form(class, "form")?;
            (status, Some(saved))
        }
    };

    let session_id = Uuid::new_v4().to_string();
    state
        .sessions
        .insert(session_id.clone(), FormSession { status, saved });

    Ok(json!({
        "sessionId": session_id,
        "status": status.as_str(),
        "lockedFields": status.locked_fields(),
    }))
}

fn sessions_validate(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let session_id = required_str(params, "sessionId")?;
    let session = state
        .sessions
        .get(&session_id)
        .ok_or_else(|| HandlerErr::not_found("session not found"))?;

    let form: ClassForm = parse_form(params, "form")?;
    let semester = optional_semester_status(params, "semesterStatus")?;

    let mut report = validate_class_form(&form);

    // Edits to frozen fields are rejected against the snapshot taken
    // when the session opened, not against whatever the form last held.
    if let Some(saved) = &session.saved {
        for field in locked_field_changes(saved, &form, session.status.locked_fields()) {
            report.push(
                field,
                "field_locked",
                format!(
                    "{} is read-only while the class is {}",
                    field,
                    session.status.as_str()
                ),
            );
        }
    }

    if let Some(raw) = form.status.as_deref() {
        match ClassStatus::parse(raw) {
            None => report.push(
                "status",
                "unknown_status",
                format!("unknown class status: {}", raw),
            ),
            Some(target) if target != session.status => {
                if let Err(e) = check_class_transition(session.status, target, semester) {
                    report.push("status", &e.code, e.message);
                }
            }
            Some(_) => {}
        }
    }

    Ok(report.to_json())
}

fn sessions_discard(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let session_id = required_str(params, "sessionId")?;
    let removed = state.sessions.remove(&session_id).is_some();
    Ok(json!({ "removed": removed }))
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

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "sessions.open" => Some(respond(req, sessions_open(state, &req.params))),
        "sessions.validate" => Some(respond(req, sessions_validate(state, &req.params))),
        "sessions.discard" => Some(respond(req, sessions_discard(state, &req.params))),
        _ => None,
    }
}
