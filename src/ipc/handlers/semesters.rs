use crate::ipc::error::ok;
use crate::ipc::helpers::{parse_form, required_semester_status, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::validate::{validate_semester_form, SemesterForm};
use serde_json::json;

fn semesters_validate(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let form: SemesterForm = parse_form(params, "form")?;
    Ok(validate_semester_form(&form).to_json())
}

/// The semester chain is linear, so "what may this become" is a single
/// answer rather than a list.
fn semesters_status_next(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let status = required_semester_status(params, "status")?;
    let next = status.next();
    Ok(json!({
        "status": status.as_str(),
        "next": next.map(|s| s.as_str()),
        "terminal": next.is_none(),
    }))
}

fn semesters_status_check(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let current = required_semester_status(params, "status")?;
    let target = required_semester_status(params, "target")?;

    Ok(if current.can_transition_to(target) {
        json!({ "valid": true })
    } else {
        json!({
            "valid": false,
            "error": {
                "code": "invalid_status_transition",
                "message": format!(
                    "a {} semester cannot move to {}",
                    current.as_str(),
                    target.as_str()
                ),
            },
        })
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
        "semesters.validate" => Some(respond(req, semesters_validate(&req.params))),
        "semesters.statusNext" => Some(respond(req, semesters_status_next(&req.params))),
        "semesters.statusCheck" => Some(respond(req, semesters_status_check(&req.params))),
        _ => None,
    }
}
