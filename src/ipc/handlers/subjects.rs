use crate::ipc::error::ok;
use crate::ipc::helpers::{parse_form, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::validate::{validate_subject_form, SubjectForm};

fn subjects_validate(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let form: SubjectForm = parse_form(params, "form")?;
    Ok(validate_subject_form(&form).to_json())
}

pub fn try_handle(_state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "subjects.validate" => Some(match subjects_validate(&req.params) {
            Ok(v) => ok(&req.id, v),
            Err(e) => e.response(&req.id),
        }),
        _ => None,
    }
}
