use crate::ipc::error::ok;
use crate::ipc::helpers::{parse_form, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::validate::{validate_major_form, MajorForm};

fn majors_validate(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let form: MajorForm = parse_form(params, "form")?;
    Ok(validate_major_form(&form).to_json())
}

pub fn try_handle(_state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "majors.validate" => Some(match majors_validate(&req.params) {
            Ok(v) => ok(&req.id, v),
            Err(e) => e.response(&req.id),
        }),
        _ => None,
    }
}
