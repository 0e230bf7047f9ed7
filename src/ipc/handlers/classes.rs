use crate::ipc::error::ok;
use crate::ipc::helpers::{parse_form, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::validate::{
    validate_class_form, validate_percent_split, validate_schedule, ClassForm,
    PercentSplitInput, ScheduleSlotInput,
};

fn classes_validate(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let form: ClassForm = parse_form(params, "form")?;
    Ok(validate_class_form(&form).to_json())
}

fn classes_validate_schedule(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let slots: Vec<ScheduleSlotInput> = parse_form(params, "schedules")?;
    Ok(validate_schedule(&slots).to_json())
}

fn classes_validate_grading(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    // The three percent fields sit directly in params, like the form row.
    let split: PercentSplitInput = if params.is_null() {
        PercentSplitInput::default()
    } else {
        serde_json::from_value(params.clone())
            .map_err(|e| HandlerErr::bad_params(format!("invalid grading params: {}", e)))?
    };
    Ok(validate_percent_split(&split).to_json())
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
        "classes.validate" => Some(respond(req, classes_validate(&req.params))),
        "classes.validateSchedule" => {
            Some(respond(req, classes_validate_schedule(&req.params)))
        }
        "classes.validateGrading" => {
            Some(respond(req, classes_validate_grading(&req.params)))
        }
        _ => None,
    }
}
