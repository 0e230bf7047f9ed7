use serde::de::DeserializeOwned;

use crate::ipc::error::err;
use crate::status::{ClassStatus, SemesterStatus};

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn bad_params(message: impl Into<String>) -> Self {
        HandlerErr {
            code: "bad_params",
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        HandlerErr {
            code: "not_found",
            message: message.into(),
            details: None,
        }
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

pub fn required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

pub fn optional_str(
    params: &serde_json::Value,
    key: &str,
) -> Result<Option<String>, HandlerErr> {
    match params.get(key) {
        None => Ok(None),
        Some(v) if v.is_null() => Ok(None),
        Some(v) => v
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| HandlerErr::bad_params(format!("{} must be a string", key))),
    }
}

/// Deserializes a params sub-object into a typed form. A missing key
/// yields the form's default so field-level "required" errors surface
/// instead of a protocol error.
pub fn parse_form<T: DeserializeOwned + Default>(
    params: &serde_json::Value,
    key: &str,
) -> Result<T, HandlerErr> {
    match params.get(key) {
        None => Ok(T::default()),
        Some(v) if v.is_null() => Ok(T::default()),
        Some(v) => serde_json::from_value(v.clone())
            .map_err(|e| HandlerErr::bad_params(format!("invalid {}: {}", key, e))),
    }
}

pub fn required_class_status(
    params: &serde_json::Value,
    key: &str,
) -> Result<ClassStatus, HandlerErr> {
    let raw = required_str(params, key)?;
    ClassStatus::parse(&raw)
        .ok_or_else(|| HandlerErr::bad_params(format!("unknown class status: {}", raw)))
}

pub fn optional_semester_status(
    params: &serde_json::Value,
    key: &str,
) -> Result<Option<SemesterStatus>, HandlerErr> {
    let Some(raw) = optional_str(params, key)? else {
        return Ok(None);
    };
    SemesterStatus::parse(&raw)
        .map(Some)
        .ok_or_else(|| HandlerErr::bad_params(format!("unknown semester status: {}", raw)))
}

pub fn required_semester_status(
    params: &serde_json::Value,
    key: &str,
) -> Result<SemesterStatus, HandlerErr> {
    let raw = required_str(params, key)?;
    SemesterStatus::parse(&raw)
        .ok_or_else(|| HandlerErr::bad_params(format!("unknown semester status: {}", raw)))
}
