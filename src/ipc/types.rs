use std::collections::HashMap;

use serde::Deserialize;

use crate::status::ClassStatus;
use crate::validate::ClassForm;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// One form-edit session. Holds the status the class had when editing
/// began and, for an existing class, the saved snapshot that locked
/// fields are compared against. Dropped wholesale on discard.
#[derive(Debug, Clone)]
pub struct FormSession {
    pub status: ClassStatus,
    pub saved: Option<ClassForm>,
}

#[derive(Default)]
pub struct AppState {
    pub sessions: HashMap<String, FormSession>,
}
