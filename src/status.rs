use serde::{Deserialize, Serialize};
use serde_json::json;

/// Class lifecycle. CANCELLED and COMPLETED are terminal; everything else
/// moves strictly forward along the table in `legal_targets`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassStatus {
    Draft,
    OpenForRegistration,
    Confirmed,
    Cancelled,
    InProgress,
    Completed,
}

impl ClassStatus {
    pub const ALL: [ClassStatus; 6] = [
        ClassStatus::Draft,
        ClassStatus::OpenForRegistration,
        ClassStatus::Confirmed,
        ClassStatus::Cancelled,
        ClassStatus::InProgress,
        ClassStatus::Completed,
    ];

    /// Structural fields that freeze once the class leaves DRAFT. Only
    /// the status itself may still change, and only along the table.
    pub const LOCKED_FIELDS: [&'static str; 7] = [
        "classCode",
        "subjectId",
        "semesterId",
        "teacherId",
        "minStudents",
        "maxStudents",
        "schedules",
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "DRAFT" => Some(ClassStatus::Draft),
            "OPEN_FOR_REGISTRATION" => Some(ClassStatus::OpenForRegistration),
            "CONFIRMED" => Some(ClassStatus::Confirmed),
            "CANCELLED" => Some(ClassStatus::Cancelled),
            "IN_PROGRESS" => Some(ClassStatus::InProgress),
            "COMPLETED" => Some(ClassStatus::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassStatus::Draft => "DRAFT",
            ClassStatus::OpenForRegistration => "OPEN_FOR_REGISTRATION",
            ClassStatus::Confirmed => "CONFIRMED",
            ClassStatus::Cancelled => "CANCELLED",
            ClassStatus::InProgress => "IN_PROGRESS",
            ClassStatus::Completed => "COMPLETED",
        }
    }

    pub fn legal_targets(self) -> &'static [ClassStatus] {
        match self {
            ClassStatus::Draft => &[ClassStatus::OpenForRegistration],
            ClassStatus::OpenForRegistration => {
                &[ClassStatus::Confirmed, ClassStatus::Cancelled]
            }
            ClassStatus::Confirmed => &[ClassStatus::InProgress],
            ClassStatus::InProgress => &[ClassStatus::Completed],
            ClassStatus::Cancelled | ClassStatus::Completed => &[],
        }
    }

    pub fn can_transition_to(self, target: ClassStatus) -> bool {
        self.legal_targets().contains(&target)
    }

    pub fn is_terminal(self) -> bool {
        self.legal_targets().is_empty()
    }

    pub fn locked_fields(self) -> &'static [&'static str] {
        match self {
            ClassStatus::Draft => &[],
            _ => &Self::LOCKED_FIELDS,
        }
    }
}

/// Semester lifecycle: a strictly linear chain with a single legal next
/// status at each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SemesterStatus {
    Draft,
    RegistrationOpen,
    RegistrationClosed,
    InProgress,
    Completed,
}

impl SemesterStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "DRAFT" => Some(SemesterStatus::Draft),
            "REGISTRATION_OPEN" => Some(SemesterStatus::RegistrationOpen),
            "REGISTRATION_CLOSED" => Some(SemesterStatus::RegistrationClosed),
            "IN_PROGRESS" => Some(SemesterStatus::InProgress),
            "COMPLETED" => Some(SemesterStatus::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SemesterStatus::Draft => "DRAFT",
            SemesterStatus::RegistrationOpen => "REGISTRATION_OPEN",
            SemesterStatus::RegistrationClosed => "REGISTRATION_CLOSED",
            SemesterStatus::InProgress => "IN_PROGRESS",
            SemesterStatus::Completed => "COMPLETED",
        }
    }

    pub fn next(self) -> Option<SemesterStatus> {
        match self {
            SemesterStatus::Draft => Some(SemesterStatus::RegistrationOpen),
            SemesterStatus::RegistrationOpen => Some(SemesterStatus::RegistrationClosed),
            SemesterStatus::RegistrationClosed => Some(SemesterStatus::InProgress),
            SemesterStatus::InProgress => Some(SemesterStatus::Completed),
            SemesterStatus::Completed => None,
        }
    }

    pub fn can_transition_to(self, target: SemesterStatus) -> bool {
        self.next() == Some(target)
    }

    /// Position along the chain, for "has reached at least" gates.
    fn rank(self) -> u8 {
        match self {
            SemesterStatus::Draft => 0,
            SemesterStatus::RegistrationOpen => 1,
            SemesterStatus::RegistrationClosed => 2,
            SemesterStatus::InProgress => 3,
            SemesterStatus::Completed => 4,
        }
    }

    pub fn registration_ended(self) -> bool {
        self.rank() >= SemesterStatus::RegistrationClosed.rank()
    }
}

/// Why a requested class transition was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionError {
    pub code: String,
    pub message: String,
}

impl TransitionError {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({ "code": self.code, "message": self.message })
    }
}

/// Checks a class transition against the table, then against the
/// enclosing semester when its status is known. The backend re-runs the
/// same gates authoritatively; this mirror exists so the UI can refuse a
/// doomed submit before it leaves the form.
pub fn check_class_transition(
    current: ClassStatus,
    target: ClassStatus,
    semester: Option<SemesterStatus>,
) -> Result<(), TransitionError> {
    if !current.can_transition_to(target) {
        return Err(TransitionError::new(
            "invalid_status_transition",
            format!(
                "a {} class cannot move to {}",
                current.as_str(),
                target.as_str()
            ),
        ));
    }

    let Some(semester) = semester else {
        return Ok(());
    };

    match (current, target) {
        (ClassStatus::OpenForRegistration, ClassStatus::Confirmed)
        | (ClassStatus::OpenForRegistration, ClassStatus::Cancelled)
            if !semester.registration_ended() =>
        {
            Err(TransitionError::new(
                "registration_not_ended",
                "the semester's registration period has not ended",
            ))
        }
        (ClassStatus::Confirmed, ClassStatus::InProgress)
            if semester.rank() < SemesterStatus::InProgress.rank() =>
        {
            Err(TransitionError::new(
                "semester_not_started",
                "the semester has not started",
            ))
        }
        (ClassStatus::InProgress, ClassStatus::Completed)
            if semester != SemesterStatus::Completed =>
        {
            Err(TransitionError::new(
                "semester_not_ended",
                "the semester has not ended",
            ))
        }
        _ => Ok(()),
    }
}
