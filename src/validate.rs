use serde::{Deserialize, Serialize};
use serde_json::json;

pub const DAY_MIN: i64 = 1;
pub const DAY_MAX: i64 = 7;
pub const PERIOD_MIN: i64 = 1;
pub const PERIOD_MAX: i64 = 10;
pub const MAX_SCHEDULE_SLOTS: usize = 10;
pub const MIN_FINAL_PERCENT: i64 = 50;
pub const MIN_SEMESTER_MONTHS: u32 = 4;

/// One rejected field: a dotted form path (`schedules.2.endPeriod`), a
/// stable machine code and a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub code: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, code: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// Accumulated verdict over one form. Rules never short-circuit, so a
/// single pass surfaces every problem the way the multi-field error
/// display expects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push(&mut self, path: impl Into<String>, code: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(path, code, message));
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "valid": self.is_valid(),
            "fieldErrors": self.errors,
        })
    }
}

/// One weekly recurring teaching block as it arrives from the form.
/// Fields are optional so a half-filled row reports "required" per field
/// instead of failing to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSlotInput {
    pub day_of_week: Option<i64>,
    pub start_period: Option<i64>,
    pub end_period: Option<i64>,
}

fn check_slot(index: usize, slot: &ScheduleSlotInput, report: &mut ValidationReport) {
    let base = format!("schedules.{}", index);

    match slot.day_of_week {
        None => report.push(
            format!("{}.dayOfWeek", base),
            "required",
            "day of week is required",
        ),
        Some(d) if !(DAY_MIN..=DAY_MAX).contains(&d) => report.push(
            format!("{}.dayOfWeek", base),
            "out_of_range",
            format!("day of week must be between {} and {}", DAY_MIN, DAY_MAX),
        ),
        Some(_) => {}
    }

    for (field, value) in [
        ("startPeriod", slot.start_period),
        ("endPeriod", slot.end_period),
    ] {
        match value {
            None => report.push(
                format!("{}.{}", base, field),
                "required",
                format!("{} is required", period_label(field)),
            ),
            Some(p) if !(PERIOD_MIN..=PERIOD_MAX).contains(&p) => report.push(
                format!("{}.{}", base, field),
                "out_of_range",
                format!(
                    "{} must be between {} and {}",
                    period_label(field),
                    PERIOD_MIN,
                    PERIOD_MAX
                ),
            ),
            Some(_) => {}
        }
    }

    if let (Some(start), Some(end)) = (slot.start_period, slot.end_period) {
        if start > end {
            report.push(
                format!("{}.endPeriod", base),
                "start_after_end",
                "start period must not be after end period",
            );
        }
    }
}

/// Validates a whole schedule set. Each slot must be internally
/// consistent, and each weekday may carry at most one slot: a duplicated
/// day is a conflict no matter what the period ranges are, since one
/// class books one contiguous block per calendar day.
pub fn validate_schedule(slots: &[ScheduleSlotInput]) -> ValidationReport {
    let mut report = ValidationReport::default();

    if slots.is_empty() {
        report.push(
            "schedules",
            "too_few",
            "at least one schedule slot is required",
        );
        return report;
    }
    if slots.len() > MAX_SCHEDULE_SLOTS {
        report.push(
            "schedules",
            "too_many",
            format!(
                "at most {} schedule slots are allowed",
                MAX_SCHEDULE_SLOTS
            ),
        );
    }

    for (i, slot) in slots.iter().enumerate() {
        check_slot(i, slot, &mut report);
    }

    for (j, slot) in slots.iter().enumerate() {
        let Some(day) = slot.day_of_week else { continue };
        if !(DAY_MIN..=DAY_MAX).contains(&day) {
            continue;
        }
        let duplicated = slots[..j]
            .iter()
            .any(|earlier| earlier.day_of_week == Some(day));
        if duplicated {
            report.push(
                format!("schedules.{}.dayOfWeek", j),
                "duplicate_day",
                "only one schedule slot is allowed per weekday",
            );
        }
    }

    report
}

fn period_label(field: &str) -> &'static str {
    if field == "startPeriod" {
        "start period"
    } else {
        "end period"
    }
}

/// Grade-weight split as kept by the form: three integer text inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentSplitInput {
    pub process_percent: Option<String>,
    pub midterm_percent: Option<String>,
    pub final_percent: Option<String>,
}

/// Parses an integer percentage in 0..=100. Digits only, no sign, no
/// leading zeros (mirrors the form's `^(100|[1-9]?\d)$` input rule).
pub fn parse_percent(raw: &str) -> Option<i64> {
    let t = raw.trim();
    if t.is_empty() || !t.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if t.len() > 1 && t.starts_with('0') {
        return None;
    }
    let value: i64 = t.parse().ok()?;
    (0..=100).contains(&value).then_some(value)
}

fn parse_positive_int(raw: &str) -> Option<i64> {
    let t = raw.trim();
    if t.is_empty() || !t.bytes().all(|b| b.is_ascii_digit()) || t.starts_with('0') {
        return None;
    }
    t.parse().ok()
}

/// Validates the process/midterm/final split. Each value must be an
/// integer in 0..=100, the three must add up to exactly 100, and the
/// final exam must carry at least half the weight. Cross-field failures
/// attach to `finalPercent`, the last of the three inputs.
pub fn validate_percent_split(split: &PercentSplitInput) -> ValidationReport {
    let mut report = ValidationReport::default();

    let fields = [
        ("processPercent", "process percentage", &split.process_percent),
        ("midtermPercent", "midterm percentage", &split.midterm_percent),
        ("finalPercent", "final exam percentage", &split.final_percent),
    ];

    let mut parsed: [Option<i64>; 3] = [None, None, None];
    for (i, (path, label, raw)) in fields.iter().enumerate() {
        match raw.as_deref().map(str::trim) {
            None | Some("") => {
                report.push(*path, "required", format!("{} is required", label))
            }
            Some(t) => match parse_percent(t) {
                Some(v) => parsed[i] = Some(v),
                None => report.push(
                    *path,
                    "out_of_range",
                    format!("{} must be an integer between 0 and 100", label),
                ),
            },
        }
    }

    if let Some(final_pct) = parsed[2] {
        if final_pct < MIN_FINAL_PERCENT {
            report.push(
                "finalPercent",
                "final_too_low",
                format!(
                    "final exam percentage must be at least {}",
                    MIN_FINAL_PERCENT
                ),
            );
        }
    }

    if let [Some(process), Some(midterm), Some(final_pct)] = parsed {
        if process + midterm + final_pct != 100 {
            report.push(
                "finalPercent",
                "sum_mismatch",
                "grade percentages must add up to 100",
            );
        }
    }

    report
}

/// The class create/edit form. Text inputs stay strings; selects carry
/// the chosen id or are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassForm {
    pub class_code: Option<String>,
    pub subject_id: Option<String>,
    pub semester_id: Option<String>,
    pub teacher_id: Option<String>,
    pub min_students: Option<String>,
    pub max_students: Option<String>,
    pub process_percent: Option<String>,
    pub midterm_percent: Option<String>,
    pub final_percent: Option<String>,
    #[serde(default)]
    pub schedules: Vec<ScheduleSlotInput>,
    pub status: Option<String>,
}

impl ClassForm {
    pub fn percent_split(&self) -> PercentSplitInput {
        PercentSplitInput {
            process_percent: self.process_percent.clone(),
            midterm_percent: self.midterm_percent.clone(),
            final_percent: self.final_percent.clone(),
        }
    }
}

fn check_text(
    report: &mut ValidationReport,
    path: &str,
    label: &str,
    raw: Option<&str>,
    min_len: usize,
    max_len: usize,
) {
    let t = raw.unwrap_or("").trim();
    if t.is_empty() {
        report.push(path, "required", format!("{} is required", label));
        return;
    }
    let len = t.chars().count();
    if len < min_len {
        report.push(
            path,
            "too_short",
            format!("{} must be at least {} characters", label, min_len),
        );
    } else if len > max_len {
        report.push(
            path,
            "too_long",
            format!("{} must be at most {} characters", label, max_len),
        );
    }
}

fn check_selection(report: &mut ValidationReport, path: &str, label: &str, raw: Option<&str>) {
    if raw.unwrap_or("").trim().is_empty() {
        report.push(path, "required", format!("{} is required", label));
    }
}

pub fn validate_class_form(form: &ClassForm) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_text(
        &mut report,
        "classCode",
        "class code",
        form.class_code.as_deref(),
        4,
        20,
    );
    check_selection(&mut report, "subjectId", "subject", form.subject_id.as_deref());
    check_selection(
        &mut report,
        "semesterId",
        "semester",
        form.semester_id.as_deref(),
    );
    check_selection(&mut report, "teacherId", "teacher", form.teacher_id.as_deref());

    let mut min_students = None;
    let mut max_students = None;
    for (path, label, raw, out) in [
        (
            "minStudents",
            "minimum students",
            &form.min_students,
            &mut min_students,
        ),
        (
            "maxStudents",
            "maximum students",
            &form.max_students,
            &mut max_students,
        ),
    ] {
        match raw.as_deref().map(str::trim) {
            None | Some("") => report.push(path, "required", format!("{} is required", label)),
            Some(t) => match parse_positive_int(t) {
                Some(v) => *out = Some(v),
                None => report.push(
                    path,
                    "not_positive_int",
                    format!("{} must be a positive integer", label),
                ),
            },
        }
    }
    if let (Some(min), Some(max)) = (min_students, max_students) {
        if min > max {
            report.push(
                "maxStudents",
                "min_above_max",
                "minimum students must not exceed maximum students",
            );
        }
    }

    report.merge(validate_percent_split(&form.percent_split()));
    report.merge(validate_schedule(&form.schedules));

    report
}

/// The semester create/edit form. Dates are ISO `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterForm {
    pub semester_code: Option<String>,
    pub semester_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn check_date(
    report: &mut ValidationReport,
    path: &str,
    label: &str,
    raw: Option<&str>,
) -> Option<chrono::NaiveDate> {
    let t = raw.unwrap_or("").trim();
    if t.is_empty() {
        report.push(path, "required", format!("{} is required", label));
        return None;
    }
    match chrono::NaiveDate::parse_from_str(t, "%Y-%m-%d") {
        Ok(d) => Some(d),
        Err(_) => {
            report.push(
                path,
                "invalid_date",
                format!("{} must be a valid YYYY-MM-DD date", label),
            );
            None
        }
    }
}

pub fn validate_semester_form(form: &SemesterForm) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_text(
        &mut report,
        "semesterCode",
        "semester code",
        form.semester_code.as_deref(),
        2,
        20,
    );
    check_text(
        &mut report,
        "semesterName",
        "semester name",
        form.semester_name.as_deref(),
        2,
        100,
    );

    let start = check_date(&mut report, "startDate", "start date", form.start_date.as_deref());
    let end = check_date(&mut report, "endDate", "end date", form.end_date.as_deref());

    if let (Some(start), Some(end)) = (start, end) {
        if end <= start {
            report.push(
                "endDate",
                "end_not_after_start",
                "end date must be after start date",
            );
        } else if let Some(min_end) = start.checked_add_months(chrono::Months::new(MIN_SEMESTER_MONTHS)) {
            if end < min_end {
                report.push(
                    "endDate",
                    "span_too_short",
                    format!("semester must span at least {} months", MIN_SEMESTER_MONTHS),
                );
            }
        }
    }

    report
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectForm {
    pub subject_name: Option<String>,
    pub subject_code: Option<String>,
    pub credits: Option<String>,
    pub major_id: Option<String>,
    pub description: Option<String>,
}

pub fn validate_subject_form(form: &SubjectForm) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_text(
        &mut report,
        "subjectName",
        "subject name",
        form.subject_name.as_deref(),
        2,
        100,
    );
    check_text(
        &mut report,
        "subjectCode",
        "subject code",
        form.subject_code.as_deref(),
        4,
        10,
    );
    check_selection(&mut report, "majorId", "major", form.major_id.as_deref());

    match form.credits.as_deref().map(str::trim) {
        None | Some("") => report.push("credits", "required", "credits is required"),
        Some(t) => {
            let ok = matches!(t.parse::<i64>(), Ok(v) if (1..=4).contains(&v) && t.len() == 1);
            if !ok {
                report.push(
                    "credits",
                    "out_of_range",
                    "credits must be an integer between 1 and 4",
                );
            }
        }
    }

    report
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MajorForm {
    pub major_name: Option<String>,
    pub major_code: Option<String>,
    pub description: Option<String>,
}

pub fn validate_major_form(form: &MajorForm) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_text(
        &mut report,
        "majorName",
        "major name",
        form.major_name.as_deref(),
        2,
        100,
    );
    check_text(
        &mut report,
        "majorCode",
        "major code",
        form.major_code.as_deref(),
        2,
        10,
    );

    report
}

fn normalized(raw: &Option<String>) -> &str {
    raw.as_deref().map(str::trim).unwrap_or("")
}

/// Reports which of `locked` differ between the saved snapshot and the
/// candidate form. Schedules compare as parsed slot triples, everything
/// else as trimmed text.
pub fn locked_field_changes<'a>(
    saved: &ClassForm,
    candidate: &ClassForm,
    locked: &[&'a str],
) -> Vec<&'a str> {
    let mut changed = Vec::new();
    for &field in locked {
        let differs = match field {
            "classCode" => normalized(&saved.class_code) != normalized(&candidate.class_code),
            "subjectId" => normalized(&saved.subject_id) != normalized(&candidate.subject_id),
            "semesterId" => normalized(&saved.semester_id) != normalized(&candidate.semester_id),
            "teacherId" => normalized(&saved.teacher_id) != normalized(&candidate.teacher_id),
            "minStudents" => normalized(&saved.min_students) != normalized(&candidate.min_students),
            "maxStudents" => normalized(&saved.max_students) != normalized(&candidate.max_students),
            "schedules" => saved.schedules != candidate.schedules,
            _ => false,
        };
        if differs {
            changed.push(field);
        }
    }
    changed
}
