use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_registrard");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn registrard");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({ "id": id, "method": method, "params": params });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn check(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    status: &str,
    target: &str,
) -> serde_json::Value {
    request_ok(
        stdin,
        reader,
        id,
        "classes.statusCheck",
        json!({ "status": status, "target": target }),
    )
}

fn is_valid(result: &serde_json::Value) -> bool {
    result.get("valid").and_then(|v| v.as_bool()).unwrap_or(false)
}

fn error_code(result: &serde_json::Value) -> Option<&str> {
    result
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
}

#[test]
fn table_edges_are_accepted() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let edges = [
        ("DRAFT", "OPEN_FOR_REGISTRATION"),
        ("OPEN_FOR_REGISTRATION", "CONFIRMED"),
        ("OPEN_FOR_REGISTRATION", "CANCELLED"),
        ("CONFIRMED", "IN_PROGRESS"),
        ("IN_PROGRESS", "COMPLETED"),
    ];
    for (i, (status, target)) in edges.iter().enumerate() {
        let result = check(&mut stdin, &mut reader, &i.to_string(), status, target);
        assert!(is_valid(&result), "{} -> {} should pass", status, target);
    }

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn draft_cannot_skip_to_confirmed_or_cancel() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    // Confirmation must pass through OPEN_FOR_REGISTRATION.
    let skipped = check(&mut stdin, &mut reader, "1", "DRAFT", "CONFIRMED");
    assert!(!is_valid(&skipped));
    assert_eq!(error_code(&skipped), Some("invalid_status_transition"));

    let cancelled = check(&mut stdin, &mut reader, "2", "DRAFT", "CANCELLED");
    assert!(!is_valid(&cancelled));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn terminal_states_have_no_way_out() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let all = [
        "DRAFT",
        "OPEN_FOR_REGISTRATION",
        "CONFIRMED",
        "CANCELLED",
        "IN_PROGRESS",
        "COMPLETED",
    ];
    let mut id = 0;
    for terminal in ["CANCELLED", "COMPLETED"] {
        for target in all {
            id += 1;
            let result = check(&mut stdin, &mut reader, &id.to_string(), terminal, target);
            assert!(
                !is_valid(&result),
                "{} -> {} must be rejected",
                terminal,
                target
            );
        }
    }

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn options_filter_targets_and_expose_locks() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let draft = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "classes.statusOptions",
        json!({ "status": "DRAFT" }),
    );
    assert_eq!(draft.get("targets"), Some(&json!(["OPEN_FOR_REGISTRATION"])));
    assert_eq!(draft.get("lockedFields"), Some(&json!([])));
    assert_eq!(draft.get("terminal"), Some(&json!(false)));

    let open = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "classes.statusOptions",
        json!({ "status": "OPEN_FOR_REGISTRATION" }),
    );
    assert_eq!(open.get("targets"), Some(&json!(["CONFIRMED", "CANCELLED"])));
    let locked = open
        .get("lockedFields")
        .and_then(|v| v.as_array())
        .expect("lockedFields array");
    for field in [
        "classCode",
        "subjectId",
        "semesterId",
        "teacherId",
        "minStudents",
        "maxStudents",
        "schedules",
    ] {
        assert!(locked.contains(&json!(field)), "{} should be locked", field);
    }

    let done = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "classes.statusOptions",
        json!({ "status": "COMPLETED" }),
    );
    assert_eq!(done.get("targets"), Some(&json!([])));
    assert_eq!(done.get("terminal"), Some(&json!(true)));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn semester_gates_mirror_server_rules() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    // Confirming while registration is still open is refused.
    let early = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "classes.statusCheck",
        json!({
            "status": "OPEN_FOR_REGISTRATION",
            "target": "CONFIRMED",
            "semesterStatus": "REGISTRATION_OPEN",
        }),
    );
    assert!(!is_valid(&early));
    assert_eq!(error_code(&early), Some("registration_not_ended"));

    // Scenario F: the same move once the registration period has ended.
    let closed = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "classes.statusCheck",
        json!({
            "status": "OPEN_FOR_REGISTRATION",
            "target": "CONFIRMED",
            "semesterStatus": "REGISTRATION_CLOSED",
        }),
    );
    assert!(is_valid(&closed));

    let not_started = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "classes.statusCheck",
        json!({
            "status": "CONFIRMED",
            "target": "IN_PROGRESS",
            "semesterStatus": "REGISTRATION_CLOSED",
        }),
    );
    assert!(!is_valid(&not_started));
    assert_eq!(error_code(&not_started), Some("semester_not_started"));

    let not_ended = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "classes.statusCheck",
        json!({
            "status": "IN_PROGRESS",
            "target": "COMPLETED",
            "semesterStatus": "IN_PROGRESS",
        }),
    );
    assert!(!is_valid(&not_ended));
    assert_eq!(error_code(&not_ended), Some("semester_not_ended"));

    // Without the semester status only the table is enforced.
    let table_only = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "classes.statusCheck",
        json!({ "status": "OPEN_FOR_REGISTRATION", "target": "CONFIRMED" }),
    );
    assert!(is_valid(&table_only));

    drop(stdin);
    let _ = child.wait();
}
