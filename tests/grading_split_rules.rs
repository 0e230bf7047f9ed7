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

fn validate_grading(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    process: &str,
    midterm: &str,
    final_pct: &str,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": "classes.validateGrading",
        "params": {
            "processPercent": process,
            "midtermPercent": midterm,
            "finalPercent": final_pct,
        },
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "grading validate failed: {}",
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn is_valid(result: &serde_json::Value) -> bool {
    result.get("valid").and_then(|v| v.as_bool()).unwrap_or(false)
}

fn final_error_code(result: &serde_json::Value) -> Option<String> {
    result
        .get("fieldErrors")
        .and_then(|v| v.as_array())
        .and_then(|errors| {
            errors
                .iter()
                .find(|e| e.get("path").and_then(|v| v.as_str()) == Some("finalPercent"))
                .and_then(|e| e.get("code"))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        })
}

#[test]
fn thirty_twenty_fifty_passes() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let result = validate_grading(&mut stdin, &mut reader, "1", "30", "20", "50");
    assert!(is_valid(&result), "expected valid, got {}", result);

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn final_below_half_is_rejected() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    // 30 + 30 + 40 sums to 100 but the final exam weight is too small.
    let result = validate_grading(&mut stdin, &mut reader, "1", "30", "30", "40");
    assert!(!is_valid(&result));
    assert_eq!(final_error_code(&result).as_deref(), Some("final_too_low"));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn sum_mismatch_attaches_to_final_percent() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let result = validate_grading(&mut stdin, &mut reader, "1", "30", "25", "50");
    assert!(!is_valid(&result));
    assert_eq!(final_error_code(&result).as_deref(), Some("sum_mismatch"));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn non_numeric_and_padded_values_are_out_of_range() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    for (id, process) in [("1", "abc"), ("2", "-10"), ("3", "007"), ("4", "101")] {
        let result = validate_grading(&mut stdin, &mut reader, id, process, "20", "50");
        assert!(!is_valid(&result), "{} should not parse", process);
        let has_process_error = result
            .get("fieldErrors")
            .and_then(|v| v.as_array())
            .map(|errors| {
                errors.iter().any(|e| {
                    e.get("path").and_then(|v| v.as_str()) == Some("processPercent")
                        && e.get("code").and_then(|v| v.as_str()) == Some("out_of_range")
                })
            })
            .unwrap_or(false);
        assert!(has_process_error, "{} gave {}", process, result);
    }

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn missing_fields_report_required_without_cross_checks() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let payload = json!({
        "id": "1",
        "method": "classes.validateGrading",
        "params": { "finalPercent": "60" },
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");
    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response");
    let result = value.get("result").cloned().unwrap_or_default();

    assert!(!is_valid(&result));
    let codes: Vec<(String, String)> = result
        .get("fieldErrors")
        .and_then(|v| v.as_array())
        .map(|errors| {
            errors
                .iter()
                .map(|e| {
                    (
                        e.get("path").and_then(|v| v.as_str()).unwrap_or("").to_string(),
                        e.get("code").and_then(|v| v.as_str()).unwrap_or("").to_string(),
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    assert!(codes.contains(&("processPercent".into(), "required".into())));
    assert!(codes.contains(&("midtermPercent".into(), "required".into())));
    // The sum rule stays silent until all three inputs parse.
    assert!(!codes.iter().any(|(_, c)| c == "sum_mismatch"));

    drop(stdin);
    let _ = child.wait();
}
