// CLI integration tests for the read -> parse -> report cycle.
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

use serde_json::Value;

const SUCCESS_LABEL: &str = "Config parsed successfully:";
const READ_FAILURE_LABEL: &str = "Failed to read config file:";
const PARSE_FAILURE_LABEL: &str = "Failed to parse config file:";

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_confpeek");
    let mut command = Command::new(exe);
    command
        .env_remove("CONFPEEK_CONFIG")
        .env_remove("CONFPEEK_LOG")
        .env_remove("RUST_LOG");
    command
}

fn run_on(path: &Path, extra: &[&str]) -> Output {
    cmd()
        .args(extra)
        .arg(path)
        .output()
        .expect("run confpeek")
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

#[test]
fn valid_config_prints_label_and_pretty_json() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("svc.conf");
    std::fs::write(&path, r#"{"name":"svc","port":8080}"#).expect("write");

    let output = run_on(&path, &[]);
    assert!(output.status.success());
    assert_eq!(
        text(&output.stdout),
        format!("{SUCCESS_LABEL}\n{{\n  \"name\": \"svc\",\n  \"port\": 8080\n}}\n")
    );
    assert!(output.stderr.is_empty());
}

#[test]
fn output_round_trips_to_the_same_value() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("nested.conf");
    let input = r#"{"z":[1,2.5,{"deep":null}],"a":{"flag":true,"name":"x\ny"}}"#;
    std::fs::write(&path, input).expect("write");

    let output = run_on(&path, &[]);
    let stdout = text(&output.stdout);
    let body = stdout
        .strip_prefix(&format!("{SUCCESS_LABEL}\n"))
        .expect("label first");
    let printed: Value = serde_json::from_str(body).expect("printed json");
    let original: Value = serde_json::from_str(input).expect("input json");
    assert_eq!(printed, original);
    assert!(body.find("\"z\"").unwrap() < body.find("\"a\"").unwrap());
}

#[test]
fn top_level_scalars_are_accepted() {
    let temp = tempfile::tempdir().expect("tempdir");
    for (name, content, rendered) in [
        ("num.conf", "42", "42"),
        ("str.conf", "\"hello\"", "\"hello\""),
        ("null.conf", " null \n", "null"),
    ] {
        let path = temp.path().join(name);
        std::fs::write(&path, content).expect("write");
        let output = run_on(&path, &[]);
        assert_eq!(text(&output.stdout), format!("{SUCCESS_LABEL}\n{rendered}\n"));
    }
}

#[test]
fn missing_file_reports_read_failure_and_exits_zero() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("absent.conf");

    let output = run_on(&path, &[]);
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
    let stderr = text(&output.stderr);
    assert!(stderr.starts_with(READ_FAILURE_LABEL), "stderr: {stderr}");
    assert!(stderr.contains(&format!("path: {}", path.display())));
}

#[test]
fn strict_mode_maps_failures_to_exit_codes() {
    let temp = tempfile::tempdir().expect("tempdir");
    let missing = temp.path().join("absent.conf");
    assert_eq!(run_on(&missing, &["--strict"]).status.code(), Some(3));

    let invalid = temp.path().join("invalid.conf");
    std::fs::write(&invalid, r#"{"a":}"#).expect("write");
    assert_eq!(run_on(&invalid, &["--strict"]).status.code(), Some(7));

    let latin1 = temp.path().join("latin1.conf");
    std::fs::write(&latin1, [b'"', 0xe9, b'"']).expect("write");
    assert_eq!(run_on(&latin1, &["--strict"]).status.code(), Some(5));

    let valid = temp.path().join("valid.conf");
    std::fs::write(&valid, "[]").expect("write");
    assert_eq!(run_on(&valid, &["--strict"]).status.code(), Some(0));
}

#[test]
fn invalid_json_reports_parse_failure() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("invalid.conf");
    std::fs::write(&path, r#"{"a":}"#).expect("write");

    let output = run_on(&path, &[]);
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
    let stderr = text(&output.stderr);
    assert!(stderr.starts_with(PARSE_FAILURE_LABEL), "stderr: {stderr}");
    assert!(stderr.contains("line 1 column 6"));
}

#[test]
fn empty_file_takes_the_parse_failure_path() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("empty.conf");
    std::fs::write(&path, "").expect("write");

    let output = run_on(&path, &[]);
    assert!(output.stdout.is_empty());
    let stderr = text(&output.stderr);
    assert!(stderr.starts_with(PARSE_FAILURE_LABEL));
    assert!(stderr.contains("parse category: eof"));
}

#[test]
fn invalid_utf8_reports_read_failure() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("latin1.conf");
    std::fs::write(&path, [b'{', 0xff, b'}']).expect("write");

    let output = run_on(&path, &[]);
    assert!(output.stdout.is_empty());
    assert!(text(&output.stderr).starts_with(READ_FAILURE_LABEL));
}

#[test]
fn directory_path_reports_read_failure() {
    let temp = tempfile::tempdir().expect("tempdir");

    let output = run_on(temp.path(), &[]);
    assert!(output.stdout.is_empty());
    assert!(text(&output.stderr).starts_with(READ_FAILURE_LABEL));
}

#[test]
fn env_var_supplies_path_and_argument_overrides_it() {
    let temp = tempfile::tempdir().expect("tempdir");
    let from_env = temp.path().join("env.conf");
    let from_arg = temp.path().join("arg.conf");
    std::fs::write(&from_env, r#"{"source":"env"}"#).expect("write");
    std::fs::write(&from_arg, r#"{"source":"arg"}"#).expect("write");

    let output = cmd()
        .env("CONFPEEK_CONFIG", &from_env)
        .output()
        .expect("run");
    assert!(text(&output.stdout).contains("\"source\": \"env\""));

    let output = cmd()
        .env("CONFPEEK_CONFIG", &from_env)
        .arg(&from_arg)
        .output()
        .expect("run");
    assert!(text(&output.stdout).contains("\"source\": \"arg\""));
}

#[test]
fn indent_flag_changes_width() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("svc.conf");
    std::fs::write(&path, r#"{"port":8080}"#).expect("write");

    let output = run_on(&path, &["--indent", "4"]);
    assert_eq!(
        text(&output.stdout),
        format!("{SUCCESS_LABEL}\n{{\n    \"port\": 8080\n}}\n")
    );
}

#[test]
fn json_error_format_emits_one_json_line() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("absent.conf");

    let output = run_on(&path, &["--error-format", "json"]);
    let stderr = text(&output.stderr);
    let line = stderr.lines().next().expect("line");
    let value: Value = serde_json::from_str(line).expect("json");
    assert_eq!(value["error"]["label"], READ_FAILURE_LABEL);
    assert_eq!(value["error"]["stage"], "read");
    assert_eq!(value["error"]["kind"], "NotFound");
    assert_eq!(value["error"]["path"], path.display().to_string());
}

#[test]
fn color_always_wraps_labels_in_ansi() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("absent.conf");

    let output = run_on(&path, &["--color", "always"]);
    let stderr = text(&output.stderr);
    assert!(stderr.starts_with(&format!("\u{1b}[31m{READ_FAILURE_LABEL}\u{1b}[0m")));
}

#[test]
fn debug_logging_stays_off_stdout() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("flag.conf");
    std::fs::write(&path, "true").expect("write");

    let output = cmd()
        .env("CONFPEEK_LOG", "debug")
        .arg(&path)
        .output()
        .expect("run");
    assert_eq!(text(&output.stdout), format!("{SUCCESS_LABEL}\ntrue\n"));
    let stderr = text(&output.stderr);
    assert!(stderr.contains("reading config"));
    assert!(!stderr.contains('\u{1b}'), "piped log output must be plain: {stderr}");
}

#[test]
fn usage_errors_exit_two() {
    let output = cmd().args(["--indent", "99"]).output().expect("run");
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(text(&output.stderr).starts_with("error:"));

    let output = cmd().args(["--timeout", "soon", "x.conf"]).output().expect("run");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn out_of_range_numbers_print_their_literal() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("big.conf");
    std::fs::write(&path, "[1e400,18446744073709551616]").expect("write");

    let output = run_on(&path, &[]);
    assert_eq!(
        text(&output.stdout),
        format!("{SUCCESS_LABEL}\n[\n  1e400,\n  18446744073709551616\n]\n")
    );
}

#[test]
fn deeply_nested_documents_are_accepted() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("deep.conf");
    let depth = 300;
    std::fs::write(&path, format!("{}{}", "[".repeat(depth), "]".repeat(depth))).expect("write");

    let output = run_on(&path, &["--strict"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(text(&output.stdout).starts_with(SUCCESS_LABEL));
    assert!(output.stderr.is_empty());
}

#[test]
fn lone_surrogate_escape_is_a_parse_failure() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("surrogate.conf");
    std::fs::write(&path, r#""\ud800""#).expect("write");

    let output = run_on(&path, &["--strict"]);
    assert_eq!(output.status.code(), Some(7));
    assert!(output.stdout.is_empty());
    assert!(text(&output.stderr).starts_with(PARSE_FAILURE_LABEL));
}

#[test]
fn leading_bom_is_a_parse_failure() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("bom.conf");
    std::fs::write(&path, b"\xEF\xBB\xBF[1]").expect("write");

    let output = run_on(&path, &[]);
    assert!(output.stdout.is_empty());
    assert!(text(&output.stderr).starts_with(PARSE_FAILURE_LABEL));
}

#[cfg(unix)]
#[test]
fn timed_out_read_reports_and_exits_promptly() {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let temp = tempfile::tempdir().expect("tempdir");
    let fifo = temp.path().join("stalled.fifo");
    let c_path = CString::new(fifo.as_os_str().as_bytes()).expect("cstring");
    assert_eq!(unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) }, 0);

    let mut child = cmd()
        .args(["--strict", "--timeout", "200ms"])
        .arg(&fifo)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn");

    let deadline = Instant::now() + Duration::from_secs(10);
    let status = loop {
        if let Some(status) = child.try_wait().expect("try_wait") {
            break status;
        }
        if Instant::now() > deadline {
            let _ = child.kill();
            let _ = child.wait();
            panic!("confpeek did not exit after its read timed out");
        }
        std::thread::sleep(Duration::from_millis(20));
    };
    assert_eq!(status.code(), Some(8));

    let output = child.wait_with_output().expect("output");
    assert!(output.stdout.is_empty());
    let stderr = text(&output.stderr);
    assert!(stderr.starts_with(READ_FAILURE_LABEL), "stderr: {stderr}");
    assert!(stderr.contains("timed out after 200ms"));
}
