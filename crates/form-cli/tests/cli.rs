use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_fs::TempDir;
use serde_json::Value;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn formkit() -> Command {
    let mut cmd = Command::cargo_bin("formkit").expect("binary");
    cmd.env_remove("FORMKIT_BASE_URL")
        .env_remove("FORMKIT_LINK_TEMPLATE")
        .env_remove("FORMKIT_UPLOAD_BASE_URL")
        .env("RUST_LOG", "off");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("run formkit");
    assert!(
        output.status.success(),
        "formkit failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("utf8 stdout")
}

#[test]
fn build_saves_and_exports_schema() {
    let workspace = TempDir::new().expect("temp dir");
    let out = workspace.path().join("forms").join("lunch.json");
    let script = [
        "title Lunch order",
        "add text",
        "label 1 Your Name",
        "add select",
        "options 2 Pizza, Sushi",
        "add file",
        "move 3 1",
        "save",
        "quit",
    ]
    .join("\n");

    let stdout = stdout_of(
        formkit()
            .args(["--base-url", "https://forms.test", "build", "--out"])
            .arg(&out)
            .write_stdin(script),
    );

    assert!(stdout.contains("Form saved! Link: https://forms.test/forms/"));
    let schema: Value = serde_json::from_str(&fs::read_to_string(&out).expect("export"))
        .expect("schema json");
    assert_eq!(schema["title"], "Lunch order");
    assert_eq!(schema["fields"][0]["type"], "file");
    assert_eq!(schema["fields"][1]["label"], "Your Name");
    assert_eq!(schema["fields"][2]["options"][1], " Sushi");
    assert!(schema["fields"][0].get("options").is_none());
}

#[test]
fn build_link_honours_template_variable() {
    let stdout = stdout_of(
        formkit()
            .env("FORMKIT_BASE_URL", "https://env.test")
            .env("FORMKIT_LINK_TEMPLATE", "{{base_url}}/f/{{id}}")
            .arg("build")
            .write_stdin("add text\nsave\n"),
    );
    assert!(stdout.contains("Form saved! Link: https://env.test/f/"));
}

#[test]
fn build_resumes_exported_schema() {
    let workspace = TempDir::new().expect("temp dir");
    let out = workspace.path().join("survey.json");

    let stdout = stdout_of(
        formkit()
            .arg("build")
            .arg("--from")
            .arg(fixture("survey.schema.json"))
            .arg("--out")
            .arg(&out)
            .write_stdin("label 2 Comments\nsave\nquit\n"),
    );

    assert!(stdout.contains("Form saved! Link: http://localhost:3000/forms/"));
    let schema: Value = serde_json::from_str(&fs::read_to_string(&out).expect("export"))
        .expect("schema json");
    assert_eq!(schema["title"], "Team Survey");
    assert_eq!(schema["fields"][0]["label"], "Your Name");
    assert_eq!(schema["fields"][1]["id"], "notes");
    assert_eq!(schema["fields"][1]["label"], "Comments");
}

#[test]
fn build_refuses_schema_with_duplicate_ids() {
    let output = formkit()
        .arg("build")
        .arg("--from")
        .arg(fixture("duplicate.schema.json"))
        .write_stdin("label 2 Renamed\nsave\nquit\n")
        .output()
        .expect("run formkit");
    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(!stdout.contains("Form saved!"));
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("duplicate question id"), "stderr: {}", stderr);
}

#[test]
fn fill_refuses_invalid_schema() {
    let output = formkit()
        .args(["fill", "broken", "--schema"])
        .arg(fixture("duplicate.schema.json"))
        .write_stdin("")
        .output()
        .expect("run formkit");
    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(!stdout.contains("Form submitted!"));
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("schema is invalid"), "stderr: {}", stderr);
}

#[test]
fn fill_mock_form_submits_answers_and_upload_url() {
    let workspace = TempDir::new().expect("temp dir");
    let upload = workspace.path().join("cv.pdf");
    fs::write(&upload, b"%PDF-1.7").expect("write upload");
    let script = format!("Ada Lovelace\n3\n{}\n", upload.display());

    let stdout = stdout_of(formkit().args(["fill", "abc123"]).write_stdin(script));

    assert!(stdout.contains("Loading form..."));
    assert!(stdout.contains("# Mock Form Title"));
    assert!(stdout.contains("Form submitted!"));
    assert!(stdout.contains("\"q1\": \"Ada Lovelace\""));
    assert!(stdout.contains("\"q2\": \"Blue\""));
    assert!(stdout.contains("\"q3\": \"https://fakeazure.blob.core.windows.net/.../cv.pdf\""));
}

#[test]
fn fill_with_schema_and_answers_runs_without_prompts() {
    let stdout = stdout_of(
        formkit()
            .env("FORMKIT_UPLOAD_BASE_URL", "https://blob.test/up")
            .args(["fill", "survey", "--format", "json", "--cbor", "--schema"])
            .arg(fixture("survey.schema.json"))
            .arg("--answers")
            .arg(fixture("survey.answers.json"))
            .write_stdin(""),
    );

    assert!(stdout.contains("\"form_id\": \"survey\""));
    assert!(stdout.contains("\"attached_file\": \"badge.txt\""));
    assert!(stdout.contains("\"badge\": \"https://blob.test/up/badge.txt\""));
    assert!(stdout.contains("\"color\": \"Green\""));
    assert!(stdout.contains("Answers (CBOR hex): "));
}

#[test]
fn open_dispatches_fill_route() {
    let stdout = stdout_of(
        formkit()
            .args(["open", "/forms/xyz?ref=mail"])
            .write_stdin("\n\n\n"),
    );
    assert!(stdout.contains("# Mock Form Title"));
    assert!(stdout.contains("Form submitted!"));
}

#[test]
fn open_dispatches_build_route() {
    let stdout = stdout_of(formkit().args(["open", "/build"]).write_stdin("types\nquit\n"));
    assert!(stdout.contains("Form builder"));
    assert!(stdout.contains("Multiple Choice"));
}

#[test]
fn open_rejects_unknown_route() {
    formkit()
        .args(["open", "/settings"])
        .write_stdin("")
        .assert()
        .failure();
}

#[test]
fn validate_reports_bad_answers() {
    let output = formkit()
        .arg("validate")
        .arg("--schema")
        .arg(fixture("survey.schema.json"))
        .arg("--answers")
        .arg(fixture("bad.answers.json"))
        .output()
        .expect("run formkit");
    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("Schema: valid"));
    assert!(stdout.contains("Answers: invalid"));
    assert!(stdout.contains("/color - invalid option"));
    assert!(stdout.contains("Unknown answer fields: extra"));
}

#[test]
fn validate_accepts_schema_alone() {
    let stdout = stdout_of(
        formkit()
            .arg("validate")
            .arg("--schema")
            .arg(fixture("survey.schema.json")),
    );
    assert!(stdout.contains("Schema: valid"));
}

#[test]
fn render_text_lists_trimmed_options() {
    let stdout = stdout_of(
        formkit()
            .arg("render")
            .arg("--schema")
            .arg(fixture("survey.schema.json")),
    );
    assert!(stdout.contains("# Team Survey"));
    assert!(stdout.contains("2) Green"));
    assert!(stdout.contains("Status: need_input (0/4)"));
}

#[test]
fn schema_command_prints_json_schema() {
    let stdout = stdout_of(formkit().arg("schema"));
    let schema: Value = serde_json::from_str(&stdout).expect("json schema");
    assert_eq!(schema["title"], "FormSchema");
    assert!(schema["properties"].get("fields").is_some());
}
