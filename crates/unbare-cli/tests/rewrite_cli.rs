//! Integration tests for `unbare rewrite` and `unbare resolve`.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::{tempdir, TempDir};

fn unbare(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_unbare"))
        .arg("--cwd")
        .arg(cwd)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run unbare")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Project with one package per entry field and a couple of source files.
fn project() -> TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path();

    let escalade = root.join("node_modules/escalade");
    fs::create_dir_all(escalade.join("dist")).unwrap();
    fs::write(
        escalade.join("package.json"),
        r#"{"main": "dist/index.js", "exports": {".": {"import": "./dist/index.mjs", "require": "./dist/index.js"}}}"#,
    )
    .unwrap();
    fs::write(escalade.join("dist/index.mjs"), "").unwrap();
    fs::write(escalade.join("dist/index.js"), "").unwrap();

    let imr = root.join("node_modules/import-meta-resolve");
    fs::create_dir_all(&imr).unwrap();
    fs::write(imr.join("package.json"), r#"{"main": "index.js"}"#).unwrap();
    fs::write(imr.join("index.js"), "").unwrap();

    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(
        root.join("src/app.js"),
        "import path from 'path'\nimport escalade from 'escalade'\nimport grainbox from 'grainbox'\n",
    )
    .unwrap();
    fs::write(root.join("src/util.mjs"), "export {resolve} from 'import-meta-resolve'\n").unwrap();
    fs::write(root.join("src/local.js"), "import './app.js'\n").unwrap();

    dir
}

#[test]
fn test_rewrite_single_file_prints_code() {
    let dir = project();
    let output = unbare(dir.path(), &["rewrite", "src/app.js"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        stdout(&output),
        "import path from 'path'\nimport escalade from '/node_modules/escalade/dist/index.mjs'\nimport grainbox from 'grainbox'\n"
    );
    // Without --write the file is untouched
    assert!(fs::read_to_string(dir.path().join("src/app.js"))
        .unwrap()
        .contains("from 'escalade'"));
}

#[test]
fn test_rewrite_directory_in_place() {
    let dir = project();
    let output = unbare(dir.path(), &["rewrite", "--write", "src"]);
    assert!(output.status.success());

    assert_eq!(
        fs::read_to_string(dir.path().join("src/util.mjs")).unwrap(),
        "export {resolve} from '/node_modules/import-meta-resolve/index.js'\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("src/local.js")).unwrap(),
        "import './app.js'\n"
    );
    // Store contents are never rewritten
    assert_eq!(
        fs::read_to_string(dir.path().join("node_modules/escalade/dist/index.mjs")).unwrap(),
        ""
    );

    let out = stdout(&output);
    assert!(out.contains("local.js: unchanged"), "{out}");
    assert!(out.contains("util.mjs: written"), "{out}");
}

#[test]
fn test_rewrite_json_report() {
    let dir = project();
    let output = unbare(dir.path(), &["--json", "rewrite", "src"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["files"].as_array().unwrap().len(), 3);
    assert_eq!(json["rewritten"], 2);
    assert_eq!(json["unresolved"], 1);
    assert_eq!(json["errors"], 0);

    let app = &json["files"][0];
    assert!(app["path"].as_str().unwrap().ends_with("app.js"));
    assert_eq!(app["specifiers"][0]["outcome"]["status"], "unchanged");
    assert_eq!(app["specifiers"][0]["outcome"]["kind"], "builtin");
    assert_eq!(app["specifiers"][1]["outcome"]["status"], "rewritten");
    assert_eq!(
        app["specifiers"][2]["outcome"]["reason"]["code"],
        "PACKAGE_NOT_FOUND"
    );
}

#[test]
fn test_rewrite_no_sources() {
    let dir = tempdir().unwrap();
    let output = unbare(dir.path(), &["rewrite", "."]);
    assert!(!output.status.success());
}

#[test]
fn test_resolve_bare() {
    let dir = project();
    let output = unbare(dir.path(), &["resolve", "escalade"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "/node_modules/escalade/dist/index.mjs");
}

#[test]
fn test_resolve_failure_exits_non_zero() {
    let dir = project();
    let output = unbare(dir.path(), &["resolve", "grainbox", "--from", "src/app.js"]);
    assert!(!output.status.success());
    assert_eq!(stdout(&output).trim(), "PACKAGE_NOT_FOUND");
}

#[test]
fn test_resolve_json_passthrough() {
    let dir = project();
    let output = unbare(dir.path(), &["--json", "resolve", "node:fs"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["status"], "unchanged");
    assert_eq!(json["kind"], "builtin");
    assert!(json.get("to").is_none());
}

#[test]
fn test_config_file_prefix() {
    let dir = project();
    fs::write(dir.path().join("unbare.json"), r#"{"urlPrefix": "/deps/"}"#).unwrap();

    let output = unbare(dir.path(), &["resolve", "import-meta-resolve"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "/deps/import-meta-resolve/index.js");
}

#[test]
fn test_malformed_config_fails() {
    let dir = project();
    fs::write(dir.path().join("unbare.json"), "{ nope").unwrap();

    let output = unbare(dir.path(), &["resolve", "escalade"]);
    assert!(!output.status.success());
}

#[test]
fn test_version() {
    let output = unbare(Path::new("."), &["version"]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("unbare "));
}

/// Project with a `Latin-1` comment before an import of an installed package.
fn latin1_project() -> TempDir {
    let dir = tempdir().unwrap();
    let pkg = dir.path().join("node_modules/a");
    fs::create_dir_all(&pkg).unwrap();
    fs::write(pkg.join("package.json"), r#"{"main": "index.js"}"#).unwrap();
    fs::write(pkg.join("index.js"), "").unwrap();
    fs::write(dir.path().join("x.js"), b"// caf\xe9 latin-1\nimport a from 'a'\n").unwrap();
    dir
}

#[test]
fn test_write_refuses_non_utf8_source() {
    let dir = latin1_project();
    let output = unbare(dir.path(), &["rewrite", "--write", "x.js"]);

    assert!(!output.status.success());
    assert!(stdout(&output).contains("x.js: error:"));
    assert_eq!(
        fs::read(dir.path().join("x.js")).unwrap(),
        b"// caf\xe9 latin-1\nimport a from 'a'\n"
    );
}

#[test]
fn test_print_tolerates_non_utf8_source() {
    let dir = latin1_project();
    let output = unbare(dir.path(), &["rewrite", "x.js"]);

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "// caf\u{FFFD} latin-1\nimport a from '/node_modules/a/index.js'\n"
    );
}

#[test]
fn test_version_json() {
    let output = unbare(Path::new("."), &["--json", "version"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["name"], "unbare");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}
