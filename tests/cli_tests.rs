//! CLI integration tests

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn modserve(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("modserve").unwrap();
    cmd.current_dir(dir).env_remove("MODSERVE_CONFIG").env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_packages_lists_resolved_entries() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "node_modules/foo/package.json", r#"{"main": "./lib/foo.js"}"#);
    write(dir.path(), "node_modules/foo/lib/foo.js", "module.exports = 1;");
    write(dir.path(), "node_modules/nomain/package.json", "{}");

    modserve(dir.path())
        .args(["packages", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"foo\""))
        .stdout(predicate::str::contains("node_modules/foo/lib/foo.js"))
        .stdout(predicate::str::contains("nomain").not());
}

#[test]
fn test_packages_fails_without_packages_root() {
    let dir = TempDir::new().unwrap();

    modserve(dir.path())
        .arg("packages")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Packages root does not exist"));
}

#[test]
fn test_bundle_writes_scripts_and_styles() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "modserve.toml",
        "[bundle]\npaths = [\"wwwroot/styles/*.css\", \"wwwroot/app.js\"]\n",
    );
    write(dir.path(), "wwwroot/styles/site.css", "body { margin: 0; }");
    write(dir.path(), "wwwroot/app.js", "// boot\nstart();");

    modserve(dir.path()).arg("bundle").assert().success();

    let scripts = fs::read_to_string(dir.path().join("dist/scripts.html")).unwrap();
    let styles = fs::read_to_string(dir.path().join("dist/styles.css")).unwrap();
    assert_eq!(scripts, "<script>start();</script>\n");
    assert_eq!(styles, "body { margin: 0; }\n");
}

#[test]
fn test_bundle_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "modserve.toml", "[bundle]\npaths = [\"wwwroot/missing.js\"]\n");

    modserve(dir.path())
        .arg("bundle")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to assemble bundle"));

    assert!(!dir.path().join("dist/scripts.html").exists());
}

#[test]
fn test_init_writes_loadable_config() {
    let dir = TempDir::new().unwrap();

    modserve(dir.path()).arg("init").assert().success();
    let content = fs::read_to_string(dir.path().join("modserve.toml")).unwrap();
    assert!(content.contains("[packages]"));
    assert!(content.contains("wwwroot/scripts/**/*.js"));

    modserve(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
