//! CLI integration tests
//!
//! Drive the built binary against a throwaway home directory. The default
//! house is disabled so no test touches the network.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_strathouse-cli"))
        .env("STRATHOUSE_HOME", home)
        .env("STRATHOUSE_LOG", "off")
        .arg("--no-default-house")
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "CLI command should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn write_part(house_dir: &Path, rel: &str, manifest: &str) {
    let dir = house_dir.join(rel);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("part.toml"), manifest).unwrap();
}

fn local_house(root: &TempDir) -> std::path::PathBuf {
    let house = root.path().join("cli_house");
    write_part(
        &house,
        "part/st/fixed_percent",
        "author = \"alice\"\nversion = \"1.2\"\n\n[part]\ndoc = \"Fixed percent stoploss\"\n\n[part.params]\np = 0.03\n",
    );
    write_part(&house, "sys/simple", "[part]\n");
    write_part(&house, "part/sg/broken", "author = \"unterminated\n");
    house
}

#[test]
fn test_add_local_then_list_parts() {
    let dir = TempDir::new().unwrap();
    let home = dir.path().join("home");
    let house = local_house(&dir);

    let output = run(&home, &["house", "add-local", house.to_str().unwrap()]);
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("Registered 2 part(s) in house 'cli_house'"), "{}", out);
    assert!(out.contains("Skipped"), "{}", out);

    let output = run(&home, &["part", "list"]);
    assert_success(&output);
    assert_eq!(
        stdout(&output).lines().collect::<Vec<_>>(),
        vec!["cli_house.st.fixed_percent", "cli_house.sys.simple"]
    );

    let output = run(&home, &["part", "list", "--category", "sys"]);
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "cli_house.sys.simple");

    let output = run(&home, &["house", "list"]);
    assert_success(&output);
    assert!(stdout(&output).starts_with("cli_house\tlocal\t"));
}

#[test]
fn test_part_info_table_and_json() {
    let dir = TempDir::new().unwrap();
    let home = dir.path().join("home");
    let house = local_house(&dir);
    assert_success(&run(&home, &["house", "add-local", house.to_str().unwrap()]));

    let output = run(&home, &["part", "info", "cli_house.st.fixed_percent"]);
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("| author  |  alice"), "{}", out);
    assert!(out.contains("Fixed percent stoploss"));

    let output = run(&home, &["part", "info", "cli_house.sys.simple", "--json"]);
    assert_success(&output);
    let info: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(info["name"], "cli_house.sys.simple");
    assert_eq!(info["author"], "None");
    assert_eq!(info["version"], "None");
}

#[test]
fn test_part_get_applies_params() {
    let dir = TempDir::new().unwrap();
    let home = dir.path().join("home");
    let house = local_house(&dir);
    assert_success(&run(&home, &["house", "add-local", house.to_str().unwrap()]));

    let output = run(
        &home,
        &["part", "get", "cli_house.st.fixed_percent", "--param", "p=0.1"],
    );
    assert_success(&output);
    let out = stdout(&output);
    let (name, params) = out.split_once('\n').unwrap();
    assert_eq!(name, "cli_house.st.fixed_percent");
    let params: serde_json::Value = serde_json::from_str(params).unwrap();
    assert_eq!(params["p"], serde_json::json!(0.1));
}

#[test]
fn test_remove_house_and_path() {
    let dir = TempDir::new().unwrap();
    let home = dir.path().join("home");
    let house = local_house(&dir);
    assert_success(&run(&home, &["house", "add-local", house.to_str().unwrap()]));

    let output = run(&home, &["house", "path", "cli_house"]);
    assert_success(&output);
    assert_eq!(
        Path::new(stdout(&output).trim()),
        house.canonicalize().unwrap()
    );

    assert_success(&run(&home, &["house", "remove", "cli_house"]));
    let output = run(&home, &["part", "list", "--house", "cli_house"]);
    assert_success(&output);
    assert!(stdout(&output).trim().is_empty());
}

#[test]
fn test_errors_exit_nonzero_with_message() {
    let dir = TempDir::new().unwrap();
    let home = dir.path().join("home");

    let output = run(&home, &["house", "update", "ghost"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "{}", stderr);
    assert!(stderr.contains("ERR_HOUSE_NOT_FOUND"), "{}", stderr);

    let output = run(&home, &["part", "get", "nocategory"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_PART_NAME"));
}
