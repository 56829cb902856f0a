//! E2E workflow tests: `showcase init` → `build` → read commands.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const HEADER: &str = "id,title,student,klass,grade,thumbnail,embedUrl,tags,date\n";

fn showcase_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("showcase"));
    cmd.current_dir(dir);
    cmd.env("SHOWCASE_LOG", "error");
    cmd.env_remove("SHOWCASE_GRADE");
    cmd.env_remove("FORMAT");
    cmd
}

fn json_stdout(dir: &Path, args: &[&str]) -> Value {
    let output = showcase_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("command should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

fn write_rosters(dir: &Path) {
    let rosters = dir.join("showcase/rosters");
    fs::create_dir_all(&rosters).unwrap();
    fs::write(
        rosters.join("kappa.csv"),
        format!(
            "{HEADER}\
k1,Treehouse,Ava,RM225 - G3 - Kappa,,,https://www.tinkercad.com/embed/aaa,tree;house,2025-09-15\n\
k2,Rocket to Mars,Ben,RM225 - G3 - Kappa,,,https://www.tinkercad.com/embed/bbb,,2025-09-18\n\
k3,No link,Cal,RM225 - G3 - Kappa,,,,,2025-09-18\n"
        ),
    )
    .unwrap();
    fs::write(
        rosters.join("xi.csv"),
        format!(
            "{HEADER}x1,Bridge,Dee,RM324 - G5 - Xi,,,https://www.tinkercad.com/embed/ccc,,2025-09-16\n"
        ),
    )
    .unwrap();
}

#[test]
fn init_then_build_lists_example_rows() {
    let dir = TempDir::new().unwrap();

    showcase_cmd(dir.path()).args(["init"]).assert().success();
    assert!(dir.path().join("showcase/rosters/rm225-g3-kappa.csv").is_file());
    assert!(dir.path().join("showcase/projects.json").is_file());

    let summary = json_stdout(dir.path(), &["build"]);
    assert_eq!(summary["accepted"], 15);
    assert_eq!(summary["projects"], 15);

    let listed = json_stdout(dir.path(), &["list"]);
    assert_eq!(listed.as_array().map(Vec::len), Some(15));
}

#[test]
fn second_init_requires_force() {
    let dir = TempDir::new().unwrap();
    showcase_cmd(dir.path()).args(["init"]).assert().success();
    showcase_cmd(dir.path())
        .args(["init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    showcase_cmd(dir.path())
        .args(["init", "--force"])
        .assert()
        .success();
}

#[test]
fn build_reports_skips_and_list_filters() {
    let dir = TempDir::new().unwrap();
    write_rosters(dir.path());

    let summary = json_stdout(dir.path(), &["build"]);
    assert_eq!(summary["accepted"], 3);
    let skipped = summary["skipped"].as_array().expect("skipped array");
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0]["source"], "kappa.csv");

    let all = json_stdout(dir.path(), &["list"]);
    let ids: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["k2", "x1", "k1"]);

    let grade3 = json_stdout(dir.path(), &["list", "--grade", "Grade 3", "--sort", "title-asc"]);
    let titles: Vec<&str> = grade3
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Rocket to Mars", "Treehouse"]);

    let search = json_stdout(dir.path(), &["list", "--search", "HOUSE"]);
    assert_eq!(search.as_array().map(Vec::len), Some(1));
    assert_eq!(search[0]["tags"][0], "tree");

    let page = json_stdout(dir.path(), &["list", "--offset", "1", "-n", "1"]);
    assert_eq!(page.as_array().map(Vec::len), Some(1));
    assert_eq!(page[0]["id"], "x1");
}

#[test]
fn grade_env_sets_default_filter() {
    let dir = TempDir::new().unwrap();
    write_rosters(dir.path());
    showcase_cmd(dir.path()).args(["build"]).assert().success();

    let output = showcase_cmd(dir.path())
        .env("SHOWCASE_GRADE", "Grade 5")
        .args(["list", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let listed: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["id"], "x1");
}

#[test]
fn grades_and_classes_read_snapshot() {
    let dir = TempDir::new().unwrap();
    write_rosters(dir.path());
    showcase_cmd(dir.path()).args(["build"]).assert().success();

    let grades = json_stdout(dir.path(), &["grades"]);
    let grades: Vec<&str> = grades
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(grades.first(), Some(&"All"));
    assert!(grades.contains(&"Grade 3"));
    assert!(grades.contains(&"Multi (2–8)"));

    let classes = json_stdout(dir.path(), &["classes", "--grade", "Grade 3"]);
    let names: Vec<&str> = classes
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert!(names.contains(&"RM225 - G3 - Kappa"));
    assert!(classes.as_array().unwrap().iter().all(|c| c["grade"] == "Grade 3"));
}

#[test]
fn text_mode_is_tab_separated() {
    let dir = TempDir::new().unwrap();
    write_rosters(dir.path());
    showcase_cmd(dir.path()).args(["build"]).assert().success();

    showcase_cmd(dir.path())
        .args(["list", "--format", "text", "--grade", "Grade 5"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ID\tTITLE\tSTUDENT"))
        .stdout(predicate::str::contains("x1\tBridge\tDee"));
}

#[test]
fn config_flag_applies_to_init_and_build() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("alt.toml"),
        "[paths]\nroot = \"alt\"\nrosters = \"alt/rosters\"\nimages = \"alt/images\"\ndataset = \"alt/projects.json\"\n",
    )
    .unwrap();

    showcase_cmd(dir.path())
        .args(["--config", "alt.toml", "init"])
        .assert()
        .success();
    assert!(dir.path().join("alt/projects.json").is_file());
    assert!(dir.path().join("alt/rosters/rm225-g3-kappa.csv").is_file());
    assert!(!dir.path().join("showcase").exists());

    let summary = json_stdout(dir.path(), &["--config", "alt.toml", "build"]);
    assert_eq!(summary["accepted"], 15);
    assert!(
        summary["dataset"]
            .as_str()
            .is_some_and(|path| path.ends_with("alt/projects.json"))
    );
}

#[test]
fn hand_edited_snapshot_rows_without_embed_are_not_listed() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("showcase")).unwrap();
    fs::write(
        dir.path().join("showcase/projects.json"),
        r#"{
  "meta": { "title": "Showcase" },
  "classes": [],
  "projects": [
    { "id": "a1", "title": "Castle", "student": "Eli", "klass": "RM225 - G3 - Kappa",
      "embedUrl": "https://www.tinkercad.com/embed/a1", "date": "2025-09-15" },
    { "id": "a2", "title": "Blank link", "student": "Fay", "klass": "RM225 - G3 - Kappa",
      "embedUrl": "", "date": "2025-09-16" },
    { "id": "", "title": "No id", "student": "Gus", "klass": "RM225 - G3 - Kappa",
      "embedUrl": "https://www.tinkercad.com/embed/a3", "date": "2025-09-17" }
  ]
}"#,
    )
    .unwrap();

    let listed = json_stdout(dir.path(), &["list"]);
    let ids: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["a1"]);
}
