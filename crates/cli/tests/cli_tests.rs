// Integration tests for the `sheetprint` binary: exit codes, the "Wrote"
// lines on stdout, and the files it leaves behind.
//
// Run with: cargo test -p sheetprint-cli --test cli_tests -- --nocapture

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use rust_xlsxwriter::{Format, Formula, Workbook};
use tempfile::{tempdir, TempDir};

/// Command with an empty settings file, so the user's own settings never leak in.
fn sheetprint(dir: &TempDir) -> Command {
    let settings = dir.path().join("empty-settings.toml");
    fs::write(&settings, "").unwrap();
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sheetprint"));
    cmd.arg("--config").arg(settings);
    cmd
}

fn run(dir: &TempDir, args: &[&str]) -> Output {
    sheetprint(dir).args(args).output().expect("run sheetprint")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Two-sheet workbook: "Summary" with a formula, "Q1 - Q2" with text.
fn fixture(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("book.xlsx");
    let mut wb = Workbook::new();

    let summary = wb.add_worksheet();
    summary.set_name("Summary").unwrap();
    summary
        .write_string_with_format(0, 0, "Total", &Format::new().set_bold())
        .unwrap();
    summary.write_number(1, 0, 2).unwrap();
    summary.write_number(2, 0, 5).unwrap();
    summary
        .write_formula(3, 0, Formula::new("=A2+A3").set_result("7"))
        .unwrap();

    let quarters = wb.add_worksheet();
    quarters.set_name("Q1 - Q2").unwrap();
    quarters.write_string(0, 0, "Café").unwrap();

    wb.save(&path).unwrap();
    path
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn export_single_file() {
    let dir = tempdir().unwrap();
    let input = fixture(&dir);
    let out = dir.path().join("book.json");

    let output = run(&dir, &[input.to_str().unwrap(), out.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), format!("Wrote {}", out.display()));

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("{\n  \"file\""), "pretty output expected");
    assert!(text.contains("Café"));

    let json = read_json(&out);
    assert_eq!(json["file"], input.to_str().unwrap());
    let sheets: Vec<_> = json["sheets"].as_object().unwrap().keys().cloned().collect();
    assert_eq!(sheets, vec!["Summary", "Q1 - Q2"]);

    let a4 = &json["sheets"]["Summary"]["cells"]["A4"];
    assert_eq!(a4["formula"], "=A2+A3");
    assert_eq!(a4["value"], 7);
    assert_eq!(json["sheets"]["Summary"]["cells"]["A1"]["font"]["bold"], true);
}

#[test]
fn export_one_sheet_compact() {
    let dir = tempdir().unwrap();
    let input = fixture(&dir);
    let out = dir.path().join("q.json");

    let output = run(&dir, &[
        input.to_str().unwrap(),
        out.to_str().unwrap(),
        "--sheet",
        "Q1 - Q2",
        "--compact",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = fs::read_to_string(&out).unwrap();
    assert!(!text.contains('\n'));
    let json = read_json(&out);
    let sheets: Vec<_> = json["sheets"].as_object().unwrap().keys().cloned().collect();
    assert_eq!(sheets, vec!["Q1 - Q2"]);
}

#[test]
fn export_split_sheets() {
    let dir = tempdir().unwrap();
    let input = fixture(&dir);
    let out_dir = dir.path().join("split");

    let output = run(&dir, &[
        input.to_str().unwrap(),
        out_dir.to_str().unwrap(),
        "--split-sheets",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let summary = out_dir.join("Summary.json");
    let quarters = out_dir.join("Q1_-_Q2.json");
    let lines: Vec<String> = stdout(&output).lines().map(str::to_string).collect();
    assert_eq!(
        lines,
        vec![
            format!("Wrote {}", summary.display()),
            format!("Wrote {}", quarters.display()),
        ]
    );

    let json = read_json(&quarters);
    assert!(json["definedNames"].is_array());
    assert_eq!(json["sheets"].as_object().unwrap().len(), 1);
    assert_eq!(json["sheets"]["Q1 - Q2"]["cells"]["A1"]["value"], "Café");
}

#[test]
fn missing_sheet_exits_2_and_writes_nothing() {
    let dir = tempdir().unwrap();
    let input = fixture(&dir);

    for split in [false, true] {
        let out = dir.path().join(if split { "split-missing" } else { "missing.json" });
        let mut args = vec![
            input.to_str().unwrap().to_string(),
            out.to_str().unwrap().to_string(),
            "--sheet".to_string(),
            "Nope".to_string(),
        ];
        if split {
            args.push("--split-sheets".to_string());
        }
        let output = sheetprint(&dir).args(&args).output().unwrap();

        assert_eq!(output.status.code(), Some(2));
        let err = stderr(&output);
        assert!(err.contains("sheet 'Nope' not found"), "stderr: {err}");
        assert!(err.contains("'Summary'"), "stderr: {err}");
        assert!(!out.exists());
    }
}

#[test]
fn missing_input_exits_3() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out.json");
    let output = run(&dir, &["/nonexistent/book.xlsx", out.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).starts_with("error: "));
}

#[test]
fn non_xlsx_input_exits_4() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.xlsx");
    fs::write(&input, "id,name\n1,Alice\n").unwrap();
    let out = dir.path().join("out.json");

    let output = run(&dir, &[input.to_str().unwrap(), out.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn settings_file_supplies_defaults() {
    let dir = tempdir().unwrap();
    let input = fixture(&dir);
    let settings = dir.path().join("settings.toml");
    fs::write(&settings, "pretty = false\nsheets = [\"Summary\"]\n").unwrap();
    let out = dir.path().join("out.json");

    let output = Command::new(env!("CARGO_BIN_EXE_sheetprint"))
        .args([
            input.to_str().unwrap(),
            out.to_str().unwrap(),
            "--config",
            settings.to_str().unwrap(),
            "-q",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());

    let text = fs::read_to_string(&out).unwrap();
    assert!(!text.contains('\n'));
    let json = read_json(&out);
    assert_eq!(json["sheets"].as_object().unwrap().len(), 1);
}

#[test]
fn usage_error_exits_2() {
    let output = Command::new(env!("CARGO_BIN_EXE_sheetprint"))
        .arg("only-one-arg.xlsx")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}
