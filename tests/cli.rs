use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const WORDLIST: &str = "the\nquick\nbrown\nfox\njumps\nover\nlazy\ndog\n";

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("dicts")).unwrap();
        fs::write(dir.path().join("dicts").join("en_US.txt"), WORDLIST).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("spellmark").unwrap();
        cmd.current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.path("config"))
            .env("XDG_DATA_HOME", self.path("data"))
            .env_remove("SPELLMARK_LOG")
            .arg("--dict-dir")
            .arg(self.path("dicts"))
            .arg("--personal-dict")
            .arg(self.path("personal.txt"))
            .arg("--no-color");
        cmd
    }
}

#[test]
fn reports_misspelled_word_and_fails() {
    let ws = Workspace::new();
    let file = ws.write("note.txt", "The quikc brown fox\n");

    ws.cmd()
        .arg(&file)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("1:5 quikc"))
        .stdout(predicate::str::contains("→ quick"));
}

#[test]
fn clean_file_passes() {
    let ws = Workspace::new();
    let file = ws.write("note.txt", "The quick brown fox\n");

    ws.cmd()
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("No spelling errors found"));
}

#[test]
fn no_fail_exits_zero() {
    let ws = Workspace::new();
    let file = ws.write("note.txt", "The quikc brown fox\n");

    ws.cmd().arg("--no-fail").arg(&file).assert().success();
}

#[test]
fn json_output_lists_ranges() {
    let ws = Workspace::new();
    let file = ws.write("note.txt", "The quikc brown fox\nover teh dog\n");

    let output = ws
        .cmd()
        .args(["-o", "json", "--no-fail"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["files_checked"], 1);
    assert_eq!(json["total_flagged"], 2);

    let ranges = json["files"][0]["ranges"].as_array().unwrap();
    assert_eq!(ranges[0]["word"], "quikc");
    assert_eq!(ranges[0]["start"], 4);
    assert_eq!(ranges[0]["end"], 9);
    assert_eq!(ranges[1]["word"], "teh");
    assert_eq!(ranges[1]["line"], 2);
    assert_eq!(ranges[1]["column"], 6);
}

#[test]
fn personal_dictionary_words_are_accepted() {
    let ws = Workspace::new();
    let file = ws.write("note.txt", "The quikc brown fox\n");

    ws.cmd()
        .args(["--add-to-dict", "quikc"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(ws.path("personal.txt")).unwrap(), "quikc\n");

    ws.cmd().arg(&file).assert().success();
}

#[test]
fn missing_dictionary_reports_error() {
    let ws = Workspace::new();
    let file = ws.write("note.txt", "Bonjour\n");

    ws.cmd()
        .args(["-l", "fr_FR"])
        .arg(&file)
        .assert()
        .stderr(predicate::str::contains("fr_FR"));
}

#[test]
fn suggest_prints_corrections() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["suggest", "quikc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("quick"));

    ws.cmd()
        .args(["suggest", "brown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("spelled correctly"));
}

#[test]
fn dict_build_then_info() {
    let ws = Workspace::new();
    let wordlist = ws.write("words.txt", "Zebra\nyak\n# comment\n\nyak\n");

    ws.cmd()
        .args(["dict", "build"])
        .arg(&wordlist)
        .arg("en_GB")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 words"));
    assert!(ws.path("dicts").join("en_GB.dict").exists());

    ws.cmd()
        .args(["dict", "info", "en_GB"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Words: 2"));

    ws.cmd()
        .args(["dict", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("en_GB"))
        .stdout(predicate::str::contains("en_US"));
}

#[test]
fn local_config_selects_language() {
    let ws = Workspace::new();
    fs::write(ws.path("dicts").join("de_DE.txt"), "hallo\nwelt\n").unwrap();
    ws.write(".spellmark.toml", "language = \"de_DE\"\n");
    let file = ws.write("note.txt", "Hallo Welt\n");

    ws.cmd().arg(&file).assert().success();
}

#[test]
fn completion_script_is_generated() {
    Command::cargo_bin("spellmark")
        .unwrap()
        .args(["--completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("spellmark"));
}
