use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn spindle(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("spindle").unwrap();
    // Redirect all on-disk state into the test sandbox
    cmd.env("SPINDLE_HOME", home);
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_lists_commands_and_exit_is_clean() {
    let home = tempdir().unwrap();

    spindle(home.path())
        .write_stdin("help\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("search <query>"))
        .stdout(predicate::str::contains("batchadd <file>"))
        .stdout(predicate::str::contains("volume <level>"));
}

#[test]
fn eof_behaves_like_exit() {
    let home = tempdir().unwrap();

    spindle(home.path()).write_stdin("list\n").assert().success();
}

#[test]
fn unknown_command_keeps_the_loop_alive() {
    let home = tempdir().unwrap();

    spindle(home.path())
        .write_stdin("frobnicate\nlist\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown command 'frobnicate'"))
        .stdout(predicate::str::contains("No tracks in the list yet"));
}

#[test]
fn select_out_of_range_is_reported() {
    let home = tempdir().unwrap();

    spindle(home.path())
        .write_stdin("select 3\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No track at index 3"));
}

#[test]
fn skip_on_empty_library_is_reported() {
    let home = tempdir().unwrap();

    spindle(home.path())
        .write_stdin("skip\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("The track list is empty"));
}

#[test]
fn volume_is_clamped_at_the_prompt() {
    let home = tempdir().unwrap();

    spindle(home.path())
        .write_stdin("volume 150\nvolume -10\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Volume set to 100"))
        .stdout(predicate::str::contains("Volume set to 0"));
}

#[test]
fn play_without_selection_warns() {
    let home = tempdir().unwrap();

    spindle(home.path())
        .write_stdin("play\npause\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No track is selected"));
}

#[test]
fn startup_scan_seeds_the_list() {
    let home = tempdir().unwrap();
    let audio_dir = home.path().join("audio");
    fs::create_dir_all(&audio_dir).unwrap();
    // Not decodable, but listing only needs the scan + tag fallback
    fs::write(audio_dir.join("Seeded Song.mp3"), b"not a real mp3").unwrap();

    spindle(home.path())
        .write_stdin("list\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Seeded Song"));
}

#[test]
fn batchadd_with_missing_file_aborts_only_that_command() {
    let home = tempdir().unwrap();

    spindle(home.path())
        .write_stdin("batchadd /nonexistent/queries.txt\nlist\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cannot read batch file"))
        .stdout(predicate::str::contains("No tracks in the list yet"));
}
