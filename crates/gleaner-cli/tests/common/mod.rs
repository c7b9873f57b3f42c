use std::path::Path;
use std::process::{Command, Output};

/// Run the CLI binary with arguments.
pub fn run_cli(args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_gleaner"));
    cmd.args(args);
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI and expect success, returning stdout.
pub fn run_cli_success(args: &[&str]) -> String {
    let output = run_cli(args);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Write a metadata fixture file and return its path as a string.
pub fn write_metadata(dir: &Path, name: &str, json: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, json).expect("Failed to write metadata fixture");
    path.to_string_lossy().to_string()
}

/// Put a record with an oai_dc payload.
pub fn put_record(store: &str, fixtures: &Path, id: &str, title: &str, datestamp: &str) {
    let file = write_metadata(
        fixtures,
        &format!("{}.json", id),
        &format!("{{\"title\": \"{}\"}}", title),
    );
    run_cli_success(&[
        "put",
        "--store",
        store,
        "--id",
        id,
        "--format",
        "oai_dc",
        "--file",
        &file,
        "--datestamp",
        datestamp,
    ]);
}

/// Count the JSON record lines in CLI stdout.
pub fn record_count(stdout: &str) -> usize {
    stdout.lines().filter(|l| l.starts_with('{')).count()
}

/// Extract the resumption token from the CLI's stderr notes.
pub fn token_from_stderr(output: &Output) -> Option<String> {
    let stderr = String::from_utf8_lossy(&output.stderr);
    stderr
        .lines()
        .find_map(|line| line.strip_prefix("resumptionToken: "))
        .filter(|t| !t.starts_with('('))
        .map(|t| t.to_string())
}
