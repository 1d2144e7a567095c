use assert_cmd::Command;
use std::path::Path;

pub fn run_kit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("kit").expect("Failed to find kit binary");
    cmd.env_remove("RUST_LOG");
    cmd.env("NO_COLOR", "1");
    cmd.current_dir(dir);
    cmd.args(args);
    cmd
}

pub fn kit_commit(dir: &Path, message: &str) -> Command {
    run_kit_command(dir, &["commit", "-m", message])
}

/// Stdout of a successful kit invocation, trimmed
pub fn kit_output(dir: &Path, args: &[&str]) -> String {
    let output = run_kit_command(dir, args).assert().success().get_output().stdout.clone();
    String::from_utf8(output).expect("kit printed invalid UTF-8").trim().to_string()
}
