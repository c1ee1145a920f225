use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};

/// Placeholder in an open-command template replaced by the target path.
pub const PATH_PLACEHOLDER: &str = "PATH";

/// Outcome of running an external program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellStatus {
    Success,
    /// The program ran and exited unsuccessfully (code is `None` if killed by a signal).
    Failed(Option<i32>),
    /// The program could not be started at all.
    SpawnFailed,
}

impl ShellStatus {
    pub fn success(&self) -> bool {
        matches!(self, ShellStatus::Success)
    }
}

/// Runs external programs on behalf of the mutation coordinator.
pub trait Shell {
    /// Run `program` with `args` to completion and report how it exited.
    fn execute(&self, program: &str, args: &[&OsStr]) -> ShellStatus;
}

/// `Shell` backed by `std::process::Command`, with all stdio detached so
/// nothing is written over the terminal UI.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShell;

impl Shell for SystemShell {
    fn execute(&self, program: &str, args: &[&OsStr]) -> ShellStatus {
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match status {
            Ok(s) if s.success() => ShellStatus::Success,
            Ok(s) => ShellStatus::Failed(s.code()),
            Err(e) => {
                tracing::warn!(program, error = %e, "failed to spawn program");
                ShellStatus::SpawnFailed
            }
        }
    }
}

/// Substitute `path` into an open-command template and split it into a
/// program and its arguments. Returns `None` for a blank template.
pub fn expand_open_command(template: &str, path: &Path) -> Option<(String, Vec<String>)> {
    let expanded = template.replace(PATH_PLACEHOLDER, &path.to_string_lossy());
    let mut parts = expanded.split_whitespace().map(str::to_string);
    let program = parts.next()?;
    Some((program, parts.collect()))
}

/// Run an open-command template against `path` with the terminal's stdio
/// inherited. The caller is responsible for suspending the UI around this.
pub fn open_with(template: &str, path: &Path) -> ShellStatus {
    let Some((program, args)) = expand_open_command(template, path) else {
        return ShellStatus::SpawnFailed;
    };
    tracing::info!(%program, ?args, "opening with external program");
    match Command::new(&program).args(&args).status() {
        Ok(s) if s.success() => ShellStatus::Success,
        Ok(s) => ShellStatus::Failed(s.code()),
        Err(e) => {
            tracing::warn!(%program, error = %e, "failed to spawn open command");
            ShellStatus::SpawnFailed
        }
    }
}
