use crate::error::{AurwatchError, Result};
use crate::traits::{CommandRunner, CommandSpec};
use std::fs::OpenOptions;
use std::path::Path;
use std::process::{Command, Stdio};

/// Spawns real processes: stdin closed, stdout and stderr appended to the log.
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, spec: &CommandSpec, log_path: &Path) -> Result<bool> {
        which::which(&spec.program).map_err(|e| AurwatchError::SystemCommandFailed {
            command: spec.to_string(),
            reason: format!("'{}' not found: {}", spec.program, e),
        })?;

        let stdout = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .map_err(|e| AurwatchError::IoError {
                path: log_path.to_path_buf(),
                source: e,
            })?;
        let stderr = stdout.try_clone()?;

        let status = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&spec.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .status()
            .map_err(|e| AurwatchError::SystemCommandFailed {
                command: spec.to_string(),
                reason: e.to_string(),
            })?;

        Ok(status.success())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::build::strategy::host_command;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn output_lands_in_log_and_status_is_reported() {
        let dir = tempdir().expect("tempdir");
        let log = dir.path().join("build.log");

        let ok = ProcessRunner
            .run(&host_command("echo out; echo err >&2", dir.path()), &log)
            .expect("run");
        assert!(ok);

        let failed = ProcessRunner
            .run(&host_command("exit 3", dir.path()), &log)
            .expect("run");
        assert!(!failed);

        let content = fs::read_to_string(&log).expect("read log");
        assert!(content.contains("out"));
        assert!(content.contains("err"));
    }

    #[test]
    fn command_runs_in_requested_directory() {
        let dir = tempdir().expect("tempdir");
        let log = dir.path().join("build.log");
        fs::write(dir.path().join("PKGBUILD"), "pkgname=yay").expect("write");

        assert!(
            ProcessRunner
                .run(&host_command("test -f PKGBUILD", dir.path()), &log)
                .expect("run")
        );
    }

    #[test]
    fn stdin_is_closed() {
        let dir = tempdir().expect("tempdir");
        let log = dir.path().join("build.log");
        // `read` fails immediately on EOF instead of blocking.
        assert!(
            !ProcessRunner
                .run(&host_command("read line", dir.path()), &log)
                .expect("run")
        );
    }

    #[test]
    fn missing_program_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let spec = CommandSpec {
            program: "definitely-not-a-real-binary-aurwatch".into(),
            args: vec![],
            cwd: dir.path().to_path_buf(),
        };
        assert!(ProcessRunner.run(&spec, &dir.path().join("log")).is_err());
    }
}
