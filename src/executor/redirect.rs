use std::fs::{File, OpenOptions};
use std::os::fd::AsRawFd;
use std::os::unix::io::RawFd;

use libc::{STDERR_FILENO, STDIN_FILENO, STDOUT_FILENO};
use nix::unistd::{close, dup, dup2};

use crate::ast::Command;
use crate::error::ExecError;

/// Saved copies of the three standard descriptors.
///
/// Captured unconditionally before a scoped builtin's redirections are
/// applied, even when the command specifies none, so restoration is
/// always well-defined. Consumed by [`StdioBackup::restore`] right after
/// the builtin returns; never persisted.
pub struct StdioBackup {
    stdin: RawFd,
    stdout: RawFd,
    stderr: RawFd,
}

impl StdioBackup {
    pub fn capture() -> Result<Self, ExecError> {
        let stdin = dup(STDIN_FILENO)?;
        let stdout = match dup(STDOUT_FILENO) {
            Ok(fd) => fd,
            Err(e) => {
                let _ = close(stdin);
                return Err(e.into());
            }
        };
        let stderr = match dup(STDERR_FILENO) {
            Ok(fd) => fd,
            Err(e) => {
                let _ = close(stdin);
                let _ = close(stdout);
                return Err(e.into());
            }
        };
        Ok(StdioBackup {
            stdin,
            stdout,
            stderr,
        })
    }

    /// Put the saved descriptors back onto the standard streams and
    /// close the saved slots. Runs on every exit path of a scoped
    /// builtin call, whether or not the builtin ran.
    pub fn restore(self) {
        let _ = dup2(self.stdin, STDIN_FILENO);
        let _ = close(self.stdin);
        let _ = dup2(self.stdout, STDOUT_FILENO);
        let _ = close(self.stdout);
        let _ = dup2(self.stderr, STDERR_FILENO);
        let _ = close(self.stderr);
    }
}

/// Rebind the standard streams according to the command's redirections,
/// in order: stdin, stdout, stderr, then the `2>&1` merge. The first
/// failure aborts the whole apply; later redirections are not attempted.
///
/// Each opened file is duplicated onto its stream and the temporary
/// descriptor is closed immediately, so nothing outlives the three
/// standard slots. The merge duplicates whatever stdout has become at
/// that point, overriding an explicit stderr target from the same call.
pub fn apply_redirects(cmd: &Command) -> Result<(), ExecError> {
    if let Some(path) = &cmd.stdin_source {
        let file = OpenOptions::new()
            .read(true)
            .open(path)
            .map_err(|e| ExecError::Redirect(path.clone(), e))?;
        dup2(file.as_raw_fd(), STDIN_FILENO)?;
    }

    if let Some(path) = &cmd.stdout_target {
        let file = open_target(path, cmd.append)?;
        dup2(file.as_raw_fd(), STDOUT_FILENO)?;
    }

    if let Some(path) = &cmd.stderr_target {
        let file = open_target(path, cmd.append)?;
        dup2(file.as_raw_fd(), STDERR_FILENO)?;
    }

    if cmd.merge_stderr {
        dup2(STDOUT_FILENO, STDERR_FILENO)?;
    }

    Ok(())
}

fn open_target(path: &str, append: bool) -> Result<File, ExecError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true);
    if append {
        options.append(true);
    } else {
        options.truncate(true);
    }
    options
        .open(path)
        .map_err(|e| ExecError::Redirect(path.to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_restore_roundtrip_without_redirections() {
        let backup = StdioBackup::capture().unwrap();
        backup.restore();
        // The standard streams must still be usable afterwards.
        let probe = StdioBackup::capture().unwrap();
        probe.restore();
    }

    #[test]
    fn test_failed_stdin_open_aborts_before_stdout() {
        let out = std::env::temp_dir().join("marsh-test-abort-order.txt");
        let _ = std::fs::remove_file(&out);

        let cmd = Command {
            argv: vec!["cat".to_string()],
            stdin_source: Some("/definitely/not/a/real/path".to_string()),
            stdout_target: Some(out.to_string_lossy().into_owned()),
            ..Command::default()
        };

        let result = apply_redirects(&cmd);
        assert!(matches!(result, Err(ExecError::Redirect(_, _))));
        // The stdout target must not have been created: the apply
        // stopped at the stdin failure.
        assert!(!out.exists());
    }

    #[test]
    fn test_bracket_scopes_a_redirection_to_the_call() {
        use std::os::fd::BorrowedFd;

        let out = std::env::temp_dir().join("marsh-test-bracket.txt");
        let cmd = Command {
            argv: vec!["echo".to_string()],
            stdout_target: Some(out.to_string_lossy().into_owned()),
            ..Command::default()
        };

        let backup = StdioBackup::capture().unwrap();
        apply_redirects(&cmd).unwrap();
        // Write through the raw descriptor: while the bracket is open,
        // fd 1 is the file.
        let stdout = unsafe { BorrowedFd::borrow_raw(STDOUT_FILENO) };
        let _ = nix::unistd::write(stdout, b"via fd 1\n");
        backup.restore();

        // Anything the test harness itself printed during the window
        // also landed in the file; only our marker line matters.
        let contents = std::fs::read_to_string(&out).unwrap();
        assert!(contents.contains("via fd 1\n"), "got: {contents:?}");
        // And fd 1 is usable again after the restore.
        let probe = StdioBackup::capture().unwrap();
        probe.restore();
        let _ = std::fs::remove_file(&out);
    }

    #[test]
    fn test_open_target_truncates_or_appends() {
        let path = std::env::temp_dir().join("marsh-test-open-target.txt");
        let path_str = path.to_string_lossy().into_owned();

        std::fs::write(&path, "previous contents\n").unwrap();
        {
            let file = open_target(&path_str, true).unwrap();
            drop(file);
        }
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "previous contents\n"
        );

        {
            let file = open_target(&path_str, false).unwrap();
            drop(file);
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");

        let _ = std::fs::remove_file(&path);
    }
}
