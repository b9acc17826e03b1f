use std::fmt;
use std::io;

/// Failures surfaced while dispatching one input line.
///
/// Every variant is local to a single line: the driver reports it on
/// stderr and returns to the prompt. Nothing here terminates the shell.
#[derive(Debug)]
pub enum ExecError {
    /// Generic I/O failure while driving a dispatch.
    Io(io::Error),
    /// A system call (fork, pipe, dup, wait) failed.
    Sys(nix::Error),
    /// A redirection target could not be opened; carries the path.
    Redirect(String, io::Error),
    /// A word cannot be handed to exec (embedded NUL byte).
    InvalidArgument(String),
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::Io(e) => write!(f, "{}", e),
            ExecError::Sys(e) => write!(f, "{}", e),
            ExecError::Redirect(target, e) => write!(f, "{}: {}", target, e),
            ExecError::InvalidArgument(word) => write!(f, "invalid argument: {}", word),
        }
    }
}

impl std::error::Error for ExecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecError::Io(e) => Some(e),
            ExecError::Sys(e) => Some(e),
            ExecError::Redirect(_, e) => Some(e),
            ExecError::InvalidArgument(_) => None,
        }
    }
}

impl From<io::Error> for ExecError {
    fn from(e: io::Error) -> Self {
        ExecError::Io(e)
    }
}

impl From<nix::Error> for ExecError {
    fn from(e: nix::Error) -> Self {
        ExecError::Sys(e)
    }
}
