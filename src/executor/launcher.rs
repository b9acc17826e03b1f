use std::ffi::CString;
use std::os::fd::IntoRawFd;
use std::os::unix::io::RawFd;

use libc::{STDIN_FILENO, STDOUT_FILENO};
use log::{debug, warn};
use nix::sys::signal::{SigHandler, Signal, signal};
use nix::sys::wait::{wait, waitpid};
use nix::unistd::{ForkResult, close, dup2, execvp, fork, pipe};

use crate::ast::{Command, Pipeline};
use crate::error::ExecError;
use crate::executor::redirect::apply_redirects;

/// Interrupt disposition installed in a forked child before exec.
///
/// The shell ignores SIGINT for itself; spawn sites pass the policy
/// explicitly so it is visible where the fork happens rather than being
/// implicit process state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildSignals {
    /// Reset SIGINT to the default action so an interactive interrupt
    /// reaches the foreground child, not the shell.
    DefaultInterrupt,
    /// Leave the inherited disposition untouched.
    Inherit,
}

impl ChildSignals {
    fn install(self) {
        if self == ChildSignals::DefaultInterrupt {
            unsafe {
                let _ = signal(Signal::SIGINT, SigHandler::SigDfl);
            }
        }
    }
}

/// Fork and exec one external command.
///
/// The child applies its redirections unscoped (it is replaced or dies
/// regardless) and reports an unresolvable program itself. A foreground
/// parent blocks on exactly this child; a background parent prints the
/// pid and does not wait, and the child is never reaped by this call.
pub fn run_single(cmd: &Command, signals: ChildSignals) -> Result<(), ExecError> {
    let argv = cstring_argv(&cmd.argv)?;

    match unsafe { fork() }? {
        ForkResult::Child => {
            signals.install();
            if let Err(e) = apply_redirects(cmd) {
                eprintln!("marsh: {}", e);
                unsafe { libc::_exit(1) };
            }
            exec_or_exit(&argv, true)
        }
        ForkResult::Parent { child } => {
            if cmd.background {
                println!("[background pid {}]", child);
            } else {
                match waitpid(child, None) {
                    Ok(status) => debug!("pid {} finished: {:?}", child, status),
                    Err(e) => warn!("waitpid {} failed: {}", child, e),
                }
            }
            Ok(())
        }
    }
}

/// Fork a whole pipeline across N-1 anonymous pipes.
///
/// All pipes are created up front. Stage i reads pipe i-1 and writes
/// pipe i; every child closes both ends of every pipe before applying
/// its own redirections, so an explicit `<` or `>` on a stage overrides
/// the pipe wiring. The parent closes all pipe ends after the fork loop
/// (on the failure paths too) and, for a foreground pipeline, reaps
/// every outstanding child before returning.
pub fn run_pipeline(pipeline: &Pipeline, signals: ChildSignals) -> Result<(), ExecError> {
    let n = pipeline.len();
    if n < 2 {
        return match pipeline.head() {
            Some(cmd) => run_single(cmd, signals),
            None => Ok(()),
        };
    }

    // Argv conversion happens before any fork; a bad word fails the
    // whole dispatch here.
    let argvs = pipeline
        .commands
        .iter()
        .map(|cmd| cstring_argv(&cmd.argv))
        .collect::<Result<Vec<_>, _>>()?;

    let mut pipes: Vec<(RawFd, RawFd)> = Vec::with_capacity(n - 1);
    for _ in 0..n - 1 {
        match pipe() {
            Ok((read, write)) => pipes.push((read.into_raw_fd(), write.into_raw_fd())),
            Err(e) => {
                close_all(&pipes);
                return Err(e.into());
            }
        }
    }

    for (i, cmd) in pipeline.commands.iter().enumerate() {
        match unsafe { fork() } {
            Err(e) => {
                close_all(&pipes);
                return Err(e.into());
            }
            Ok(ForkResult::Child) => {
                signals.install();
                if i > 0 {
                    let _ = dup2(pipes[i - 1].0, STDIN_FILENO);
                }
                if i < n - 1 {
                    let _ = dup2(pipes[i].1, STDOUT_FILENO);
                }
                close_all(&pipes);
                // A failed open is reported but the stage still execs
                // with whatever wiring it has.
                if let Err(e) = apply_redirects(cmd) {
                    eprintln!("marsh: {}", e);
                }
                exec_or_exit(&argvs[i], false)
            }
            Ok(ForkResult::Parent { child }) => {
                debug!("pipeline stage {} running as pid {}", i, child);
            }
        }
    }

    close_all(&pipes);

    let background = pipeline.head().is_some_and(|cmd| cmd.background);
    if !background {
        // Every outstanding child, not only this pipeline's stages.
        while wait().is_ok() {}
    }
    Ok(())
}

/// Replace the process image, or die trying. `verbose` selects the
/// single-command behavior of reporting an unresolvable program; a
/// pipeline stage fails silently. A stage with no words at all (the
/// parser permits one between adjacent pipes) just exits.
fn exec_or_exit(argv: &[CString], verbose: bool) -> ! {
    if let Some(program) = argv.first() {
        let _ = execvp(program, argv);
        if verbose {
            eprintln!("{}: command not found", program.to_string_lossy());
            unsafe { libc::_exit(127) };
        }
    }
    unsafe { libc::_exit(1) }
}

fn cstring_argv(argv: &[String]) -> Result<Vec<CString>, ExecError> {
    argv.iter()
        .map(|arg| {
            CString::new(arg.as_str()).map_err(|_| ExecError::InvalidArgument(arg.clone()))
        })
        .collect()
}

fn close_all(pipes: &[(RawFd, RawFd)]) {
    for &(read, write) in pipes {
        let _ = close(read);
        let _ = close(write);
    }
}
