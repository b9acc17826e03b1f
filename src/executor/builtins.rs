use std::collections::HashMap;
use std::env;
use std::io::{self, Write};

use log::debug;

use crate::ast::Command;
use crate::error::ExecError;
use crate::executor::path_resolver::PathResolver;
use crate::executor::redirect::{StdioBackup, apply_redirects};

/// Every name the dispatcher treats as in-process. `type` reports these
/// as shell builtins.
pub const BUILTIN_NAMES: &[&str] = &["exit", "echo", "pwd", "cd", "type"];

/// An in-process command.
pub trait Builtin {
    fn name(&self) -> &'static str;

    /// Whether this builtin runs inside the capture/apply/restore
    /// bracket that scopes redirections to the call. `cd` and `exit`
    /// opt out: `cd` must mutate the shell process itself and `exit`
    /// never returns.
    fn scoped(&self) -> bool {
        true
    }

    fn run(&self, argv: &[String]) -> i32;
}

pub struct BuiltinManager {
    commands: HashMap<&'static str, Box<dyn Builtin>>,
}

impl BuiltinManager {
    pub fn new() -> Self {
        let mut manager = BuiltinManager {
            commands: HashMap::new(),
        };
        manager.register(Box::new(ExitCommand));
        manager.register(Box::new(EchoCommand));
        manager.register(Box::new(PwdCommand));
        manager.register(Box::new(CdCommand));
        manager.register(Box::new(TypeCommand));
        manager
    }

    fn register(&mut self, command: Box<dyn Builtin>) {
        self.commands.insert(command.name(), command);
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Run one stage as a builtin. Scoped builtins get the fd bracket:
    /// the standard streams are saved first, the stage's redirections
    /// applied, and the original streams restored on every exit path,
    /// including the one where applying a redirection fails and the
    /// builtin body is skipped.
    pub fn execute(&self, cmd: &Command) -> Result<i32, ExecError> {
        let name = cmd.name().unwrap_or_default();
        let Some(builtin) = self.commands.get(name) else {
            // The driver only dispatches names from this table.
            return Ok(127);
        };

        if !builtin.scoped() {
            return Ok(builtin.run(&cmd.argv));
        }

        let backup = StdioBackup::capture()?;
        let status = match apply_redirects(cmd) {
            Ok(()) => builtin.run(&cmd.argv),
            Err(e) => {
                eprintln!("marsh: {}", e);
                1
            }
        };
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        backup.restore();

        debug!("builtin {} exited with status {}", name, status);
        Ok(status)
    }
}

impl Default for BuiltinManager {
    fn default() -> Self {
        Self::new()
    }
}

struct ExitCommand;

impl Builtin for ExitCommand {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn scoped(&self) -> bool {
        false
    }

    fn run(&self, _argv: &[String]) -> i32 {
        std::process::exit(0);
    }
}

struct EchoCommand;

impl Builtin for EchoCommand {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn run(&self, argv: &[String]) -> i32 {
        println!("{}", argv[1..].join(" "));
        0
    }
}

struct PwdCommand;

impl Builtin for PwdCommand {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn run(&self, _argv: &[String]) -> i32 {
        match env::current_dir() {
            Ok(dir) => {
                println!("{}", dir.display());
                0
            }
            Err(e) => {
                eprintln!("pwd: {}", e);
                1
            }
        }
    }
}

struct CdCommand;

impl Builtin for CdCommand {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn scoped(&self) -> bool {
        false
    }

    fn run(&self, argv: &[String]) -> i32 {
        let target = match argv.get(1).map(|s| s.as_str()) {
            None | Some("~") => match env::var("HOME") {
                Ok(home) => home,
                Err(_) => {
                    eprintln!("cd: HOME not set");
                    return 1;
                }
            },
            Some(path) => path.to_string(),
        };

        if let Err(e) = env::set_current_dir(&target) {
            eprintln!("cd: {}: {}", target, e);
            return 1;
        }
        0
    }
}

struct TypeCommand;

impl Builtin for TypeCommand {
    fn name(&self) -> &'static str {
        "type"
    }

    fn run(&self, argv: &[String]) -> i32 {
        let Some(name) = argv.get(1) else {
            eprintln!("type: missing operand");
            return 1;
        };

        if BUILTIN_NAMES.contains(&name.as_str()) {
            println!("{} is a shell builtin", name);
            return 0;
        }

        match PathResolver.resolve(name) {
            Some(path) => {
                println!("{} is {}", name, path.display());
                0
            }
            None => {
                eprintln!("{} not found", name);
                1
            }
        }
    }
}
