mod builtins;
mod launcher;
mod path_resolver;
mod redirect;

pub use builtins::{BUILTIN_NAMES, Builtin, BuiltinManager};
pub use launcher::{ChildSignals, run_pipeline, run_single};
pub use path_resolver::PathResolver;
pub use redirect::{StdioBackup, apply_redirects};

use log::debug;

use crate::ast::Pipeline;
use crate::error::ExecError;

/// Dispatches one parsed pipeline: builtin, single external command, or
/// multi-stage external pipeline.
pub struct Executor {
    builtins: BuiltinManager,
}

impl Executor {
    pub fn new() -> Self {
        Executor {
            builtins: BuiltinManager::new(),
        }
    }

    /// Drive one line's pipeline to completion. A head stage with no
    /// words (the user typed only operators) is a no-op. A builtin name
    /// at the head is run in-process and any further stages are
    /// dropped; everything else is forked.
    pub fn dispatch(&self, pipeline: &Pipeline) -> Result<(), ExecError> {
        let Some(head) = pipeline.head() else {
            return Ok(());
        };
        let Some(name) = head.name() else {
            debug!("no command words, skipping dispatch");
            return Ok(());
        };

        if self.builtins.is_builtin(name) {
            self.builtins.execute(head)?;
            return Ok(());
        }

        if pipeline.len() > 1 {
            run_pipeline(pipeline, ChildSignals::DefaultInterrupt)
        } else {
            run_single(head, ChildSignals::DefaultInterrupt)
        }
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}
