/// One pipeline stage: the words to run plus the redirections and
/// background flag attached to it by the parser.
///
/// `argv[0]` is the program or builtin name. All redirection fields are
/// plain paths; `append` selects the truncation policy for both the
/// stdout and stderr targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    pub argv: Vec<String>,
    pub stdin_source: Option<String>,
    pub stdout_target: Option<String>,
    pub stderr_target: Option<String>,
    pub append: bool,
    pub merge_stderr: bool,
    pub background: bool,
}

impl Command {
    /// The program or builtin name, if any non-operator word was given.
    pub fn name(&self) -> Option<&str> {
        self.argv.first().map(|s| s.as_str())
    }
}

/// An ordered chain of commands connected by pipes, executed as a unit.
///
/// The pipeline owns every stage; dropping it releases the whole chain
/// exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    pub commands: Vec<Command>,
}

impl Pipeline {
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The first stage. Background execution of a multi-stage pipeline
    /// is decided by this stage's flag.
    pub fn head(&self) -> Option<&Command> {
        self.commands.first()
    }
}
