use log::debug;

use crate::config::Config;
use crate::executor::Executor;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::prompt::ShellPrompt;

/// The per-line lifecycle: read, tokenize, parse, dispatch, report,
/// release. Runs until EOF or the `exit` builtin terminates the
/// process. Dispatch errors are reported and the loop re-prompts;
/// nothing that happens on one line carries over to the next.
pub fn start(config: &Config) {
    let prompt = ShellPrompt::new(&config.prompt);
    let lexer = Lexer::new(config.limits);
    let executor = Executor::new();

    loop {
        let _ = prompt.show();
        let line = match prompt.read_line() {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("marsh: input error: {}", e);
                break;
            }
        };

        let tokens = lexer.tokenize(&line);
        if tokens.is_empty() {
            continue;
        }

        let pipeline = Parser::new(&tokens).parse();
        debug!("dispatching {} stage(s)", pipeline.len());
        if let Err(e) = executor.dispatch(&pipeline) {
            eprintln!("marsh: {}", e);
        }
        // The pipeline drops here, releasing the whole chain.
    }
}
