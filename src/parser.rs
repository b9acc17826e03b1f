use log::debug;

use crate::ast::{Command, Pipeline};

/// Turns a word sequence into a pipeline of commands.
///
/// A single left-to-right pass. `|` closes the current stage and opens
/// the next, redirection operators consume the word after them, and `&`
/// marks background execution when it is the final word. An operator
/// missing its operand (including one sitting at the very end of the
/// line) is not an error: it degrades to a plain argument of the
/// current stage. That permissiveness is part of the surface behavior;
/// do not tighten it.
pub struct Parser<'a> {
    tokens: &'a [String],
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [String]) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn operand(&self) -> Option<&'a String> {
        self.tokens.get(self.pos + 1)
    }

    pub fn parse(&mut self) -> Pipeline {
        let mut commands = Vec::new();
        let mut current = Command::default();

        while let Some(token) = self.tokens.get(self.pos) {
            let is_last = self.pos + 1 == self.tokens.len();
            match token.as_str() {
                "|" if !is_last => {
                    commands.push(std::mem::take(&mut current));
                    self.pos += 1;
                }
                ">" | "1>" if !is_last => {
                    current.stdout_target = self.operand().cloned();
                    current.append = false;
                    self.pos += 2;
                }
                ">>" | "1>>" if !is_last => {
                    current.stdout_target = self.operand().cloned();
                    current.append = true;
                    self.pos += 2;
                }
                "2>" if !is_last => {
                    current.stderr_target = self.operand().cloned();
                    current.append = false;
                    self.pos += 2;
                }
                "2>>" if !is_last => {
                    current.stderr_target = self.operand().cloned();
                    current.append = true;
                    self.pos += 2;
                }
                "&>" | ">&" if !is_last => {
                    current.stdout_target = self.operand().cloned();
                    current.stderr_target = self.operand().cloned();
                    current.append = false;
                    self.pos += 2;
                }
                "<" if !is_last => {
                    current.stdin_source = self.operand().cloned();
                    self.pos += 2;
                }
                "2>&1" => {
                    current.merge_stderr = true;
                    self.pos += 1;
                }
                "&" if is_last => {
                    current.background = true;
                    self.pos += 1;
                }
                _ => {
                    current.argv.push(token.clone());
                    self.pos += 1;
                }
            }
        }
        commands.push(current);

        debug!("parsed pipeline with {} stage(s)", commands.len());
        Pipeline { commands }
    }
}
