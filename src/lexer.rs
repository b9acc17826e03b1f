use log::debug;

use crate::config::Limits;

/// Splits a raw input line into words.
///
/// Quoting rules: single quotes copy everything up to the closing quote
/// literally; inside double quotes a backslash escapes only `"`, `$` and
/// `\` (any other pair stays two literal characters); outside quotes a
/// backslash escapes whatever follows it. A quote left open at the end
/// of the line silently ends the word there. Quoted, unquoted and
/// escaped runs concatenate into a single word when nothing separates
/// them.
pub struct Lexer {
    limits: Limits,
}

impl Lexer {
    pub fn new(limits: Limits) -> Self {
        Lexer { limits }
    }

    /// Tokenize one line. An empty or whitespace-only line yields an
    /// empty vector. Over-long words are truncated with a warning; once
    /// the token limit is reached the rest of the line is dropped.
    pub fn tokenize(&self, line: &str) -> Vec<String> {
        let chars: Vec<char> = line.chars().collect();
        let mut tokens = Vec::new();
        let mut i = 0;

        while i < chars.len() && tokens.len() < self.limits.max_tokens {
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            if i >= chars.len() {
                break;
            }

            let mut word = String::new();
            let mut len = 0;
            let mut truncated = false;

            while i < chars.len() && !chars[i].is_whitespace() {
                if len >= self.limits.max_word_len {
                    truncated = true;
                    break;
                }
                match chars[i] {
                    quote @ ('\'' | '"') => {
                        i += 1;
                        while i < chars.len()
                            && chars[i] != quote
                            && len < self.limits.max_word_len
                        {
                            if quote == '"'
                                && chars[i] == '\\'
                                && i + 1 < chars.len()
                                && matches!(chars[i + 1], '"' | '$' | '\\')
                            {
                                word.push(chars[i + 1]);
                                i += 2;
                            } else {
                                word.push(chars[i]);
                                i += 1;
                            }
                            len += 1;
                        }
                        if i < chars.len() && chars[i] == quote {
                            i += 1;
                        }
                    }
                    '\\' if i + 1 < chars.len() => {
                        word.push(chars[i + 1]);
                        len += 1;
                        i += 2;
                    }
                    c => {
                        word.push(c);
                        len += 1;
                        i += 1;
                    }
                }
            }

            if truncated {
                eprintln!("marsh: argument too long; truncating");
                while i < chars.len() && !chars[i].is_whitespace() {
                    i += 1;
                }
            }
            tokens.push(word);
        }

        if i < chars.len() {
            debug!(
                "token limit {} reached, dropping remaining input",
                self.limits.max_tokens
            );
        }
        tokens
    }
}
