use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Capacity limits for the tokenizer.
///
/// A word that reaches `max_word_len` characters is truncated with a
/// warning and the rest of the word is discarded; once `max_tokens`
/// words have been collected, the remainder of the line is dropped
/// silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_word_len: usize,
    pub max_tokens: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_word_len: 4096,
            max_tokens: 128,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub prompt: String,
    pub limits: Limits,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prompt: "marsh$ ".to_string(),
            limits: Limits::default(),
        }
    }
}

/// Loads `~/.marshrc`, a flat `key = value` file. Recognized keys:
/// `prompt`, `max_word_len`, `max_tokens`. Lines starting with `#` and
/// blank lines are skipped.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Read the user's rc file if it exists, falling back to defaults.
    /// A malformed rc file is reported and ignored.
    pub fn load() -> Config {
        let Some(home) = env::var_os("HOME") else {
            return Config::default();
        };
        let path = Path::new(&home).join(".marshrc");
        if !path.exists() {
            return Config::default();
        }
        match Self::load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("marsh: {}: {}", path.display(), e);
                Config::default()
            }
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Config, ConfigError> {
        let src = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::load_from_str(&src)
    }

    pub fn load_from_str(src: &str) -> Result<Config, ConfigError> {
        let mut config = Config::default();

        for (lineno, line) in src.lines().enumerate() {
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::Parse(format!(
                    "line {}: no '=' found: {}",
                    lineno + 1,
                    line
                )));
            };
            // The value keeps everything after the first '=' so a prompt
            // may carry leading or trailing spaces.
            match key.trim() {
                "prompt" => config.prompt = value.to_string(),
                "max_word_len" => config.limits.max_word_len = Self::parse_usize(lineno, value)?,
                "max_tokens" => config.limits.max_tokens = Self::parse_usize(lineno, value)?,
                other => {
                    return Err(ConfigError::Parse(format!(
                        "line {}: unknown key: {}",
                        lineno + 1,
                        other
                    )));
                }
            }
        }

        Ok(config)
    }

    fn parse_usize(lineno: usize, value: &str) -> Result<usize, ConfigError> {
        value.trim().parse::<usize>().map_err(|_| {
            ConfigError::Parse(format!("line {}: not a number: {}", lineno + 1, value.trim()))
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "{}", e),
            ConfigError::Parse(msg) => write!(f, "{}", msg),
        }
    }
}
