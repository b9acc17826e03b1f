use std::io::{self, Write};

/// Line-input collaborator: shows the prompt and hands the driver one
/// completed line at a time. Raw-mode editing and completion would sit
/// here, outside the pipeline engine.
pub struct ShellPrompt {
    prompt: String,
}

impl ShellPrompt {
    pub fn new(prompt: &str) -> Self {
        ShellPrompt {
            prompt: prompt.to_string(),
        }
    }

    pub fn show(&self) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(self.prompt.as_bytes())?;
        stdout.flush()
    }

    /// Read one line from stdin. `Ok(None)` signals EOF (e.g. Ctrl-D).
    pub fn read_line(&self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        if io::stdin().read_line(&mut buf)? == 0 {
            println!();
            return Ok(None);
        }
        Ok(Some(buf.trim_end_matches(['\n', '\r']).to_string()))
    }
}
