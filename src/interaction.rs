/*!
 * User interaction seam.
 *
 * The controller asks a `Prompter` whether to preview and where to write.
 * `ConsolePrompter` talks to a terminal, `AutoPrompter` answers from
 * command-line flags so runs can be unattended.
 */

use anyhow::{Context, Result};
use std::io::{BufRead, Write};

/// Questions the controller may ask the user
pub trait Prompter {
    /// Yes/no question. `title` names the step being confirmed.
    fn confirm(&mut self, title: &str, prompt: &str) -> Result<bool>;

    /// Free-text question. `None` means the user declined to answer.
    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<Option<String>>;
}

/// Prompter reading answers from stdin and writing questions to stdout
#[derive(Debug, Default)]
pub struct ConsolePrompter;

impl Prompter for ConsolePrompter {
    fn confirm(&mut self, title: &str, prompt: &str) -> Result<bool> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        ask_confirm(&mut stdin.lock(), &mut stdout.lock(), title, prompt)
    }

    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<Option<String>> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        ask_input(&mut stdin.lock(), &mut stdout.lock(), prompt, default)
    }
}

/// Prompter that never blocks: answers come from preset values
#[derive(Debug, Clone, Default)]
pub struct AutoPrompter {
    /// Answer to every confirmation
    pub confirm_answer: bool,
    /// Answer to every input question; falls back to the default
    pub input_answer: Option<String>,
}

impl AutoPrompter {
    pub fn new(confirm_answer: bool, input_answer: Option<String>) -> Self {
        Self { confirm_answer, input_answer }
    }
}

impl Prompter for AutoPrompter {
    fn confirm(&mut self, _title: &str, _prompt: &str) -> Result<bool> {
        Ok(self.confirm_answer)
    }

    fn input(&mut self, _prompt: &str, default: Option<&str>) -> Result<Option<String>> {
        Ok(self.input_answer.clone().or_else(|| default.map(String::from)))
    }
}

/// Ask a yes/no question on `writer`, reading the answer from `reader`.
/// Anything other than y/yes is a no, as is end of input.
pub fn ask_confirm<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    title: &str,
    prompt: &str,
) -> Result<bool> {
    write!(writer, "[{}] {} [y/N] ", title, prompt)?;
    writer.flush()?;

    let mut answer = String::new();
    reader.read_line(&mut answer).context("Failed to read answer")?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Ask for a line of text. An empty answer takes the default; end of input
/// without an answer returns `None`.
pub fn ask_input<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    prompt: &str,
    default: Option<&str>,
) -> Result<Option<String>> {
    match default {
        Some(default) => write!(writer, "{} [{}] ", prompt, default)?,
        None => write!(writer, "{} ", prompt)?,
    }
    writer.flush()?;

    let mut answer = String::new();
    let read = reader.read_line(&mut answer).context("Failed to read answer")?;
    if read == 0 {
        return Ok(None);
    }

    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(default.map(String::from));
    }
    Ok(Some(answer.to_string()))
}
