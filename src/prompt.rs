use anyhow::{Context, Result};
use inquire::{Confirm, InquireError};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};

/// Trait for asking the user yes/no questions
/// This allows us to abstract away the interactive prompts for testing
pub trait Prompter {
    /// Ask a yes/no question, falling back to `default` on an empty answer
    ///
    /// # Errors
    /// Returns an error if the prompt cannot be shown or the user interrupts it
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}

/// Real implementation: `inquire::Confirm` on a terminal, a plain line read otherwise
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if io::stdin().is_terminal() {
            return interpret_confirm(Confirm::new(prompt).with_default(default).prompt());
        }

        let suffix = if default { "[Y/n]" } else { "[y/N]" };
        let mut stderr = io::stderr();
        write!(stderr, "{} {} ", prompt, suffix)?;
        stderr.flush()?;

        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read answer from stdin")?;
        // keep piped transcripts readable
        writeln!(stderr)?;

        Ok(parse_answer(&line, default))
    }
}

/// Esc declines the question; Ctrl-C stops the whole command
///
/// # Errors
/// Returns an error if the prompt was interrupted or could not be shown
pub fn interpret_confirm(result: Result<bool, InquireError>) -> Result<bool> {
    match result {
        Ok(answer) => Ok(answer),
        Err(InquireError::OperationCanceled) => Ok(false),
        Err(InquireError::OperationInterrupted) => anyhow::bail!("Interrupted."),
        Err(e) => Err(e).context("Failed to show prompt"),
    }
}

/// Interprets a typed answer: `y`/`yes` accept, blank keeps the default, anything else declines
#[must_use]
pub fn parse_answer(input: &str, default: bool) -> bool {
    let answer = input.trim().to_lowercase();
    if answer.is_empty() {
        return default;
    }
    answer == "y" || answer == "yes"
}

/// Mock implementation for testing that answers from a queue
///
/// Once the queue runs dry every prompt receives its default answer.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<bool>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().copied().collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    /// Prompts shown so far, in order
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        self.asked.borrow_mut().push(prompt.to_string());
        Ok(self.answers.borrow_mut().pop_front().unwrap_or(default))
    }
}
