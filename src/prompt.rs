use crate::error::{Error, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};

/// Heading shown above an interactive prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prompt {
    pub title: &'static str,
    pub description: &'static str,
}

impl Prompt {
    fn cancelled(&self, source: Option<dialoguer::Error>) -> Error {
        Error::PromptCancelled {
            prompt: self.title.to_string(),
            source,
        }
    }
}

/// Checks free-text input, returning the message to show when it is rejected.
pub type Validator = fn(&str) -> std::result::Result<(), String>;

/// Asks the operator for values. Blocks until one is confirmed.
pub trait Prompter {
    /// Pick one of `options`, with `default` highlighted initially.
    fn select(&mut self, prompt: &Prompt, options: &[String], default: usize) -> Result<String>;

    /// Collect a line of text pre-filled with `initial`. Only returns once
    /// `validate` accepts the value.
    fn input(&mut self, prompt: &Prompt, initial: &str, validate: Validator) -> Result<String>;
}

/// Prompts on the controlling terminal.
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn select(&mut self, prompt: &Prompt, options: &[String], default: usize) -> Result<String> {
        eprintln!("{}", prompt.description);
        let chosen = Select::with_theme(&self.theme)
            .with_prompt(prompt.title)
            .items(options)
            .default(default)
            .interact_opt()
            .map_err(|e| prompt.cancelled(Some(e)))?;

        chosen
            .and_then(|idx| options.get(idx).cloned())
            .ok_or_else(|| prompt.cancelled(None))
    }

    fn input(&mut self, prompt: &Prompt, initial: &str, validate: Validator) -> Result<String> {
        eprintln!("{}", prompt.description);
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt.title)
            .with_initial_text(initial)
            .validate_with(|value: &String| validate(value))
            .interact_text()
            .map_err(|e| prompt.cancelled(Some(e)))
    }
}
