//! Prompt primitives used by the shell commands and the wizard runner.
//!
//! [`TerminalInteraction`] drives real terminal prompts. [`ScriptedInteraction`]
//! answers the same prompts from lines of text, which is how script mode and
//! the binary tests feed the wizard.

use std::io::{self, BufRead};

use crossterm::{
    cursor,
    terminal::{self, ClearType},
    ExecutableCommand,
};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use crate::cli::core::CommandError;
use crate::cli::output;

pub trait Interaction {
    /// Asks for free text. An empty answer keeps `current`.
    fn text(&mut self, prompt: &str, current: &str) -> Result<String, CommandError>;

    /// Asks the user to pick one of `options`. `None` means nothing was picked.
    fn select(
        &mut self,
        prompt: &str,
        options: &[String],
        default: Option<usize>,
    ) -> Result<Option<usize>, CommandError>;

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, CommandError>;

    fn clear_screen(&mut self) -> Result<(), CommandError> {
        Ok(())
    }
}

pub struct TerminalInteraction {
    theme: ColorfulTheme,
}

impl Default for TerminalInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalInteraction {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Interaction for TerminalInteraction {
    fn text(&mut self, prompt: &str, current: &str) -> Result<String, CommandError> {
        let value = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .with_initial_text(current)
            .allow_empty(true)
            .interact_text()?;
        Ok(value)
    }

    fn select(
        &mut self,
        prompt: &str,
        options: &[String],
        default: Option<usize>,
    ) -> Result<Option<usize>, CommandError> {
        let choice = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(options)
            .default(default.unwrap_or(0))
            .interact_opt()?;
        Ok(choice.or(default))
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, CommandError> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(answer)
    }

    fn clear_screen(&mut self) -> Result<(), CommandError> {
        let mut stdout = io::stdout();
        stdout.execute(terminal::Clear(ClearType::All))?;
        stdout.execute(cursor::MoveTo(0, 0))?;
        Ok(())
    }
}

/// Answers prompts from a line-oriented reader.
///
/// An empty line keeps the current value or the default. Selections accept a
/// 1-based index or an option label (case-insensitive).
pub struct ScriptedInteraction<R> {
    reader: R,
}

impl<R: BufRead> ScriptedInteraction<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Next raw line without its line terminator, or `None` at end of input.
    pub fn next_line(&mut self) -> Result<Option<String>, CommandError> {
        let mut buffer = String::new();
        if self.reader.read_line(&mut buffer)? == 0 {
            return Ok(None);
        }
        Ok(Some(buffer.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }

    fn answer(&mut self, prompt: &str) -> Result<String, CommandError> {
        let line = self.next_line()?.ok_or(CommandError::InputClosed)?;
        output::plain(format!("{prompt}: {line}"));
        Ok(line.trim().to_string())
    }
}

fn resolve_option(answer: &str, options: &[String]) -> Option<usize> {
    if let Ok(position) = answer.parse::<usize>() {
        return (1..=options.len())
            .contains(&position)
            .then(|| position - 1);
    }
    options
        .iter()
        .position(|option| option.eq_ignore_ascii_case(answer))
}

impl<R: BufRead> Interaction for ScriptedInteraction<R> {
    fn text(&mut self, prompt: &str, current: &str) -> Result<String, CommandError> {
        let answer = self.answer(prompt)?;
        if answer.is_empty() {
            Ok(current.to_string())
        } else {
            Ok(answer)
        }
    }

    fn select(
        &mut self,
        prompt: &str,
        options: &[String],
        default: Option<usize>,
    ) -> Result<Option<usize>, CommandError> {
        let answer = self.answer(prompt)?;
        if answer.is_empty() {
            return Ok(default);
        }
        resolve_option(&answer, options)
            .map(Some)
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "`{answer}` is not one of: {}",
                    options.join(", ")
                ))
            })
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, CommandError> {
        let answer = self.answer(prompt)?.to_ascii_lowercase();
        match answer.as_str() {
            "" => Ok(default),
            "y" | "yes" => Ok(true),
            "n" | "no" => Ok(false),
            other => Err(CommandError::InvalidArguments(format!(
                "`{other}` is not a yes/no answer"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn scripted(input: &str) -> ScriptedInteraction<Cursor<Vec<u8>>> {
        ScriptedInteraction::new(Cursor::new(input.as_bytes().to_vec()))
    }

    #[test]
    fn empty_line_keeps_current_text() {
        let mut io = scripted("\nGrace\n");
        assert_eq!(io.text("First name", "Ada").unwrap(), "Ada");
        assert_eq!(io.text("First name", "Ada").unwrap(), "Grace");
    }

    #[test]
    fn select_accepts_index_label_or_default() {
        let options = vec!["Male".to_string(), "Female".to_string()];
        let mut io = scripted("2\nmale\n\n7\n");
        assert_eq!(io.select("Gender", &options, None).unwrap(), Some(1));
        assert_eq!(io.select("Gender", &options, None).unwrap(), Some(0));
        assert_eq!(io.select("Gender", &options, Some(1)).unwrap(), Some(1));
        assert!(io.select("Gender", &options, None).is_err());
    }

    #[test]
    fn end_of_input_is_reported() {
        let mut io = scripted("y\n");
        assert!(io.confirm("Sure?", false).unwrap());
        assert!(matches!(
            io.confirm("Sure?", false),
            Err(CommandError::InputClosed)
        ));
    }
}
