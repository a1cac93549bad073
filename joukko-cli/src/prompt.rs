//! Terminal implementation of the session prompt

use colored::Colorize;
use dialoguer::Input;
use joukko_core::prompt::{
    ask_until_valid, parse_confirmation, parse_input, parse_selection, with_default, Prompt,
};
use joukko_core::{Error, Result};

/// Asks on the terminal, re-asking until the answer is usable
pub struct TerminalPrompt;

impl TerminalPrompt {
    fn read_line(&self, question: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(question)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| Error::Prompt(e.to_string()))
    }

    fn hint(&self, text: &str) {
        eprintln!("  {}", text.red());
    }
}

impl Prompt for TerminalPrompt {
    fn confirm(&self, question: &str) -> Result<bool> {
        let question = format!("{} (y/n)", question);
        ask_until_valid(
            || self.read_line(&question),
            parse_confirmation,
            |_| self.hint("Please answer yes or no."),
        )
    }

    fn input(&self, question: &str, default: Option<&str>) -> Result<String> {
        let question = with_default(question, default);
        ask_until_valid(
            || self.read_line(&question),
            |answer| parse_input(answer, default),
            |_| self.hint("Invalid input."),
        )
    }

    fn choose(&self, question: &str, options: &[String]) -> Result<usize> {
        println!();
        for (index, option) in options.iter().enumerate() {
            println!("  [{}]: {}", index.to_string().green(), option);
        }
        println!();

        ask_until_valid(
            || self.read_line(question),
            |answer| parse_selection(answer, options.len()),
            |_| self.hint("Invalid selection."),
        )
    }
}
