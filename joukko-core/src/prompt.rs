//! Asking the user things
//!
//! Session operations only see the [`Prompt`] trait. Implementations read
//! raw answers however they like and run them through [`ask_until_valid`]
//! with one of the parsers below, so the re-ask rules live in one place.

use crate::Result;

/// Label of the extra choice that lets the user type a branch name
pub const OTHER_OPTION: &str = "Other...";

/// Interactive questions the session operations ask
pub trait Prompt {
    /// Yes/no question; loops until the answer is one of the two
    fn confirm(&self, question: &str) -> Result<bool>;

    /// Free text; a blank answer takes `default` when one is given
    fn input(&self, question: &str, default: Option<&str>) -> Result<String>;

    /// Pick one of `options`, returning its index
    fn choose(&self, question: &str, options: &[String]) -> Result<usize>;
}

/// Re-ask until `parse` accepts the answer
///
/// `on_invalid` is told about each rejected answer, typically to print a
/// hint before the next attempt.
pub fn ask_until_valid<T>(
    mut ask: impl FnMut() -> Result<String>,
    mut parse: impl FnMut(&str) -> Option<T>,
    mut on_invalid: impl FnMut(&str),
) -> Result<T> {
    loop {
        let answer = ask()?;
        match parse(&answer) {
            Some(value) => return Ok(value),
            None => on_invalid(&answer),
        }
    }
}

/// `y`/`yes` or `n`/`no`, any case
pub fn parse_confirmation(answer: &str) -> Option<bool> {
    match answer.trim().to_uppercase().as_str() {
        "Y" | "YES" => Some(true),
        "N" | "NO" => Some(false),
        _ => None,
    }
}

/// Non-blank answer, or the default when the answer is blank
pub fn parse_input(answer: &str, default: Option<&str>) -> Option<String> {
    let answer = answer.trim();
    if !answer.is_empty() {
        return Some(answer.to_string());
    }
    default
        .filter(|d| !d.trim().is_empty())
        .map(|d| d.to_string())
}

/// Index into a list of `option_count` entries
pub fn parse_selection(answer: &str, option_count: usize) -> Option<usize> {
    answer
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|index| *index < option_count)
}

/// Question text with the default shown in parentheses
pub fn with_default(question: &str, default: Option<&str>) -> String {
    match default.filter(|d| !d.is_empty()) {
        Some(default) => format!("{} ({})", question, default),
        None => question.to_string(),
    }
}

/// Sorted branch names for a picker, optionally followed by [`OTHER_OPTION`]
pub fn branch_options(mut branches: Vec<String>, show_other: bool) -> Vec<String> {
    branches.sort();
    branches.dedup();
    if show_other {
        branches.push(OTHER_OPTION.to_string());
    }
    branches
}
