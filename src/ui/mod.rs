//! User interface module - interaction (prompts), formatting and progress.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - `progress` - Bounded progress bar for the replay loop
//! - This module - Interactive prompts behind the [Prompter] trait, so runs
//!   can be driven by a terminal or by scripted answers

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use console::style;

use crate::error::{ReleaseError, Result};

pub mod formatter;
pub mod progress;

// Re-export formatter functions for convenience
pub use formatter::{
    display_banner, display_boundary_warning, display_conflict_instructions, display_error,
    display_release_summary, display_replay_plan, display_run_config, display_status,
    display_success,
};
pub use progress::ProgressBar;

/// Source of operator answers
pub trait Prompter {
    /// Ask for free text; an empty answer yields `default`
    fn input(&mut self, message: &str, default: &str) -> Result<String>;

    /// Ask to pick one of `options`; returns the 0-based index
    fn select(&mut self, message: &str, options: &[String], default: usize) -> Result<usize>;

    /// Ask a yes/no question; an empty answer yields `default`
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;
}

/// Parses a yes/no answer. Empty input yields the default, anything
/// unrecognised is `None`.
pub fn parse_confirmation(answer: &str, default: bool) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Parses a 1-based selection, or an option typed out in full
/// (case-insensitive). Empty input yields the default index.
pub fn parse_selection(answer: &str, options: &[String], default: usize) -> Option<usize> {
    let answer = answer.trim();
    if answer.is_empty() {
        return Some(default);
    }

    if let Ok(index) = answer.parse::<usize>() {
        return (index > 0 && index <= options.len()).then(|| index - 1);
    }

    options.iter().position(|o| o.eq_ignore_ascii_case(answer))
}

/// Prompts on stdout and reads answers from stdin.
pub struct TerminalPrompter<R: BufRead> {
    input: R,
}

impl TerminalPrompter<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        TerminalPrompter {
            input: io::stdin().lock(),
        }
    }
}

impl<R: BufRead> TerminalPrompter<R> {
    pub fn from_reader(input: R) -> Self {
        TerminalPrompter { input }
    }

    fn read_answer(&mut self) -> Result<String> {
        io::stdout().flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ReleaseError::prompt("input closed before an answer was given"));
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead> Prompter for TerminalPrompter<R> {
    fn input(&mut self, message: &str, default: &str) -> Result<String> {
        print!("{} {} ({}): ", style("?").green(), style(message).bold(), default);
        let answer = self.read_answer()?;

        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }

    fn select(&mut self, message: &str, options: &[String], default: usize) -> Result<usize> {
        println!("{} {}", style("?").green(), style(message).bold());
        for (i, option) in options.iter().enumerate() {
            println!("  {}. {}", i + 1, option);
        }

        loop {
            print!("Select (1-{}) [default: {}]: ", options.len(), default + 1);
            let answer = self.read_answer()?;

            match parse_selection(&answer, options, default) {
                Some(index) => return Ok(index),
                None => display_error(&format!("'{}' is not a valid choice", answer)),
            }
        }
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };

        loop {
            print!("{} {} ({}): ", style("?").green(), style(message).bold(), hint);
            let answer = self.read_answer()?;

            match parse_confirmation(&answer, default) {
                Some(confirmed) => return Ok(confirmed),
                None => display_error("Please answer 'y' or 'n'"),
            }
        }
    }
}

/// Replays prepared answers, in order, and records each question asked.
///
/// An empty answer takes the default, as pressing Enter would.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedPrompter {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Questions asked so far
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next_answer(&mut self, message: &str) -> Result<String> {
        self.asked.push(message.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| ReleaseError::prompt(format!("no scripted answer for '{}'", message)))
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&mut self, message: &str, default: &str) -> Result<String> {
        let answer = self.next_answer(message)?;
        if answer.trim().is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer.trim().to_string())
        }
    }

    fn select(&mut self, message: &str, options: &[String], default: usize) -> Result<usize> {
        let answer = self.next_answer(message)?;
        parse_selection(&answer, options, default)
            .ok_or_else(|| ReleaseError::prompt(format!("'{}' is not a valid choice", answer)))
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        let answer = self.next_answer(message)?;
        parse_confirmation(&answer, default)
            .ok_or_else(|| ReleaseError::prompt(format!("'{}' is not yes or no", answer)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        vec![
            "GITHUB".to_string(),
            "BITBUCKET".to_string(),
            "GITLAB".to_string(),
        ]
    }

    #[test]
    fn test_parse_confirmation() {
        assert_eq!(parse_confirmation("", true), Some(true));
        assert_eq!(parse_confirmation("  ", false), Some(false));
        assert_eq!(parse_confirmation("Y", false), Some(true));
        assert_eq!(parse_confirmation("yes", false), Some(true));
        assert_eq!(parse_confirmation("No", true), Some(false));
        assert_eq!(parse_confirmation("maybe", true), None);
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("", &options(), 0), Some(0));
        assert_eq!(parse_selection("2", &options(), 0), Some(1));
        assert_eq!(parse_selection("gitlab", &options(), 0), Some(2));
        assert_eq!(parse_selection("0", &options(), 0), None);
        assert_eq!(parse_selection("4", &options(), 0), None);
        assert_eq!(parse_selection("svn", &options(), 0), None);
    }

    #[test]
    fn test_terminal_prompter_reads_lines() {
        let input = io::Cursor::new("release/x\n\nfoo\n3\n\n");
        let mut prompter = TerminalPrompter::from_reader(input);

        assert_eq!(prompter.input("Branch", "dev").unwrap(), "release/x");
        assert!(prompter.confirm("Go?", true).unwrap());
        // "foo" is rejected and the question asked again
        assert_eq!(prompter.select("Service", &options(), 0).unwrap(), 2);
        assert_eq!(prompter.input("Tags", "T-1").unwrap(), "T-1");
    }

    #[test]
    fn test_terminal_prompter_eof_is_an_error() {
        let mut prompter = TerminalPrompter::from_reader(io::Cursor::new(""));
        assert!(prompter.confirm("Go?", true).is_err());
    }

    #[test]
    fn test_scripted_prompter_defaults_and_exhaustion() {
        let mut prompter = ScriptedPrompter::new(["", "n"]);
        assert_eq!(prompter.input("Base", "dev").unwrap(), "dev");
        assert!(!prompter.confirm("Go?", true).unwrap());
        assert_eq!(prompter.remaining(), 0);
        assert!(prompter.confirm("Again?", true).is_err());
        assert_eq!(prompter.asked(), &["Base", "Go?", "Again?"]);
    }
}
