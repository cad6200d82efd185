//! Terminal display targets: panels print to stdout, dialogs use stdin.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};

use colored::*;

use crate::adapter::StatsSnapshot;
use crate::view::{Dialogs, Region, TextTarget};

/// The stats line. Every write is printed immediately.
#[derive(Debug, Default)]
pub struct StatsPanel {
    last: RefCell<String>,
}

impl StatsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.last.borrow().clone()
    }
}

impl TextTarget for StatsPanel {
    fn set_text(&self, text: &str) {
        *self.last.borrow_mut() = text.to_string();
        println!("{} {}", "stats".bright_blue().bold(), text);
    }
}

/// Print the model lines of `snapshot` under the stats line.
pub fn print_stats_details(snapshot: &StatsSnapshot) {
    for (label, value) in snapshot.details() {
        println!("  {} {}", label.dimmed(), value);
    }
}

/// The answer box. Text is buffered and printed when the box is shown,
/// the way the page reveals the hidden answer container.
#[derive(Debug, Default)]
pub struct AnswerPanel {
    text: RefCell<String>,
    shown: RefCell<bool>,
}

impl AnswerPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn is_shown(&self) -> bool {
        *self.shown.borrow()
    }
}

impl TextTarget for AnswerPanel {
    fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
    }
}

impl Region for AnswerPanel {
    fn show(&self) {
        *self.shown.borrow_mut() = true;
        println!();
        println!("{}", "Answer".bright_green().bold());
        println!("{}", self.text.borrow());
    }
}

/// Alerts go to stdout; confirmations read one line from `input`.
pub struct TerminalDialogs {
    assume_yes: bool,
    input: RefCell<Box<dyn BufRead>>,
}

impl TerminalDialogs {
    /// Dialogs reading confirmations from stdin.
    pub fn stdin(assume_yes: bool) -> Self {
        Self::with_input(assume_yes, Box::new(io::BufReader::new(io::stdin())))
    }

    pub fn with_input(assume_yes: bool, input: Box<dyn BufRead>) -> Self {
        Self {
            assume_yes,
            input: RefCell::new(input),
        }
    }
}

impl Dialogs for TerminalDialogs {
    fn alert(&self, message: &str) {
        println!("{} {}", "!".bright_yellow().bold(), message);
    }

    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} {} ", message.bright_red(), "[y/N]".dimmed());
        let _ = io::stdout().flush();

        let mut line = String::new();
        match self.input.borrow_mut().read_line(&mut line) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_affirmative(&line),
        }
    }
}

/// `y` or `yes`, any case, surrounding whitespace ignored.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
