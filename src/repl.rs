//! Interactive loop: every line is a question unless it is a command.

use std::io::{self, BufRead, Write};

use colored::*;

use crate::adapter::ClientAdapter;
use crate::terminal::print_stats_details;
use crate::transport::Backend;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Stats,
    Help,
    Empty,
    Ask(String),
}

pub fn parse_line(line: &str) -> ReplCommand {
    let trimmed = line.trim();
    match trimmed.to_lowercase().as_str() {
        "" => ReplCommand::Empty,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        "stats" => ReplCommand::Stats,
        "help" | "?" => ReplCommand::Help,
        _ => ReplCommand::Ask(trimmed.to_string()),
    }
}

fn print_banner() {
    println!("{}", "=".repeat(60).dimmed());
    println!("{}", " Ask questions about your documents.".bright_cyan().bold());
    println!("{}", "=".repeat(60).dimmed());
    println!("  {}  show document and chunk counts", "stats".bright_blue());
    println!("  {}   exit (also 'exit' or 'q')", "quit".bright_blue());
    println!("  anything else is sent as a question");
}

/// Run until `quit` or end of input. Returns the number of questions sent.
pub async fn run<B: Backend>(
    adapter: &ClientAdapter<B>,
    mut input: impl BufRead,
) -> io::Result<usize> {
    print_banner();
    let mut asked = 0;

    loop {
        print!("\n{} ", "question>".bright_green().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            println!();
            break;
        }

        match parse_line(&line) {
            ReplCommand::Quit => break,
            ReplCommand::Empty => continue,
            ReplCommand::Help => print_banner(),
            ReplCommand::Stats => {
                let snapshot = adapter.fetch_stats().await;
                print_stats_details(&snapshot);
            }
            ReplCommand::Ask(question) => {
                adapter.submit_query(&question).await;
                asked += 1;
            }
        }
    }

    println!("{}", "Goodbye!".bright_cyan());
    Ok(asked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::rc::Rc;

    use crate::terminal::{AnswerPanel, StatsPanel, TerminalDialogs};
    use crate::transport::HttpBackend;

    fn unreachable_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    #[test]
    fn quit_aliases() {
        for line in ["quit", "EXIT", " q \n"] {
            assert_eq!(parse_line(line), ReplCommand::Quit, "line: {line:?}");
        }
    }

    #[test]
    fn stats_and_help() {
        assert_eq!(parse_line("Stats\n"), ReplCommand::Stats);
        assert_eq!(parse_line("?"), ReplCommand::Help);
    }

    #[test]
    fn blank_line_is_empty() {
        assert_eq!(parse_line("   \n"), ReplCommand::Empty);
    }

    #[test]
    fn other_text_is_a_trimmed_question() {
        assert_eq!(
            parse_line("  What is X?\n"),
            ReplCommand::Ask("What is X?".to_string())
        );
    }

    #[test]
    fn question_mentioning_stats_is_still_a_question() {
        assert_eq!(
            parse_line("show stats for chapter 2"),
            ReplCommand::Ask("show stats for chapter 2".to_string())
        );
    }

    #[test]
    fn loop_stops_at_quit_and_counts_questions() {
        let stats = Rc::new(StatsPanel::new());
        let answer = Rc::new(AnswerPanel::new());
        let adapter = ClientAdapter::new(
            HttpBackend::builder(unreachable_url()).no_proxy().build().unwrap(),
            Rc::clone(&stats),
            Rc::clone(&answer),
            Rc::clone(&answer),
            TerminalDialogs::with_input(false, Box::new(std::io::empty())),
        );
        let input = Cursor::new("stats\n\nWhat is X?\nquit\nnever asked\n");

        let asked = tokio_test::block_on(run(&adapter, input)).unwrap();
        assert_eq!(asked, 1);
        assert_eq!(stats.text(), "Could not fetch stats");
        assert!(answer.text().starts_with("Error: "));
        assert!(answer.is_shown());
    }

    #[test]
    fn loop_ends_at_end_of_input() {
        let adapter = ClientAdapter::new(
            HttpBackend::builder(unreachable_url()).no_proxy().build().unwrap(),
            StatsPanel::new(),
            AnswerPanel::new(),
            AnswerPanel::new(),
            TerminalDialogs::with_input(false, Box::new(std::io::empty())),
        );
        let asked = tokio_test::block_on(run(&adapter, Cursor::new(""))).unwrap();
        assert_eq!(asked, 0);
    }
}
