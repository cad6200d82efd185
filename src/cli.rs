use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::config::ConsoleConfig;

#[derive(Parser, Debug)]
#[command(name = "rag-console")]
#[command(version)]
#[command(about = "Upload documents to a RAG service, ask it questions, and watch its stats")]
pub struct Args {
    /// Base URL of the RAG service (overrides the config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// TCP connect timeout in seconds
    #[arg(long, global = true)]
    pub connect_timeout: Option<u64>,

    /// Whole-request timeout in seconds
    #[arg(long, global = true)]
    pub request_timeout: Option<u64>,

    /// Ignore proxy settings from the environment
    #[arg(long, global = true)]
    pub no_proxy: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show document and chunk counts
    Stats {
        /// Also print the generation and embedding models
        #[arg(long)]
        details: bool,
    },
    /// Upload one document (pdf or txt)
    Upload {
        /// File to upload
        path: PathBuf,
    },
    /// Delete every document and reset the service
    Delete {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Ask a question about the uploaded documents
    Ask {
        /// The question; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,

        /// Print the source excerpts the answer was grounded on
        #[arg(long)]
        sources: bool,
    },
    /// Check whether the service is up and has a loaded index
    Health,
    /// Interactive question loop
    Repl,
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Args {
    /// Apply command-line overrides on top of `config`.
    pub fn apply_overrides(&self, mut config: ConsoleConfig) -> ConsoleConfig {
        if let Some(ref url) = self.base_url {
            config.base_url = url.clone();
        }
        if let Some(secs) = self.connect_timeout {
            config.connect_timeout_secs = secs;
        }
        if let Some(secs) = self.request_timeout {
            config.request_timeout_secs = secs;
        }
        config
    }

    /// Tracing filter used when `RUST_LOG` is unset.
    pub fn log_filter(&self, config: &ConsoleConfig) -> String {
        match self.verbose {
            0 => config.log_level.clone(),
            1 => "info".to_string(),
            2 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_stats() {
        let args = Args::parse_from(["rag-console", "stats"]);
        assert_eq!(args.command, Command::Stats { details: false });
        assert!(args.base_url.is_none());
        assert!(!args.no_proxy);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_args_parse_upload_path() {
        let args = Args::parse_from(["rag-console", "upload", "docs/paper.pdf"]);
        assert_eq!(
            args.command,
            Command::Upload {
                path: PathBuf::from("docs/paper.pdf")
            }
        );
    }

    #[test]
    fn test_args_parse_delete_yes() {
        let args = Args::parse_from(["rag-console", "delete", "--yes"]);
        assert_eq!(args.command, Command::Delete { yes: true });
        let args = Args::parse_from(["rag-console", "delete"]);
        assert_eq!(args.command, Command::Delete { yes: false });
    }

    #[test]
    fn test_args_parse_ask_joins_words() {
        let args = Args::parse_from(["rag-console", "ask", "What", "is", "X?", "--sources"]);
        match args.command {
            Command::Ask { question, sources } => {
                assert_eq!(question.join(" "), "What is X?");
                assert!(sources);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_args_ask_requires_question() {
        assert!(Args::try_parse_from(["rag-console", "ask"]).is_err());
    }

    #[test]
    fn test_args_global_flags_after_subcommand() {
        let args = Args::parse_from([
            "rag-console",
            "health",
            "--base-url",
            "http://rag:9000",
            "-vv",
        ]);
        assert_eq!(args.command, Command::Health);
        assert_eq!(args.base_url.as_deref(), Some("http://rag:9000"));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_args_completions_shell() {
        let args = Args::parse_from(["rag-console", "completions", "bash"]);
        assert_eq!(args.command, Command::Completions { shell: Shell::Bash });
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let args = Args::parse_from([
            "rag-console",
            "--base-url",
            "http://other:1",
            "--request-timeout",
            "30",
            "repl",
        ]);
        let cfg = args.apply_overrides(ConsoleConfig::default());
        assert_eq!(cfg.base_url, "http://other:1");
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.connect_timeout_secs, 3);
    }

    #[test]
    fn test_log_filter_follows_verbosity() {
        let cfg = ConsoleConfig::default();
        assert_eq!(Args::parse_from(["rag-console", "repl"]).log_filter(&cfg), "warn");
        assert_eq!(Args::parse_from(["rag-console", "-v", "repl"]).log_filter(&cfg), "info");
        assert_eq!(Args::parse_from(["rag-console", "-vvv", "repl"]).log_filter(&cfg), "trace");
    }
}
