#[cfg(not(target_arch = "wasm32"))]
use std::rc::Rc;

#[cfg(not(target_arch = "wasm32"))]
use clap::{CommandFactory, Parser};
#[cfg(not(target_arch = "wasm32"))]
use colored::*;
#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::EnvFilter;

#[cfg(not(target_arch = "wasm32"))]
use rag_console::adapter::{ClientAdapter, Submission};
#[cfg(not(target_arch = "wasm32"))]
use rag_console::cli::{Args, Command};
#[cfg(not(target_arch = "wasm32"))]
use rag_console::config::ConsoleConfig;
#[cfg(not(target_arch = "wasm32"))]
use rag_console::terminal::{print_stats_details, AnswerPanel, StatsPanel, TerminalDialogs};
#[cfg(not(target_arch = "wasm32"))]
use rag_console::transport::{Backend, HttpBackend, UploadFile};

#[cfg(not(target_arch = "wasm32"))]
fn init_logging(default_filter: &str) -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| format!("logging init failed: {e}"))?;
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Command::Completions { shell } = args.command {
        let mut cmd = Args::command();
        clap_complete::generate(shell, &mut cmd, "rag-console", &mut std::io::stdout());
        return Ok(());
    }

    let config = args.apply_overrides(ConsoleConfig::load_or_default(args.config.as_deref())?);
    config.validate()?;
    init_logging(&args.log_filter(&config))?;

    let mut builder = HttpBackend::builder(config.base_url.clone())
        .connect_timeout(config.connect_timeout())
        .request_timeout(config.request_timeout());
    if args.no_proxy {
        builder = builder.no_proxy();
    }
    let backend = builder.build()?;

    let assume_yes = matches!(args.command, Command::Delete { yes: true });
    let answer = Rc::new(AnswerPanel::new());
    let adapter = ClientAdapter::new(
        backend,
        StatsPanel::new(),
        Rc::clone(&answer),
        Rc::clone(&answer),
        TerminalDialogs::stdin(assume_yes),
    );

    run(&adapter, args.command).await?;
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
async fn run<B: Backend>(
    adapter: &ClientAdapter<B>,
    command: Command,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Stats { details } => {
            let snapshot = adapter.fetch_stats().await;
            if details {
                print_stats_details(&snapshot);
            }
        }
        Command::Upload { path } => {
            adapter
                .submit_upload_from(async { UploadFile::from_path(&path).await.map(Some) })
                .await;
        }
        Command::Delete { .. } => {
            adapter.submit_delete().await;
        }
        Command::Ask { question, sources } => {
            let outcome = adapter.submit_query(&question.join(" ")).await;
            if let Submission::Done(outcome) = outcome {
                if sources && !outcome.sources.is_empty() {
                    println!();
                    println!("{}", "Sources".bright_blue().bold());
                    for (i, excerpt) in outcome.sources.iter().enumerate() {
                        println!("{}. {}", i + 1, excerpt);
                    }
                }
            }
        }
        Command::Health => {
            let _ = adapter.check_health().await;
        }
        Command::Repl => {
            adapter.start().await;
            let stdin = std::io::stdin();
            rag_console::repl::run(adapter, stdin.lock()).await?;
        }
        Command::Completions { .. } => {}
    }
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
