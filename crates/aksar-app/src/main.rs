// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Aksar: Khmer/Latin scanned-document OCR with per-page bilingual view
//
// Entry point. Initialises logging, loads configuration, starts the session
// and runs the interactive shell on stdin/stdout.

mod commands;
mod services;
mod view;

use std::io::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use aksar_core::config::AppConfig;
use aksar_core::error::Result;
use aksar_core::types::LanguageMode;
use aksar_session::SessionSnapshot;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{info, warn};

use commands::{HELP, ShellCommand, parse_command};
use services::app_services::AppServices;
use view::{render_error, render_snapshot};

/// Read Khmer and English text off scanned pages, one page at a time.
#[derive(Debug, Parser)]
#[command(name = "aksar", version)]
struct Args {
    /// Settings file [default: $XDG_CONFIG_HOME/aksar/config.json]
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Language mode for documents opened without one (khm, eng, khm+eng)
    #[arg(long, short)]
    mode: Option<LanguageMode>,

    /// Document to open at startup
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("Aksar starting");

    let services = match start(&args) {
        Ok(services) => services,
        Err(err) => {
            eprintln!("{}", render_error(&err));
            return ExitCode::FAILURE;
        }
    };

    let progress = spawn_progress(services.session().subscribe());

    if let Some(path) = args.file.clone() {
        execute(&services, ShellCommand::Open { path, mode: None }).await;
    } else {
        println!("{HELP}");
    }

    let outcome = shell(&services).await;
    progress.abort();

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", render_error(&err));
            ExitCode::FAILURE
        }
    }
}

fn start(args: &Args) -> Result<AppServices> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    if let Some(mode) = args.mode {
        config.default_mode = mode;
    }
    AppServices::init(config)
}

/// Read commands until `quit` or end of input.
async fn shell(services: &AppServices) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("aksar> ");
        let _ = std::io::stdout().flush();

        let Some(line) = lines.next_line().await? else {
            println!();
            return Ok(());
        };

        match parse_command(&line) {
            Ok(ShellCommand::Quit) => return Ok(()),
            Ok(command) => execute(services, command).await,
            Err(message) => println!("{message}"),
        }
    }
}

async fn execute(services: &AppServices, command: ShellCommand) {
    let session = services.session();
    let outcome = match command {
        ShellCommand::Open { path, mode } => {
            let mode = mode.unwrap_or(services.config().default_mode);
            match session.load(path, mode).await {
                Ok(snapshot) => println!("{}", render_snapshot(&snapshot)),
                Err(err) => {
                    warn!(error = %err, "open failed");
                    println!("{}", render_error(&err));
                }
            }
            return;
        }
        ShellCommand::Next => session.next().await,
        ShellCommand::Prev => session.prev().await,
        ShellCommand::Retry => session.retry().await,
        ShellCommand::Toggle => session.toggle_view().await,
        ShellCommand::Show => session.snapshot().await,
        ShellCommand::Help => {
            println!("{HELP}");
            return;
        }
        ShellCommand::Quit | ShellCommand::Nothing => return,
    };

    match outcome {
        Ok(snapshot) => println!("{}", render_snapshot(&snapshot)),
        Err(err) => {
            println!("{}", render_error(&err));
            // The last good page stays on screen after a failed run.
            if let Ok(snapshot) = session.snapshot().await {
                println!("{}", render_snapshot(&snapshot));
            }
        }
    }
}

/// Note on stderr whenever a page run starts.
fn spawn_progress(mut updates: watch::Receiver<SessionSnapshot>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut was_busy = false;
        while updates.changed().await.is_ok() {
            let (busy, label) = {
                let snapshot = updates.borrow_and_update();
                (snapshot.busy, snapshot.page_label())
            };
            if busy && !was_busy {
                if let Some(label) = label {
                    eprintln!("Reading {label}...");
                }
            }
            was_busy = busy;
        }
    })
}
