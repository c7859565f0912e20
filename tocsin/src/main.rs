//! # Tocsin
//!
//! Delayed one-shot alarm scheduler for DaemonOS.
//!
//! Reads `<seconds> <message>` lines from stdin and fires each message on
//! its deadline. One background task drains a deadline-ordered queue; the
//! main task keeps accepting submissions. The two sides share nothing but
//! the queue's internal lock, and the consumer polls rather than waiting on
//! a condition variable, so the producer is never blocked for more than one
//! queue operation.

mod alarm;
mod config;
mod queue;
mod scheduler;
mod sink;
mod submit;

use crate::config::TocsinConfig;
use crate::queue::AlarmQueue;
use crate::scheduler::Scheduler;
use crate::sink::ConsoleSink;
use crate::submit::Submitter;
use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tocsin - alarm scheduler
#[derive(Parser, Debug)]
#[command(name = "tocsin", version, about)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "/etc/tocsin/tocsin.toml")]
    config: PathBuf,

    /// Suppress the interactive prompt
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .init();

    info!("Tocsin v{} starting", VERSION);

    let config = TocsinConfig::load(&args.config)?;

    let queue = Arc::new(AlarmQueue::new());
    let scheduler = Scheduler::new(
        queue.clone(),
        ConsoleSink,
        config.scheduler.poll_interval(),
    );
    tokio::spawn(scheduler.run());

    let submitter = Submitter::new(queue);
    let show_prompt = config.prompt.enabled && !args.quiet;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if show_prompt {
            print!("{}", config.prompt.text);
            std::io::stdout().flush()?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };

        if let Err(e) = submitter.submit_line(&line) {
            warn!("rejected submission: {}", e);
            eprintln!("bad command: {}", e);
        }
    }

    info!("end of input, exiting");
    Ok(())
}
