use anyhow::{anyhow, Context};
use std::io::{self, BufRead, Write};
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use taskchat::cli::CommandLineArgs;
use taskchat::{Session, Storage};

/// Log to stderr so that stdout only carries the conversation.
fn init_logging(default_level: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow!("Failed to set up logging: {}", e))
}

fn main() -> anyhow::Result<()> {
    // Get the command-line arguments.
    let args = CommandLineArgs::from_args();
    init_logging(args.log_level())?;

    let task_file = args.task_file();
    tracing::info!(path = ?task_file, "starting session");

    let (mut session, notices) = Session::open(Storage::new(task_file));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for notice in notices {
        writeln!(out, "{}", notice).context("Failed to write to stdout.")?;
    }
    writeln!(out, "Hello! What can I do for you today?").context("Failed to write to stdout.")?;
    out.flush().context("Failed to write to stdout.")?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin.")?;
        let reply = session.handle(&line);
        writeln!(out, "{}", reply.message).context("Failed to write to stdout.")?;
        out.flush().context("Failed to write to stdout.")?;
        if reply.exit {
            break;
        }
    }
    Ok(())
}
