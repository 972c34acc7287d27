//! Waypoint CLI Application
//!
//! Command-line interface for the waypoint flow builder.

mod args;
mod renderer;
mod session;

use std::io::{self, Write};

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use log::info;
use renderer::TerminalRenderer;
use session::{step_kinds_markdown, Session};
use waypoint_core::{FlowManager, FlowManagerBuilder, LineInput};

fn main() -> Result<()> {
    env_logger::init();

    let Args {
        log_file,
        no_color,
        json,
        command,
    } = Args::parse();

    let manager = FlowManagerBuilder::new()
        .with_audit_log_path(log_file)
        .build()
        .context("Failed to initialize flow manager")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("Waypoint started");

    match command.unwrap_or(Commands::Session) {
        Commands::Session => {
            let stdin = io::stdin();
            let input = LineInput::new(stdin.lock(), io::stdout());
            Session::new(manager, renderer, input, io::stdout(), json)
                .run()
                .context("Session ended with an error")
        }
        Commands::Log => print_log(&manager),
        Commands::Steps => renderer
            .render(&mut io::stdout(), &step_kinds_markdown())
            .context("Failed to write to stdout"),
    }
}

fn print_log(manager: &FlowManager) -> Result<()> {
    let path = manager.audit().path();
    let mut stdout = io::stdout().lock();

    if !path.exists() {
        writeln!(stdout, "No flows recorded yet.")?;
        return Ok(());
    }

    let lines = manager
        .display_flows_from_file(path)
        .with_context(|| format!("Failed to read audit log {}", path.display()))?;
    for line in lines {
        writeln!(stdout, "{line}")?;
    }
    Ok(())
}
