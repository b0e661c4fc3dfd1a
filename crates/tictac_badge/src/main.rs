//! Tic-tac-toe badge simulator
//!
//! Boots the score store, serves the accent-color page, and runs the badge
//! control loop in the terminal.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tictac_badge::{
    BadgeConfig, BadgeRuntime, Cli, JsonScoreStore, LedAnimations, TerminalDisplay, router, tui,
};
use tictac_core::{Executor, ModeStateMachine, boot};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Page requests waiting for the control loop.
const PAGE_QUEUE: usize = 8;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = BadgeConfig::load_or_default(&cli.config)?.with_overrides(
        cli.host.clone(),
        cli.port,
        cli.scores.clone(),
        cli.draw_ends_game,
    );

    // Log to file so the terminal stays clean
    let log_file = std::fs::File::create(config.log_file())?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tictac_core=debug")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();

    info!(config = ?config, "Starting badge simulator");

    let mut store = JsonScoreStore::new(config.score_file());
    let all_time = boot(&mut store, cli.held_at_boot())?;
    info!(x = all_time.x, o = all_time.o, "All-time score loaded");

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let led_rng = StdRng::from_rng(&mut rng);

    let machine = ModeStateMachine::new(all_time, config.machine_settings(), rng);
    let executor = Executor::new(
        TerminalDisplay::new(config.min_refresh()),
        LedAnimations::new(led_rng),
        store,
    )
    .with_retry_margin(config.retry_margin());

    let server = tokio::runtime::Runtime::new()?;
    let (pages_tx, pages_rx) = mpsc::channel(PAGE_QUEUE);
    let address = config.bind_addr();
    let listener = server.block_on(tokio::net::TcpListener::bind(address.as_str()))?;
    info!(%address, "Accent-color page listening");
    server.spawn(async move {
        if let Err(e) = axum::serve(listener, router(pages_tx)).await {
            error!(error = %e, "HTTP server stopped");
        }
    });

    let runtime = BadgeRuntime::new(machine, executor, format!("http://{address}/"));
    tui::run(runtime, pages_rx, config.poll_interval())?;

    info!("Badge simulator exiting");
    Ok(())
}
