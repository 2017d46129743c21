use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use eras_app::game_loop::{self, ClientOptions, HostOptions};
use eras_app::headless::{self, HeadlessOptions};
use eras_app::AppError;
use eras_core::config::SessionConfig;
use eras_core::constants::{NETWORK_PORT, TICK_RATE};
use eras_sim::SimConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Eras Zombie Invasion simulation core", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an all-AI skirmish without a window and print summaries.
    Simulate {
        /// Ticks to simulate (60 per second).
        #[arg(long, default_value_t = 20 * 60 * u64::from(TICK_RATE))]
        ticks: u64,
        /// Random seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Ticks between summary output (0 disables summaries).
        #[arg(long, default_value_t = 60 * u64::from(TICK_RATE))]
        log_interval: u64,
        /// Session tables as JSON (defaults to the built-in tables).
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Host a networked match.
    Host {
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
        #[arg(long, default_value_t = NETWORK_PORT)]
        port: u16,
        /// Trailing lobby slots given to the AI.
        #[arg(long, default_value_t = 0)]
        ai_slots: usize,
        /// Remote players to wait for before starting.
        #[arg(long, default_value_t = 1)]
        min_peers: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        max_frames: Option<u64>,
    },
    /// Join a hosted match as a passive client.
    Join {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = NETWORK_PORT)]
        port: u16,
        #[arg(long, default_value = "Player")]
        name: String,
        #[arg(long)]
        max_frames: Option<u64>,
    },
}

fn load_session(path: Option<PathBuf>) -> Result<SessionConfig, AppError> {
    match path {
        Some(path) => Ok(SessionConfig::from_path(&path)?),
        None => Ok(SessionConfig::default()),
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Simulate {
            ticks,
            seed,
            log_interval,
            config,
        } => {
            let report = headless::run(HeadlessOptions {
                ticks,
                seed,
                log_interval,
                session: load_session(config)?,
            });
            println!("{}", report.lines.join("\n"));
            Ok(())
        }
        Command::Host {
            bind,
            port,
            ai_slots,
            min_peers,
            seed,
            config,
            max_frames,
        } => game_loop::run_host(HostOptions {
            bind: format!("{bind}:{port}"),
            ai_slots,
            min_peers,
            max_frames,
            sim: SimConfig {
                seed,
                session: load_session(config)?,
                ..Default::default()
            },
        }),
        Command::Join {
            host,
            port,
            name,
            max_frames,
        } => game_loop::run_client(ClientOptions {
            connect: format!("{host}:{port}"),
            name,
            max_frames,
        }),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "eras.failed");
            ExitCode::FAILURE
        }
    }
}
