//! Aether Run - drives a 5D Aether simulation from the command line.
//!
//! Starts a fresh run (or restores one from a backup), advances it step by
//! step until it goes quiet or the step limit is hit, and optionally writes
//! periodic backups along the way.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aether_engine::Aether5D;

#[derive(Parser, Debug)]
#[command(name = "aether-run")]
#[command(about = "Run a 5D Aether simulation")]
struct Cli {
    /// Value seeded at the origin of a fresh run
    #[arg(allow_hyphen_values = true, required_unless_present = "restore")]
    initial_value: Option<i64>,

    /// Directory the run's grid folder is created under
    #[arg(long, default_value = ".")]
    folder: PathBuf,

    /// Number of steps to run (0 = run until nothing moves)
    #[arg(long, default_value = "0")]
    steps: u64,

    /// Resume from a backup folder instead of seeding a fresh run
    #[arg(long)]
    restore: Option<PathBuf>,

    /// Write a backup every N steps (0 = never)
    #[arg(long, default_value = "0")]
    backup_every: u64,

    /// Directory periodic backups are written under
    #[arg(long, default_value = "backups")]
    backup_dir: PathBuf,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aether_run=info,aether_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut automaton = match &cli.restore {
        Some(backup) => match Aether5D::restore(backup, &cli.folder) {
            Ok(a) => a,
            Err(e) => {
                error!("failed to restore from {}: {}", backup.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            // Presence is enforced by clap when --restore is absent.
            let initial_value = cli.initial_value.unwrap_or_default();
            match Aether5D::new(initial_value, &cli.folder) {
                Ok(a) => a,
                Err(e) => {
                    error!("failed to start run: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    info!(
        initial_value = automaton.initial_value(),
        step = automaton.step(),
        run = %automaton.subfolder_path(),
        "simulation ready"
    );

    loop {
        let changed = match automaton.next_step() {
            Ok(changed) => changed,
            Err(e) => {
                error!(step = automaton.step(), "step failed: {}", e);
                std::process::exit(1);
            }
        };
        if cli.backup_every != 0 && automaton.step() % cli.backup_every == 0 {
            let name = format!("step-{}", automaton.step());
            if let Err(e) = automaton.backup(&cli.backup_dir, &name) {
                error!(step = automaton.step(), "backup failed: {}", e);
                std::process::exit(1);
            }
        }
        if !changed {
            info!(step = automaton.step(), "simulation reached a fixed point");
            break;
        }
        if cli.steps != 0 && automaton.step() >= cli.steps {
            info!(step = automaton.step(), "step limit reached");
            break;
        }
    }
}
