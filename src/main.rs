mod audio;
mod config;
mod fetch;
mod library;
mod models;
mod repl;
mod session;
mod tags;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use audio::RodioOutput;
use config::Config;
use fetch::YtDlpSource;
use repl::Cli;
use session::Session;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let config = Config::load()?;
    config.ensure_dirs()?;

    if let Err(e) = YtDlpSource::check_dependencies() {
        println!("{}", format!("Warning: {e}").yellow());
        println!(
            "{}",
            "'search' and 'batchadd' will not be available.".yellow()
        );
    }

    let volume = cli.volume.unwrap_or(config.playback.default_volume).min(100);

    let source = YtDlpSource::new(config.clone());
    let output = RodioOutput::new(volume);
    let mut session = Session::new(Box::new(source), Box::new(output), volume);
    session.preload(library::scan(&config.audio_dir()));

    if let Some(path) = &cli.batch {
        match session.batch_add(path) {
            Ok(report) => repl::render_batch(&report),
            Err(err) => repl::render_error(&err),
        }
    }

    repl::run(&mut session)
}
