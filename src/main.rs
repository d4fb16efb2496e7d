mod cli;
mod config;
mod feed;
mod fetch;
mod params;
mod server;
mod source;
mod state;

use std::process::ExitCode;

use anyhow::Result;
use cli::Args;
use server::Server;
use state::State;
use tokio_util::sync::CancellationToken;
use tracing::error;
use tracing::Level;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

fn set_up_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_regex(false)
                .with_default_directive(Level::INFO.into())
                .with_env_var("JSON2RSS_LOG")
                .from_env_lossy(),
        )
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    set_up_logging();

    let cancel = CancellationToken::new();

    tokio::spawn({
        let cancel = cancel.clone();

        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => cancel.cancel(),
                Err(e) => error!("could not listen for the shutdown signal: {e}"),
            }
        }
    });

    let server = match start().await {
        Ok(server) => server,

        Err(e) => {
            error!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    match server.serve(cancel).await {
        Ok(()) => ExitCode::SUCCESS,

        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn start() -> Result<Server> {
    let mut args = Args::parse();
    let config_paths = args
        .config_path
        .take()
        .into_iter()
        .chain(["./json2rss.toml".into(), "/etc/json2rss.toml".into()])
        .collect::<Vec<_>>();
    let mut config = config::load(&config_paths)?;
    config.update(args);
    config.normalize();
    let state = State::new(config)?;

    Server::new(state).await
}
