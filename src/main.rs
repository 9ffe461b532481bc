use scene_engine::{app::App, config::GameConfig};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => match GameConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                error!(%err, "failed to load config");
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };

    info!("starting scene engine");
    match App::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "engine stopped with an error");
            ExitCode::FAILURE
        }
    }
}
