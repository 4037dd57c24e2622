use volcano_viewer::config::AppConfig;
use volcano_viewer::core::{Engine, EngineError};

fn main() {
    let (mut config, source) = AppConfig::load_with_source();
    config.apply_env_overrides();
    Engine::initialize_logging(config.logging.level);

    match source {
        Some(path) => {
            tracing::info!(target: "config", "Loaded configuration from {}", path.display())
        }
        None => tracing::info!(target: "config", "Using default configuration"),
    }

    let result = config
        .validate()
        .map_err(EngineError::from)
        .and_then(|_| Engine::run(config));
    if let Err(e) = result {
        tracing::error!(target: "engine", "Engine failed to start: {}", e);
        eprintln!("Engine failed to start: {}", e);
        std::process::exit(1);
    }
}
