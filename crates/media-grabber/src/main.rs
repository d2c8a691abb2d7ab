use app_config::Config;
use media_grabber::{settings, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loaded_dotenv = dotenvy::dotenv();

    app_logger::init();

    match loaded_dotenv {
        Ok(loaded_dotenv) => {
            app_logger::debug!(path = ?loaded_dotenv, "Loaded dotenv file");
        }
        Err(e) if e.not_found() => {
            app_logger::debug!("No dotenv file found");
        }
        Err(e) => {
            app_logger::error!("Failed to load dotenv file: {e:?}");
            return Err(e.into());
        }
    }

    let config = Config::global();
    app_logger::debug!(config = ?config, "Running with config");

    let service = settings::build_service(config)?;
    let longest_chain = service
        .orchestrator()
        .platforms()
        .values()
        .map(Vec::len)
        .max()
        .unwrap_or_default();

    let sweeper = service
        .limiter()
        .spawn_sweeper(config.rate_limit.sweep_interval.duration());

    let state = AppState::new(service)
        .with_trust_forwarded_for(config.server.trust_forwarded_for)
        .with_request_timeout(settings::request_timeout(config, longest_chain));

    let res = media_grabber::run(&config.server.host, config.server.port, state).await;

    sweeper.abort();

    res
}
