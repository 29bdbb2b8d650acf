use anyhow::Context;
use demo_runner::{paper_venue, wire};
use log::{error, info};
use trading_core::args::CommonArgs;
use trading_core::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CommonArgs::parse_args(std::env::args().collect());
    let config_path = args.get_config_path();
    let settings = Settings::load(&config_path)
        .with_context(|| format!("failed to load settings from {}", config_path.display()))?;

    let level = args.get_log_level().unwrap_or(settings.log_level.as_str()).to_string();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    info!("=== {} starting [PAPER MODE] ===", args.get_service_name());

    let venue = paper_venue(&settings);
    let mut director = wire(&settings, &venue)?;

    let shutdown = director.shutdown_handle();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, shutting down");
                shutdown.request();
            }
            Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    let (outcome, director) = tokio::task::spawn_blocking(move || {
        let outcome = director.run();
        (outcome, director)
    })
    .await
    .context("trading director task panicked")?;

    director.into_session().close();
    outcome.context("trading director stopped on a fatal error")?;
    Ok(())
}
