use std::sync::Arc;
use std::time::{Duration, Instant};

use dotenv::dotenv;
use log::{error, info, warn};
use tokio::net::TcpListener;

use step_control::config::{ConfigManager, ReceiverConfig};
use step_control::logger;
use step_control::receiver::{run_status_ticker, serve, EventLog, ReceiverContext};

#[tokio::main]
async fn main() {
    logger::init_logger();
    dotenv().ok();

    let config_manager = ConfigManager::load_or_default(ConfigManager::resolve_path());
    let config = config_manager.get_config().receiver.clone();

    if let Err(e) = run(config).await {
        error!("Control receiver failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: ReceiverConfig) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind((config.bind_address.as_str(), config.port)).await?;
    info!("Starting control receiver on {}...", listener.local_addr()?);

    let event_log = EventLog::new(&config.events_log, &config.performance_log);
    let ctx = Arc::new(ReceiverContext::new(event_log));

    let ticker = (config.status_interval_secs > 0).then(|| {
        tokio::spawn(run_status_ticker(
            Arc::clone(&ctx),
            Duration::from_secs(config.status_interval_secs),
        ))
    });

    serve(listener, Arc::clone(&ctx), async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
        info!("Ctrl-C received, shutting down control receiver");
    })
    .await?;

    if let Some(ticker) = ticker {
        ticker.abort();
    }

    let (steps, elapsed) = {
        let playback = ctx.playback();
        (playback.steps(), playback.elapsed(Instant::now()))
    };
    if let Err(e) = ctx.event_log().record_performance(steps, elapsed).await {
        warn!("Error logging session data: {}", e);
    }
    info!(
        "Session finished: {} steps, {:.2} seconds played",
        steps,
        elapsed.as_secs_f64()
    );

    Ok(())
}
