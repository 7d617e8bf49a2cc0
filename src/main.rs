use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::bounded;
use dotenv::dotenv;
use log::{error, info, warn};
use tokio::runtime::Handle;

use step_control::app::{apply_env_overrides, select_endpoint, StepSession};
use step_control::config::{ConfigManager, SourceKind};
use step_control::logger;
use step_control::motion::StepDetector;
use step_control::notify::{HttpNotifier, StatusMessage};
use step_control::sources::{run_mqtt_source, run_simulated_source};
use step_control::storage::{AddressBook, FileStore};

#[tokio::main]
async fn main() {
    logger::init_logger();
    dotenv().ok(); // 加载 .env 文件
    info!("StepControl client starting");

    let config_path = ConfigManager::resolve_path();
    let mut config_manager = ConfigManager::load_or_default(&config_path);
    apply_env_overrides(&mut config_manager.get_config_mut().server);
    let config = config_manager.get_config().clone();

    let store = FileStore::new(config.get_storage_path());
    info!("Server addresses stored in {}", store.path().display());
    let mut address_book = AddressBook::load(store, config.storage.addresses_key.clone());
    for (index, address) in address_book.entries().iter().enumerate() {
        info!("Saved server [{}]: {}", index, address);
    }
    let endpoint = select_endpoint(&config.server, &mut address_book);

    let status = StatusMessage::new();
    let notifier = HttpNotifier::new(Handle::current(), endpoint, status.clone());
    let detector = StepDetector::new(config.detector.threshold);
    let mut session = StepSession::new(detector, notifier, status)
        .with_summary_every(config.readout.summary_every);

    let (data_sender, data_receiver) = bounded(config.channels.sample_channel_capacity);
    let shutdown_signal = Arc::new(AtomicBool::new(false));

    let source_shutdown = Arc::clone(&shutdown_signal);
    let source_config = config.clone();
    let source_handle = thread::spawn(move || {
        let result = match source_config.source.kind {
            SourceKind::Mqtt => run_mqtt_source(&source_config.mqtt, data_sender, source_shutdown),
            SourceKind::Simulated => run_simulated_source(
                source_config.simulator.clone(),
                source_config.detector.sample_interval_ms,
                data_sender,
                source_shutdown,
            ),
        };
        if let Err(e) = result {
            error!("Sample source failed: {}", e);
        }
    });

    let session_shutdown = Arc::clone(&shutdown_signal);
    let session_task = tokio::task::spawn_blocking(move || {
        session.run(data_receiver, session_shutdown);
    });

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Failed to listen for Ctrl-C: {}", e);
            }
            info!("Ctrl-C received, shutting down");
        }
        result = session_task => {
            if let Err(e) = result {
                error!("Step session panicked: {}", e);
            }
        }
    }

    // 通知采样线程与检测线程退出
    shutdown_signal.store(true, Ordering::Relaxed);

    match tokio::task::spawn_blocking(move || source_handle.join()).await {
        Ok(Ok(())) => info!("Sample source shut down gracefully"),
        Ok(Err(e)) => error!("Sample source thread panicked: {:?}", e),
        Err(e) => warn!("Failed to join sample source thread: {}", e),
    }

    info!("StepControl client stopped");
}
