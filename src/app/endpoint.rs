use log::{info, warn};

use crate::config::ServerConfig;
use crate::storage::{AddressBook, KeyValueStore};
use crate::types::ServerEndpoint;
use crate::utils::non_empty_env_var;

pub const SERVER_HOST_ENV: &str = "STEP_SERVER_HOST";
pub const SERVER_PORT_ENV: &str = "STEP_SERVER_PORT";

/// Non-empty env vars take precedence over the `[server]` section.
pub fn apply_env_overrides(server: &mut ServerConfig) {
    if let Some(host) = non_empty_env_var(SERVER_HOST_ENV) {
        server.host = host;
    }
    if let Some(port) = non_empty_env_var(SERVER_PORT_ENV) {
        server.port = port;
    }
}

/// 选择通知目标：配置优先，其次是最近保存的地址
///
/// Returns an unconfigured endpoint when neither source has one; the
/// notifier then silently skips every event.
pub fn select_endpoint<S: KeyValueStore>(
    server: &ServerConfig,
    book: &mut AddressBook<S>,
) -> ServerEndpoint {
    let configured = ServerEndpoint::new(server.host.trim(), server.port.trim());
    if configured.is_configured() {
        if server.remember && !book.contains(&configured.address()) {
            if let Err(e) = book.add(&configured.host, &configured.port) {
                warn!("Not saving server address: {}", e);
            }
        }
        info!("Using configured server {}", configured);
        return configured;
    }

    match book.latest() {
        Some(saved) if saved.is_configured() => {
            info!("Using most recently saved server {}", saved);
            saved
        }
        _ => {
            warn!("No server configured; step events will not be sent");
            ServerEndpoint::default()
        }
    }
}
