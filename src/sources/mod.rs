pub mod mqtt;
pub mod simulated;

pub use mqtt::{parse_sensor_data, run_mqtt_source};
pub use simulated::{run_simulated_source, GaitSimulator};

/// 采样源错误类型
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Invalid MQTT port: {0}")]
    InvalidPort(#[from] std::num::ParseIntError),
    #[error("MQTT client error: {0}")]
    Client(#[from] rumqttc::ClientError),
    #[error("MQTT connection error: {0}")]
    Connection(#[from] rumqttc::ConnectionError),
    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("JSON parsing error: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
