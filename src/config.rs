use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::motion::DEFAULT_STEP_THRESHOLD;
use crate::storage::SERVER_ADDRESSES_KEY;

/// 应用配置管理模块
/// 集中管理所有配置项，提供默认值和配置验证

pub const DEFAULT_CONFIG_PATH: &str = "config/step_control.toml";
pub const CONFIG_PATH_ENV: &str = "STEP_CONTROL_CONFIG";

/// 主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub detector: DetectorConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub source: SourceConfig,
    pub mqtt: MqttConfig,
    pub simulator: SimulatorConfig,
    pub receiver: ReceiverConfig,
    pub channels: ChannelConfig,
    pub readout: ReadoutConfig,
}

/// 步数检测配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub threshold: f64,
    pub sample_interval_ms: u64,
}

/// 通知目标服务器（主机与端口保留用户输入的字符串）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: String,
    /// Save the configured endpoint into the address book on start.
    pub remember: bool,
}

/// 本地持久化配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: String,
    pub addresses_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Mqtt,
    Simulated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
}

/// MQTT配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    pub broker: String,
    pub port: u16,
    pub client_id: String,
    pub topic: String,
    pub qos: u8,
    pub keep_alive: u16,
}

/// 模拟步态配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub seed: Option<u64>,
    pub walking_seconds: f64,
    pub idle_seconds: f64,
    pub step_period_ms: u64,
    pub peak_magnitude: f64,
}

/// 控制接收端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverConfig {
    pub bind_address: String,
    pub port: u16,
    pub events_log: String,
    pub performance_log: String,
    pub status_interval_secs: u64,
}

/// 通道配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub sample_channel_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadoutConfig {
    /// Log an info-level summary every N processed samples (0 disables it).
    pub summary_every: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_STEP_THRESHOLD,
            sample_interval_ms: 100,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "data/step_control.json".to_string(),
            addresses_key: SERVER_ADDRESSES_KEY.to_string(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Simulated,
        }
    }
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker: "localhost".to_string(),
            port: 1883,
            client_id: "step_control_client".to_string(),
            topic: "sensor/accelerometer".to_string(),
            qos: 1,
            keep_alive: 5,
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            walking_seconds: 8.0,
            idle_seconds: 4.0,
            step_period_ms: 500,
            peak_magnitude: 1.6,
        }
    }
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
            events_log: "events.log".to_string(),
            performance_log: "logs/my-performance.log".to_string(),
            status_interval_secs: 5,
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            sample_channel_capacity: 1000,
        }
    }
}

impl Default for ReadoutConfig {
    fn default() -> Self {
        Self { summary_every: 50 }
    }
}

impl AppConfig {
    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.detector.threshold.is_finite() || self.detector.threshold <= 0.0 {
            return Err(ConfigError::ValidationError(
                "Step threshold must be a positive number".to_string(),
            ));
        }

        if self.detector.sample_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "Sample interval must be positive".to_string(),
            ));
        }

        if self.storage.addresses_key.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Address storage key must not be empty".to_string(),
            ));
        }

        if self.mqtt.qos > 2 {
            return Err(ConfigError::ValidationError(
                "MQTT QoS must be 0, 1 or 2".to_string(),
            ));
        }

        if self.simulator.step_period_ms == 0 {
            return Err(ConfigError::ValidationError(
                "Simulated step period must be positive".to_string(),
            ));
        }

        if self.channels.sample_channel_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "Sample channel capacity must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// 获取持久化文件路径
    pub fn get_storage_path(&self) -> PathBuf {
        PathBuf::from(&self.storage.path)
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(toml::de::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// 配置管理器
pub struct ConfigManager {
    config: AppConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// 创建配置管理器
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            config_path: None,
        }
    }

    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = AppConfig::load_from_file(&path)?;
        Ok(Self {
            config,
            config_path: Some(path.as_ref().to_path_buf()),
        })
    }

    /// 加载失败时回退到默认配置
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load_from_file(&path) {
            Ok(manager) => {
                info!("Configuration loaded from {}", path.as_ref().display());
                manager
            }
            Err(e) => {
                warn!(
                    "Using default configuration ({}): {}",
                    path.as_ref().display(),
                    e
                );
                Self::new()
            }
        }
    }

    /// Path from `STEP_CONTROL_CONFIG`, or the default location.
    pub fn resolve_path() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// 获取当前配置
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// 获取可变配置
    pub fn get_config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
