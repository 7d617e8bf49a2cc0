use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Sender;
use dotenv::dotenv;
use log::{error, info, warn};
use rumqttc::{Client, Event, MqttOptions, Packet, QoS};

use super::SourceError;
use crate::config::MqttConfig;
use crate::types::DataPoint;
use crate::utils::non_empty_env_var;

/// 订阅加速度主题，把解析后的样本转发到采样通道
pub fn run_mqtt_source(
    config: &MqttConfig,
    data_sender: Sender<DataPoint>,
    shutdown_signal: Arc<AtomicBool>,
) -> Result<(), SourceError> {
    dotenv().ok(); // 加载 .env 文件

    let mqtt_host = non_empty_env_var("MQTT_HOST").unwrap_or_else(|| config.broker.clone());
    let mqtt_port = resolve_port(non_empty_env_var("MQTT_PORT"), config.port)?;

    let mut mqtt_options = MqttOptions::new(config.client_id.clone(), mqtt_host.clone(), mqtt_port);
    if let (Some(user), Some(pass)) = (non_empty_env_var("MQTT_USER"), env::var("MQTT_PASS").ok()) {
        mqtt_options.set_credentials(user, pass);
    }
    mqtt_options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive.max(1))));

    let (client, mut connection) = Client::new(mqtt_options, 10);
    client.subscribe(config.topic.clone(), qos_from_level(config.qos))?;
    info!(
        "Subscribed to '{}' on {}:{}",
        config.topic, mqtt_host, mqtt_port
    );

    for event in connection.iter() {
        // 检查关闭信号
        if shutdown_signal.load(Ordering::Relaxed) {
            info!("MQTT source received shutdown signal, exiting gracefully");
            break;
        }

        match event {
            Ok(Event::Incoming(Packet::Publish(publish))) if publish.topic == config.topic => {
                match parse_sensor_data(&publish.payload) {
                    Ok(data) => {
                        if data_sender.send(data).is_err() {
                            // 通道断开表示检测线程已退出
                            info!("Sample channel disconnected, MQTT source exiting");
                            break;
                        }
                    }
                    Err(e) => warn!("Invalid sensor data: {}", e),
                }
            }
            Ok(_) => {}
            Err(e) => {
                error!("MQTT connection error: {}", e);
                return Err(e.into());
            }
        }
    }

    Ok(())
}

pub fn parse_sensor_data(payload: &[u8]) -> Result<DataPoint, SourceError> {
    let payload_str = std::str::from_utf8(payload)?;
    Ok(serde_json::from_str::<DataPoint>(payload_str)?)
}

/// `MQTT_PORT` 覆盖配置端口
fn resolve_port(env_port: Option<String>, configured: u16) -> Result<u16, SourceError> {
    match env_port {
        Some(port) => Ok(port.trim().parse::<u16>()?),
        None => Ok(configured),
    }
}

fn qos_from_level(level: u8) -> QoS {
    match level {
        0 => QoS::AtMostOnce,
        2 => QoS::ExactlyOnce,
        _ => QoS::AtLeastOnce,
    }
}
