use log::{error, info, warn};

use super::KeyValueStore;
use crate::types::ServerEndpoint;

/// Key under which the saved address list is stored.
pub const SERVER_ADDRESSES_KEY: &str = "serverAddresses";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("Server host must not be empty")]
    EmptyHost,
    #[error("Server port must not be empty")]
    EmptyPort,
}

/// Ordered list of previously used `host:port` entries.
///
/// The in-memory list is authoritative for the session: a failed store
/// read starts from an empty list and a failed write is only logged.
pub struct AddressBook<S: KeyValueStore> {
    store: S,
    key: String,
    addresses: Vec<String>,
}

impl<S: KeyValueStore> AddressBook<S> {
    pub fn load(store: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let addresses = match store.get(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(list) => list,
                Err(e) => {
                    error!("Failed to decode saved server addresses: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                error!("Failed to load saved server addresses: {}", e);
                Vec::new()
            }
        };

        info!("Loaded {} saved server address(es)", addresses.len());
        Self {
            store,
            key,
            addresses,
        }
    }

    /// 保存新的服务器地址（允许重复，保持插入顺序）
    pub fn add(&mut self, host: &str, port: &str) -> Result<String, AddressError> {
        let host = host.trim();
        let port = port.trim();
        if host.is_empty() {
            return Err(AddressError::EmptyHost);
        }
        if port.is_empty() {
            return Err(AddressError::EmptyPort);
        }

        let address = format!("{}:{}", host, port);
        self.addresses.push(address.clone());
        self.persist();
        info!("Server address saved: {}", address);
        Ok(address)
    }

    /// Removes every entry equal to `address`. Returns how many were removed.
    pub fn remove(&mut self, address: &str) -> usize {
        let before = self.addresses.len();
        self.addresses.retain(|a| a != address);
        let removed = before - self.addresses.len();
        if removed > 0 {
            self.persist();
            info!("Server address removed: {}", address);
        } else {
            warn!("Server address not found: {}", address);
        }
        removed
    }

    pub fn contains(&self, address: &str) -> bool {
        self.addresses.iter().any(|a| a == address)
    }

    pub fn entries(&self) -> &[String] {
        &self.addresses
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn endpoint_at(&self, index: usize) -> Option<ServerEndpoint> {
        self.addresses
            .get(index)
            .map(|a| ServerEndpoint::from_address(a))
    }

    /// Most recently saved endpoint.
    pub fn latest(&self) -> Option<ServerEndpoint> {
        self.addresses
            .last()
            .map(|a| ServerEndpoint::from_address(a))
    }

    fn persist(&mut self) {
        let encoded = match serde_json::to_string(&self.addresses) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!("Failed to encode server addresses: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(&self.key, &encoded) {
            error!("Failed to persist server addresses: {}", e);
        }
    }
}
