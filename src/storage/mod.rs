pub mod addresses;
pub mod file_store;
pub mod memory;

pub use addresses::{AddressBook, AddressError, SERVER_ADDRESSES_KEY};
pub use file_store::FileStore;
pub use memory::MemoryStore;

/// String key-value persistence used for small pieces of client state.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// 存储错误类型
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
