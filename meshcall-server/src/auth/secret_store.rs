use crate::auth::StoreError;
use async_trait::async_trait;
use dashmap::DashMap;
use meshcall_core::RoomId;
use std::collections::HashMap;
use std::path::Path;

/// Read-only source of durable room secrets, provisioned outside the relay.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// `Ok(None)` means the room is not provisioned.
    async fn room_secret(&self, room_id: &RoomId) -> Result<Option<String>, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemorySecretStore {
    secrets: DashMap<RoomId, String>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, R, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (R, S)>,
        R: Into<RoomId>,
        S: Into<String>,
    {
        let store = Self::new();
        for (room_id, secret) in pairs {
            store.insert(room_id.into(), secret.into());
        }
        store
    }

    /// Loads a JSON object of `{"<room>": "<secret>"}`.
    pub fn load_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, StoreError> {
        let secrets: HashMap<String, String> = serde_json::from_str(raw)?;
        Ok(Self::from_pairs(secrets))
    }

    pub fn insert(&self, room_id: RoomId, secret: String) {
        self.secrets.insert(room_id, secret);
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn room_secret(&self, room_id: &RoomId) -> Result<Option<String>, StoreError> {
        Ok(self.secrets.get(room_id).map(|entry| entry.value().clone()))
    }
}
