use crate::auth::{
    AuthFailure, DelegatedSecret, DelegationPolicy, MintError, SecretStore, generate_token,
    secrets_match,
};
use meshcall_core::{EndpointId, RoomId};
use ring::rand::SystemRandom;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Which credential admitted a join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    Durable,
    Delegated,
}

/// Validates join attempts against the durable room secret first, then
/// against delegated secrets minted by current members.
pub struct SecretAuthenticator {
    store: Arc<dyn SecretStore>,
    policy: DelegationPolicy,
    delegated: HashMap<RoomId, Vec<DelegatedSecret>>,
    /// Deadline-ordered index over `delegated`. Entries go stale once the
    /// secret is consumed or its room is forgotten; the sweep skips them.
    expiry_index: BTreeMap<Instant, Vec<(RoomId, String)>>,
    rng: SystemRandom,
}

impl SecretAuthenticator {
    pub fn new(store: Arc<dyn SecretStore>, policy: DelegationPolicy) -> Self {
        Self {
            store,
            policy,
            delegated: HashMap::new(),
            expiry_index: BTreeMap::new(),
            rng: SystemRandom::new(),
        }
    }

    pub async fn authorize(
        &mut self,
        room_id: &RoomId,
        endpoint: &EndpointId,
        presented: &str,
        now: Instant,
    ) -> Result<Grant, AuthFailure> {
        match self.store.room_secret(room_id).await {
            Ok(Some(secret)) if secrets_match(&secret, presented) => return Ok(Grant::Durable),
            Ok(_) => {}
            Err(e) => {
                warn!("Room secret lookup failed for '{}': {}", room_id, e);
                return Err(AuthFailure::StoreUnavailable(e.to_string()));
            }
        }

        self.consume_delegated(room_id, endpoint, presented, now)
            .map(|()| Grant::Delegated)
    }

    fn consume_delegated(
        &mut self,
        room_id: &RoomId,
        endpoint: &EndpointId,
        presented: &str,
        now: Instant,
    ) -> Result<(), AuthFailure> {
        let Some(entries) = self.delegated.get_mut(room_id) else {
            return Err(AuthFailure::NoMatchingSecret);
        };
        let Some(position) = entries
            .iter()
            .position(|entry| secrets_match(&entry.secret, presented))
        else {
            return Err(AuthFailure::NoMatchingSecret);
        };

        let result = match entries.get(position) {
            Some(entry) if entry.is_expired(now) => Err(AuthFailure::Expired),
            Some(entry) if self.policy.bind_to_endpoint && &entry.target_endpoint != endpoint => {
                return Err(AuthFailure::EndpointMismatch);
            }
            _ => Ok(()),
        };

        // Consumed on success, discarded on expiry.
        entries.remove(position);
        if entries.is_empty() {
            self.delegated.remove(room_id);
        }
        result
    }

    pub fn mint_delegated_secret(
        &mut self,
        room_id: &RoomId,
        target_endpoint: &EndpointId,
        now: Instant,
    ) -> Result<String, MintError> {
        let expires_at = now
            .checked_add(self.policy.ttl)
            .ok_or(MintError::DeadlineOverflow)?;
        let secret = generate_token(&self.rng)?;

        self.delegated
            .entry(room_id.clone())
            .or_default()
            .push(DelegatedSecret {
                secret: secret.clone(),
                target_endpoint: target_endpoint.clone(),
                expires_at,
            });
        self.expiry_index
            .entry(expires_at)
            .or_default()
            .push((room_id.clone(), secret.clone()));

        debug!(
            "Minted delegated secret for {} in room '{}'",
            target_endpoint, room_id
        );
        Ok(secret)
    }

    /// Drops every delegated secret of a room nobody is in any more.
    pub fn forget_room(&mut self, room_id: &RoomId) {
        if self.delegated.remove(room_id).is_some() {
            debug!("Dropped delegated secrets of empty room '{}'", room_id);
        }
    }

    /// Purges secrets whose deadline passed before `now`. Returns how many
    /// live entries were removed.
    pub fn sweep_expired(&mut self, now: Instant) -> usize {
        let live = self.expiry_index.split_off(&now);
        let expired = std::mem::replace(&mut self.expiry_index, live);

        let mut removed = 0;
        for (room_id, secret) in expired.into_values().flatten() {
            let Some(entries) = self.delegated.get_mut(&room_id) else {
                continue;
            };
            let before = entries.len();
            entries.retain(|entry| !(entry.secret == secret && entry.is_expired(now)));
            removed += before - entries.len();
            if entries.is_empty() {
                self.delegated.remove(&room_id);
            }
        }
        removed
    }

    pub fn pending_count(&self, room_id: &RoomId) -> usize {
        self.delegated.get(room_id).map_or(0, Vec::len)
    }

    pub fn total_pending(&self) -> usize {
        self.delegated.values().map(Vec::len).sum()
    }
}
