use crate::auth::MintError;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use meshcall_core::EndpointId;
use ring::rand::{SecureRandom, SystemRandom};
use std::time::Duration;
use subtle::ConstantTimeEq;
use tokio::time::Instant;

/// Default lifetime of a delegated secret.
pub const DEFAULT_DELEGATED_SECRET_TTL: Duration = Duration::from_secs(5 * 60);

const TOKEN_BYTES: usize = 32;

/// Short-lived token that admits one invitee into one room.
#[derive(Debug, Clone)]
pub struct DelegatedSecret {
    pub secret: String,
    pub target_endpoint: EndpointId,
    pub expires_at: Instant,
}

impl DelegatedSecret {
    /// Still valid at exactly `expires_at`.
    pub fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DelegationPolicy {
    pub ttl: Duration,
    /// Only the endpoint the secret was minted for may consume it.
    pub bind_to_endpoint: bool,
}

impl Default for DelegationPolicy {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_DELEGATED_SECRET_TTL,
            bind_to_endpoint: true,
        }
    }
}

/// 32 bytes from the OS CSPRNG, URL-safe base64 without padding.
pub fn generate_token(rng: &SystemRandom) -> Result<String, MintError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    rng.fill(&mut bytes).map_err(|_| MintError::Rng)?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

pub fn secrets_match(expected: &str, presented: &str) -> bool {
    expected.as_bytes().ct_eq(presented.as_bytes()).into()
}
