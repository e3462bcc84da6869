use thiserror::Error;

/// Why a join attempt was not authorized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("presented secret matches neither the room secret nor a delegated secret")]
    NoMatchingSecret,

    #[error("delegated secret expired")]
    Expired,

    #[error("delegated secret was minted for another endpoint")]
    EndpointMismatch,

    /// The durable store could not be read; the attempt fails closed.
    #[error("room secret store unavailable: {0}")]
    StoreUnavailable(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("secret store unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read secrets file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed secrets file: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Why a delegated secret could not be minted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MintError {
    #[error("system random number generator failed")]
    Rng,

    #[error("delegated secret deadline is out of range")]
    DeadlineOverflow,
}
