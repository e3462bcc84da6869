use thiserror::Error;

/// Rejections raised at the transport decoding boundary.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed frame: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown event '{0}'")]
    UnknownEvent(String),

    #[error("invalid argument {index} for '{event}': {reason}")]
    InvalidArgument {
        event: &'static str,
        index: usize,
        reason: String,
    },
}
