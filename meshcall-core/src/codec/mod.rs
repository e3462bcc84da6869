mod envelope;
mod error;

pub use envelope::{Envelope, decode_inbound, encode_outbound};
pub use error::CodecError;
