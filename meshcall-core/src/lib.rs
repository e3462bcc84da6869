pub mod codec;
pub mod model;

pub use codec::{CodecError, decode_inbound, encode_outbound};
pub use model::*;
