mod fanout;
mod negotiation_relay;
mod outcome;
mod unwinder;

pub use fanout::*;
pub use negotiation_relay::*;
pub use outcome::*;
pub use unwinder::*;
