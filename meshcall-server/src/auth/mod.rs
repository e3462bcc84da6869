mod authenticator;
mod delegated;
mod error;
mod secret_store;

pub use authenticator::*;
pub use delegated::*;
pub use error::*;
pub use secret_store::*;
