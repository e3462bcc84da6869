pub mod auth;
pub mod config;
pub mod engine;
pub mod http;
pub mod registry;
pub mod relay;
pub mod server;
pub mod signaling;

pub use auth::*;
pub use config::*;
pub use engine::*;
pub use http::*;
pub use registry::*;
pub use relay::*;
pub use server::*;
pub use signaling::*;
