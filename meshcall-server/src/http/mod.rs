mod health;
mod routes;

pub use health::*;
pub use routes::*;
