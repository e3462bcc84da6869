mod engine_command;
mod relay_engine;

pub use engine_command::*;
pub use relay_engine::*;
