pub mod config;
pub mod tracing;

pub use self::tracing::init_tracing;
pub use config::*;
