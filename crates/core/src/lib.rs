pub mod config;
pub mod entity;
pub mod error;
pub mod streak;

pub use config::Config;
pub use entity::*;
pub use error::*;
