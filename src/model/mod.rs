pub mod catalog;
pub mod config;
pub mod progress;

pub use catalog::*;
pub use config::*;
pub use progress::*;
