pub mod config_io;
pub mod kv;
pub mod logging;
pub mod paths;
