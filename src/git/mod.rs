pub mod log;

pub use log::GitLog;
