pub mod config;
pub mod report;
pub mod session;
pub mod timer;
