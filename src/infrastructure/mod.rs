pub mod config;
pub mod network;
pub mod system;
pub mod tracing;
