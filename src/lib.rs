pub mod aggregate;
pub mod config;
pub mod error;
pub mod fetch;
pub mod figure;
pub mod frames;
pub mod join;
pub mod loader;
pub mod pipeline;
pub mod records;
pub mod server;
