pub mod client;
pub mod config;
mod record;
