pub mod config;
pub mod credential;
pub mod errors;
pub mod kernel;
pub mod types;
