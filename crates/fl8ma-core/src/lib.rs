pub mod community;
pub mod config;
pub mod error;
