pub mod config;
pub mod dart;
pub mod export;
