pub mod completions;
pub mod config;
pub mod export;
pub mod history;
pub mod menu;
pub mod patterns;
pub mod session;
pub mod stats;
