mod misc;

pub mod config;
pub mod env;
pub mod error;
pub mod memory;
pub mod models;
pub mod orchestrator;
pub mod policy;
pub mod reward;
pub mod trainer;
