//! LifeHub Library
//!
//! Food calorie/protein estimation, a diet diary and a health log.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
