pub mod ai;
pub mod config;
pub mod core;
pub mod storage;
