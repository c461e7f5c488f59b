pub mod cli;
pub mod config;
pub mod report;
pub mod runner;
pub mod utils;
pub mod workload;
