#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod one;
pub mod resolve;
pub mod ssh;
pub mod utils;
pub mod xml;
