//! Command-line application around the receiver

pub mod cli;
pub mod config;
pub mod console;
pub mod startup;
