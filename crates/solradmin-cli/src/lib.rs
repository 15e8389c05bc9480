//! solradmin CLI - Command-line interface for Solr index maintenance
//!
//! This crate provides the CLI application that ties together all solradmin components.

pub mod config;
pub mod output;

pub use config::{Command, Config};
