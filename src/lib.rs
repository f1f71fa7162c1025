//! Core library for the `reqburst` CLI.
//!
//! A run sends a fixed number of HTTP GET requests to one URL through a
//! bounded pool of workers, optionally rotating each request through a list
//! of proxies. The crate provides the pieces the binary wires together: CLI
//! and config-file parsing, the dispatch engine, the reqwest-backed request
//! executor, the run controller and its terminal and log-file outputs.
pub mod args;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod shutdown;
pub mod sinks;
