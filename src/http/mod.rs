//! HTTP transport for dispatch tasks.
mod client;
mod execution;


pub use client::{HttpExecutor, HttpExecutorFactory, normalize_proxy};
