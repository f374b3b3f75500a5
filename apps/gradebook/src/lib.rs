//! # gradebook
//!
//! HTTP server and command line front ends over `gradebook-core`.
//!
//! - [`api`]: axum router, handlers and server startup
//! - [`cli`]: clap commands, including the default `server` command

pub mod api;
pub mod cli;
