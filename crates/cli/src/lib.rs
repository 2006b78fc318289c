//! # Recall CLI
//!
//! Front-ends over [`recall_store::Library`]: one-shot commands that print a
//! JSON envelope, and an HTTP API served by [`server::serve`].

pub mod command;
pub mod config;
pub mod server;
