//! databricks-cli - command-line client for the Databricks REST API
//!
//! A thin shim over the remote service: flags become JSON request bodies,
//! responses become typed values, non-2xx responses become errors.
//!
//! # Architecture
//!
//! - **commands**: CLI command implementations (jobs, runs, fs, clusters, workspace)
//! - **core**: REST client, per-service endpoints, chunked DBFS transfer, config loading
//! - **models**: Request/response types and configuration
//! - **error**: Error types

pub mod commands;
pub mod core;
pub mod error;
pub mod models;

pub use error::{ApiError, DatabricksError, Result};
