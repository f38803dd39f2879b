pub mod client;
pub mod clusters;
pub mod config;
pub mod dbfs;
pub mod jobs;
pub mod transfer;
pub mod workspace;

pub use client::*;
pub use config::*;
pub use dbfs::*;
pub use transfer::*;
