pub mod cluster;
pub mod config;
pub mod dbfs;
pub mod job;
pub mod output;
pub mod workspace;

pub use cluster::*;
pub use config::*;
pub use dbfs::*;
pub use job::*;
pub use output::*;
pub use workspace::*;
