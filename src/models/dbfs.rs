use serde::{Deserialize, Serialize};

/// Size of one block for add-block and read: 1 MiB, the service maximum
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Prefix marking a remote path on the command line
pub const DBFS_SCHEME: &str = "dbfs:";

/// Handle of an open upload stream, valid between create and close
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileHandle(pub i64);

/// Metadata of a DBFS file or directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub path: String,
    #[serde(default)]
    pub is_dir: bool,
    #[serde(default)]
    pub file_size: u64,
    /// Epoch milliseconds
    #[serde(default)]
    pub modification_time: Option<i64>,
}

/// One block read from a file, with the payload already base64 decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReadBlock {
    pub offset: u64,
    pub length: usize,
    pub bytes_read: usize,
    pub data: Vec<u8>,
}

/// Strip the `dbfs:` scheme and check the result is absolute
pub fn normalize_dbfs_path(path: &str) -> Option<String> {
    let stripped = path.strip_prefix(DBFS_SCHEME).unwrap_or(path);
    if stripped.starts_with('/') {
        Some(stripped.to_string())
    } else {
        None
    }
}

pub fn is_dbfs_path(path: &str) -> bool {
    path.starts_with(DBFS_SCHEME)
}
