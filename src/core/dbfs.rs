use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::client::{ApiClient, Empty};
use crate::error::ApiError;
use crate::models::{FileHandle, FileInfo, FileReadBlock};

/// DBFS operations, one per REST endpoint.
///
/// Paths are absolute DBFS paths without the `dbfs:` scheme. Block payloads
/// are raw bytes; encoding for the wire is the implementation's job.
#[async_trait]
pub trait Dbfs: Send + Sync {
    /// Open a stream for writing; `dbfs/create`
    async fn create(&self, path: &str, overwrite: bool) -> Result<FileHandle, ApiError>;

    /// Append one block (at most 1 MiB) to an open stream; `dbfs/add-block`
    async fn add_block(&self, handle: FileHandle, data: &[u8]) -> Result<(), ApiError>;

    /// Close an open stream; `dbfs/close`
    async fn close(&self, handle: FileHandle) -> Result<(), ApiError>;

    /// `dbfs/delete`
    async fn delete(&self, path: &str, recursive: bool) -> Result<(), ApiError>;

    /// `dbfs/get-status`
    async fn get_status(&self, path: &str) -> Result<FileInfo, ApiError>;

    /// `dbfs/list`
    async fn list(&self, path: &str) -> Result<Vec<FileInfo>, ApiError>;

    /// `dbfs/mkdirs`
    async fn mkdirs(&self, path: &str) -> Result<(), ApiError>;

    /// `dbfs/move`
    async fn move_path(&self, source: &str, destination: &str) -> Result<(), ApiError>;

    /// Write a whole file (at most 1 MiB) in one call; `dbfs/put`
    async fn put(&self, path: &str, contents: &[u8], overwrite: bool) -> Result<(), ApiError>;

    /// Read up to `length` bytes at `offset`; `dbfs/read`
    async fn read(&self, path: &str, offset: u64, length: usize)
        -> Result<FileReadBlock, ApiError>;
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    path: &'a str,
    overwrite: bool,
}

#[derive(Deserialize)]
struct CreateResponse {
    handle: FileHandle,
}

#[derive(Serialize)]
struct AddBlockRequest {
    handle: FileHandle,
    data: String,
}

#[derive(Serialize)]
struct HandleRequest {
    handle: FileHandle,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    path: &'a str,
    recursive: bool,
}

#[derive(Serialize)]
struct PathRequest<'a> {
    path: &'a str,
}

#[derive(Serialize)]
struct MoveRequest<'a> {
    source_path: &'a str,
    destination_path: &'a str,
}

#[derive(Serialize)]
struct PutRequest<'a> {
    path: &'a str,
    contents: String,
    overwrite: bool,
}

#[derive(Serialize)]
struct ReadQuery<'a> {
    path: &'a str,
    offset: u64,
    length: usize,
}

#[derive(Deserialize)]
struct ReadResponse {
    bytes_read: usize,
    #[serde(default)]
    data: String,
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    files: Vec<FileInfo>,
}

/// Decode a `dbfs/read` response, checking the payload matches `bytes_read`
fn decode_read_block(
    offset: u64,
    length: usize,
    bytes_read: usize,
    data: &str,
) -> Result<FileReadBlock, ApiError> {
    let data = STANDARD
        .decode(data)
        .map_err(|e| ApiError::InvalidResponse(format!("block at offset {} is not base64: {}", offset, e)))?;
    if data.len() != bytes_read {
        return Err(ApiError::InvalidResponse(format!(
            "block at offset {} decoded to {} bytes but bytes_read is {}",
            offset,
            data.len(),
            bytes_read
        )));
    }
    Ok(FileReadBlock {
        offset,
        length,
        bytes_read,
        data,
    })
}

#[async_trait]
impl Dbfs for ApiClient {
    async fn create(&self, path: &str, overwrite: bool) -> Result<FileHandle, ApiError> {
        let response: CreateResponse = self
            .post("dbfs/create", &CreateRequest { path, overwrite })
            .await?;
        debug!("Opened handle {} for {}", response.handle.0, path);
        Ok(response.handle)
    }

    async fn add_block(&self, handle: FileHandle, data: &[u8]) -> Result<(), ApiError> {
        let request = AddBlockRequest {
            handle,
            data: STANDARD.encode(data),
        };
        let _: Empty = self.post("dbfs/add-block", &request).await?;
        Ok(())
    }

    async fn close(&self, handle: FileHandle) -> Result<(), ApiError> {
        let _: Empty = self.post("dbfs/close", &HandleRequest { handle }).await?;
        Ok(())
    }

    async fn delete(&self, path: &str, recursive: bool) -> Result<(), ApiError> {
        let _: Empty = self
            .post("dbfs/delete", &DeleteRequest { path, recursive })
            .await?;
        Ok(())
    }

    async fn get_status(&self, path: &str) -> Result<FileInfo, ApiError> {
        self.get("dbfs/get-status", &PathRequest { path }).await
    }

    async fn list(&self, path: &str) -> Result<Vec<FileInfo>, ApiError> {
        let response: ListResponse = self.get("dbfs/list", &PathRequest { path }).await?;
        Ok(response.files)
    }

    async fn mkdirs(&self, path: &str) -> Result<(), ApiError> {
        let _: Empty = self.post("dbfs/mkdirs", &PathRequest { path }).await?;
        Ok(())
    }

    async fn move_path(&self, source: &str, destination: &str) -> Result<(), ApiError> {
        let request = MoveRequest {
            source_path: source,
            destination_path: destination,
        };
        let _: Empty = self.post("dbfs/move", &request).await?;
        Ok(())
    }

    async fn put(&self, path: &str, contents: &[u8], overwrite: bool) -> Result<(), ApiError> {
        let request = PutRequest {
            path,
            contents: STANDARD.encode(contents),
            overwrite,
        };
        let _: Empty = self.post("dbfs/put", &request).await?;
        Ok(())
    }

    async fn read(
        &self,
        path: &str,
        offset: u64,
        length: usize,
    ) -> Result<FileReadBlock, ApiError> {
        let response: ReadResponse = self
            .get("dbfs/read", &ReadQuery { path, offset, length })
            .await?;
        decode_read_block(offset, length, response.bytes_read, &response.data)
    }
}
