//! Sequential chunked copy between local files and DBFS.
//!
//! Uploads go create -> add-block per chunk -> close; downloads issue one
//! read per chunk. No retries: the first failed call aborts the transfer.

use std::path::Path;
use tempfile::NamedTempFile;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::core::dbfs::Dbfs;
use crate::error::{DatabricksError, Result};
use crate::models::CHUNK_SIZE;

/// Outcome of a finished transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferSummary {
    pub bytes: u64,
    pub blocks: usize,
}

/// Fill `buf` from `reader`, stopping early only at end of input
async fn read_chunk<R: AsyncRead + Unpin>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Stream `reader` to `path` in blocks of `chunk_size` bytes
pub async fn upload_reader<D, R>(
    dbfs: &D,
    reader: &mut R,
    path: &str,
    overwrite: bool,
    chunk_size: usize,
) -> Result<TransferSummary>
where
    D: Dbfs + ?Sized,
    R: AsyncRead + Unpin,
{
    let handle = dbfs.create(path, overwrite).await?;
    let mut buf = vec![0u8; chunk_size];
    let mut summary = TransferSummary { bytes: 0, blocks: 0 };

    loop {
        let n = read_chunk(reader, &mut buf).await?;
        if n == 0 {
            break;
        }
        dbfs.add_block(handle, &buf[..n]).await?;
        summary.bytes += n as u64;
        summary.blocks += 1;
        debug!("Uploaded block {} ({} bytes total)", summary.blocks, summary.bytes);
        if n < chunk_size {
            break;
        }
    }

    dbfs.close(handle).await?;
    Ok(summary)
}

/// Read `path` in blocks of `chunk_size` bytes and write them to `writer`
pub async fn download_to_writer<D, W>(
    dbfs: &D,
    path: &str,
    writer: &mut W,
    chunk_size: usize,
) -> Result<TransferSummary>
where
    D: Dbfs + ?Sized,
    W: AsyncWrite + Unpin,
{
    let file_size = remote_file_size(dbfs, path).await?;
    copy_blocks(dbfs, path, file_size, writer, chunk_size).await
}

/// Size of a remote file, failing if the path is a directory
async fn remote_file_size<D: Dbfs + ?Sized>(dbfs: &D, path: &str) -> Result<u64> {
    let status = dbfs.get_status(path).await?;
    if status.is_dir {
        return Err(DatabricksError::IsDirectory(path.to_string()));
    }
    Ok(status.file_size)
}

async fn copy_blocks<D, W>(
    dbfs: &D,
    path: &str,
    file_size: u64,
    writer: &mut W,
    chunk_size: usize,
) -> Result<TransferSummary>
where
    D: Dbfs + ?Sized,
    W: AsyncWrite + Unpin,
{
    let mut summary = TransferSummary { bytes: 0, blocks: 0 };
    while summary.bytes < file_size {
        let block = dbfs.read(path, summary.bytes, chunk_size).await?;
        if block.bytes_read == 0 {
            warn!("{} ended at {} bytes, expected {}", path, summary.bytes, file_size);
            break;
        }
        writer.write_all(&block.data).await?;
        summary.bytes += block.bytes_read as u64;
        summary.blocks += 1;
        debug!("Downloaded block {} ({} bytes total)", summary.blocks, summary.bytes);
    }

    writer.flush().await?;
    Ok(summary)
}

/// Upload a local file. If `remote` is an existing directory the file keeps
/// its name inside it.
pub async fn upload_file<D: Dbfs + ?Sized>(
    dbfs: &D,
    local: &Path,
    remote: &str,
    overwrite: bool,
) -> Result<TransferSummary> {
    if !local.is_file() {
        return Err(DatabricksError::LocalFileNotFound(local.to_path_buf()));
    }

    let target = match dbfs.get_status(remote).await {
        Ok(info) if info.is_dir => match local.file_name() {
            Some(name) => join_remote(remote, &name.to_string_lossy()),
            None => remote.to_string(),
        },
        Ok(_) => remote.to_string(),
        Err(e) if e.is_not_found() => remote.to_string(),
        Err(e) => return Err(e.into()),
    };

    let mut file = File::open(local).await?;
    let summary = upload_reader(dbfs, &mut file, &target, overwrite, CHUNK_SIZE).await?;
    info!(
        "Uploaded {} -> dbfs:{} ({} bytes in {} blocks)",
        local.display(),
        target,
        summary.bytes,
        summary.blocks
    );
    Ok(summary)
}

/// Download a DBFS file. If `local` is an existing directory the file keeps
/// its name inside it.
///
/// Blocks are written to a temporary file next to the target, which replaces
/// the target only once every block has arrived.
pub async fn download_file<D: Dbfs + ?Sized>(
    dbfs: &D,
    remote: &str,
    local: &Path,
    overwrite: bool,
) -> Result<TransferSummary> {
    let remote = match remote.trim_end_matches('/') {
        "" => return Err(DatabricksError::IsDirectory(remote.to_string())),
        trimmed => trimmed,
    };

    let target = if local.is_dir() {
        let name = remote.rsplit('/').next().unwrap_or(remote);
        local.join(name)
    } else {
        local.to_path_buf()
    };

    if target.exists() && !overwrite {
        return Err(DatabricksError::LocalFileExists(target));
    }

    // No local file is created for a missing or directory path.
    let file_size = remote_file_size(dbfs, remote).await?;

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let (file, temp_path) = NamedTempFile::new_in(dir)?.into_parts();
    let mut file = File::from_std(file);
    let summary = copy_blocks(dbfs, remote, file_size, &mut file, CHUNK_SIZE).await?;
    drop(file);
    temp_path.persist(&target).map_err(|e| e.error)?;

    info!(
        "Downloaded dbfs:{} -> {} ({} bytes in {} blocks)",
        remote,
        target.display(),
        summary.bytes,
        summary.blocks
    );
    Ok(summary)
}

/// Write a small local file with a single `dbfs/put`
pub async fn put_file<D: Dbfs + ?Sized>(
    dbfs: &D,
    local: &Path,
    remote: &str,
    overwrite: bool,
) -> Result<u64> {
    if !local.is_file() {
        return Err(DatabricksError::LocalFileNotFound(local.to_path_buf()));
    }
    let size = tokio::fs::metadata(local).await?.len();
    if size > CHUNK_SIZE as u64 {
        return Err(DatabricksError::FileTooLarge {
            path: local.to_path_buf(),
            size,
            max: CHUNK_SIZE,
        });
    }
    let contents = tokio::fs::read(local).await?;
    dbfs.put(remote, &contents, overwrite).await?;
    info!("Put {} -> dbfs:{} ({} bytes)", local.display(), remote, size);
    Ok(size)
}

fn join_remote(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
}
