use std::path::Path;

use crate::commands::{confirm, format_millis, print_output};
use crate::core::{download_file, download_to_writer, put_file, upload_file, Dbfs};
use crate::error::DatabricksError;
use crate::models::{is_dbfs_path, normalize_dbfs_path, FileInfo, OutputFormat, CHUNK_SIZE};

/// Absolute DBFS path from a command line argument, with or without `dbfs:`
pub fn remote_path(arg: &str) -> Result<String, DatabricksError> {
    normalize_dbfs_path(arg).ok_or_else(|| DatabricksError::InvalidPath(arg.to_string()))
}

fn base_name(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}

fn short_line(info: &FileInfo) -> String {
    if info.is_dir {
        format!("{}/", base_name(&info.path))
    } else {
        base_name(&info.path).to_string()
    }
}

fn long_line(info: &FileInfo) -> String {
    format!(
        "{:<4} {:>12}  {}  {}",
        if info.is_dir { "dir" } else { "file" },
        info.file_size,
        format_millis(info.modification_time),
        info.path
    )
}

/// `fs ls`
pub async fn fs_ls<D: Dbfs + ?Sized>(
    dbfs: &D,
    path: &str,
    long: bool,
    format: OutputFormat,
) -> Result<(), DatabricksError> {
    let path = remote_path(path)?;
    let mut files = dbfs.list(&path).await?;
    files.sort_by(|a, b| a.path.cmp(&b.path));
    print_output(format, &files, |files| {
        for info in files {
            if long {
                println!("{}", long_line(info));
            } else {
                println!("{}", short_line(info));
            }
        }
    })
}

/// `fs mkdirs`
pub async fn fs_mkdirs<D: Dbfs + ?Sized>(dbfs: &D, path: &str) -> Result<(), DatabricksError> {
    let path = remote_path(path)?;
    dbfs.mkdirs(&path).await?;
    println!("Created dbfs:{}", path);
    Ok(())
}

/// `fs rm`; a recursive delete asks first unless `assume_yes`
pub async fn fs_rm<D: Dbfs + ?Sized>(
    dbfs: &D,
    path: &str,
    recursive: bool,
    assume_yes: bool,
) -> Result<(), DatabricksError> {
    let path = remote_path(path)?;
    if recursive
        && !assume_yes
        && !confirm(&format!("Delete dbfs:{} and everything under it?", path))?
    {
        return Err(DatabricksError::Aborted);
    }
    dbfs.delete(&path, recursive).await?;
    println!("Deleted dbfs:{}", path);
    Ok(())
}

/// `fs mv`
pub async fn fs_mv<D: Dbfs + ?Sized>(
    dbfs: &D,
    source: &str,
    destination: &str,
) -> Result<(), DatabricksError> {
    let source = remote_path(source)?;
    let destination = remote_path(destination)?;
    dbfs.move_path(&source, &destination).await?;
    println!("Moved dbfs:{} -> dbfs:{}", source, destination);
    Ok(())
}

/// `fs cp`: exactly one side carries the `dbfs:` scheme
pub async fn fs_cp<D: Dbfs + ?Sized>(
    dbfs: &D,
    source: &str,
    destination: &str,
    overwrite: bool,
) -> Result<(), DatabricksError> {
    match (is_dbfs_path(source), is_dbfs_path(destination)) {
        (false, true) => {
            let remote = remote_path(destination)?;
            let summary = upload_file(dbfs, Path::new(source), &remote, overwrite).await?;
            println!("Copied {} bytes to dbfs:{}", summary.bytes, remote);
        }
        (true, false) => {
            let remote = remote_path(source)?;
            let summary = download_file(dbfs, &remote, Path::new(destination), overwrite).await?;
            println!("Copied {} bytes from dbfs:{}", summary.bytes, remote);
        }
        _ => {
            return Err(DatabricksError::AmbiguousCopy {
                src: source.to_string(),
                dst: destination.to_string(),
            })
        }
    }
    Ok(())
}

/// `fs put`: single-call write of a file up to one block
pub async fn fs_put<D: Dbfs + ?Sized>(
    dbfs: &D,
    local: &Path,
    destination: &str,
    overwrite: bool,
) -> Result<(), DatabricksError> {
    let remote = remote_path(destination)?;
    let size = put_file(dbfs, local, &remote, overwrite).await?;
    println!("Wrote {} bytes to dbfs:{}", size, remote);
    Ok(())
}

/// `fs cat`
pub async fn fs_cat<D: Dbfs + ?Sized>(dbfs: &D, path: &str) -> Result<(), DatabricksError> {
    let path = remote_path(path)?;
    let mut stdout = tokio::io::stdout();
    download_to_writer(dbfs, &path, &mut stdout, CHUNK_SIZE).await?;
    Ok(())
}
