//! Common test utilities
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use databricks_cli::core::Dbfs;
use databricks_cli::models::{FileHandle, FileInfo, FileReadBlock, CHUNK_SIZE};
use databricks_cli::ApiError;

#[derive(Default)]
struct State {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
    open: HashMap<i64, (String, Vec<u8>)>,
    next_handle: i64,
    calls: Vec<String>,
    counts: HashMap<String, usize>,
    fail_on: Option<(String, usize)>,
}

/// DBFS held in memory, recording every call
#[derive(Default)]
pub struct MemoryDbfs {
    state: Mutex<State>,
}

fn not_found(path: &str) -> ApiError {
    ApiError::from_status(
        404,
        &format!(
            r#"{{"error_code":"RESOURCE_DOES_NOT_EXIST","message":"No file or directory exists on path {}."}}"#,
            path
        ),
    )
}

fn already_exists(path: &str) -> ApiError {
    ApiError::from_status(
        409,
        &format!(
            r#"{{"error_code":"RESOURCE_ALREADY_EXISTS","message":"A file or directory already exists at the input path {}."}}"#,
            path
        ),
    )
}

fn parent_dirs(path: &str) -> Vec<String> {
    let mut dirs = vec!["/".to_string()];
    let mut current = String::new();
    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    for part in parts.iter().take(parts.len().saturating_sub(1)) {
        current.push('/');
        current.push_str(part);
        dirs.push(current.clone());
    }
    dirs
}

impl MemoryDbfs {
    pub fn new() -> Self {
        let dbfs = Self::default();
        dbfs.state.lock().unwrap().dirs.insert("/".to_string());
        dbfs
    }

    /// Make the `nth` (1-based) call of `op` fail with an HTTP 500
    pub fn fail_on(&self, op: &str, nth: usize) {
        self.state.lock().unwrap().fail_on = Some((op.to_string(), nth));
    }

    pub fn insert_file(&self, path: &str, contents: &[u8]) {
        let mut state = self.state.lock().unwrap();
        for dir in parent_dirs(path) {
            state.dirs.insert(dir);
        }
        state.files.insert(path.to_string(), contents.to_vec());
    }

    pub fn insert_dir(&self, path: &str) {
        let mut state = self.state.lock().unwrap();
        for dir in parent_dirs(path) {
            state.dirs.insert(dir);
        }
        state.dirs.insert(path.to_string());
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().files.get(path).cloned()
    }

    pub fn is_dir(&self, path: &str) -> bool {
        self.state.lock().unwrap().dirs.contains(path)
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, op: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == op).count()
    }

    pub fn open_handles(&self) -> usize {
        self.state.lock().unwrap().open.len()
    }

    /// Record a call and apply any injected failure
    fn record(&self, op: &str) -> Result<std::sync::MutexGuard<'_, State>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(op.to_string());
        let count = {
            let c = state.counts.entry(op.to_string()).or_insert(0);
            *c += 1;
            *c
        };
        if let Some((fail_op, nth)) = &state.fail_on {
            if fail_op == op && *nth == count {
                return Err(ApiError::from_status(
                    500,
                    r#"{"error_code":"INTERNAL_ERROR","message":"injected failure"}"#,
                ));
            }
        }
        Ok(state)
    }
}

#[async_trait]
impl Dbfs for MemoryDbfs {
    async fn create(&self, path: &str, overwrite: bool) -> Result<FileHandle, ApiError> {
        let mut state = self.record("create")?;
        if state.dirs.contains(path) || (state.files.contains_key(path) && !overwrite) {
            return Err(already_exists(path));
        }
        state.next_handle += 1;
        let handle = state.next_handle;
        state.open.insert(handle, (path.to_string(), Vec::new()));
        Ok(FileHandle(handle))
    }

    async fn add_block(&self, handle: FileHandle, data: &[u8]) -> Result<(), ApiError> {
        let mut state = self.record("add-block")?;
        if data.len() > CHUNK_SIZE {
            return Err(ApiError::from_status(
                400,
                r#"{"error_code":"MAX_BLOCK_SIZE_EXCEEDED","message":"block too large"}"#,
            ));
        }
        match state.open.get_mut(&handle.0) {
            Some((_, buf)) => {
                buf.extend_from_slice(data);
                Ok(())
            }
            None => Err(not_found(&format!("handle {}", handle.0))),
        }
    }

    async fn close(&self, handle: FileHandle) -> Result<(), ApiError> {
        let mut state = self.record("close")?;
        match state.open.remove(&handle.0) {
            Some((path, buf)) => {
                for dir in parent_dirs(&path) {
                    state.dirs.insert(dir);
                }
                state.files.insert(path, buf);
                Ok(())
            }
            None => Err(not_found(&format!("handle {}", handle.0))),
        }
    }

    async fn delete(&self, path: &str, recursive: bool) -> Result<(), ApiError> {
        let mut state = self.record("delete")?;
        if state.files.remove(path).is_some() {
            return Ok(());
        }
        if state.dirs.contains(path) {
            let prefix = format!("{}/", path.trim_end_matches('/'));
            let has_children = state.files.keys().any(|f| f.starts_with(&prefix))
                || state.dirs.iter().any(|d| d.starts_with(&prefix));
            if has_children && !recursive {
                return Err(ApiError::from_status(
                    400,
                    r#"{"error_code":"IO_ERROR","message":"Directory is not empty"}"#,
                ));
            }
            state.files.retain(|f, _| !f.starts_with(&prefix));
            state.dirs.retain(|d| !d.starts_with(&prefix));
            state.dirs.remove(path);
        }
        Ok(())
    }

    async fn get_status(&self, path: &str) -> Result<FileInfo, ApiError> {
        let state = self.record("get-status")?;
        if let Some(contents) = state.files.get(path) {
            return Ok(FileInfo {
                path: path.to_string(),
                is_dir: false,
                file_size: contents.len() as u64,
                modification_time: Some(0),
            });
        }
        if state.dirs.contains(path) {
            return Ok(FileInfo {
                path: path.to_string(),
                is_dir: true,
                file_size: 0,
                modification_time: Some(0),
            });
        }
        Err(not_found(path))
    }

    async fn list(&self, path: &str) -> Result<Vec<FileInfo>, ApiError> {
        let state = self.record("list")?;
        if !state.dirs.contains(path) {
            return Err(not_found(path));
        }
        let prefix = if path == "/" { "/".to_string() } else { format!("{}/", path) };
        let is_child = |p: &str| {
            p.starts_with(&prefix) && p.len() > prefix.len() && !p[prefix.len()..].contains('/')
        };
        let mut out: Vec<FileInfo> = state
            .files
            .iter()
            .filter(|(p, _)| is_child(p.as_str()))
            .map(|(p, c)| FileInfo {
                path: p.clone(),
                is_dir: false,
                file_size: c.len() as u64,
                modification_time: Some(0),
            })
            .collect();
        out.extend(state.dirs.iter().filter(|d| is_child(d.as_str())).map(|d| FileInfo {
            path: d.clone(),
            is_dir: true,
            file_size: 0,
            modification_time: Some(0),
        }));
        Ok(out)
    }

    async fn mkdirs(&self, path: &str) -> Result<(), ApiError> {
        let mut state = self.record("mkdirs")?;
        if state.files.contains_key(path) {
            return Err(already_exists(path));
        }
        for dir in parent_dirs(path) {
            state.dirs.insert(dir);
        }
        state.dirs.insert(path.to_string());
        Ok(())
    }

    async fn move_path(&self, source: &str, destination: &str) -> Result<(), ApiError> {
        let mut state = self.record("move")?;
        if state.files.contains_key(destination) {
            return Err(already_exists(destination));
        }
        match state.files.remove(source) {
            Some(contents) => {
                state.files.insert(destination.to_string(), contents);
                Ok(())
            }
            None => Err(not_found(source)),
        }
    }

    async fn put(&self, path: &str, contents: &[u8], overwrite: bool) -> Result<(), ApiError> {
        let mut state = self.record("put")?;
        if contents.len() > CHUNK_SIZE {
            return Err(ApiError::from_status(
                400,
                r#"{"error_code":"MAX_BLOCK_SIZE_EXCEEDED","message":"contents too large"}"#,
            ));
        }
        if state.files.contains_key(path) && !overwrite {
            return Err(already_exists(path));
        }
        state.files.insert(path.to_string(), contents.to_vec());
        Ok(())
    }

    async fn read(&self, path: &str, offset: u64, length: usize) -> Result<FileReadBlock, ApiError> {
        let state = self.record("read")?;
        let contents = state.files.get(path).ok_or_else(|| not_found(path))?;
        let start = (offset as usize).min(contents.len());
        let end = (start + length.min(CHUNK_SIZE)).min(contents.len());
        let data = contents[start..end].to_vec();
        Ok(FileReadBlock {
            offset,
            length,
            bytes_read: data.len(),
            data,
        })
    }
}

/// Deterministic bytes that differ at every chunk boundary
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Accept one HTTP request on a local port and answer it with `status_line`
/// and a JSON `body`. The join handle yields the raw request text.
pub async fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get local addr");
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("Failed to accept");
        let mut request = Vec::new();
        let mut buf = [0u8; 8192];
        loop {
            let n = socket.read(&mut buf).await.expect("Failed to read request");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if request_complete(&request) {
                break;
            }
        }
        socket
            .write_all(response.as_bytes())
            .await
            .expect("Failed to write response");
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&request).to_string()
    });

    (format!("http://{}", addr), handle)
}

fn request_complete(request: &[u8]) -> bool {
    let Some(header_end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let headers = String::from_utf8_lossy(&request[..header_end]);
    let content_length = headers
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    request.len() >= header_end + 4 + content_length
}
