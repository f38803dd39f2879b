use std::path::Path;
use tracing::debug;

use crate::error::DatabricksError;
use crate::models::Config;

/// Load configuration with CLI / environment overrides.
///
/// An explicit `config_path` must exist; otherwise `databricks.toml` in
/// `working_dir` is used when present.
pub fn load_config(
    working_dir: &Path,
    config_path: Option<&Path>,
    host: Option<String>,
    token: Option<String>,
    timeout: Option<u64>,
) -> Result<Config, DatabricksError> {
    let config = match config_path {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            Config::load_from_file(path)?
        }
        None => Config::load_from_dir(working_dir)?,
    };
    let config = config.with_overrides(host, token, timeout);

    debug!(
        "Configuration loaded: host={}, token={}, timeout={}s",
        config.api.host.as_deref().unwrap_or("<unset>"),
        if config.api.token.is_some() { "<set>" } else { "<unset>" },
        config.api.timeout_seconds
    );

    Ok(config)
}
