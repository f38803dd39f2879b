use serde::{Deserialize, Serialize};

use crate::core::client::{ApiClient, Empty};
use crate::error::ApiError;
use crate::models::ObjectInfo;

#[derive(Serialize)]
struct PathRequest<'a> {
    path: &'a str,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    path: &'a str,
    recursive: bool,
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    objects: Vec<ObjectInfo>,
}

/// Workspace tree endpoints (notebooks, folders, libraries)
impl ApiClient {
    pub async fn workspace_list(&self, path: &str) -> Result<Vec<ObjectInfo>, ApiError> {
        let response: ListResponse = self.get("workspace/list", &PathRequest { path }).await?;
        Ok(response.objects)
    }

    pub async fn workspace_mkdirs(&self, path: &str) -> Result<(), ApiError> {
        let _: Empty = self.post("workspace/mkdirs", &PathRequest { path }).await?;
        Ok(())
    }

    pub async fn workspace_delete(&self, path: &str, recursive: bool) -> Result<(), ApiError> {
        let _: Empty = self
            .post("workspace/delete", &DeleteRequest { path, recursive })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_of_empty_folder() {
        // Empty folders come back without an "objects" key.
        let response: ListResponse = serde_json::from_str("{}").unwrap();
        assert!(response.objects.is_empty());
    }
}
