use serde::{Deserialize, Serialize};

use crate::core::client::ApiClient;
use crate::error::ApiError;
use crate::models::ClusterInfo;

#[derive(Serialize)]
struct ClusterIdQuery<'a> {
    cluster_id: &'a str,
}

#[derive(Deserialize)]
struct ListClustersResponse {
    #[serde(default)]
    clusters: Vec<ClusterInfo>,
}

impl ApiClient {
    pub async fn list_clusters(&self) -> Result<Vec<ClusterInfo>, ApiError> {
        let response: ListClustersResponse =
            self.get("clusters/list", &[] as &[(&str, &str)]).await?;
        Ok(response.clusters)
    }

    pub async fn get_cluster(&self, cluster_id: &str) -> Result<ClusterInfo, ApiError> {
        self.get("clusters/get", &ClusterIdQuery { cluster_id }).await
    }
}
