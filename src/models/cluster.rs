use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Python binary selected by the `--python3` flag
pub const PYTHON3_PATH: &str = "/databricks/python3/bin/python3";

/// Inline cluster definition sent with a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCluster {
    /// Runtime version, e.g. "13.3.x-scala2.12"
    pub spark_version: String,
    /// Instance type of driver and workers
    pub node_type_id: String,
    #[serde(flatten)]
    pub scaling: ClusterScaling,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub spark_conf: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub spark_env_vars: BTreeMap<String, String>,
}

/// Either a fixed number of workers or an autoscale range, never both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterScaling {
    NumWorkers(u32),
    Autoscale(AutoScale),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoScale {
    pub min_workers: u32,
    pub max_workers: u32,
}

impl NewCluster {
    pub fn new(
        spark_version: impl Into<String>,
        node_type_id: impl Into<String>,
        scaling: ClusterScaling,
    ) -> Self {
        Self {
            spark_version: spark_version.into(),
            node_type_id: node_type_id.into(),
            scaling,
            spark_conf: BTreeMap::new(),
            spark_env_vars: BTreeMap::new(),
        }
    }

    /// Run Python code on the cluster with Python 3
    pub fn with_python3(mut self) -> Self {
        self.spark_env_vars
            .insert("PYSPARK_PYTHON".to_string(), PYTHON3_PATH.to_string());
        self
    }

    /// Enable table access control; restricts the REPL to Python and SQL
    pub fn with_table_acl(mut self) -> Self {
        self.spark_conf.insert(
            "spark.databricks.acl.dfAclsEnabled".to_string(),
            "true".to_string(),
        );
        self.spark_conf.insert(
            "spark.databricks.repl.allowedLanguages".to_string(),
            "python,sql".to_string(),
        );
        self
    }

    pub fn is_python3(&self) -> bool {
        self.spark_env_vars.get("PYSPARK_PYTHON").map(String::as_str) == Some(PYTHON3_PATH)
    }

    pub fn has_table_acl(&self) -> bool {
        self.spark_conf
            .get("spark.databricks.acl.dfAclsEnabled")
            .map(String::as_str)
            == Some("true")
    }
}

/// Cluster as reported by `clusters/get` and `clusters/list`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub cluster_id: String,
    #[serde(default)]
    pub cluster_name: Option<String>,
    #[serde(default)]
    pub spark_version: Option<String>,
    #[serde(default)]
    pub node_type_id: Option<String>,
    #[serde(default)]
    pub num_workers: Option<u32>,
    #[serde(default)]
    pub autoscale: Option<AutoScale>,
    /// PENDING, RUNNING, TERMINATED, ...
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub state_message: Option<String>,
}

impl ClusterInfo {
    /// Human readable worker count, e.g. "4" or "2-8"
    pub fn workers_display(&self) -> String {
        match (self.autoscale, self.num_workers) {
            (Some(a), _) => format!("{}-{}", a.min_workers, a.max_workers),
            (None, Some(n)) => n.to_string(),
            (None, None) => "-".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fixed_size_cluster_serialization() {
        let cluster = NewCluster::new("13.3.x-scala2.12", "i3.xlarge", ClusterScaling::NumWorkers(4));
        let value = serde_json::to_value(&cluster).unwrap();
        assert_eq!(
            value,
            json!({
                "spark_version": "13.3.x-scala2.12",
                "node_type_id": "i3.xlarge",
                "num_workers": 4
            })
        );
    }

    #[test]
    fn test_autoscale_cluster_with_flags() {
        let cluster = NewCluster::new(
            "13.3.x-scala2.12",
            "i3.xlarge",
            ClusterScaling::Autoscale(AutoScale { min_workers: 2, max_workers: 8 }),
        )
        .with_python3()
        .with_table_acl();

        let value = serde_json::to_value(&cluster).unwrap();
        assert_eq!(value["autoscale"], json!({"min_workers": 2, "max_workers": 8}));
        assert!(value.get("num_workers").is_none());
        assert_eq!(value["spark_env_vars"]["PYSPARK_PYTHON"], PYTHON3_PATH);
        assert_eq!(value["spark_conf"]["spark.databricks.acl.dfAclsEnabled"], "true");
        assert_eq!(value["spark_conf"]["spark.databricks.repl.allowedLanguages"], "python,sql");
        assert!(cluster.is_python3());
        assert!(cluster.has_table_acl());
    }

    #[test]
    fn test_cluster_info_deserialization() {
        let json = r#"{"cluster_id":"0101-abc","cluster_name":"etl","state":"RUNNING","autoscale":{"min_workers":1,"max_workers":3},"extra":1}"#;
        let info: ClusterInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.cluster_id, "0101-abc");
        assert_eq!(info.state.as_deref(), Some("RUNNING"));
        assert_eq!(info.workers_display(), "1-3");
    }

    #[test]
    fn test_workers_display_fixed_and_unknown() {
        let mut info: ClusterInfo = serde_json::from_str(r#"{"cluster_id":"c"}"#).unwrap();
        assert_eq!(info.workers_display(), "-");
        info.num_workers = Some(5);
        assert_eq!(info.workers_display(), "5");
    }
}
