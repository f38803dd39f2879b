use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::NewCluster;

/// Settings sent to `jobs/create`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSettings {
    pub name: String,
    #[serde(flatten)]
    pub task: JobTask,
    #[serde(flatten)]
    pub cluster: ClusterRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub libraries: Vec<Library>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent_runs: Option<u32>,
}

/// What the job executes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobTask {
    SparkJarTask(SparkJarTask),
    NotebookTask(NotebookTask),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparkJarTask {
    pub main_class_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookTask {
    pub notebook_path: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub base_parameters: BTreeMap<String, String>,
}

/// Where the job runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterRef {
    ExistingClusterId(String),
    NewCluster(NewCluster),
}

/// Library installed on the cluster before the task starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub jar: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateJobResponse {
    pub job_id: i64,
}

/// Job as returned by `jobs/get` and `jobs/list`.
///
/// Settings are kept as raw JSON: the server returns task types this
/// client never creates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub job_id: i64,
    #[serde(default)]
    pub creator_user_name: Option<String>,
    /// Epoch milliseconds
    #[serde(default)]
    pub created_time: Option<i64>,
    #[serde(default)]
    pub settings: serde_json::Value,
}

impl Job {
    pub fn name(&self) -> &str {
        self.settings
            .get("name")
            .and_then(|n| n.as_str())
            .unwrap_or("Untitled")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListJobsResponse {
    #[serde(default)]
    pub jobs: Vec<Job>,
}

/// Body of `jobs/run-now`
#[derive(Debug, Clone, Serialize)]
pub struct RunNowRequest {
    pub job_id: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub jar_params: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub notebook_params: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunNowResponse {
    pub run_id: i64,
    #[serde(default)]
    pub number_in_job: Option<i64>,
}

/// A single run of a job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub run_id: i64,
    #[serde(default)]
    pub job_id: Option<i64>,
    #[serde(default)]
    pub number_in_job: Option<i64>,
    #[serde(default)]
    pub state: RunState,
    #[serde(default)]
    pub run_page_url: Option<String>,
    /// Epoch milliseconds
    #[serde(default)]
    pub start_time: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunState {
    /// PENDING, RUNNING, TERMINATING, TERMINATED, SKIPPED, INTERNAL_ERROR
    #[serde(default)]
    pub life_cycle_state: String,
    /// SUCCESS, FAILED, TIMEDOUT, CANCELED; absent while running
    #[serde(default)]
    pub result_state: Option<String>,
    #[serde(default)]
    pub state_message: Option<String>,
}

/// Errors raised while turning CLI flags into job settings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Job name cannot be empty")]
    EmptyName,

    #[error("Specify exactly one task: --jar-main-class or --notebook-path")]
    TaskRequired,

    #[error("--jar-main-class and --notebook-path are mutually exclusive")]
    ConflictingTasks,

    #[error("A JAR task needs at least one --jar-path")]
    MissingJarPath,

    #[error("{0} is only valid with a JAR task")]
    JarOptionWithoutJarTask(&'static str),

    #[error("{0} is only valid with a notebook task")]
    NotebookOptionWithoutNotebookTask(&'static str),

    #[error("Invalid notebook parameter '{0}': expected key=value")]
    InvalidNotebookParam(String),

    #[error("Specify exactly one cluster: --existing-cluster-id or a new cluster (--num-workers / --autoscale-min and --autoscale-max)")]
    ClusterRequired,

    #[error("--existing-cluster-id cannot be combined with new cluster options ({0})")]
    ConflictingClusters(&'static str),

    #[error("--num-workers and --autoscale-min/--autoscale-max are mutually exclusive")]
    ConflictingScaling,

    #[error("Autoscale needs both --autoscale-min and --autoscale-max")]
    IncompleteAutoscale,

    #[error("Invalid autoscale range: min {min} must be at least 1 and not greater than max {max}")]
    InvalidAutoscaleRange { min: u32, max: u32 },

    #[error("A new cluster requires {0}")]
    MissingClusterField(&'static str),
}
