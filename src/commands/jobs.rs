use clap::Args;
use serde_json::json;
use std::collections::BTreeMap;

use crate::commands::{format_millis, print_output};
use crate::core::ApiClient;
use crate::error::DatabricksError;
use crate::models::{
    AutoScale, ClusterRef, ClusterScaling, Job, JobSettings, JobTask, Library, NewCluster,
    NotebookTask, OutputFormat, RunNowRequest, SparkJarTask, ValidationError,
};

/// Flags of `jobs create`
#[derive(Debug, Clone, Default, Args)]
pub struct JobCreateOptions {
    /// Job name
    #[arg(long)]
    pub name: String,

    /// Main class of a JAR task
    #[arg(long, help_heading = "JAR task")]
    pub jar_main_class: Option<String>,

    /// JAR installed on the cluster, e.g. dbfs:/jars/app.jar (repeatable)
    #[arg(long = "jar-path", help_heading = "JAR task")]
    pub jar_paths: Vec<String>,

    /// Argument passed to the main class (repeatable)
    #[arg(long = "jar-param", help_heading = "JAR task", allow_hyphen_values = true)]
    pub jar_params: Vec<String>,

    /// Workspace path of a notebook task
    #[arg(long, help_heading = "Notebook task")]
    pub notebook_path: Option<String>,

    /// Notebook base parameter as key=value (repeatable)
    #[arg(long = "notebook-param", help_heading = "Notebook task")]
    pub notebook_params: Vec<String>,

    /// Run on an existing cluster
    #[arg(long, help_heading = "Cluster")]
    pub existing_cluster_id: Option<String>,

    /// Node type of a new cluster, e.g. i3.xlarge
    #[arg(long, help_heading = "Cluster")]
    pub node_type: Option<String>,

    /// Runtime version of a new cluster, e.g. 13.3.x-scala2.12
    #[arg(long, help_heading = "Cluster")]
    pub spark_version: Option<String>,

    /// Fixed number of workers of a new cluster
    #[arg(long, help_heading = "Cluster")]
    pub num_workers: Option<u32>,

    /// Minimum workers of an autoscaling new cluster
    #[arg(long, help_heading = "Cluster")]
    pub autoscale_min: Option<u32>,

    /// Maximum workers of an autoscaling new cluster
    #[arg(long, help_heading = "Cluster")]
    pub autoscale_max: Option<u32>,

    /// Use Python 3 on the new cluster
    #[arg(long, help_heading = "Cluster")]
    pub python3: bool,

    /// Enable table access control on the new cluster
    #[arg(long, help_heading = "Cluster")]
    pub table_acl: bool,

    /// Timeout of each run in seconds
    #[arg(long)]
    pub timeout_seconds: Option<u32>,

    /// Retries of a failed run (-1 retries forever)
    #[arg(long, allow_negative_numbers = true)]
    pub max_retries: Option<i32>,

    /// Maximum number of concurrent runs
    #[arg(long)]
    pub max_concurrent_runs: Option<u32>,
}

impl JobCreateOptions {
    /// Validate the flag combination and build the request body
    pub fn to_settings(&self) -> Result<JobSettings, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let task = self.task()?;
        let libraries = self
            .jar_paths
            .iter()
            .map(|jar| Library { jar: jar.clone() })
            .collect();
        let cluster = self.cluster()?;

        Ok(JobSettings {
            name: name.to_string(),
            task,
            cluster,
            libraries,
            timeout_seconds: self.timeout_seconds,
            max_retries: self.max_retries,
            max_concurrent_runs: self.max_concurrent_runs,
        })
    }

    fn task(&self) -> Result<JobTask, ValidationError> {
        match (&self.jar_main_class, &self.notebook_path) {
            (Some(_), Some(_)) => Err(ValidationError::ConflictingTasks),
            (None, None) => Err(ValidationError::TaskRequired),
            (Some(main_class), None) => {
                if !self.notebook_params.is_empty() {
                    return Err(ValidationError::NotebookOptionWithoutNotebookTask(
                        "--notebook-param",
                    ));
                }
                if self.jar_paths.is_empty() {
                    return Err(ValidationError::MissingJarPath);
                }
                Ok(JobTask::SparkJarTask(SparkJarTask {
                    main_class_name: main_class.clone(),
                    parameters: self.jar_params.clone(),
                }))
            }
            (None, Some(notebook_path)) => {
                if !self.jar_paths.is_empty() {
                    return Err(ValidationError::JarOptionWithoutJarTask("--jar-path"));
                }
                if !self.jar_params.is_empty() {
                    return Err(ValidationError::JarOptionWithoutJarTask("--jar-param"));
                }
                Ok(JobTask::NotebookTask(NotebookTask {
                    notebook_path: notebook_path.clone(),
                    base_parameters: parse_key_values(&self.notebook_params)?,
                }))
            }
        }
    }

    /// First new-cluster flag that was given, for error messages
    fn first_new_cluster_flag(&self) -> Option<&'static str> {
        [
            (self.node_type.is_some(), "--node-type"),
            (self.spark_version.is_some(), "--spark-version"),
            (self.num_workers.is_some(), "--num-workers"),
            (self.autoscale_min.is_some(), "--autoscale-min"),
            (self.autoscale_max.is_some(), "--autoscale-max"),
            (self.python3, "--python3"),
            (self.table_acl, "--table-acl"),
        ]
        .into_iter()
        .find(|(given, _)| *given)
        .map(|(_, flag)| flag)
    }

    fn cluster(&self) -> Result<ClusterRef, ValidationError> {
        if let Some(cluster_id) = &self.existing_cluster_id {
            if let Some(flag) = self.first_new_cluster_flag() {
                return Err(ValidationError::ConflictingClusters(flag));
            }
            return Ok(ClusterRef::ExistingClusterId(cluster_id.clone()));
        }

        let scaling = match (self.num_workers, self.autoscale_min, self.autoscale_max) {
            (None, None, None) => return Err(ValidationError::ClusterRequired),
            (Some(n), None, None) => ClusterScaling::NumWorkers(n),
            (Some(_), _, _) => return Err(ValidationError::ConflictingScaling),
            (None, Some(min), Some(max)) => {
                if min == 0 || min > max {
                    return Err(ValidationError::InvalidAutoscaleRange { min, max });
                }
                ClusterScaling::Autoscale(AutoScale {
                    min_workers: min,
                    max_workers: max,
                })
            }
            (None, _, _) => return Err(ValidationError::IncompleteAutoscale),
        };

        let node_type = self
            .node_type
            .as_ref()
            .ok_or(ValidationError::MissingClusterField("--node-type"))?;
        let spark_version = self
            .spark_version
            .as_ref()
            .ok_or(ValidationError::MissingClusterField("--spark-version"))?;

        let mut cluster = NewCluster::new(spark_version.as_str(), node_type.as_str(), scaling);
        if self.python3 {
            cluster = cluster.with_python3();
        }
        if self.table_acl {
            cluster = cluster.with_table_acl();
        }
        Ok(ClusterRef::NewCluster(cluster))
    }
}

/// Parse `key=value` pairs; the value may itself contain `=`
pub fn parse_key_values(pairs: &[String]) -> Result<BTreeMap<String, String>, ValidationError> {
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.to_string()))
            }
            _ => Err(ValidationError::InvalidNotebookParam(pair.clone())),
        })
        .collect()
}

/// Flags of `jobs run-now`
#[derive(Debug, Clone, Default, Args)]
pub struct RunNowOptions {
    /// Job to trigger
    #[arg(long)]
    pub job_id: i64,

    /// Replaces the JAR task parameters (repeatable)
    #[arg(long = "jar-param", allow_hyphen_values = true)]
    pub jar_params: Vec<String>,

    /// Overrides a notebook base parameter as key=value (repeatable)
    #[arg(long = "notebook-param")]
    pub notebook_params: Vec<String>,
}

impl RunNowOptions {
    pub fn to_request(&self) -> Result<RunNowRequest, ValidationError> {
        Ok(RunNowRequest {
            job_id: self.job_id,
            jar_params: self.jar_params.clone(),
            notebook_params: parse_key_values(&self.notebook_params)?,
        })
    }
}

/// `jobs create`
pub async fn create_job(
    client: &ApiClient,
    options: &JobCreateOptions,
    format: OutputFormat,
) -> Result<(), DatabricksError> {
    let settings = options.to_settings()?;
    let job_id = client.create_job(&settings).await?;
    print_output(format, &json!({ "job_id": job_id }), |_| {
        println!("Created job {} ({})", job_id, settings.name);
    })
}

/// `jobs run-now`
pub async fn run_job(
    client: &ApiClient,
    options: &RunNowOptions,
    format: OutputFormat,
) -> Result<(), DatabricksError> {
    let request = options.to_request()?;
    let response = client.run_now(&request).await?;
    print_output(format, &response, |r| {
        println!("Started run {} of job {}", r.run_id, request.job_id);
    })
}

/// Job settings as indented JSON lines
fn settings_lines(job: &Job) -> Vec<String> {
    serde_json::to_string_pretty(&job.settings)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

/// `jobs get`
pub async fn show_job(
    client: &ApiClient,
    job_id: i64,
    format: OutputFormat,
) -> Result<(), DatabricksError> {
    let job = client.get_job(job_id).await?;
    print_output(format, &job, |job| {
        println!("Job {}: {}", job.job_id, job.name());
        println!("  Creator: {}", job.creator_user_name.as_deref().unwrap_or("-"));
        println!("  Created: {}", format_millis(job.created_time));
        println!("  Settings:");
        for line in settings_lines(job) {
            println!("    {}", line);
        }
    })
}

/// `jobs list`
pub async fn list_jobs(client: &ApiClient, format: OutputFormat) -> Result<(), DatabricksError> {
    let mut jobs = client.list_jobs().await?;
    jobs.sort_by_key(|j| j.job_id);
    print_output(format, &jobs, |jobs| {
        if jobs.is_empty() {
            println!("No jobs found.");
            return;
        }
        for job in jobs {
            println!("{:<12} {}", job.job_id, job.name());
        }
    })
}

/// `jobs delete`
pub async fn delete_job(client: &ApiClient, job_id: i64) -> Result<(), DatabricksError> {
    client.delete_job(job_id).await?;
    println!("Deleted job {}", job_id);
    Ok(())
}
