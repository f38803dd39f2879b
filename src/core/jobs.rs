use serde::Serialize;
use tracing::info;

use crate::core::client::{ApiClient, Empty};
use crate::error::ApiError;
use crate::models::{
    CreateJobResponse, Job, JobSettings, ListJobsResponse, Run, RunNowRequest, RunNowResponse,
};

#[derive(Serialize)]
struct JobIdRequest {
    job_id: i64,
}

#[derive(Serialize)]
struct RunIdRequest {
    run_id: i64,
}

/// Jobs and runs endpoints
impl ApiClient {
    /// `jobs/create`; returns the new job id
    pub async fn create_job(&self, settings: &JobSettings) -> Result<i64, ApiError> {
        let response: CreateJobResponse = self.post("jobs/create", settings).await?;
        info!("Created job '{}' with id {}", settings.name, response.job_id);
        Ok(response.job_id)
    }

    /// `jobs/run-now`
    pub async fn run_now(&self, request: &RunNowRequest) -> Result<RunNowResponse, ApiError> {
        let response: RunNowResponse = self.post("jobs/run-now", request).await?;
        info!("Started run {} of job {}", response.run_id, request.job_id);
        Ok(response)
    }

    pub async fn get_job(&self, job_id: i64) -> Result<Job, ApiError> {
        self.get("jobs/get", &JobIdRequest { job_id }).await
    }

    pub async fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        let response: ListJobsResponse = self.get("jobs/list", &[] as &[(&str, &str)]).await?;
        Ok(response.jobs)
    }

    pub async fn delete_job(&self, job_id: i64) -> Result<(), ApiError> {
        let _: Empty = self.post("jobs/delete", &JobIdRequest { job_id }).await?;
        Ok(())
    }

    pub async fn get_run(&self, run_id: i64) -> Result<Run, ApiError> {
        self.get("jobs/runs/get", &RunIdRequest { run_id }).await
    }

    pub async fn cancel_run(&self, run_id: i64) -> Result<(), ApiError> {
        let _: Empty = self.post("jobs/runs/cancel", &RunIdRequest { run_id }).await?;
        Ok(())
    }
}
