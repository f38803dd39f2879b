use crate::commands::{format_millis, print_output};
use crate::core::ApiClient;
use crate::error::DatabricksError;
use crate::models::{OutputFormat, Run};

/// One-line state of a run, e.g. "TERMINATED (SUCCESS)"
pub fn run_state_display(run: &Run) -> String {
    match &run.state.result_state {
        Some(result) => format!("{} ({})", run.state.life_cycle_state, result),
        None => run.state.life_cycle_state.clone(),
    }
}

/// `runs get`
pub async fn show_run(
    client: &ApiClient,
    run_id: i64,
    format: OutputFormat,
) -> Result<(), DatabricksError> {
    let run = client.get_run(run_id).await?;
    print_output(format, &run, |run| {
        println!("Run {}: {}", run.run_id, run_state_display(run));
        if let Some(job_id) = run.job_id {
            println!("  Job:     {}", job_id);
        }
        println!("  Started: {}", format_millis(run.start_time));
        if let Some(message) = run.state.state_message.as_deref().filter(|m| !m.is_empty()) {
            println!("  Message: {}", message);
        }
        if let Some(url) = &run.run_page_url {
            println!("  URL:     {}", url);
        }
    })
}

/// `runs cancel`
pub async fn cancel_run(client: &ApiClient, run_id: i64) -> Result<(), DatabricksError> {
    client.cancel_run(run_id).await?;
    println!("Cancellation requested for run {}", run_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_state_display() {
        let mut run: Run = serde_json::from_str(
            r#"{"run_id":1,"state":{"life_cycle_state":"TERMINATED","result_state":"SUCCESS"}}"#,
        )
        .unwrap();
        assert_eq!(run_state_display(&run), "TERMINATED (SUCCESS)");

        run.state.result_state = None;
        run.state.life_cycle_state = "RUNNING".to_string();
        assert_eq!(run_state_display(&run), "RUNNING");
    }
}
