use crate::commands::print_output;
use crate::core::ApiClient;
use crate::error::DatabricksError;
use crate::models::{ClusterInfo, OutputFormat};

fn print_cluster_row(cluster: &ClusterInfo) {
    println!(
        "{:<22} {:<24} {:<12} {:<8} {}",
        cluster.cluster_id,
        cluster.cluster_name.as_deref().unwrap_or("-"),
        cluster.state.as_deref().unwrap_or("-"),
        cluster.workers_display(),
        cluster.spark_version.as_deref().unwrap_or("-"),
    );
}

/// `clusters list`
pub async fn list_clusters(client: &ApiClient, format: OutputFormat) -> Result<(), DatabricksError> {
    let clusters = client.list_clusters().await?;
    print_output(format, &clusters, |clusters| {
        if clusters.is_empty() {
            println!("No clusters found.");
            return;
        }
        for cluster in clusters {
            print_cluster_row(cluster);
        }
    })
}

/// `clusters get`
pub async fn show_cluster(
    client: &ApiClient,
    cluster_id: &str,
    format: OutputFormat,
) -> Result<(), DatabricksError> {
    let cluster = client.get_cluster(cluster_id).await?;
    print_output(format, &cluster, |c| {
        println!("Cluster {}", c.cluster_id);
        println!("  Name:      {}", c.cluster_name.as_deref().unwrap_or("-"));
        println!("  State:     {}", c.state.as_deref().unwrap_or("-"));
        println!("  Runtime:   {}", c.spark_version.as_deref().unwrap_or("-"));
        println!("  Node type: {}", c.node_type_id.as_deref().unwrap_or("-"));
        println!("  Workers:   {}", c.workers_display());
        if let Some(message) = c.state_message.as_deref().filter(|m| !m.is_empty()) {
            println!("  Message:   {}", message);
        }
    })
}
