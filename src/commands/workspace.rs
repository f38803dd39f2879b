use crate::commands::print_output;
use crate::core::ApiClient;
use crate::error::DatabricksError;
use crate::models::OutputFormat;

/// `workspace ls`
pub async fn workspace_ls(
    client: &ApiClient,
    path: &str,
    format: OutputFormat,
) -> Result<(), DatabricksError> {
    let mut objects = client.workspace_list(path).await?;
    objects.sort_by(|a, b| a.path.cmp(&b.path));
    print_output(format, &objects, |objects| {
        for object in objects {
            println!(
                "{:<10} {:<7} {}",
                object.object_type,
                object.language.as_deref().unwrap_or(""),
                object.path
            );
        }
    })
}

/// `workspace mkdirs`
pub async fn workspace_mkdirs(client: &ApiClient, path: &str) -> Result<(), DatabricksError> {
    client.workspace_mkdirs(path).await?;
    println!("Created {}", path);
    Ok(())
}

/// `workspace rm`
pub async fn workspace_rm(
    client: &ApiClient,
    path: &str,
    recursive: bool,
) -> Result<(), DatabricksError> {
    client.workspace_delete(path, recursive).await?;
    println!("Deleted {}", path);
    Ok(())
}
