use serde_json::Value;

use crate::cli::client::PinsClient;
use crate::cli::utils::output_json;
use crate::cli::OutputFormat;

pub async fn health(client: &PinsClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let body = client.health().await?;
    let healthy = body.get("success").and_then(Value::as_bool).unwrap_or(false);

    match output_format {
        OutputFormat::Json => output_json(&body)?,
        OutputFormat::Text => {
            let status = body
                .pointer("/data/status")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            println!("Server status: {}", status);
            if let Some(error) = body.pointer("/data/database_error").and_then(Value::as_str) {
                println!("Database: {}", error);
            }
        }
    }

    if !healthy {
        anyhow::bail!("server reported unhealthy");
    }
    Ok(())
}
