#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;
use uuid::Uuid;

use pinned_resources_api::auth::{generate_jwt, Claims};

pub const TEST_SECRET: &str = "integration-secret";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);
        let fixtures = format!("{}/tests/fixtures/catalog.yaml", env!("CARGO_MANIFEST_DIR"));

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_pinned-resources-api"));
        cmd.env("APP_ENV", "development")
            .env("PINNED_API_PORT", port.to_string())
            .env("STORAGE_BACKEND", "memory")
            .env("STORAGE_FIXTURES", fixtures)
            .env("JWT_SECRET", TEST_SECRET)
            .env("RUST_LOG", "warn")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Token for a brand new user; the server is shared so every test gets its own owner
pub fn fresh_token() -> Result<String> {
    token_for(Uuid::new_v4(), "full")
}

pub fn token_for(user_id: Uuid, access: &str) -> Result<String> {
    let claims = Claims::new("integration".to_string(), user_id, access.to_string(), 1);
    Ok(generate_jwt(&claims, TEST_SECRET)?)
}

pub async fn read_json(res: reqwest::Response) -> Result<(StatusCode, Value)> {
    let status = res.status();
    let body = res.json::<Value>().await?;
    Ok((status, body))
}

pub fn ids(body: &Value, key: &str) -> Vec<i64> {
    body[key]
        .as_array()
        .map(|items| items.iter().filter_map(|item| item["id"].as_i64()).collect())
        .unwrap_or_default()
}
