//! Client for a local OpenAI-compatible inference server.

use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for inference requests (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Local servers ignore the key, but the client always sends one.
const PLACEHOLDER_API_KEY: &str = "sk-no-key-required";

/// Create a client for the server at `api_base` with a request timeout.
///
/// `OPENAI_API_KEY` is forwarded when set, for servers started with `--api-key`.
pub fn create_client(
    api_base: &str,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>, reqwest::Error> {
    let http_client = reqwest::Client::builder().timeout(timeout).build()?;

    let api_key = std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| PLACEHOLDER_API_KEY.to_string());

    let config = OpenAIConfig::new()
        .with_api_base(api_base.trim_end_matches('/'))
        .with_api_key(api_key);

    Ok(Client::with_config(config).with_http_client(http_client))
}
