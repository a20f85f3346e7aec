pub mod fetch;

use anyhow::{Context, Result};
use pubmed_papers::{ClientConfig, PubMedClient};

pub fn create_pubmed_client(
    email: Option<&str>,
    tool: Option<&str>,
    max_results: usize,
    timeout_seconds: u64,
) -> Result<PubMedClient> {
    let mut config = ClientConfig::new()
        .with_max_results(max_results)
        .with_timeout_seconds(timeout_seconds);

    if let Some(tool) = tool {
        config = config.with_tool(tool);
    }

    if let Some(email) = email {
        config = config.with_email(email);
    }

    PubMedClient::with_config(config).context("Failed to create PubMed client")
}
