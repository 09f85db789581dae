use anyhow::{bail, Result};

use crate::constants::service;

/// Identity of one agent-runtime endpoint: account, region, and the logical
/// runtime name. The remote service addresses runtimes by ARN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentEndpoint {
    pub account_id: String,
    pub region: String,
    pub agent_name: String,
}

impl AgentEndpoint {
    /// Builds an endpoint from the environment, taking the account identity
    /// from `AWS_ACCOUNT_ID`. Fails before any network call when the variable
    /// is missing so CI logs name the misconfiguration directly.
    pub fn from_env(region: &str, agent_name: &str) -> Result<Self> {
        let account_id = match std::env::var("AWS_ACCOUNT_ID") {
            Ok(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => bail!("AWS_ACCOUNT_ID environment variable is required"),
        };
        Ok(Self {
            account_id,
            region: region.to_string(),
            agent_name: agent_name.to_string(),
        })
    }

    /// The runtime ARN the service keys invocations on.
    pub fn runtime_arn(&self) -> String {
        format!(
            "arn:aws:bedrock-agentcore:{}:{}:runtime/{}",
            self.region, self.account_id, self.agent_name
        )
    }

    /// Regional data-plane base URL.
    pub fn default_base_url(&self) -> String {
        format!(
            "https://{}.{}.amazonaws.com",
            service::SERVICE_HOST_PREFIX,
            self.region
        )
    }

    /// Hostname of the regional data plane, used by the raw stability probe.
    pub fn default_host(region: &str) -> String {
        format!("{}.{region}.amazonaws.com", service::SERVICE_HOST_PREFIX)
    }

    /// Full invocation URL under `base`. The ARN is percent-encoded so it
    /// occupies a single path segment.
    pub fn invocation_url(&self, base: &str) -> String {
        format!(
            "{}/runtimes/{}/invocations",
            base.trim_end_matches('/'),
            encode_arn(&self.runtime_arn())
        )
    }
}

/// Percent-encodes the characters an ARN contains that are meaningful inside
/// a URL path (`:` and `/`).
fn encode_arn(arn: &str) -> String {
    arn.replace(':', "%3A").replace('/', "%2F")
}
