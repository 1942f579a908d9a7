use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default gas budget for `cluster::*` entry points, in base units.
/// Equal to 1 native token, which is enough for most transactions.
pub const DEFAULT_CLUSTER_GAS_BUDGET: u64 = 1_000_000_000;

/// Default gas budget for `model::*`/`node::*` calls and tool attachment.
pub const DEFAULT_UTILITY_GAS_BUDGET: u64 = 10_000_000;

/// The top-level configuration for the SDK.
///
/// Typically deserialized from a TOML file via [`load_config`] and passed to
/// [`crate::client::NexusClient`] on construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SdkConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub gas: GasConfig,
    #[serde(default)]
    pub polling: PollConfig,
}

/// Connection settings for the chain node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    pub rpc_url: String,
    pub ws_url: String,
    /// Funding endpoint for local development networks. `None` elsewhere.
    #[serde(default)]
    pub faucet_url: Option<String>,
}

/// Gas budgets in native base units (10^9 base units = 1 token).
///
/// Cluster mutations need far more gas than model/node bookkeeping calls,
/// so the defaults are split into two named knobs. Every operation also
/// accepts a per-call override.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GasConfig {
    /// Default budget for `cluster::*` entry points.
    pub cluster_budget: u64,
    /// Default budget for `model::*`/`node::*` calls and tool attachment.
    pub utility_budget: u64,
}

/// Behavior of the execution poller (see [`crate::execution`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PollConfig {
    /// Maximum time to wait for an execution to complete, in seconds.
    pub max_wait_secs: u64,
    /// Interval between status checks, in seconds.
    pub check_interval_secs: u64,
    #[serde(default)]
    pub mode: PollMode,
}

/// Whether the poller actually polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PollMode {
    /// Fetch the execution object until it reaches a terminal status.
    #[default]
    Poll,
    /// Skip polling entirely and return a fixed placeholder response.
    /// Useful for demo environments where no executor is running.
    Stub,
}

impl PollConfig {
    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:9000".to_string(),
            ws_url: "ws://127.0.0.1:9000".to_string(),
            faucet_url: None,
        }
    }
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            cluster_budget: DEFAULT_CLUSTER_GAS_BUDGET,
            utility_budget: DEFAULT_UTILITY_GAS_BUDGET,
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_wait_secs: 180,
            check_interval_secs: 5,
            mode: PollMode::Poll,
        }
    }
}

/// Loads the SDK configuration from a TOML file.
///
/// `NEXUS`-prefixed environment variables (`NEXUS_NETWORK__RPC-URL`, ...)
/// layer on top of the file.
pub fn load_config(path: &str) -> Result<SdkConfig> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(path))
        .add_source(config::Environment::with_prefix("NEXUS").separator("__"));

    let settings: SdkConfig = builder
        .build()
        .context(format!("Failed to build configuration from '{}'", path))?
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_budgets() {
        let cfg = SdkConfig::default();
        assert_eq!(cfg.gas.cluster_budget, 1_000_000_000);
        assert_eq!(cfg.gas.utility_budget, 10_000_000);
        assert_eq!(cfg.polling.max_wait_secs, 180);
        assert_eq!(cfg.polling.check_interval_secs, 5);
        assert_eq!(cfg.polling.mode, PollMode::Poll);
    }

    #[test]
    fn deserializes_kebab_case_toml() {
        let toml = r#"
            [network]
            rpc-url = "http://node:9000"
            ws-url = "ws://node:9000"
            faucet-url = "http://node:5003/gas"

            [gas]
            cluster-budget = 500
            utility-budget = 50

            [polling]
            max-wait-secs = 10
            check-interval-secs = 1
            mode = "stub"
        "#;
        let cfg: SdkConfig = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(cfg.network.rpc_url, "http://node:9000");
        assert_eq!(cfg.network.faucet_url.as_deref(), Some("http://node:5003/gas"));
        assert_eq!(cfg.gas.cluster_budget, 500);
        assert_eq!(cfg.polling.mode, PollMode::Stub);
    }
}
