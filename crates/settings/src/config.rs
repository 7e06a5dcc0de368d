use std::path::PathBuf;

use campaign_core::{Commitment, Pubkey};
use serde::{Deserialize, Serialize};

/// Service name used for config, data and keystore directories.
pub const SERVICE_NAME: &str = "campaign";

/// Provider name the client expects the wallet to report.
pub const DEFAULT_EXPECTED_PROVIDER: &str = "keypair";

/// Cluster the client talks to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    #[default]
    Devnet,
    Testnet,
    MainnetBeta,
    Localnet,
    Custom(String),
}

impl Network {
    /// JSON-RPC endpoint for this cluster.
    pub fn rpc_url(&self) -> &str {
        match self {
            Self::Devnet => "https://api.devnet.solana.com",
            Self::Testnet => "https://api.testnet.solana.com",
            Self::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Self::Localnet => "http://127.0.0.1:8899",
            Self::Custom(url) => url,
        }
    }

    /// Map a cluster moniker or URL to a network.
    pub fn from_moniker(value: &str) -> Self {
        match value {
            "devnet" | "d" => Self::Devnet,
            "testnet" | "t" => Self::Testnet,
            "mainnet-beta" | "mainnet" | "m" => Self::MainnetBeta,
            "localnet" | "localhost" | "l" => Self::Localnet,
            url => Self::Custom(url.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// A wallet reporting any other provider name is treated as unknown.
    pub expected_provider: String,
    /// `None` means the keystore default path.
    pub keypair_path: Option<PathBuf>,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            expected_provider: DEFAULT_EXPECTED_PROVIDER.to_string(),
            keypair_path: None,
        }
    }
}

impl WalletConfig {
    pub fn resolved_keypair_path(&self) -> PathBuf {
        match &self.keypair_path {
            Some(path) => campaign_keystore::expand_path(&path.to_string_lossy()),
            None => campaign_keystore::default_keypair_path_for(SERVICE_NAME),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub network: Network,
    pub commitment: Commitment,
    /// Overrides the address baked into the program interface.
    pub program_id: Option<Pubkey>,
    pub wallet: WalletConfig,
    pub confirm_poll_interval_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network: Network::Devnet,
            commitment: Commitment::Processed,
            program_id: None,
            wallet: WalletConfig::default(),
            confirm_poll_interval_ms: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_target_devnet_processed() {
        let config = ClientConfig::default();
        assert_eq!(config.network.rpc_url(), "https://api.devnet.solana.com");
        assert_eq!(config.commitment, Commitment::Processed);
        assert_eq!(config.wallet.expected_provider, "keypair");
    }

    #[test]
    fn test_keypair_path_resolution() {
        let wallet = WalletConfig::default();
        assert!(wallet.resolved_keypair_path().ends_with("keys/id.json"));

        let custom = WalletConfig {
            keypair_path: Some(PathBuf::from("~/wallets/id.json")),
            ..Default::default()
        };
        assert!(!custom.resolved_keypair_path().starts_with("~"));
    }

    #[test]
    fn test_network_monikers() {
        assert_eq!(Network::from_moniker("devnet"), Network::Devnet);
        assert_eq!(Network::from_moniker("l"), Network::Localnet);
        let custom = Network::from_moniker("http://10.0.0.1:8899");
        assert_eq!(custom.rpc_url(), "http://10.0.0.1:8899");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{ "network": "localnet", "commitment": "confirmed" }"#)
                .unwrap();
        assert_eq!(config.network, Network::Localnet);
        assert_eq!(config.commitment, Commitment::Confirmed);
        assert_eq!(config.confirm_poll_interval_ms, 500);
        assert!(config.program_id.is_none());
    }

    #[test]
    fn test_custom_network_serde() {
        let config = ClientConfig {
            network: Network::Custom("http://rpc.local".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""custom":"http://rpc.local""#));
        let back: ClientConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
