use std::sync::Arc;

use campaign_core::Commitment;
use campaign_rpc::{Cluster, RpcClient};
use tracing::debug;

/// Opens a cluster connection for one action.
pub trait Connector: Send + Sync {
    fn connect(&self) -> Arc<dyn Cluster>;
}

/// Connects to a JSON-RPC endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    url: String,
    commitment: Commitment,
}

impl HttpConnector {
    pub fn new(url: impl Into<String>, commitment: Commitment) -> Self {
        Self {
            url: url.into(),
            commitment,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn commitment(&self) -> Commitment {
        self.commitment
    }
}

impl Connector for HttpConnector {
    fn connect(&self) -> Arc<dyn Cluster> {
        debug!(url = %self.url, commitment = %self.commitment, "opening cluster connection");
        Arc::new(RpcClient::new(&self.url, self.commitment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_connector_uses_commitment() {
        let connector = HttpConnector::new("https://api.devnet.solana.com", Commitment::Processed);
        let cluster = connector.connect();
        assert_eq!(cluster.commitment(), Commitment::Processed);
        assert_eq!(connector.url(), "https://api.devnet.solana.com");
    }
}
