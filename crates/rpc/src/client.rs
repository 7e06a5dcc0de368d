//! HTTP JSON-RPC client for a Solana node.

use std::sync::atomic::{AtomicU64, Ordering};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use campaign_core::{Commitment, Pubkey};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use crate::cluster::{AccountData, Cluster, ClusterError, RecentBlockhash, Result, SignatureStatus};
use crate::protocol::{
    RpcRequest, RpcResponse, UiAccount, UiKeyedAccount, UiLatestBlockhash, UiSignatureStatus,
    WithContext,
};

/// JSON-RPC client bound to one endpoint and commitment.
pub struct RpcClient {
    url: String,
    commitment: Commitment,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: &str, commitment: Commitment) -> Self {
        Self {
            url: url.to_string(),
            commitment,
            http: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a request and decode its `result`.
    pub async fn send_request<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::new(method, Some(params), id);
        debug!(url = %self.url, method, id, "RPC request");

        let response: RpcResponse = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        decode_result(method, response)
    }

    fn commitment_config(&self) -> Value {
        json!({ "commitment": self.commitment.as_str() })
    }

    fn account_config(&self) -> Value {
        json!({ "commitment": self.commitment.as_str(), "encoding": "base64" })
    }
}

/// Unwrap a response envelope into `T`, surfacing server errors.
pub(crate) fn decode_result<T: DeserializeOwned>(method: &str, response: RpcResponse) -> Result<T> {
    if let Some(err) = response.error {
        return Err(ClusterError::Rpc {
            code: err.code,
            message: err.message,
            data: err.data,
        });
    }
    let result = response
        .result
        .ok_or_else(|| ClusterError::InvalidResponse(format!("{method}: no result in response")))?;
    serde_json::from_value(result)
        .map_err(|e| ClusterError::InvalidResponse(format!("{method}: {e}")))
}

pub(crate) fn parse_pubkey(value: &str) -> Result<Pubkey> {
    value
        .parse()
        .map_err(|e| ClusterError::InvalidResponse(format!("bad pubkey {value}: {e}")))
}

pub(crate) fn parse_blockhash(value: &UiLatestBlockhash) -> Result<RecentBlockhash> {
    let bytes = bs58::decode(&value.blockhash)
        .into_vec()
        .map_err(|e| ClusterError::InvalidResponse(format!("bad blockhash: {e}")))?;
    let blockhash: [u8; 32] = bytes
        .try_into()
        .map_err(|_| ClusterError::InvalidResponse("blockhash is not 32 bytes".into()))?;
    Ok(RecentBlockhash {
        blockhash,
        last_valid_block_height: value.last_valid_block_height,
    })
}

pub(crate) fn parse_account(pubkey: Pubkey, account: UiAccount) -> Result<AccountData> {
    let (encoded, encoding) = account.data;
    if encoding != "base64" {
        return Err(ClusterError::InvalidResponse(format!(
            "unexpected account encoding {encoding}"
        )));
    }
    let data = BASE64
        .decode(encoded)
        .map_err(|e| ClusterError::InvalidResponse(format!("bad account data: {e}")))?;
    Ok(AccountData {
        pubkey,
        lamports: account.lamports,
        owner: parse_pubkey(&account.owner)?,
        data,
    })
}

#[async_trait::async_trait]
impl Cluster for RpcClient {
    fn commitment(&self) -> Commitment {
        self.commitment
    }

    async fn latest_blockhash(&self) -> Result<RecentBlockhash> {
        let response: WithContext<UiLatestBlockhash> = self
            .send_request("getLatestBlockhash", json!([self.commitment_config()]))
            .await?;
        parse_blockhash(&response.value)
    }

    async fn send_transaction(&self, transaction: &[u8]) -> Result<String> {
        let params = json!([
            BASE64.encode(transaction),
            { "encoding": "base64", "preflightCommitment": self.commitment.as_str() }
        ]);
        self.send_request("sendTransaction", params).await
    }

    async fn signature_status(&self, signature: &str) -> Result<Option<SignatureStatus>> {
        let response: WithContext<Vec<Option<UiSignatureStatus>>> = self
            .send_request("getSignatureStatuses", json!([[signature]]))
            .await?;
        Ok(response.value.into_iter().next().flatten().map(|s| SignatureStatus {
            slot: s.slot,
            err: s.err,
            confirmation_status: s.confirmation_status,
        }))
    }

    async fn block_height(&self) -> Result<u64> {
        self.send_request("getBlockHeight", json!([self.commitment_config()]))
            .await
    }

    async fn program_accounts(&self, program_id: &Pubkey) -> Result<Vec<AccountData>> {
        let accounts: Vec<UiKeyedAccount> = self
            .send_request(
                "getProgramAccounts",
                json!([program_id.to_string(), self.account_config()]),
            )
            .await?;
        accounts
            .into_iter()
            .map(|keyed| parse_account(parse_pubkey(&keyed.pubkey)?, keyed.account))
            .collect()
    }

    async fn account(&self, address: &Pubkey) -> Result<Option<AccountData>> {
        let response: WithContext<Option<UiAccount>> = self
            .send_request(
                "getAccountInfo",
                json!([address.to_string(), self.account_config()]),
            )
            .await?;
        response
            .value
            .map(|account| parse_account(*address, account))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(body: &str) -> RpcResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = RpcClient::new("http://127.0.0.1:8899", Commitment::Processed);
        assert_eq!(client.url(), "http://127.0.0.1:8899");
        assert_eq!(client.commitment(), Commitment::Processed);
        assert_eq!(client.account_config()["encoding"], "base64");
        assert_eq!(client.commitment_config()["commitment"], "processed");
    }

    #[test]
    fn test_decode_server_error() {
        let resp = response(r#"{"jsonrpc":"2.0","error":{"code":-32602,"message":"Invalid param"},"id":1}"#);
        let err = decode_result::<u64>("getBlockHeight", resp).unwrap_err();
        assert!(matches!(err, ClusterError::Rpc { code: -32602, .. }));
    }

    #[test]
    fn test_decode_missing_result() {
        let resp = response(r#"{"jsonrpc":"2.0","id":1}"#);
        assert!(matches!(
            decode_result::<u64>("getBlockHeight", resp),
            Err(ClusterError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_decode_program_accounts() {
        let owner = Pubkey::new([4u8; 32]);
        let key = Pubkey::new([5u8; 32]);
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": [{
                "pubkey": key.to_string(),
                "account": {
                    "lamports": 1_500_000,
                    "data": [BASE64.encode([1u8, 2, 3]), "base64"],
                    "owner": owner.to_string(),
                    "executable": false,
                    "rentEpoch": 18446744073709551615u64,
                    "space": 3
                }
            }]
        });
        let accounts: Vec<UiKeyedAccount> =
            decode_result("getProgramAccounts", serde_json::from_value(body).unwrap()).unwrap();
        let parsed = parse_account(parse_pubkey(&accounts[0].pubkey).unwrap(), accounts[0].account.clone())
            .unwrap();
        assert_eq!(parsed.pubkey, key);
        assert_eq!(parsed.owner, owner);
        assert_eq!(parsed.lamports, 1_500_000);
        assert_eq!(parsed.data, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_program_accounts() {
        let resp = response(r#"{"jsonrpc":"2.0","result":[],"id":1}"#);
        let accounts: Vec<UiKeyedAccount> = decode_result("getProgramAccounts", resp).unwrap();
        assert!(accounts.is_empty());
    }

    #[test]
    fn test_parse_blockhash() {
        let ui = UiLatestBlockhash {
            blockhash: bs58::encode([7u8; 32]).into_string(),
            last_valid_block_height: 99,
        };
        let parsed = parse_blockhash(&ui).unwrap();
        assert_eq!(parsed.blockhash, [7u8; 32]);
        assert_eq!(parsed.last_valid_block_height, 99);

        let short = UiLatestBlockhash {
            blockhash: bs58::encode([7u8; 4]).into_string(),
            last_valid_block_height: 0,
        };
        assert!(parse_blockhash(&short).is_err());
    }

    #[test]
    fn test_rejects_non_base64_encoding() {
        let account = UiAccount {
            lamports: 0,
            data: ("abc".into(), "base58".into()),
            owner: Pubkey::default().to_string(),
            executable: false,
        };
        assert!(parse_account(Pubkey::default(), account).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_node() {
        let client = RpcClient::new("http://127.0.0.1:1", Commitment::Processed);
        assert!(matches!(client.block_height().await, Err(ClusterError::Http(_))));
    }
}
