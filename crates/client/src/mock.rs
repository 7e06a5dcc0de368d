//! In-memory cluster for tests. Records every submitted transaction and
//! serves canned program accounts.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use campaign_core::{Commitment, Pubkey};
use campaign_program::{Campaign, Transaction};
use campaign_rpc::{AccountData, Cluster, ClusterError, RecentBlockhash, SignatureStatus};
use tracing::info;

/// Last valid block height handed out with every blockhash.
const MOCK_LAST_VALID_BLOCK_HEIGHT: u64 = 150;

#[derive(Default)]
struct MockState {
    accounts: Vec<AccountData>,
    sent: Vec<Transaction>,
    landed: HashSet<String>,
    program_account_calls: usize,
    send_failure: Option<String>,
    list_failure: Option<String>,
}

pub struct MockCluster {
    commitment: Commitment,
    state: Mutex<MockState>,
}

impl MockCluster {
    pub fn new() -> Self {
        Self {
            commitment: Commitment::Processed,
            state: Mutex::new(MockState::default()),
        }
    }

    /// Store `campaign` as an account owned by `program_id`.
    pub fn insert_campaign(&self, program_id: Pubkey, campaign: &Campaign) {
        let data = campaign
            .encode(512)
            .unwrap_or_else(|e| panic!("encode campaign: {e}"));
        self.insert_account(AccountData {
            pubkey: campaign.address,
            lamports: 1_000_000,
            owner: program_id,
            data,
        });
    }

    pub fn insert_account(&self, account: AccountData) {
        self.state.lock().unwrap().accounts.push(account);
    }

    /// Reject every following `sendTransaction` with `message`.
    pub fn fail_sends(&self, message: &str) {
        self.state.lock().unwrap().send_failure = Some(message.to_string());
    }

    /// Reject every following `getProgramAccounts` with `message`.
    pub fn fail_lists(&self, message: &str) {
        self.state.lock().unwrap().list_failure = Some(message.to_string());
    }

    /// All transactions submitted so far, in submission order.
    pub fn sent_transactions(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn program_account_calls(&self) -> usize {
        self.state.lock().unwrap().program_account_calls
    }
}

impl Default for MockCluster {
    fn default() -> Self {
        Self::new()
    }
}

fn rejected(message: &str) -> ClusterError {
    ClusterError::Rpc {
        code: -32002,
        message: message.to_string(),
        data: None,
    }
}

#[async_trait::async_trait]
impl Cluster for MockCluster {
    fn commitment(&self) -> Commitment {
        self.commitment
    }

    async fn latest_blockhash(&self) -> campaign_rpc::Result<RecentBlockhash> {
        Ok(RecentBlockhash {
            blockhash: [9u8; 32],
            last_valid_block_height: MOCK_LAST_VALID_BLOCK_HEIGHT,
        })
    }

    async fn send_transaction(&self, transaction: &[u8]) -> campaign_rpc::Result<String> {
        let tx = Transaction::deserialize(transaction)
            .map_err(|e| ClusterError::InvalidResponse(format!("undecodable transaction: {e}")))?;
        let mut state = self.state.lock().unwrap();
        if let Some(message) = &state.send_failure {
            return Err(rejected(message));
        }
        if !tx.is_fully_signed() {
            return Err(rejected("missing signature"));
        }
        let signature = tx
            .signature()
            .ok_or_else(|| rejected("transaction has no signatures"))?;
        info!(%signature, "mock: recorded transaction");
        state.landed.insert(signature.clone());
        state.sent.push(tx);
        Ok(signature)
    }

    async fn signature_status(&self, signature: &str) -> campaign_rpc::Result<Option<SignatureStatus>> {
        let landed = self.state.lock().unwrap().landed.contains(signature);
        Ok(landed.then(|| SignatureStatus {
            slot: 1,
            err: None,
            confirmation_status: Some(Commitment::Finalized),
        }))
    }

    async fn block_height(&self) -> campaign_rpc::Result<u64> {
        Ok(1)
    }

    async fn program_accounts(&self, program_id: &Pubkey) -> campaign_rpc::Result<Vec<AccountData>> {
        let mut state = self.state.lock().unwrap();
        state.program_account_calls += 1;
        if let Some(message) = &state.list_failure {
            return Err(rejected(message));
        }
        Ok(state
            .accounts
            .iter()
            .filter(|a| a.owner == *program_id)
            .cloned()
            .collect())
    }

    async fn account(&self, address: &Pubkey) -> campaign_rpc::Result<Option<AccountData>> {
        let state = self.state.lock().unwrap();
        Ok(state.accounts.iter().find(|a| a.pubkey == *address).cloned())
    }
}

/// Hands out the same [`MockCluster`] on every connect and counts connects.
pub struct MockConnector {
    cluster: Arc<MockCluster>,
    connects: AtomicUsize,
}

impl MockConnector {
    pub fn new(cluster: MockCluster) -> Self {
        Self {
            cluster: Arc::new(cluster),
            connects: AtomicUsize::new(0),
        }
    }

    pub fn cluster(&self) -> &MockCluster {
        &self.cluster
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

impl crate::connector::Connector for MockConnector {
    fn connect(&self) -> Arc<dyn Cluster> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.cluster.clone()
    }
}
