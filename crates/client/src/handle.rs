//! The program binding: a cluster connection, the wallet signer and the
//! program interface, combined into one callable surface.

use std::sync::Arc;
use std::time::Duration;

use campaign_core::Pubkey;
use campaign_program::{Campaign, Instruction, Message, ProgramInterface, Transaction};
use campaign_rpc::{confirm_transaction, Cluster};
use campaign_wallet::{WalletAdapter, WalletProvider};
use tracing::{debug, info};

use crate::connector::Connector;
use crate::{ClientError, Result};

pub struct ProgramHandle {
    cluster: Arc<dyn Cluster>,
    wallet: Arc<dyn WalletAdapter>,
    user: Pubkey,
    program: ProgramInterface,
    poll_interval: Duration,
}

/// Bind a fresh connection to the connected wallet.
///
/// Fails with [`ClientError::WalletNotConnected`] unless an installed wallet
/// has completed a connect.
pub fn get_program_handle(
    connector: &dyn Connector,
    provider: &WalletProvider,
    program: &ProgramInterface,
    poll_interval: Duration,
) -> Result<ProgramHandle> {
    let wallet = provider.adapter().ok_or(ClientError::WalletNotConnected)?;
    let user = wallet.public_key().ok_or(ClientError::WalletNotConnected)?;
    Ok(ProgramHandle {
        cluster: connector.connect(),
        wallet: Arc::clone(wallet),
        user,
        program: program.clone(),
        poll_interval,
    })
}

impl ProgramHandle {
    /// The wallet address, fee payer of every transaction.
    pub fn user(&self) -> Pubkey {
        self.user
    }

    pub fn program(&self) -> &ProgramInterface {
        &self.program
    }

    pub fn program_id(&self) -> Pubkey {
        self.program.program_id
    }

    /// Sign, submit and confirm a single instruction. Returns the signature.
    pub async fn rpc(&self, instruction: Instruction) -> Result<String> {
        let recent = self.cluster.latest_blockhash().await?;
        let message = Message::compile(&self.user, &[instruction], recent.blockhash)?;

        let signature = self.wallet.sign_message(&message.serialize()?).await?;
        let mut transaction = Transaction::new_unsigned(message);
        transaction.add_signature(&self.user, signature)?;

        let wire = transaction.serialize()?;
        debug!(bytes = wire.len(), payer = %self.user, "sending transaction");
        let signature = self.cluster.send_transaction(&wire).await?;
        info!(%signature, "transaction submitted");

        confirm_transaction(
            self.cluster.as_ref(),
            &signature,
            recent.last_valid_block_height,
            self.poll_interval,
        )
        .await?;
        Ok(signature)
    }

    /// Every account the program owns, decoded as campaigns in network order.
    pub async fn all_campaigns(&self) -> Result<Vec<Campaign>> {
        let accounts = self.cluster.program_accounts(&self.program.program_id).await?;
        debug!(count = accounts.len(), "fetched program accounts");
        accounts
            .iter()
            .map(|account| Campaign::decode(account.pubkey, &account.data).map_err(ClientError::from))
            .collect()
    }

    pub async fn fetch_campaign(&self, address: &Pubkey) -> Result<Option<Campaign>> {
        match self.cluster.account(address).await? {
            Some(account) => Ok(Some(Campaign::decode(account.pubkey, &account.data)?)),
            None => Ok(None),
        }
    }
}
