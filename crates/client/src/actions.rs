//! The four campaign actions, plus a single-campaign fetch.
//!
//! Every call builds a fresh [`ProgramHandle`] and fails independently; there
//! are no retries.

use std::sync::Arc;
use std::time::Duration;

use campaign_core::Pubkey;
use campaign_program::{campaign_address, instruction, Campaign, ProgramInterface, DONATION_LAMPORTS};
use campaign_wallet::WalletProvider;
use tracing::info;

use crate::connector::Connector;
use crate::handle::{get_program_handle, ProgramHandle};
use crate::Result;

/// Address and signature of a newly created campaign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedCampaign {
    pub address: Pubkey,
    pub signature: String,
}

#[derive(Clone)]
pub struct CampaignClient {
    connector: Arc<dyn Connector>,
    provider: WalletProvider,
    program: ProgramInterface,
    poll_interval: Duration,
}

impl CampaignClient {
    pub fn new(
        connector: Arc<dyn Connector>,
        provider: WalletProvider,
        program: ProgramInterface,
        poll_interval: Duration,
    ) -> Self {
        Self {
            connector,
            provider,
            program,
            poll_interval,
        }
    }

    pub fn program(&self) -> &ProgramInterface {
        &self.program
    }

    pub fn provider(&self) -> &WalletProvider {
        &self.provider
    }

    fn handle(&self) -> Result<ProgramHandle> {
        get_program_handle(
            self.connector.as_ref(),
            &self.provider,
            &self.program,
            self.poll_interval,
        )
    }

    /// Create the connected wallet's campaign.
    ///
    /// The address is derived from the creator alone, so a wallet owns at most
    /// one campaign. Name and description are submitted as given.
    pub async fn create(&self, name: &str, description: &str) -> Result<CreatedCampaign> {
        let handle = self.handle()?;
        let (address, _bump) = campaign_address(&handle.program_id(), &handle.user())?;
        let ix = instruction::create(handle.program(), address, handle.user(), name, description)?;
        let signature = handle.rpc(ix).await?;
        info!(campaign = %address, %signature, "Created a new campaign");
        Ok(CreatedCampaign { address, signature })
    }

    /// All campaigns, in the order the cluster returns them.
    pub async fn list(&self) -> Result<Vec<Campaign>> {
        let campaigns = self.handle()?.all_campaigns().await?;
        info!(count = campaigns.len(), "Fetched campaigns");
        Ok(campaigns)
    }

    /// Donate the fixed amount to `campaign`.
    pub async fn donate(&self, campaign: Pubkey) -> Result<String> {
        let handle = self.handle()?;
        let ix = instruction::donate(handle.program(), campaign, handle.user(), DONATION_LAMPORTS)?;
        let signature = handle.rpc(ix).await?;
        info!(%campaign, lamports = DONATION_LAMPORTS, %signature, "Donated");
        Ok(signature)
    }

    /// Withdraw the fixed amount from `campaign`. Only its admin succeeds;
    /// the program enforces that.
    pub async fn withdraw(&self, campaign: Pubkey) -> Result<String> {
        let handle = self.handle()?;
        let ix = instruction::withdraw(handle.program(), campaign, handle.user(), DONATION_LAMPORTS)?;
        let signature = handle.rpc(ix).await?;
        info!(%campaign, lamports = DONATION_LAMPORTS, %signature, "Withdrew");
        Ok(signature)
    }

    pub async fn fetch(&self, campaign: Pubkey) -> Result<Option<Campaign>> {
        self.handle()?.fetch_campaign(&campaign).await
    }
}
