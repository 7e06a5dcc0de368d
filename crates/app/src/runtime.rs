//! The event loop: applies messages, spawns effects as tasks and feeds their
//! results back in completion order.

use std::sync::Arc;

use campaign_client::CampaignClient;
use campaign_wallet::WalletSession;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::error;

use crate::state::AppState;
use crate::update::{update, ActionKind, ActionReport, Effect, Msg};

pub struct Runtime {
    state: AppState,
    client: CampaignClient,
    session: Arc<Mutex<WalletSession>>,
    tasks: JoinSet<Option<Msg>>,
}

impl Runtime {
    pub fn new(client: CampaignClient) -> Self {
        Self {
            state: AppState::new(),
            client,
            session: Arc::new(Mutex::new(WalletSession::new())),
            tasks: JoinSet::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Apply `msg` and spawn every effect it yields.
    pub fn dispatch(&mut self, msg: Msg) {
        for effect in update(&mut self.state, msg) {
            let client = self.client.clone();
            let session = Arc::clone(&self.session);
            self.tasks.spawn(execute(effect, client, session));
        }
    }

    /// Number of effects still running.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for the next effect to finish and apply its result.
    ///
    /// Returns `false` once nothing is in flight.
    pub async fn next_completion(&mut self) -> bool {
        match self.tasks.join_next().await {
            None => false,
            Some(Ok(Some(msg))) => {
                self.dispatch(msg);
                true
            }
            Some(Ok(None)) => true,
            Some(Err(e)) => {
                if !e.is_cancelled() {
                    error!(error = %e, "Effect task panicked");
                }
                true
            }
        }
    }

    /// Run until every effect, including follow-up refreshes, has finished.
    pub async fn settle(&mut self) {
        while self.next_completion().await {}
    }

    /// Abort everything in flight. Aborted effects apply nothing.
    pub fn shutdown(&mut self) {
        self.tasks.abort_all();
    }
}

fn failed(kind: ActionKind, e: impl std::fmt::Display) -> Option<Msg> {
    error!(action = %kind, error = %e, "Action failed");
    Some(Msg::ActionFailed(kind))
}

async fn execute(
    effect: Effect,
    client: CampaignClient,
    session: Arc<Mutex<WalletSession>>,
) -> Option<Msg> {
    match effect {
        Effect::SilentConnect => {
            let mut session = session.lock().await;
            session
                .check_silent_connect(client.provider())
                .await
                .map(Msg::WalletConnected)
        }
        Effect::Connect => {
            let mut session = session.lock().await;
            match session.connect(client.provider()).await {
                Ok(address) => address.map(Msg::WalletConnected),
                Err(e) => failed(ActionKind::Connect, e),
            }
        }
        Effect::Create { name, description } => match client.create(&name, &description).await {
            Ok(created) => Some(Msg::ActionSucceeded(ActionReport::Created {
                campaign: created.address,
                signature: created.signature,
            })),
            Err(e) => failed(ActionKind::Create, e),
        },
        Effect::List => match client.list().await {
            Ok(campaigns) => Some(Msg::CampaignsLoaded(campaigns)),
            Err(e) => failed(ActionKind::List, e),
        },
        Effect::Donate(campaign) => match client.donate(campaign).await {
            Ok(signature) => Some(Msg::ActionSucceeded(ActionReport::Donated { campaign, signature })),
            Err(e) => failed(ActionKind::Donate, e),
        },
        Effect::Withdraw(campaign) => match client.withdraw(campaign).await {
            Ok(signature) => Some(Msg::ActionSucceeded(ActionReport::Withdrew { campaign, signature })),
            Err(e) => failed(ActionKind::Withdraw, e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use campaign_client::mock::{MockCluster, MockConnector};
    use campaign_core::Pubkey;
    use campaign_crypto::SigningKeypair;
    use campaign_program::{Campaign, ProgramInterface};
    use campaign_wallet::{KeypairWallet, WalletAdapter, WalletProvider};

    fn runtime(provider: WalletProvider) -> (Runtime, Arc<MockConnector>) {
        let connector = Arc::new(MockConnector::new(MockCluster::new()));
        let client = CampaignClient::new(
            connector.clone(),
            provider,
            ProgramInterface::crowdfunding().unwrap(),
            Duration::from_millis(1),
        );
        (Runtime::new(client), connector)
    }

    fn keypair_provider(trusted: bool) -> (WalletProvider, Pubkey) {
        let keypair = SigningKeypair::generate();
        let pubkey = keypair.pubkey();
        let adapter: Arc<dyn WalletAdapter> = Arc::new(KeypairWallet::ephemeral(keypair, trusted));
        (WalletProvider::detect(Some(adapter), "keypair"), pubkey)
    }

    async fn connected() -> (Runtime, Arc<MockConnector>, Pubkey) {
        let (provider, pubkey) = keypair_provider(true);
        let (mut rt, connector) = runtime(provider);
        rt.dispatch(Msg::Loaded);
        rt.settle().await;
        assert_eq!(rt.state().wallet_address, Some(pubkey));
        (rt, connector, pubkey)
    }

    #[tokio::test]
    async fn test_load_without_provider_stays_disconnected() {
        let (mut rt, _) = runtime(WalletProvider::Absent);
        rt.dispatch(Msg::Loaded);
        rt.settle().await;
        assert!(rt.state().wallet_address.is_none());

        rt.dispatch(Msg::ConnectClicked);
        rt.settle().await;
        assert!(rt.state().wallet_address.is_none());
    }

    #[tokio::test]
    async fn test_load_with_trusted_wallet_connects() {
        connected().await;
    }

    #[tokio::test]
    async fn test_untrusted_wallet_needs_explicit_connect() {
        let (provider, pubkey) = keypair_provider(false);
        let (mut rt, _) = runtime(provider);
        rt.dispatch(Msg::Loaded);
        rt.settle().await;
        assert!(rt.state().wallet_address.is_none());

        rt.dispatch(Msg::ConnectClicked);
        rt.settle().await;
        assert_eq!(rt.state().wallet_address, Some(pubkey));
    }

    #[tokio::test]
    async fn test_unexpected_wallet_connects_on_click() {
        let keypair = SigningKeypair::generate();
        let pubkey = keypair.pubkey();
        let adapter: Arc<dyn WalletAdapter> = Arc::new(KeypairWallet::ephemeral(keypair, true));
        let (mut rt, connector) = runtime(WalletProvider::detect(Some(adapter), "hardware"));

        rt.dispatch(Msg::Loaded);
        rt.settle().await;
        assert!(rt.state().wallet_address.is_none());

        rt.dispatch(Msg::ConnectClicked);
        rt.settle().await;
        assert_eq!(rt.state().wallet_address, Some(pubkey));

        rt.dispatch(Msg::DonateClicked(Pubkey::new([7u8; 32])));
        rt.settle().await;
        assert_eq!(connector.cluster().sent_transactions().len(), 1);
    }

    #[tokio::test]
    async fn test_donate_success_refreshes_once() {
        let (mut rt, connector, pubkey) = connected().await;
        let program_id = ProgramInterface::crowdfunding().unwrap().program_id;
        let campaign = Campaign {
            address: Pubkey::new([7u8; 32]),
            admin: pubkey,
            name: "Foo".into(),
            description: "Bar".into(),
            amount_donated: 0,
        };
        connector.cluster().insert_campaign(program_id, &campaign);

        rt.dispatch(Msg::DonateClicked(campaign.address));
        rt.settle().await;
        assert_eq!(connector.cluster().program_account_calls(), 1);
        assert_eq!(rt.state().campaigns, vec![campaign.clone()]);

        rt.dispatch(Msg::WithdrawClicked(campaign.address));
        rt.settle().await;
        assert_eq!(connector.cluster().program_account_calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_action_does_not_refresh() {
        let (mut rt, connector, _) = connected().await;
        connector.cluster().fail_sends("insufficient funds");

        rt.dispatch(Msg::DonateClicked(Pubkey::new([7u8; 32])));
        rt.dispatch(Msg::WithdrawClicked(Pubkey::new([7u8; 32])));
        rt.settle().await;
        assert_eq!(connector.cluster().program_account_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_does_not_refresh() {
        let (mut rt, connector, _) = connected().await;
        rt.dispatch(Msg::NameChanged("Foo".into()));
        rt.dispatch(Msg::DescriptionChanged("Bar".into()));
        rt.dispatch(Msg::CreateClicked);
        rt.settle().await;
        assert_eq!(connector.cluster().sent_transactions().len(), 1);
        assert_eq!(connector.cluster().program_account_calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_list_leaves_campaigns_stale() {
        let (mut rt, connector, _) = connected().await;
        let stale = vec![Campaign {
            address: Pubkey::new([3u8; 32]),
            admin: Pubkey::new([4u8; 32]),
            name: "old".into(),
            description: String::new(),
            amount_donated: 0,
        }];
        rt.dispatch(Msg::CampaignsLoaded(stale.clone()));
        connector.cluster().fail_lists("node is behind");

        rt.dispatch(Msg::RefreshClicked);
        rt.settle().await;
        assert_eq!(rt.state().campaigns, stale);
    }

    #[tokio::test]
    async fn test_rapid_donates_both_submit() {
        let (mut rt, connector, _) = connected().await;
        let campaign = Pubkey::new([7u8; 32]);
        rt.dispatch(Msg::DonateClicked(campaign));
        rt.dispatch(Msg::DonateClicked(campaign));
        assert_eq!(rt.in_flight(), 2);
        rt.settle().await;
        assert_eq!(connector.cluster().sent_transactions().len(), 2);
        assert_eq!(connector.cluster().program_account_calls(), 2);
    }

    #[tokio::test]
    async fn test_shutdown_aborts_in_flight() {
        let (mut rt, connector, _) = connected().await;
        rt.dispatch(Msg::RefreshClicked);
        rt.shutdown();
        rt.settle().await;
        assert_eq!(rt.in_flight(), 0);
        assert_eq!(connector.cluster().program_account_calls(), 0);
    }
}
