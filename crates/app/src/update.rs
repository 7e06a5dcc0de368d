//! Messages, effects and the reducer.
//!
//! `update` is the only place [`AppState`] changes. It never performs I/O;
//! whatever must happen outside the state is returned as an [`Effect`] for
//! the runtime to execute.

use std::fmt;

use campaign_core::Pubkey;
use campaign_program::Campaign;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Connect,
    Create,
    List,
    Donate,
    Withdraw,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "connect",
            Self::Create => "create",
            Self::List => "list",
            Self::Donate => "donate",
            Self::Withdraw => "withdraw",
        })
    }
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionReport {
    Created { campaign: Pubkey, signature: String },
    Donated { campaign: Pubkey, signature: String },
    Withdrew { campaign: Pubkey, signature: String },
}

impl ActionReport {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Created { .. } => ActionKind::Create,
            Self::Donated { .. } => ActionKind::Donate,
            Self::Withdrew { .. } => ActionKind::Withdraw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Loaded,
    ConnectClicked,
    WalletConnected(Pubkey),
    NameChanged(String),
    DescriptionChanged(String),
    CreateClicked,
    RefreshClicked,
    DonateClicked(Pubkey),
    WithdrawClicked(Pubkey),
    CampaignsLoaded(Vec<Campaign>),
    ActionSucceeded(ActionReport),
    ActionFailed(ActionKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SilentConnect,
    Connect,
    Create { name: String, description: String },
    List,
    Donate(Pubkey),
    Withdraw(Pubkey),
}

pub fn update(state: &mut AppState, msg: Msg) -> Vec<Effect> {
    match msg {
        Msg::Loaded => vec![Effect::SilentConnect],
        Msg::ConnectClicked => vec![Effect::Connect],
        Msg::WalletConnected(address) => {
            state.wallet_address = Some(address);
            vec![]
        }
        Msg::NameChanged(name) => {
            state.draft.name = name;
            vec![]
        }
        Msg::DescriptionChanged(description) => {
            state.draft.description = description;
            vec![]
        }
        Msg::CreateClicked => vec![Effect::Create {
            name: state.draft.name.clone(),
            description: state.draft.description.clone(),
        }],
        Msg::RefreshClicked => vec![Effect::List],
        Msg::DonateClicked(campaign) => vec![Effect::Donate(campaign)],
        Msg::WithdrawClicked(campaign) => vec![Effect::Withdraw(campaign)],
        Msg::CampaignsLoaded(campaigns) => {
            state.campaigns = campaigns;
            vec![]
        }
        // A new campaign shows up on the next manual refresh.
        Msg::ActionSucceeded(ActionReport::Created { .. }) => vec![],
        Msg::ActionSucceeded(ActionReport::Donated { .. } | ActionReport::Withdrew { .. }) => {
            vec![Effect::List]
        }
        Msg::ActionFailed(_) => vec![],
    }
}
