//! Pure rendering of [`AppState`].

use std::fmt;

use campaign_program::Campaign;

use crate::state::{AppState, DraftCampaign};

#[derive(Debug, Clone, PartialEq)]
pub struct CampaignCard {
    pub id: String,
    pub balance_sol: f64,
    pub name: String,
    pub description: String,
}

impl From<&Campaign> for CampaignCard {
    fn from(campaign: &Campaign) -> Self {
        Self {
            id: campaign.address.to_string(),
            balance_sol: campaign.balance_sol(),
            name: campaign.name.clone(),
            description: campaign.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Only a connect action is offered.
    Disconnected,
    Connected {
        address: String,
        draft: DraftCampaign,
        campaigns: Vec<CampaignCard>,
    },
}

pub fn render(state: &AppState) -> View {
    match state.wallet_address {
        None => View::Disconnected,
        Some(address) => View::Connected {
            address: address.to_string(),
            draft: state.draft.clone(),
            campaigns: state.campaigns.iter().map(CampaignCard::from).collect(),
        },
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Disconnected => writeln!(f, "[connect] Connect to Wallet"),
            View::Connected {
                address,
                draft,
                campaigns,
            } => {
                writeln!(f, "Wallet: {address}")?;
                writeln!(f, "Campaign name: {}", draft.name)?;
                writeln!(f, "Campaign description: {}", draft.description)?;
                writeln!(f, "[create] Create a campaign    [list] Get a list of campaigns")?;
                for card in campaigns {
                    writeln!(f)?;
                    writeln!(f, "Campaign id: {}", card.id)?;
                    writeln!(f, "Balance: {}", card.balance_sol)?;
                    writeln!(f, "{}", card.name)?;
                    writeln!(f, "{}", card.description)?;
                    writeln!(f, "[donate {id}] Donate    [withdraw {id}] Withdraw", id = card.id)?;
                }
                Ok(())
            }
        }
    }
}
