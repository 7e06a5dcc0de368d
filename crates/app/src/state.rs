use campaign_core::Pubkey;
use campaign_program::Campaign;

/// Form fields for the next campaign. Submitted as typed, never validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftCampaign {
    pub name: String,
    pub description: String,
}

/// Everything the view renders from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub wallet_address: Option<Pubkey>,
    /// Replaced wholesale by every successful listing.
    pub campaigns: Vec<Campaign>,
    pub draft: DraftCampaign,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.wallet_address.is_some()
    }
}
