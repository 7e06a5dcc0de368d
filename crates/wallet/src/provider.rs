use std::fmt;
use std::sync::Arc;

use crate::adapter::WalletAdapter;

/// What wallet detection found at startup.
#[derive(Clone)]
pub enum WalletProvider {
    /// No wallet is installed.
    Absent,
    /// A wallet is present but it is not the one this client expects. It is
    /// never reconnected silently, but an explicit connect still goes through.
    Unknown {
        name: String,
        adapter: Arc<dyn WalletAdapter>,
    },
    Expected(Arc<dyn WalletAdapter>),
}

impl WalletProvider {
    /// Resolve the provider once, matching by name.
    pub fn detect(adapter: Option<Arc<dyn WalletAdapter>>, expected: &str) -> Self {
        match adapter {
            None => Self::Absent,
            Some(adapter) if adapter.provider_name() == expected => Self::Expected(adapter),
            Some(adapter) => Self::Unknown {
                name: adapter.provider_name().to_string(),
                adapter,
            },
        }
    }

    /// The installed wallet, expected or not.
    pub fn adapter(&self) -> Option<&Arc<dyn WalletAdapter>> {
        match self {
            Self::Absent => None,
            Self::Unknown { adapter, .. } | Self::Expected(adapter) => Some(adapter),
        }
    }

    pub fn is_expected(&self) -> bool {
        matches!(self, Self::Expected(_))
    }
}

impl fmt::Debug for WalletProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "Absent"),
            Self::Unknown { name, .. } => write!(f, "Unknown({name})"),
            Self::Expected(adapter) => write!(f, "Expected({})", adapter.provider_name()),
        }
    }
}
