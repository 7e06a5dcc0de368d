//! Campaign App
//!
//! Initialization (logging + settings + keystore wallet) and the view layer
//! of the crowdfunding client: state, reducer, renderer and event loop.

pub mod command;
pub mod runtime;
pub mod state;
pub mod update;
pub mod view;

pub use command::{parse_command, Command, CommandError, HELP};
pub use runtime::Runtime;
pub use state::{AppState, DraftCampaign};
pub use update::{update, ActionKind, ActionReport, Effect, Msg};
pub use view::{render, CampaignCard, View};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use campaign_client::{CampaignClient, HttpConnector};
use campaign_logging::LogLevel;
use campaign_program::{ProgramError, ProgramInterface};
use campaign_settings::{ClientConfig, Network, Settings, SettingsError, SERVICE_NAME};
use campaign_wallet::{KeypairWallet, WalletAdapter, WalletProvider};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("Keystore error: {0}")]
    Keystore(#[from] campaign_keystore::KeystoreError),
    #[error("Program interface error: {0}")]
    Program(#[from] ProgramError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Initialized application context
pub struct App {
    pub service: String,
    pub settings: Settings<ClientConfig>,
    /// Endpoint after command-line overrides.
    pub rpc_url: String,
    pub client: CampaignClient,
}

/// Builder for constructing an App with configurable options.
pub struct AppBuilder {
    service: String,
    log_level: LogLevel,
    skip_logging: bool,
    skip_banner: bool,
    config_path: Option<PathBuf>,
    keypair_path: Option<PathBuf>,
    rpc_url: Option<String>,
}

impl AppBuilder {
    pub fn new(service: &str) -> Self {
        Self {
            service: service.to_string(),
            log_level: LogLevel::Info,
            skip_logging: false,
            skip_banner: false,
            config_path: None,
            keypair_path: None,
            rpc_url: None,
        }
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.log_level = LogLevel::from_verbose(verbose);
        self
    }

    pub fn skip_logging(mut self) -> Self {
        self.skip_logging = true;
        self
    }

    pub fn skip_banner(mut self) -> Self {
        self.skip_banner = true;
        self
    }

    pub fn config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Use this keypair for one run instead of the configured one.
    pub fn keypair_path(mut self, path: Option<PathBuf>) -> Self {
        self.keypair_path = path;
        self
    }

    /// Cluster moniker or URL for one run; the settings file is not changed.
    pub fn rpc_url(mut self, url: Option<String>) -> Self {
        self.rpc_url = url;
        self
    }

    pub fn build(self) -> Result<App, AppError> {
        if !self.skip_logging {
            let _ = campaign_logging::try_init(self.log_level);
        }

        let settings: Settings<ClientConfig> =
            Settings::load_or_default(&self.service, self.config_path.as_deref())?;
        let config = &settings.config;

        let key_path = self
            .keypair_path
            .unwrap_or_else(|| config.wallet.resolved_keypair_path());
        let keypair = campaign_keystore::load_or_generate_keypair(&key_path)?;
        let adapter: Arc<dyn WalletAdapter> = Arc::new(KeypairWallet::from_file(keypair, key_path));
        let provider = WalletProvider::detect(Some(adapter), &config.wallet.expected_provider);

        let mut program = ProgramInterface::crowdfunding()?;
        if let Some(program_id) = config.program_id {
            program = program.with_program_id(program_id);
        }

        let network = match &self.rpc_url {
            Some(url) => Network::from_moniker(url),
            None => config.network.clone(),
        };
        let rpc_url = network.rpc_url().to_string();
        let connector = Arc::new(HttpConnector::new(rpc_url.clone(), config.commitment));

        if !self.skip_banner {
            info!(
                "{} {} starting: cluster {} ({}), program {}",
                self.service,
                env!("CARGO_PKG_VERSION"),
                rpc_url,
                config.commitment,
                program.program_id,
            );
        }

        let client = CampaignClient::new(
            connector,
            provider,
            program,
            Duration::from_millis(config.confirm_poll_interval_ms),
        );

        Ok(App {
            service: self.service,
            settings,
            rpc_url,
            client,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new(SERVICE_NAME)
    }
}
