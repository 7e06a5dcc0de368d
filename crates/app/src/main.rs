use std::path::PathBuf;

use campaign_app::{parse_command, render, AppBuilder, AppError, Command, Msg, Runtime, HELP};
use campaign_settings::SERVICE_NAME;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

/// Terminal client for the crowdfunding program.
#[derive(Parser, Debug)]
#[command(name = "campaign", version, about)]
struct Args {
    /// Settings file (default: the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Wallet keypair file, Solana CLI format
    #[arg(long)]
    keypair: Option<PathBuf>,

    /// Cluster moniker (devnet, testnet, mainnet-beta, localnet) or RPC URL
    #[arg(long, short = 'u')]
    url: Option<String>,

    /// Debug logging
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    let app = AppBuilder::new(SERVICE_NAME)
        .verbose(args.verbose)
        .config_path(args.config)
        .keypair_path(args.keypair)
        .rpc_url(args.url)
        .build()?;
    debug!(settings = %app.settings.path().display(), "settings loaded");

    let mut runtime = Runtime::new(app.client);
    runtime.dispatch(Msg::Loaded);
    print!("{}", render(runtime.state()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(Command::Dispatch(msg)) => runtime.dispatch(msg),
                    Ok(Command::Show) => {}
                    Ok(Command::Help) => {
                        println!("{HELP}");
                        continue;
                    }
                    Ok(Command::Quit) => break,
                    Err(e) => {
                        warn!("{e}");
                        continue;
                    }
                }
                print!("{}", render(runtime.state()));
            }
            applied = runtime.next_completion(), if runtime.in_flight() > 0 => {
                if applied {
                    print!("{}", render(runtime.state()));
                }
            }
        }
    }

    runtime.shutdown();
    Ok(())
}
