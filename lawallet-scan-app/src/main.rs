use anyhow::{bail, Context, Result};
use lawallet_badges::{BadgeClaimer, HttpBadgeService};
use lawallet_nostr::{GatewayClient, LocalKeySigner, Signer};
use lawallet_scan_app::cli::{self, Args, Command};
use lawallet_scan_app::{ScanSession, SessionState};
use lawallet_scan_core::{Identity, WalletConfig};
use serde_json::json;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = match cli::parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}\n\n{}", e, cli::usage());
            std::process::exit(2);
        }
    };

    if args.command == Command::Help {
        println!("{}", cli::usage());
        return Ok(());
    }

    let config = Arc::new(
        WalletConfig::load(&args.config)
            .with_context(|| format!("Failed to load {}", args.config.display()))?,
    );

    let secret_key = args
        .secret_key
        .clone()
        .or_else(|| std::env::var(cli::ENV_SECRET_KEY).ok());
    let signer = match secret_key {
        Some(secret) => Some(Arc::new(
            LocalKeySigner::from_hex(&secret).context("Invalid secret key")?,
        )),
        None => None,
    };

    let identity = identity_for(&args, signer.as_deref());
    tracing::debug!(?identity, "resolved identity");

    match &args.command {
        Command::Scan(payloads) => {
            for payload in payloads {
                let mut session = ScanSession::new(config.clone(), identity.clone());
                let effect = session.on_scan(payload);
                println!(
                    "{}",
                    json!({ "input": payload, "effect": effect, "state": session.state() })
                );
            }
        }
        Command::Claim(url) => {
            let Some(signer) = signer else {
                bail!("claim needs a secret key (--nsec or {})", cli::ENV_SECRET_KEY);
            };
            let timeout = config.request_timeout();
            let claimer = BadgeClaimer::new(
                Arc::new(HttpBadgeService::new(timeout)?),
                Arc::new(GatewayClient::new(&config.gateway, timeout)?),
                signer,
                timeout,
            );

            let mut session =
                ScanSession::new(config.clone(), identity).with_claimer(Arc::new(claimer));
            session.on_scan(url);
            if !matches!(session.state(), SessionState::AwaitingBadgeConfirm { .. }) {
                bail!("Not a claim-badge link for this wallet: {}", url);
            }

            match session.claim_badge().await {
                Ok(effect) => println!("{}", json!({ "input": url, "effect": effect })),
                Err(e) => {
                    println!("{}", json!({ "input": url, "state": session.state() }));
                    bail!("Badge claim failed: {}", e);
                }
            }
        }
        Command::Help => {}
    }

    Ok(())
}

/// Signer key wins over a `--pubkey` given on the command line.
fn identity_for(args: &Args, signer: Option<&LocalKeySigner>) -> Identity {
    let pubkey = signer
        .map(|s| s.public_key().to_string())
        .or_else(|| args.pubkey.clone());
    Identity::new(pubkey, args.username.clone())
}
