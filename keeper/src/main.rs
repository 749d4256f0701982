//! Growvote Withdrawal Finalizer Keeper
//!
//! Off-chain service that watches user ledger accounts for pending
//! withdrawal requests and submits finalizations once their delay has
//! elapsed. Finalization is permissionless on-chain, so the keeper can
//! crank any matured request.

mod config;
mod pending_queue;
mod scanner;
mod tx_builder;

use anyhow::{Context, Result};
use config::Config;
use pending_queue::PendingQueue;
use scanner::{decode_pending_request, USER_ACCOUNT_LEN};
use solana_client::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    signature::{Keypair, Signer},
};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Growvote Withdrawal Finalizer");

    // Load configuration
    let config = Config::load().unwrap_or_else(|_| {
        log::warn!("Failed to load config, using default devnet config");
        Config::default_devnet()
    });

    log::info!("Connected to RPC: {}", config.rpc_url);
    log::info!("Monitoring token program: {}", config.token_program);

    // Initialize RPC client
    let client = RpcClient::new_with_commitment(
        config.rpc_url.clone(),
        CommitmentConfig::confirmed(),
    );

    // Load keeper wallet
    let keeper = load_keypair(&config.keypair_path)?;
    log::info!("Keeper wallet: {}", keeper.pubkey());

    // Initialize the pending-withdrawal queue
    let mut queue = PendingQueue::new();

    log::info!("Keeper service started. Watching for matured withdrawals...");

    // Main event loop
    let mut interval = time::interval(Duration::from_secs(config.poll_interval_secs));

    loop {
        interval.tick().await;

        if let Err(e) = refresh_queue(&mut queue, &client, &config) {
            log::error!("Error scanning user accounts: {}", e);
            continue;
        }

        if let Err(e) = process_finalizations(&mut queue, &client, &config, &keeper) {
            log::error!("Error processing finalizations: {}", e);
        }

        if !queue.is_empty() {
            log::debug!("Pending queue size: {}", queue.len());
            if let Some(next) = queue.peek() {
                log::debug!("Next maturity at {}", next.end_time);
            }
        }
    }
}

/// Rescan the program's user accounts for pending withdrawals
fn refresh_queue(
    queue: &mut PendingQueue,
    client: &RpcClient,
    config: &Config,
) -> Result<()> {
    let accounts = client
        .get_program_accounts(&config.token_program)
        .context("getProgramAccounts failed")?;

    queue.clear();
    for (address, account) in accounts {
        // Only user ledger accounts have this size
        if account.data.len() != USER_ACCOUNT_LEN {
            continue;
        }
        match decode_pending_request(address, &account.data) {
            Ok(Some(request)) => queue.push(request),
            Ok(None) => {}
            Err(e) => log::warn!("Skipping undecodable account {}: {}", address, e),
        }
    }

    Ok(())
}

/// Submit finalizations for matured requests, up to the batch limit
fn process_finalizations(
    queue: &mut PendingQueue,
    client: &RpcClient,
    config: &Config,
    keeper: &Keypair,
) -> Result<()> {
    // Stay behind the cluster clock by the configured margin so a
    // skewed local clock never submits an early finalize
    let now = unix_now()?.saturating_sub(config.maturity_margin_secs);

    for _ in 0..config.max_finalizations_per_batch {
        let Some(request) = queue.pop_mature(now) else {
            break;
        };

        log::info!(
            "Finalizing withdrawal for {} (amount: {})",
            request.owner,
            request.amount
        );

        match execute_finalization(client, config, keeper, &request) {
            Ok(signature) => log::info!("Finalization submitted: {}", signature),
            Err(e) => {
                log::error!("Failed to finalize for {}: {}", request.owner, e);
                // Leave it out of the queue; the next rescan re-adds it
            }
        }
    }

    Ok(())
}

/// Build, sign, and submit a single finalization
fn execute_finalization(
    client: &RpcClient,
    config: &Config,
    keeper: &Keypair,
    request: &scanner::PendingRequest,
) -> Result<String> {
    let recent_blockhash = client
        .get_latest_blockhash()
        .context("Failed to fetch recent blockhash")?;

    let transaction = tx_builder::build_finalize_transaction(
        &config.token_program,
        &request.account,
        keeper,
        recent_blockhash,
    )?;

    let signature = client
        .send_and_confirm_transaction(&transaction)
        .context("Transaction submission failed")?;

    Ok(signature.to_string())
}

/// Current UNIX time as the u32 the ledger uses
fn unix_now() -> Result<u32> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("System clock before UNIX epoch")?;
    u32::try_from(now.as_secs()).context("System clock out of range")
}

/// Load keeper keypair from file
fn load_keypair(path: &str) -> Result<Keypair> {
    let expanded_path = shellexpand::tilde(path);
    let bytes = std::fs::read(expanded_path.as_ref())
        .context(format!("Failed to read keypair from {}", path))?;

    let keypair = if bytes.first() == Some(&b'[') {
        // JSON format
        let json_data: Vec<u8> = serde_json::from_slice(&bytes)
            .context("Failed to parse keypair JSON")?;
        Keypair::try_from(&json_data[..])
            .context("Failed to create keypair from bytes")?
    } else {
        // Binary format
        Keypair::try_from(&bytes[..])
            .context("Failed to create keypair from bytes")?
    };

    Ok(keypair)
}
