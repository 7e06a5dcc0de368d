//! Confirmation polling for submitted transactions.

use std::time::Duration;

use tracing::debug;

use crate::cluster::{Cluster, ClusterError, Result};

/// Poll `signature` until it reaches the cluster's commitment.
///
/// Fails when the transaction reports an error, or when the chain passes
/// `last_valid_block_height` without the signature landing. There is no
/// wall-clock timeout.
pub async fn confirm_transaction(
    cluster: &dyn Cluster,
    signature: &str,
    last_valid_block_height: u64,
    poll_interval: Duration,
) -> Result<()> {
    let commitment = cluster.commitment();
    loop {
        if let Some(status) = cluster.signature_status(signature).await? {
            if let Some(err) = &status.err {
                return Err(ClusterError::TransactionFailed {
                    signature: signature.to_string(),
                    err: err.clone(),
                });
            }
            if status.satisfies(commitment) {
                debug!(signature, slot = status.slot, %commitment, "transaction confirmed");
                return Ok(());
            }
        } else if cluster.block_height().await? > last_valid_block_height {
            return Err(ClusterError::BlockhashExpired {
                signature: signature.to_string(),
                commitment,
            });
        }
        tokio::time::sleep(poll_interval).await;
    }
}
