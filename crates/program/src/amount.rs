//! Fixed transfer amounts.

use campaign_core::LAMPORTS_PER_SOL;

/// SOL moved by a single donate or withdraw.
pub const DONATION_SOL: f64 = 0.2;

/// `round(0.2 * LAMPORTS_PER_SOL)`.
pub const DONATION_LAMPORTS: u64 = LAMPORTS_PER_SOL / 5;
