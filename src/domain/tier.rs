//! Tier access policy
//!
//! Pure, stateless decision functions over the tier enum. Invalid tier
//! strings are rejected at the parsing boundary (serde/sqlx/`FromStr`);
//! inside this module the enum is closed and no function can fail.

use crate::models::Tier;

/// Whether a user of `user_tier` may access content requiring `required_tier`.
///
/// True iff `rank(user_tier) >= rank(required_tier)` under the fixed total
/// order `free < tier1 < tier2`.
pub fn can_access(user_tier: Tier, required_tier: Tier) -> bool {
    user_tier.rank() >= required_tier.rank()
}

/// Fraction of a catalog visible to a user of the given tier, as a rounded
/// percentage in 0..=100.
///
/// Precondition: `free_count`, `tier1_count` and `total` must come from the
/// same catalog snapshot; this function does not validate that
/// `free_count + tier1_count <= total`.
pub fn unlock_percentage(user_tier: Tier, total: u32, free_count: u32, tier1_count: u32) -> u8 {
    if total == 0 {
        return 0;
    }

    let accessible = match user_tier {
        Tier::Free => free_count,
        Tier::Tier1 => free_count + tier1_count,
        Tier::Tier2 => total,
    };

    // round-half-up
    (f64::from(accessible) / f64::from(total) * 100.0).round() as u8
}
