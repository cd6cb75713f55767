use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Ledger name of the pool created together with the founders
pub const INITIAL_POOL_NAME: &str = "Initial Pool";

/// Prefix of pools created after initialization; suffixed with the round number
pub const POOL_AFTER_ROUND_PREFIX: &str = "Pool After Round";

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Percentages of a normalized cap table sum to this value
pub const FULL_OWNERSHIP: Decimal = dec!(100);

/// Allowed drift of a normalized cap table total away from 100
pub const PERCENTAGE_TOLERANCE: Decimal = dec!(0.000001);

/// Name of the pool created when the round sequence holds `round_count` rounds.
pub fn pool_name_after_round(round_count: usize) -> String {
    format!("{} {}", POOL_AFTER_ROUND_PREFIX, round_count + 1)
}
