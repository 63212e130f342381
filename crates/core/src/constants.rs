use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Decimal precision for display and export
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// First month of every plan
pub const FIRST_MONTH: i32 = 1;

/// Largest goal or budget figure a stored plan accepts
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

/// Percent thresholds used to classify progress
pub const CLOSE_TO_GOAL_PERCENT: Decimal = dec!(80);
pub const HALFWAY_PERCENT: Decimal = dec!(50);
