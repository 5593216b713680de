use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Category label used when a transaction has none
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Platform label used when an income transaction has none
pub const OTHER_PLATFORM: &str = "Other";

/// Default self-employment tax rate
pub const DEFAULT_TAX_RATE: Decimal = dec!(0.25);

/// Share of income the dashboard assumes is set aside for taxes
pub const DASHBOARD_TAX_SET_ASIDE_RATE: Decimal = dec!(0.25);

/// Window used for daily averages and trends
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Number of transactions shown in the "recent" list
pub const RECENT_TRANSACTIONS_LIMIT: usize = 5;

pub const MAX_DESCRIPTION_LEN: usize = 200;

// Relative date buckets, in seconds
pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 3_600;
pub const SECONDS_PER_DAY: i64 = 86_400;
pub const SECONDS_PER_WEEK: i64 = 604_800;
pub const SECONDS_PER_MONTH: i64 = 2_592_000;

/// Colors assigned to chart slices in order
pub const CHART_PALETTE: [&str; 6] = [
    "#8b5cf6", "#3b82f6", "#22c55e", "#f59e0b", "#ef4444", "#06b6d4",
];
