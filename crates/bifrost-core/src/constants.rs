/// ─── Bifrost Constants ──────────────────────────────────────────────────────
///
/// Every foreign amount is normalised to 8 decimals on the native chain.

// ── Native settlement chain ──────────────────────────────────────────────────

/// Code of the native settlement chain. Synth, trade and secured assets may
/// never be denominated on it.
pub const NATIVE_CHAIN: &str = "THOR";

/// Symbol of the native settlement asset.
pub const NATIVE_SYMBOL: &str = "RUNE";

// ── Amounts ──────────────────────────────────────────────────────────────────

/// Decimals of the system-wide amount unit.
pub const SYSTEM_DECIMALS: i64 = 8;

/// EVM amounts carry 18 decimals; dividing by this converts them to 8.
pub const EVM_TO_SYSTEM_DIVISOR: u64 = 10_000_000_000;

// ── Transactions ─────────────────────────────────────────────────────────────

/// Placeholder outbound hash recorded for zero-value legs (e.g. affiliate
/// fees paid on the native chain). May appear more than once in out hashes.
pub const BLANK_TX_ID: &str = "0000000000000000000000000000000000000000000000000000000000000000";

// ── Assets ───────────────────────────────────────────────────────────────────

/// Single-letter abbreviations accepted by `Asset::from_short_code_or_str`.
pub const SHORT_CODES: &[(&str, &str)] = &[
    ("a", "AVAX.AVAX"),
    ("b", "BTC.BTC"),
    ("c", "BCH.BCH"),
    ("d", "DOGE.DOGE"),
    ("e", "ETH.ETH"),
    ("f", "BASE.ETH"),
    ("g", "GAIA.ATOM"),
    ("l", "LTC.LTC"),
    ("o", "SOL.SOL"),
    ("r", "THOR.RUNE"),
    ("s", "BSC.BNB"),
    ("t", "TRON.TRX"),
    ("x", "XRP.XRP"),
];

pub const MAX_SYMBOL_LENGTH: usize = 64;
pub const MAX_TICKER_LENGTH: usize = 20;
