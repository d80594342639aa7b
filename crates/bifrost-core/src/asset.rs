use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::chain::Chain;
use crate::constants::{MAX_SYMBOL_LENGTH, MAX_TICKER_LENGTH, NATIVE_SYMBOL, SHORT_CODES};
use crate::error::CoreError;
use crate::network::{self, Network};

// ── Symbol ───────────────────────────────────────────────────────────────────

/// Asset symbol as written by the source chain, e.g. `BTC` or
/// `USDC-0XA0B86991C6218B36C1D19D4A2E9EB0CE3606EB48`.
///
/// Case is preserved; comparison ignores ASCII case.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(input: &str) -> Result<Self, CoreError> {
        let ok = !input.is_empty()
            && input.len() <= MAX_SYMBOL_LENGTH
            && input
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'-');
        if !ok {
            return Err(CoreError::InvalidSymbol(input.to_string()));
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Mini-tokens carry a four character suffix ending in `M`
    /// (`MINIA-7A2M`).
    pub fn is_mini_token(&self) -> bool {
        match self.0.split_once('-') {
            Some((_, suffix)) => suffix.len() == 4 && suffix.to_ascii_uppercase().ends_with('M'),
            None => false,
        }
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_ascii_uppercase().hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

// ── Ticker ───────────────────────────────────────────────────────────────────

/// The part of a symbol before its first `-`.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    pub fn new(input: &str) -> Result<Self, CoreError> {
        let ok = !input.is_empty()
            && input.len() <= MAX_TICKER_LENGTH
            && input.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'.');
        if !ok {
            return Err(CoreError::InvalidTicker(input.to_string()));
        }
        Ok(Self(input.to_string()))
    }

    /// Ticker of an already validated symbol.
    pub fn from_symbol(symbol: &Symbol) -> Result<Self, CoreError> {
        let prefix = symbol.as_str().split('-').next().unwrap_or_default();
        Self::new(prefix)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Ticker {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Ticker {}

impl Hash for Ticker {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_ascii_uppercase().hash(state);
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ticker({})", self.0)
    }
}

// ── AssetKind ────────────────────────────────────────────────────────────────

/// Representation of an asset on the native chain. Exactly one applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum AssetKind {
    /// The layer-1 asset itself (`BTC.BTC`).
    #[default]
    Native,
    /// Synthetic asset minted against pool liquidity (`BTC/BTC`).
    Synthetic,
    /// Trade-account balance (`BTC~BTC`).
    Trade,
    /// Secured asset held by the vaults (`BTC-BTC`).
    Secured,
}

impl AssetKind {
    pub fn separator(&self) -> char {
        match self {
            AssetKind::Native => '.',
            AssetKind::Synthetic => '/',
            AssetKind::Trade => '~',
            AssetKind::Secured => '-',
        }
    }

    fn from_separator(c: char) -> Option<Self> {
        match c {
            '.' => Some(AssetKind::Native),
            '/' => Some(AssetKind::Synthetic),
            '~' => Some(AssetKind::Trade),
            '-' => Some(AssetKind::Secured),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            AssetKind::Native => "native",
            AssetKind::Synthetic => "synth",
            AssetKind::Trade => "trade",
            AssetKind::Secured => "secured",
        }
    }
}

// ── Asset ────────────────────────────────────────────────────────────────────

/// Canonical identifier of a fungible unit: `CHAIN{sep}SYMBOL`.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Asset {
    pub chain: Chain,
    pub symbol: Symbol,
    pub ticker: Ticker,
    pub kind: AssetKind,
}

impl Asset {
    /// Parse an asset string against the configured network.
    pub fn new(input: &str) -> Result<Self, CoreError> {
        Self::new_for(input, network::current())
    }

    /// Parse an asset string.
    ///
    /// The first character from `~ / - .` found anywhere in the input is the
    /// separator; the input is split once on it. `BTC-BTC.X` is therefore a
    /// secured asset with symbol `BTC.X`, not a native one.
    pub fn new_for(input: &str, network: Network) -> Result<Self, CoreError> {
        if input == "." {
            return Ok(Self::empty());
        }

        let split = input
            .char_indices()
            .find_map(|(i, c)| AssetKind::from_separator(c).map(|kind| (i, kind)));

        let (chain, symbol, kind) = match split {
            Some((idx, kind)) => {
                let chain = Chain::new_for(&input[..idx], network)?;
                (chain, &input[idx + 1..], kind)
            }
            None => (Chain::thorchain(), input, AssetKind::Native),
        };

        let symbol = Symbol::new(symbol)?;
        let ticker = Ticker::from_symbol(&symbol)?;
        Ok(Self {
            chain,
            symbol,
            ticker,
            kind,
        })
    }

    /// Expand a single-letter short code (`b` → `BTC.BTC`) before parsing.
    pub fn from_short_code_or_str(input: &str) -> Result<Self, CoreError> {
        let expanded = SHORT_CODES
            .iter()
            .find(|(code, _)| *code == input)
            .map(|(_, full)| *full)
            .unwrap_or(input);
        Self::new(expanded)
    }

    /// A layer-1 asset from trusted parts; used for registry constants.
    pub(crate) fn native(chain: Chain, symbol: &str) -> Self {
        let ticker = symbol.split('-').next().unwrap_or_default();
        Self {
            chain,
            symbol: Symbol(symbol.to_string()),
            ticker: Ticker(ticker.to_string()),
            kind: AssetKind::Native,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rune() -> Self {
        Self::native(Chain::thorchain(), NATIVE_SYMBOL)
    }

    pub fn btc() -> Self {
        Chain::unchecked("BTC").gas_asset()
    }

    pub fn eth() -> Self {
        Chain::unchecked("ETH").gas_asset()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty() && self.symbol.is_empty()
    }

    // ── Validation ───────────────────────────────────────────────────────────

    pub fn valid(&self) -> Result<(), CoreError> {
        self.valid_for(network::current())
    }

    pub fn valid_for(&self, network: Network) -> Result<(), CoreError> {
        self.chain.valid_for(network)?;
        Symbol::new(self.symbol.as_str())?;
        Ticker::new(self.ticker.as_str())?;
        if self.kind != AssetKind::Native && self.chain.is_thorchain() {
            return Err(CoreError::validation(format!(
                "{} asset cannot have chain {}: {}",
                self.kind.label(),
                self.chain,
                self
            )));
        }
        Ok(())
    }

    // ── Classification ───────────────────────────────────────────────────────

    pub fn is_synthetic(&self) -> bool {
        self.kind == AssetKind::Synthetic
    }

    pub fn is_trade(&self) -> bool {
        self.kind == AssetKind::Trade
    }

    pub fn is_secured(&self) -> bool {
        self.kind == AssetKind::Secured
    }

    /// Chain on which balances of this asset are settled. Synth, trade and
    /// secured assets live on the native chain whatever their `chain` says.
    pub fn settlement_chain(&self) -> Chain {
        match self.kind {
            AssetKind::Native => self.chain.clone(),
            _ => Chain::thorchain(),
        }
    }

    pub fn is_native_chain(&self) -> bool {
        self.settlement_chain().is_thorchain()
    }

    pub fn is_rune(&self) -> bool {
        *self == Self::rune()
    }

    pub fn is_gas_asset(&self) -> bool {
        *self == self.chain.gas_asset()
    }

    // ── Variant conversions ──────────────────────────────────────────────────

    pub fn layer1_asset(&self) -> Self {
        self.with_kind(AssetKind::Native)
    }

    pub fn synth_asset(&self) -> Self {
        self.with_kind(AssetKind::Synthetic)
    }

    pub fn trade_asset(&self) -> Self {
        self.with_kind(AssetKind::Trade)
    }

    pub fn secured_asset(&self) -> Self {
        self.with_kind(AssetKind::Secured)
    }

    /// Native-chain assets have no variants; they convert to themselves.
    fn with_kind(&self, kind: AssetKind) -> Self {
        if self.chain.is_thorchain() {
            return self.clone();
        }
        Self {
            kind,
            ..self.clone()
        }
    }

    /// Single-letter code for well-known assets, if one exists.
    pub fn short_code(&self) -> Option<&'static str> {
        if self.kind != AssetKind::Native {
            return None;
        }
        let text = self.to_string();
        SHORT_CODES
            .iter()
            .find(|(_, full)| full.eq_ignore_ascii_case(&text))
            .map(|(code, _)| *code)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.chain, self.kind.separator(), self.symbol)
    }
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Asset({self})")
    }
}

impl FromStr for Asset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Asset {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Asset> for String {
    fn from(asset: Asset) -> Self {
        asset.to_string()
    }
}
