//! Coin list import: turns an uploaded watchlist into `SYMBOLUSDT` tickers.

const QUOTE: &str = "USDT";
const PERPETUAL_SUFFIX: &str = ".P";

/// A parsed upload plus the metadata shown under the upload control.
#[derive(Debug, Clone, PartialEq)]
pub struct CoinList {
    pub file_name: String,
    pub size_bytes: usize,
    pub symbols: Vec<String>,
}

impl CoinList {
    pub fn from_text(file_name: impl Into<String>, content: &str) -> Self {
        Self {
            file_name: file_name.into(),
            size_bytes: content.len(),
            symbols: parse_coin_list(content),
        }
    }

    /// A list restored from a running server session; no file behind it.
    pub fn from_symbols(symbols: Vec<String>) -> Self {
        Self {
            file_name: String::new(),
            size_bytes: 0,
            symbols,
        }
    }

    pub fn has_file(&self) -> bool {
        !self.file_name.is_empty()
    }

    /// `"watchlist.txt (1.2 KB)"`
    pub fn describe_file(&self) -> String {
        format!(
            "{} ({:.1} KB)",
            self.file_name,
            self.size_bytes as f64 / 1024.0
        )
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Splits on newlines and commas, trims, drops blanks, then keeps every token
/// that normalizes to a ticker. Order is preserved.
pub fn parse_coin_list(content: &str) -> Vec<String> {
    content
        .split(['\n', ','])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(normalize_symbol)
        .collect()
}

/// Pattern cascade, first match wins:
///   `EXCHANGE:XXXUSDT.P` → `XXXUSDT`
///   `EXCHANGE:XXXUSDT`   → `XXXUSDT`
///   `XXXUSDT.P`          → `XXXUSDT`
///   `XXXUSDT`            → unchanged
pub fn normalize_symbol(token: &str) -> Option<String> {
    let body = match token.split_once(':') {
        Some((exchange, rest)) if is_symbol_chars(exchange) => rest,
        Some(_) => return None,
        None => token,
    };
    let spot = body.strip_suffix(PERPETUAL_SUFFIX).unwrap_or(body);
    let base = spot.strip_suffix(QUOTE)?;
    is_symbol_chars(base).then(|| format!("{}{}", base, QUOTE))
}

fn is_symbol_chars(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_upload_keeps_only_recognized_symbols() {
        let parsed = parse_coin_list("BINANCE:BTCUSDT.P\nETHUSDT\ngarbage");
        assert_eq!(parsed, vec!["BTCUSDT", "ETHUSDT"]);
    }

    #[test]
    fn every_pattern_in_the_cascade_normalizes() {
        assert_eq!(normalize_symbol("BINANCE:SOLUSDT.P").as_deref(), Some("SOLUSDT"));
        assert_eq!(normalize_symbol("BYBIT:SOLUSDT").as_deref(), Some("SOLUSDT"));
        assert_eq!(normalize_symbol("1000PEPEUSDT.P").as_deref(), Some("1000PEPEUSDT"));
        assert_eq!(normalize_symbol("XRPUSDT").as_deref(), Some("XRPUSDT"));
    }

    #[test]
    fn non_matching_tokens_are_dropped() {
        for bad in [
            "USDT",
            "BTCUSD",
            "btcusdt",
            "BTCUSDT.X",
            ":BTCUSDT",
            "binance:BTCUSDT",
            "BINANCE:",
            "BTC-USDT",
            "A:B:BTCUSDT",
        ] {
            assert_eq!(normalize_symbol(bad), None, "{} should be dropped", bad);
        }
    }

    #[test]
    fn commas_newlines_and_whitespace_all_separate() {
        let parsed = parse_coin_list(" BTCUSDT , ETHUSDT\r\n\n,, BINANCE:ADAUSDT.P  \n");
        assert_eq!(parsed, vec!["BTCUSDT", "ETHUSDT", "ADAUSDT"]);
    }

    #[test]
    fn file_description_uses_kilobytes() {
        let list = CoinList::from_text("list.txt", &"BTCUSDT\n".repeat(256));
        assert_eq!(list.len(), 256);
        assert_eq!(list.describe_file(), "list.txt (2.0 KB)");
    }
}
