//! Ticker normalization between the index listing and the price feed

/// Convert a listed ticker to price-feed form
///
/// Share-class suffixes use a hyphen in the price feed (`BRK.B` becomes
/// `BRK-B`). Surrounding whitespace is dropped and letters are uppercased.
pub fn normalize_symbol(listed: &str) -> String {
    listed.trim().to_ascii_uppercase().replace('.', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_class_tickers() {
        assert_eq!(normalize_symbol("BRK.B"), "BRK-B");
        assert_eq!(normalize_symbol("BF.B"), "BF-B");
    }

    #[test]
    fn test_plain_tickers_unchanged() {
        assert_eq!(normalize_symbol("AAPL"), "AAPL");
        assert_eq!(normalize_symbol(" mmm\n"), "MMM");
    }
}
