//! Lenient price handling. Prices are stored as the text the admin typed
//! ("40", "₹40", "$4.99", "120/-"); numbers are only derived when needed.

/// First decimal number in `raw`, ignoring currency symbols and separators.
///
/// ```
/// use kitchen_core::content::price::parse_price;
/// assert_eq!(parse_price("₹1,200"), Some(1200.0));
/// assert_eq!(parse_price("$4.99"), Some(4.99));
/// assert_eq!(parse_price("ask"), None);
/// ```
pub fn parse_price(raw: &str) -> Option<f64> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let number: String = raw[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .filter(|c| *c != ',')
        .collect();
    number.trim_end_matches('.').parse().ok()
}

/// Leading non-numeric characters of a price, e.g. `"$"` for `"$4.99"`.
pub fn currency_prefix(raw: &str) -> &str {
    let raw = raw.trim_start();
    let end = raw.find(|c: char| c.is_ascii_digit()).unwrap_or(raw.len());
    raw[..end].trim_end()
}

/// Display form used by the public pages: `"40"` -> `"₹40"`. Text that
/// already carries a symbol is returned unchanged.
pub fn format_rupees(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() || !currency_prefix(raw).is_empty() {
        raw.to_string()
    } else {
        format!("₹{raw}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_forms() {
        assert_eq!(parse_price("40"), Some(40.0));
        assert_eq!(parse_price("120/-"), Some(120.0));
        assert_eq!(parse_price("Rs. 99.50"), Some(99.5));
        assert_eq!(parse_price(""), None);
    }

    #[test]
    fn prefix_and_display() {
        assert_eq!(currency_prefix("$4.99"), "$");
        assert_eq!(currency_prefix("40"), "");
        assert_eq!(format_rupees("40"), "₹40");
        assert_eq!(format_rupees("₹40"), "₹40");
        assert_eq!(format_rupees(""), "");
    }
}
