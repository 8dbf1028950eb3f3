//! Layout inference and extraction over raw grids.

pub mod classifier;
pub mod consolidated;
pub mod individual;
pub mod report;

/// Parse a locale-formatted amount: strip everything except digits, dot and
/// minus, then float-parse. Unparseable input reads as 0, and a negative
/// zero ("- 0" is a real value in these reports) normalizes to plain 0.
pub(crate) fn parse_number(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    let value = cleaned.parse::<f64>().unwrap_or(0.0);
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// Integer parse of a leading numeric prefix ("30 CTN" reads as 30), the
/// way quantity cells are keyed in by hand. Anything else reads as 0.
pub(crate) fn parse_leading_int(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let mut end = 0;
    for (i, c) in trimmed.char_indices() {
        if c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+')) {
            end = i + c.len_utf8();
        } else {
            break;
        }
    }
    trimmed[..end].parse::<i64>().map(|v| v as f64).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_thousands_separators() {
        assert_eq!(parse_number("23,135.59"), 23135.59);
        assert_eq!(parse_number("4,164.41"), 4164.41);
        assert_eq!(parse_number("Rs. 1,000"), 1000.0);
    }

    #[test]
    fn negative_zero_reads_as_zero() {
        let v = parse_number("- 0");
        assert_eq!(v, 0.0);
        assert!(v.is_sign_positive());
    }

    #[test]
    fn garbage_reads_as_zero() {
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("n/a"), 0.0);
        assert_eq!(parse_number("--"), 0.0);
    }

    #[test]
    fn leading_int_ignores_trailing_text() {
        assert_eq!(parse_leading_int("30"), 30.0);
        assert_eq!(parse_leading_int("  30 CTN"), 30.0);
        assert_eq!(parse_leading_int("-5"), -5.0);
        assert_eq!(parse_leading_int("CTN 30"), 0.0);
    }
}
